use clap::Args;

use super::{Workspace, WorkspaceArgs};

#[derive(Args, Debug)]
pub struct ToggleArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Topic id
    pub id: String,
}

pub fn run(args: &ToggleArgs) -> anyhow::Result<()> {
    let workspace = Workspace::resolve(&args.workspace)?;
    let mut store = workspace.open_store()?;
    let id = super::node_id(&args.id);
    super::require_node(&store, &id)?;

    store.toggle_node_expanded(&id);
    super::save(&mut store)?;

    let expanded = store.node(&id).is_some_and(|n| n.data.expanded);
    println!("{id} is now {}", if expanded { "expanded" } else { "collapsed" });
    Ok(())
}
