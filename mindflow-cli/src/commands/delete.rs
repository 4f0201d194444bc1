use clap::Args;

use super::{Workspace, WorkspaceArgs};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Topic id
    pub id: String,
}

pub fn run(args: &DeleteArgs) -> anyhow::Result<()> {
    let workspace = Workspace::resolve(&args.workspace)?;
    let mut store = workspace.open_store()?;
    let id = super::node_id(&args.id);
    super::require_node(&store, &id)?;

    let removed = store.delete_node(&id)?;
    super::save(&mut store)?;
    println!(
        "Deleted {removed} topic{}",
        if removed == 1 { "" } else { "s" }
    );
    Ok(())
}
