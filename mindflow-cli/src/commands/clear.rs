use clap::Args;

use super::{Workspace, WorkspaceArgs};

#[derive(Args, Debug)]
pub struct ClearArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,
}

pub fn run(args: &ClearArgs) -> anyhow::Result<()> {
    let workspace = Workspace::resolve(&args.workspace)?;
    let mut store = workspace.open_store()?;
    store.clear_mind_map();
    super::save(&mut store)?;
    println!("Mind map cleared");
    Ok(())
}
