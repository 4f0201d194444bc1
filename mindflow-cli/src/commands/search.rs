use clap::Args;

use super::{Workspace, WorkspaceArgs};

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Case-insensitive label filter; omit to clear the search
    pub query: Option<String>,
}

pub fn run(args: SearchArgs) -> anyhow::Result<()> {
    let workspace = Workspace::resolve(&args.workspace)?;
    let mut store = workspace.open_store()?;

    store.set_search_query(args.query.unwrap_or_default());
    super::save(&mut store)?;

    if store.search_query().is_empty() {
        println!("Search cleared");
    }
    print!("{}", super::show::format_tree(&store, false));
    Ok(())
}
