use clap::Args;

use mindflow_core::render::CanvasEvent;

use super::{Workspace, WorkspaceArgs};

#[derive(Args, Debug)]
pub struct SelectArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Topic id; omit to clear the selection
    pub id: Option<String>,
}

pub fn run(args: &SelectArgs) -> anyhow::Result<()> {
    let workspace = Workspace::resolve(&args.workspace)?;
    let mut store = workspace.open_store()?;

    match args.id.as_deref().map(super::node_id) {
        Some(id) => {
            super::require_node(&store, &id)?;
            store.apply_event(CanvasEvent::NodeClicked(id.clone()));
            println!("Selected {id}");
        }
        None => {
            store.apply_event(CanvasEvent::PaneClicked);
            println!("Selection cleared");
        }
    }
    super::save(&mut store)
}
