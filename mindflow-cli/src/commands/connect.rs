use clap::Args;

use mindflow_core::render::CanvasEvent;

use super::{Workspace, WorkspaceArgs};

#[derive(Args, Debug)]
pub struct ConnectArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Source topic id
    pub source: String,

    /// Target topic id
    pub target: String,
}

pub fn run(args: &ConnectArgs) -> anyhow::Result<()> {
    let workspace = Workspace::resolve(&args.workspace)?;
    let mut store = workspace.open_store()?;
    let source = super::node_id(&args.source);
    let target = super::node_id(&args.target);
    super::require_node(&store, &source)?;
    super::require_node(&store, &target)?;

    let before = store.edges().len();
    store.apply_event(CanvasEvent::Connect {
        source: source.clone(),
        target: target.clone(),
    });
    super::save(&mut store)?;

    if store.edges().len() > before {
        println!("Connected {source} -> {target}");
    }
    Ok(())
}
