use clap::Args;

use mindflow_core::render::CanvasEvent;
use mindflow_core::types::Position;

use super::{Workspace, WorkspaceArgs};

#[derive(Args, Debug)]
pub struct MoveArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Topic id
    pub id: String,

    #[arg(allow_negative_numbers = true)]
    pub x: f64,

    #[arg(allow_negative_numbers = true)]
    pub y: f64,
}

pub fn run(args: &MoveArgs) -> anyhow::Result<()> {
    let workspace = Workspace::resolve(&args.workspace)?;
    let mut store = workspace.open_store()?;
    let id = super::node_id(&args.id);
    super::require_node(&store, &id)?;

    store.apply_event(CanvasEvent::PositionChanged {
        id: id.clone(),
        position: Position::new(args.x, args.y),
    });
    super::save(&mut store)?;
    println!("Moved {id} to ({}, {})", args.x, args.y);
    Ok(())
}
