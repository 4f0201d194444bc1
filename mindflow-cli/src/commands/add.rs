use clap::Args;

use mindflow_core::types::{ConnectionType, NodeId, NodePatch, Position};

use super::{Workspace, WorkspaceArgs};

#[derive(Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Parent topic id (default: the root)
    #[arg(long, conflicts_with = "floating")]
    pub parent: Option<String>,

    /// Create a topic with no parent
    #[arg(long)]
    pub floating: bool,

    /// Attach as a middle connection instead of a standard child
    #[arg(long)]
    pub middle: bool,

    /// Canvas x coordinate (requires --y)
    #[arg(long, requires = "y", allow_negative_numbers = true)]
    pub x: Option<f64>,

    /// Canvas y coordinate (requires --x)
    #[arg(long, requires = "x", allow_negative_numbers = true)]
    pub y: Option<f64>,

    /// Label for the new topic
    #[arg(long)]
    pub label: Option<String>,
}

pub fn run(args: AddArgs) -> anyhow::Result<()> {
    let workspace = Workspace::resolve(&args.workspace)?;
    let mut store = workspace.open_store()?;

    let parent = if args.floating {
        None
    } else {
        let id = args.parent.as_deref().map_or_else(NodeId::root, super::node_id);
        super::require_node(&store, &id)?;
        Some(id)
    };
    let position = args.x.zip(args.y).map(|(x, y)| Position::new(x, y));
    let connection = if args.middle {
        ConnectionType::Middle
    } else {
        ConnectionType::Standard
    };

    let id = store.add_node(parent.as_ref(), position, connection);
    if let Some(label) = args.label {
        store.update_node_data(&id, NodePatch::default().label(label));
    }
    super::save(&mut store)?;

    match parent {
        Some(parent) => println!("Added {id} under {parent}"),
        None => println!("Added floating topic {id}"),
    }
    Ok(())
}
