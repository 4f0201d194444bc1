use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use anyhow::Context;
use clap::Args;

use mindflow_core::store::MindMapStore;
use mindflow_core::types::{Node, NodeId};

use super::{Workspace, WorkspaceArgs};

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Show every topic, ignoring search and collapsed branches
    #[arg(long)]
    pub all: bool,

    /// Print the annotated render frame as JSON instead of a tree
    #[arg(long, conflicts_with = "all")]
    pub json: bool,
}

pub fn run(args: &ShowArgs) -> anyhow::Result<()> {
    let workspace = Workspace::resolve(&args.workspace)?;
    let store = workspace.open_store()?;

    if args.json {
        let frame = store.render_frame(workspace.render_options());
        let json = serde_json::to_string_pretty(&frame).context("Cannot serialize render frame")?;
        println!("{json}");
        return Ok(());
    }

    print!("{}", format_tree(&store, args.all));
    Ok(())
}

/// Render the map as an indented outline.
///
/// By default only the visibility projection is printed. With `all`, every
/// node is printed, and nodes that cannot be reached from the root are listed
/// separately.
pub fn format_tree(store: &MindMapStore, all: bool) -> String {
    let mut out = String::new();

    let nodes: Vec<&Node> = if all {
        store.nodes().iter().collect()
    } else {
        store.visible().nodes
    };

    if !all && !store.search_query().is_empty() {
        let _ = writeln!(
            out,
            "Showing results for \"{}\" ({} topics)",
            store.search_query(),
            nodes.len()
        );
    }
    if nodes.is_empty() {
        out.push_str("(nothing to show)\n");
        return out;
    }

    let present: HashSet<&NodeId> = nodes.iter().map(|n| &n.id).collect();
    let mut children: HashMap<&NodeId, Vec<&Node>> = HashMap::new();
    for &node in &nodes {
        if let Some(parent) = node.parent_id.as_ref().filter(|p| present.contains(p)) {
            children.entry(parent).or_default().push(node);
        }
    }

    let mut printed: HashSet<&NodeId> = HashSet::new();
    for &node in nodes.iter().filter(|n| n.is_root()) {
        write_branch(&mut out, store, node, &children, 0, &mut printed);
    }

    let unattached: Vec<&Node> = nodes
        .iter()
        .copied()
        .filter(|n| !printed.contains(&n.id))
        .collect();
    if !unattached.is_empty() {
        out.push_str("(unattached)\n");
        for node in unattached {
            if !printed.contains(&node.id) {
                write_branch(&mut out, store, node, &children, 1, &mut printed);
            }
        }
    }
    out
}

fn write_branch<'a>(
    out: &mut String,
    store: &MindMapStore,
    node: &'a Node,
    children: &HashMap<&NodeId, Vec<&'a Node>>,
    depth: usize,
    printed: &mut HashSet<&'a NodeId>,
) {
    if !printed.insert(&node.id) {
        return;
    }

    let marker = if store.get_child_nodes(&node.id).is_empty() {
        '•'
    } else if node.data.expanded {
        '▾'
    } else {
        '▸'
    };
    let _ = write!(
        out,
        "{:indent$}{marker} {} [{}]",
        "",
        node.data.label,
        node.id,
        indent = depth * 2
    );
    if store.selected_node_id() == Some(&node.id) {
        out.push_str(" *");
    }
    if let Some(priority) = node.data.priority {
        let _ = write!(out, " ({priority})");
    }
    for tag in node.data.tags.iter().flatten() {
        let _ = write!(out, " #{tag}");
    }
    if let Some(attachment) = &node.data.attachment {
        let _ = write!(out, " <{}>", attachment.url);
    }
    out.push('\n');

    for &child in children.get(&node.id).into_iter().flatten() {
        write_branch(out, store, child, children, depth + 1, printed);
    }
}
