//! Structural validation run at every import boundary.
//!
//! The store keeps the tree as a flat list of parent pointers. Before a
//! caller-supplied graph replaces the current one, this pass makes sure every
//! `parentId` resolves, no parent chain loops, a root exists, and no edge
//! points at a missing node. Under [`ImportPolicy::Repair`] offending pieces
//! are dropped; under [`ImportPolicy::Strict`] the graph is rejected.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ImportPolicy;
use crate::error::TransferError;
use crate::types::{GraphSnapshot, Node, NodeId};

/// What the validation pass found and fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Later occurrences of an already-seen node id.
    pub duplicate_nodes: usize,
    /// No `root` node was supplied and a fresh one was inserted.
    pub inserted_root: bool,
    /// The root carried a `parentId`, which was cleared.
    pub root_parent_cleared: bool,
    /// Nodes whose `parentId` names no node in the set.
    pub dangling_parents: Vec<NodeId>,
    /// Nodes whose parent chain loops back on itself.
    pub cyclic_nodes: Vec<NodeId>,
    /// Nodes removed because their ancestry is broken (includes descendants).
    pub dropped_nodes: usize,
    /// Edges removed because an endpoint is missing.
    pub dropped_edges: usize,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return f.write_str("no structural problems");
        }
        let mut parts = Vec::new();
        if self.duplicate_nodes > 0 {
            parts.push(format!("{} duplicate node id(s)", self.duplicate_nodes));
        }
        if self.inserted_root {
            parts.push("missing root".to_string());
        }
        if self.root_parent_cleared {
            parts.push("root had a parent".to_string());
        }
        if !self.dangling_parents.is_empty() {
            parts.push(format!(
                "{} unresolved parent reference(s)",
                self.dangling_parents.len()
            ));
        }
        if !self.cyclic_nodes.is_empty() {
            parts.push(format!("{} node(s) in a parent cycle", self.cyclic_nodes.len()));
        }
        if self.dropped_nodes > 0 {
            parts.push(format!("{} unreachable node(s)", self.dropped_nodes));
        }
        if self.dropped_edges > 0 {
            parts.push(format!("{} dangling edge(s)", self.dropped_edges));
        }
        f.write_str(&parts.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ancestry {
    /// The parent chain ends at a node with no parent.
    Anchored,
    /// The chain hits a missing parent or loops.
    Broken,
}

/// Validate `snapshot` and return the graph to install alongside a report.
pub fn validate_graph(
    snapshot: GraphSnapshot,
    policy: ImportPolicy,
) -> Result<(GraphSnapshot, ImportReport), TransferError> {
    let GraphSnapshot { nodes, edges } = snapshot;
    let mut report = ImportReport::default();

    // Duplicate ids: first occurrence wins.
    let mut seen: HashSet<NodeId> = HashSet::with_capacity(nodes.len());
    let mut nodes: Vec<Node> = nodes
        .into_iter()
        .filter(|n| {
            let fresh = seen.insert(n.id.clone());
            if !fresh {
                report.duplicate_nodes += 1;
            }
            fresh
        })
        .collect();

    match nodes.iter_mut().find(|n| n.is_root()) {
        Some(root) => {
            if root.parent_id.take().is_some() {
                report.root_parent_cleared = true;
            }
        }
        None => {
            report.inserted_root = true;
            nodes.insert(0, Node::default_root());
        }
    }

    let broken = find_broken_ancestry(&nodes, &mut report);
    report.dropped_nodes = broken.len();

    let edge_count = edges.len();
    let kept: HashSet<&NodeId> = nodes
        .iter()
        .filter(|n| !broken.contains(&n.id))
        .map(|n| &n.id)
        .collect();
    let edges: Vec<_> = edges
        .into_iter()
        .filter(|e| kept.contains(&e.source) && kept.contains(&e.target))
        .collect();
    report.dropped_edges = edge_count - edges.len();

    if policy == ImportPolicy::Strict && !report.is_clean() {
        warn!(%report, "Rejecting import under strict policy");
        return Err(TransferError::Validation(report.to_string()));
    }

    nodes.retain(|n| !broken.contains(&n.id));
    if report.is_clean() {
        debug!(nodes = nodes.len(), edges = edges.len(), "Import validated");
    } else {
        warn!(%report, "Repaired imported mind map");
    }

    Ok((GraphSnapshot { nodes, edges }, report))
}

/// Ids of every node whose parent chain never reaches a parentless node.
fn find_broken_ancestry(nodes: &[Node], report: &mut ImportReport) -> HashSet<NodeId> {
    let parent_of: HashMap<&str, Option<&str>> = nodes
        .iter()
        .map(|n| (n.id.as_str(), n.parent_id.as_ref().map(NodeId::as_str)))
        .collect();

    let mut resolved: HashMap<&str, Ancestry> = HashMap::with_capacity(nodes.len());

    for node in nodes {
        let mut path: Vec<&str> = Vec::new();
        let mut on_path: HashSet<&str> = HashSet::new();
        let mut current = node.id.as_str();

        let outcome = loop {
            if let Some(&known) = resolved.get(current) {
                break known;
            }
            if !on_path.insert(current) {
                let start = path.iter().position(|p| *p == current).unwrap_or(0);
                report
                    .cyclic_nodes
                    .extend(path[start..].iter().map(|id| NodeId::from(*id)));
                break Ancestry::Broken;
            }
            path.push(current);
            match parent_of.get(current).copied().flatten() {
                None => break Ancestry::Anchored,
                Some(parent) if !parent_of.contains_key(parent) => {
                    report.dangling_parents.push(NodeId::from(current));
                    break Ancestry::Broken;
                }
                Some(parent) => current = parent,
            }
        };

        for id in path {
            resolved.insert(id, outcome);
        }
    }

    nodes
        .iter()
        .filter(|n| resolved.get(n.id.as_str()) == Some(&Ancestry::Broken))
        .map(|n| n.id.clone())
        .collect()
}
