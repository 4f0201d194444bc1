//! Render-time projection of the store: search filtering followed by
//! expansion filtering. Pure functions over borrowed state, cheap enough to
//! recompute on every frame.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::types::{Edge, Node, NodeId};

/// The node/edge subset to display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleGraph<'a> {
    pub nodes: Vec<&'a Node>,
    pub edges: Vec<&'a Edge>,
}

impl VisibleGraph<'_> {
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.iter().any(|n| &n.id == id)
    }

    pub fn node_ids(&self) -> HashSet<&NodeId> {
        self.nodes.iter().map(|n| &n.id).collect()
    }
}

/// Ids of nodes whose label contains `query`, ignoring case.
pub fn label_matches<'a>(nodes: &'a [Node], query: &str) -> HashSet<&'a NodeId> {
    let needle = query.to_lowercase();
    nodes
        .iter()
        .filter(|n| n.data.label.to_lowercase().contains(&needle))
        .map(|n| &n.id)
        .collect()
}

/// Keep label matches and every ancestor of a match.
///
/// An empty query passes everything through. Edges survive only when both
/// endpoints are kept.
pub fn search_filter<'a>(nodes: &'a [Node], edges: &'a [Edge], query: &str) -> VisibleGraph<'a> {
    if query.is_empty() {
        return VisibleGraph {
            nodes: nodes.iter().collect(),
            edges: edges.iter().collect(),
        };
    }

    let parent_of: HashMap<&NodeId, &NodeId> = nodes
        .iter()
        .filter_map(|n| n.parent_id.as_ref().map(|p| (&n.id, p)))
        .collect();

    let mut included = label_matches(nodes, query);
    let matches: Vec<&NodeId> = included.iter().copied().collect();
    for matched in matches {
        let mut current = matched;
        // Stops at the first ancestor already included, which also bounds cycles.
        while let Some(&parent) = parent_of.get(current) {
            if !included.insert(parent) {
                break;
            }
            current = parent;
        }
    }

    VisibleGraph {
        nodes: nodes.iter().filter(|n| included.contains(&n.id)).collect(),
        edges: edges
            .iter()
            .filter(|e| included.contains(&e.source) && included.contains(&e.target))
            .collect(),
    }
}

/// Keep the root and every node whose whole ancestor chain is present and expanded.
///
/// Walks top-down from the root, so the result does not depend on list order.
pub fn expansion_filter<'a>(graph: &VisibleGraph<'a>) -> VisibleGraph<'a> {
    let mut children: HashMap<&NodeId, Vec<&'a Node>> = HashMap::new();
    for &node in &graph.nodes {
        if let Some(parent) = node.parent_id.as_ref() {
            children.entry(parent).or_default().push(node);
        }
    }

    let mut visible: HashSet<&NodeId> = HashSet::new();
    let mut queue: VecDeque<&'a Node> = graph
        .nodes
        .iter()
        .copied()
        .filter(|n| n.is_root())
        .collect();
    while let Some(node) = queue.pop_front() {
        if !visible.insert(&node.id) {
            continue;
        }
        if !node.data.expanded {
            continue;
        }
        if let Some(kids) = children.get(&node.id) {
            queue.extend(kids.iter().copied());
        }
    }

    VisibleGraph {
        nodes: graph
            .nodes
            .iter()
            .copied()
            .filter(|n| visible.contains(&n.id))
            .collect(),
        edges: graph
            .edges
            .iter()
            .copied()
            .filter(|e| visible.contains(&e.source) && visible.contains(&e.target))
            .collect(),
    }
}

/// Search filter, then expansion filter.
pub fn project<'a>(nodes: &'a [Node], edges: &'a [Edge], query: &str) -> VisibleGraph<'a> {
    expansion_filter(&search_filter(nodes, edges, query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConnectionType, NodeData, NodeKind, Position};

    fn node(id: &str, label: &str, parent: Option<&str>, expanded: bool) -> Node {
        let mut data = NodeData::new(label);
        data.expanded = expanded;
        Node {
            id: NodeId::from(id),
            kind: if parent.is_none() {
                NodeKind::Root
            } else {
                NodeKind::Child
            },
            data,
            position: Position::default(),
            parent_id: parent.map(NodeId::from),
            connection_type: None,
        }
    }

    fn tree_edge(source: &str, target: &str) -> Edge {
        Edge::tree(
            NodeId::from(source),
            NodeId::from(target),
            ConnectionType::Standard,
        )
    }

    fn ids<'a>(graph: &'a VisibleGraph<'_>) -> Vec<&'a str> {
        graph.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn empty_query_passes_through() {
        let nodes = vec![node("root", "Root", None, true), node("a", "A", Some("root"), true)];
        let edges = vec![tree_edge("root", "a")];
        let out = search_filter(&nodes, &edges, "");
        assert_eq!(out.nodes.len(), 2);
        assert_eq!(out.edges.len(), 1);
    }

    #[test]
    fn search_includes_ancestors_of_matches() {
        let nodes = vec![
            node("root", "Project", None, true),
            node("resources", "Resources", Some("root"), true),
            node("budget", "Budget", Some("resources"), false),
            node("team", "Team", Some("resources"), false),
            node("timeline", "Timeline", Some("root"), true),
        ];
        let edges = vec![
            tree_edge("root", "resources"),
            tree_edge("resources", "budget"),
            tree_edge("resources", "team"),
            tree_edge("root", "timeline"),
        ];
        let out = search_filter(&nodes, &edges, "bUdGeT");
        assert_eq!(ids(&out), ["root", "resources", "budget"]);
        assert_eq!(out.edges.len(), 2);
    }

    #[test]
    fn no_match_yields_nothing() {
        let nodes = vec![node("root", "Root", None, true)];
        let out = project(&nodes, &[], "zzz");
        assert!(out.nodes.is_empty());
    }

    #[test]
    fn collapsed_parent_hides_children() {
        let nodes = vec![
            node("root", "Root", None, true),
            node("a", "A", Some("root"), false),
            node("b", "B", Some("a"), true),
        ];
        let edges = vec![tree_edge("root", "a"), tree_edge("a", "b")];
        let out = project(&nodes, &edges, "");
        assert_eq!(ids(&out), ["root", "a"]);
        assert_eq!(out.edges.len(), 1);
    }

    #[test]
    fn collapsed_root_shows_only_root() {
        let nodes = vec![node("root", "Root", None, false), node("a", "A", Some("root"), true)];
        let out = project(&nodes, &[], "");
        assert_eq!(ids(&out), ["root"]);
    }

    #[test]
    fn visibility_ignores_list_order() {
        // Grandchild listed before its parent.
        let nodes = vec![
            node("c", "C", Some("b"), true),
            node("b", "B", Some("a"), true),
            node("a", "A", Some("root"), true),
            node("root", "Root", None, true),
        ];
        let out = project(&nodes, &[], "");
        assert_eq!(ids(&out), ["c", "b", "a", "root"]);
    }

    #[test]
    fn hidden_ancestor_hides_deep_descendants() {
        let nodes = vec![
            node("root", "Root", None, true),
            node("a", "A", Some("root"), false),
            node("b", "B", Some("a"), true),
            node("c", "C", Some("b"), true),
        ];
        let out = project(&nodes, &[], "");
        assert_eq!(ids(&out), ["root", "a"]);
    }

    #[test]
    fn floating_and_orphaned_nodes_are_invisible() {
        let nodes = vec![
            node("root", "Root", None, true),
            node("float", "Float", None, true),
            node("orphan", "Orphan", Some("ghost"), true),
        ];
        let out = project(&nodes, &[], "");
        assert_eq!(ids(&out), ["root"]);
    }

    #[test]
    fn manual_edge_needs_both_endpoints_visible() {
        let nodes = vec![
            node("root", "Root", None, true),
            node("a", "A", Some("root"), false),
            node("b", "B", Some("a"), true),
        ];
        let manual = Edge::custom(NodeId::from("root"), NodeId::from("b"), "#fff");
        let edges = vec![tree_edge("root", "a"), manual];
        let out = project(&nodes, &edges, "");
        assert_eq!(out.edges.len(), 1);
        assert_eq!(out.edges[0].id, "e-root-a");
    }

    #[test]
    fn search_then_expansion_respects_collapsed_ancestor() {
        let nodes = vec![
            node("root", "Root", None, true),
            node("a", "Alpha", Some("root"), false),
            node("b", "Beta", Some("a"), true),
        ];
        let out = project(&nodes, &[], "beta");
        assert_eq!(ids(&out), ["root", "a"]);
        assert!(!out.contains(&NodeId::from("b")));
    }

    #[test]
    fn search_closure_survives_parent_cycles() {
        let nodes = vec![
            node("x", "loop x", Some("y"), true),
            node("y", "loop y", Some("x"), true),
        ];
        let out = search_filter(&nodes, &[], "x");
        assert_eq!(out.nodes.len(), 2);
    }
}
