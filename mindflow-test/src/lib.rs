// Integration test utilities and fixture management for MindFlow.

use std::path::{Path, PathBuf};

use mindflow_core::config::{DEFAULT_STORAGE_KEY, MindflowConfig};
use mindflow_core::store::{MindMapStore, SqliteStorage};
use mindflow_core::types::{
    ConnectionType, Edge, GraphSnapshot, Node, NodeData, NodeId, NodeKind, Position,
};

/// A temporary directory holding an on-disk `SQLite` database.
#[derive(Debug)]
pub struct TestWorkspace {
    pub dir: tempfile::TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("mindflow.db")
    }

    /// Open (or reopen) a store persisted in this workspace under the default key.
    pub fn open_store(&self) -> anyhow::Result<MindMapStore> {
        self.open_store_with(&MindflowConfig::default())
    }

    pub fn open_store_with(&self, config: &MindflowConfig) -> anyhow::Result<MindMapStore> {
        let storage = SqliteStorage::open(&self.db_path())?;
        Ok(MindMapStore::from_config(Box::new(storage), config)?)
    }

    /// The raw JSON persisted under the default key, if any.
    pub fn persisted_json(&self) -> anyhow::Result<Option<serde_json::Value>> {
        use mindflow_core::store::StateStorage;

        let storage = SqliteStorage::open(&self.db_path())?;
        match storage.load(DEFAULT_STORAGE_KEY)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent builder for hand-written graphs with readable ids.
///
/// Tree edges are derived from `parentId` unless `without_edges` is used.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    extra_edges: Vec<Edge>,
    derive_edges: bool,
}

impl GraphBuilder {
    /// Start a graph whose root carries `label`.
    pub fn rooted(label: &str) -> Self {
        let mut root = Node::default_root();
        root.data.label = label.to_string();
        Self {
            nodes: vec![root],
            extra_edges: Vec::new(),
            derive_edges: true,
        }
    }

    /// Start a graph with no root at all.
    pub fn rootless() -> Self {
        Self {
            derive_edges: true,
            ..Self::default()
        }
    }

    pub fn child(mut self, id: &str, label: &str, parent: &str) -> Self {
        self.nodes.push(node(id, label, Some(parent)));
        self
    }

    pub fn floating(mut self, id: &str, label: &str) -> Self {
        self.nodes.push(node(id, label, None));
        self
    }

    pub fn collapsed(mut self, id: &str) -> Self {
        if let Some(n) = self.nodes.iter_mut().find(|n| n.id == id) {
            n.data.expanded = false;
        }
        self
    }

    pub fn edge(mut self, source: &str, target: &str) -> Self {
        self.extra_edges
            .push(Edge::custom(NodeId::from(source), NodeId::from(target), "#ffffff"));
        self
    }

    pub fn without_edges(mut self) -> Self {
        self.derive_edges = false;
        self
    }

    pub fn build(self) -> GraphSnapshot {
        let mut edges: Vec<Edge> = if self.derive_edges {
            self.nodes
                .iter()
                .filter_map(|n| {
                    n.parent_id
                        .clone()
                        .map(|p| Edge::tree(p, n.id.clone(), ConnectionType::Standard))
                })
                .collect()
        } else {
            Vec::new()
        };
        edges.extend(self.extra_edges);
        GraphSnapshot {
            nodes: self.nodes,
            edges,
        }
    }
}

/// A plain child node at the origin.
pub fn node(id: &str, label: &str, parent: Option<&str>) -> Node {
    Node {
        id: NodeId::from(id),
        kind: NodeKind::Child,
        data: NodeData::new(label),
        position: Position::default(),
        parent_id: parent.map(NodeId::from),
        connection_type: Some(ConnectionType::Standard),
    }
}

/// The "Launch" map used across scenarios:
///
/// ```text
/// Launch
/// ├── Plan
/// │   ├── Budget
/// │   └── Scope
/// └── Team
///     └── Hiring
/// ```
pub fn launch_plan() -> GraphSnapshot {
    GraphBuilder::rooted("Launch")
        .child("plan", "Plan", "root")
        .child("budget", "Budget", "plan")
        .child("scope", "Scope", "plan")
        .child("team", "Team", "root")
        .child("hiring", "Hiring", "team")
        .build()
}

/// An in-memory store seeded with `snapshot` through the import path.
pub fn store_with(snapshot: GraphSnapshot) -> MindMapStore {
    let mut store = MindMapStore::new();
    store
        .import_mind_map(snapshot)
        .expect("fixture graph should import");
    store
}

/// Labels of the currently visible nodes, in store order.
pub fn visible_labels(store: &MindMapStore) -> Vec<String> {
    store
        .visible()
        .nodes
        .iter()
        .map(|n| n.data.label.clone())
        .collect()
}
