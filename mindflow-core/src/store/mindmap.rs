use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{ImportPolicy, LayoutConfig, MindflowConfig};
use crate::error::{StoreError, TemplateError, TransferError};
use crate::render::{self, CanvasEvent, RenderFrame, RenderOptions};
use crate::templates;
use crate::types::{
    ConnectionType, DEFAULT_COLOR, DEFAULT_LABEL, Edge, EdgeKind, GraphSnapshot, MindMapState,
    Node, NodeData, NodeId, NodeKind, NodePatch, Position,
};
use crate::validate::{self, ImportReport};
use crate::visibility::{self, VisibleGraph};

use super::StateStorage;

#[derive(Debug)]
struct Persistence {
    storage: Box<dyn StateStorage>,
    key: String,
    last_error: Option<String>,
}

/// Single source of truth for one mind map.
///
/// Every mutation is synchronous, replaces state in place, and, when a
/// storage backend is attached, writes the full state back before returning.
/// Operations on unknown node ids are silent no-ops.
#[derive(Debug)]
pub struct MindMapStore {
    state: MindMapState,
    layout: LayoutConfig,
    import_policy: ImportPolicy,
    persistence: Option<Persistence>,
}

/// Summary numbers for status displays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub nodes: usize,
    pub edges: usize,
    pub custom_edges: usize,
    /// Parentless nodes other than the root.
    pub floating_nodes: usize,
    pub collapsed_nodes: usize,
    /// Longest root-to-node path, in edges.
    pub max_depth: usize,
    pub visible_nodes: usize,
}

impl Default for MindMapStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MindMapStore {
    /// A fresh in-memory store holding only the default root.
    pub fn new() -> Self {
        Self {
            state: MindMapState::default(),
            layout: LayoutConfig::default(),
            import_policy: ImportPolicy::default(),
            persistence: None,
        }
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_import_policy(mut self, policy: ImportPolicy) -> Self {
        self.import_policy = policy;
        self
    }

    /// Attach a storage backend and load whatever is persisted under `key`.
    ///
    /// Missing state starts a fresh map. State that no longer decodes is
    /// logged and replaced; there is no migration.
    pub fn open(storage: Box<dyn StateStorage>, key: impl Into<String>) -> crate::error::Result<Self> {
        let key = key.into();
        let state = match storage.load(&key)? {
            Some(json) => match serde_json::from_str::<MindMapState>(&json) {
                Ok(state) => {
                    debug!(key, nodes = state.nodes.len(), "Loaded persisted state");
                    state
                }
                Err(e) => {
                    warn!(key, error = %e, "Discarding undecodable persisted state");
                    MindMapState::default()
                }
            },
            None => {
                debug!(key, "No persisted state, starting fresh");
                MindMapState::default()
            }
        };

        Ok(Self {
            state,
            layout: LayoutConfig::default(),
            import_policy: ImportPolicy::default(),
            persistence: Some(Persistence {
                storage,
                key,
                last_error: None,
            }),
        })
    }

    /// Open with the storage key, layout, and import policy from `config`.
    pub fn from_config(
        storage: Box<dyn StateStorage>,
        config: &MindflowConfig,
    ) -> crate::error::Result<Self> {
        Ok(Self::open(storage, config.storage.key.clone())?
            .with_layout(config.layout)
            .with_import_policy(config.import.policy))
    }

    // ── Reads ──────────────────────────────────────────────────────

    pub fn state(&self) -> &MindMapState {
        &self.state
    }

    pub fn nodes(&self) -> &[Node] {
        &self.state.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.state.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.state.nodes.iter().find(|n| &n.id == id)
    }

    pub fn selected_node_id(&self) -> Option<&NodeId> {
        self.state.selected_node_id.as_ref()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selected_node_id().and_then(|id| self.node(id))
    }

    pub fn search_query(&self) -> &str {
        &self.state.search_query
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.state.snapshot()
    }

    /// Nodes whose `parentId` is `id`, in store order.
    pub fn get_child_nodes(&self, id: &NodeId) -> Vec<&Node> {
        self.state
            .nodes
            .iter()
            .filter(|n| n.parent_id.as_ref() == Some(id))
            .collect()
    }

    /// The current visibility projection (search, then expansion).
    pub fn visible(&self) -> VisibleGraph<'_> {
        visibility::project(
            &self.state.nodes,
            &self.state.edges,
            &self.state.search_query,
        )
    }

    pub fn render_frame(&self, options: RenderOptions) -> RenderFrame<'_> {
        render::render_frame(&self.state, options)
    }

    pub fn stats(&self) -> StoreStats {
        let mut children: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
        for node in &self.state.nodes {
            if let Some(parent) = &node.parent_id {
                children.entry(parent).or_default().push(&node.id);
            }
        }

        let mut max_depth = 0;
        let mut seen: HashSet<&NodeId> = HashSet::new();
        let mut queue: VecDeque<(&NodeId, usize)> = self
            .state
            .nodes
            .iter()
            .filter(|n| n.is_root())
            .map(|n| (&n.id, 0))
            .collect();
        while let Some((id, depth)) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            max_depth = max_depth.max(depth);
            if let Some(kids) = children.get(id) {
                queue.extend(kids.iter().map(|k| (*k, depth + 1)));
            }
        }

        StoreStats {
            nodes: self.state.nodes.len(),
            edges: self.state.edges.len(),
            custom_edges: self
                .state
                .edges
                .iter()
                .filter(|e| e.kind == Some(EdgeKind::Custom))
                .count(),
            floating_nodes: self
                .state
                .nodes
                .iter()
                .filter(|n| n.parent_id.is_none() && !n.is_root())
                .count(),
            collapsed_nodes: self.state.nodes.iter().filter(|n| !n.data.expanded).count(),
            max_depth,
            visible_nodes: self.visible().nodes.len(),
        }
    }

    // ── Node mutations ─────────────────────────────────────────────

    /// Create a node under `parent_id` and select it. Returns the new id.
    ///
    /// Without an explicit position, a middle connection sits at a small
    /// fixed offset from the parent, and a standard child is stepped down by
    /// the parent's current child count so siblings do not overlap. A parent
    /// id that does not resolve yields a parentless node at the origin (or at
    /// the supplied position) with no edge.
    pub fn add_node(
        &mut self,
        parent_id: Option<&NodeId>,
        initial_position: Option<Position>,
        connection: ConnectionType,
    ) -> NodeId {
        let id = NodeId::generate();
        let parent = parent_id.and_then(|pid| self.node(pid));

        if let (None, Some(pid)) = (parent, parent_id) {
            warn!(parent = %pid, "Parent not found, creating a floating node");
        }

        let position = match (initial_position, parent) {
            (Some(position), _) => position,
            (None, Some(parent)) => match connection {
                ConnectionType::Middle => parent
                    .position
                    .offset(self.layout.middle_offset_x, self.layout.middle_offset_y),
                ConnectionType::Standard => {
                    let siblings = self.get_child_nodes(&parent.id).len();
                    #[allow(clippy::cast_precision_loss)]
                    let step = siblings as f64 * self.layout.child_spacing_y;
                    parent.position.offset(self.layout.child_offset_x, step)
                }
            },
            (None, None) => Position::default(),
        };

        let parent_id = parent.map(|p| p.id.clone());
        let node = Node {
            id: id.clone(),
            kind: match connection {
                ConnectionType::Standard => NodeKind::Child,
                ConnectionType::Middle => NodeKind::Middle,
            },
            data: NodeData::new(DEFAULT_LABEL),
            position,
            parent_id: parent_id.clone(),
            connection_type: Some(connection),
        };

        self.state.nodes.push(node);
        if let Some(parent_id) = parent_id {
            self.state
                .edges
                .push(Edge::tree(parent_id, id.clone(), connection));
        }
        self.state.selected_node_id = Some(id.clone());

        debug!(%id, ?connection, x = position.x, y = position.y, "Added node");
        self.commit();
        id
    }

    /// Move a node. Returns whether a node matched.
    pub fn update_node_position(&mut self, id: &NodeId, position: Position) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        node.position = position;
        self.commit();
        true
    }

    /// Shallow-merge `patch` into the node's data. Returns whether a node matched.
    pub fn update_node_data(&mut self, id: &NodeId, patch: NodePatch) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        patch.apply(&mut node.data);
        debug!(%id, "Updated node data");
        self.commit();
        true
    }

    /// Flip a node's `expanded` flag. Returns whether a node matched.
    pub fn toggle_node_expanded(&mut self, id: &NodeId) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        node.data.expanded = !node.data.expanded;
        self.commit();
        true
    }

    /// Delete a node, all of its descendants, and every edge touching any of them.
    ///
    /// Returns the number of nodes removed (0 for an unknown id). The root is
    /// protected. Selection is cleared only when `id` itself was selected.
    pub fn delete_node(&mut self, id: &NodeId) -> Result<usize, StoreError> {
        if id.is_root() {
            warn!("Refusing to delete the root node");
            return Err(StoreError::RootProtected);
        }
        if self.node(id).is_none() {
            return Ok(0);
        }

        let doomed = self.descendants_inclusive(id);
        self.state.nodes.retain(|n| !doomed.contains(&n.id));
        self.state
            .edges
            .retain(|e| !doomed.contains(&e.source) && !doomed.contains(&e.target));
        if self.state.selected_node_id.as_ref() == Some(id) {
            self.state.selected_node_id = None;
        }

        info!(%id, removed = doomed.len(), "Deleted node subtree");
        self.commit();
        Ok(doomed.len())
    }

    /// `id` plus every node reachable from it through `parentId` links.
    fn descendants_inclusive(&self, id: &NodeId) -> HashSet<NodeId> {
        let mut children: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
        for node in &self.state.nodes {
            if let Some(parent) = &node.parent_id {
                children.entry(parent).or_default().push(&node.id);
            }
        }

        let mut collected = HashSet::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if !collected.insert(current.clone()) {
                continue;
            }
            if let Some(kids) = children.get(current) {
                queue.extend(kids.iter().copied());
            }
        }
        collected
    }

    /// Draw a cosmetic edge between two existing nodes. Does not touch `parentId`.
    ///
    /// Returns the new edge id, or `None` when either endpoint is missing.
    pub fn connect_nodes(&mut self, source: &NodeId, target: &NodeId) -> Option<String> {
        let stroke = self
            .node(source)?
            .data
            .color
            .clone()
            .unwrap_or_else(|| DEFAULT_COLOR.to_string());
        self.node(target)?;

        let edge = Edge::custom(source.clone(), target.clone(), stroke);
        let edge_id = edge.id.clone();
        self.state.edges.push(edge);
        debug!(%source, %target, "Connected nodes");
        self.commit();
        Some(edge_id)
    }

    // ── Selection & search ─────────────────────────────────────────

    /// Set or clear the selection.
    pub fn select_node(&mut self, id: Option<NodeId>) {
        self.state.selected_node_id = id;
        self.commit();
    }

    /// Replace the filter string verbatim.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.search_query = query.into();
        self.commit();
    }

    // ── Whole-map operations ───────────────────────────────────────

    /// Reset to a single fresh root. The search query is kept.
    pub fn clear_mind_map(&mut self) {
        self.state.nodes = vec![Node::default_root()];
        self.state.edges.clear();
        self.state.selected_node_id = None;
        info!("Cleared mind map");
        self.commit();
    }

    /// Replace the node/edge set after the validation pass. Clears selection.
    ///
    /// Under the strict policy a defective graph is rejected and the store is
    /// left untouched.
    pub fn import_mind_map(&mut self, snapshot: GraphSnapshot) -> Result<ImportReport, TransferError> {
        let (snapshot, report) = validate::validate_graph(snapshot, self.import_policy)?;
        self.state.nodes = snapshot.nodes;
        self.state.edges = snapshot.edges;
        self.state.selected_node_id = None;
        info!(
            nodes = self.state.nodes.len(),
            edges = self.state.edges.len(),
            "Imported mind map"
        );
        self.commit();
        Ok(report)
    }

    /// Replace the current graph with a template's. Unknown ids change nothing.
    pub fn apply_template(&mut self, template_id: &str) -> crate::error::Result<ImportReport> {
        let template = templates::find(template_id)
            .ok_or_else(|| TemplateError::NotFound(template_id.to_string()))?;
        let report = self.import_mind_map(template.snapshot())?;
        info!(template = template_id, "Applied template");
        Ok(report)
    }

    /// Route an event from the diagram component to the matching operation.
    pub fn apply_event(&mut self, event: CanvasEvent) {
        match event {
            CanvasEvent::PositionChanged { id, position } => {
                self.update_node_position(&id, position);
            }
            CanvasEvent::NodeClicked(id) => self.select_node(Some(id)),
            CanvasEvent::PaneClicked => self.select_node(None),
            CanvasEvent::Connect { source, target } => {
                self.connect_nodes(&source, &target);
            }
        }
    }

    // ── Persistence ────────────────────────────────────────────────

    /// Write the current state now, surfacing any storage error.
    pub fn flush(&mut self) -> crate::error::Result<()> {
        let Some(p) = self.persistence.as_mut() else {
            return Ok(());
        };
        let json = serde_json::to_string(&self.state).map_err(StoreError::Serialization)?;
        p.storage.save(&p.key, &json)?;
        p.last_error = None;
        Ok(())
    }

    /// The most recent persistence failure from a mutation, if any.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.persistence
            .as_ref()
            .and_then(|p| p.last_error.as_deref())
    }

    fn commit(&mut self) {
        if let Err(e) = self.flush() {
            warn!(error = %e, "Failed to persist mind map state");
            if let Some(p) = self.persistence.as_mut() {
                p.last_error = Some(e.to_string());
            }
        }
    }

    fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.state.nodes.iter_mut().find(|n| &n.id == id)
    }
}
