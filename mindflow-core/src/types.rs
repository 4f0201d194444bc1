use serde::{Deserialize, Serialize};

// ── Identifiers ────────────────────────────────────────────────────

/// Id of the single tree root. Fixed for every map, including templates.
pub const ROOT_ID: &str = "root";

/// Label given to freshly created topics.
pub const DEFAULT_LABEL: &str = "New Topic";

/// Label and colour of the root created by a fresh or cleared store.
pub const ROOT_LABEL: &str = "Main Topic";
pub const DEFAULT_COLOR: &str = "#9b87f5";

/// Stroke used for edges created through a middle connection.
pub const MIDDLE_EDGE_COLOR: &str = "#6366F1";

/// String id of a node. Session-stable; `"root"` for the tree root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn root() -> Self {
        Self(ROOT_ID.to_string())
    }

    /// A fresh random id for a newly created node.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_ID
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ── Node types ─────────────────────────────────────────────────────

/// Role of a node in the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// The single entry point of the tree.
    Root,
    /// An ordinary hierarchical child.
    #[default]
    Child,
    /// A node attached as an auxiliary link rather than a strict child.
    Middle,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Child => "child",
            Self::Middle => "middle",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a node was attached to its parent. Drives edge styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    #[default]
    Standard,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// Animation styles offered by the node editor. Stored on nodes as plain strings.
pub const ANIMATION_STYLES: &[&str] = &["pulse", "float", "glow", "none"];

/// Colour palette offered by the node editor.
pub const COLOR_PALETTE: &[&str] = &[
    "#9b87f5", "#67C9BB", "#FF9473", "#6C95FF", "#FFD700", "#FF66B3", "#A4D4AE", "#FF5252",
    "#66D9EF",
];

/// Whether `color` is one of the palette swatches, ignoring hex digit case.
pub fn is_palette_color(color: &str) -> bool {
    COLOR_PALETTE
        .iter()
        .any(|swatch| swatch.eq_ignore_ascii_case(color.trim()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Link,
    File,
}

/// A single external resource referenced by a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl Attachment {
    /// Build an attachment the way the editor does: an empty title falls back to the URL.
    pub fn new(kind: AttachmentKind, url: impl Into<String>, title: Option<String>) -> Self {
        let url = url.into();
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| url.clone());
        Self {
            kind,
            url,
            title: Some(title),
            preview: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// User-editable content of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub label: String,
    pub expanded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl NodeData {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            expanded: true,
            color: None,
            animation: None,
            attachment: None,
            notes: None,
            tags: None,
            priority: None,
        }
    }

    /// Add a tag, trimming whitespace. Empty and duplicate tags are ignored.
    /// Returns whether the tag set changed.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        let tags = self.tags.get_or_insert_with(Vec::new);
        if tags.iter().any(|t| t == tag) {
            return false;
        }
        tags.push(tag.to_string());
        true
    }

    /// Remove a tag. An emptied tag set is dropped entirely.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let Some(tags) = self.tags.as_mut() else {
            return false;
        };
        let before = tags.len();
        tags.retain(|t| t != tag.trim());
        let changed = tags.len() != before;
        if tags.is_empty() {
            self.tags = None;
        }
        changed
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags
            .as_ref()
            .is_some_and(|tags| tags.iter().any(|t| t == tag))
    }
}

/// A labeled unit of the mind map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    pub data: NodeData,
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<ConnectionType>,
}

impl Node {
    /// The default root of a fresh map.
    pub fn default_root() -> Self {
        let mut data = NodeData::new(ROOT_LABEL);
        data.color = Some(DEFAULT_COLOR.to_string());
        Self {
            id: NodeId::root(),
            kind: NodeKind::Root,
            data,
            position: Position::default(),
            parent_id: None,
            connection_type: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.id.is_root()
    }

    pub fn label(&self) -> &str {
        &self.data.label
    }
}

// ── Edge types ─────────────────────────────────────────────────────

/// Whether an edge mirrors a `parentId` link or was drawn by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Standard,
    Custom,
}

/// Per-edge stroke override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

/// A visual connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub animated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<EdgeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EdgeKind>,
}

impl Edge {
    /// Deterministic id for a `(source, target)` pair.
    pub fn id_for(source: &NodeId, target: &NodeId) -> String {
        format!("e-{source}-{target}")
    }

    /// The tree edge materializing `target.parentId == source`.
    pub fn tree(source: NodeId, target: NodeId, connection: ConnectionType) -> Self {
        let middle = connection == ConnectionType::Middle;
        Self {
            id: Self::id_for(&source, &target),
            source,
            target,
            animated: middle,
            style: middle.then(|| EdgeStyle {
                stroke: Some(MIDDLE_EDGE_COLOR.to_string()),
                stroke_width: Some(2.0),
            }),
            label: None,
            kind: Some(EdgeKind::Standard),
        }
    }

    /// A cosmetic edge drawn by hand on the canvas.
    pub fn custom(source: NodeId, target: NodeId, stroke: impl Into<String>) -> Self {
        Self {
            id: Self::id_for(&source, &target),
            source,
            target,
            animated: false,
            style: Some(EdgeStyle {
                stroke: Some(stroke.into()),
                stroke_width: Some(2.0),
            }),
            label: None,
            kind: Some(EdgeKind::Custom),
        }
    }

    pub fn touches(&self, id: &NodeId) -> bool {
        &self.source == id || &self.target == id
    }
}

// ── Graph state ────────────────────────────────────────────────────

/// A bare node/edge set, as imported, exported, or supplied by a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// The full persisted state of a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMapState {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub selected_node_id: Option<NodeId>,
    #[serde(default)]
    pub search_query: String,
}

impl Default for MindMapState {
    fn default() -> Self {
        Self {
            nodes: vec![Node::default_root()],
            edges: Vec::new(),
            selected_node_id: None,
            search_query: String::new(),
        }
    }
}

impl MindMapState {
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }
}

/// A shallow patch over [`NodeData`]. `None` leaves a field untouched;
/// for optional fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(clippy::option_option)]
pub struct NodePatch {
    pub label: Option<String>,
    pub expanded: Option<bool>,
    pub color: Option<Option<String>>,
    pub animation: Option<Option<String>>,
    pub attachment: Option<Option<Attachment>>,
    pub notes: Option<Option<String>>,
    pub tags: Option<Option<Vec<String>>>,
    pub priority: Option<Option<Priority>>,
}

impl NodePatch {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn color(mut self, color: Option<String>) -> Self {
        self.color = Some(color);
        self
    }

    pub fn animation(mut self, animation: Option<String>) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn attachment(mut self, attachment: Option<Attachment>) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Empty notes clear the field, as the editor form does.
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = Some(notes.filter(|n| !n.is_empty()));
        self
    }

    /// An empty tag list clears the field; duplicates collapse to the first occurrence.
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        let mut data = NodeData::new("");
        for tag in &tags {
            data.add_tag(tag);
        }
        self.tags = Some(data.tags);
        self
    }

    pub fn priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the set fields into `data`.
    pub fn apply(self, data: &mut NodeData) {
        if let Some(label) = self.label {
            data.label = label;
        }
        if let Some(expanded) = self.expanded {
            data.expanded = expanded;
        }
        if let Some(color) = self.color {
            data.color = color;
        }
        if let Some(animation) = self.animation {
            data.animation = animation;
        }
        if let Some(attachment) = self.attachment {
            data.attachment = attachment;
        }
        if let Some(notes) = self.notes {
            data.notes = notes;
        }
        if let Some(tags) = self.tags {
            data.tags = tags;
        }
        if let Some(priority) = self.priority {
            data.priority = priority;
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────
