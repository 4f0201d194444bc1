//! Data contract with the external diagram component: annotated visible
//! nodes/edges going out, canvas events coming back.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::{EdgeRouting, RenderSection, Theme};
use crate::types::{DEFAULT_COLOR, Edge, MindMapState, Node, NodeId, Position};
use crate::visibility::{self, VisibleGraph};

/// Render type tag the diagram component maps to the mind-node widget.
pub const NODE_RENDER_TYPE: &str = "mindNode";

const SELECTED_STROKE_WIDTH: f64 = 2.5;
const MARKER_SIZE: f64 = 15.0;

/// Theme and routing applied to a whole frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub theme: Theme,
    pub routing: EdgeRouting,
}

impl From<&RenderSection> for RenderOptions {
    fn from(section: &RenderSection) -> Self {
        Self {
            theme: section.theme,
            routing: section.routing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeStyle {
    pub stroke: String,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl StrokeStyle {
    /// Default stroke for edges not adjacent to the selection.
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                stroke: "#94A3B8".to_string(),
                stroke_width: 2.0,
                opacity: 0.7,
            },
            Theme::Light => Self {
                stroke: "#475569".to_string(),
                stroke_width: 2.0,
                opacity: 0.8,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    ArrowClosed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeMarker {
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    pub width: f64,
    pub height: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode<'a> {
    pub render_type: &'static str,
    pub node: &'a Node,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    pub animated: bool,
    pub highlighted: bool,
    pub style: StrokeStyle,
    pub marker_end: EdgeMarker,
    #[serde(rename = "type")]
    pub routing: EdgeRouting,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Shown while a search is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    pub query: String,
    pub visible_nodes: usize,
}

/// Everything the diagram component needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame<'a> {
    pub nodes: Vec<RenderNode<'a>>,
    pub edges: Vec<RenderEdge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchSummary>,
}

/// Project the state and annotate the result for rendering.
pub fn render_frame<'a>(state: &'a MindMapState, options: RenderOptions) -> RenderFrame<'a> {
    let visible = visibility::project(&state.nodes, &state.edges, &state.search_query);
    let edges = style_edges(&visible, state.selected_node_id.as_ref(), options);
    let search = (!state.search_query.is_empty()).then(|| SearchSummary {
        query: state.search_query.clone(),
        visible_nodes: visible.nodes.len(),
    });
    RenderFrame {
        nodes: visible
            .nodes
            .iter()
            .map(|&node| RenderNode {
                render_type: NODE_RENDER_TYPE,
                node,
            })
            .collect(),
        edges,
        search,
    }
}

/// Compute per-edge presentation. Edges touching the selection are highlighted
/// in their source node's colour; all others take the theme default.
pub fn style_edges(
    visible: &VisibleGraph<'_>,
    selected: Option<&NodeId>,
    options: RenderOptions,
) -> Vec<RenderEdge> {
    let base = StrokeStyle::for_theme(options.theme);
    let color_of: HashMap<&NodeId, &str> = visible
        .nodes
        .iter()
        .filter_map(|n| n.data.color.as_deref().map(|c| (&n.id, c)))
        .collect();

    visible
        .edges
        .iter()
        .map(|edge| style_edge(edge, selected, &base, &color_of, options.routing))
        .collect()
}

fn style_edge(
    edge: &Edge,
    selected: Option<&NodeId>,
    base: &StrokeStyle,
    color_of: &HashMap<&NodeId, &str>,
    routing: EdgeRouting,
) -> RenderEdge {
    let highlighted = selected.is_some_and(|id| edge.touches(id));
    let source_color = color_of
        .get(&edge.source)
        .copied()
        .unwrap_or(DEFAULT_COLOR);

    let style = if highlighted {
        StrokeStyle {
            stroke: source_color.to_string(),
            stroke_width: SELECTED_STROKE_WIDTH,
            opacity: 1.0,
        }
    } else {
        base.clone()
    };

    RenderEdge {
        id: edge.id.clone(),
        source: edge.source.clone(),
        target: edge.target.clone(),
        animated: highlighted || edge.animated,
        highlighted,
        marker_end: EdgeMarker {
            kind: MarkerKind::ArrowClosed,
            width: MARKER_SIZE,
            height: MARKER_SIZE,
            color: style.stroke.clone(),
        },
        style,
        routing,
        label: edge.label.clone(),
    }
}

/// Events coming back from the diagram component.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// A node was dragged.
    PositionChanged { id: NodeId, position: Position },
    /// A node was clicked.
    NodeClicked(NodeId),
    /// Empty canvas was clicked.
    PaneClicked,
    /// The user drew a connection between two handles.
    Connect { source: NodeId, target: NodeId },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConnectionType, NodeData, NodeKind};

    fn node(id: &str, parent: Option<&str>, color: Option<&str>) -> Node {
        let mut data = NodeData::new(id);
        data.color = color.map(str::to_string);
        Node {
            id: NodeId::from(id),
            kind: NodeKind::Child,
            data,
            position: Position::default(),
            parent_id: parent.map(NodeId::from),
            connection_type: None,
        }
    }

    fn state() -> MindMapState {
        MindMapState {
            nodes: vec![
                node("root", None, Some("#111111")),
                node("a", Some("root"), None),
                node("b", Some("a"), None),
            ],
            edges: vec![
                Edge::tree(NodeId::from("root"), NodeId::from("a"), ConnectionType::Standard),
                Edge::tree(NodeId::from("a"), NodeId::from("b"), ConnectionType::Middle),
            ],
            selected_node_id: None,
            search_query: String::new(),
        }
    }

    #[test]
    fn nodes_carry_render_type() {
        let state = state();
        let frame = render_frame(&state, RenderOptions::default());
        assert_eq!(frame.nodes.len(), 3);
        assert!(frame.nodes.iter().all(|n| n.render_type == NODE_RENDER_TYPE));
        assert!(frame.search.is_none());
    }

    #[test]
    fn unselected_edges_use_theme_stroke() {
        let state = state();
        let frame = render_frame(
            &state,
            RenderOptions {
                theme: Theme::Light,
                routing: EdgeRouting::Straight,
            },
        );
        let edge = &frame.edges[0];
        assert!(!edge.highlighted);
        assert!(!edge.animated);
        assert_eq!(edge.style, StrokeStyle::for_theme(Theme::Light));
        assert_eq!(edge.marker_end.color, "#475569");
        assert_eq!(edge.routing, EdgeRouting::Straight);
        // Middle edges keep their own animation flag.
        assert!(frame.edges[1].animated);
    }

    #[test]
    fn selected_adjacent_edges_are_highlighted() {
        let mut state = state();
        state.selected_node_id = Some(NodeId::from("a"));
        let frame = render_frame(&state, RenderOptions::default());

        let into_a = &frame.edges[0];
        assert!(into_a.highlighted);
        assert!(into_a.animated);
        assert_eq!(into_a.style.stroke, "#111111");
        assert!((into_a.style.stroke_width - 2.5).abs() < f64::EPSILON);
        assert!((into_a.style.opacity - 1.0).abs() < f64::EPSILON);
        assert_eq!(into_a.marker_end.color, "#111111");

        // Source `a` has no colour, so the default accent applies.
        let out_of_a = &frame.edges[1];
        assert!(out_of_a.highlighted);
        assert_eq!(out_of_a.style.stroke, DEFAULT_COLOR);
    }

    #[test]
    fn search_summary_counts_visible_nodes() {
        let mut state = state();
        state.search_query = "b".into();
        let frame = render_frame(&state, RenderOptions::default());
        let summary = frame.search.unwrap();
        assert_eq!(summary.query, "b");
        assert_eq!(summary.visible_nodes, 3);
    }

    #[test]
    fn frame_serializes_for_the_canvas() {
        let state = state();
        let frame = render_frame(&state, RenderOptions::default());
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["nodes"][0]["renderType"], "mindNode");
        assert_eq!(json["edges"][0]["type"], "smoothstep");
        assert_eq!(json["edges"][0]["markerEnd"]["type"], "arrowclosed");
        assert_eq!(json["edges"][0]["style"]["strokeWidth"], 2.0);
    }
}
