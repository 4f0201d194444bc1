//! Built-in starter maps.
//!
//! Every template node has a stable slug id, and children name their parent
//! by that exact id, so the tree and its edges resolve on import.

use std::sync::LazyLock;

use serde::Serialize;

use crate::types::{
    ConnectionType, DEFAULT_COLOR, Edge, GraphSnapshot, Node, NodeData, NodeId, NodeKind,
    Position, Priority, ROOT_ID,
};

/// A named, pre-built graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub preview_image: Option<&'static str>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Template {
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            id: self.id,
            name: self.name,
            description: self.description,
            tags: self.tags,
            preview_image: self.preview_image,
            node_count: self.nodes.len(),
        }
    }
}

/// Catalog listing entry, without the graph itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub preview_image: Option<&'static str>,
    pub node_count: usize,
}

/// Compact description of one template node.
struct Seed {
    id: &'static str,
    label: &'static str,
    parent: &'static str,
    expanded: bool,
    color: &'static str,
    at: (f64, f64),
    priority: Option<Priority>,
    tags: &'static [&'static str],
    notes: Option<&'static str>,
}

fn topic(
    id: &'static str,
    label: &'static str,
    parent: &'static str,
    color: &'static str,
    at: (f64, f64),
) -> Seed {
    Seed {
        id,
        label,
        parent,
        expanded: false,
        color,
        at,
        priority: None,
        tags: &[],
        notes: None,
    }
}

fn branch(id: &'static str, label: &'static str, color: &'static str, at: (f64, f64)) -> Seed {
    Seed {
        expanded: true,
        ..topic(id, label, ROOT_ID, color, at)
    }
}

impl Seed {
    fn priority(self, priority: Priority) -> Self {
        Self {
            priority: Some(priority),
            ..self
        }
    }

    fn tags(self, tags: &'static [&'static str]) -> Self {
        Self { tags, ..self }
    }

    fn notes(self, notes: &'static str) -> Self {
        Self {
            notes: Some(notes),
            ..self
        }
    }

    fn into_node(self) -> Node {
        let mut data = NodeData::new(self.label);
        data.expanded = self.expanded;
        data.color = Some(self.color.to_string());
        data.priority = self.priority;
        data.notes = self.notes.map(str::to_string);
        if !self.tags.is_empty() {
            data.tags = Some(self.tags.iter().map(|t| (*t).to_string()).collect());
        }
        Node {
            id: NodeId::from(self.id),
            kind: NodeKind::Child,
            data,
            position: Position::new(self.at.0, self.at.1),
            parent_id: Some(NodeId::from(self.parent)),
            connection_type: Some(ConnectionType::Standard),
        }
    }
}

struct TemplateDef {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    tags: &'static [&'static str],
    preview_image: &'static str,
    root_label: &'static str,
    seeds: Vec<Seed>,
}

fn build(def: TemplateDef) -> Template {
    let mut root_data = NodeData::new(def.root_label);
    root_data.color = Some(DEFAULT_COLOR.to_string());
    let root = Node {
        id: NodeId::root(),
        kind: NodeKind::Root,
        data: root_data,
        position: Position::default(),
        parent_id: None,
        connection_type: None,
    };

    let mut nodes = vec![root];
    nodes.extend(def.seeds.into_iter().map(Seed::into_node));

    let edges = nodes
        .iter()
        .filter_map(|n| {
            n.parent_id
                .as_ref()
                .map(|p| Edge::tree(p.clone(), n.id.clone(), ConnectionType::Standard))
        })
        .collect();

    Template {
        id: def.id,
        name: def.name,
        description: def.description,
        tags: def.tags,
        preview_image: Some(def.preview_image),
        nodes,
        edges,
    }
}

fn project_planning() -> TemplateDef {
    const GOALS: &str = "#00A3FF";
    const RESOURCES: &str = "#1DA090";
    const TIMELINE: &str = "#FF9473";
    const CHALLENGES: &str = "#DE4D86";
    TemplateDef {
        id: "project-planning",
        name: "Project Planning",
        description: "Structure your project with goals, resources, timeline, and potential challenges.",
        tags: &["Business", "Planning", "Project Management"],
        preview_image: "https://placehold.co/100x100/9b87f5/FFF?text=Project",
        root_label: "Project Name",
        seeds: vec![
            branch("goals", "Goals", GOALS, (250.0, -150.0)),
            topic("primary-objective", "Primary Objective", "goals", GOALS, (450.0, -180.0)),
            topic("secondary-objectives", "Secondary Objectives", "goals", GOALS, (450.0, -120.0)),
            branch("resources", "Resources", RESOURCES, (250.0, -50.0)),
            topic("budget", "Budget", "resources", RESOURCES, (450.0, -80.0)).priority(Priority::High),
            topic("team", "Team", "resources", RESOURCES, (450.0, -20.0)),
            branch("timeline", "Timeline", TIMELINE, (250.0, 50.0)),
            topic("phase-1", "Phase 1", "timeline", TIMELINE, (450.0, 20.0)).priority(Priority::Medium),
            topic("phase-2", "Phase 2", "timeline", TIMELINE, (450.0, 80.0)).priority(Priority::Low),
            branch("challenges", "Challenges", CHALLENGES, (250.0, 150.0)),
            topic("risks", "Risks", "challenges", CHALLENGES, (450.0, 120.0)),
            topic("mitigation-strategies", "Mitigation Strategies", "challenges", CHALLENGES, (450.0, 180.0)),
        ],
    }
}

fn brainstorming() -> TemplateDef {
    const ONE: &str = "#FF9473";
    const TWO: &str = "#1DA090";
    const THREE: &str = "#FFC144";
    TemplateDef {
        id: "brainstorming",
        name: "Brainstorming",
        description: "Generate ideas around a central concept with different categories and associations.",
        tags: &["Creative", "Ideas", "Thinking"],
        preview_image: "https://placehold.co/100x100/FF9473/FFF?text=Ideas",
        root_label: "Central Idea",
        seeds: vec![
            branch("category-1", "Category 1", ONE, (250.0, -120.0)),
            topic("idea-1-1", "Idea 1.1", "category-1", ONE, (450.0, -150.0)),
            topic("idea-1-2", "Idea 1.2", "category-1", ONE, (450.0, -90.0)),
            branch("category-2", "Category 2", TWO, (250.0, 0.0)),
            topic("idea-2-1", "Idea 2.1", "category-2", TWO, (450.0, -30.0)),
            topic("idea-2-2", "Idea 2.2", "category-2", TWO, (450.0, 30.0)),
            branch("category-3", "Category 3", THREE, (250.0, 120.0)),
            topic("idea-3-1", "Idea 3.1", "category-3", THREE, (450.0, 90.0)),
            topic("idea-3-2", "Idea 3.2", "category-3", THREE, (450.0, 150.0)),
        ],
    }
}

fn swot_analysis() -> TemplateDef {
    const STRENGTHS: &str = "#1DA090";
    const WEAKNESSES: &str = "#DE4D86";
    const OPPORTUNITIES: &str = "#00A3FF";
    const THREATS: &str = "#FF9473";
    TemplateDef {
        id: "swot-analysis",
        name: "SWOT Analysis",
        description: "Analyze Strengths, Weaknesses, Opportunities, and Threats for strategic planning.",
        tags: &["Business", "Analysis", "Strategy"],
        preview_image: "https://placehold.co/100x100/00A3FF/FFF?text=SWOT",
        root_label: "SWOT Analysis",
        seeds: vec![
            branch("strengths", "Strengths", STRENGTHS, (250.0, -150.0)).tags(&["Internal", "Positive"]),
            topic("strength-1", "Strength 1", "strengths", STRENGTHS, (450.0, -180.0)),
            topic("strength-2", "Strength 2", "strengths", STRENGTHS, (450.0, -120.0)),
            branch("weaknesses", "Weaknesses", WEAKNESSES, (250.0, -50.0)).tags(&["Internal", "Negative"]),
            topic("weakness-1", "Weakness 1", "weaknesses", WEAKNESSES, (450.0, -80.0)),
            topic("weakness-2", "Weakness 2", "weaknesses", WEAKNESSES, (450.0, -20.0)),
            branch("opportunities", "Opportunities", OPPORTUNITIES, (250.0, 50.0)).tags(&["External", "Positive"]),
            topic("opportunity-1", "Opportunity 1", "opportunities", OPPORTUNITIES, (450.0, 20.0)),
            topic("opportunity-2", "Opportunity 2", "opportunities", OPPORTUNITIES, (450.0, 80.0)),
            branch("threats", "Threats", THREATS, (250.0, 150.0)).tags(&["External", "Negative"]),
            topic("threat-1", "Threat 1", "threats", THREATS, (450.0, 120.0)),
            topic("threat-2", "Threat 2", "threats", THREATS, (450.0, 180.0)),
        ],
    }
}

fn goal_setting() -> TemplateDef {
    const FIRST: &str = "#FFC144";
    const SECOND: &str = "#00A3FF";
    const MILESTONES: &str = "#1DA090";
    TemplateDef {
        id: "goal-setting",
        name: "Goal Setting",
        description: "Plan your goals with objectives, action steps, and milestones for success.",
        tags: &["Planning", "Personal", "Achievement"],
        preview_image: "https://placehold.co/100x100/1DA090/FFF?text=Goals",
        root_label: "Main Goal",
        seeds: vec![
            branch("objective-1", "Objective 1", FIRST, (250.0, -100.0)).priority(Priority::High),
            topic("action-1-1", "Action 1.1", "objective-1", FIRST, (450.0, -130.0)),
            topic("action-1-2", "Action 1.2", "objective-1", FIRST, (450.0, -70.0)),
            branch("objective-2", "Objective 2", SECOND, (250.0, 0.0)).priority(Priority::Medium),
            topic("action-2-1", "Action 2.1", "objective-2", SECOND, (450.0, -30.0)),
            topic("action-2-2", "Action 2.2", "objective-2", SECOND, (450.0, 30.0)),
            branch("milestones", "Milestones", MILESTONES, (250.0, 100.0)),
            topic("milestone-1", "Milestone 1", "milestones", MILESTONES, (450.0, 70.0))
                .notes("Complete by the end of month 1"),
            topic("milestone-2", "Milestone 2", "milestones", MILESTONES, (450.0, 130.0))
                .notes("Complete by the end of month 2"),
        ],
    }
}

static CATALOG: LazyLock<Vec<Template>> = LazyLock::new(|| {
    [project_planning(), brainstorming(), swot_analysis(), goal_setting()]
        .into_iter()
        .map(build)
        .collect()
});

/// All built-in templates, in display order.
pub fn catalog() -> &'static [Template] {
    &CATALOG
}

/// Look up a template by id.
pub fn find(id: &str) -> Option<&'static Template> {
    CATALOG.iter().find(|t| t.id == id)
}

/// Listing entries for a template picker.
pub fn available_templates() -> Vec<TemplateSummary> {
    CATALOG.iter().map(Template::summary).collect()
}
