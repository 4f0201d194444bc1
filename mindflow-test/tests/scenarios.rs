use std::collections::HashSet;

use chrono::Utc;
use mindflow_core::config::{ImportPolicy, MindflowConfig};
use mindflow_core::error::TransferError;
use mindflow_core::store::MindMapStore;
use mindflow_core::transfer::{ExportDocument, parse_import};
use mindflow_core::types::{ConnectionType, GraphSnapshot, NodeId, NodePatch};
use mindflow_core::visibility;
use mindflow_test::{GraphBuilder, TestWorkspace, launch_plan, store_with, visible_labels};

// ── Store scenarios ──────────────────────────────────────────────

#[test]
fn three_children_of_root() {
    let mut store = MindMapStore::new();
    let root = NodeId::root();
    let ids: Vec<NodeId> = (0..3)
        .map(|_| store.add_node(Some(&root), None, ConnectionType::Standard))
        .collect();

    assert_eq!(store.nodes().len(), 4);
    let targets: Vec<&NodeId> = store.edges().iter().map(|e| &e.target).collect();
    assert_eq!(targets, ids.iter().collect::<Vec<_>>());
    assert!(store.edges().iter().all(|e| e.source == root));

    let ys: Vec<f64> = ids.iter().map(|id| store.node(id).unwrap().position.y).collect();
    assert!(ys.windows(2).all(|w| w[1] > w[0]), "offsets must increase: {ys:?}");
    let xs: HashSet<u64> = ids
        .iter()
        .map(|id| store.node(id).unwrap().position.x.to_bits())
        .collect();
    assert_eq!(xs.len(), 1, "horizontal offset must be constant");
    assert_eq!(store.selected_node_id(), ids.last());
}

#[test]
fn delete_chain_leaves_only_root() {
    let mut store = MindMapStore::new();
    let a = store.add_node(Some(&NodeId::root()), None, ConnectionType::Standard);
    store.add_node(Some(&a), None, ConnectionType::Standard);

    store.delete_node(&a).unwrap();
    assert_eq!(store.nodes().len(), 1);
    assert!(store.nodes()[0].is_root());
    assert!(store.edges().is_empty());
}

#[test]
fn collapsed_child_hides_grandchild() {
    let store = store_with(
        GraphBuilder::rooted("Root")
            .child("a", "A", "root")
            .child("b", "B", "a")
            .collapsed("a")
            .build(),
    );
    assert_eq!(visible_labels(&store), ["Root", "A"]);
}

#[test]
fn budget_search_over_project_template() {
    let mut store = MindMapStore::new();
    store.apply_template("project-planning").unwrap();
    store.set_search_query("Budget");

    let visible: HashSet<&str> = store.visible().nodes.iter().map(|n| n.label()).collect();
    assert_eq!(
        visible,
        HashSet::from(["Project Name", "Resources", "Budget"])
    );
}

#[test]
fn search_then_collapse_hides_match() {
    let mut store = store_with(launch_plan());
    store.set_search_query("hiring");
    assert_eq!(visible_labels(&store), ["Launch", "Team", "Hiring"]);

    store.toggle_node_expanded(&NodeId::from("team"));
    assert_eq!(visible_labels(&store), ["Launch", "Team"]);
}

#[test]
fn clearing_search_restores_full_projection() {
    let mut store = store_with(launch_plan());
    store.set_search_query("scope");
    assert_eq!(store.visible().nodes.len(), 3);
    store.set_search_query("");
    assert_eq!(store.visible().nodes.len(), 6);
}

// ── Import boundary ──────────────────────────────────────────────

#[test]
fn repair_import_drops_orphans_and_cycles() {
    let snapshot = GraphBuilder::rooted("Root")
        .child("a", "A", "root")
        .child("orphan", "Orphan", "ghost")
        .child("under-orphan", "Under orphan", "orphan")
        .child("x", "X", "y")
        .child("y", "Y", "x")
        .floating("free", "Free")
        .edge("a", "ghost")
        .build();

    let mut store = MindMapStore::new();
    let report = store.import_mind_map(snapshot).unwrap();

    let ids: Vec<&str> = store.nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["root", "a", "free"]);
    assert_eq!(report.dangling_parents, [NodeId::from("orphan")]);
    assert_eq!(report.cyclic_nodes.len(), 2);
    assert_eq!(report.dropped_nodes, 4);
    for edge in store.edges() {
        assert!(store.node(&edge.source).is_some());
        assert!(store.node(&edge.target).is_some());
    }
}

#[test]
fn repair_import_inserts_missing_root() {
    let snapshot = GraphBuilder::rootless()
        .floating("a", "A")
        .without_edges()
        .build();
    let mut store = MindMapStore::new();
    let report = store.import_mind_map(snapshot).unwrap();
    assert!(report.inserted_root);
    assert!(store.nodes()[0].is_root());
}

#[test]
fn strict_import_rejects_and_keeps_previous_graph() {
    let mut store = store_with(launch_plan()).with_import_policy(ImportPolicy::Strict);
    let before = store.snapshot();

    let bad = GraphBuilder::rooted("Other")
        .child("orphan", "Orphan", "ghost")
        .build();
    let err = store.import_mind_map(bad).unwrap_err();
    assert!(matches!(err, TransferError::Validation(_)));
    assert_eq!(store.snapshot(), before);
}

#[test]
fn parse_rejects_documents_without_arrays() {
    assert!(matches!(
        parse_import(r#"{"nodes": [], "edges": {}}"#),
        Err(TransferError::InvalidFormat(_))
    ));
}

// ── Persistence ──────────────────────────────────────────────────

#[test]
fn export_import_round_trip_through_sqlite() {
    let source = TestWorkspace::new();
    let exported = {
        let mut store = source.open_store().unwrap();
        store.apply_template("swot-analysis").unwrap();
        store.update_node_data(
            &NodeId::from("strength-1"),
            NodePatch::default().label("Brand").notes(Some("Well known".into())),
        );
        store.select_node(Some(NodeId::from("strength-1")));
        store.set_search_query("brand");
        ExportDocument::new(store.snapshot(), Utc::now()).to_json().unwrap()
    };

    let target = TestWorkspace::new();
    {
        let mut store = target.open_store().unwrap();
        store.import_mind_map(parse_import(&exported).unwrap()).unwrap();
        store.flush().unwrap();
    }

    let original = source.open_store().unwrap();
    let copy = target.open_store().unwrap();
    assert_eq!(copy.nodes(), original.nodes());
    assert_eq!(copy.edges(), original.edges());
    assert!(copy.selected_node_id().is_none());
    assert_eq!(copy.search_query(), "");
}

#[test]
fn state_persists_under_configured_key() {
    let workspace = TestWorkspace::new();
    {
        let mut store = workspace.open_store().unwrap();
        store.add_node(Some(&NodeId::root()), None, ConnectionType::Middle);
    }
    let json = workspace.persisted_json().unwrap().unwrap();
    assert_eq!(json["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(json["edges"][0]["animated"], true);

    let mut config = MindflowConfig::default();
    config.storage.key = "other-map".into();
    let other = workspace.open_store_with(&config).unwrap();
    assert_eq!(other.nodes().len(), 1, "a different key starts fresh");
}

#[test]
fn independent_stores_do_not_share_state() {
    let mut first = MindMapStore::new();
    let second = MindMapStore::new();
    first.add_node(Some(&NodeId::root()), None, ConnectionType::Standard);
    assert_eq!(first.nodes().len(), 2);
    assert_eq!(second.nodes().len(), 1);
}

// ── Properties ───────────────────────────────────────────────────

mod props {
    use proptest::prelude::*;

    use super::*;
    use mindflow_core::types::Node;

    /// Arbitrary parent pointers over ids `n0..nN`, including missing targets
    /// and cycles, plus a chance of no root.
    fn arb_graph() -> impl Strategy<Value = GraphSnapshot> {
        (prop::collection::vec(0usize..12, 0..12), any::<bool>()).prop_map(
            |(parents, with_root)| {
                let mut builder = if with_root {
                    GraphBuilder::rooted("Root")
                } else {
                    GraphBuilder::rootless()
                };
                for (i, p) in parents.iter().enumerate() {
                    let parent = if *p == 0 { "root".to_string() } else { format!("n{p}") };
                    builder = builder.child(&format!("n{i}"), &format!("n{i}"), &parent);
                }
                builder.build()
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Whatever goes in, a repaired import is clean under the strict policy.
        #[test]
        fn repaired_import_is_structurally_sound(snapshot in arb_graph()) {
            let mut store = MindMapStore::new();
            store.import_mind_map(snapshot).unwrap();

            let mut strict = MindMapStore::new().with_import_policy(ImportPolicy::Strict);
            let report = strict.import_mind_map(store.snapshot()).unwrap();
            prop_assert!(report.is_clean());
            prop_assert_eq!(store.nodes().iter().filter(|n| n.is_root()).count(), 1);
        }

        /// Search keeps exactly the matches and their ancestors.
        #[test]
        fn search_closure_is_exact(snapshot in arb_graph(), pick in 0usize..12) {
            let store = store_with(snapshot);
            let query = format!("n{pick}");
            let found = visibility::search_filter(store.nodes(), store.edges(), &query);

            let matches = visibility::label_matches(store.nodes(), &query);
            let mut expected: HashSet<&NodeId> = HashSet::new();
            for id in matches {
                let mut current: Option<&Node> = store.node(id);
                while let Some(node) = current {
                    if !expected.insert(&node.id) {
                        break;
                    }
                    current = node.parent_id.as_ref().and_then(|p| store.node(p));
                }
            }
            prop_assert_eq!(found.node_ids(), expected);
        }
    }
}
