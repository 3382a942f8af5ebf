// Tests for the sitemap perspective builder

use std::collections::HashSet;

use vantage_engine::cluster::cluster_id;
use vantage_engine::perspective::sitemap::build_sitemap;
use vantage_engine::perspective::{ReduceConfig, VisibleGraph};
use vantage_engine::state::{Action, ExpansionState, VisibilityMode, apply};
use vantage_graph::graph::RawGraph;
use vantage_graph::model::{GraphEdge, GraphNode, GraphSnapshot, NodeKind};
use vantage_graph::score::ScoreCache;

fn node(id: &str, kind: NodeKind, full_label: &str) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        kind,
        level: 0,
        status: Some(200),
        label: id.to_string(),
        full_label: full_label.to_string(),
        technologies: Vec::new(),
        findings: Vec::new(),
    }
}

fn edge(source: &str, target: &str) -> GraphEdge {
    GraphEdge {
        source: source.to_string(),
        target: target.to_string(),
    }
}

/// example.com
///   app.example.com          (subdomain)
///     app.example.com/login  (path)
///   example.com/admin        (dir)
///     example.com/admin/panel (path)
///       example.com/admin/panel/users (path)
fn small_site() -> RawGraph {
    RawGraph::from_snapshot(GraphSnapshot {
        nodes: vec![
            node("example.com", NodeKind::Host, "example.com"),
            node("app.example.com", NodeKind::Subdomain, "app.example.com"),
            node("app.example.com/login", NodeKind::Path, "/login"),
            node("example.com/admin", NodeKind::Dir, "/admin"),
            node("example.com/admin/panel", NodeKind::Path, "/admin/panel"),
            node(
                "example.com/admin/panel/users",
                NodeKind::Path,
                "/admin/panel/users",
            ),
        ],
        edges: vec![
            edge("example.com", "app.example.com"),
            edge("app.example.com", "app.example.com/login"),
            edge("example.com", "example.com/admin"),
            edge("example.com/admin", "example.com/admin/panel"),
            edge("example.com/admin/panel", "example.com/admin/panel/users"),
        ],
    })
    .unwrap()
}

fn build(graph: &RawGraph, state: &ExpansionState, protected: &HashSet<String>) -> VisibleGraph {
    let mut scores = ScoreCache::new();
    build_sitemap(graph, &mut scores, state, protected, &ReduceConfig::default())
}

fn visible_ids(visible: &VisibleGraph) -> Vec<&str> {
    visible.nodes.iter().map(|n| n.id.as_str()).collect()
}

// ============================================================================
// Level Gating Tests
// ============================================================================

#[test]
fn test_default_level_cap_hides_deep_nodes() {
    let graph = small_site();
    let visible = build(&graph, &ExpansionState::default(), &HashSet::new());
    let ids = visible_ids(&visible);

    assert!(ids.contains(&"example.com"));
    assert!(ids.contains(&"app.example.com"));
    assert!(ids.contains(&"example.com/admin"));
    assert!(!ids.contains(&"app.example.com/login"));
    assert!(!ids.contains(&"example.com/admin/panel"));
}

#[test]
fn test_level_gating_bound_holds() {
    let graph = small_site();
    let state = ExpansionState {
        mode: VisibilityMode::LevelCapped(2),
        ..ExpansionState::default()
    };
    let visible = build(&graph, &state, &HashSet::new());

    for node in visible.nodes.iter().filter(|n| n.cluster.is_none()) {
        assert!(
            node.level <= 2,
            "node '{}' at level {} leaked past the cap",
            node.id,
            node.level
        );
    }
}

#[test]
fn test_expansion_reveals_children_past_cap() {
    let graph = small_site();
    let state = apply(
        &ExpansionState::default(),
        &Action::ExpandNode("example.com/admin".to_string()),
        &graph,
    );
    let visible = build(&graph, &state, &HashSet::new());
    let ids = visible_ids(&visible);

    assert!(ids.contains(&"example.com/admin/panel"));
    // The flood only reveals direct children of expanded nodes
    assert!(!ids.contains(&"example.com/admin/panel/users"));
}

#[test]
fn test_expansion_flood_continues_through_expanded_children() {
    let graph = small_site();
    let mut state = apply(
        &ExpansionState::default(),
        &Action::ExpandNode("example.com/admin".to_string()),
        &graph,
    );
    state = apply(
        &state,
        &Action::ExpandNode("example.com/admin/panel".to_string()),
        &graph,
    );
    let visible = build(&graph, &state, &HashSet::new());

    assert!(visible.contains_node("example.com/admin/panel/users"));
}

#[test]
fn test_tree_mode_starts_at_roots() {
    let graph = small_site();
    let state = ExpansionState::expansion_mode();
    let visible = build(&graph, &state, &HashSet::new());

    assert_eq!(visible_ids(&visible), vec!["example.com"]);
}

#[test]
fn test_tree_mode_expansion_reveals_children() {
    let graph = small_site();
    let mut state = ExpansionState::expansion_mode();
    state = apply(
        &state,
        &Action::ExpandNode("example.com".to_string()),
        &graph,
    );
    let visible = build(&graph, &state, &HashSet::new());
    let ids = visible_ids(&visible);

    assert!(ids.contains(&"app.example.com"));
    assert!(ids.contains(&"example.com/admin"));
    assert!(!ids.contains(&"example.com/admin/panel"));
}

// ============================================================================
// Bucket Tests
// ============================================================================

/// Parent directory with `normal` plain paths and `parameterized` query
/// paths, visible under a generous level cap.
fn url_heavy_site(normal: usize, parameterized: usize) -> RawGraph {
    let mut nodes = vec![
        node("example.com", NodeKind::Host, "example.com"),
        node("example.com/app", NodeKind::Dir, "/app"),
    ];
    let mut edges = vec![edge("example.com", "example.com/app")];
    for i in 0..normal {
        let id = format!("example.com/app/page-{:02}", i);
        nodes.push(node(&id, NodeKind::Path, &format!("/app/page-{:02}", i)));
        edges.push(edge("example.com/app", &id));
    }
    for i in 0..parameterized {
        let id = format!("example.com/app/item?id={}", i);
        nodes.push(node(&id, NodeKind::Path, &format!("/app/item?id={}", i)));
        edges.push(edge("example.com/app", &id));
    }
    RawGraph::from_snapshot(GraphSnapshot { nodes, edges }).unwrap()
}

#[test]
fn test_parameterized_urls_cluster_separately_when_many() {
    let graph = url_heavy_site(22, 5);
    let state = ExpansionState {
        mode: VisibilityMode::LevelCapped(5),
        ..ExpansionState::default()
    };
    let visible = build(&graph, &state, &HashSet::new());

    // Parameterized URLs sit entirely behind their zero-threshold cluster
    assert!(!visible.contains_node("example.com/app/item?id=0"));
    let params_cluster = visible
        .node(&cluster_id("example.com/app", "params"))
        .expect("params cluster missing");
    let meta = params_cluster.cluster.as_ref().unwrap();
    assert_eq!(meta.total_count, 5);
    assert_eq!(meta.hidden_count, 5);

    // Plain URLs cluster behind their own threshold
    let urls_cluster = visible
        .node(&cluster_id("example.com/app", "urls"))
        .expect("urls cluster missing");
    assert_eq!(urls_cluster.cluster.as_ref().unwrap().total_count, 22);
}

#[test]
fn test_small_buckets_fold_into_urls() {
    let graph = url_heavy_site(3, 2);
    let state = ExpansionState {
        mode: VisibilityMode::LevelCapped(5),
        ..ExpansionState::default()
    };
    let visible = build(&graph, &state, &HashSet::new());

    // Few URL-ish children: everything folds into one visible set
    assert!(visible.contains_node("example.com/app/page-00"));
    assert!(visible.contains_node("example.com/app/item?id=0"));
    assert!(visible.node(&cluster_id("example.com/app", "params")).is_none());
}

#[test]
fn test_links_connect_parents_to_members_and_clusters() {
    let graph = url_heavy_site(22, 5);
    let state = ExpansionState {
        mode: VisibilityMode::LevelCapped(5),
        ..ExpansionState::default()
    };
    let visible = build(&graph, &state, &HashSet::new());

    assert!(visible.links.iter().any(|link| {
        link.source == "example.com" && link.target == "example.com/app"
    }));
    let urls_cluster = cluster_id("example.com/app", "urls");
    assert!(visible.links.iter().any(|link| {
        link.source == "example.com/app" && link.target == urls_cluster
    }));
}

// ============================================================================
// Protection Tests
// ============================================================================

#[test]
fn test_buried_protected_node_surfaces_with_chain() {
    let graph = small_site();
    // Deep node, two levels past the cap, nothing expanded
    let protected: HashSet<String> = [
        "example.com/admin/panel/users".to_string(),
        "example.com/admin/panel".to_string(),
        "example.com/admin".to_string(),
        "example.com".to_string(),
    ]
    .into();
    let visible = build(&graph, &ExpansionState::default(), &protected);

    assert!(visible.contains_node("example.com/admin/panel/users"));
    assert!(visible.contains_node("example.com/admin/panel"));
    // The chain is drawable: each hop has a link
    assert!(visible.links.iter().any(|link| {
        link.source == "example.com/admin/panel"
            && link.target == "example.com/admin/panel/users"
    }));
    assert!(visible.links.iter().any(|link| {
        link.source == "example.com/admin" && link.target == "example.com/admin/panel"
    }));
}

#[test]
fn test_protected_low_scorer_beats_cluster() {
    let graph = url_heavy_site(25, 0);
    let state = ExpansionState {
        mode: VisibilityMode::LevelCapped(5),
        ..ExpansionState::default()
    };
    // page-24 ranks last by label tie-break and would be clustered away
    let protected: HashSet<String> = ["example.com/app/page-24".to_string()].into();
    let visible = build(&graph, &state, &protected);

    assert!(visible.contains_node("example.com/app/page-24"));
}

// ============================================================================
// Determinism Tests
// ============================================================================

#[test]
fn test_repeated_builds_identical() {
    let graph = url_heavy_site(22, 5);
    let state = ExpansionState {
        mode: VisibilityMode::LevelCapped(5),
        ..ExpansionState::default()
    };

    let first = build(&graph, &state, &HashSet::new());
    let second = build(&graph, &state, &HashSet::new());

    let first_ids: Vec<&str> = first.nodes.iter().map(|n| n.id.as_str()).collect();
    let second_ids: Vec<&str> = second.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(first_ids, second_ids);
    assert_eq!(first.links, second.links);

    let first_labels: Vec<&str> = first.nodes.iter().map(|n| n.label.as_str()).collect();
    let second_labels: Vec<&str> = second.nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(first_labels, second_labels);
}

#[test]
fn test_empty_graph_builds_empty_view() {
    let graph = RawGraph::from_snapshot(GraphSnapshot::default()).unwrap();
    let visible = build(&graph, &ExpansionState::default(), &HashSet::new());
    assert_eq!(visible.node_count(), 0);
    assert_eq!(visible.link_count(), 0);
}
