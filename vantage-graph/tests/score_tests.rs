// Tests for the relevance scorer

use vantage_graph::graph::RawGraph;
use vantage_graph::model::{Finding, GraphNode, GraphSnapshot, NodeKind, Severity};
use vantage_graph::score::{
    ScoreCache, has_query_params, is_well_known_path, path_and_query, score_node,
    static_asset_extension,
};

fn path_node(id: &str, full_label: &str, status: Option<u16>) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        kind: NodeKind::Path,
        level: 0,
        status,
        label: full_label.to_string(),
        full_label: full_label.to_string(),
        technologies: Vec::new(),
        findings: Vec::new(),
    }
}

fn kind_node(id: &str, kind: NodeKind) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        kind,
        level: 0,
        status: None,
        label: id.to_string(),
        full_label: String::new(),
        technologies: Vec::new(),
        findings: Vec::new(),
    }
}

fn finding() -> Finding {
    Finding {
        severity: Severity::High,
        title: "Exposed file".to_string(),
        description: None,
    }
}

// ============================================================================
// Path Parsing Tests
// ============================================================================

#[test]
fn test_path_and_query_absolute_url() {
    let (path, has_query) = path_and_query("https://example.com/Admin/Login?next=/");
    assert_eq!(path, "/admin/login");
    assert!(has_query);
}

#[test]
fn test_path_and_query_bare_path() {
    let (path, has_query) = path_and_query("/API/v1/users");
    assert_eq!(path, "/api/v1/users");
    assert!(!has_query);
}

#[test]
fn test_path_and_query_empty_query_ignored() {
    let (_, has_query) = path_and_query("/search?");
    assert!(!has_query);
}

#[test]
fn test_has_query_params() {
    assert!(has_query_params(&path_node("a", "/items?id=3", None)));
    assert!(!has_query_params(&path_node("b", "/items", None)));
}

#[test]
fn test_static_asset_extension() {
    assert_eq!(static_asset_extension("/assets/app.js"), Some("js"));
    assert_eq!(static_asset_extension("/logo.png"), Some("png"));
    assert_eq!(static_asset_extension("/api/users"), None);
    assert_eq!(static_asset_extension("/report.pdf"), None);
}

#[test]
fn test_well_known_paths() {
    assert!(is_well_known_path("/robots.txt"));
    assert!(is_well_known_path("/sitemap.xml"));
    assert!(is_well_known_path("/.well-known/security.txt"));
    assert!(is_well_known_path("/api/openapi.json"));
    assert!(is_well_known_path("/swagger-ui/index.html"));
    assert!(!is_well_known_path("/index.html"));
}

// ============================================================================
// Scoring Tests
// ============================================================================

#[test]
fn test_findings_dominate() {
    let mut vulnerable = path_node("a", "/plain-page", Some(200));
    vulnerable.findings.push(finding());
    let keyword_rich = path_node("b", "/admin/api/login", Some(403));

    assert!(score_node(&vulnerable) > score_node(&keyword_rich));
}

#[test]
fn test_extra_findings_add_up() {
    let mut one = path_node("a", "/x", Some(200));
    one.findings.push(finding());
    let mut three = path_node("b", "/x", Some(200));
    three.findings.extend([finding(), finding(), finding()]);

    assert!(score_node(&three) > score_node(&one));
}

#[test]
fn test_admin_keyword_boost() {
    let admin = path_node("a", "/admin", Some(200));
    let about = path_node("b", "/about", Some(200));
    assert!(score_node(&admin) > score_node(&about));
}

#[test]
fn test_restricted_status_boost() {
    let forbidden = path_node("a", "/private", Some(403));
    let open = path_node("b", "/private", Some(200));
    assert!(score_node(&forbidden) > score_node(&open));
}

#[test]
fn test_server_error_boost() {
    let broken = path_node("a", "/checkout", Some(500));
    let fine = path_node("b", "/checkout", Some(200));
    assert!(score_node(&broken) > score_node(&fine));
}

#[test]
fn test_not_found_penalty() {
    let missing = path_node("a", "/page", Some(404));
    let present = path_node("b", "/page", Some(200));
    assert!(score_node(&missing) < score_node(&present));
}

#[test]
fn test_query_param_penalty() {
    let parameterized = path_node("a", "/items?id=3", Some(200));
    let plain = path_node("b", "/items", Some(200));
    assert!(score_node(&parameterized) < score_node(&plain));
}

#[test]
fn test_static_asset_penalty() {
    let asset = path_node("a", "/assets/app.css", Some(200));
    let page = path_node("b", "/assets/app", Some(200));
    assert!(score_node(&asset) < score_node(&page));
}

#[test]
fn test_well_known_exempt_and_boosted() {
    let robots = path_node("a", "/robots.txt", Some(200));
    let stylesheet = path_node("b", "/style.css", Some(200));
    let plain = path_node("c", "/page", Some(200));

    assert!(score_node(&robots) > score_node(&stylesheet));
    assert!(score_node(&robots) > score_node(&plain));
}

#[test]
fn test_kind_base_ordering() {
    let host = kind_node("h", NodeKind::Host);
    let dir = kind_node("d", NodeKind::Dir);
    let ip = kind_node("i", NodeKind::Ip);

    assert!(score_node(&host) > score_node(&dir));
    assert!(score_node(&dir) > score_node(&ip));
}

// ============================================================================
// Cache and Ordering Tests
// ============================================================================

#[test]
fn test_score_cache_consistent() {
    let snapshot = GraphSnapshot {
        nodes: vec![path_node("x", "/admin", Some(200))],
        edges: vec![],
    };
    let graph = RawGraph::from_snapshot(snapshot).unwrap();
    let mut cache = ScoreCache::new();

    let first = cache.score(&graph, "x");
    let second = cache.score(&graph, "x");
    assert_eq!(first, second);
    assert_eq!(first, score_node(graph.node("x").unwrap()));
}

#[test]
fn test_score_cache_unknown_node_is_zero() {
    let graph = RawGraph::from_snapshot(GraphSnapshot::default()).unwrap();
    let mut cache = ScoreCache::new();
    assert_eq!(cache.score(&graph, "ghost"), 0);
}

#[test]
fn test_sort_by_score_deterministic_tie_break() {
    // Identical scores: order falls back to the case-insensitive label
    let mut b_node = path_node("id-b", "/zeta", Some(200));
    b_node.label = "Beta".to_string();
    let mut a_node = path_node("id-a", "/zeta", Some(200));
    a_node.label = "alpha".to_string();

    let snapshot = GraphSnapshot {
        nodes: vec![b_node, a_node],
        edges: vec![],
    };
    let graph = RawGraph::from_snapshot(snapshot).unwrap();
    let mut cache = ScoreCache::new();

    let mut ids = vec!["id-b".to_string(), "id-a".to_string()];
    cache.sort_by_score(&graph, &mut ids);
    assert_eq!(ids, vec!["id-a".to_string(), "id-b".to_string()]);
}
