// Relevance scoring for discovered nodes
//
// Scoring is data-driven only: what the scanner saw decides the score.
// Session state (selection, bookmarks) never feeds in, so a node's score is
// stable for the lifetime of a loaded graph.

use std::cmp::Ordering;
use std::collections::HashMap;

use url::Url;

use crate::graph::RawGraph;
use crate::model::{GraphNode, NodeKind};

pub const ADMIN_KEYWORDS: &[&str] = &[
    "admin",
    "administrator",
    "manage",
    "management",
    "console",
    "dashboard",
    "panel",
    "cpanel",
];

pub const AUTH_KEYWORDS: &[&str] = &[
    "login", "logout", "signin", "signup", "auth", "oauth", "sso", "password", "register",
    "session",
];

pub const API_KEYWORDS: &[&str] = &["api", "graphql", "rest", "rpc", "v1", "v2", "v3"];

pub const UPLOAD_KEYWORDS: &[&str] = &["upload", "import", "attachment", "media"];

pub const LEAK_KEYWORDS: &[&str] = &[
    ".git",
    ".env",
    ".svn",
    "backup",
    "dump",
    ".bak",
    ".sql",
    ".old",
    "secret",
    "credential",
    "config",
    "debug",
    "phpinfo",
];

const STATIC_EXTENSIONS: &[&str] = &[
    "css", "js", "map", "png", "jpg", "jpeg", "gif", "svg", "ico", "webp", "avif", "woff",
    "woff2", "ttf", "eot", "otf", "mp4", "webm",
];

const BASE_HOST: i64 = 100;
const BASE_SUBDOMAIN: i64 = 80;
const BASE_DIR: i64 = 45;
const BASE_PATH: i64 = 40;
const BASE_FILE: i64 = 35;
const BASE_IP: i64 = 20;

// Findings are the dominant term: a vulnerable endpoint outranks anything a
// keyword or status code can contribute.
const FINDINGS_BONUS: i64 = 500;
const EXTRA_FINDING_BONUS: i64 = 50;
const EXTRA_FINDING_CAP: i64 = 200;

const ADMIN_BONUS: i64 = 80;
const AUTH_BONUS: i64 = 70;
const API_BONUS: i64 = 60;
const UPLOAD_BONUS: i64 = 50;
const LEAK_BONUS: i64 = 90;

const RESTRICTED_BONUS: i64 = 60;
const SERVER_ERROR_BONUS: i64 = 40;
const NOT_FOUND_PENALTY: i64 = 80;
const QUERY_PENALTY: i64 = 30;
const STATIC_ASSET_PENALTY: i64 = 60;
const WELL_KNOWN_BONUS: i64 = 120;

/// Lowercased path portion of a node's full label, plus whether the label
/// carried query parameters. Handles both absolute URLs and bare paths.
pub fn path_and_query(text: &str) -> (String, bool) {
    if let Ok(url) = Url::parse(text) {
        let has_query = url.query().is_some_and(|q| !q.is_empty());
        return (url.path().to_ascii_lowercase(), has_query);
    }
    match text.split_once('?') {
        Some((path, query)) => (path.to_ascii_lowercase(), !query.is_empty()),
        None => (text.to_ascii_lowercase(), false),
    }
}

pub fn has_query_params(node: &GraphNode) -> bool {
    path_and_query(node.display_path()).1
}

/// File extension when the path looks like a static asset (styles, scripts,
/// images, fonts). Expects a lowercased path.
pub fn static_asset_extension(path: &str) -> Option<&'static str> {
    let file = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = file.rsplit_once('.')?;
    STATIC_EXTENSIONS.iter().find(|known| **known == ext).copied()
}

/// High-value well-known files are exempt from the static-asset penalty:
/// robots, sitemaps, .well-known content and API schema documents are worth
/// more to an attacker than their extension suggests.
pub fn is_well_known_path(path: &str) -> bool {
    let trimmed = path.trim_end_matches('/');
    trimmed.ends_with("/robots.txt")
        || trimmed == "/robots.txt"
        || trimmed.ends_with("/sitemap.xml")
        || path.contains("/.well-known/")
        || path.ends_with("/.well-known")
        || path.contains("swagger")
        || path.contains("openapi")
}

fn matches_any(path: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| path.contains(keyword))
}

fn kind_base(kind: NodeKind) -> i64 {
    match kind {
        NodeKind::Host => BASE_HOST,
        NodeKind::Subdomain => BASE_SUBDOMAIN,
        NodeKind::Dir => BASE_DIR,
        NodeKind::Path => BASE_PATH,
        NodeKind::File => BASE_FILE,
        NodeKind::Ip => BASE_IP,
        NodeKind::Cluster => 0,
    }
}

/// Relevance score for one node. Pure function of the node's own data.
pub fn score_node(node: &GraphNode) -> i64 {
    let (path, has_query) = path_and_query(node.display_path());
    let mut score = kind_base(node.kind);

    if node.has_findings() {
        score += FINDINGS_BONUS;
        let extra = (node.findings.len() as i64 - 1) * EXTRA_FINDING_BONUS;
        score += extra.clamp(0, EXTRA_FINDING_CAP);
    }

    if matches_any(&path, ADMIN_KEYWORDS) {
        score += ADMIN_BONUS;
    }
    if matches_any(&path, AUTH_KEYWORDS) {
        score += AUTH_BONUS;
    }
    if matches_any(&path, API_KEYWORDS) {
        score += API_BONUS;
    }
    if matches_any(&path, UPLOAD_KEYWORDS) {
        score += UPLOAD_BONUS;
    }
    if matches_any(&path, LEAK_KEYWORDS) {
        score += LEAK_BONUS;
    }

    match node.status {
        Some(401) | Some(403) => score += RESTRICTED_BONUS,
        Some(code) if (500..600).contains(&code) => score += SERVER_ERROR_BONUS,
        Some(404) => score -= NOT_FOUND_PENALTY,
        _ => {}
    }

    if has_query {
        score -= QUERY_PENALTY;
    }

    if is_well_known_path(&path) {
        score += WELL_KNOWN_BONUS;
    } else if static_asset_extension(&path).is_some() {
        score -= STATIC_ASSET_PENALTY;
    }

    score
}

/// Deterministic ordering for equal scores: case-insensitive label first,
/// then exact label, then id.
pub fn label_order(a: &GraphNode, b: &GraphNode) -> Ordering {
    a.label
        .to_lowercase()
        .cmp(&b.label.to_lowercase())
        .then_with(|| a.label.cmp(&b.label))
        .then_with(|| a.id.cmp(&b.id))
}

/// Per-recompute score memo, keyed by node id. Invalidated whenever the
/// raw graph revision changes.
#[derive(Default)]
pub struct ScoreCache {
    revision: u64,
    scores: HashMap<String, i64>,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&mut self, graph: &RawGraph, id: &str) -> i64 {
        if self.revision != graph.revision() {
            self.scores.clear();
            self.revision = graph.revision();
        }
        if let Some(&cached) = self.scores.get(id) {
            return cached;
        }
        let score = graph.node(id).map(score_node).unwrap_or(0);
        self.scores.insert(id.to_string(), score);
        score
    }

    /// Sort ids by score descending with the deterministic tie-break.
    pub fn sort_by_score(&mut self, graph: &RawGraph, ids: &mut [String]) {
        let mut keyed: Vec<(i64, String)> = ids
            .iter()
            .map(|id| (self.score(graph, id), id.clone()))
            .collect();
        keyed.sort_by(|(score_a, id_a), (score_b, id_b)| {
            score_b.cmp(score_a).then_with(|| {
                match (graph.node(id_a), graph.node(id_b)) {
                    (Some(a), Some(b)) => label_order(a, b),
                    _ => id_a.cmp(id_b),
                }
            })
        });
        for (slot, (_, id)) in ids.iter_mut().zip(keyed) {
            *slot = id;
        }
    }
}

/// Top `limit` nodes by relevance, deterministically ordered.
pub fn rank_nodes(graph: &RawGraph, cache: &mut ScoreCache, limit: usize) -> Vec<(String, i64)> {
    let mut ids: Vec<String> = graph.node_ids().to_vec();
    cache.sort_by_score(graph, &mut ids);
    ids.truncate(limit);
    ids.into_iter()
        .map(|id| {
            let score = cache.score(graph, &id);
            (id, score)
        })
        .collect()
}
