// Attack-surface categorization
//
// Every non-asset endpoint lands in exactly one category. The checks run in
// priority order and the first match wins, so an endpoint with findings is
// always a findings-bucket member no matter what its path says.

use serde::{Deserialize, Serialize};

use crate::model::GraphNode;
use crate::score::{
    ADMIN_KEYWORDS, API_KEYWORDS, AUTH_KEYWORDS, LEAK_KEYWORDS, is_well_known_path,
    path_and_query, static_asset_extension,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Findings,
    Auth,
    Admin,
    Api,
    Leaks,
    Restricted,
    Errors,
    Redirects,
    Other,
}

impl Category {
    /// Evaluation and presentation order.
    pub const ORDERED: [Category; 9] = [
        Category::Findings,
        Category::Auth,
        Category::Admin,
        Category::Api,
        Category::Leaks,
        Category::Restricted,
        Category::Errors,
        Category::Redirects,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Findings => "findings",
            Category::Auth => "auth",
            Category::Admin => "admin",
            Category::Api => "api",
            Category::Leaks => "leaks",
            Category::Restricted => "restricted",
            Category::Errors => "errors",
            Category::Redirects => "redirects",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Findings => "Findings",
            Category::Auth => "Authentication",
            Category::Admin => "Admin",
            Category::Api => "API",
            Category::Leaks => "Leaks",
            Category::Restricted => "Restricted",
            Category::Errors => "Server Errors",
            Category::Redirects => "Redirects",
            Category::Other => "Other",
        }
    }

    /// Per-category visibility threshold. The busy interactive buckets
    /// (auth/admin/api) show more members before clustering kicks in than
    /// the buckets where a handful of entries already tells the story.
    pub fn threshold(&self) -> usize {
        match self {
            Category::Auth | Category::Admin | Category::Api => 15,
            Category::Findings => 10,
            Category::Leaks => 10,
            Category::Restricted | Category::Errors => 8,
            Category::Redirects => 6,
            Category::Other => 10,
        }
    }
}

fn matches_any(path: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| path.contains(keyword))
}

/// True when the node is a plain static asset (and not a high-value
/// well-known file). Assets are excluded from the attack-surface view.
pub fn is_static_asset(node: &GraphNode) -> bool {
    let (path, _) = path_and_query(node.display_path());
    static_asset_extension(&path).is_some() && !is_well_known_path(&path)
}

/// Classify one endpoint. First matching rule wins.
pub fn classify(node: &GraphNode) -> Category {
    if node.has_findings() {
        return Category::Findings;
    }

    let (path, _) = path_and_query(node.display_path());
    if matches_any(&path, AUTH_KEYWORDS) {
        return Category::Auth;
    }
    if matches_any(&path, ADMIN_KEYWORDS) {
        return Category::Admin;
    }
    if matches_any(&path, API_KEYWORDS) {
        return Category::Api;
    }
    if matches_any(&path, LEAK_KEYWORDS) || is_well_known_path(&path) {
        return Category::Leaks;
    }

    match node.status {
        Some(401) | Some(403) => Category::Restricted,
        Some(code) if (500..600).contains(&code) => Category::Errors,
        Some(code) if (300..400).contains(&code) => Category::Redirects,
        _ => Category::Other,
    }
}
