// Cluster reduction: bounded disclosure of a parent's children
//
// Children over the threshold collapse behind a synthetic cluster node that
// carries the counts and the paging cursor. Protected ids always surface,
// whatever the threshold says.

use std::collections::HashSet;

use serde::Serialize;
use vantage_graph::graph::RawGraph;
use vantage_graph::score::ScoreCache;

use crate::state::ExpansionState;

pub const DEFAULT_THRESHOLD: usize = 20;
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Synthetic node standing in for an elided group of children. Rebuilt on
/// every recompute, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterNode {
    pub id: String,
    pub parent_id: String,
    pub bucket: String,
    pub total_count: usize,
    pub shown_count: usize,
    pub hidden_count: usize,
    pub page_size: usize,
}

impl ClusterNode {
    /// What the rendering layer prints on the cluster badge. A fully
    /// revealed bucket stays representable so it can be collapsed again.
    pub fn label(&self) -> String {
        if self.hidden_count > 0 {
            format!("+{} more", self.hidden_count)
        } else {
            format!("Collapse ({})", self.total_count)
        }
    }
}

pub fn cluster_id(parent_id: &str, bucket: &str) -> String {
    format!("cluster:{}:{}", parent_id, bucket)
}

/// Parent id embedded in a cluster id. Bucket keys never contain ':',
/// parent ids (URLs) may, so the split is from the right.
pub fn cluster_parent(cluster_id: &str) -> Option<&str> {
    let rest = cluster_id.strip_prefix("cluster:")?;
    rest.rsplit_once(':').map(|(parent, _)| parent)
}

pub fn cluster_bucket(cluster_id: &str) -> Option<&str> {
    let rest = cluster_id.strip_prefix("cluster:")?;
    rest.rsplit_once(':').map(|(_, bucket)| bucket)
}

/// Result of reducing one bucket of children.
#[derive(Debug, Clone)]
pub struct Reduction {
    /// Ids to show, highest relevance first (protected stragglers last).
    pub visible: Vec<String>,
    pub cluster: Option<ClusterNode>,
}

/// Reduce a parent's children within one bucket.
///
/// At or under the threshold everything is visible and no cluster node is
/// emitted. Over it, the highest-scored `threshold` children show by
/// default; an expanded cluster reveals `page_size` more per activation.
/// Protected ids are force-added afterwards so a searched-for or bookmarked
/// descendant is never hidden by its own score.
pub fn reduce(
    graph: &RawGraph,
    scores: &mut ScoreCache,
    state: &ExpansionState,
    parent_id: &str,
    bucket: &str,
    child_ids: &[String],
    threshold: usize,
    page_size: usize,
    protected: &HashSet<String>,
) -> Reduction {
    let total = child_ids.len();
    if total <= threshold {
        return Reduction {
            visible: child_ids.to_vec(),
            cluster: None,
        };
    }

    let mut ranked: Vec<String> = child_ids.to_vec();
    scores.sort_by_score(graph, &mut ranked);

    let id = cluster_id(parent_id, bucket);
    let base_shown = threshold.min(total);
    let desired = if state.is_cluster_expanded(&id) {
        let reveal = state.reveal_count(&id).unwrap_or(page_size);
        total.min(base_shown + reveal)
    } else {
        base_shown
    };

    let mut shown: HashSet<&str> = ranked[..desired].iter().map(String::as_str).collect();
    let mut visible: Vec<String> = ranked[..desired].to_vec();
    for child in &ranked[desired..] {
        if protected.contains(child.as_str()) && shown.insert(child.as_str()) {
            visible.push(child.clone());
        }
    }

    let shown_count = visible.len();
    let cluster = ClusterNode {
        id,
        parent_id: parent_id.to_string(),
        bucket: bucket.to_string(),
        total_count: total,
        shown_count,
        hidden_count: total - shown_count,
        page_size,
    };

    Reduction {
        visible,
        cluster: Some(cluster),
    }
}
