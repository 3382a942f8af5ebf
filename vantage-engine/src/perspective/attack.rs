// Attack-surface perspective: category buckets ranked by relevance
//
// Directory hierarchy below the host level is ignored. Every non-asset
// endpoint in the scan is classified into exactly one category bucket
// hanging off the perspective root; subdomains get their own top-N bucket.

use std::collections::HashSet;

use vantage_graph::classify::{Category, classify, is_static_asset};
use vantage_graph::graph::RawGraph;
use vantage_graph::model::NodeKind;
use vantage_graph::score::ScoreCache;

use crate::cluster::{ClusterNode, cluster_id, reduce};
use crate::state::ExpansionState;

use super::{GraphAccumulator, ReduceConfig, VisibleGraph};

pub fn build_attack_surface(
    graph: &RawGraph,
    scores: &mut ScoreCache,
    state: &ExpansionState,
    protected: &HashSet<String>,
    config: &ReduceConfig,
) -> VisibleGraph {
    let Some(root_id) = perspective_root(graph) else {
        return VisibleGraph::default();
    };

    let mut acc = GraphAccumulator::new();
    acc.push_real_node(graph, scores, &root_id);

    // Subdomains: top-N limited, clustered like any category bucket.
    let subdomains: Vec<String> = graph
        .iter_nodes()
        .filter(|node| node.kind == NodeKind::Subdomain)
        .map(|node| node.id.clone())
        .collect();
    emit_bucket(
        graph,
        scores,
        state,
        protected,
        config,
        &mut acc,
        &root_id,
        "subdomains",
        "Subdomains",
        &subdomains,
        config.subdomain_limit,
    );

    // Endpoints, one category each, evaluated in priority order.
    let mut by_category: Vec<Vec<String>> = vec![Vec::new(); Category::ORDERED.len()];
    for node in graph.iter_nodes() {
        if !matches!(node.kind, NodeKind::Path | NodeKind::File) {
            continue;
        }
        if is_static_asset(node) {
            continue;
        }
        let category = classify(node);
        let slot = Category::ORDERED
            .iter()
            .position(|c| *c == category)
            .unwrap_or(Category::ORDERED.len() - 1);
        by_category[slot].push(node.id.clone());
    }

    for (slot, members) in by_category.iter().enumerate() {
        let category = Category::ORDERED[slot];
        emit_bucket(
            graph,
            scores,
            state,
            protected,
            config,
            &mut acc,
            &root_id,
            category.as_str(),
            category.label(),
            members,
            category.threshold(),
        );
    }

    acc.ensure_protected(graph, scores, protected, Some(root_id.as_str()));
    acc.finish()
}

/// The primary host root. Prefer a host-kind root; fall back to the first
/// root of any kind in snapshot order.
fn perspective_root(graph: &RawGraph) -> Option<String> {
    graph
        .roots()
        .iter()
        .find(|id| {
            graph
                .node(id)
                .is_some_and(|node| node.kind == NodeKind::Host)
        })
        .or_else(|| graph.roots().first())
        .cloned()
}

/// Emit one root-level bucket: the bucket node itself, a link from root,
/// and links to each member that survives reduction. The bucket node is
/// always present for a non-empty member set so the group stays navigable
/// even when nothing is elided.
#[allow(clippy::too_many_arguments)]
fn emit_bucket(
    graph: &RawGraph,
    scores: &mut ScoreCache,
    state: &ExpansionState,
    protected: &HashSet<String>,
    config: &ReduceConfig,
    acc: &mut GraphAccumulator,
    root_id: &str,
    bucket: &str,
    bucket_label: &str,
    members: &[String],
    threshold: usize,
) {
    if members.is_empty() {
        return;
    }

    let reduction = reduce(
        graph,
        scores,
        state,
        root_id,
        bucket,
        members,
        threshold,
        config.page_size,
        protected,
    );
    let cluster = reduction.cluster.unwrap_or_else(|| ClusterNode {
        id: cluster_id(root_id, bucket),
        parent_id: root_id.to_string(),
        bucket: bucket.to_string(),
        total_count: members.len(),
        shown_count: members.len(),
        hidden_count: 0,
        page_size: config.page_size,
    });
    let bucket_node_id = cluster.id.clone();

    let label = format!("{} ({})", bucket_label, members.len());
    acc.push_cluster_node(cluster, label, 2);
    acc.push_link(root_id, &bucket_node_id);

    for member in &reduction.visible {
        acc.push_real_node(graph, scores, member);
        acc.push_link(&bucket_node_id, member);
    }
}
