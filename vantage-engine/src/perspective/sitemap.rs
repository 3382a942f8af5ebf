// Sitemap perspective: the containment tree, level-gated and clustered
//
// Rebuilds the host -> subdomain -> directory -> path/file hierarchy
// straight from the containment edges. Children are bucketed per parent so
// parameterized URLs and static assets collapse more aggressively than
// directories and plain endpoints.

use std::collections::{HashSet, VecDeque};

use tracing::debug;
use vantage_graph::classify::is_static_asset;
use vantage_graph::graph::{MAX_WALK_STEPS, RawGraph};
use vantage_graph::model::NodeKind;
use vantage_graph::score::{ScoreCache, has_query_params};

use crate::cluster::reduce;
use crate::state::{ExpansionState, VisibilityMode};

use super::{GraphAccumulator, ReduceConfig, VisibleGraph};

pub fn build_sitemap(
    graph: &RawGraph,
    scores: &mut ScoreCache,
    state: &ExpansionState,
    protected: &HashSet<String>,
    config: &ReduceConfig,
) -> VisibleGraph {
    let gate = visibility_gate(graph, state);
    let mut acc = GraphAccumulator::new();
    let mut queue: VecDeque<String> = VecDeque::new();

    for root in graph.roots() {
        if gate.contains(root) && acc.push_real_node(graph, scores, root) {
            queue.push_back(root.clone());
        }
    }

    let mut steps = 0usize;
    while let Some(parent_id) = queue.pop_front() {
        steps += 1;
        if steps > MAX_WALK_STEPS {
            debug!("Sitemap traversal hit walk cap, truncating view");
            break;
        }

        let parent_level = graph.level_of(&parent_id);
        for (bucket, child_ids, threshold) in
            bucket_children(graph, config, &parent_id, &gate)
        {
            if child_ids.is_empty() {
                continue;
            }
            let reduction = reduce(
                graph,
                scores,
                state,
                &parent_id,
                bucket,
                &child_ids,
                threshold,
                config.page_size,
                protected,
            );
            for child in &reduction.visible {
                if acc.push_real_node(graph, scores, child) {
                    queue.push_back(child.clone());
                }
                acc.push_link(&parent_id, child);
            }
            if let Some(cluster) = reduction.cluster {
                let label = cluster.label();
                let cluster_id = cluster.id.clone();
                acc.push_cluster_node(cluster, label, parent_level + 1);
                acc.push_link(&parent_id, &cluster_id);
            }
        }
    }

    acc.ensure_protected(graph, scores, protected, None);
    acc.finish()
}

/// Which nodes the active visibility regime allows to be shown at all.
/// Clustering then reduces within this set.
fn visibility_gate(graph: &RawGraph, state: &ExpansionState) -> HashSet<String> {
    let mut gate: HashSet<String> = HashSet::new();
    let mut steps = 0usize;

    match state.mode {
        VisibilityMode::LevelCapped(max_level) => {
            // Breadth-first sweep: everything at or above the cap.
            let mut queue: VecDeque<&String> = graph.roots().iter().collect();
            while let Some(id) = queue.pop_front() {
                steps += 1;
                if steps > MAX_WALK_STEPS {
                    debug!("Level sweep hit walk cap");
                    break;
                }
                if graph.level_of(id) > max_level || !gate.insert(id.clone()) {
                    continue;
                }
                for child in graph.children_of(id) {
                    queue.push_back(child);
                }
            }

            // Second flood: expanded nodes reveal their direct children past
            // the cap, continuing through expanded children.
            let mut flood: VecDeque<String> = state
                .expanded_nodes
                .iter()
                .filter(|id| gate.contains(id.as_str()))
                .cloned()
                .collect();
            while let Some(id) = flood.pop_front() {
                steps += 1;
                if steps > MAX_WALK_STEPS {
                    debug!("Expansion flood hit walk cap");
                    break;
                }
                for child in graph.children_of(&id) {
                    if gate.insert(child.clone()) && state.is_node_expanded(child) {
                        flood.push_back(child.clone());
                    }
                }
            }
        }
        VisibilityMode::Expansion => {
            // Pure expansion-driven: roots, then children of expanded
            // nodes, transitively.
            let mut queue: VecDeque<&String> = graph.roots().iter().collect();
            while let Some(id) = queue.pop_front() {
                steps += 1;
                if steps > MAX_WALK_STEPS {
                    debug!("Expansion sweep hit walk cap");
                    break;
                }
                if !gate.insert(id.clone()) {
                    continue;
                }
                if state.is_node_expanded(id) {
                    for child in graph.children_of(id) {
                        queue.push_back(child);
                    }
                }
            }
        }
    }

    gate
}

/// Partition a parent's gate-visible children into sitemap sub-buckets.
/// When the URL-ish children are few enough, parameterized and static
/// entries fold back into the plain URL bucket instead of clustering on
/// their own.
fn bucket_children(
    graph: &RawGraph,
    config: &ReduceConfig,
    parent_id: &str,
    gate: &HashSet<String>,
) -> Vec<(&'static str, Vec<String>, usize)> {
    let mut entities: Vec<String> = Vec::new();
    let mut directories: Vec<String> = Vec::new();
    let mut normal: Vec<String> = Vec::new();
    let mut parameterized: Vec<String> = Vec::new();
    let mut assets: Vec<String> = Vec::new();

    for child_id in graph.children_of(parent_id) {
        if !gate.contains(child_id) {
            continue;
        }
        let Some(child) = graph.node(child_id) else {
            continue;
        };
        match child.kind {
            NodeKind::Host | NodeKind::Subdomain | NodeKind::Ip => {
                entities.push(child_id.clone());
            }
            NodeKind::Dir => directories.push(child_id.clone()),
            NodeKind::Path | NodeKind::File => {
                if is_static_asset(child) {
                    assets.push(child_id.clone());
                } else if has_query_params(child) {
                    parameterized.push(child_id.clone());
                } else {
                    normal.push(child_id.clone());
                }
            }
            NodeKind::Cluster => {}
        }
    }

    let urlish_total = normal.len() + parameterized.len() + assets.len();
    if urlish_total <= config.url_threshold {
        normal.extend(parameterized.drain(..));
        normal.extend(assets.drain(..));
    }

    vec![
        ("subdomains", entities, config.directory_threshold),
        ("directories", directories, config.directory_threshold),
        ("urls", normal, config.url_threshold),
        ("params", parameterized, config.parameterized_threshold),
        ("assets", assets, config.static_threshold),
    ]
}
