// Session expansion state and its reducers
//
// All transitions are expressed as pure reducers over an action enum, so
// each state machine can be exercised without a rendering layer attached.

use std::collections::{HashMap, HashSet};

use tracing::debug;
use vantage_graph::RawGraph;

use crate::cluster::cluster_parent;

/// Which visibility regime is active. Exactly one applies at a time:
/// either visibility is purely expansion-driven (tree presentation), or a
/// breadth-first level cap gates it (graph presentation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityMode {
    Expansion,
    LevelCapped(u32),
}

impl VisibilityMode {
    pub fn level_cap(&self) -> Option<u32> {
        match self {
            VisibilityMode::Expansion => None,
            VisibilityMode::LevelCapped(level) => Some(*level),
        }
    }
}

/// Session-scoped UI state. Mutated only through [`apply`]; the visible
/// graph is recomputed from scratch after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionState {
    pub expanded_nodes: HashSet<String>,
    pub expanded_clusters: HashSet<String>,
    /// Extra items revealed beyond a cluster's base threshold.
    pub cluster_reveal: HashMap<String, usize>,
    pub mode: VisibilityMode,
}

impl Default for ExpansionState {
    fn default() -> Self {
        Self {
            expanded_nodes: HashSet::new(),
            expanded_clusters: HashSet::new(),
            cluster_reveal: HashMap::new(),
            mode: VisibilityMode::LevelCapped(2),
        }
    }
}

impl ExpansionState {
    pub fn expansion_mode() -> Self {
        Self {
            mode: VisibilityMode::Expansion,
            ..Self::default()
        }
    }

    pub fn is_node_expanded(&self, id: &str) -> bool {
        self.expanded_nodes.contains(id)
    }

    pub fn is_cluster_expanded(&self, id: &str) -> bool {
        self.expanded_clusters.contains(id)
    }

    pub fn reveal_count(&self, cluster_id: &str) -> Option<usize> {
        self.cluster_reveal.get(cluster_id).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ExpandNode(String),
    /// Collapse a node and prune every expansion entry belonging to its
    /// subtree, so stale entries for unreachable branches are never read
    /// back.
    CollapseNode(String),
    /// First activation of a cluster: mark expanded and seed the reveal
    /// counter with one page.
    ExpandCluster {
        cluster_id: String,
        page_size: usize,
    },
    /// Subsequent activation while items remain hidden.
    RevealMore {
        cluster_id: String,
        page_size: usize,
    },
    /// Activation with nothing left hidden: back to the base state.
    CollapseCluster(String),
    /// Switch visibility regime. Any level change (and any mode switch)
    /// clears manual expansions so no stale branch silently re-reveals.
    SetMode(VisibilityMode),
    ClearExpansions,
}

/// Pure reducer: `(state, action) -> state`. The graph is consulted only to
/// resolve subtrees for collapse pruning.
pub fn apply(state: &ExpansionState, action: &Action, graph: &RawGraph) -> ExpansionState {
    let mut next = state.clone();
    match action {
        Action::ExpandNode(id) => {
            next.expanded_nodes.insert(id.clone());
        }
        Action::CollapseNode(id) => {
            next.expanded_nodes.remove(id);
            prune_subtree(&mut next, graph, id);
        }
        Action::ExpandCluster {
            cluster_id,
            page_size,
        } => {
            next.expanded_clusters.insert(cluster_id.clone());
            next.cluster_reveal.insert(cluster_id.clone(), *page_size);
        }
        Action::RevealMore {
            cluster_id,
            page_size,
        } => {
            next.expanded_clusters.insert(cluster_id.clone());
            let reveal = next.cluster_reveal.entry(cluster_id.clone()).or_insert(0);
            *reveal += page_size;
        }
        Action::CollapseCluster(cluster_id) => {
            next.expanded_clusters.remove(cluster_id);
            next.cluster_reveal.remove(cluster_id);
        }
        Action::SetMode(mode) => {
            next.mode = *mode;
            next.expanded_nodes.clear();
            next.expanded_clusters.clear();
            next.cluster_reveal.clear();
        }
        Action::ClearExpansions => {
            next.expanded_nodes.clear();
            next.expanded_clusters.clear();
            next.cluster_reveal.clear();
        }
    }
    next
}

/// Remove every expansion entry that belongs to `id`'s subtree: expanded
/// descendants, and cluster entries whose parent is `id` or a descendant.
fn prune_subtree(state: &mut ExpansionState, graph: &RawGraph, id: &str) {
    let descendants = graph.descendants(id);
    let mut gone: HashSet<&str> = HashSet::with_capacity(descendants.len() + 1);
    gone.insert(id);
    for descendant in &descendants {
        gone.insert(descendant);
        state.expanded_nodes.remove(descendant.as_str());
    }

    let stale_clusters: Vec<String> = state
        .expanded_clusters
        .iter()
        .filter(|cluster_id| {
            cluster_parent(cluster_id).is_some_and(|parent| gone.contains(parent))
        })
        .cloned()
        .collect();
    for cluster_id in &stale_clusters {
        state.expanded_clusters.remove(cluster_id);
    }
    state
        .cluster_reveal
        .retain(|cluster_id, _| !cluster_parent(cluster_id).is_some_and(|p| gone.contains(p)));

    if !stale_clusters.is_empty() || !descendants.is_empty() {
        debug!(
            "Collapsed '{}': pruned {} descendants, {} cluster entries",
            id,
            descendants.len(),
            stale_clusters.len()
        );
    }
}
