// Engine facade: one explicit instance per loaded scan
//
// Holds the raw graph, the session expansion state and the stability
// coordinator behind a constructor-built object. Every recompute is a pure
// projection; activations are translated into reducer actions and applied
// atomically between recomputes.

use std::collections::{HashMap, HashSet};

use tracing::debug;
use vantage_graph::graph::RawGraph;
use vantage_graph::score::ScoreCache;

use crate::cluster::ClusterNode;
use crate::pathfind::{self, SearchMatch};
use crate::perspective::{
    Perspective, ReduceConfig, VisibleGraph, attack::build_attack_surface,
    sitemap::build_sitemap,
};
use crate::stability::{LayoutCommand, PinnedPos, StabilityCoordinator};
use crate::state::{Action, ExpansionState, VisibilityMode, apply};

/// The ids the caller wants kept visible no matter what the thresholds
/// say: current selection, search highlights, the highlighted path and
/// bookmarks. Ancestor chains and the perspective roots are derived from
/// these on every recompute.
#[derive(Debug, Clone, Default)]
pub struct ProtectedSeed {
    pub selected: Option<String>,
    pub highlighted: Vec<String>,
    pub highlight_path: Vec<String>,
    pub bookmarks: Vec<String>,
}

/// Derive the full protected set: the seeded ids, every ancestor of each,
/// and the perspective roots. Recomputed per call, never stored.
pub fn build_protected_set(graph: &RawGraph, seed: &ProtectedSeed) -> HashSet<String> {
    let mut protected: HashSet<String> = HashSet::new();
    let seeds = seed
        .selected
        .iter()
        .chain(seed.highlighted.iter())
        .chain(seed.highlight_path.iter())
        .chain(seed.bookmarks.iter());

    for id in seeds {
        if !graph.contains(id) {
            continue;
        }
        if protected.insert(id.clone()) {
            for ancestor in graph.ancestor_chain(id) {
                protected.insert(ancestor);
            }
        }
    }
    for root in graph.roots() {
        protected.insert(root.clone());
    }
    protected
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivateModifier {
    /// Plain activation: toggle expansion, page through clusters.
    Primary,
    /// Modified activation: collapse the branch or bucket outright.
    Alternate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActivationOutcome {
    ExpandedNode(String),
    CollapsedNode(String),
    ClusterExpanded(String),
    ClusterRevealed(String),
    ClusterCollapsed(String),
    /// Unknown id, or an activation with nothing to do.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockTarget {
    Node(String),
    All,
}

pub struct Engine {
    graph: RawGraph,
    scores: ScoreCache,
    state: ExpansionState,
    stability: StabilityCoordinator,
    config: ReduceConfig,
    /// Cluster descriptors from the most recent recompute. Activations
    /// consult what was actually rendered, not a hypothetical rebuild.
    last_clusters: HashMap<String, ClusterNode>,
}

impl Engine {
    pub fn new(graph: RawGraph) -> Self {
        Self::with_config(graph, ReduceConfig::default())
    }

    pub fn with_config(graph: RawGraph, config: ReduceConfig) -> Self {
        Self {
            graph,
            scores: ScoreCache::new(),
            state: ExpansionState::default(),
            stability: StabilityCoordinator::new(),
            config,
            last_clusters: HashMap::new(),
        }
    }

    pub fn graph(&self) -> &RawGraph {
        &self.graph
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.state
    }

    pub fn config(&self) -> &ReduceConfig {
        &self.config
    }

    pub fn stability(&self) -> &StabilityCoordinator {
        &self.stability
    }

    /// Switch visibility regime. Clears manual expansions so no stale
    /// branch re-reveals under the new mode.
    pub fn set_mode(&mut self, mode: VisibilityMode) {
        self.state = apply(&self.state, &Action::SetMode(mode), &self.graph);
    }

    pub fn compute_visible_graph(
        &mut self,
        seed: &ProtectedSeed,
        perspective: Perspective,
    ) -> VisibleGraph {
        let protected = build_protected_set(&self.graph, seed);
        let visible = match perspective {
            Perspective::Sitemap => build_sitemap(
                &self.graph,
                &mut self.scores,
                &self.state,
                &protected,
                &self.config,
            ),
            Perspective::AttackSurface => build_attack_surface(
                &self.graph,
                &mut self.scores,
                &self.state,
                &protected,
                &self.config,
            ),
        };
        self.last_clusters = visible
            .nodes
            .iter()
            .filter_map(|node| {
                node.cluster
                    .clone()
                    .map(|cluster| (node.id.clone(), cluster))
            })
            .collect();
        visible
    }

    /// Translate a node or cluster activation into the matching state
    /// transition. Cluster activations follow the three-phase cycle:
    /// collapsed -> expanded-partial -> expanded-full -> collapsed.
    pub fn on_node_activate(
        &mut self,
        node_id: &str,
        modifier: ActivateModifier,
    ) -> ActivationOutcome {
        let action = if node_id.starts_with("cluster:") {
            let Some(cluster) = self.last_clusters.get(node_id) else {
                debug!("Activation for unknown cluster '{}'", node_id);
                return ActivationOutcome::Ignored;
            };
            let expanded = self.state.is_cluster_expanded(node_id);
            if modifier == ActivateModifier::Alternate {
                if !expanded {
                    return ActivationOutcome::Ignored;
                }
                Action::CollapseCluster(node_id.to_string())
            } else if !expanded {
                if cluster.hidden_count == 0 {
                    return ActivationOutcome::Ignored;
                }
                Action::ExpandCluster {
                    cluster_id: node_id.to_string(),
                    page_size: cluster.page_size,
                }
            } else if cluster.hidden_count > 0 {
                Action::RevealMore {
                    cluster_id: node_id.to_string(),
                    page_size: cluster.page_size,
                }
            } else {
                Action::CollapseCluster(node_id.to_string())
            }
        } else {
            if !self.graph.contains(node_id) {
                debug!("Activation for unknown node '{}'", node_id);
                return ActivationOutcome::Ignored;
            }
            if modifier == ActivateModifier::Alternate || self.state.is_node_expanded(node_id) {
                Action::CollapseNode(node_id.to_string())
            } else {
                Action::ExpandNode(node_id.to_string())
            }
        };

        let outcome = match &action {
            Action::ExpandNode(id) => ActivationOutcome::ExpandedNode(id.clone()),
            Action::CollapseNode(id) => ActivationOutcome::CollapsedNode(id.clone()),
            Action::ExpandCluster { cluster_id, .. } => {
                ActivationOutcome::ClusterExpanded(cluster_id.clone())
            }
            Action::RevealMore { cluster_id, .. } => {
                ActivationOutcome::ClusterRevealed(cluster_id.clone())
            }
            Action::CollapseCluster(id) => ActivationOutcome::ClusterCollapsed(id.clone()),
            _ => ActivationOutcome::Ignored,
        };
        self.state = apply(&self.state, &action, &self.graph);
        outcome
    }

    pub fn shortest_path(&self, from: &str, to: &str, visible: &VisibleGraph) -> Vec<String> {
        pathfind::shortest_path(from, to, &visible.links)
    }

    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchMatch> {
        pathfind::search_nodes(&self.graph, query, limit)
    }

    pub fn two_term_path(
        &self,
        visible: &VisibleGraph,
        term_a: &str,
        term_b: &str,
    ) -> Vec<String> {
        pathfind::two_term_path(&self.graph, visible, term_a, term_b)
    }

    /// Lock or unlock one node, or the whole graph. Current positions are
    /// supplied by the rendering layer, which is the only party that knows
    /// them.
    pub fn set_lock(
        &mut self,
        target: LockTarget,
        enabled: bool,
        positions: &[(String, PinnedPos)],
    ) -> Option<LayoutCommand> {
        match target {
            LockTarget::All => Some(self.stability.set_global_lock(enabled, positions)),
            LockTarget::Node(id) => {
                let pos = positions
                    .iter()
                    .find(|(pos_id, _)| *pos_id == id)
                    .map(|(_, pos)| *pos)
                    .or_else(|| self.stability.pinned_position(&id))?;
                self.stability.set_node_lock(&id, pos, enabled);
                None
            }
        }
    }

    pub fn hover_start(&mut self, positions: &[(String, PinnedPos)]) -> LayoutCommand {
        self.stability.hover_start(positions)
    }

    pub fn hover_end(&mut self) -> Option<LayoutCommand> {
        self.stability.hover_end()
    }

    pub fn drag_end(&mut self, id: &str, pos: PinnedPos) -> Option<LayoutCommand> {
        self.stability.drag_end(id, pos)
    }
}
