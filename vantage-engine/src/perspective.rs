// Perspective builders: two alternate projections of the same raw graph
//
// Both strategies share the scorer and the cluster reducer and honor the
// same protected set; they differ in how they arrange the surviving nodes.

pub mod attack;
pub mod sitemap;

use std::collections::HashSet;
use std::str::FromStr;

use serde::Serialize;
use vantage_graph::graph::RawGraph;
use vantage_graph::model::NodeKind;
use vantage_graph::score::ScoreCache;

use crate::cluster::{ClusterNode, DEFAULT_PAGE_SIZE, DEFAULT_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perspective {
    Sitemap,
    AttackSurface,
}

impl Perspective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Perspective::Sitemap => "sitemap",
            Perspective::AttackSurface => "attack",
        }
    }
}

impl FromStr for Perspective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sitemap" => Ok(Perspective::Sitemap),
            "attack" | "attack-surface" => Ok(Perspective::AttackSurface),
            other => Err(format!("unknown perspective '{}'", other)),
        }
    }
}

/// Thresholds and paging for the reduction pass.
#[derive(Debug, Clone)]
pub struct ReduceConfig {
    pub directory_threshold: usize,
    pub url_threshold: usize,
    /// Parameterized URLs are mostly noise; by default every one of them
    /// starts behind the cluster.
    pub parameterized_threshold: usize,
    pub static_threshold: usize,
    pub page_size: usize,
    /// Top-N cap for the attack-surface subdomain bucket.
    pub subdomain_limit: usize,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            directory_threshold: DEFAULT_THRESHOLD,
            url_threshold: DEFAULT_THRESHOLD,
            parameterized_threshold: 0,
            static_threshold: 0,
            page_size: DEFAULT_PAGE_SIZE,
            subdomain_limit: 15,
        }
    }
}

/// A node in the reduced graph handed to the rendering layer.
#[derive(Debug, Clone, Serialize)]
pub struct VisibleNode {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub level: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<ClusterNode>,
}

/// A containment link in the reduced graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VisibleLink {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VisibleGraph {
    pub nodes: Vec<VisibleNode>,
    pub links: Vec<VisibleLink>,
}

impl VisibleGraph {
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id == id)
    }

    pub fn node(&self, id: &str) -> Option<&VisibleNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}

/// Accumulator shared by both builders: deduplicates nodes and links while
/// preserving first-insertion order for deterministic output.
pub(crate) struct GraphAccumulator {
    graph: VisibleGraph,
    seen_nodes: HashSet<String>,
    seen_links: HashSet<(String, String)>,
}

impl GraphAccumulator {
    pub(crate) fn new() -> Self {
        Self {
            graph: VisibleGraph::default(),
            seen_nodes: HashSet::new(),
            seen_links: HashSet::new(),
        }
    }

    pub(crate) fn push_real_node(
        &mut self,
        graph: &RawGraph,
        scores: &mut ScoreCache,
        id: &str,
    ) -> bool {
        if self.seen_nodes.contains(id) {
            return false;
        }
        let Some(node) = graph.node(id) else {
            return false;
        };
        let score = scores.score(graph, id);
        self.seen_nodes.insert(id.to_string());
        self.graph.nodes.push(VisibleNode {
            id: node.id.clone(),
            kind: node.kind,
            label: node.label.clone(),
            level: node.level,
            status: node.status,
            score,
            cluster: None,
        });
        true
    }

    pub(crate) fn push_cluster_node(&mut self, cluster: ClusterNode, label: String, level: u32) {
        if self.seen_nodes.contains(&cluster.id) {
            return;
        }
        self.seen_nodes.insert(cluster.id.clone());
        self.graph.nodes.push(VisibleNode {
            id: cluster.id.clone(),
            kind: NodeKind::Cluster,
            label,
            level,
            status: None,
            score: 0,
            cluster: Some(cluster),
        });
    }

    pub(crate) fn push_link(&mut self, source: &str, target: &str) {
        let key = (source.to_string(), target.to_string());
        if self.seen_links.insert(key) {
            self.graph.links.push(VisibleLink {
                source: source.to_string(),
                target: target.to_string(),
            });
        }
    }

    /// Surface any protected id the reduction left out, together with a
    /// link from its nearest already-visible parent. Ancestor chains are
    /// protected alongside their leaves, so the attachment point normally
    /// exists by the time links are wired; a perspective that does not
    /// carry the structural parents supplies a fallback anchor instead.
    pub(crate) fn ensure_protected(
        &mut self,
        graph: &RawGraph,
        scores: &mut ScoreCache,
        protected: &HashSet<String>,
        fallback_parent: Option<&str>,
    ) {
        let mut missing: Vec<&String> = protected
            .iter()
            .filter(|id| graph.contains(id) && !self.seen_nodes.contains(id.as_str()))
            .collect();
        missing.sort();

        for id in &missing {
            self.push_real_node(graph, scores, id.as_str());
        }
        for id in &missing {
            let parent = graph
                .parents_of(id.as_str())
                .iter()
                .map(String::as_str)
                .find(|parent| self.seen_nodes.contains(*parent))
                .or(fallback_parent);
            if let Some(parent) = parent
                && parent != id.as_str()
            {
                self.push_link(parent, id);
            }
        }
    }

    pub(crate) fn finish(self) -> VisibleGraph {
        self.graph
    }
}
