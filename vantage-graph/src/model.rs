use serde::{Deserialize, Serialize};

/// What a node in the discovery graph represents.
///
/// The kind is fixed when the node is created by the scanning side;
/// the engine never reclassifies a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Host,
    Subdomain,
    Dir,
    Path,
    File,
    Ip,
    Cluster,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Host => "host",
            NodeKind::Subdomain => "subdomain",
            NodeKind::Dir => "dir",
            NodeKind::Path => "path",
            NodeKind::File => "file",
            NodeKind::Ip => "ip",
            NodeKind::Cluster => "cluster",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }
}

/// A scanner finding attached to a node. Consumed read-only by the scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single entity discovered during a scan: a host, subdomain, directory,
/// endpoint or IP address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    /// Globally unique within one scan. The persistence layer guarantees
    /// one id per logical entity; the engine never merges duplicates.
    pub id: String,
    pub kind: NodeKind,
    /// Depth in the containment tree, root = 1. Zero means "unknown" and is
    /// filled in from the containment edges at load time.
    #[serde(default)]
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Short display text.
    pub label: String,
    /// Full normalized path or URL. Falls back to `label` when absent.
    #[serde(default)]
    pub full_label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub findings: Vec<Finding>,
}

impl GraphNode {
    /// The most complete path text we have for this node.
    pub fn display_path(&self) -> &str {
        if self.full_label.is_empty() {
            &self.label
        } else {
            &self.full_label
        }
    }

    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }
}

/// Directed containment edge: the source structurally owns the target
/// (host owns subdomain, directory owns file, and so on).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

/// The raw graph as handed over by the scanning side, before indexing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}
