pub mod classify;
pub mod error;
pub mod graph;
pub mod model;
pub mod score;

pub use classify::Category;
pub use error::GraphError;
pub use graph::RawGraph;
pub use model::{Finding, GraphEdge, GraphNode, GraphSnapshot, NodeKind, Severity};
