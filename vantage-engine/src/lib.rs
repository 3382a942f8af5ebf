pub mod cluster;
pub mod engine;
pub mod pathfind;
pub mod perspective;
pub mod stability;
pub mod state;

pub use cluster::ClusterNode;
pub use engine::{ActivateModifier, ActivationOutcome, Engine, LockTarget, ProtectedSeed};
pub use perspective::{Perspective, ReduceConfig, VisibleGraph, VisibleLink, VisibleNode};
pub use stability::{LayoutCommand, PinnedPos, StabilityCoordinator};
pub use state::{Action, ExpansionState, VisibilityMode};
