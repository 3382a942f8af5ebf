// Interaction stability: pinning nodes against the force layout
//
// The force simulation is owned by the rendering side; this coordinator
// only decides which nodes hold a fixed position and tells the caller how
// to pause or resume the simulation so the view never visibly jumps while
// the user inspects or repositions nodes.

use std::collections::{HashMap, HashSet};

use tracing::debug;

/// Simulation energy used after a hover ends: enough for nodes to settle,
/// low enough to avoid a visible jump.
pub const REDUCED_ENERGY: f32 = 0.3;
/// Simulation energy after a drag ends.
pub const MINIMAL_ENERGY: f32 = 0.1;
/// Delay before the post-drag resume so neighbors settle gradually.
pub const RESETTLE_DELAY_MS: u64 = 250;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinnedPos {
    pub x: f32,
    pub y: f32,
}

/// Instruction for the externally owned layout simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutCommand {
    /// Stop the simulation entirely.
    Halt,
    /// Restart relaxation at the given energy after the given delay,
    /// instead of a full restart.
    Resume { energy: f32, delay_ms: u64 },
}

#[derive(Debug, Default)]
pub struct StabilityCoordinator {
    pins: HashMap<String, PinnedPos>,
    /// Explicit per-node locks. A locked node is only ever released by its
    /// own toggle, never by hover-end or global unlock.
    locked: HashSet<String>,
    global_lock: bool,
    hovering: bool,
}

impl StabilityCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.pins.contains_key(id)
    }

    pub fn pinned_position(&self, id: &str) -> Option<PinnedPos> {
        self.pins.get(id).copied()
    }

    pub fn is_locked(&self, id: &str) -> bool {
        self.locked.contains(id)
    }

    pub fn global_locked(&self) -> bool {
        self.global_lock
    }

    pub fn pinned_count(&self) -> usize {
        self.pins.len()
    }

    /// Hover began: freeze every visible node where it stands (the caller
    /// passes current positions) so nothing drifts under the tooltip.
    pub fn hover_start(&mut self, positions: &[(String, PinnedPos)]) -> LayoutCommand {
        for (id, pos) in positions {
            self.pins.entry(id.clone()).or_insert(*pos);
        }
        self.hovering = true;
        LayoutCommand::Halt
    }

    /// Hover ended: release everything that is not explicitly locked and
    /// resume at reduced energy. Under global lock nothing moves.
    pub fn hover_end(&mut self) -> Option<LayoutCommand> {
        self.hovering = false;
        if self.global_lock {
            return None;
        }
        self.release_unlocked();
        Some(LayoutCommand::Resume {
            energy: REDUCED_ENERGY,
            delay_ms: 0,
        })
    }

    /// Drag ended: the dragged node stays where the user dropped it,
    /// regardless of lock state.
    pub fn drag_end(&mut self, id: &str, pos: PinnedPos) -> Option<LayoutCommand> {
        self.pins.insert(id.to_string(), pos);
        if self.global_lock {
            return None;
        }
        Some(LayoutCommand::Resume {
            energy: MINIMAL_ENERGY,
            delay_ms: RESETTLE_DELAY_MS,
        })
    }

    /// Toggle the explicit lock on one node. Locking requires a current
    /// position to hold; unlocking releases the pin unless a hover freeze
    /// or global lock is still holding the graph.
    pub fn set_node_lock(&mut self, id: &str, pos: PinnedPos, locked: bool) {
        if locked {
            self.locked.insert(id.to_string());
            self.pins.insert(id.to_string(), pos);
        } else {
            self.locked.remove(id);
            if !self.global_lock && !self.hovering {
                self.pins.remove(id);
            }
        }
    }

    /// Global lock on: pin every currently positioned node and halt.
    /// Off: release everything outside the explicit lock set.
    pub fn set_global_lock(
        &mut self,
        enabled: bool,
        positions: &[(String, PinnedPos)],
    ) -> LayoutCommand {
        self.global_lock = enabled;
        if enabled {
            for (id, pos) in positions {
                self.pins.entry(id.clone()).or_insert(*pos);
            }
            debug!("Global lock on, {} nodes pinned", self.pins.len());
            LayoutCommand::Halt
        } else {
            self.release_unlocked();
            LayoutCommand::Resume {
                energy: REDUCED_ENERGY,
                delay_ms: 0,
            }
        }
    }

    fn release_unlocked(&mut self) {
        let locked = &self.locked;
        self.pins.retain(|id, _| locked.contains(id));
    }
}
