//! Mutable rig state and its interaction modes
//!
//! Dragging, edge-scrolling, rotating and locking are not independent flags.
//! [`ControlState`] keeps manual pointer modes on the free side and only lets
//! rotation coexist with a lock, so "dragging while locked" cannot be built.

use glam::{Vec2, Vec3};

use crate::lock::{LockPhase, LockTarget, TargetLock};
use crate::rotation::RotationController;
use crate::zoom::ZoomController;

/// What the pointer is doing to the rig
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerMode {
    #[default]
    Idle,
    /// Pointer sits in a screen-side band and pans the target
    EdgeScrolling,
    /// Middle button drag, anchored where it started
    Dragging { anchor: Vec2 },
    /// Secondary button held, pointer motion turns the camera
    Rotating,
}

/// Interaction mode of the rig
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlState {
    Free { pointer: PointerMode },
    Locked { lock: TargetLock, rotating: bool },
}

impl Default for ControlState {
    fn default() -> Self {
        Self::Free {
            pointer: PointerMode::Idle,
        }
    }
}

impl ControlState {
    pub fn pointer(&self) -> PointerMode {
        match *self {
            Self::Free { pointer } => pointer,
            Self::Locked { rotating: true, .. } => PointerMode::Rotating,
            Self::Locked { rotating: false, .. } => PointerMode::Idle,
        }
    }

    pub fn is_rotating(&self) -> bool {
        self.pointer() == PointerMode::Rotating
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.pointer(), PointerMode::Dragging { .. })
    }

    pub fn is_edge_scrolling(&self) -> bool {
        self.pointer() == PointerMode::EdgeScrolling
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked { .. })
    }

    pub fn lock(&self) -> Option<&TargetLock> {
        match self {
            Self::Locked { lock, .. } => Some(lock),
            Self::Free { .. } => None,
        }
    }

    pub fn lock_mut(&mut self) -> Option<&mut TargetLock> {
        match self {
            Self::Locked { lock, .. } => Some(lock),
            Self::Free { .. } => None,
        }
    }

    pub fn lock_target(&self) -> LockTarget {
        self.lock().map_or(LockTarget::None, TargetLock::target)
    }

    pub fn lock_phase(&self) -> LockPhase {
        self.lock().map_or(LockPhase::Free, TargetLock::phase)
    }

    /// Switch the pointer mode.
    ///
    /// Entering a manual motion mode (drag, edge-scroll) while locked drops
    /// the lock; callers release it first when they need the old value.
    pub fn set_pointer(&mut self, mode: PointerMode) {
        match (self, mode) {
            (Self::Locked { rotating, .. }, PointerMode::Rotating) => *rotating = true,
            (Self::Locked { rotating, .. }, PointerMode::Idle) => *rotating = false,
            (this, pointer) => *this = Self::Free { pointer },
        }
    }

    /// Leave the lock, keeping rotation going. Returns the lock that was active.
    pub fn release_lock(&mut self) -> Option<TargetLock> {
        let Self::Locked { lock, rotating } = *self else {
            return None;
        };
        *self = Self::Free {
            pointer: if rotating {
                PointerMode::Rotating
            } else {
                PointerMode::Idle
            },
        };
        Some(lock)
    }

    /// Enter a lock. Rotation carries over; drag and edge-scroll end.
    pub fn engage(&mut self, lock: TargetLock) {
        let rotating = self.is_rotating();
        *self = Self::Locked { lock, rotating };
    }
}

/// Everything the orchestrator mutates per frame
#[derive(Debug, Clone)]
pub struct RigState {
    /// Camera target position
    pub target: Vec3,
    pub zoom: ZoomController,
    pub rotation: RotationController,
    pub control: ControlState,
}
