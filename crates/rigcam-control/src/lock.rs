//! Target lock anchors
//!
//! A lock either pins the camera target to a fixed point or follows a scene
//! entity through its weak handle. Entity anchors are re-resolved every frame
//! and fall back to a fixed point at the last known position once the entity
//! is gone.

use glam::Vec3;
use rigcam_scene::{Entity, PositionLookup};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a lock drives the target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LockOptions {
    /// Snap to the anchor every frame instead of interpolating toward it
    pub hard: bool,
    /// Zoom distance approached while zoom is slaved to the lock
    pub zoom: f32,
}

/// Public view of what the rig is locked onto
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LockTarget {
    #[default]
    None,
    FixedPoint(Vec3),
    FollowEntity(Entity),
}

/// Named lock phases of the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockPhase {
    Free,
    LockedToPoint,
    LockedToEntity,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Anchor {
    Point(Vec3),
    Entity { entity: Entity, last_known: Vec3 },
}

/// An active lock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetLock {
    anchor: Anchor,
    pub options: LockOptions,
    /// Whether the desired zoom is driven toward `options.zoom`
    pub zoom_slaved: bool,
}

impl TargetLock {
    /// Lock onto a fixed world position
    pub fn point(position: Vec3, options: LockOptions) -> Self {
        Self {
            anchor: Anchor::Point(position),
            options,
            zoom_slaved: true,
        }
    }

    /// Lock onto an entity if the handle is live, `None` otherwise
    pub fn entity(entity: Entity, lookup: &dyn PositionLookup, options: LockOptions) -> Option<Self> {
        let last_known = lookup.position_of(entity)?;
        Some(Self {
            anchor: Anchor::Entity { entity, last_known },
            options,
            zoom_slaved: true,
        })
    }

    /// The position this lock pulls the target toward this frame.
    ///
    /// An entity anchor whose handle no longer resolves degrades to a point
    /// anchor at the last position it was seen at.
    pub fn resolve(&mut self, lookup: &dyn PositionLookup) -> Vec3 {
        match self.anchor {
            Anchor::Point(position) => position,
            Anchor::Entity { entity, last_known } => match lookup.position_of(entity) {
                Some(position) => {
                    self.anchor = Anchor::Entity {
                        entity,
                        last_known: position,
                    };
                    position
                }
                None => {
                    debug!(%entity, ?last_known, "lock entity gone, holding last known position");
                    self.anchor = Anchor::Point(last_known);
                    last_known
                }
            },
        }
    }

    pub fn target(&self) -> LockTarget {
        match self.anchor {
            Anchor::Point(position) => LockTarget::FixedPoint(position),
            Anchor::Entity { entity, .. } => LockTarget::FollowEntity(entity),
        }
    }

    pub fn phase(&self) -> LockPhase {
        match self.anchor {
            Anchor::Point(_) => LockPhase::LockedToPoint,
            Anchor::Entity { .. } => LockPhase::LockedToEntity,
        }
    }
}
