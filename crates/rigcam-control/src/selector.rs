//! Pointer picking that highlights scene objects and locks the rig onto them
//!
//! Fixed objects get a soft point lock at their position. Auto-moving
//! objects get a hard entity lock at a wider zoom, so the rig keeps up with
//! them.

use glam::Vec3;
use rigcam_physics::{layer_filter, layers, PhysicsWorld};
use rigcam_scene::{Entity, SceneRegistry};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::controller::CameraRigController;
use crate::input::InputSnapshot;
use crate::lock::LockOptions;

/// Lock policy of the selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Lock used for objects that stay in place
    pub point_lock: LockOptions,
    /// Lock used for objects that move on their own
    pub entity_lock: LockOptions,
    /// Picking ray length
    pub max_pick_distance: f32,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            point_lock: LockOptions {
                hard: false,
                zoom: 10.0,
            },
            entity_lock: LockOptions {
                hard: true,
                zoom: 20.0,
            },
            max_pick_distance: 5000.0,
        }
    }
}

/// First thing a picking ray hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Scene entity behind the hit, if the collider belongs to one
    pub entity: Option<Entity>,
    pub point: Vec3,
}

/// Ray queries against the pickable scene
pub trait ScenePicker {
    fn pick(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<PickHit>;
}

impl ScenePicker for PhysicsWorld {
    fn pick(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<PickHit> {
        let hit = self.raycast_detailed(origin, direction, max_distance, layer_filter(layers::ALL))?;
        Some(PickHit {
            entity: self.entity_of(hit.collider),
            point: hit.point,
        })
    }
}

/// What a click locked onto
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    Point(Vec3),
    Follow(Entity),
}

/// Hover highlight and click-to-lock
#[derive(Debug, Default)]
pub struct Selector {
    pub config: SelectorConfig,
    hovered: Option<Entity>,
}

impl Selector {
    pub fn new(config: SelectorConfig) -> Self {
        Self {
            config,
            hovered: None,
        }
    }

    /// Currently highlighted entity
    pub fn hovered(&self) -> Option<Entity> {
        self.hovered
    }

    /// Pick under the pointer, move the highlight, and lock the rig on a
    /// primary press over a selectable object.
    pub fn update(
        &mut self,
        input: &InputSnapshot,
        rig: &mut CameraRigController,
        picker: &dyn ScenePicker,
        scene: &mut SceneRegistry,
    ) -> Option<Selection> {
        let candidate = rig
            .screen_ray(input.pointer_position, input.viewport)
            .and_then(|ray| picker.pick(ray.origin, ray.direction, self.config.max_pick_distance))
            .and_then(|hit| hit.entity)
            .filter(|entity| scene.get(*entity).is_some_and(|object| object.selectable));

        if self.hovered != candidate {
            if let Some(previous) = self.hovered.take() {
                scene.set_highlighted(previous, false);
            }
            if let Some(entity) = candidate {
                scene.set_highlighted(entity, true);
                self.hovered = Some(entity);
            }
        }

        let entity = candidate?;
        if !input.buttons.primary.down {
            return None;
        }

        let object = scene.get(entity)?;
        if object.auto_moving {
            debug!(%entity, "selected moving object");
            rig.lock_on_entity_with(entity, &*scene, self.config.entity_lock)
                .then_some(Selection::Follow(entity))
        } else {
            let position = object.transform.position;
            debug!(%entity, ?position, "selected fixed object");
            rig.lock_on_point_with(position, self.config.point_lock);
            Some(Selection::Point(position))
        }
    }
}
