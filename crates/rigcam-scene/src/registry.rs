use glam::Vec3;
use rigcam_core::Transform;

use crate::entity::{Entity, EntityAllocator};
use crate::error::SceneError;

/// Resolves a weak entity handle to a world position.
///
/// Returns `None` when the handle no longer refers to a live object.
pub trait PositionLookup {
    fn position_of(&self, entity: Entity) -> Option<Vec3>;
}

/// A placeable object the camera can frame and the selector can pick
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// World transform
    pub transform: Transform,
    /// Whether the selector may highlight and lock onto this object
    pub selectable: bool,
    /// Whether the object moves on its own (follow it instead of its spot)
    pub auto_moving: bool,
    /// Outline highlight state, owned by the selector
    pub highlighted: bool,
}

impl SceneObject {
    /// A selectable object that stays where it is placed
    pub fn fixed(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            selectable: true,
            auto_moving: false,
            highlighted: false,
        }
    }

    /// A selectable object that moves by itself
    pub fn moving(position: Vec3) -> Self {
        Self {
            auto_moving: true,
            ..Self::fixed(position)
        }
    }

    /// Scenery the selector ignores
    pub fn scenery(position: Vec3) -> Self {
        Self {
            selectable: false,
            ..Self::fixed(position)
        }
    }
}

/// Owns all scene objects, addressed by generational [`Entity`] handles
#[derive(Debug, Default)]
pub struct SceneRegistry {
    entities: EntityAllocator,
    objects: Vec<Option<(Entity, SceneObject)>>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and return its handle.
    pub fn spawn(&mut self, object: SceneObject) -> Entity {
        let entity = self.entities.allocate();
        let idx = entity.index() as usize;
        if idx >= self.objects.len() {
            self.objects.resize_with(idx + 1, || None);
        }
        self.objects[idx] = Some((entity, object));
        entity
    }

    /// Remove an object. Returns `true` if it was alive.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.entities.deallocate(entity) {
            return false;
        }
        self.objects[entity.index() as usize] = None;
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, entity: Entity) -> Option<&SceneObject> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        self.objects
            .get(entity.index() as usize)?
            .as_ref()
            .map(|(_, object)| object)
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut SceneObject> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        self.objects
            .get_mut(entity.index() as usize)?
            .as_mut()
            .map(|(_, object)| object)
    }

    /// Move an object to a new world position.
    pub fn set_position(&mut self, entity: Entity, position: Vec3) -> Result<(), SceneError> {
        let object = self
            .get_mut(entity)
            .ok_or(SceneError::DeadEntity(entity))?;
        object.transform.position = position;
        Ok(())
    }

    /// Set the highlight flag. Dead handles are ignored.
    pub fn set_highlighted(&mut self, entity: Entity, highlighted: bool) {
        if let Some(object) = self.get_mut(entity) {
            object.highlighted = highlighted;
        }
    }

    /// Iterate over all live `(Entity, &SceneObject)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &SceneObject)> + '_ {
        self.objects
            .iter()
            .filter_map(|slot| slot.as_ref().map(|(entity, object)| (*entity, object)))
    }
}

impl PositionLookup for SceneRegistry {
    fn position_of(&self, entity: Entity) -> Option<Vec3> {
        self.get(entity).map(|object| object.transform.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_and_lookup() {
        let mut scene = SceneRegistry::new();
        let e = scene.spawn(SceneObject::fixed(Vec3::new(1.0, 2.0, 3.0)));
        assert!(scene.is_alive(e));
        assert_eq!(scene.position_of(e), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn despawned_handle_reads_absent() {
        let mut scene = SceneRegistry::new();
        let e = scene.spawn(SceneObject::moving(Vec3::ZERO));
        assert!(scene.despawn(e));
        assert_eq!(scene.position_of(e), None);
        assert!(!scene.despawn(e));

        let reused = scene.spawn(SceneObject::fixed(Vec3::ONE));
        assert_eq!(reused.index(), e.index());
        assert_eq!(scene.position_of(e), None);
        assert_eq!(scene.position_of(reused), Some(Vec3::ONE));
    }

    #[test]
    fn set_position_on_dead_entity_errors() {
        let mut scene = SceneRegistry::new();
        let e = scene.spawn(SceneObject::fixed(Vec3::ZERO));
        scene.set_position(e, Vec3::X).unwrap();
        assert_eq!(scene.position_of(e), Some(Vec3::X));

        scene.despawn(e);
        assert_eq!(scene.set_position(e, Vec3::Y), Err(SceneError::DeadEntity(e)));
    }

    #[test]
    fn iter_skips_dead_slots() {
        let mut scene = SceneRegistry::new();
        let a = scene.spawn(SceneObject::fixed(Vec3::ZERO));
        let b = scene.spawn(SceneObject::scenery(Vec3::X));
        scene.despawn(a);
        let c = scene.spawn(SceneObject::moving(Vec3::Y));

        let live: Vec<Entity> = scene.iter().map(|(e, _)| e).collect();
        assert_eq!(live.len(), 2);
        assert!(live.contains(&b));
        assert!(live.contains(&c));
        assert!(!live.contains(&a));
    }
}
