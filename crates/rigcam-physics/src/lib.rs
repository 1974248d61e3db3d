//! rigcam Physics - Collision queries using rapier3d
//!
//! The rig never simulates bodies. It needs two queries against static and
//! kinematic geometry: a downward ground probe filtered by layer, and a
//! picking ray that maps the hit collider back to a scene [`Entity`].

use glam::Vec3;
use nalgebra::Unit;
use rapier3d::geometry::{Group, InteractionGroups};
use rapier3d::prelude::*;
use rigcam_scene::Entity;
use tracing::debug;

pub use rapier3d::prelude::ColliderHandle;

/// Collision layer bits
pub mod layers {
    /// Terrain and anything the camera target should rest on
    pub const GROUND: u32 = 1 << 0;
    /// Objects the selector can pick
    pub const PICKABLE: u32 = 1 << 1;
    /// Every layer
    pub const ALL: u32 = u32::MAX;
}

/// Interaction groups for a collider living on `layer`
fn member_of(layer: u32) -> InteractionGroups {
    InteractionGroups::new(Group::from_bits_truncate(layer), Group::ALL)
}

/// Query filter that only sees colliders on any of the `mask` layers
pub fn layer_filter(mask: u32) -> QueryFilter<'static> {
    QueryFilter::default().groups(InteractionGroups::new(
        Group::ALL,
        Group::from_bits_truncate(mask),
    ))
}

/// Collider user data is the entity bits shifted by one so zero means "none".
fn encode_entity(entity: Entity) -> u128 {
    u128::from(entity.to_bits()) + 1
}

fn decode_entity(user_data: u128) -> Option<Entity> {
    let bits = user_data.checked_sub(1)?;
    u64::try_from(bits).ok().map(Entity::from_bits)
}

/// Collision world holding the geometry the rig queries against
pub struct PhysicsWorld {
    /// Rigid body storage (colliders here are parentless, but queries need it)
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,

    /// Island manager, needed for collider removal
    island_manager: IslandManager,
    /// Query pipeline for raycasts
    query_pipeline: QueryPipeline,
    /// Whether colliders changed since the last pipeline refresh
    dirty: bool,
}

impl PhysicsWorld {
    /// Create an empty collision world
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            island_manager: IslandManager::new(),
            query_pipeline: QueryPipeline::new(),
            dirty: false,
        }
    }

    /// Rebuild the acceleration structure after colliders were added or moved.
    ///
    /// Queries issued before a refresh see the previous geometry.
    pub fn refresh_queries(&mut self) {
        if self.dirty {
            self.query_pipeline.update(&self.collider_set);
            self.dirty = false;
        }
    }

    /// Add a static collider
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.dirty = true;
        self.collider_set.insert(collider)
    }

    /// Remove a collider
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.collider_set
            .remove(handle, &mut self.island_manager, &mut self.rigid_body_set, true);
        self.dirty = true;
    }

    /// Get a collider by handle
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Create a flat ground plane on the ground layer
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .collision_groups(member_of(layers::GROUND))
            .build();
        self.add_static_collider(ground)
    }

    /// Create a terrain heightfield collider on the ground layer
    ///
    /// - `heights`: row-major height values (nrows * ncols), Z-outer X-inner
    /// - `nrows`: number of rows (Z axis vertex count)
    /// - `ncols`: number of columns (X axis vertex count)
    /// - `scale`: world-space size (x = total X size, y = height scale, z = total Z size)
    pub fn create_heightfield(
        &mut self,
        heights: &[f32],
        nrows: usize,
        ncols: usize,
        scale: Vec3,
    ) -> ColliderHandle {
        use nalgebra::DMatrix;

        let matrix = DMatrix::from_fn(nrows, ncols, |r, c| heights[r * ncols + c]);

        let collider = ColliderBuilder::heightfield(matrix, vector![scale.x, scale.y, scale.z])
            .collision_groups(member_of(layers::GROUND))
            .build();

        debug!(nrows, ncols, "created terrain heightfield");
        self.add_static_collider(collider)
    }

    /// Create a static box on the given layers
    pub fn create_static_box(
        &mut self,
        half_extents: Vec3,
        position: Vec3,
        layer: u32,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .collision_groups(member_of(layer))
            .build();
        self.add_static_collider(collider)
    }

    /// Create a pickable box that resolves back to `entity`
    pub fn attach_entity_box(
        &mut self,
        entity: Entity,
        half_extents: Vec3,
        position: Vec3,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .collision_groups(member_of(layers::PICKABLE))
            .user_data(encode_entity(entity))
            .build();
        self.add_static_collider(collider)
    }

    /// Move a collider, e.g. to follow a wandering scene object
    pub fn set_collider_position(&mut self, handle: ColliderHandle, position: Vec3) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            collider.set_translation(vector![position.x, position.y, position.z]);
            self.dirty = true;
        }
    }

    /// The scene entity a collider was attached to, if any
    pub fn entity_of(&self, handle: ColliderHandle) -> Option<Entity> {
        self.collider_set
            .get(handle)
            .and_then(|collider| decode_entity(collider.user_data))
    }

    /// Cast a ray and return the first hit
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<(ColliderHandle, f32)> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline.cast_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_distance,
            true,
            filter,
        )
    }

    /// Cast a ray and get detailed hit information
    pub fn raycast_detailed(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(handle, intersection)| RaycastHit {
                collider: handle,
                distance: intersection.time_of_impact,
                point: origin + direction * intersection.time_of_impact,
                normal: Vec3::new(
                    intersection.normal.x,
                    intersection.normal.y,
                    intersection.normal.z,
                ),
            })
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Detailed raycast hit information
#[derive(Debug, Clone)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal at hit point
    pub normal: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_creation() {
        let mut world = PhysicsWorld::new();
        let ground = world.create_ground(0.0);
        assert!(world.get_collider(ground).is_some());
        assert_eq!(world.entity_of(ground), None);
    }

    #[test]
    fn test_raycast_hits_ground() {
        let mut world = PhysicsWorld::new();
        world.create_ground(2.0);
        world.refresh_queries();

        let hit = world.raycast_detailed(
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::NEG_Y,
            100.0,
            layer_filter(layers::GROUND),
        );
        let hit = hit.expect("ground below the ray");
        assert!((hit.point.y - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_layer_filter_skips_other_layers() {
        let mut world = PhysicsWorld::new();
        world.create_static_box(Vec3::splat(1.0), Vec3::new(0.0, 5.0, 0.0), layers::PICKABLE);
        world.create_ground(0.0);
        world.refresh_queries();

        let ground_only = world
            .raycast_detailed(
                Vec3::new(0.0, 50.0, 0.0),
                Vec3::NEG_Y,
                100.0,
                layer_filter(layers::GROUND),
            )
            .unwrap();
        assert!(ground_only.point.y.abs() < 1e-3);

        let everything = world
            .raycast_detailed(
                Vec3::new(0.0, 50.0, 0.0),
                Vec3::NEG_Y,
                100.0,
                layer_filter(layers::ALL),
            )
            .unwrap();
        assert!((everything.point.y - 6.0).abs() < 1e-3);
    }

    #[test]
    fn test_entity_box_maps_back() {
        let mut world = PhysicsWorld::new();
        let entity = Entity::from_raw(0, 0);
        let handle = world.attach_entity_box(entity, Vec3::splat(0.5), Vec3::new(3.0, 0.5, 0.0));
        world.refresh_queries();

        assert_eq!(world.entity_of(handle), Some(entity));
        let (hit, _) = world
            .raycast(
                Vec3::new(3.0, 10.0, 0.0),
                Vec3::NEG_Y,
                100.0,
                layer_filter(layers::PICKABLE),
            )
            .unwrap();
        assert_eq!(hit, handle);
    }

    #[test]
    fn test_moved_collider_needs_refresh() {
        let mut world = PhysicsWorld::new();
        let handle = world.create_static_box(Vec3::splat(0.5), Vec3::ZERO, layers::GROUND);
        world.refresh_queries();

        world.set_collider_position(handle, Vec3::new(20.0, 0.0, 0.0));
        world.refresh_queries();

        let miss = world.raycast(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, 100.0, layer_filter(layers::ALL));
        assert!(miss.is_none());
        let hit = world.raycast(Vec3::new(20.0, 10.0, 0.0), Vec3::NEG_Y, 100.0, layer_filter(layers::ALL));
        assert!(hit.is_some());
    }
}
