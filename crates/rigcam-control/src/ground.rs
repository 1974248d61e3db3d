//! Ground height following for the camera target

use glam::Vec3;
use rigcam_physics::{layer_filter, PhysicsWorld};

use crate::smoothing::lerp;

/// Something the target can be rested on
pub trait GroundProbe {
    /// Height of the first ground surface below `(x, from_height, z)` on the
    /// `layer_mask` layers, or `None` on a miss.
    fn ground_height(&self, x: f32, z: f32, from_height: f32, layer_mask: u32) -> Option<f32>;
}

impl GroundProbe for PhysicsWorld {
    fn ground_height(&self, x: f32, z: f32, from_height: f32, layer_mask: u32) -> Option<f32> {
        self.raycast_detailed(
            Vec3::new(x, from_height, z),
            Vec3::NEG_Y,
            f32::MAX,
            layer_filter(layer_mask),
        )
        .map(|hit| hit.point.y)
    }
}

/// Move `target.y` toward the ground below it. Horizontal coordinates never
/// change; a probe miss returns the target untouched.
pub fn follow_ground(
    target: Vec3,
    probe: &dyn GroundProbe,
    probe_height: f32,
    layer_mask: u32,
    t: f32,
) -> Vec3 {
    match probe.ground_height(target.x, target.z, probe_height, layer_mask) {
        Some(height) => Vec3::new(target.x, lerp(target.y, height, t), target.z),
        None => target,
    }
}
