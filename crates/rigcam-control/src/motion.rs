//! Manual target motion: screen-side bands, keyboard axes and drag offsets
//! turned into world-space translation on the ground plane.

use glam::{IVec2, Vec2, Vec3};
use rigcam_core::Aabb;

/// Classify the pointer against the screen-side bands.
///
/// `x` is -1 in the left band, 1 in the right band; `y` is -1 in the bottom
/// band, 1 in the top band (bottom-left origin). Positions outside the
/// viewport, or any position in an empty viewport, classify as 0.
pub fn screen_side(pointer: Vec2, viewport: Vec2, zone: f32) -> IVec2 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return IVec2::ZERO;
    }
    let band = |coord: f32, extent: f32| {
        if (0.0..=zone).contains(&coord) {
            -1
        } else if coord >= extent - zone && coord <= extent {
            1
        } else {
            0
        }
    };
    IVec2::new(band(pointer.x, viewport.x), band(pointer.y, viewport.y))
}

/// Camera forward/right flattened onto the horizontal plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl PlanarBasis {
    pub fn from_camera(forward: Vec3, right: Vec3) -> Self {
        let flatten = |v: Vec3| Vec3::new(v.x, 0.0, v.z).normalize_or_zero();
        Self {
            forward: flatten(forward),
            right: flatten(right),
        }
    }

    /// `direction.x` goes right, `direction.z` goes forward; `y` is ignored
    pub fn to_world(&self, direction: Vec3) -> Vec3 {
        self.forward * direction.z + self.right * direction.x
    }
}

/// Move speed multiplier for the current zoom; zoomed out moves faster
pub fn zoom_speed_factor(damped_zoom: f32, zoom_min: f32) -> f32 {
    damped_zoom / zoom_min
}

/// Translate `target` along `direction` in camera-relative ground space and
/// confine it to `bounds`.
pub fn translate(
    target: Vec3,
    direction: Vec3,
    basis: &PlanarBasis,
    scale: f32,
    bounds: &Aabb,
) -> Vec3 {
    bounds.closest_point(target + basis.to_world(direction) * scale)
}

/// Drag offset as a move direction, or `None` while inside the dead zone
pub fn drag_direction(anchor: Vec2, pointer: Vec2, dead_zone: f32) -> Option<Vec3> {
    let offset = pointer - anchor;
    (offset.length_squared() > dead_zone * dead_zone).then(|| Vec3::new(offset.x, 0.0, offset.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(1920.0, 1080.0);

    #[test]
    fn left_band() {
        assert_eq!(screen_side(Vec2::new(30.0, 500.0), VIEWPORT, 60.0), IVec2::new(-1, 0));
    }

    #[test]
    fn center_is_idle() {
        assert_eq!(screen_side(Vec2::new(960.0, 540.0), VIEWPORT, 60.0), IVec2::ZERO);
    }

    #[test]
    fn corners_and_outside() {
        assert_eq!(screen_side(Vec2::new(1900.0, 1070.0), VIEWPORT, 60.0), IVec2::new(1, 1));
        assert_eq!(screen_side(Vec2::new(0.0, 0.0), VIEWPORT, 60.0), IVec2::new(-1, -1));
        assert_eq!(screen_side(Vec2::new(-5.0, 2000.0), VIEWPORT, 60.0), IVec2::ZERO);
        assert_eq!(screen_side(Vec2::ZERO, Vec2::ZERO, 60.0), IVec2::ZERO);
    }

    #[test]
    fn basis_drops_vertical_component() {
        let basis = PlanarBasis::from_camera(Vec3::new(0.0, -0.7, -0.7), Vec3::X);
        assert!((basis.forward - Vec3::NEG_Z).length() < 1e-5);
        assert_eq!(basis.to_world(Vec3::new(1.0, 5.0, 0.0)), Vec3::X);
    }

    #[test]
    fn translate_clamps_to_bounds() {
        let basis = PlanarBasis::from_camera(Vec3::NEG_Z, Vec3::X);
        let bounds = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(10.0));
        let moved = translate(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), &basis, 100.0, &bounds);
        assert_eq!(moved, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn drag_dead_zone() {
        assert_eq!(drag_direction(Vec2::ZERO, Vec2::new(3.0, 4.0), 5.0), None);
        assert_eq!(
            drag_direction(Vec2::ZERO, Vec2::new(3.0, 4.5), 5.0),
            Some(Vec3::new(3.0, 0.0, 4.5))
        );
    }
}
