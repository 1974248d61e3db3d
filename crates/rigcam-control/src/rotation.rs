//! Camera yaw and tilt

use glam::{Quat, Vec3};

/// Yaw and tilt of the camera around its target, in degrees.
///
/// Yaw turns clockwise seen from above and wraps into `[0, 360)`. Tilt
/// (pitch) looks down from the horizon; 0 is level, 90 straight down.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationController {
    yaw: f32,
    pitch: f32,
    /// Sign of the last horizontal turn, `true` for positive
    last_turn_positive: bool,
}

impl RotationController {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self {
            yaw: yaw.rem_euclid(360.0),
            pitch,
            last_turn_positive: false,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn last_turn_positive(&self) -> bool {
        self.last_turn_positive
    }

    /// Add to yaw. Zero is ignored and leaves the turn direction alone.
    pub fn turn(&mut self, degrees: f32) {
        if degrees == 0.0 {
            return;
        }
        self.last_turn_positive = degrees > 0.0;
        self.yaw = (self.yaw + degrees).rem_euclid(360.0);
    }

    /// Add to pitch, clamped to `[min, max]`
    pub fn tilt(&mut self, degrees: f32, min: f32, max: f32) {
        self.pitch = (self.pitch + degrees).clamp(min, max);
    }

    /// Camera orientation; local -Z is the view direction
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw.to_radians()) * Quat::from_rotation_x(-self.pitch.to_radians())
    }

    /// View direction
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation() * Vec3::X
    }
}
