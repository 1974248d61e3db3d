//! Camera rig configuration

use glam::{Vec2, Vec3};
use rigcam_core::{Aabb, TimeScaleMode};
use rigcam_physics::layers;
use serde::{Deserialize, Serialize};

use crate::lock::LockOptions;

/// Per-feature switches, each read by its handler on the next frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureToggles {
    pub allow_rotate: bool,
    pub allow_tilt_rotate: bool,
    pub allow_zoom: bool,
    pub allow_drag_move: bool,
    pub allow_keys_move: bool,
    pub allow_screen_side_move: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            allow_rotate: true,
            allow_tilt_rotate: true,
            allow_zoom: true,
            allow_drag_move: true,
            allow_keys_move: true,
            allow_screen_side_move: true,
        }
    }
}

/// Camera rig configuration
///
/// Angles are in degrees, distances in world units, screen sizes in pixels
/// and smoothing times in seconds.
///
/// Preconditions: `0 <= tilt_min <= tilt_max < 90` and
/// `0 < zoom_min <= zoom_max`. The controller does not re-check these every
/// frame; loaders should call [`RigConfig::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Which delta-time feed drives movement and smoothing
    pub time_scale_mode: TimeScaleMode,
    /// Feature switches
    pub toggles: FeatureToggles,
    /// Minimum camera tilt (pitch)
    pub tilt_min: f32,
    /// Maximum camera tilt (pitch), must stay below 90
    pub tilt_max: f32,
    /// Starting yaw
    pub initial_yaw: f32,
    /// Starting zoom distance, clamped into the zoom range
    pub initial_distance: f32,
    /// Rotation speed, x = yaw, y = tilt, per unit of look axis.
    /// Negative values reverse the direction.
    pub rotate_speed: Vec2,
    /// Drag move speed per pixel of drag offset
    pub drag_speed: f32,
    /// Keyboard and screen-side move speed
    pub keys_speed: f32,
    /// Keyboard move speed while the fast modifier is held
    pub keys_speed_fast: f32,
    /// Zoom distance per scroll unit
    pub zoom_speed: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    /// Smoothing time of the applied zoom
    pub zoom_smooth_time: f32,
    /// Drag offset radius below which the drag rests
    pub move_dead_zone: f32,
    /// Width of the screen-side scroll band
    pub screen_side_zone: f32,
    /// Interpolation rate toward a lock anchor and lock zoom
    pub lock_speed: f32,
    /// Snap to the lock anchor instead of interpolating
    pub hard_lock: bool,
    /// Zoom distance approached while a lock slaves the zoom
    pub lock_on_zoom: f32,
    /// Scrolling cancels the lock; otherwise it only stops zoom slaving
    pub zoom_cancels_lock: bool,
    /// Notify lock-cancel listeners when manual input breaks a lock
    pub notify_on_manual_cancel: bool,
    /// Interpolation rate of the ground height correction
    pub ground_follow_rate: f32,
    /// Collision layers the ground probe sees
    pub ground_layer: u32,
    /// Height the ground probe is cast down from
    pub ground_probe_height: f32,
    /// Box confining the camera target
    pub bounds: Aabb,
    /// Vertical field of view used for picking rays
    pub field_of_view: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            time_scale_mode: TimeScaleMode::Unscaled,
            toggles: FeatureToggles::default(),
            tilt_min: 15.0,
            tilt_max: 75.0,
            initial_yaw: 0.0,
            initial_distance: 30.0,
            rotate_speed: Vec2::new(4.0, 4.0),
            drag_speed: 0.02,
            keys_speed: 6.0,
            keys_speed_fast: 12.0,
            zoom_speed: 4.0,
            zoom_min: 5.0,
            zoom_max: 100.0,
            zoom_smooth_time: 0.07,
            move_dead_zone: 5.0,
            screen_side_zone: 60.0,
            lock_speed: 1.5,
            hard_lock: false,
            lock_on_zoom: 10.0,
            zoom_cancels_lock: true,
            notify_on_manual_cancel: false,
            ground_follow_rate: 4.0,
            ground_layer: layers::GROUND,
            ground_probe_height: 10_000.0,
            bounds: Aabb::unbounded(),
            field_of_view: 40.0,
            near_plane: 0.1,
            far_plane: 5000.0,
        }
    }
}

impl RigConfig {
    /// Lock options used by the plain `lock_on_*` calls
    pub fn lock_options(&self) -> LockOptions {
        LockOptions {
            hard: self.hard_lock,
            zoom: self.lock_on_zoom,
        }
    }

    /// Midpoint of the tilt range, the starting pitch
    pub fn tilt_midpoint(&self) -> f32 {
        (self.tilt_min + self.tilt_max) * 0.5
    }

    /// Check the documented preconditions
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..90.0).contains(&self.tilt_min)
            || !(0.0..90.0).contains(&self.tilt_max)
            || self.tilt_min > self.tilt_max
        {
            return Err(ConfigError::InvalidTiltRange {
                min: self.tilt_min,
                max: self.tilt_max,
            });
        }
        if !(self.zoom_min > 0.0) || self.zoom_min > self.zoom_max {
            return Err(ConfigError::InvalidZoomRange {
                min: self.zoom_min,
                max: self.zoom_max,
            });
        }
        let non_negative = [
            ("zoom_smooth_time", self.zoom_smooth_time),
            ("move_dead_zone", self.move_dead_zone),
            ("screen_side_zone", self.screen_side_zone),
            ("lock_speed", self.lock_speed),
            ("ground_follow_rate", self.ground_follow_rate),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }
        // NaN fails the comparison too
        if !self.bounds.half_extents.cmpge(Vec3::ZERO).all() {
            return Err(ConfigError::InvalidBounds(self.bounds.half_extents));
        }
        if !(self.field_of_view > 0.0 && self.field_of_view < 180.0) {
            return Err(ConfigError::InvalidFieldOfView(self.field_of_view));
        }
        Ok(())
    }
}

/// Configuration contract violations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("tilt range {min}..{max} must satisfy 0 <= min <= max < 90")]
    InvalidTiltRange { min: f32, max: f32 },

    #[error("zoom range {min}..{max} must satisfy 0 < min <= max")]
    InvalidZoomRange { min: f32, max: f32 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("bounds half extents {0} must not be negative")]
    InvalidBounds(Vec3),

    #[error("field of view {0} must be within (0, 180) degrees")]
    InvalidFieldOfView(f32),
}
