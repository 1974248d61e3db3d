//! Zoom distance: desired value from input, damped value for rendering

use crate::smoothing::{lerp, smooth_damp};

/// What a scroll input means for an active lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollEffect {
    /// No scroll this frame
    None,
    /// Scroll happened and should cancel the lock
    CancelLock,
    /// Scroll happened and should only stop zoom slaving
    StopSlaving,
}

/// Desired vs. damped zoom distance
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomController {
    /// Distance requested by input or lock slaving
    desired: f32,
    /// Smoothed distance the renderer consumes
    damped: f32,
    /// Velocity state of the damping spring
    velocity: f32,
}

impl ZoomController {
    /// Start at rest at `distance`, clamped into `[min, max]`
    pub fn new(distance: f32, min: f32, max: f32) -> Self {
        let distance = distance.clamp(min, max);
        Self {
            desired: distance,
            damped: distance,
            velocity: 0.0,
        }
    }

    pub fn desired(&self) -> f32 {
        self.desired
    }

    pub fn damped(&self) -> f32 {
        self.damped
    }

    /// Accumulate a scroll delta. Scrolling up (positive) zooms in.
    pub fn apply_scroll(&mut self, scroll: f32, speed: f32, cancels_lock: bool) -> ScrollEffect {
        self.desired -= scroll * speed;
        if scroll == 0.0 {
            ScrollEffect::None
        } else if cancels_lock {
            ScrollEffect::CancelLock
        } else {
            ScrollEffect::StopSlaving
        }
    }

    /// Pull the desired distance toward a lock zoom
    pub fn slave_toward(&mut self, lock_zoom: f32, t: f32) {
        self.desired = lerp(self.desired, lock_zoom, t);
    }

    /// Clamp the desired value, then advance the damped value toward it.
    /// Both end up inside `[min, max]`.
    pub fn settle(&mut self, min: f32, max: f32, smooth_time: f32, dt: f32) {
        self.desired = self.desired.clamp(min, max);
        let (damped, velocity) = smooth_damp(self.damped, self.desired, self.velocity, smooth_time, dt);
        self.damped = damped.clamp(min, max);
        self.velocity = velocity;
    }
}
