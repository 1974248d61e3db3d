//! Frame time for the rigcam camera rig
//!
//! Every frame produces two delta feeds: a scaled one that stops while the
//! game is paused, and an unscaled one that keeps running. Consumers pick one
//! through [`TimeScaleMode`].

use serde::{Deserialize, Serialize};

/// Which delta-time feed a consumer reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeScaleMode {
    /// Follows the game time scale and stops while paused
    Scaled,
    /// Real elapsed time, independent of pause and time scale
    #[default]
    Unscaled,
}

/// The two delta-time values of one frame, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameDelta {
    /// Delta affected by time scale and pause
    pub scaled: f32,
    /// Raw delta, clamped to the configured maximum
    pub unscaled: f32,
}

impl FrameDelta {
    /// A frame where both feeds carry the same value
    pub fn uniform(dt: f32) -> Self {
        Self {
            scaled: dt,
            unscaled: dt,
        }
    }

    /// Pick the feed for the given mode
    pub fn get(&self, mode: TimeScaleMode) -> f32 {
        match mode {
            TimeScaleMode::Scaled => self.scaled,
            TimeScaleMode::Unscaled => self.unscaled,
        }
    }
}

/// Configuration for game time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeConfig {
    /// How many in-game seconds pass per real second
    pub time_scale: f32,
    /// Maximum delta time to prevent huge jumps after a stall
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_delta_time: 0.25,
        }
    }
}

/// Game time tracking
#[derive(Debug, Clone, Default)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Scaled time since start in seconds
    pub total_time: f64,
    /// Delta time for this frame (scaled, zero while paused)
    pub delta_time: f32,
    /// Unscaled delta time
    pub unscaled_delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Whether the game is paused
    pub paused: bool,
}

impl GameTime {
    /// Create a new game time with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Update the game time with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        self.unscaled_delta_time = raw_delta.clamp(0.0, self.config.max_delta_time);
        self.frame_count += 1;

        if self.paused {
            self.delta_time = 0.0;
            return;
        }

        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time as f64;
    }

    /// Both delta feeds of the current frame
    pub fn frame_delta(&self) -> FrameDelta {
        FrameDelta {
            scaled: self.delta_time,
            unscaled: self.unscaled_delta_time,
        }
    }

    /// Stop the scaled feed; the unscaled feed keeps running
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Set the time scale (0.0 = frozen, 1.0 = normal, 2.0 = double speed)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.config.time_scale = scale.max(0.0);
    }
}
