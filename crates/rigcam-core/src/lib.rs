//! rigcam Core - Core types and utilities for the rigcam camera rig
//!
//! This crate provides the foundational types used throughout the rig:
//! - Mathematical primitives (re-exported from glam)
//! - Transform and axis-aligned bounds
//! - Frame time with scaled and unscaled delta feeds

pub mod time;
pub mod types;

pub use glam::{IVec2, Mat4, Quat, Vec2, Vec3, Vec4};
pub use time::{FrameDelta, GameTime, TimeConfig, TimeScaleMode};
pub use types::{Aabb, Transform};
