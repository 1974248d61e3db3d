//! rigcam Scene - Scene objects addressed by generational handles
//!
//! The camera rig never owns scene objects. It keeps an [`Entity`] handle and
//! resolves it through [`PositionLookup`] every frame, so a despawned object
//! reads as absent instead of dangling.

mod entity;
mod error;
mod registry;

pub use entity::{Entity, EntityAllocator};
pub use error::SceneError;
pub use registry::{PositionLookup, SceneObject, SceneRegistry};
