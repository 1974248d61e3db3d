//! rigcam Control - RTS camera-target controller
//!
//! Fuses edge-scroll, keyboard, middle-drag, scroll-zoom and right-drag
//! rotation into one damped camera target, with target locking and ground
//! following. The [`Selector`] drives locks from pointer clicks.

pub mod config;
pub mod controller;
pub mod events;
pub mod ground;
pub mod input;
pub mod lock;
pub mod motion;
pub mod overlay;
pub mod rotation;
pub mod selector;
pub mod smoothing;
pub mod state;
pub mod zoom;

pub use config::{ConfigError, FeatureToggles, RigConfig};
pub use controller::{CameraRigController, RigPose, ScreenRay};
pub use events::{ListenerId, LockCancelObservers};
pub use ground::GroundProbe;
pub use input::{ButtonState, InputBindings, InputHandler, InputSnapshot, PointerButtons, RigAction};
pub use lock::{LockOptions, LockPhase, LockTarget, TargetLock};
pub use overlay::{Compass, CursorState, DragIndicator, Overlays, RotateIndicator, ZoomSlider};
pub use selector::{PickHit, ScenePicker, Selection, Selector, SelectorConfig};
pub use state::{ControlState, PointerMode, RigState};
