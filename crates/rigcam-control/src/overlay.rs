//! View state for the optional on-screen widgets
//!
//! The rig only writes into these; drawing them is up to the host. A widget
//! left as `None` in [`Overlays`] is skipped.

use glam::Vec2;

use crate::smoothing::smooth_damp;

/// Smoothing time of the rotate indicator flip
const FLIP_SMOOTH_TIME: f32 = 0.1;

/// Mirror of the zoom range and the damped zoom
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoomSlider {
    pub min: f32,
    pub max: f32,
    pub value: f32,
}

/// Drag start/end markers
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragIndicator {
    /// Whole drag canvas shown
    pub visible: bool,
    pub start: Vec2,
    pub end: Vec2,
    /// End marker shown; false while the drag rests inside the dead zone
    pub end_visible: bool,
    /// Unit direction from start to end
    pub direction: Vec2,
}

impl DragIndicator {
    pub(crate) fn begin(&mut self, anchor: Vec2) {
        self.visible = true;
        self.start = anchor;
        self.end_visible = false;
    }

    pub(crate) fn point_to(&mut self, pointer: Vec2) {
        self.end = pointer;
        self.direction = (pointer - self.start).normalize_or_zero();
        self.end_visible = true;
    }

    pub(crate) fn rest(&mut self) {
        self.end_visible = false;
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
        self.end_visible = false;
    }
}

/// Rotation mode indicator
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotateIndicator {
    pub visible: bool,
    /// In-plane spin in degrees: camera yaw, negated after a negative turn
    pub spin: f32,
    /// Flip angle in degrees, easing toward 180 or 0 with the turn direction
    pub flip: f32,
    flip_velocity: f32,
}

impl RotateIndicator {
    pub(crate) fn update(&mut self, yaw: f32, positive: bool, dt: f32) {
        self.spin = if positive { yaw } else { -yaw };
        let goal = if positive { 180.0 } else { 0.0 };
        let (flip, velocity) = smooth_damp(self.flip, goal, self.flip_velocity, FLIP_SMOOTH_TIME, dt);
        self.flip = flip;
        self.flip_velocity = velocity;
    }
}

/// Heading display following the camera yaw
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Compass {
    pub heading: f32,
}

/// Cursor presentation the host applies each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorState {
    pub visible: bool,
    /// Confined and hidden for look input
    pub locked: bool,
}

impl Default for CursorState {
    fn default() -> Self {
        Self {
            visible: true,
            locked: false,
        }
    }
}

/// Optional widgets attached to a rig
#[derive(Debug, Clone, Default)]
pub struct Overlays {
    pub zoom_slider: Option<ZoomSlider>,
    pub drag: Option<DragIndicator>,
    pub rotate: Option<RotateIndicator>,
    pub compass: Option<Compass>,
}

impl Overlays {
    /// No widgets attached
    pub fn none() -> Self {
        Self::default()
    }

    /// Every widget attached
    pub fn all() -> Self {
        Self {
            zoom_slider: Some(ZoomSlider::default()),
            drag: Some(DragIndicator::default()),
            rotate: Some(RotateIndicator::default()),
            compass: Some(Compass::default()),
        }
    }
}
