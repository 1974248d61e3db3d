//! Per-frame input snapshot and the winit adapter that fills it
//!
//! The rig never polls devices. Hosts feed window events into an
//! [`InputHandler`], take an [`InputSnapshot`] once per frame and pass it to
//! the controller, then call [`InputHandler::end_frame`].

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use rigcam_core::FrameDelta;
use serde::{Deserialize, Serialize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Edge and level state of one button for a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// Went down this frame
    pub down: bool,
    /// Is down
    pub held: bool,
    /// Went up this frame
    pub up: bool,
}

impl ButtonState {
    /// Just pressed and still held
    pub const PRESSED: Self = Self {
        down: true,
        held: true,
        up: false,
    };

    /// Held since an earlier frame
    pub const HELD: Self = Self {
        down: false,
        held: true,
        up: false,
    };

    /// Released this frame
    pub const RELEASED: Self = Self {
        down: false,
        held: false,
        up: true,
    };

    fn press(&mut self) {
        if !self.held {
            self.down = true;
        }
        self.held = true;
    }

    fn release(&mut self) {
        if self.held {
            self.up = true;
        }
        self.held = false;
    }

    fn clear_edges(&mut self) {
        self.down = false;
        self.up = false;
    }
}

/// Pointer buttons the rig reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerButtons {
    /// Selection
    pub primary: ButtonState,
    /// Rotation
    pub secondary: ButtonState,
    /// Drag move
    pub middle: ButtonState,
}

/// Read-only input values for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSnapshot {
    /// Pointer position in pixels, origin at the bottom-left of the viewport
    pub pointer_position: Vec2,
    /// Look axis delta, x to the right and y up
    pub pointer_delta: Vec2,
    /// Scroll wheel delta in notches, positive away from the user
    pub scroll_delta: f32,
    pub buttons: PointerButtons,
    /// Keyboard move axes, x right and y forward, each in `[-1, 1]`
    pub move_axis: Vec2,
    /// Fast move modifier held
    pub fast_move: bool,
    /// Viewport size in pixels
    pub viewport: Vec2,
    pub time: FrameDelta,
}

/// Keyboard actions the rig understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RigAction {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    /// Fast move modifier
    FastMove,
}

/// Maps physical keys to rig actions
#[derive(Debug, Clone)]
pub struct InputBindings {
    bindings: HashMap<KeyCode, RigAction>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
        };

        bindings.bind(KeyCode::KeyW, RigAction::MoveForward);
        bindings.bind(KeyCode::KeyS, RigAction::MoveBackward);
        bindings.bind(KeyCode::KeyA, RigAction::MoveLeft);
        bindings.bind(KeyCode::KeyD, RigAction::MoveRight);

        bindings.bind(KeyCode::ArrowUp, RigAction::MoveForward);
        bindings.bind(KeyCode::ArrowDown, RigAction::MoveBackward);
        bindings.bind(KeyCode::ArrowLeft, RigAction::MoveLeft);
        bindings.bind(KeyCode::ArrowRight, RigAction::MoveRight);

        bindings.bind(KeyCode::ShiftLeft, RigAction::FastMove);
        bindings.bind(KeyCode::ShiftRight, RigAction::FastMove);

        bindings
    }
}

impl InputBindings {
    /// Bind a key, replacing any previous action on it
    pub fn bind(&mut self, key: KeyCode, action: RigAction) {
        self.bindings.insert(key, action);
    }

    pub fn action_for(&self, key: KeyCode) -> Option<RigAction> {
        self.bindings.get(&key).copied()
    }
}

/// Accumulates winit events into [`InputSnapshot`]s
#[derive(Debug)]
pub struct InputHandler {
    pub bindings: InputBindings,
    /// Scale from raw device motion to look axis units
    pub mouse_sensitivity: f32,
    /// Invert the vertical look axis
    pub invert_y: bool,
    /// Keys held per action; an action stays held while any of its keys is
    held: HashMap<RigAction, HashSet<KeyCode>>,
    buttons: PointerButtons,
    /// Last cursor position in window coordinates
    cursor: Vec2,
    pointer_delta: Vec2,
    scroll_delta: f32,
    viewport: Vec2,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Handler with default bindings
    pub fn new() -> Self {
        Self {
            bindings: InputBindings::default(),
            mouse_sensitivity: 0.1,
            invert_y: false,
            held: HashMap::new(),
            buttons: PointerButtons::default(),
            cursor: Vec2::ZERO,
            pointer_delta: Vec2::ZERO,
            scroll_delta: 0.0,
            viewport: Vec2::ZERO,
        }
    }

    /// Handle a keyboard event
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, element_state: ElementState) {
        let PhysicalKey::Code(key_code) = physical_key else {
            return;
        };
        let Some(action) = self.bindings.action_for(key_code) else {
            return;
        };
        let keys = self.held.entry(action).or_default();
        match element_state {
            ElementState::Pressed => {
                keys.insert(key_code);
            }
            ElementState::Released => {
                keys.remove(&key_code);
            }
        }
    }

    /// Handle a mouse button event
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let target = match button {
            MouseButton::Left => &mut self.buttons.primary,
            MouseButton::Right => &mut self.buttons.secondary,
            MouseButton::Middle => &mut self.buttons.middle,
            _ => return,
        };
        match state {
            ElementState::Pressed => target.press(),
            ElementState::Released => target.release(),
        }
    }

    /// Handle a cursor position in window coordinates (top-left origin).
    /// The flip to bottom-left happens when the snapshot is built, against
    /// the viewport size at that time.
    pub fn handle_cursor_moved(&mut self, x: f64, y: f64) {
        self.cursor = Vec2::new(x as f32, y as f32);
    }

    /// Handle raw device motion (y down)
    pub fn handle_mouse_motion(&mut self, delta: (f64, f64)) {
        let y_mult = if self.invert_y { -1.0 } else { 1.0 };
        self.pointer_delta += Vec2::new(
            delta.0 as f32 * self.mouse_sensitivity,
            -delta.1 as f32 * self.mouse_sensitivity * y_mult,
        );
    }

    /// Handle scroll wheel
    pub fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll_delta += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 120.0,
        };
    }

    /// Handle a window resize in physical pixels
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width as f32, height as f32);
    }

    fn is_held(&self, action: RigAction) -> bool {
        self.held.get(&action).is_some_and(|keys| !keys.is_empty())
    }

    fn axis(&self, positive: RigAction, negative: RigAction) -> f32 {
        let mut value = 0.0;
        if self.is_held(positive) {
            value += 1.0;
        }
        if self.is_held(negative) {
            value -= 1.0;
        }
        value
    }

    /// Build this frame's snapshot
    pub fn snapshot(&self, time: FrameDelta) -> InputSnapshot {
        InputSnapshot {
            pointer_position: Vec2::new(self.cursor.x, self.viewport.y - self.cursor.y),
            pointer_delta: self.pointer_delta,
            scroll_delta: self.scroll_delta,
            buttons: self.buttons,
            move_axis: Vec2::new(
                self.axis(RigAction::MoveRight, RigAction::MoveLeft),
                self.axis(RigAction::MoveForward, RigAction::MoveBackward),
            ),
            fast_move: self.is_held(RigAction::FastMove),
            viewport: self.viewport,
            time,
        }
    }

    /// Clear per-frame deltas and button edges
    pub fn end_frame(&mut self) {
        self.pointer_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
        self.buttons.primary.clear_edges();
        self.buttons.secondary.clear_edges();
        self.buttons.middle.clear_edges();
    }
}
