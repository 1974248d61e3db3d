//! RTS camera-target controller
//!
//! [`CameraRigController`] owns the rig state and runs one update per frame in
//! a fixed order:
//!
//! 1. screen-side (edge) scrolling
//! 2. middle-button drag
//! 3. keyboard movement
//! 4. zoom
//! 5. rotation
//! 6. target lock, overriding target and zoom while locked
//! 7. ground height correction, skipped while locked
//! 8. compass
//!
//! Manual movement silently cancels an active lock before it translates the
//! target. Only [`CameraRigController::cancel_target_lock`] notifies the
//! lock-cancel listeners, unless [`RigConfig::notify_on_manual_cancel`] is set.

use glam::{IVec2, Mat4, Quat, Vec2, Vec3};
use rigcam_scene::{Entity, PositionLookup};
use tracing::{debug, trace};

use crate::config::RigConfig;
use crate::events::{ListenerId, LockCancelObservers};
use crate::ground::{follow_ground, GroundProbe};
use crate::input::InputSnapshot;
use crate::lock::{LockOptions, LockPhase, LockTarget, TargetLock};
use crate::motion::{drag_direction, screen_side, translate, zoom_speed_factor, PlanarBasis};
use crate::overlay::{CursorState, Overlays};
use crate::rotation::RotationController;
use crate::smoothing::lerp_vec3;
use crate::state::{ControlState, PointerMode, RigState};
use crate::zoom::{ScrollEffect, ZoomController};

/// Where the rig puts the camera this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigPose {
    /// Point the camera frames
    pub target: Vec3,
    /// Camera orientation; local -Z looks at the target
    pub rotation: Quat,
    /// Damped zoom distance from the target
    pub distance: f32,
    /// Camera position, `distance` behind the target along the view direction
    pub position: Vec3,
}

/// World-space ray through a screen point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Camera-target controller for top-down strategy views
#[derive(Debug)]
pub struct CameraRigController {
    config: RigConfig,
    state: RigState,
    observers: LockCancelObservers,
    overlays: Overlays,
    cursor: CursorState,
}

impl CameraRigController {
    /// Create a rig framing `target`.
    ///
    /// Pitch starts at the middle of the tilt range and zoom at the configured
    /// initial distance, clamped into the zoom range.
    pub fn new(config: RigConfig, target: Vec3) -> Self {
        let state = RigState {
            target,
            zoom: ZoomController::new(config.initial_distance, config.zoom_min, config.zoom_max),
            rotation: RotationController::new(config.initial_yaw, config.tilt_midpoint()),
            control: ControlState::default(),
        };
        Self {
            config,
            state,
            observers: LockCancelObservers::new(),
            overlays: Overlays::none(),
            cursor: CursorState::default(),
        }
    }

    /// Attach overlay views
    pub fn with_overlays(mut self, overlays: Overlays) -> Self {
        self.overlays = overlays;
        self
    }

    /// Advance the rig by one frame.
    ///
    /// `scene` resolves entity locks. Ground correction only runs when a
    /// `ground` probe is given.
    pub fn update(
        &mut self,
        input: &InputSnapshot,
        scene: &dyn PositionLookup,
        ground: Option<&dyn GroundProbe>,
    ) {
        let dt = input.time.get(self.config.time_scale_mode);

        self.handle_screen_side_move(input, dt);
        self.handle_drag(input, dt);
        self.handle_keys_move(input, dt);
        self.handle_zoom(input, dt);
        self.handle_rotation(input, dt);
        self.handle_target_lock(scene, dt);
        if let Some(ground) = ground {
            self.correct_ground_height(ground, dt);
        }
        if let Some(compass) = &mut self.overlays.compass {
            compass.heading = self.state.rotation.yaw();
        }

        trace!(
            target = ?self.state.target,
            zoom = self.state.zoom.damped(),
            yaw = self.state.rotation.yaw(),
            pitch = self.state.rotation.pitch(),
            "rig updated"
        );
    }

    fn handle_screen_side_move(&mut self, input: &InputSnapshot, dt: f32) {
        let side = screen_side(input.pointer_position, input.viewport, self.config.screen_side_zone);
        let control = self.state.control;

        if side != IVec2::ZERO
            && self.config.toggles.allow_screen_side_move
            && !control.is_dragging()
            && !control.is_rotating()
        {
            self.cancel_for_manual_input();
            self.state.control.set_pointer(PointerMode::EdgeScrolling);
            let direction = Vec3::new(side.x as f32, 0.0, side.y as f32);
            self.move_target(direction, self.config.keys_speed, dt);
        } else if control.is_edge_scrolling() {
            self.state.control.set_pointer(PointerMode::Idle);
        }
    }

    fn handle_drag(&mut self, input: &InputSnapshot, dt: f32) {
        let control = self.state.control;
        if control.is_rotating() || control.is_edge_scrolling() {
            return;
        }

        let middle = input.buttons.middle;
        let allowed = self.config.toggles.allow_drag_move;

        if middle.down && allowed {
            let anchor = input.pointer_position;
            self.cancel_for_manual_input();
            self.state.control.set_pointer(PointerMode::Dragging { anchor });
            if let Some(drag) = &mut self.overlays.drag {
                drag.begin(anchor);
            }
            debug!(?anchor, "drag started");
        }

        let PointerMode::Dragging { anchor } = self.state.control.pointer() else {
            return;
        };

        if middle.up || !allowed {
            self.state.control.set_pointer(PointerMode::Idle);
            self.end_drag_visuals();
            debug!("drag ended");
            return;
        }

        if middle.held {
            match drag_direction(anchor, input.pointer_position, self.config.move_dead_zone) {
                Some(direction) => {
                    if let Some(drag) = &mut self.overlays.drag {
                        drag.point_to(input.pointer_position);
                    }
                    self.move_target(direction, self.config.drag_speed, dt);
                    self.cursor.visible = false;
                }
                None => {
                    if let Some(drag) = &mut self.overlays.drag {
                        drag.rest();
                    }
                    self.cursor.visible = true;
                }
            }
        }
    }

    /// Keyboard movement. Edge scrolling suppresses it, rotation does not.
    fn handle_keys_move(&mut self, input: &InputSnapshot, dt: f32) {
        let control = self.state.control;
        if control.is_dragging() || control.is_edge_scrolling() || !self.config.toggles.allow_keys_move {
            return;
        }
        if input.move_axis == Vec2::ZERO {
            return;
        }

        self.cancel_for_manual_input();
        let speed = if input.fast_move {
            self.config.keys_speed_fast
        } else {
            self.config.keys_speed
        };
        let direction = Vec3::new(input.move_axis.x, 0.0, input.move_axis.y);
        self.move_target(direction, speed, dt);
    }

    fn handle_zoom(&mut self, input: &InputSnapshot, dt: f32) {
        let config = &self.config;
        if config.toggles.allow_zoom {
            let effect = self
                .state
                .zoom
                .apply_scroll(input.scroll_delta, config.zoom_speed, config.zoom_cancels_lock);
            match effect {
                ScrollEffect::None => {}
                ScrollEffect::CancelLock => self.cancel_for_manual_input(),
                ScrollEffect::StopSlaving => {
                    if let Some(lock) = self.state.control.lock_mut() {
                        lock.zoom_slaved = false;
                    }
                }
            }
        }

        let config = &self.config;
        self.state
            .zoom
            .settle(config.zoom_min, config.zoom_max, config.zoom_smooth_time, dt);

        if let Some(slider) = &mut self.overlays.zoom_slider {
            slider.min = config.zoom_min;
            slider.max = config.zoom_max;
            slider.value = self.state.zoom.damped();
        }
    }

    fn handle_rotation(&mut self, input: &InputSnapshot, dt: f32) {
        if self.state.control.is_dragging() {
            return;
        }

        let secondary = input.buttons.secondary;
        let allowed = self.config.toggles.allow_rotate;

        if secondary.down && allowed {
            self.state.control.set_pointer(PointerMode::Rotating);
            self.cursor = CursorState {
                visible: false,
                locked: true,
            };
            if let Some(rotate) = &mut self.overlays.rotate {
                rotate.visible = true;
            }
            debug!("rotation started");
        }

        if !self.state.control.is_rotating() {
            return;
        }

        if secondary.up || !allowed {
            self.state.control.set_pointer(PointerMode::Idle);
            self.end_rotation_visuals();
            debug!("rotation ended");
            return;
        }

        if secondary.held {
            let delta = input.pointer_delta;
            let speed = self.config.rotate_speed;
            let rotation = &mut self.state.rotation;
            rotation.turn(delta.x * speed.x);
            if delta.y != 0.0 && self.config.toggles.allow_tilt_rotate {
                rotation.tilt(delta.y * speed.y, self.config.tilt_min, self.config.tilt_max);
            }
            if let Some(rotate) = &mut self.overlays.rotate {
                rotate.update(rotation.yaw(), rotation.last_turn_positive(), dt);
            }
        }
    }

    fn handle_target_lock(&mut self, scene: &dyn PositionLookup, dt: f32) {
        let t = self.config.lock_speed * dt;
        let (zoom_min, zoom_max) = (self.config.zoom_min, self.config.zoom_max);
        let Some(lock) = self.state.control.lock_mut() else {
            return;
        };

        let anchor = lock.resolve(scene);
        self.state.target = if lock.options.hard {
            anchor
        } else {
            lerp_vec3(self.state.target, anchor, t)
        };
        if lock.zoom_slaved {
            self.state
                .zoom
                .slave_toward(lock.options.zoom.clamp(zoom_min, zoom_max), t);
        }
    }

    fn correct_ground_height(&mut self, ground: &dyn GroundProbe, dt: f32) {
        if self.state.control.is_locked() {
            return;
        }
        self.state.target = follow_ground(
            self.state.target,
            ground,
            self.config.ground_probe_height,
            self.config.ground_layer,
            self.config.ground_follow_rate * dt,
        );
    }

    /// Translate the target in camera-relative ground space. Speed grows with
    /// the damped zoom so panning feels the same at every distance.
    fn move_target(&mut self, direction: Vec3, speed: f32, dt: f32) {
        let rotation = &self.state.rotation;
        let basis = PlanarBasis::from_camera(rotation.forward(), rotation.right());
        let scale = zoom_speed_factor(self.state.zoom.damped(), self.config.zoom_min) * speed * dt;
        self.state.target = translate(self.state.target, direction, &basis, scale, &self.config.bounds);
    }

    fn cancel_for_manual_input(&mut self) {
        if let Some(lock) = self.state.control.release_lock() {
            let previous = lock.target();
            debug!(?previous, "lock cancelled by manual input");
            if self.config.notify_on_manual_cancel {
                self.observers.notify(&previous);
            }
        }
    }

    fn end_drag_visuals(&mut self) {
        if let Some(drag) = &mut self.overlays.drag {
            drag.hide();
        }
        self.cursor.visible = true;
    }

    fn end_rotation_visuals(&mut self) {
        self.cursor = CursorState::default();
        if let Some(rotate) = &mut self.overlays.rotate {
            rotate.visible = false;
        }
    }

    fn engage(&mut self, lock: TargetLock) {
        if self.state.control.is_dragging() {
            self.end_drag_visuals();
        }
        self.state.control.engage(lock);
        debug!(target = ?lock.target(), hard = lock.options.hard, "lock engaged");
    }

    // --- Lock contract ---

    /// Lock onto a fixed position with the configured lock options.
    /// Calling again re-arms the lock at the new position.
    pub fn lock_on_point(&mut self, position: Vec3) {
        self.lock_on_point_with(position, self.config.lock_options());
    }

    /// Lock onto a fixed position with explicit lock options
    pub fn lock_on_point_with(&mut self, position: Vec3, options: LockOptions) {
        self.engage(TargetLock::point(position, options));
    }

    /// Lock onto a scene entity with the configured lock options.
    ///
    /// A dead handle leaves the rig free: any previous lock is dropped
    /// silently and `false` is returned.
    pub fn lock_on_entity(&mut self, entity: Entity, scene: &dyn PositionLookup) -> bool {
        self.lock_on_entity_with(entity, scene, self.config.lock_options())
    }

    /// Lock onto a scene entity with explicit lock options.
    /// Returns `false` for a dead handle.
    pub fn lock_on_entity_with(
        &mut self,
        entity: Entity,
        scene: &dyn PositionLookup,
        options: LockOptions,
    ) -> bool {
        match TargetLock::entity(entity, scene, options) {
            Some(lock) => {
                self.engage(lock);
                true
            }
            None => {
                debug!(%entity, "lock requested on dead entity");
                self.state.control.release_lock();
                false
            }
        }
    }

    /// Force the rig free and notify every lock-cancel listener once, even
    /// if nothing was locked.
    pub fn cancel_target_lock(&mut self) {
        let previous = self
            .state
            .control
            .release_lock()
            .map_or(LockTarget::None, |lock| lock.target());
        debug!(?previous, "lock cancelled");
        self.observers.notify(&previous);
    }

    /// Register a lock-cancel listener
    pub fn on_lock_cancelled(&mut self, listener: impl FnMut(&LockTarget) + 'static) -> ListenerId {
        self.observers.subscribe(listener)
    }

    /// Remove a lock-cancel listener. Returns `false` if it was not registered.
    pub fn remove_lock_listener(&mut self, id: ListenerId) -> bool {
        self.observers.unsubscribe(id)
    }

    // --- Feature toggles ---

    /// Whether secondary-button drag rotates the camera
    pub fn allow_rotate(&self) -> bool {
        self.config.toggles.allow_rotate
    }

    /// Enable or disable rotation. Disabling ends an active rotation next frame.
    pub fn set_allow_rotate(&mut self, allow: bool) {
        self.config.toggles.allow_rotate = allow;
    }

    /// Whether vertical pointer motion tilts the camera while rotating
    pub fn allow_tilt_rotate(&self) -> bool {
        self.config.toggles.allow_tilt_rotate
    }

    /// Enable or disable tilt while rotating
    pub fn set_allow_tilt_rotate(&mut self, allow: bool) {
        self.config.toggles.allow_tilt_rotate = allow;
    }

    /// Whether scroll input changes the zoom
    pub fn allow_zoom(&self) -> bool {
        self.config.toggles.allow_zoom
    }

    /// Enable or disable scroll zoom
    pub fn set_allow_zoom(&mut self, allow: bool) {
        self.config.toggles.allow_zoom = allow;
    }

    /// Whether middle-button drag moves the target
    pub fn allow_drag_move(&self) -> bool {
        self.config.toggles.allow_drag_move
    }

    /// Enable or disable drag movement. Disabling ends an active drag next frame.
    pub fn set_allow_drag_move(&mut self, allow: bool) {
        self.config.toggles.allow_drag_move = allow;
    }

    /// Whether keyboard input moves the target
    pub fn allow_keys_move(&self) -> bool {
        self.config.toggles.allow_keys_move
    }

    /// Enable or disable keyboard movement
    pub fn set_allow_keys_move(&mut self, allow: bool) {
        self.config.toggles.allow_keys_move = allow;
    }

    /// Whether the pointer at a screen edge moves the target
    pub fn allow_screen_side_move(&self) -> bool {
        self.config.toggles.allow_screen_side_move
    }

    /// Enable or disable edge scrolling
    pub fn set_allow_screen_side_move(&mut self, allow: bool) {
        self.config.toggles.allow_screen_side_move = allow;
    }

    // --- Configuration and state ---

    /// Current configuration
    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    /// Mutable configuration. Range changes take effect on the next update.
    pub fn config_mut(&mut self) -> &mut RigConfig {
        &mut self.config
    }

    /// Replace the configuration, pulling pitch into the new tilt range
    pub fn set_config(&mut self, config: RigConfig) {
        self.state.rotation.tilt(0.0, config.tilt_min, config.tilt_max);
        self.config = config;
    }

    /// Current target position
    pub fn target(&self) -> Vec3 {
        self.state.target
    }

    /// Move the target directly, confined to the bounds
    pub fn set_target(&mut self, target: Vec3) {
        self.state.target = self.config.bounds.closest_point(target);
    }

    /// Damped zoom distance
    pub fn zoom(&self) -> f32 {
        self.state.zoom.damped()
    }

    /// Zoom distance the damped value is heading toward
    pub fn desired_zoom(&self) -> f32 {
        self.state.zoom.desired()
    }

    /// Camera yaw in degrees, wrapped into `[0, 360)`
    pub fn yaw(&self) -> f32 {
        self.state.rotation.yaw()
    }

    /// Camera tilt in degrees
    pub fn pitch(&self) -> f32 {
        self.state.rotation.pitch()
    }

    /// What the rig is locked onto, if anything
    pub fn lock_target(&self) -> LockTarget {
        self.state.control.lock_target()
    }

    /// Free, locked to a point, or locked to an entity
    pub fn lock_phase(&self) -> LockPhase {
        self.state.control.lock_phase()
    }

    /// Check if a target lock is active
    pub fn is_locked(&self) -> bool {
        self.state.control.is_locked()
    }

    /// Full rig state
    pub fn state(&self) -> &RigState {
        &self.state
    }

    /// Attached overlay views
    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    /// Attached overlay views, mutable
    pub fn overlays_mut(&mut self) -> &mut Overlays {
        &mut self.overlays
    }

    /// Cursor visibility and lock the host should apply this frame
    pub fn cursor(&self) -> CursorState {
        self.cursor
    }

    // --- Camera output ---

    /// Camera placement for this frame
    pub fn pose(&self) -> RigPose {
        let rotation = self.state.rotation.rotation();
        let distance = self.state.zoom.damped();
        RigPose {
            target: self.state.target,
            rotation,
            distance,
            position: self.state.target - rotation * Vec3::NEG_Z * distance,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        let pose = self.pose();
        Mat4::look_at_rh(pose.position, pose.target, Vec3::Y)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.config.field_of_view.to_radians(),
            aspect_ratio,
            self.config.near_plane,
            self.config.far_plane,
        )
    }

    /// Ray from the near plane through `pointer` (bottom-left origin).
    /// `None` for an empty viewport.
    pub fn screen_ray(&self, pointer: Vec2, viewport: Vec2) -> Option<ScreenRay> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        let ndc = pointer / viewport * 2.0 - Vec2::ONE;
        let inverse = (self.projection_matrix(viewport.x / viewport.y) * self.view_matrix()).inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        Some(ScreenRay {
            origin: near,
            direction: (far - near).normalize_or_zero(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ButtonState;
    use rigcam_core::{Aabb, FrameDelta, TimeScaleMode};
    use rigcam_physics::PhysicsWorld;
    use rigcam_scene::{SceneObject, SceneRegistry};
    use std::cell::Cell;
    use std::rc::Rc;

    const DT: f32 = 1.0 / 60.0;

    fn frame() -> InputSnapshot {
        InputSnapshot {
            pointer_position: Vec2::new(960.0, 540.0),
            viewport: Vec2::new(1920.0, 1080.0),
            time: FrameDelta::uniform(DT),
            ..Default::default()
        }
    }

    fn rig() -> CameraRigController {
        CameraRigController::new(RigConfig::default(), Vec3::ZERO)
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    fn counter(rig: &mut CameraRigController) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        rig.on_lock_cancelled(move |_| inner.set(inner.get() + 1));
        count
    }

    #[test]
    fn test_initial_state() {
        let rig = rig();
        assert_eq!(rig.pitch(), 45.0);
        assert_eq!(rig.zoom(), 30.0);
        assert_eq!(rig.lock_phase(), LockPhase::Free);
        assert_eq!(rig.cursor(), CursorState::default());
    }

    #[test]
    fn test_zoom_clamps_and_approaches_max() {
        let config = RigConfig {
            initial_distance: 50.0,
            ..Default::default()
        };
        let mut rig = CameraRigController::new(config, Vec3::ZERO);
        let scene = SceneRegistry::new();

        let scroll = InputSnapshot {
            scroll_delta: -50.0,
            ..frame()
        };
        rig.update(&scroll, &scene, None);
        assert_eq!(rig.desired_zoom(), 100.0);

        let mut previous = rig.zoom();
        assert!(previous > 50.0 && previous <= 100.0);
        for _ in 0..60 {
            rig.update(&frame(), &scene, None);
            assert!(rig.zoom() >= previous && rig.zoom() <= 100.0);
            previous = rig.zoom();
        }
        assert!(rig.zoom() > 99.0);
    }

    #[test]
    fn test_pitch_clamped_and_tilt_toggle() {
        let mut rig = rig();
        let scene = SceneRegistry::new();
        let mut input = frame();
        input.buttons.secondary = ButtonState::PRESSED;
        input.pointer_delta = Vec2::new(0.0, 100.0);
        rig.update(&input, &scene, None);
        assert_eq!(rig.pitch(), 75.0);

        rig.set_allow_tilt_rotate(false);
        input.buttons.secondary = ButtonState::HELD;
        input.pointer_delta = Vec2::new(5.0, -100.0);
        rig.update(&input, &scene, None);
        assert_eq!(rig.pitch(), 75.0);
        assert_eq!(rig.yaw(), 20.0);
    }

    #[test]
    fn test_cancel_fires_once() {
        let mut rig = rig();
        let count = counter(&mut rig);
        rig.lock_on_point(Vec3::new(10.0, 0.0, 10.0));
        assert_eq!(rig.lock_phase(), LockPhase::LockedToPoint);

        rig.cancel_target_lock();
        assert_eq!(count.get(), 1);
        assert_eq!(rig.lock_phase(), LockPhase::Free);
        assert_eq!(rig.lock_target(), LockTarget::None);
    }

    #[test]
    fn test_soft_lock_interpolates() {
        let mut rig = rig();
        let scene = SceneRegistry::new();
        let anchor = Vec3::new(10.0, 0.0, 10.0);
        rig.lock_on_point(anchor);

        let mut previous = rig.target();
        for _ in 0..30 {
            rig.update(&frame(), &scene, None);
            let expected = previous.lerp(anchor, 1.5 * DT);
            assert!(approx(rig.target(), expected));
            assert!(rig.target().distance(anchor) < previous.distance(anchor));
            previous = rig.target();
        }
        assert_ne!(rig.target(), anchor);
    }

    #[test]
    fn test_lock_slaves_zoom() {
        let mut rig = rig();
        let scene = SceneRegistry::new();
        rig.lock_on_point(Vec3::ZERO);
        for _ in 0..30 {
            rig.update(&frame(), &scene, None);
        }
        assert!(rig.desired_zoom() < 30.0 && rig.desired_zoom() > 10.0);
    }

    #[test]
    fn test_manual_move_cancels_silently() {
        let mut rig = rig();
        let scene = SceneRegistry::new();
        let count = counter(&mut rig);
        rig.lock_on_point(Vec3::new(10.0, 0.0, 10.0));

        let input = InputSnapshot {
            move_axis: Vec2::new(0.0, 1.0),
            ..frame()
        };
        rig.update(&input, &scene, None);
        assert!(!rig.is_locked());
        assert_eq!(count.get(), 0);
        assert!(rig.target().z < 0.0);
        assert!(rig.target().x.abs() < 1e-5);
    }

    #[test]
    fn test_manual_cancel_notification_opt_in() {
        let config = RigConfig {
            notify_on_manual_cancel: true,
            ..Default::default()
        };
        let mut rig = CameraRigController::new(config, Vec3::ZERO);
        let scene = SceneRegistry::new();
        let count = counter(&mut rig);
        rig.lock_on_point(Vec3::ONE);

        let input = InputSnapshot {
            scroll_delta: 1.0,
            ..frame()
        };
        rig.update(&input, &scene, None);
        assert!(!rig.is_locked());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_edge_scroll_suppresses_keys() {
        let mut rig = rig();
        let scene = SceneRegistry::new();
        let input = InputSnapshot {
            pointer_position: Vec2::new(30.0, 500.0),
            move_axis: Vec2::new(1.0, 0.0),
            ..frame()
        };
        rig.update(&input, &scene, None);

        let expected = -(30.0 / 5.0) * 6.0 * DT;
        assert!((rig.target().x - expected).abs() < 1e-5);
        assert!(rig.state().control.is_edge_scrolling());

        rig.update(&frame(), &scene, None);
        assert!(!rig.state().control.is_edge_scrolling());
    }

    #[test]
    fn test_drag_dead_zone() {
        let mut rig = rig().with_overlays(Overlays::all());
        let scene = SceneRegistry::new();

        let mut input = frame();
        input.buttons.middle = ButtonState::PRESSED;
        rig.update(&input, &scene, None);
        assert!(rig.state().control.is_dragging());
        assert!(rig.overlays().drag.is_some_and(|d| d.visible));

        input.buttons.middle = ButtonState::HELD;
        input.pointer_position = Vec2::new(962.0, 542.0);
        rig.update(&input, &scene, None);
        assert_eq!(rig.target(), Vec3::ZERO);
        assert!(rig.cursor().visible);

        input.pointer_position = Vec2::new(960.0, 640.0);
        rig.update(&input, &scene, None);
        assert!(rig.target().z < 0.0);
        assert!(!rig.cursor().visible);
        assert!(rig.overlays().drag.is_some_and(|d| d.end_visible));

        input.buttons.middle = ButtonState::RELEASED;
        rig.update(&input, &scene, None);
        assert!(!rig.state().control.is_dragging());
        assert!(rig.cursor().visible);
        assert!(rig.overlays().drag.is_some_and(|d| !d.visible));
    }

    #[test]
    fn test_rotating_blocks_drag() {
        let mut rig = rig();
        let scene = SceneRegistry::new();
        let mut input = frame();
        input.buttons.secondary = ButtonState::PRESSED;
        rig.update(&input, &scene, None);
        assert!(rig.state().control.is_rotating());
        assert!(rig.cursor().locked);

        input.buttons.secondary = ButtonState::HELD;
        input.buttons.middle = ButtonState::PRESSED;
        rig.update(&input, &scene, None);
        assert!(!rig.state().control.is_dragging());
        assert!(rig.state().control.is_rotating());
    }

    #[test]
    fn test_disabling_rotate_ends_rotation() {
        let mut rig = rig().with_overlays(Overlays::all());
        let scene = SceneRegistry::new();
        let mut input = frame();
        input.buttons.secondary = ButtonState::PRESSED;
        rig.update(&input, &scene, None);

        rig.set_allow_rotate(false);
        input.buttons.secondary = ButtonState::HELD;
        input.pointer_delta = Vec2::new(10.0, 0.0);
        rig.update(&input, &scene, None);
        assert!(!rig.state().control.is_rotating());
        assert_eq!(rig.yaw(), 0.0);
        assert_eq!(rig.cursor(), CursorState::default());
        assert!(rig.overlays().rotate.is_some_and(|r| !r.visible));
    }

    #[test]
    fn test_rotation_survives_lock() {
        let mut rig = rig();
        let scene = SceneRegistry::new();
        let mut input = frame();
        input.buttons.secondary = ButtonState::PRESSED;
        rig.update(&input, &scene, None);

        rig.lock_on_point(Vec3::ONE);
        input.buttons.secondary = ButtonState::HELD;
        input.pointer_delta = Vec2::new(1.0, 0.0);
        rig.update(&input, &scene, None);
        assert!(rig.is_locked());
        assert_eq!(rig.yaw(), 4.0);
    }

    #[test]
    fn test_entity_destroyed_mid_lock() {
        let mut rig = rig();
        let mut scene = SceneRegistry::new();
        let e = scene.spawn(SceneObject::moving(Vec3::new(5.0, 0.0, 5.0)));
        let hard = LockOptions {
            hard: true,
            zoom: 20.0,
        };
        assert!(rig.lock_on_entity_with(e, &scene, hard));
        assert_eq!(rig.lock_target(), LockTarget::FollowEntity(e));

        rig.update(&frame(), &scene, None);
        assert_eq!(rig.target(), Vec3::new(5.0, 0.0, 5.0));

        scene.set_position(e, Vec3::new(8.0, 0.0, 8.0)).unwrap();
        rig.update(&frame(), &scene, None);
        assert_eq!(rig.target(), Vec3::new(8.0, 0.0, 8.0));

        scene.despawn(e);
        rig.update(&frame(), &scene, None);
        assert_eq!(rig.target(), Vec3::new(8.0, 0.0, 8.0));
        assert!(rig.is_locked());
        assert_eq!(rig.lock_phase(), LockPhase::LockedToPoint);
    }

    #[test]
    fn test_dead_handle_leaves_rig_free() {
        let mut rig = rig();
        let mut scene = SceneRegistry::new();
        let count = counter(&mut rig);
        let e = scene.spawn(SceneObject::moving(Vec3::ONE));
        scene.despawn(e);

        rig.lock_on_point(Vec3::ONE);
        assert!(!rig.lock_on_entity(e, &scene));
        assert!(!rig.is_locked());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_ground_follow_and_lock_skip() {
        let mut world = PhysicsWorld::new();
        world.create_ground(2.0);
        world.refresh_queries();
        let scene = SceneRegistry::new();
        let mut rig = CameraRigController::new(RigConfig::default(), Vec3::new(3.0, 0.0, -4.0));

        let mut previous = 0.0;
        for _ in 0..10 {
            rig.update(&frame(), &scene, Some(&world));
            assert!(rig.target().y > previous && rig.target().y <= 2.0 + 1e-3);
            previous = rig.target().y;
        }
        assert_eq!(rig.target().x, 3.0);
        assert_eq!(rig.target().z, -4.0);

        rig.lock_on_point_with(
            Vec3::ZERO,
            LockOptions {
                hard: true,
                zoom: 10.0,
            },
        );
        rig.update(&frame(), &scene, Some(&world));
        assert_eq!(rig.target(), Vec3::ZERO);
    }

    #[test]
    fn test_toggle_setter_idempotent() {
        let mut rig = rig();
        let before = rig.config().clone();
        rig.set_allow_zoom(rig.allow_zoom());
        rig.set_allow_rotate(true);
        rig.set_allow_screen_side_move(true);
        assert_eq!(rig.config(), &before);
        assert_eq!(rig.target(), Vec3::ZERO);
        assert!(!rig.is_locked());
    }

    #[test]
    fn test_disabled_zoom_ignores_scroll() {
        let mut rig = rig();
        let scene = SceneRegistry::new();
        rig.set_allow_zoom(false);
        rig.lock_on_point(Vec3::ONE);
        let input = InputSnapshot {
            scroll_delta: 3.0,
            ..frame()
        };
        rig.update(&input, &scene, None);
        assert!(rig.is_locked());
    }

    #[test]
    fn test_scroll_without_cancel_stops_slaving() {
        let config = RigConfig {
            zoom_cancels_lock: false,
            ..Default::default()
        };
        let mut rig = CameraRigController::new(config, Vec3::ZERO);
        let scene = SceneRegistry::new();
        rig.lock_on_point(Vec3::ONE);

        let input = InputSnapshot {
            scroll_delta: 1.0,
            ..frame()
        };
        rig.update(&input, &scene, None);
        assert!(rig.is_locked());
        assert!(rig.state().control.lock().is_some_and(|l| !l.zoom_slaved));
        assert_eq!(rig.desired_zoom(), 26.0);
    }

    #[test]
    fn test_bounds_confine_target() {
        let config = RigConfig {
            bounds: Aabb::from_center_size(Vec3::ZERO, Vec3::splat(10.0)),
            ..Default::default()
        };
        let mut rig = CameraRigController::new(config, Vec3::ZERO);
        let scene = SceneRegistry::new();
        let input = InputSnapshot {
            move_axis: Vec2::new(1.0, 0.0),
            ..frame()
        };
        for _ in 0..120 {
            rig.update(&input, &scene, None);
        }
        assert_eq!(rig.target().x, 5.0);
    }

    #[test]
    fn test_speed_scales_with_zoom() {
        let scene = SceneRegistry::new();
        let input = InputSnapshot {
            move_axis: Vec2::new(0.0, 1.0),
            ..frame()
        };
        let moved = |distance: f32| {
            let config = RigConfig {
                initial_distance: distance,
                ..Default::default()
            };
            let mut rig = CameraRigController::new(config, Vec3::ZERO);
            rig.update(&input, &scene, None);
            rig.target().length()
        };
        assert!((moved(40.0) / moved(10.0) - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_time_scale_mode_selects_delta() {
        let scene = SceneRegistry::new();
        let paused = InputSnapshot {
            move_axis: Vec2::new(0.0, 1.0),
            time: FrameDelta {
                scaled: 0.0,
                unscaled: DT,
            },
            ..frame()
        };
        let moved = |time_scale_mode: TimeScaleMode| {
            let config = RigConfig {
                time_scale_mode,
                ..Default::default()
            };
            let mut rig = CameraRigController::new(config, Vec3::ZERO);
            rig.update(&paused, &scene, None);
            rig.target().length()
        };
        assert_eq!(moved(TimeScaleMode::Scaled), 0.0);
        assert!(moved(TimeScaleMode::Unscaled) > 0.0);
    }

    #[test]
    fn test_fast_move_modifier() {
        let scene = SceneRegistry::new();
        let moved = |fast_move: bool| {
            let mut rig = rig();
            let input = InputSnapshot {
                move_axis: Vec2::new(1.0, 0.0),
                fast_move,
                ..frame()
            };
            rig.update(&input, &scene, None);
            rig.target().length()
        };
        let config = RigConfig::default();
        let ratio = config.keys_speed_fast / config.keys_speed;
        assert!((moved(true) / moved(false) - ratio).abs() < 1e-4);
    }

    #[test]
    fn test_overlays_mirror_rig() {
        let mut rig = rig().with_overlays(Overlays::all());
        let scene = SceneRegistry::new();
        rig.update(&frame(), &scene, None);

        let slider = rig.overlays().zoom_slider.unwrap();
        assert_eq!((slider.min, slider.max, slider.value), (5.0, 100.0, rig.zoom()));
        assert_eq!(rig.overlays().compass.unwrap().heading, rig.yaw());
    }

    #[test]
    fn test_missing_overlays_skipped() {
        let mut rig = rig();
        let scene = SceneRegistry::new();
        let mut input = frame();
        input.buttons.middle = ButtonState::PRESSED;
        rig.update(&input, &scene, None);
        assert!(rig.overlays().drag.is_none());
        assert!(rig.state().control.is_dragging());
    }

    #[test]
    fn test_external_lock_ends_drag() {
        let mut rig = rig().with_overlays(Overlays::all());
        let scene = SceneRegistry::new();
        let mut input = frame();
        input.buttons.middle = ButtonState::PRESSED;
        rig.update(&input, &scene, None);

        rig.lock_on_point(Vec3::ONE);
        assert!(!rig.state().control.is_dragging());
        assert!(rig.overlays().drag.is_some_and(|d| !d.visible));
    }

    #[test]
    fn test_pose_and_center_ray() {
        let rig = rig();
        let pose = rig.pose();
        let forward = pose.rotation * Vec3::NEG_Z;
        assert!(approx(pose.position, -forward * 30.0));

        let ray = rig
            .screen_ray(Vec2::new(960.0, 540.0), Vec2::new(1920.0, 1080.0))
            .unwrap();
        assert!((ray.direction - forward).length() < 1e-3);
        assert!(rig.screen_ray(Vec2::ZERO, Vec2::ZERO).is_none());
    }
}
