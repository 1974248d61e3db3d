//! Headless rig demo
//!
//! Builds a terrain with fixed and wandering objects, then drives the rig
//! through a scripted sequence of window events: keyboard pan, edge scroll,
//! middle drag, rotation, zoom, click-to-lock on both kinds of object, and a
//! followed object disappearing mid-lock.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::{ensure, Result};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rigcam_control::{CameraRigController, GroundProbe, InputHandler, Overlays, Selection, Selector};
use rigcam_core::GameTime;
use rigcam_physics::{layers, ColliderHandle, PhysicsWorld};
use rigcam_scene::{Entity, SceneObject, SceneRegistry};
use tracing::{debug, info};
use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::settings::Settings;

/// Terrain vertices per side
const TERRAIN_RESOLUTION: usize = 33;
/// Terrain height scale
const TERRAIN_AMPLITUDE: f32 = 2.0;
/// Half extents of every object box
const OBJECT_HALF_EXTENTS: Vec3 = Vec3::ONE;

/// An object walking between random destinations
struct Wanderer {
    entity: Entity,
    collider: ColliderHandle,
    destination: Vec3,
}

/// Outcome of a demo run
#[derive(Debug)]
pub struct DemoReport {
    pub frames: u32,
    pub final_target: Vec3,
    pub final_zoom: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub selections: Vec<Selection>,
    pub lock_cancellations: u32,
}

pub struct Demo {
    settings: Settings,
    world: PhysicsWorld,
    scene: SceneRegistry,
    rig: CameraRigController,
    selector: Selector,
    input: InputHandler,
    time: GameTime,
    rng: StdRng,
    fixed: Vec<Entity>,
    wanderers: Vec<Wanderer>,
    selections: Vec<Selection>,
    cancellations: Rc<Cell<u32>>,
}

impl Demo {
    pub fn new(settings: Settings) -> Result<Self> {
        let demo = &settings.demo;
        ensure!(demo.world_half_size > 0.0, "world_half_size must be positive");
        ensure!(demo.frame_time > 0.0, "frame_time must be positive");

        let rng = match demo.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut world = PhysicsWorld::new();
        let side = demo.world_half_size * 2.0;
        world.create_heightfield(
            &terrain_heights(),
            TERRAIN_RESOLUTION,
            TERRAIN_RESOLUTION,
            Vec3::new(side, TERRAIN_AMPLITUDE, side),
        );
        world.refresh_queries();

        let mut rig = CameraRigController::new(settings.rig.clone(), Vec3::ZERO)
            .with_overlays(Overlays::all());
        let bounds = &rig.config().bounds;
        info!(center = ?bounds.center, size = ?bounds.size(), "rig bounds");
        let cancellations = Rc::new(Cell::new(0));
        let counter = Rc::clone(&cancellations);
        rig.on_lock_cancelled(move |previous| {
            counter.set(counter.get() + 1);
            info!(?previous, "lock cancelled");
        });

        let mut input = InputHandler::new();
        input.handle_resize(demo.viewport.0, demo.viewport.1);

        let mut this = Self {
            selector: Selector::new(settings.selector.clone()),
            time: GameTime::new(settings.time.clone()),
            settings,
            world,
            scene: SceneRegistry::new(),
            rig,
            input,
            rng,
            fixed: Vec::new(),
            wanderers: Vec::new(),
            selections: Vec::new(),
            cancellations,
        };
        this.populate();
        Ok(this)
    }

    fn populate(&mut self) {
        for _ in 0..self.settings.demo.fixed_objects {
            let position = self.random_spot();
            let entity = self.scene.spawn(SceneObject::fixed(position));
            self.world.attach_entity_box(entity, OBJECT_HALF_EXTENTS, position);
            self.fixed.push(entity);
        }
        for _ in 0..self.settings.demo.wanderers {
            let position = self.random_spot();
            let entity = self.scene.spawn(SceneObject::moving(position));
            let collider = self.world.attach_entity_box(entity, OBJECT_HALF_EXTENTS, position);
            let destination = self.random_spot();
            self.wanderers.push(Wanderer {
                entity,
                collider,
                destination,
            });
        }
        self.world.refresh_queries();
        info!(
            fixed = self.fixed.len(),
            wanderers = self.wanderers.len(),
            "scene populated"
        );
    }

    /// Random point resting on the terrain inside the play area
    fn random_spot(&mut self) -> Vec3 {
        let extent = self.settings.demo.world_half_size * 0.8;
        let x = self.rng.gen_range(-extent..=extent);
        let z = self.rng.gen_range(-extent..=extent);
        let ground = self
            .world
            .ground_height(x, z, self.settings.rig.ground_probe_height, layers::GROUND)
            .unwrap_or(0.0);
        Vec3::new(x, ground + OBJECT_HALF_EXTENTS.y, z)
    }

    fn update_wanderers(&mut self, dt: f32) {
        let step = self.settings.demo.wander_speed * dt;
        for i in 0..self.wanderers.len() {
            let Some(object) = self.scene.get(self.wanderers[i].entity) else {
                continue;
            };
            let position = object.transform.position;
            let to_destination = self.wanderers[i].destination - position;

            let next = if to_destination.length() <= step {
                let reached = self.wanderers[i].destination;
                self.wanderers[i].destination = self.random_spot();
                reached
            } else {
                position + to_destination.normalize() * step
            };

            let wanderer = &self.wanderers[i];
            if self.scene.set_position(wanderer.entity, next).is_ok() {
                self.world.set_collider_position(wanderer.collider, next);
            }
        }
        self.world.refresh_queries();
    }

    fn despawn_wanderer(&mut self, entity: Entity) {
        let Some(index) = self.wanderers.iter().position(|w| w.entity == entity) else {
            return;
        };
        let wanderer = self.wanderers.swap_remove(index);
        self.scene.despawn(wanderer.entity);
        self.world.remove_collider(wanderer.collider);
        self.world.refresh_queries();
        info!(entity = %wanderer.entity, "wanderer despawned");
    }

    fn key(&mut self, key: KeyCode, state: ElementState) {
        self.input.handle_keyboard(PhysicalKey::Code(key), state);
    }

    /// Put the cursor at a position in window pixels (top-left origin)
    fn cursor(&mut self, x: f64, y: f64) {
        self.input.handle_cursor_moved(x, y);
    }

    fn cursor_to_center(&mut self) {
        let (w, h) = self.settings.demo.viewport;
        self.cursor(w as f64 / 2.0, h as f64 / 2.0);
    }

    /// Center the rig on an object so a click at the screen center picks it
    fn frame_object(&mut self, entity: Entity) {
        if let Some(object) = self.scene.get(entity) {
            let position = object.transform.position;
            self.rig.set_target(position);
            self.cursor_to_center();
        }
    }

    fn script(&mut self, frame: u32) {
        let (_, h) = self.settings.demo.viewport;
        match frame {
            0 => {
                self.cursor_to_center();
                self.key(KeyCode::KeyW, ElementState::Pressed);
            }
            30 => self.key(KeyCode::ShiftLeft, ElementState::Pressed),
            60 => {
                self.key(KeyCode::ShiftLeft, ElementState::Released);
                self.key(KeyCode::KeyW, ElementState::Released);
                self.cursor(20.0, h as f64 / 2.0);
            }
            90 => {
                self.cursor_to_center();
                self.input
                    .handle_mouse_button(MouseButton::Middle, ElementState::Pressed);
            }
            91..=120 => {
                let (w, h) = self.settings.demo.viewport;
                let offset = f64::from(frame - 90) * 4.0;
                self.cursor(w as f64 / 2.0 + offset, h as f64 / 2.0 - offset);
            }
            121 => {
                self.input
                    .handle_mouse_button(MouseButton::Middle, ElementState::Released);
                self.cursor_to_center();
            }
            150 => self
                .input
                .handle_mouse_button(MouseButton::Right, ElementState::Pressed),
            151..=180 => self.input.handle_mouse_motion((20.0, -10.0)),
            181 => self
                .input
                .handle_mouse_button(MouseButton::Right, ElementState::Released),
            200 => self.input.handle_scroll(MouseScrollDelta::LineDelta(0.0, 2.0)),
            240 => {
                if let Some(&entity) = self.fixed.first() {
                    self.frame_object(entity);
                }
            }
            241 => self
                .input
                .handle_mouse_button(MouseButton::Left, ElementState::Pressed),
            242 => self
                .input
                .handle_mouse_button(MouseButton::Left, ElementState::Released),
            300 => {
                self.rig.cancel_target_lock();
                if let Some(entity) = self.wanderers.first().map(|w| w.entity) {
                    self.frame_object(entity);
                }
            }
            301 => self
                .input
                .handle_mouse_button(MouseButton::Left, ElementState::Pressed),
            302 => self
                .input
                .handle_mouse_button(MouseButton::Left, ElementState::Released),
            360 => {
                let followed = match self.selections.last() {
                    Some(Selection::Follow(entity)) => Some(*entity),
                    _ => self.wanderers.first().map(|w| w.entity),
                };
                if let Some(entity) = followed {
                    self.despawn_wanderer(entity);
                }
            }
            _ => {}
        }
    }

    /// Run the scripted frames
    pub fn run(mut self) -> DemoReport {
        let frames = self.settings.demo.frames;
        let frame_time = self.settings.demo.frame_time;

        for frame in 0..frames {
            self.script(frame);
            self.time.update(frame_time);
            self.update_wanderers(self.time.delta_time);

            let input = self.input.snapshot(self.time.frame_delta());
            self.rig.update(&input, &self.scene, Some(&self.world));
            if let Some(selection) =
                self.selector
                    .update(&input, &mut self.rig, &self.world, &mut self.scene)
            {
                info!(?selection, "selection");
                self.selections.push(selection);
            }
            self.input.end_frame();

            if frame % 60 == 0 {
                let pose = self.rig.pose();
                info!(
                    frame,
                    target = ?pose.target,
                    distance = pose.distance,
                    yaw = self.rig.yaw(),
                    pitch = self.rig.pitch(),
                    phase = ?self.rig.lock_phase(),
                    "rig"
                );
            }
            debug!(frame, cursor = ?self.rig.cursor(), "frame done");
        }

        DemoReport {
            frames,
            final_target: self.rig.target(),
            final_zoom: self.rig.zoom(),
            yaw: self.rig.yaw(),
            pitch: self.rig.pitch(),
            selections: self.selections,
            lock_cancellations: self.cancellations.get(),
        }
    }
}

/// Rolling hills in `[-1, 1]`, row-major
fn terrain_heights() -> Vec<f32> {
    let n = TERRAIN_RESOLUTION;
    (0..n * n)
        .map(|i| {
            let (row, col) = ((i / n) as f32, (i % n) as f32);
            (row * 0.4).sin() * (col * 0.3).cos()
        })
        .collect()
}
