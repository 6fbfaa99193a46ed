//! Everything the running sandbox owns, and one frame of it.

use std::time::Duration;

use engine_core::Time;
use glam::Vec3;
use input::InputState;
use physics::PhysicsWorld;

use crate::camera::CameraRig;
use crate::config::Settings;
use crate::interaction::{InteractionController, PickHit};
use crate::presentation::SceneGraph;
use crate::registry::{ActorRegistry, SpawnError};
use crate::scene_config::SceneDocument;
use crate::simulation::{SimulationLoop, StepPolicy};

pub struct SandboxState {
    pub settings: Settings,
    pub physics: PhysicsWorld,
    pub registry: ActorRegistry,
    pub scene: SceneGraph,
    pub camera: CameraRig,
    pub input: InputState,
    pub interaction: InteractionController,
    pub simulation: SimulationLoop,
    pub time: Time,
    pub running: bool,
}

impl SandboxState {
    /// Build the world and spawn the scene. Without a document the fallback cube is spawned.
    pub fn new(settings: Settings, document: Option<&SceneDocument>) -> Result<Self, SpawnError> {
        let mut physics = PhysicsWorld::initialize(Vec3::from_array(settings.physics.gravity));
        let mut scene = SceneGraph::new();
        let registry = match document {
            Some(document) => ActorRegistry::spawn_all(document, &mut physics, &mut scene)?,
            None => {
                log::info!("No scene given, spawning the fallback cube");
                ActorRegistry::spawn_fallback(&mut physics, &mut scene)?
            }
        };

        if registry.is_empty() {
            log::warn!("Scene has no cubes, clicks can only hit the ground");
        }

        let mut camera = CameraRig::new(&settings.camera);
        camera.set_aspect(settings.window.width, settings.window.height);
        let mut input = InputState::new();
        input.set_window_size(settings.window.width, settings.window.height);

        Ok(Self {
            interaction: InteractionController::from_settings(&settings.interaction),
            simulation: SimulationLoop::new(StepPolicy::from_settings(&settings.physics)),
            settings,
            physics,
            registry,
            scene,
            camera,
            input,
            time: Time::new(),
            running: true,
        })
    }

    /// Window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.input.set_window_size(width, height);
        self.camera.set_aspect(width, height);
    }

    /// One wall-clock frame.
    pub fn update(&mut self) {
        self.time.update();
        self.frame(self.time.delta_seconds());
    }

    /// One frame of a fixed length, used by headless runs.
    pub fn update_fixed(&mut self, dt: Duration) {
        self.time.advance(dt);
        self.frame(self.time.delta_seconds());
    }

    /// Controls and picking, then physics, then presentation.
    /// Returns the pick made this frame, if any.
    pub fn frame(&mut self, dt: f32) -> Option<PickHit> {
        self.camera.update(&self.input, dt);

        let mut hit = None;
        if self.input.is_pick_pressed() {
            if let Some(pointer) = self.input.pointer_ndc() {
                hit = self.interaction.handle_click(
                    pointer,
                    &self.camera.pose(),
                    &mut self.physics,
                    &self.registry,
                );
            }
        }

        self.simulation.advance(
            dt,
            &mut self.physics,
            &self.registry,
            &mut self.scene,
            self.camera.transform.rotation,
        );
        self.input.end_frame();
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_config;
    use input::{ElementState, MouseButton};
    use serde_json::json;

    #[test]
    fn fallback_state_has_one_cube() {
        let state = SandboxState::new(Settings::default(), None).unwrap();
        assert_eq!(state.registry.len(), 1);
        assert_eq!(state.scene.len(), 1);
        assert!(state.running);
    }

    #[test]
    fn settings_drive_gravity_and_step_policy() {
        let mut settings = Settings::default();
        settings.physics.gravity = [0.0, 0.0, -1.0];
        settings.physics.substeps = 2;
        let state = SandboxState::new(settings, None).unwrap();
        assert_eq!(state.physics.gravity(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(state.simulation.policy.max_substeps, 2);
    }

    #[test]
    fn fixed_frames_advance_time_and_physics() {
        let mut state = SandboxState::new(Settings::default(), None).unwrap();
        for _ in 0..30 {
            state.update_fixed(Duration::from_secs_f64(1.0 / 60.0));
        }
        assert_eq!(state.time.frame_count(), 30);
        let cube = &state.registry.handles()[0];
        assert!(cube.transform(&state.physics).unwrap().position.z < 8.0);
        assert_eq!(
            state.scene.transform(cube.presentation),
            cube.transform(&state.physics)
        );
    }

    #[test]
    fn click_at_cube_base_pushes_it() {
        // Camera straight above the origin, cube resting beside the point under the cursor.
        let document = scene_config::parse(&json!({"cubes": [
            {"name": "box", "size": 1, "pos": [1.5, 0, 0.5]}
        ]}))
        .unwrap();
        let mut settings = Settings::default();
        settings.camera.start_pos = [0.0, 0.0, 10.0];
        settings.camera.start_hpr = [0.0, -89.9, 0.0];
        let mut state = SandboxState::new(settings, Some(&document)).unwrap();
        state.frame(1.0 / 60.0);

        state.input.process_cursor_position((640.0, 360.0));
        state.input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        let hit = state.frame(1.0 / 60.0).unwrap();
        assert!(hit.actor.is_none());
        assert!(hit.point.z.abs() < 1e-3);

        let cube = &state.registry.handles()[0];
        let velocity = state.physics.linear_velocity(cube.body.rigid_body).unwrap();
        assert!(velocity.x > 0.0, "{:?}", velocity);

        // One click, one impulse.
        assert!(state.frame(1.0 / 60.0).is_none());
    }
}
