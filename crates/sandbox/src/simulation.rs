//! Per-frame driver: fixed-step physics, then presentation sync.

use glam::Quat;
use physics::PhysicsWorld;

use crate::config::PhysicsSettings;
use crate::presentation::SceneGraph;
use crate::registry::ActorRegistry;

/// How wall-clock frame time is cut into fixed physics steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPolicy {
    pub max_substeps: u32,
    pub substep_dt: f32,
}

impl Default for StepPolicy {
    fn default() -> Self {
        Self::from_settings(&PhysicsSettings::default())
    }
}

impl StepPolicy {
    pub fn from_settings(settings: &PhysicsSettings) -> Self {
        Self {
            max_substeps: settings.substeps,
            substep_dt: settings.dt_substep,
        }
    }
}

#[derive(Debug, Default)]
pub struct SimulationLoop {
    pub policy: StepPolicy,
    frames: u64,
}

impl SimulationLoop {
    pub fn new(policy: StepPolicy) -> Self {
        Self { policy, frames: 0 }
    }

    /// Advance one frame of `dt` seconds and push the results to the scene.
    pub fn advance(
        &mut self,
        dt: f32,
        world: &mut PhysicsWorld,
        registry: &ActorRegistry,
        scene: &mut SceneGraph,
        camera_rotation: Quat,
    ) {
        world.step(dt, self.policy.max_substeps, self.policy.substep_dt);
        registry.sync_presentation(world, scene);
        scene.sync_camera(camera_rotation);
        self.frames += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
