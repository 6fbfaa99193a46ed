//! Physics world management with Rapier3D.

use crate::collision::{CollisionGroup, PhysicsBody};
use crate::error::PhysicsAttachError;
use engine_core::{Transform, Vec3};
use rapier3d::prelude::*;

/// Gravity of the default world (Z-up, metres per second squared).
pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, 0.0, -9.81);

/// Collider shapes an actor can ask for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    /// Cube with the given edge length.
    Cube { size: f32 },
}

impl BodyShape {
    /// Half extent of the collider, or an error for degenerate sizes.
    pub fn half_extent(&self) -> Result<f32, PhysicsAttachError> {
        match *self {
            BodyShape::Cube { size } if size.is_finite() && size > 0.0 => Ok(size * 0.5),
            BodyShape::Cube { size } => Err(PhysicsAttachError::InvalidSize(size)),
        }
    }
}

/// Main physics world containing all simulation state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
    /// Static ground collider; set exactly once.
    ground: Option<ColliderHandle>,
    /// Wall-clock time not yet consumed by a fixed sub-step.
    accumulator: f32,
    /// Total simulated time advanced by `step`.
    simulated_time: f64,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::initialize(DEFAULT_GRAVITY)
    }
}

impl PhysicsWorld {
    /// Create the simulation domain with the given gravity and a static ground plane at Z=0.
    pub fn initialize(gravity: Vec3) -> Self {
        let mut world = Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![gravity.x, gravity.y, gravity.z],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            ground: None,
            accumulator: 0.0,
            simulated_time: 0.0,
        };
        world.add_ground_plane();
        world.update_query_pipeline();
        log::debug!("Physics world initialized (gravity {:?})", gravity);
        world
    }

    /// Add the ground plane collider (flat Z=0 half-space).
    /// A world has a single ground: later calls return the existing collider.
    pub fn add_ground_plane(&mut self) -> ColliderHandle {
        if let Some(ground) = self.ground {
            return ground;
        }
        let collider = ColliderBuilder::halfspace(Vector::z_axis())
            .collision_groups(CollisionGroup::environment())
            .build();
        let handle = self.collider_set.insert(collider);
        self.ground = Some(handle);
        handle
    }

    /// The static ground collider.
    pub fn ground(&self) -> Option<ColliderHandle> {
        self.ground
    }

    /// Current gravity vector.
    pub fn gravity(&self) -> Vec3 {
        Vec3::new(self.gravity.x, self.gravity.y, self.gravity.z)
    }

    /// Attach a body of the given shape at `position`.
    /// `mass` 0 creates a fixed (immovable) body, anything above creates a dynamic one.
    pub fn attach(
        &mut self,
        shape: BodyShape,
        mass: f32,
        position: Vec3,
    ) -> Result<PhysicsBody, PhysicsAttachError> {
        let half = shape.half_extent()?;
        if !mass.is_finite() || mass < 0.0 {
            return Err(PhysicsAttachError::InvalidMass(mass));
        }

        let builder = if mass > 0.0 {
            RigidBodyBuilder::dynamic()
        } else {
            RigidBodyBuilder::fixed()
        };
        let rigid_body = builder
            .translation(vector![position.x, position.y, position.z])
            .build();
        let body_handle = self.rigid_body_set.insert(rigid_body);

        let mut collider = ColliderBuilder::cuboid(half, half, half)
            .collision_groups(CollisionGroup::actor(false));
        if mass > 0.0 {
            collider = collider.mass(mass);
        }
        let collider_handle = self.collider_set.insert_with_parent(
            collider.build(),
            body_handle,
            &mut self.rigid_body_set,
        );

        Ok(PhysicsBody::new(body_handle, collider_handle, mass))
    }

    /// Include or exclude a body's collider from pointer pick rays.
    pub fn set_pickable(&mut self, body: &PhysicsBody, pickable: bool) {
        if let Some(collider) = self.collider_set.get_mut(body.collider) {
            collider.set_collision_groups(CollisionGroup::actor(pickable));
        }
    }

    /// Advance the simulation by wall-clock `dt` using fixed sub-steps of `substep_dt`.
    ///
    /// At most `max_substeps` sub-steps run per call. Time owed beyond that is dropped
    /// rather than carried over; a remainder shorter than one sub-step is kept for the next call.
    pub fn step(&mut self, dt: f32, max_substeps: u32, substep_dt: f32) {
        if !(dt.is_finite() && dt >= 0.0 && substep_dt.is_finite() && substep_dt > 0.0) {
            log::warn!("Ignoring physics step with dt={} substep_dt={}", dt, substep_dt);
            return;
        }

        self.accumulator += dt;
        if self.accumulator < substep_dt {
            return;
        }

        let due = (self.accumulator / substep_dt).floor();
        let steps = if due > max_substeps as f32 {
            log::trace!("Dropping {} physics sub-steps", due - max_substeps as f32);
            let remainder = self.accumulator.rem_euclid(substep_dt);
            self.accumulator = if remainder < substep_dt { remainder } else { 0.0 };
            max_substeps
        } else {
            self.accumulator = (self.accumulator - due * substep_dt).max(0.0);
            due as u32
        };

        self.integration_parameters.dt = substep_dt;
        for _ in 0..steps {
            self.step_once();
        }
        self.simulated_time += f64::from(steps) * f64::from(substep_dt);
    }

    /// Total simulated time advanced so far, in seconds.
    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }

    fn step_once(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Update query pipeline for raycasting (needed after attaching bodies outside a step).
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Get the transform of a rigid body.
    pub fn body_transform(&self, handle: RigidBodyHandle) -> Option<Transform> {
        self.rigid_body_set.get(handle).map(|body| {
            let pos = body.translation();
            let rot = body.rotation();
            Transform {
                position: Vec3::new(pos.x, pos.y, pos.z),
                rotation: glam::Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w),
                scale: Vec3::ONE,
            }
        })
    }

    /// Get the world position of a rigid body.
    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(handle).map(|body| {
            let pos = body.translation();
            Vec3::new(pos.x, pos.y, pos.z)
        })
    }

    /// Get the linear velocity of a rigid body.
    pub fn linear_velocity(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(handle).map(|body| {
            let v = body.linvel();
            Vec3::new(v.x, v.y, v.z)
        })
    }

    /// Apply an impulse at the centre of mass of a dynamic body. Fixed bodies are left untouched.
    pub fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            if body.is_dynamic() {
                body.apply_impulse(vector![impulse.x, impulse.y, impulse.z], true);
            }
        }
    }

    /// Remove a body and its collider from the world.
    pub fn detach(&mut self, body: &PhysicsBody) {
        self.rigid_body_set.remove(
            body.rigid_body,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    /// Number of rigid bodies attached (the ground has none).
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Number of colliders, including the ground.
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBSTEP: f32 = 1.0 / 240.0;

    #[test]
    fn initialize_creates_single_ground() {
        let mut world = PhysicsWorld::initialize(DEFAULT_GRAVITY);
        let ground = world.ground().expect("ground exists after initialize");
        assert_eq!(world.collider_count(), 1);
        assert_eq!(world.body_count(), 0);

        // Re-adding is a no-op.
        assert_eq!(world.add_ground_plane(), ground);
        assert_eq!(world.collider_count(), 1);
    }

    #[test]
    fn attach_rejects_degenerate_shapes() {
        let mut world = PhysicsWorld::default();
        assert_eq!(
            world.attach(BodyShape::Cube { size: 0.0 }, 1.0, Vec3::ZERO),
            Err(PhysicsAttachError::InvalidSize(0.0))
        );
        assert_eq!(
            world.attach(BodyShape::Cube { size: -2.0 }, 1.0, Vec3::ZERO),
            Err(PhysicsAttachError::InvalidSize(-2.0))
        );
        assert_eq!(
            world.attach(BodyShape::Cube { size: 1.0 }, -1.0, Vec3::ZERO),
            Err(PhysicsAttachError::InvalidMass(-1.0))
        );
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn attach_places_body_and_picks_body_type() {
        let mut world = PhysicsWorld::default();
        let dynamic = world
            .attach(BodyShape::Cube { size: 1.0 }, 2.0, Vec3::new(1.0, 2.0, 3.0))
            .unwrap();
        let fixed = world
            .attach(BodyShape::Cube { size: 2.0 }, 0.0, Vec3::ZERO)
            .unwrap();

        assert!(dynamic.is_dynamic());
        assert!(!fixed.is_dynamic());
        assert!(world.rigid_body_set[dynamic.rigid_body].is_dynamic());
        assert!(world.rigid_body_set[fixed.rigid_body].is_fixed());
        assert_eq!(
            world.body_position(dynamic.rigid_body),
            Some(Vec3::new(1.0, 2.0, 3.0))
        );
        assert_eq!(world.collider_count(), 3);
    }

    #[test]
    fn step_never_exceeds_max_substeps() {
        let mut world = PhysicsWorld::default();
        world.step(10.0, 5, SUBSTEP);
        let expected = 5.0 * f64::from(SUBSTEP);
        assert!((world.simulated_time() - expected).abs() < 1e-9);

        // The dropped backlog is not caught up on the next frame.
        world.step(0.0, 5, SUBSTEP);
        assert!(world.simulated_time() < expected + 1.5 * f64::from(SUBSTEP));
    }

    #[test]
    fn huge_dt_backlog_is_dropped_not_deferred() {
        let mut world = PhysicsWorld::default();
        world.step(1.0e9, 5, SUBSTEP);
        let first = world.simulated_time();
        assert!((first - 5.0 * f64::from(SUBSTEP)).abs() < 1e-9);

        for _ in 0..3 {
            world.step(0.0, 5, SUBSTEP);
        }
        assert!(world.simulated_time() - first < f64::from(SUBSTEP));
    }

    #[test]
    fn detach_removes_body_and_collider() {
        let mut world = PhysicsWorld::default();
        let body = world
            .attach(BodyShape::Cube { size: 1.0 }, 1.0, Vec3::new(0.0, 0.0, 2.0))
            .unwrap();
        world.detach(&body);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.collider_count(), 1);
        assert!(world.body_position(body.rigid_body).is_none());
    }

    #[test]
    fn step_keeps_sub_step_remainder() {
        let mut world = PhysicsWorld::default();
        world.step(SUBSTEP * 0.5, 5, SUBSTEP);
        assert_eq!(world.simulated_time(), 0.0);
        world.step(SUBSTEP * 0.5, 5, SUBSTEP);
        assert!((world.simulated_time() - f64::from(SUBSTEP)).abs() < 1e-9);
    }

    #[test]
    fn step_ignores_invalid_timing() {
        let mut world = PhysicsWorld::default();
        world.step(f32::NAN, 5, SUBSTEP);
        world.step(1.0, 5, 0.0);
        world.step(-1.0, 5, SUBSTEP);
        assert_eq!(world.simulated_time(), 0.0);
    }

    #[test]
    fn dynamic_body_falls_and_fixed_body_stays() {
        let mut world = PhysicsWorld::default();
        let dynamic = world
            .attach(BodyShape::Cube { size: 1.0 }, 1.0, Vec3::new(0.0, 0.0, 8.0))
            .unwrap();
        let fixed = world
            .attach(BodyShape::Cube { size: 1.0 }, 0.0, Vec3::new(5.0, 0.0, 8.0))
            .unwrap();

        for _ in 0..30 {
            world.step(1.0 / 60.0, 5, SUBSTEP);
        }

        assert!(world.body_position(dynamic.rigid_body).unwrap().z < 8.0);
        assert_eq!(
            world.body_position(fixed.rigid_body),
            Some(Vec3::new(5.0, 0.0, 8.0))
        );
    }

    #[test]
    fn apply_impulse_skips_fixed_bodies() {
        let mut world = PhysicsWorld::initialize(Vec3::ZERO);
        let fixed = world
            .attach(BodyShape::Cube { size: 1.0 }, 0.0, Vec3::new(0.0, 0.0, 4.0))
            .unwrap();
        world.apply_impulse(fixed.rigid_body, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(world.linear_velocity(fixed.rigid_body), Some(Vec3::ZERO));
    }
}
