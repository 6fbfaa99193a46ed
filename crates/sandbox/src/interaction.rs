//! Pointer picking and the radial impulse it triggers.

use glam::{Mat4, Quat, Vec2, Vec3};
use physics::{PhysicsWorld, RigidBodyHandle};

use crate::config::InteractionSettings;
use crate::registry::ActorRegistry;

/// Bodies closer than this to the impulse centre have no usable direction.
pub const MIN_IMPULSE_DISTANCE: f32 = 0.001;

/// Camera state needed to turn a pointer position into a world ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Quat,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraPose {
    /// View matrix for a Z-up camera looking along its local +Y.
    pub fn view_matrix(&self) -> Mat4 {
        let forward = self.rotation * Vec3::Y;
        let up = self.rotation * Vec3::Z;
        Mat4::look_at_rh(self.position, self.position + forward, up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// World-space ray through a pointer in normalized device coordinates.
    /// Returns the point on the near plane and the unit direction towards the far plane.
    pub fn pointer_ray(&self, pointer_ndc: Vec2) -> Option<(Vec3, Vec3)> {
        let inverse = (self.projection_matrix() * self.view_matrix()).inverse();
        let near = inverse.project_point3(pointer_ndc.extend(0.0));
        let far = inverse.project_point3(pointer_ndc.extend(1.0));
        let direction = (far - near).normalize_or_zero();
        if !near.is_finite() || direction == Vec3::ZERO {
            return None;
        }
        Some((near, direction))
    }
}

/// What a pick landed on.
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    /// World-space hit point; the centre of the impulse.
    pub point: Vec3,
    /// Body that was hit, if the hit collider has one.
    pub body: Option<RigidBodyHandle>,
    /// Name of the actor owning the body; `None` for the ground or unknown bodies.
    pub actor: Option<String>,
}

/// Linear falloff for a body at `distance` from the centre, or `None` if it is out of reach.
pub fn falloff(distance: f32, radius: f32) -> Option<f32> {
    if distance > radius || distance <= MIN_IMPULSE_DISTANCE {
        return None;
    }
    let falloff = 1.0 - distance / radius;
    (falloff > 0.0).then_some(falloff)
}

/// Push every dynamic actor within `radius` of `center` directly away from it.
/// Magnitude is `strength * falloff`. Returns the number of bodies pushed.
pub fn apply_radial_impulse(
    world: &mut PhysicsWorld,
    registry: &ActorRegistry,
    center: Vec3,
    radius: f32,
    strength: f32,
) -> usize {
    let mut pushed = 0;
    for handle in registry.iter().filter(|h| h.is_dynamic()) {
        let Some(position) = world.body_position(handle.body.rigid_body) else {
            continue;
        };
        let offset = position - center;
        let distance = offset.length();
        let Some(falloff) = falloff(distance, radius) else {
            continue;
        };
        let impulse = offset / distance * (strength * falloff);
        world.apply_impulse(handle.body.rigid_body, impulse);
        pushed += 1;
    }
    pushed
}

/// Turns clicks into impulses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionController {
    pub radius: f32,
    pub strength: f32,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::from_settings(&InteractionSettings::default())
    }
}

impl InteractionController {
    pub fn from_settings(settings: &InteractionSettings) -> Self {
        Self {
            radius: settings.impulse_radius,
            strength: settings.impulse_strength,
        }
    }

    /// Resolve a pointer to the closest thing under it.
    pub fn pick(
        &self,
        pointer_ndc: Vec2,
        camera: &CameraPose,
        world: &PhysicsWorld,
        registry: &ActorRegistry,
    ) -> Option<PickHit> {
        let (origin, direction) = camera.pointer_ray(pointer_ndc)?;
        let hit = world.ray_test_closest(origin, direction)?;
        let actor = hit
            .body
            .and_then(|body| registry.find_by_body(body))
            .map(|handle| handle.name.clone());
        Some(PickHit {
            point: hit.point,
            body: hit.body,
            actor,
        })
    }

    /// Radial impulse with this controller's radius and strength.
    pub fn apply_radial_impulse(
        &self,
        center: Vec3,
        world: &mut PhysicsWorld,
        registry: &ActorRegistry,
    ) -> usize {
        apply_radial_impulse(world, registry, center, self.radius, self.strength)
    }

    /// Pick, then push everything near the hit point. A miss does nothing.
    pub fn handle_click(
        &self,
        pointer_ndc: Vec2,
        camera: &CameraPose,
        world: &mut PhysicsWorld,
        registry: &ActorRegistry,
    ) -> Option<PickHit> {
        let Some(hit) = self.pick(pointer_ndc, camera, world, registry) else {
            log::debug!("Pick at {:?} hit nothing", pointer_ndc);
            return None;
        };
        log::debug!("Pick ray hit body {:?}", hit.body);
        let pushed = self.apply_radial_impulse(hit.point, world, registry);
        log::info!(
            "Pick hit {} at {:.2?}, pushed {} bod{}",
            hit.actor.as_deref().unwrap_or("ground"),
            hit.point,
            pushed,
            if pushed == 1 { "y" } else { "ies" }
        );
        Some(hit)
    }
}
