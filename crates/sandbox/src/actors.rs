//! Actor variants and the two things every actor can produce:
//! a physics body and a visual.

use engine_core::{MeshInstance, Tint};
use glam::Vec3;
use physics::{BodyShape, PhysicsAttachError, PhysicsBody, PhysicsWorld};

use crate::presentation::Visual;
use crate::scene_config::ActorSpec;

/// Capabilities of a spawnable actor.
pub trait Actor {
    /// Attach this actor's rigid body to the world at `position`.
    fn make_body(&self, world: &mut PhysicsWorld, position: Vec3) -> Result<PhysicsBody, PhysicsAttachError>;

    /// Describe this actor's visual representation.
    fn make_visual(&self) -> Visual;
}

/// Solid cube with a flat color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeActor {
    pub size: f32,
    pub mass: f32,
    pub color: [f32; 4],
}

impl Actor for CubeActor {
    fn make_body(&self, world: &mut PhysicsWorld, position: Vec3) -> Result<PhysicsBody, PhysicsAttachError> {
        world.attach(BodyShape::Cube { size: self.size }, self.mass, position)
    }

    fn make_visual(&self) -> Visual {
        Visual {
            mesh: MeshInstance::cube(self.size),
            tint: Tint::new(self.color),
        }
    }
}

/// Closed set of actor variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActorKind {
    Cube(CubeActor),
}

impl ActorKind {
    pub fn from_spec(spec: &ActorSpec) -> Self {
        ActorKind::Cube(CubeActor {
            size: spec.size,
            mass: spec.mass,
            color: spec.color,
        })
    }
}

impl Actor for ActorKind {
    fn make_body(&self, world: &mut PhysicsWorld, position: Vec3) -> Result<PhysicsBody, PhysicsAttachError> {
        match self {
            ActorKind::Cube(cube) => cube.make_body(world, position),
        }
    }

    fn make_visual(&self) -> Visual {
        match self {
            ActorKind::Cube(cube) => cube.make_visual(),
        }
    }
}
