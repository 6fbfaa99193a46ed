//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for the sandbox's collider kinds.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static environment (the ground plane)
    Environment = 1 << 0,
    /// Scene actors (cubes)
    Actor = 1 << 1,
    /// Actors that pointer rays may hit
    Pickable = 1 << 2,
    /// The pointer pick ray itself (query-only)
    PickRay = 1 << 3,
}

impl CollisionGroup {
    fn bits(groups: &[CollisionGroup]) -> Group {
        Group::from_bits_retain(groups.iter().fold(0, |acc, g| acc | *g as u32))
    }

    /// Environment collides with, and is hit by, everything.
    pub fn environment() -> InteractionGroups {
        InteractionGroups::new(Self::bits(&[Self::Environment]), Group::ALL)
    }

    /// Actor groups; `pickable` adds membership in the pick-ray target set.
    pub fn actor(pickable: bool) -> InteractionGroups {
        let membership = if pickable {
            Self::bits(&[Self::Actor, Self::Pickable])
        } else {
            Self::bits(&[Self::Actor])
        };
        let filter = Self::bits(&[Self::Environment, Self::Actor, Self::PickRay]);
        InteractionGroups::new(membership, filter)
    }

    /// Groups used by pointer pick queries: the ground and pickable actors.
    pub fn pick_ray() -> InteractionGroups {
        InteractionGroups::new(
            Self::bits(&[Self::PickRay]),
            Self::bits(&[Self::Environment, Self::Pickable]),
        )
    }
}

/// Handles linking an actor to its physics representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    pub rigid_body: RigidBodyHandle,
    pub collider: ColliderHandle,
    /// Mass the body was attached with. 0 means fixed.
    pub mass: f32,
}

impl PhysicsBody {
    pub fn new(rigid_body: RigidBodyHandle, collider: ColliderHandle, mass: f32) -> Self {
        Self {
            rigid_body,
            collider,
            mass,
        }
    }

    /// Dynamic bodies respond to gravity and impulses.
    pub fn is_dynamic(&self) -> bool {
        self.mass > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_ray_hits_environment_and_pickable_actors() {
        let ray = CollisionGroup::pick_ray();
        assert!(ray.test(CollisionGroup::environment()));
        assert!(ray.test(CollisionGroup::actor(true)));
        assert!(!ray.test(CollisionGroup::actor(false)));
    }

    #[test]
    fn actors_collide_with_ground_and_each_other() {
        let actor = CollisionGroup::actor(true);
        assert!(actor.test(CollisionGroup::environment()));
        assert!(actor.test(CollisionGroup::actor(false)));
    }
}
