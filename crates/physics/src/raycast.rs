//! Raycasting for pointer picking and queries.

use crate::collision::CollisionGroup;
use crate::PhysicsWorld;
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Rigid body owning the collider; `None` for parentless colliders like the ground.
    pub body: Option<RigidBodyHandle>,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

impl PhysicsWorld {
    /// Cast a ray and return the first hit.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(collider, intersection)| {
                let point = ray.point_at(intersection.time_of_impact);
                RaycastHit {
                    collider,
                    body: self.collider_set.get(collider).and_then(|c| c.parent()),
                    distance: intersection.time_of_impact,
                    point: Vec3::new(point.x, point.y, point.z),
                    normal: Vec3::new(
                        intersection.normal.x,
                        intersection.normal.y,
                        intersection.normal.z,
                    ),
                }
            })
    }

    /// Closest hit among the ground and pickable actors along an unbounded ray.
    /// The direction does not need to be normalized; a zero direction never hits.
    pub fn ray_test_closest(&self, origin: Vec3, direction: Vec3) -> Option<RaycastHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        let filter = QueryFilter::default().groups(CollisionGroup::pick_ray());
        self.raycast(origin, direction, Real::MAX, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BodyShape;

    fn pickable_cube(world: &mut PhysicsWorld, size: f32, mass: f32, at: Vec3) -> RigidBodyHandle {
        let body = world.attach(BodyShape::Cube { size }, mass, at).unwrap();
        world.set_pickable(&body, true);
        body.rigid_body
    }

    #[test]
    fn ray_down_hits_ground() {
        let world = PhysicsWorld::default();
        let hit = world
            .ray_test_closest(Vec3::new(3.0, 4.0, 10.0), -Vec3::Z)
            .expect("ground is always hit from above");
        assert_eq!(Some(hit.collider), world.ground());
        assert!(hit.body.is_none());
        assert!((hit.distance - 10.0).abs() < 1e-4);
        assert!((hit.point - Vec3::new(3.0, 4.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn ray_up_misses_everything() {
        let mut world = PhysicsWorld::default();
        pickable_cube(&mut world, 1.0, 1.0, Vec3::new(0.0, 0.0, 8.0));
        world.update_query_pipeline();
        assert!(world.ray_test_closest(Vec3::new(20.0, 0.0, 1.0), Vec3::Z).is_none());
        assert!(world.ray_test_closest(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO).is_none());
    }

    #[test]
    fn closest_of_two_cubes_wins() {
        let mut world = PhysicsWorld::default();
        let near = pickable_cube(&mut world, 1.0, 1.0, Vec3::new(0.0, 5.0, 2.0));
        let _far = pickable_cube(&mut world, 1.0, 1.0, Vec3::new(0.0, 10.0, 2.0));
        world.update_query_pipeline();

        let hit = world
            .ray_test_closest(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 3.0, 0.0))
            .unwrap();
        assert_eq!(hit.body, Some(near));
        assert!((hit.distance - 4.5).abs() < 1e-4);
        assert!((hit.normal - -Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn non_pickable_actor_is_transparent_to_pick_rays() {
        let mut world = PhysicsWorld::default();
        world
            .attach(BodyShape::Cube { size: 1.0 }, 1.0, Vec3::new(0.0, 0.0, 5.0))
            .unwrap();
        world.update_query_pipeline();
        let hit = world.ray_test_closest(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z).unwrap();
        assert!(hit.body.is_none());
        assert_eq!(Some(hit.collider), world.ground());
    }
}
