//! Headless presentation scene.
//!
//! Holds one ECS entity per actor with the data a renderer needs (mesh, tint,
//! transform). The simulation writes transforms into it after each step; it never
//! reads them back. A GPU renderer consumes `instance_data()`.

use bytemuck::{Pod, Zeroable};
use engine_core::{MeshInstance, Name, Tint, Transform, TransformRaw};
use glam::Quat;
use hecs::{Entity, World};

/// Opaque reference to an actor's visual representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PresentationHandle(Entity);

/// Everything needed to build an actor's visual.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visual {
    pub mesh: MeshInstance,
    pub tint: Tint,
}

/// Per-instance data for GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// ECS world of actor visuals.
pub struct SceneGraph {
    world: World,
    /// Draw order (spawn order).
    order: Vec<Entity>,
    /// Orientation of the on-screen axes widget: the inverse camera rotation.
    compass: Quat,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            order: Vec::new(),
            compass: Quat::IDENTITY,
        }
    }

    /// Create the visual for an actor.
    pub fn spawn_visual(&mut self, name: &str, visual: Visual, transform: Transform) -> PresentationHandle {
        let entity = self
            .world
            .spawn((Name(name.to_string()), visual.mesh, visual.tint, transform));
        self.order.push(entity);
        PresentationHandle(entity)
    }

    /// Remove a visual.
    pub fn despawn(&mut self, handle: PresentationHandle) {
        if self.world.despawn(handle.0).is_ok() {
            self.order.retain(|&entity| entity != handle.0);
        }
    }

    /// Write an actor's simulated transform.
    pub fn sync_transform(&mut self, handle: PresentationHandle, transform: Transform) {
        if let Ok(mut current) = self.world.get::<&mut Transform>(handle.0) {
            *current = transform;
        }
    }

    /// Camera-relative UI: the compass shows world axes as seen from the camera.
    pub fn sync_camera(&mut self, camera_rotation: Quat) {
        self.compass = camera_rotation.inverse();
    }

    pub fn compass_orientation(&self) -> Quat {
        self.compass
    }

    /// Last transform written for an actor.
    pub fn transform(&self, handle: PresentationHandle) -> Option<Transform> {
        self.world.get::<&Transform>(handle.0).ok().map(|t| *t)
    }

    /// Name given to a visual at spawn time.
    pub fn name(&self, handle: PresentationHandle) -> Option<String> {
        self.world.get::<&Name>(handle.0).ok().map(|n| n.0.clone())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Instance data in spawn order, mesh scale baked into the model matrix.
    pub fn instance_data(&self) -> Vec<InstanceData> {
        self.order
            .iter()
            .filter_map(|&entity| {
                let mut query = self
                    .world
                    .query_one::<(&Transform, &MeshInstance, &Tint)>(entity)
                    .ok()?;
                let (transform, mesh, tint) = query.get()?;
                let mut model = *transform;
                model.scale = match mesh.shape {
                    engine_core::MeshShape::Cube { size } => glam::Vec3::splat(size),
                };
                Some(InstanceData {
                    model: TransformRaw::from(model).model,
                    color: tint.color.to_array(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn cube_visual(size: f32) -> Visual {
        Visual {
            mesh: MeshInstance::cube(size),
            tint: Tint::new([0.1, 0.2, 0.3, 1.0]),
        }
    }

    #[test]
    fn spawn_then_sync_transform() {
        let mut scene = SceneGraph::new();
        let handle = scene.spawn_visual("a", cube_visual(1.0), Transform::from_position(Vec3::Z));
        assert_eq!(scene.name(handle).as_deref(), Some("a"));

        let moved = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        scene.sync_transform(handle, moved);
        assert_eq!(scene.transform(handle), Some(moved));
    }

    #[test]
    fn despawn_drops_visual_from_instances() {
        let mut scene = SceneGraph::new();
        let first = scene.spawn_visual("first", cube_visual(1.0), Transform::default());
        scene.spawn_visual("second", cube_visual(2.0), Transform::default());

        scene.despawn(first);
        assert_eq!(scene.len(), 1);
        assert!(scene.name(first).is_none());
        assert_eq!(scene.instance_data()[0].model[0][0], 2.0);
    }

    #[test]
    fn instance_data_follows_spawn_order_and_scales_mesh() {
        let mut scene = SceneGraph::new();
        scene.spawn_visual("big", cube_visual(2.0), Transform::from_position(Vec3::X));
        scene.spawn_visual("small", cube_visual(0.5), Transform::default());

        let instances = scene.instance_data();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].model[0][0], 2.0);
        assert_eq!(instances[0].model[3], [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(instances[1].model[0][0], 0.5);
        assert_eq!(instances[1].color, [0.1, 0.2, 0.3, 1.0]);

        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        assert_eq!(bytes.len(), 2 * std::mem::size_of::<InstanceData>());
    }

    #[test]
    fn compass_is_inverse_camera_rotation() {
        let mut scene = SceneGraph::new();
        let rotation = Quat::from_rotation_z(0.7);
        scene.sync_camera(rotation);
        let combined = scene.compass_orientation() * rotation;
        assert!(combined.abs_diff_eq(Quat::IDENTITY, 1e-5));
    }
}
