//! Live actors: spawned once from a scene, looked up by physics body.

use engine_core::Transform;
use physics::{PhysicsAttachError, PhysicsBody, PhysicsWorld, RigidBodyHandle};
use std::collections::HashMap;
use thiserror::Error;

use crate::actors::{Actor, ActorKind};
use crate::presentation::{PresentationHandle, SceneGraph};
use crate::scene_config::SceneDocument;

#[derive(Error, Debug)]
pub enum SpawnError {
    #[error("failed to attach actor {name:?} (cubes[{index}]): {source}")]
    Attach {
        index: usize,
        name: String,
        #[source]
        source: PhysicsAttachError,
    },
}

/// A spawned actor. The body itself is owned by `PhysicsWorld`; this only refers to it.
#[derive(Debug, Clone)]
pub struct ActorHandle {
    pub name: String,
    pub kind: ActorKind,
    pub body: PhysicsBody,
    pub presentation: PresentationHandle,
}

impl ActorHandle {
    /// Current world transform, read from the simulation.
    pub fn transform(&self, world: &PhysicsWorld) -> Option<Transform> {
        world.body_transform(self.body.rigid_body)
    }

    pub fn is_dynamic(&self) -> bool {
        self.body.is_dynamic()
    }
}

/// All actors of the running scene, in document order.
#[derive(Debug, Default)]
pub struct ActorRegistry {
    handles: Vec<ActorHandle>,
    by_body: HashMap<RigidBodyHandle, usize>,
}

impl ActorRegistry {
    /// Spawn every cube of `document` in one pass, in document order.
    pub fn spawn_all(
        document: &SceneDocument,
        world: &mut PhysicsWorld,
        scene: &mut SceneGraph,
    ) -> Result<Self, SpawnError> {
        let mut registry = Self {
            handles: Vec::with_capacity(document.cubes.len()),
            by_body: HashMap::with_capacity(document.cubes.len()),
        };

        for (index, spec) in document.cubes.iter().enumerate() {
            let kind = ActorKind::from_spec(spec);
            let body = match kind.make_body(world, spec.position) {
                Ok(body) => body,
                Err(source) => {
                    registry.rollback(world, scene);
                    return Err(SpawnError::Attach {
                        index,
                        name: spec.name.clone(),
                        source,
                    });
                }
            };
            world.set_pickable(&body, true);

            let presentation = scene.spawn_visual(
                &spec.name,
                kind.make_visual(),
                Transform::from_position(spec.position),
            );

            registry.by_body.insert(body.rigid_body, registry.handles.len());
            registry.handles.push(ActorHandle {
                name: spec.name.clone(),
                kind,
                body,
                presentation,
            });
        }

        world.update_query_pipeline();
        log::info!(
            "Spawned {} actor(s) ({} dynamic)",
            registry.len(),
            registry.handles.iter().filter(|h| h.is_dynamic()).count()
        );
        Ok(registry)
    }

    /// Spawn the single synthetic cube used when no scene is supplied.
    pub fn spawn_fallback(world: &mut PhysicsWorld, scene: &mut SceneGraph) -> Result<Self, SpawnError> {
        Self::spawn_all(&SceneDocument::fallback(), world, scene)
    }

    /// Remove everything spawned so far from the world and the scene.
    fn rollback(self, world: &mut PhysicsWorld, scene: &mut SceneGraph) {
        for handle in &self.handles {
            world.detach(&handle.body);
            scene.despawn(handle.presentation);
        }
        world.update_query_pipeline();
    }

    /// Map a physics body back to the actor that owns it.
    pub fn find_by_body(&self, body: RigidBodyHandle) -> Option<&ActorHandle> {
        self.by_body.get(&body).map(|&i| &self.handles[i])
    }

    pub fn handles(&self) -> &[ActorHandle] {
        &self.handles
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActorHandle> {
        self.handles.iter()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Push every actor's simulated transform to its visual.
    pub fn sync_presentation(&self, world: &PhysicsWorld, scene: &mut SceneGraph) {
        for handle in &self.handles {
            if let Some(transform) = handle.transform(world) {
                scene.sync_transform(handle.presentation, transform);
            }
        }
    }
}
