//! Presentation components stored on ECS entities.

use glam::Vec4;

/// Primitive mesh shapes a renderer knows how to build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshShape {
    /// Axis-aligned cube with the given edge length.
    Cube { size: f32 },
}

/// Mesh reference component - links an entity to a primitive mesh for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshInstance {
    pub shape: MeshShape,
}

impl MeshInstance {
    pub fn cube(size: f32) -> Self {
        Self {
            shape: MeshShape::Cube { size },
        }
    }
}

/// Flat RGBA color applied to a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub color: Vec4,
}

impl Tint {
    pub fn new(color: [f32; 4]) -> Self {
        Self {
            color: Vec4::from_array(color),
        }
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self { color: Vec4::ONE }
    }
}

/// Human readable name of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);
