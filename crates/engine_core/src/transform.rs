//! Transform component and utilities for spatial positioning.
//!
//! The sandbox world is Z-up: +Z is up, +Y is forward at zero heading, +X is right.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Rotation from heading/pitch/roll in degrees.
    /// Heading turns about world +Z, pitch about local +X, roll about local +Y.
    pub fn rotation_from_hpr(heading: f32, pitch: f32, roll: f32) -> Quat {
        Quat::from_rotation_z(heading.to_radians())
            * Quat::from_rotation_x(pitch.to_radians())
            * Quat::from_rotation_y(roll.to_radians())
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Get the forward direction (positive Y).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Get the right direction (positive X).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Z).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }
}

/// Raw transform data for GPU upload (instance data).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TransformRaw {
    pub model: [[f32; 4]; 4],
}

impl From<&Transform> for TransformRaw {
    fn from(transform: &Transform) -> Self {
        Self {
            model: transform.to_matrix().to_cols_array_2d(),
        }
    }
}

impl From<Transform> for TransformRaw {
    fn from(transform: Transform) -> Self {
        Self::from(&transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn identity_axes_are_z_up() {
        let t = Transform::default();
        assert!(approx(t.forward(), Vec3::Y));
        assert!(approx(t.right(), Vec3::X));
        assert!(approx(t.up(), Vec3::Z));
    }

    #[test]
    fn positive_heading_turns_left() {
        let t = Transform::from_position_rotation(Vec3::ZERO, Transform::rotation_from_hpr(90.0, 0.0, 0.0));
        assert!(approx(t.forward(), -Vec3::X));
    }

    #[test]
    fn positive_pitch_looks_up() {
        let t = Transform::from_position_rotation(Vec3::ZERO, Transform::rotation_from_hpr(0.0, 30.0, 0.0));
        assert!(t.forward().z > 0.49);
        assert!(t.forward().y > 0.0);
    }

    #[test]
    fn raw_matrix_carries_translation() {
        let raw = TransformRaw::from(Transform::from_position(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(raw.model[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
