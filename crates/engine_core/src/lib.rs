//! Core engine types and utilities for CrashWorld.
//!
//! This crate provides the foundational types used across the sandbox:
//! - Transform and spatial components (Z-up world)
//! - Frame time measurement
//! - Presentation components for the ECS scene

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};
