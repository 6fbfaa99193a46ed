//! Errors raised while attaching bodies to the simulation.

use thiserror::Error;

/// A body could not be attached because its parameters are unusable.
///
/// Scene validation rejects these values before spawning, so hitting one of
/// these at runtime points at an internal consistency fault.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsAttachError {
    #[error("invalid shape: size must be finite and > 0, got {0}")]
    InvalidSize(f32),

    #[error("invalid mass: must be finite and >= 0, got {0}")]
    InvalidMass(f32),
}
