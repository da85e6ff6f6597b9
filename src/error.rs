//! Error types for the solver's public boundary.
//!
//! Degenerate constraint configurations never surface here: the solver treats
//! them as no-ops. These errors cover caller contract violations only.

use thiserror::Error;

use crate::utils::allocator::BodyId;

/// Errors reported by body setup, world construction and the `simulate` entry points.
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Time step is zero, negative or not finite.
    #[error("invalid time step: {0} (must be finite and > 0)")]
    InvalidTimeStep(f32),

    /// Substep count is zero.
    #[error("invalid substep count: {0} (must be > 0)")]
    InvalidSubstepCount(u32),

    /// Box with a zero, negative or non-finite extent.
    #[error("degenerate box size: ({x}, {y}, {z})")]
    DegenerateBox {
        /// Extent along X.
        x: f32,
        /// Extent along Y.
        y: f32,
        /// Extent along Z.
        z: f32,
    },

    /// Density is zero, negative or not finite.
    #[error("invalid density: {0} (must be finite and > 0)")]
    InvalidDensity(f32),

    /// Joint references a body that is not in the world.
    #[error("unknown body: {0:?}")]
    UnknownBody(BodyId),

    /// Joint connects a body to itself.
    #[error("joint connects body {0:?} to itself")]
    SelfJoint(BodyId),

    /// Configuration could not be parsed or serialized.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, PhysicsError>;
