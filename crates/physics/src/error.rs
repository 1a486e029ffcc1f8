//! Error types.

use thiserror::Error;

/// Gravity registry contract violations.
///
/// The registry is left untouched when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GravityError {
    #[error("gravity source is already registered")]
    DuplicateSource,

    #[error("gravity source is not registered")]
    UnknownSource,
}

/// Invalid character configuration, detected when a controller is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite and non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be finite and greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("sprint multiplier must be at least 1.0, got {0}")]
    SprintMultiplier(f32),

    #[error("swim reference offset must be finite")]
    SwimReferenceOffset,

    #[error("crouched capsule height {crouched} must be less than the standing height {standing}")]
    CrouchNotShorter { crouched: f32, standing: f32 },
}
