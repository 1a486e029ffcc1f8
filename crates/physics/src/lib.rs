//! Kinetic Physics
//!
//! A kinematic character-movement core for a fixed-timestep 3D simulation.
//! Given per-tick player intent and the grounding report of a host motor, it
//! produces the character's next velocity and orientation, switches between
//! locomotion modes and cooperates with a multi-source gravity field.
//!
//! # Architecture
//!
//! - **Gravity**: a registry of gravity sources aggregated into one vector
//!   (and a derived up axis) at any queried position
//! - **Movement**: the character state machine (Default / Falling / Swimming)
//!   with its jump, crouch and orientation sub-systems
//! - **Motor**: the capability the host physics engine provides (ground
//!   probing, overlap queries, capsule resizing)
//! - **Collision**: content flags plus a small parry3d-backed probe world that
//!   reference motors can query
//!
//! # Tick order
//!
//! `set_inputs` → `before_update` → `compute_velocity` → `compute_rotation` →
//! (motor resolves the move) → `after_update`

pub mod collision;
pub mod error;
pub mod gravity;
pub mod math;
pub mod motor;
pub mod movement;

// Re-export commonly used types
pub use collision::{CollisionWorld, ContentFlags, RayHit};
pub use error::{ConfigError, GravityError};
pub use gravity::{GravityBody, GravityField, GravitySample, GravitySource, PlanetGravity, UniformGravity};
pub use motor::{CapsuleDimensions, CharacterMotor, ColliderId, GroundingStatus, TriggerInteraction};
pub use movement::{
    CharacterConfig, CharacterController, CharacterState, GravityOrientationMethod, InputButtons,
    LocomotionState, OrientationMethod, PlayerCharacterInputs,
};
