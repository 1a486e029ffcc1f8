//! Character movement.
//!
//! A kinematic character controller built around three locomotion states:
//!
//! - **Default**: grounded movement along the ground slope, sprint and crouch
//! - **Falling**: air control, gravity, drag and hard-landing detection
//! - **Swimming**: gravity-free movement bounded by the water surface
//!
//! # Design
//!
//! The [`CharacterController`] owns the state machine and the per-character
//! [`LocomotionState`]. It never owns the physical body: collision
//! resolution is delegated to a [`CharacterMotor`](crate::CharacterMotor)
//! passed into every call. Gravity comes from a shared
//! [`GravityField`](crate::GravityField) sampled once per tick.

mod config;
mod controller;
mod crouch;
mod input;
mod jump;
mod modes;
mod orientation;
mod state;

#[cfg(test)]
mod test_support;

pub use config::{CharacterConfig, GravityOrientationMethod, OrientationMethod};
pub use controller::CharacterController;
pub use crouch::{CrouchState, StandUpResult};
pub use input::{InputButtons, PlayerCharacterInputs};
pub use jump::JumpState;
pub use state::{CharacterState, LocomotionState};
