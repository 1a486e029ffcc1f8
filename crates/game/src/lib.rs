//! Kinetic Game Driver
//!
//! This crate drives the character controller the way a host engine would:
//!
//! - Raw input mapping with jump edge detection
//! - A reference motor that probes the ground in a collision world
//! - Players running the per-tick controller sequence
//! - Level geometry and a fixed-timestep simulation owning the gravity field
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Simulation                           │
//! │  ┌──────────┐   ┌──────────────────┐   ┌─────────────────┐  │
//! │  │ RawInput │──►│ InputMapper      │──►│ Player          │  │
//! │  └──────────┘   │ (edges, clamps)  │   │  controller ◄─┐ │  │
//! │                 └──────────────────┘   │  SimpleMotor ─┘ │  │
//! │                                        └─────────────────┘  │
//! │        GravityField (shared)        CollisionWorld (shared) │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod input;
pub mod level;
pub mod motor;
pub mod player;
pub mod simulation;

// Re-export main types
pub use input::{InputMapper, RawInput};
pub use level::{Level, PoolLayout, SpawnPoint};
pub use motor::{MotorSettings, SimpleMotor};
pub use player::{EntityId, Player};
pub use simulation::{Simulation, SimulationConfig};

// Re-export physics types for convenience
pub use kinetic_physics::{
    CharacterConfig, CharacterController, CharacterState, CollisionWorld, ContentFlags, GravityField,
    PlayerCharacterInputs,
};
