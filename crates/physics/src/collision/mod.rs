//! Probe geometry for character motors.
//!
//! The movement core never touches geometry directly; it asks its motor for
//! overlaps and closest points. This module is the small parry3d-backed world
//! a motor can answer those questions from.
//!
//! # Key Types
//!
//! - [`CollisionWorld`]: The collision environment containing all volumes
//! - [`ContentFlags`]: What a volume is (solid, water, trigger) for filtering
//! - [`RayHit`]: Output from a raycast
//!
//! # Queries
//!
//! - Raycasts for ground probing
//! - Capsule overlaps filtered by content mask and trigger interaction
//! - Closest point on a single volume, used for submersion tests

mod flags;
mod world;

pub use flags::ContentFlags;
pub use world::{CollisionBrush, CollisionWorld, RayHit};
