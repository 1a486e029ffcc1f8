//! The host motor capability.
//!
//! A motor owns the character's transform and does the actual collision
//! resolution. The movement core only reads its reports and issues a few
//! requests (resize the capsule, skip ground snapping for a while). Motors are
//! passed into every controller call instead of being stored, so the
//! controller never holds a reference to its host.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::ContentFlags;

/// Identifier of a collider known to the motor's physics world.
pub type ColliderId = u32;

/// Grounding report produced by the motor after its ground probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundingStatus {
    /// Standing on ground flat enough to walk on.
    pub is_stable_on_ground: bool,
    /// Touching any ground at all (including too-steep slopes).
    pub found_any_ground: bool,
    /// Normal of the ground that was found.
    pub ground_normal: Vec3,
}

impl Default for GroundingStatus {
    fn default() -> Self {
        Self::airborne()
    }
}

impl GroundingStatus {
    /// No ground below the character.
    pub fn airborne() -> Self {
        Self {
            is_stable_on_ground: false,
            found_any_ground: false,
            ground_normal: Vec3::Y,
        }
    }

    /// Standing on walkable ground.
    pub fn stable(ground_normal: Vec3) -> Self {
        Self {
            is_stable_on_ground: true,
            found_any_ground: true,
            ground_normal,
        }
    }

    /// Touching ground that is too steep to stand on.
    pub fn sliding(ground_normal: Vec3) -> Self {
        Self {
            is_stable_on_ground: false,
            found_any_ground: true,
            ground_normal,
        }
    }

    /// Whether the character is currently somewhere it may jump from.
    #[inline]
    pub fn can_jump_from(&self, allow_sliding: bool) -> bool {
        if allow_sliding {
            self.found_any_ground
        } else {
            self.is_stable_on_ground
        }
    }

    /// Whether the ground was found but cannot be stood on.
    #[inline]
    pub fn is_sliding(&self) -> bool {
        self.found_any_ground && !self.is_stable_on_ground
    }
}

/// Capsule shape of the character.
///
/// The capsule's center sits `y_offset` above the pivot along the
/// character's up axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapsuleDimensions {
    pub radius: f32,
    pub height: f32,
    pub y_offset: f32,
}

impl CapsuleDimensions {
    pub const fn new(radius: f32, height: f32, y_offset: f32) -> Self {
        Self {
            radius,
            height,
            y_offset,
        }
    }
}

impl Default for CapsuleDimensions {
    /// Standing player capsule, pivot at the feet.
    fn default() -> Self {
        Self::new(0.4, 1.8, 0.9)
    }
}

/// Whether overlap queries report trigger and liquid volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TriggerInteraction {
    /// Skip non-blocking volumes.
    Ignore,
    /// Report non-blocking volumes like any other collider.
    #[default]
    Collide,
}

/// What the movement core needs from the host physics engine.
///
/// All positions are world-space. The transient transform is the one the
/// motor is currently solving for this tick.
pub trait CharacterMotor {
    /// Current up axis of the character (rotation applied to `+Y`).
    fn character_up(&self) -> Vec3;

    /// Current forward axis of the character (rotation applied to `+Z`).
    fn character_forward(&self) -> Vec3;

    fn transient_position(&self) -> Vec3;

    /// Move the pivot without collision resolution (orientation pivot fix-ups).
    fn set_transient_position(&mut self, position: Vec3);

    fn transient_rotation(&self) -> Quat;

    /// Velocity the motor ended the last move with.
    fn velocity(&self) -> Vec3;

    fn grounding_status(&self) -> GroundingStatus;

    fn capsule(&self) -> CapsuleDimensions;

    fn set_capsule_dimensions(&mut self, capsule: CapsuleDimensions);

    /// Overlap the current capsule placed at `position`/`rotation` against the
    /// world.
    ///
    /// Overlapping collider ids are appended to `results`; the number of
    /// overlaps is returned.
    fn overlap(
        &self,
        position: Vec3,
        rotation: Quat,
        results: &mut Vec<ColliderId>,
        mask: ContentFlags,
        triggers: TriggerInteraction,
    ) -> usize;

    /// Closest point on `collider` to `point`. A point inside the collider is
    /// its own closest point. `None` if the collider is unknown.
    fn closest_point(&self, collider: ColliderId, point: Vec3) -> Option<Vec3>;

    /// Skip ground snapping for `duration` seconds so an upward launch can
    /// leave the ground.
    fn force_unground(&mut self, duration: f32);

    /// Enable or disable ground probing and snapping.
    fn set_ground_solving_activation(&mut self, active: bool);

    /// Teleport the character.
    fn set_position_and_rotation(&mut self, position: Vec3, rotation: Quat);
}
