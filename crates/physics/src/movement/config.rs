//! Character movement configuration.
//!
//! All movement parameters are grouped here for easy tuning. Values use
//! metric units (meters, seconds); sharpness values are inverse time
//! constants of the exponential smoothing filters.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::ContentFlags;
use crate::error::ConfigError;
use crate::motor::CapsuleDimensions;

/// Which direction the character turns to face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrientationMethod {
    /// Face the camera's planar forward direction.
    #[default]
    TowardsCamera,
    /// Face the direction of movement input.
    TowardsMovement,
}

/// How the character's up axis is aligned after facing is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GravityOrientationMethod {
    /// Blend up toward world `+Y`.
    #[default]
    None,
    /// Blend up toward the aggregated gravity's up axis.
    TowardsGravity,
    /// Blend up toward the ground normal while stably grounded, toward the
    /// gravity up axis otherwise.
    TowardsGroundSlopeAndGravity,
}

/// Configuration for a character controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterConfig {
    // ========================================================================
    // Stable Movement
    // ========================================================================
    /// Ground movement speed (meters/second).
    pub stable_move_speed: f32,

    /// How quickly ground velocity converges on the target velocity.
    pub stable_movement_sharpness: f32,

    /// Speed multiplier while sprinting (not applied while crouching).
    pub sprint_multiplier: f32,

    /// Speed multiplier while crouched.
    pub crouch_speed_multiplier: f32,

    // ========================================================================
    // Orientation
    // ========================================================================
    /// How quickly the character turns toward its look direction.
    pub orientation_sharpness: f32,

    pub orientation_method: OrientationMethod,

    pub gravity_orientation_method: GravityOrientationMethod,

    /// How quickly the up axis aligns with gravity or the ground.
    pub bonus_orientation_sharpness: f32,

    // ========================================================================
    // Air Movement
    // ========================================================================
    /// Maximum speed reachable through air control (meters/second).
    pub air_move_speed: f32,

    /// Rate at which air control closes the gap to the target velocity.
    pub air_acceleration: f32,

    /// Linear drag applied while airborne.
    pub drag: f32,

    // ========================================================================
    // Jumping
    // ========================================================================
    /// Allow jumping off ground that is too steep to stand on.
    pub allow_jumping_when_sliding: bool,

    /// Jump velocity along the jump direction (meters/second).
    pub jump_speed: f32,

    /// How long a jump press stays buffered before touching ground (seconds).
    pub jump_pre_grounding_grace_time: f32,

    /// How long after leaving ground a jump is still allowed (seconds).
    pub jump_post_grounding_grace_time: f32,

    /// Ground snapping is suspended for this long after a jump (seconds).
    pub jump_unground_duration: f32,

    // ========================================================================
    // Swimming
    // ========================================================================
    /// Point tested for submersion, relative to the character pivot in
    /// character space.
    pub swim_reference_offset: Vec3,

    /// Volumes that count as water.
    pub water_mask: ContentFlags,

    /// Swimming speed (meters/second).
    pub swimming_speed: f32,

    pub swimming_movement_sharpness: f32,

    pub swimming_orientation_sharpness: f32,

    // ========================================================================
    // Landing
    // ========================================================================
    /// Vertical speed that counts as a hard landing when lost in one tick
    /// (meters/second).
    pub hard_land_required_velocity: f32,

    /// Vertical speed at or below which the character counts as stopped.
    pub hard_land_rest_speed: f32,

    /// Lock movement input after a hard landing.
    pub freeze_on_hard_land: bool,

    /// Duration of the hard-landing lock (seconds).
    pub freeze_time: f32,

    // ========================================================================
    // Crouching
    // ========================================================================
    pub crouched_capsule: CapsuleDimensions,

    /// What blocks standing back up.
    pub collidable_mask: ContentFlags,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            // Stable movement
            stable_move_speed: 10.0,
            stable_movement_sharpness: 15.0,
            sprint_multiplier: 1.2,
            crouch_speed_multiplier: 0.5,

            // Orientation
            orientation_sharpness: 10.0,
            orientation_method: OrientationMethod::TowardsCamera,
            gravity_orientation_method: GravityOrientationMethod::None,
            bonus_orientation_sharpness: 10.0,

            // Air
            air_move_speed: 10.0,
            air_acceleration: 5.0,
            drag: 0.1,

            // Jumping
            allow_jumping_when_sliding: false,
            jump_speed: 10.0,
            jump_pre_grounding_grace_time: 0.0,
            jump_post_grounding_grace_time: 0.0,
            jump_unground_duration: 0.1,

            // Swimming
            swim_reference_offset: Vec3::new(0.0, 1.2, 0.0),
            water_mask: ContentFlags::WATER,
            swimming_speed: 4.0,
            swimming_movement_sharpness: 3.0,
            swimming_orientation_sharpness: 2.0,

            // Landing
            hard_land_required_velocity: 15.0,
            hard_land_rest_speed: 0.5,
            freeze_on_hard_land: false,
            freeze_time: 0.5,

            // Crouching (standing capsule is 0.4 x 1.8)
            crouched_capsule: CapsuleDimensions::new(0.4, 1.0, 0.5),
            collidable_mask: ContentFlags::MASK_PLAYER_SOLID,
        }
    }
}

impl CharacterConfig {
    /// Fast, forgiving movement with generous jump grace windows.
    pub fn arcade() -> Self {
        Self {
            stable_move_speed: 12.0,
            stable_movement_sharpness: 20.0,
            sprint_multiplier: 1.5,
            air_acceleration: 10.0,
            jump_speed: 12.0,
            jump_pre_grounding_grace_time: 0.15,
            jump_post_grounding_grace_time: 0.15,
            allow_jumping_when_sliding: true,
            ..Default::default()
        }
    }

    /// Slower, heavier movement that locks briefly on hard landings.
    pub fn tactical() -> Self {
        Self {
            stable_move_speed: 5.0,
            stable_movement_sharpness: 10.0,
            sprint_multiplier: 1.6,
            crouch_speed_multiplier: 0.4,
            air_move_speed: 4.0,
            air_acceleration: 1.0,
            jump_speed: 6.0,
            jump_post_grounding_grace_time: 0.05,
            hard_land_required_velocity: 12.0,
            freeze_on_hard_land: true,
            freeze_time: 0.4,
            ..Default::default()
        }
    }

    /// Ground speed for the given sprint intent (before the crouch multiplier).
    pub fn ground_speed(&self, sprinting: bool) -> f32 {
        if sprinting {
            self.stable_move_speed * self.sprint_multiplier
        } else {
            self.stable_move_speed
        }
    }

    /// Check every tunable for values the integrators cannot handle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("stable_move_speed", self.stable_move_speed),
            ("stable_movement_sharpness", self.stable_movement_sharpness),
            ("crouch_speed_multiplier", self.crouch_speed_multiplier),
            ("orientation_sharpness", self.orientation_sharpness),
            ("bonus_orientation_sharpness", self.bonus_orientation_sharpness),
            ("air_move_speed", self.air_move_speed),
            ("air_acceleration", self.air_acceleration),
            ("drag", self.drag),
            ("jump_speed", self.jump_speed),
            ("jump_pre_grounding_grace_time", self.jump_pre_grounding_grace_time),
            ("jump_post_grounding_grace_time", self.jump_post_grounding_grace_time),
            ("jump_unground_duration", self.jump_unground_duration),
            ("swimming_speed", self.swimming_speed),
            ("swimming_movement_sharpness", self.swimming_movement_sharpness),
            ("swimming_orientation_sharpness", self.swimming_orientation_sharpness),
            ("hard_land_required_velocity", self.hard_land_required_velocity),
            ("hard_land_rest_speed", self.hard_land_rest_speed),
            ("freeze_time", self.freeze_time),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let positive = [
            ("crouched_capsule.radius", self.crouched_capsule.radius),
            ("crouched_capsule.height", self.crouched_capsule.height),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if !self.sprint_multiplier.is_finite() || self.sprint_multiplier < 1.0 {
            return Err(ConfigError::SprintMultiplier(self.sprint_multiplier));
        }
        if !self.swim_reference_offset.is_finite() {
            return Err(ConfigError::SwimReferenceOffset);
        }
        Ok(())
    }
}
