//! Locomotion state and the per-character timer/flag bundle.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::crouch::CrouchState;
use super::jump::JumpState;
use crate::gravity::GravitySample;
use crate::motor::ColliderId;

/// The character's locomotion mode. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CharacterState {
    /// Grounded movement (also covers the tick the ground is lost).
    #[default]
    Default,
    /// Airborne.
    Falling,
    /// Submerged in water.
    Swimming,
}

/// Everything the controller mutates from tick to tick.
///
/// Reset as a whole via [`LocomotionState::reset`] so no timer or latch can
/// leak across a respawn.
#[derive(Debug, Clone)]
pub struct LocomotionState {
    /// World-space move intent (camera-relative, length <= 1).
    pub(crate) move_input: Vec3,

    /// World-space direction the character wants to face.
    pub(crate) look_input: Vec3,

    /// Current ground speed before the crouch multiplier.
    pub(crate) ground_speed: f32,

    pub(crate) jump: JumpState,

    pub(crate) crouch: CrouchState,

    /// An impact was detected this tick.
    pub(crate) hard_landing: bool,

    /// Seconds spent falling since the character was last stable.
    pub(crate) no_ground_time: f32,

    /// Vertical (along character up) velocity recorded at the previous
    /// pre-update.
    pub(crate) prev_vertical_velocity: f32,

    /// Remaining movement lockout (seconds).
    pub(crate) freeze_remaining: f32,

    /// Water volume the character is swimming in.
    pub(crate) water_zone: Option<ColliderId>,

    /// Gravity sampled at this tick's pre-update.
    pub(crate) gravity: GravitySample,

    /// Impulse added on top of the next computed velocity.
    pub(crate) pending_velocity: Vec3,
}

impl LocomotionState {
    pub fn new(ground_speed: f32) -> Self {
        Self {
            move_input: Vec3::ZERO,
            look_input: Vec3::ZERO,
            ground_speed,
            jump: JumpState::new(),
            crouch: CrouchState::new(),
            hard_landing: false,
            no_ground_time: 0.0,
            prev_vertical_velocity: 0.0,
            freeze_remaining: 0.0,
            water_zone: None,
            gravity: GravitySample::default(),
            pending_velocity: Vec3::ZERO,
        }
    }

    /// Every timer and latch back to its initial value.
    pub fn reset(&mut self, ground_speed: f32) {
        *self = Self::new(ground_speed);
    }

    /// Count the movement lockout down by one tick.
    ///
    /// Returns whether input is locked this tick. Only a running countdown
    /// locks input, and only if `lock_enabled`.
    pub(crate) fn advance_freeze(&mut self, delta_time: f32, lock_enabled: bool) -> bool {
        if self.freeze_remaining > 0.0 {
            self.freeze_remaining -= delta_time;
            lock_enabled
        } else {
            self.freeze_remaining = 0.0;
            false
        }
    }

    pub fn move_input(&self) -> Vec3 {
        self.move_input
    }

    pub fn look_input(&self) -> Vec3 {
        self.look_input
    }

    pub fn ground_speed(&self) -> f32 {
        self.ground_speed
    }

    pub fn jump(&self) -> &JumpState {
        &self.jump
    }

    pub fn crouch(&self) -> &CrouchState {
        &self.crouch
    }

    pub fn freeze_remaining(&self) -> f32 {
        self.freeze_remaining
    }

    pub fn water_zone(&self) -> Option<ColliderId> {
        self.water_zone
    }
}
