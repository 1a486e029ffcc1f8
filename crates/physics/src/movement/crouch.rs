//! Crouch state with capsule resizing.
//!
//! Crouching shrinks the motor's capsule immediately. Standing back up is
//! attempted in the post-update: the standing capsule is restored, probed for
//! overlaps and rolled back to the crouched size if anything is in the way,
//! so the character stays crouched under a low ceiling until it moves out.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::collision::ContentFlags;
use crate::motor::{CapsuleDimensions, CharacterMotor, ColliderId, TriggerInteraction};

/// Outcome of a stand-up attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandUpResult {
    /// Nothing to do: not crouched, or crouch still held.
    Unchanged,
    /// The standing capsule fit and was kept.
    StoodUp,
    /// The standing capsule overlapped something and was rolled back.
    Blocked,
}

/// Crouch flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrouchState {
    /// The player wants to be crouched.
    should_be_crouching: bool,

    /// The capsule is currently at crouched size.
    is_crouching: bool,

    /// Crouch button held this tick (swim descent).
    pub(crate) held: bool,
}

impl CrouchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_crouching(&self) -> bool {
        self.is_crouching
    }

    pub fn should_be_crouching(&self) -> bool {
        self.should_be_crouching
    }

    /// Apply the crouch button for this tick.
    ///
    /// Pressing crouch shrinks the capsule right away; releasing it only
    /// records the intent, the stand-up happens in [`resolve_stand_up`].
    ///
    /// [`resolve_stand_up`]: CrouchState::resolve_stand_up
    pub fn apply_input(&mut self, crouch_held: bool, motor: &mut dyn CharacterMotor, crouched: CapsuleDimensions) {
        if crouch_held {
            self.should_be_crouching = true;
            if !self.is_crouching {
                self.is_crouching = true;
                motor.set_capsule_dimensions(crouched);
            }
        } else {
            self.should_be_crouching = false;
        }
    }

    /// Try to stand back up after the motor has moved.
    ///
    /// # Arguments
    ///
    /// * `motor` - The character's motor
    /// * `standing` - Capsule to restore
    /// * `crouched` - Capsule to roll back to when blocked
    /// * `mask` - What blocks standing up
    /// * `buffer` - Scratch space for overlap results
    pub fn resolve_stand_up(
        &mut self,
        motor: &mut dyn CharacterMotor,
        standing: CapsuleDimensions,
        crouched: CapsuleDimensions,
        mask: ContentFlags,
        buffer: &mut Vec<ColliderId>,
    ) -> StandUpResult {
        if !self.is_crouching || self.should_be_crouching {
            return StandUpResult::Unchanged;
        }

        motor.set_capsule_dimensions(standing);
        buffer.clear();
        let hits = motor.overlap(
            motor.transient_position(),
            motor.transient_rotation(),
            buffer,
            mask,
            TriggerInteraction::Ignore,
        );

        if hits > 0 {
            debug!("stand-up blocked by {hits} collider(s), staying crouched");
            motor.set_capsule_dimensions(crouched);
            StandUpResult::Blocked
        } else {
            self.is_crouching = false;
            StandUpResult::StoodUp
        }
    }

    /// Drop both flags without touching the capsule.
    pub(crate) fn clear(&mut self) {
        self.should_be_crouching = false;
        self.is_crouching = false;
    }
}
