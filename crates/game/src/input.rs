//! Player input handling.
//!
//! This module converts raw per-frame input (keys and camera angles) into
//! [`PlayerCharacterInputs`] for the character controller.

use glam::Quat;
use kinetic_physics::{InputButtons, PlayerCharacterInputs};
use serde::{Deserialize, Serialize};

/// Raw player input for a single frame.
///
/// This is the input format received from the client input system.
/// It gets converted to [`PlayerCharacterInputs`] by an [`InputMapper`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RawInput {
    /// Movement keys pressed.
    pub movement: MovementInput,

    /// Camera yaw around world up (radians, 0 looks down +Z).
    pub camera_yaw: f32,

    /// Camera pitch (radians, positive looks up).
    pub camera_pitch: f32,

    /// Action buttons pressed.
    pub actions: ActionInput,
}

/// Movement key states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Action button states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActionInput {
    pub jump: bool,
    pub crouch: bool,
    pub sprint: bool,
}

impl RawInput {
    /// Check if any movement input is active.
    pub fn has_movement(&self) -> bool {
        self.movement.forward || self.movement.backward || self.movement.left || self.movement.right
    }

    /// Camera orientation: yaw around world up, then pitch.
    pub fn camera_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.camera_yaw) * Quat::from_rotation_x(-self.camera_pitch)
    }
}

/// Turns raw input into controller inputs, one frame at a time.
///
/// Keeps the previous jump button so a press is reported on exactly one
/// frame.
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    jump_was_held: bool,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert this frame's raw input.
    pub fn map(&mut self, input: &RawInput) -> PlayerCharacterInputs {
        let mut forward = 0.0;
        let mut right = 0.0;

        if input.movement.forward {
            forward += 1.0;
        }
        if input.movement.backward {
            forward -= 1.0;
        }
        if input.movement.right {
            right += 1.0;
        }
        if input.movement.left {
            right -= 1.0;
        }

        // Normalize diagonal movement
        let magnitude = f32::hypot(forward, right);
        if magnitude > 1.0 {
            forward /= magnitude;
            right /= magnitude;
        }

        let mut buttons = InputButtons::default();
        if input.actions.jump {
            buttons.press(InputButtons::JUMP_HELD);
            if !self.jump_was_held {
                buttons.press(InputButtons::JUMP_DOWN);
            }
        }
        if input.actions.crouch {
            buttons.press(InputButtons::CROUCH);
        }
        if input.actions.sprint {
            buttons.press(InputButtons::SPRINT);
        }
        self.jump_was_held = input.actions.jump;

        PlayerCharacterInputs {
            move_axis_forward: forward,
            move_axis_right: right,
            camera_rotation: input.camera_rotation(),
            buttons,
        }
    }

    /// Forget the previous frame (respawn).
    pub fn reset(&mut self) {
        self.jump_was_held = false;
    }
}
