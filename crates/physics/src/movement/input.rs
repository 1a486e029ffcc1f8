//! Per-tick player intent.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::math::{clamp_magnitude, look_rotation, project_on_plane};

/// Button state flags for character inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputButtons(pub u8);

impl InputButtons {
    /// Jump went down this tick (edge).
    pub const JUMP_DOWN: u8 = 1 << 0;

    /// Jump is held (level).
    pub const JUMP_HELD: u8 = 1 << 1;

    /// Sprint is held.
    pub const SPRINT: u8 = 1 << 2;

    /// Crouch is held.
    pub const CROUCH: u8 = 1 << 3;

    /// Check if a button is pressed.
    #[inline]
    pub fn pressed(self, button: u8) -> bool {
        (self.0 & button) != 0
    }

    /// Press a button.
    #[inline]
    pub fn press(&mut self, button: u8) {
        self.0 |= button;
    }

    /// Release a button.
    #[inline]
    pub fn release(&mut self, button: u8) {
        self.0 &= !button;
    }
}

/// What the player wants the character to do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerCharacterInputs {
    /// Forward/backward axis (-1.0 to 1.0). Positive = forward.
    pub move_axis_forward: f32,

    /// Strafe axis (-1.0 to 1.0). Positive = right.
    pub move_axis_right: f32,

    /// World-space camera orientation. Movement is relative to it.
    pub camera_rotation: Quat,

    /// Button states.
    pub buttons: InputButtons,
}

impl Default for PlayerCharacterInputs {
    fn default() -> Self {
        Self {
            move_axis_forward: 0.0,
            move_axis_right: 0.0,
            camera_rotation: Quat::IDENTITY,
            buttons: InputButtons::default(),
        }
    }
}

impl PlayerCharacterInputs {
    /// Check if jump was pressed this tick.
    #[inline]
    pub fn jump_down(&self) -> bool {
        self.buttons.pressed(InputButtons::JUMP_DOWN)
    }

    /// Check if jump is held.
    #[inline]
    pub fn jump_held(&self) -> bool {
        self.buttons.pressed(InputButtons::JUMP_HELD)
    }

    /// Check if sprint is requested.
    #[inline]
    pub fn wants_sprint(&self) -> bool {
        self.buttons.pressed(InputButtons::SPRINT)
    }

    /// Check if crouch is requested.
    #[inline]
    pub fn wants_crouch(&self) -> bool {
        self.buttons.pressed(InputButtons::CROUCH)
    }

    /// Local-space move vector `(right, 0, forward)`, clamped to length 1 so
    /// diagonals are not faster.
    pub fn move_vector(&self) -> Vec3 {
        let raw = Vec3::new(self.move_axis_right, 0.0, self.move_axis_forward);
        if !raw.is_finite() {
            return Vec3::ZERO;
        }
        clamp_magnitude(raw, 1.0)
    }

    /// Camera forward flattened onto the plane normal to `up`, and the
    /// rotation that faces it.
    ///
    /// When the camera looks straight along `up`, the camera's own up axis is
    /// flattened instead. Returns `(Vec3::ZERO, Quat::IDENTITY)` only if both
    /// are degenerate.
    pub fn camera_planar_frame(&self, up: Vec3) -> (Vec3, Quat) {
        let mut direction = project_on_plane(self.camera_rotation * Vec3::Z, up).normalize_or_zero();
        if direction == Vec3::ZERO {
            direction = project_on_plane(self.camera_rotation * Vec3::Y, up).normalize_or_zero();
        }
        let rotation = look_rotation(direction, up).unwrap_or(Quat::IDENTITY);
        (direction, rotation)
    }
}
