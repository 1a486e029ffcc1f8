//! Jump state management.
//!
//! A jump press is latched as a request. The request is honored while the
//! character is somewhere it can jump from, or while the post-grounding grace
//! window is still open after leaving the ground. An unconsumed request
//! expires once the pre-grounding grace window has passed, so a press made
//! just before landing still fires on touchdown.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::motor::GroundingStatus;

/// Jump latch and grace timers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpState {
    /// A jump is wanted and has not fired yet.
    requested: bool,

    /// A jump fired and the character has not been able to jump since.
    consumed: bool,

    /// A jump fired during the current tick.
    jumped_this_frame: bool,

    /// Seconds since the last request was latched.
    time_since_requested: f32,

    /// Seconds since the character last stood somewhere it could jump from.
    time_since_last_able: f32,

    /// Jump button held this tick (swim ascent).
    pub(crate) held: bool,
}

impl Default for JumpState {
    fn default() -> Self {
        Self {
            requested: false,
            consumed: false,
            jumped_this_frame: false,
            time_since_requested: f32::INFINITY,
            time_since_last_able: 0.0,
            held: false,
        }
    }
}

impl JumpState {
    /// Create a new jump state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch a jump press.
    pub fn request(&mut self) {
        self.requested = true;
        self.time_since_requested = 0.0;
    }

    /// Overwrite the request with a continuous signal (swimming uses the held
    /// button instead of the press edge).
    pub fn set_requested(&mut self, requested: bool) {
        self.requested = requested;
    }

    pub fn is_requested(&self) -> bool {
        self.requested
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub fn jumped_this_frame(&self) -> bool {
        self.jumped_this_frame
    }

    pub fn time_since_last_able(&self) -> f32 {
        self.time_since_last_able
    }

    /// Advance the request timer at the start of a velocity update.
    pub fn begin_frame(&mut self, delta_time: f32) {
        self.jumped_this_frame = false;
        self.time_since_requested += delta_time;
    }

    /// Consume the latched request if a jump is allowed right now.
    ///
    /// # Arguments
    ///
    /// * `grounding` - The motor's current grounding report
    /// * `up` - Character up axis
    /// * `allow_sliding` - Whether unstable ground counts as jumpable
    /// * `post_grace` - Post-grounding grace window (seconds)
    ///
    /// # Returns
    ///
    /// The jump direction: the ground normal when standing on ground too
    /// steep to stand on, the character up axis otherwise.
    pub fn try_jump(
        &mut self,
        grounding: &GroundingStatus,
        up: Vec3,
        allow_sliding: bool,
        post_grace: f32,
    ) -> Option<Vec3> {
        if !self.requested || self.consumed {
            return None;
        }

        let can_jump_now = grounding.can_jump_from(allow_sliding);
        if !can_jump_now && self.time_since_last_able > post_grace {
            return None;
        }

        let direction = if grounding.is_sliding() {
            grounding.ground_normal
        } else {
            up
        };

        self.requested = false;
        self.consumed = true;
        self.jumped_this_frame = true;
        Some(direction)
    }

    /// Post-update bookkeeping: expire stale requests and track grace time.
    pub fn after_update(
        &mut self,
        grounding: &GroundingStatus,
        allow_sliding: bool,
        pre_grace: f32,
        delta_time: f32,
    ) {
        if self.requested && self.time_since_requested > pre_grace {
            self.requested = false;
        }

        if grounding.can_jump_from(allow_sliding) {
            // A jump that fired this tick has not left the ground yet.
            if !self.jumped_this_frame {
                self.consumed = false;
            }
            self.time_since_last_able = 0.0;
        } else {
            self.time_since_last_able += delta_time;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn ground() -> GroundingStatus {
        GroundingStatus::stable(Vec3::Y)
    }

    fn air() -> GroundingStatus {
        GroundingStatus::airborne()
    }

    // Helper running one velocity + post-update pass
    fn tick(state: &mut JumpState, grounding: GroundingStatus, post_grace: f32) -> Option<Vec3> {
        state.begin_frame(DT);
        let jumped = state.try_jump(&grounding, Vec3::Y, false, post_grace);
        state.after_update(&grounding, false, 0.0, DT);
        jumped
    }

    #[test]
    fn test_basic_jump() {
        let mut state = JumpState::new();

        state.request();
        let direction = tick(&mut state, ground(), 0.0);
        assert_eq!(direction, Some(Vec3::Y));
        assert!(state.is_consumed());
        assert!(state.jumped_this_frame());
        assert!(!state.is_requested());
    }

    #[test]
    fn test_no_request_no_jump() {
        let mut state = JumpState::new();
        assert_eq!(tick(&mut state, ground(), 0.0), None);
    }

    #[test]
    fn test_consumed_until_grounded_again() {
        let mut state = JumpState::new();
        state.request();
        tick(&mut state, ground(), 0.0);

        // Airborne: a new press cannot fire
        tick(&mut state, air(), 0.0);
        state.request();
        assert_eq!(tick(&mut state, air(), 0.0), None);

        // Landing clears the consumed latch
        tick(&mut state, ground(), 0.0);
        assert!(!state.is_consumed());
        state.request();
        assert_eq!(tick(&mut state, ground(), 0.0), Some(Vec3::Y));
    }

    #[test]
    fn test_request_expires_without_grace() {
        let mut state = JumpState::new();
        state.request();
        tick(&mut state, air(), 0.0);
        assert!(!state.is_requested());
    }

    #[test]
    fn test_pre_grounding_grace_buffers_press() {
        let mut state = JumpState::new();
        let pre_grace = 0.2;

        // Fall for a while, press jump shortly before landing
        for _ in 0..10 {
            state.begin_frame(DT);
            state.after_update(&air(), false, pre_grace, DT);
        }
        state.request();
        for _ in 0..3 {
            state.begin_frame(DT);
            assert_eq!(state.try_jump(&air(), Vec3::Y, false, 0.0), None);
            state.after_update(&air(), false, pre_grace, DT);
        }
        assert!(state.is_requested());

        state.begin_frame(DT);
        assert_eq!(state.try_jump(&ground(), Vec3::Y, false, 0.0), Some(Vec3::Y));
    }

    #[test]
    fn test_post_grounding_grace() {
        let grace = 0.2;
        let steps = (grace / DT) as usize;

        // Half the window: still allowed
        let mut state = JumpState::new();
        tick(&mut state, ground(), grace);
        for _ in 0..steps / 2 {
            tick(&mut state, air(), grace);
        }
        state.request();
        state.begin_frame(DT);
        assert!(state.try_jump(&air(), Vec3::Y, false, grace).is_some());

        // Twice the window: refused
        let mut state = JumpState::new();
        tick(&mut state, ground(), grace);
        for _ in 0..steps * 2 {
            tick(&mut state, air(), grace);
        }
        state.request();
        state.begin_frame(DT);
        assert!(state.try_jump(&air(), Vec3::Y, false, grace).is_none());
    }

    #[test]
    fn test_sliding_jump_uses_ground_normal() {
        let slope = Vec3::new(1.0, 1.0, 0.0).normalize();
        let sliding = GroundingStatus::sliding(slope);
        let mut state = JumpState::new();

        // Not allowed off a slide unless enabled
        state.request();
        state.begin_frame(DT);
        assert_eq!(state.try_jump(&sliding, Vec3::Y, false, 0.0), None);

        state.begin_frame(DT);
        assert_eq!(state.try_jump(&sliding, Vec3::Y, true, 0.0), Some(slope));
    }

    #[test]
    fn test_jump_frame_keeps_consumed() {
        let mut state = JumpState::new();
        state.request();
        state.begin_frame(DT);
        state.try_jump(&ground(), Vec3::Y, false, 0.0);

        // Still grounded in the same tick's post-update
        state.after_update(&ground(), false, 0.0, DT);
        assert!(state.is_consumed());
    }
}
