//! Airborne movement and landing detection.

use glam::Vec3;
use log::debug;

use super::{
    apply_jump, apply_planar_inputs, integrate_air_velocity, update_jump_grace, LocomotionMode, Tick,
};
use crate::movement::input::PlayerCharacterInputs;
use crate::movement::state::CharacterState;

pub(crate) struct FallingMode;

impl FallingMode {
    /// Impact test: the previous vertical speed was above the hard-landing
    /// threshold and the current one is near zero.
    fn detect_hard_landing(tick: &mut Tick<'_>) -> bool {
        let config = tick.config;
        let vertical = tick.motor.velocity().dot(tick.motor.character_up());
        let previous = tick.locomotion.prev_vertical_velocity;

        let impact = previous.abs() >= config.hard_land_required_velocity
            && vertical.abs() <= config.hard_land_rest_speed;
        if impact {
            debug!("hard landing: vertical speed {previous:.2} -> {vertical:.2}");
            tick.locomotion.hard_landing = true;
        }
        impact
    }
}

impl LocomotionMode for FallingMode {
    fn on_enter(&self, tick: &mut Tick<'_>) {
        tick.motor.set_ground_solving_activation(true);
    }

    fn apply_inputs(&self, tick: &mut Tick<'_>, inputs: &PlayerCharacterInputs, frozen: bool) {
        apply_planar_inputs(tick, inputs, frozen);

        // Latched so a press just before touchdown fires on landing, and so
        // coyote-time jumps work right after walking off a ledge.
        if inputs.jump_down() {
            tick.locomotion.jump.request();
        }
    }

    fn compute_velocity(&self, tick: &mut Tick<'_>, velocity: &mut Vec3) {
        integrate_air_velocity(tick, velocity);
        apply_jump(tick, velocity);
    }

    fn before_update(&self, tick: &mut Tick<'_>) {
        Self::detect_hard_landing(tick);
    }

    fn after_update(&self, tick: &mut Tick<'_>) -> Option<CharacterState> {
        update_jump_grace(tick);

        if tick.motor.grounding_status().is_stable_on_ground {
            // The motor resolved the landing this tick; check the impact now
            // that the resolved velocity is known.
            Self::detect_hard_landing(tick);
            tick.locomotion.no_ground_time = 0.0;
            Some(CharacterState::Default)
        } else {
            tick.locomotion.no_ground_time += tick.delta_time;
            None
        }
    }
}
