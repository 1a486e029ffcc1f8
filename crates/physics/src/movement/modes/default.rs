//! Grounded movement.

use glam::Vec3;

use super::{
    apply_jump, apply_planar_inputs, integrate_air_velocity, update_jump_grace, LocomotionMode, Tick,
};
use crate::math::smoothing_factor;
use crate::movement::input::PlayerCharacterInputs;
use crate::movement::state::CharacterState;

pub(crate) struct DefaultMode;

impl LocomotionMode for DefaultMode {
    fn on_enter(&self, tick: &mut Tick<'_>) {
        tick.motor.set_ground_solving_activation(true);
    }

    fn apply_inputs(&self, tick: &mut Tick<'_>, inputs: &PlayerCharacterInputs, frozen: bool) {
        apply_planar_inputs(tick, inputs, frozen);

        if inputs.jump_down() {
            tick.locomotion.jump.request();
        }

        let crouched = tick.config.crouched_capsule;
        tick.locomotion
            .crouch
            .apply_input(inputs.wants_crouch(), &mut *tick.motor, crouched);

        tick.locomotion.ground_speed = tick
            .config
            .ground_speed(inputs.wants_sprint() && !inputs.wants_crouch());
    }

    fn compute_velocity(&self, tick: &mut Tick<'_>, velocity: &mut Vec3) {
        let grounding = tick.motor.grounding_status();

        if grounding.is_stable_on_ground {
            let config = tick.config;
            let up = tick.motor.character_up();
            let move_input = tick.locomotion.move_input;

            // Reorient the input onto the ground plane, keeping its length.
            let input_right = move_input.cross(up);
            let tangent = grounding.ground_normal.cross(input_right).normalize_or_zero() * move_input.length();

            let mut speed = tick.locomotion.ground_speed;
            if tick.locomotion.crouch.is_crouching() {
                speed *= config.crouch_speed_multiplier;
            }

            let target = tangent * speed;
            *velocity = velocity.lerp(
                target,
                smoothing_factor(config.stable_movement_sharpness, tick.delta_time),
            );
        } else {
            integrate_air_velocity(tick, velocity);
        }

        apply_jump(tick, velocity);
    }

    fn after_update(&self, tick: &mut Tick<'_>) -> Option<CharacterState> {
        update_jump_grace(tick);

        let standing = tick.standing_capsule;
        let crouched = tick.config.crouched_capsule;
        let mask = tick.config.collidable_mask;
        tick.locomotion.crouch.resolve_stand_up(
            &mut *tick.motor,
            standing,
            crouched,
            mask,
            &mut *tick.probe_buffer,
        );

        None
    }
}
