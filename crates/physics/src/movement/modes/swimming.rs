//! Submerged movement.
//!
//! Swimming ignores gravity. Jump and crouch held steer up and down, and the
//! velocity is kept from carrying the swim reference point out of the water
//! unless the player is jumping out.

use glam::{Quat, Vec3};

use super::{look_direction, LocomotionMode, Tick};
use crate::math::{project_on_plane, project_onto, smoothing_factor};
use crate::motor::CharacterMotor;
use crate::movement::config::CharacterConfig;
use crate::movement::input::PlayerCharacterInputs;
use crate::movement::orientation;
use crate::movement::state::CharacterState;

/// Squared distance under which a point counts as its own closest point.
pub(crate) const CONTAINMENT_TOLERANCE_SQ: f32 = 1.0e-8;

pub(crate) struct SwimmingMode;

/// World position of the point tested for submersion.
pub(crate) fn swim_reference_point(config: &CharacterConfig, motor: &dyn CharacterMotor) -> Vec3 {
    motor.transient_position() + motor.transient_rotation() * config.swim_reference_offset
}

/// Whether `point` is inside a volume, given its closest point on that volume.
#[inline]
pub(crate) fn is_contained(closest: Vec3, point: Vec3) -> bool {
    closest.distance_squared(point) <= CONTAINMENT_TOLERANCE_SQ
}

impl LocomotionMode for SwimmingMode {
    fn on_enter(&self, tick: &mut Tick<'_>) {
        tick.locomotion.crouch.clear();
        tick.motor.set_capsule_dimensions(tick.standing_capsule);
        tick.motor.set_ground_solving_activation(false);
    }

    fn apply_inputs(&self, tick: &mut Tick<'_>, inputs: &PlayerCharacterInputs, frozen: bool) {
        tick.locomotion.jump.set_requested(inputs.jump_held());

        let up = tick.motor.character_up();
        let (planar_direction, _) = inputs.camera_planar_frame(up);

        let locomotion = &mut *tick.locomotion;
        // Full camera rotation: pitching the camera steers the swim.
        locomotion.move_input = if frozen {
            Vec3::ZERO
        } else {
            inputs.camera_rotation * inputs.move_vector()
        };
        locomotion.look_input = look_direction(tick.config.orientation_method, planar_direction, locomotion.move_input);
    }

    fn compute_velocity(&self, tick: &mut Tick<'_>, velocity: &mut Vec3) {
        let config = tick.config;
        let dt = tick.delta_time;
        let up = tick.motor.character_up();
        let locomotion = &*tick.locomotion;

        let vertical_input = match (locomotion.jump.held, locomotion.crouch.held) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };
        let target = (locomotion.move_input + up * vertical_input).normalize_or_zero() * config.swimming_speed;
        let mut smoothed = velocity.lerp(target, smoothing_factor(config.swimming_movement_sharpness, dt));

        if let Some(zone) = locomotion.water_zone {
            let predicted = swim_reference_point(config, &*tick.motor) + smoothed * dt;
            if let Some(closest) = tick.motor.closest_point(zone, predicted) {
                if !is_contained(closest, predicted) {
                    let surface_normal = (predicted - closest).normalize_or_zero();
                    smoothed = project_on_plane(smoothed, surface_normal);

                    if locomotion.jump.is_requested() {
                        smoothed += up * config.jump_speed - project_onto(smoothed, up);
                    }
                }
            }
        }

        *velocity = smoothed;
    }

    fn compute_rotation(&self, tick: &mut Tick<'_>, rotation: &mut Quat) {
        let sharpness = tick.config.swimming_orientation_sharpness;
        orientation::update_rotation(tick, rotation, sharpness);
    }

    fn after_update(&self, _tick: &mut Tick<'_>) -> Option<CharacterState> {
        None
    }
}
