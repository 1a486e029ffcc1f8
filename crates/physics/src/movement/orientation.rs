//! Character facing and up-axis alignment.
//!
//! Runs in two passes. The look pass turns the forward axis toward the look
//! direction. The bonus pass then tilts the up axis toward world up, the
//! gravity up axis or the ground normal, depending on the configured
//! [`GravityOrientationMethod`]. Both passes use exponential smoothing.

use glam::{Quat, Vec3};

use super::config::GravityOrientationMethod;
use super::modes::Tick;
use crate::math::{from_to_rotation, look_rotation, slerp_direction, smoothing_factor, EPSILON_SQ};

/// Rotate `rotation` for one tick.
///
/// `look_sharpness` is the facing sharpness of the current state (swimming
/// turns slower than walking).
pub(crate) fn update_rotation(tick: &mut Tick<'_>, rotation: &mut Quat, look_sharpness: f32) {
    let dt = tick.delta_time;
    let look_input = tick.locomotion.look_input;

    if look_input.length_squared() > EPSILON_SQ && look_sharpness > 0.0 {
        let forward = tick.motor.character_forward();
        let smoothed = slerp_direction(forward, look_input, smoothing_factor(look_sharpness, dt));
        if let Some(facing) = look_rotation(smoothed, tick.motor.character_up()) {
            *rotation = facing;
        }
    }

    let blend = smoothing_factor(tick.config.bonus_orientation_sharpness, dt);
    let current_up = *rotation * Vec3::Y;
    let gravity_up = tick.locomotion.gravity.up;

    match tick.config.gravity_orientation_method {
        GravityOrientationMethod::None => {
            *rotation = tilt_up(*rotation, current_up, Vec3::Y, blend);
        }
        GravityOrientationMethod::TowardsGravity => {
            *rotation = tilt_up(*rotation, current_up, gravity_up, blend);
        }
        GravityOrientationMethod::TowardsGroundSlopeAndGravity => {
            let grounding = tick.motor.grounding_status();
            if grounding.is_stable_on_ground {
                // Pivot around the bottom hemisphere so the capsule does not
                // dig into the slope while it tilts.
                let radius = tick.motor.capsule().radius;
                let bottom_center = tick.motor.transient_position() + current_up * radius;

                *rotation = tilt_up(*rotation, current_up, grounding.ground_normal, blend);
                tick.motor
                    .set_transient_position(bottom_center + *rotation * Vec3::NEG_Y * radius);
            } else {
                *rotation = tilt_up(*rotation, current_up, gravity_up, blend);
            }
        }
    }
}

/// Blend the up axis of `rotation` from `current_up` toward `target_up`.
fn tilt_up(rotation: Quat, current_up: Vec3, target_up: Vec3, blend: f32) -> Quat {
    let smoothed_up = slerp_direction(current_up, target_up, blend);
    (from_to_rotation(current_up, smoothed_up) * rotation).normalize()
}
