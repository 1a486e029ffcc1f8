//! Per-state locomotion behavior.
//!
//! Each [`CharacterState`] maps to a unit struct implementing
//! [`LocomotionMode`]. The controller selects the mode with an exhaustive
//! match and hands it a [`Tick`] borrowing everything a tick may touch.
//! Behavior shared between states (air control, jumping, facing) lives here
//! as free functions.

mod default;
mod falling;
mod swimming;

pub(crate) use default::DefaultMode;
pub(crate) use falling::FallingMode;
pub(crate) use swimming::{is_contained, swim_reference_point, SwimmingMode};

use glam::{Quat, Vec3};
use log::debug;

use super::config::{CharacterConfig, OrientationMethod};
use super::input::PlayerCharacterInputs;
use super::orientation;
use super::state::{CharacterState, LocomotionState};
use crate::math::{project_on_plane, project_onto};
use crate::motor::{CapsuleDimensions, CharacterMotor, ColliderId};

/// Everything a mode may read or mutate during one controller call.
pub(crate) struct Tick<'a> {
    pub config: &'a CharacterConfig,
    pub locomotion: &'a mut LocomotionState,
    pub motor: &'a mut dyn CharacterMotor,
    /// Capsule the motor had when the controller was built.
    pub standing_capsule: CapsuleDimensions,
    /// Scratch space for overlap queries.
    pub probe_buffer: &'a mut Vec<ColliderId>,
    pub delta_time: f32,
}

/// Behavior of one locomotion state.
pub(crate) trait LocomotionMode {
    /// Entry effects, run once per transition into this state.
    fn on_enter(&self, tick: &mut Tick<'_>);

    /// Interpret this tick's inputs. `frozen` is set while the hard-landing
    /// lockout suppresses movement input.
    fn apply_inputs(&self, tick: &mut Tick<'_>, inputs: &PlayerCharacterInputs, frozen: bool);

    fn compute_velocity(&self, tick: &mut Tick<'_>, velocity: &mut Vec3);

    fn compute_rotation(&self, tick: &mut Tick<'_>, rotation: &mut Quat) {
        let sharpness = tick.config.orientation_sharpness;
        orientation::update_rotation(tick, rotation, sharpness);
    }

    /// State-specific pre-update, after the shared submersion test.
    fn before_update(&self, _tick: &mut Tick<'_>) {}

    /// State-specific post-update. Returns the state to transition to.
    fn after_update(&self, tick: &mut Tick<'_>) -> Option<CharacterState>;
}

impl CharacterState {
    pub(crate) fn mode(self) -> &'static dyn LocomotionMode {
        match self {
            CharacterState::Default => &DefaultMode,
            CharacterState::Falling => &FallingMode,
            CharacterState::Swimming => &SwimmingMode,
        }
    }
}

/// Direction to face for the configured orientation method.
pub(crate) fn look_direction(method: OrientationMethod, camera_planar: Vec3, move_input: Vec3) -> Vec3 {
    match method {
        OrientationMethod::TowardsCamera => camera_planar,
        OrientationMethod::TowardsMovement => move_input.normalize_or_zero(),
    }
}

/// Camera-plane move and look vectors, shared by Default and Falling.
pub(crate) fn apply_planar_inputs(tick: &mut Tick<'_>, inputs: &PlayerCharacterInputs, frozen: bool) {
    let up = tick.motor.character_up();
    let (planar_direction, planar_rotation) = inputs.camera_planar_frame(up);

    let locomotion = &mut *tick.locomotion;
    locomotion.move_input = if frozen {
        Vec3::ZERO
    } else {
        planar_rotation * inputs.move_vector()
    };
    locomotion.look_input = look_direction(tick.config.orientation_method, planar_direction, locomotion.move_input);
}

/// Air control, gravity and drag.
pub(crate) fn integrate_air_velocity(tick: &mut Tick<'_>, velocity: &mut Vec3) {
    let config = tick.config;
    let dt = tick.delta_time;
    let gravity = tick.locomotion.gravity.gravity;
    let move_input = tick.locomotion.move_input;

    if move_input.length_squared() > 0.0 {
        let mut target = move_input * config.air_move_speed;

        // Do not let air control climb ground too steep to stand on.
        let grounding = tick.motor.grounding_status();
        if grounding.found_any_ground {
            let up = tick.motor.character_up();
            let obstruction = up.cross(grounding.ground_normal).cross(up).normalize_or_zero();
            target = project_on_plane(target, obstruction);
        }

        let deficit = project_on_plane(target - *velocity, gravity);
        *velocity += deficit * (config.air_acceleration * dt);
    }

    *velocity += gravity * dt;
    *velocity *= 1.0 / (1.0 + config.drag * dt);
}

/// Fire a latched jump if it is allowed this tick.
pub(crate) fn apply_jump(tick: &mut Tick<'_>, velocity: &mut Vec3) {
    let config = tick.config;
    let grounding = tick.motor.grounding_status();
    let up = tick.motor.character_up();

    let jump = &mut tick.locomotion.jump;
    jump.begin_frame(tick.delta_time);
    let Some(direction) = jump.try_jump(
        &grounding,
        up,
        config.allow_jumping_when_sliding,
        config.jump_post_grounding_grace_time,
    ) else {
        return;
    };

    tick.motor.force_unground(config.jump_unground_duration);
    *velocity += direction * config.jump_speed - project_onto(*velocity, up);
    debug!("jump along {direction}");
}

/// Jump request expiry and grace accounting, shared by Default and Falling.
pub(crate) fn update_jump_grace(tick: &mut Tick<'_>) {
    let grounding = tick.motor.grounding_status();
    tick.locomotion.jump.after_update(
        &grounding,
        tick.config.allow_jumping_when_sliding,
        tick.config.jump_pre_grounding_grace_time,
        tick.delta_time,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::GroundingStatus;
    use crate::movement::test_support::ScriptedMotor;

    const DT: f32 = 1.0 / 60.0;

    fn with_tick<R>(
        config: &CharacterConfig,
        locomotion: &mut LocomotionState,
        motor: &mut ScriptedMotor,
        f: impl FnOnce(&mut Tick<'_>) -> R,
    ) -> R {
        let mut buffer = Vec::new();
        let mut tick = Tick {
            config,
            locomotion,
            motor,
            standing_capsule: CapsuleDimensions::default(),
            probe_buffer: &mut buffer,
            delta_time: DT,
        };
        f(&mut tick)
    }

    #[test]
    fn test_air_velocity_applies_gravity_and_drag() {
        let config = CharacterConfig::default();
        let mut locomotion = LocomotionState::new(10.0);
        locomotion.gravity.gravity = Vec3::new(0.0, -30.0, 0.0);
        let mut motor = ScriptedMotor::airborne();

        let mut velocity = Vec3::ZERO;
        with_tick(&config, &mut locomotion, &mut motor, |tick| {
            integrate_air_velocity(tick, &mut velocity)
        });

        let expected = -30.0 * DT / (1.0 + config.drag * DT);
        assert!((velocity.y - expected).abs() < 1e-5);
        assert_eq!(velocity.x, 0.0);
    }

    #[test]
    fn test_air_control_ignores_gravity_axis() {
        let config = CharacterConfig {
            drag: 0.0,
            ..Default::default()
        };
        let mut locomotion = LocomotionState::new(10.0);
        locomotion.move_input = Vec3::Z;
        let mut motor = ScriptedMotor::airborne();
        locomotion.gravity.gravity = Vec3::new(0.0, -10.0, 0.0);

        let mut velocity = Vec3::new(0.0, -5.0, 0.0);
        with_tick(&config, &mut locomotion, &mut motor, |tick| {
            integrate_air_velocity(tick, &mut velocity)
        });

        // Forward deficit closed by air_acceleration * dt, vertical only gravity
        assert!((velocity.z - 10.0 * 5.0 * DT).abs() < 1e-4);
        assert!((velocity.y - (-5.0 - 10.0 * DT)).abs() < 1e-4);
    }

    #[test]
    fn test_air_control_cannot_climb_steep_slope() {
        let config = CharacterConfig {
            drag: 0.0,
            ..Default::default()
        };
        let mut locomotion = LocomotionState::new(10.0);
        // Steep wall facing -Z, input pushes into it
        locomotion.move_input = Vec3::Z;
        let mut motor = ScriptedMotor::airborne();
        motor.grounding = GroundingStatus::sliding(Vec3::new(0.0, 0.3, -1.0).normalize());

        let mut velocity = Vec3::ZERO;
        with_tick(&config, &mut locomotion, &mut motor, |tick| {
            integrate_air_velocity(tick, &mut velocity)
        });
        assert!(velocity.z.abs() < 1e-5, "got {velocity:?}");
    }

    #[test]
    fn test_jump_replaces_vertical_velocity() {
        let config = CharacterConfig::default();
        let mut locomotion = LocomotionState::new(10.0);
        locomotion.jump.request();
        let mut motor = ScriptedMotor::grounded();

        let mut velocity = Vec3::new(3.0, -2.0, 0.0);
        with_tick(&config, &mut locomotion, &mut motor, |tick| apply_jump(tick, &mut velocity));

        assert!((velocity.y - config.jump_speed).abs() < 1e-5);
        assert!((velocity.x - 3.0).abs() < 1e-5);
        assert_eq!(motor.unground_time, config.jump_unground_duration);
        assert!(locomotion.jump.jumped_this_frame());
    }

    #[test]
    fn test_look_direction() {
        let camera = Vec3::X;
        let moving = Vec3::new(0.0, 0.0, 0.5);
        assert_eq!(look_direction(OrientationMethod::TowardsCamera, camera, moving), camera);
        assert_eq!(look_direction(OrientationMethod::TowardsMovement, camera, moving), Vec3::Z);
        assert_eq!(look_direction(OrientationMethod::TowardsMovement, camera, Vec3::ZERO), Vec3::ZERO);
    }
}
