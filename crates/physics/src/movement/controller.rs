//! Character movement controller.
//!
//! This is the main entry point for character movement. The host calls it
//! once per fixed tick in this order:
//!
//! 1. [`set_inputs`](CharacterController::set_inputs)
//! 2. [`before_update`](CharacterController::before_update)
//! 3. [`compute_velocity`](CharacterController::compute_velocity)
//! 4. [`compute_rotation`](CharacterController::compute_rotation)
//! 5. the motor resolves collisions for the proposed velocity and rotation
//! 6. [`after_update`](CharacterController::after_update)
//!
//! The controller never stores its motor; every call borrows it.

use std::sync::Arc;

use glam::{Quat, Vec3};
use log::debug;

use super::config::{CharacterConfig, GravityOrientationMethod, OrientationMethod};
use super::input::PlayerCharacterInputs;
use super::modes::{is_contained, swim_reference_point, Tick};
use super::state::{CharacterState, LocomotionState};
use crate::error::ConfigError;
use crate::gravity::{GravityField, GravitySample};
use crate::motor::{CapsuleDimensions, CharacterMotor, ColliderId, TriggerInteraction};

/// Overlap results expected per probe.
const PROBE_CAPACITY: usize = 8;

/// Character state machine.
///
/// Owns the locomotion state (Default / Falling / Swimming), interprets
/// inputs, integrates velocity and rotation and manages the crouch capsule.
///
/// # Example
///
/// ```ignore
/// let field = Arc::new(GravityField::new());
/// let mut controller = CharacterController::new(CharacterConfig::default(), field, &mut motor)?;
///
/// // Each tick:
/// controller.set_inputs(&mut motor, &inputs, dt);
/// controller.before_update(&mut motor, dt);
/// controller.compute_velocity(&mut motor, &mut velocity, dt);
/// controller.compute_rotation(&mut motor, &mut rotation, dt);
/// motor.step(velocity, rotation, dt);
/// controller.after_update(&mut motor, dt);
/// ```
#[derive(Debug)]
pub struct CharacterController {
    config: CharacterConfig,
    gravity: Arc<GravityField>,
    state: CharacterState,
    locomotion: LocomotionState,
    /// Capsule the motor had at construction; restored when standing up.
    standing_capsule: CapsuleDimensions,
    probe_buffer: Vec<ColliderId>,
}

impl CharacterController {
    /// Create a controller for the character driven by `motor`.
    ///
    /// The motor's current capsule is taken as the standing capsule. Fails if
    /// the configuration is invalid or the crouched capsule is not shorter
    /// than the standing one.
    pub fn new(
        config: CharacterConfig,
        gravity: Arc<GravityField>,
        motor: &mut dyn CharacterMotor,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let standing_capsule = motor.capsule();
        if standing_capsule.height <= config.crouched_capsule.height {
            return Err(ConfigError::CrouchNotShorter {
                crouched: config.crouched_capsule.height,
                standing: standing_capsule.height,
            });
        }

        let mut locomotion = LocomotionState::new(config.stable_move_speed);
        locomotion.gravity = gravity.sample(motor.transient_position(), motor.character_up());

        let mut controller = Self {
            config,
            gravity,
            state: CharacterState::Default,
            locomotion,
            standing_capsule,
            probe_buffer: Vec::with_capacity(PROBE_CAPACITY),
        };
        controller.enter_state(CharacterState::Default, motor);
        Ok(controller)
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Interpret this tick's inputs. Must run before the velocity and
    /// rotation updates.
    pub fn set_inputs(&mut self, motor: &mut dyn CharacterMotor, inputs: &PlayerCharacterInputs, delta_time: f32) {
        self.locomotion.jump.held = inputs.jump_held();
        self.locomotion.crouch.held = inputs.wants_crouch();
        let frozen = self
            .locomotion
            .advance_freeze(delta_time, self.config.freeze_on_hard_land);

        let state = self.state;
        let mut tick = self.tick(motor, delta_time);
        state.mode().apply_inputs(&mut tick, inputs, frozen);
    }

    /// Pre-update: sample gravity, run the submersion test and the current
    /// state's pre-update hook.
    pub fn before_update(&mut self, motor: &mut dyn CharacterMotor, delta_time: f32) {
        self.locomotion.gravity = self
            .gravity
            .sample(motor.transient_position(), motor.character_up());
        self.locomotion.hard_landing = false;

        self.update_submersion(motor);

        let vertical = motor.velocity().dot(motor.character_up());
        let state = self.state;
        {
            let mut tick = self.tick(motor, delta_time);
            state.mode().before_update(&mut tick);
        }
        self.locomotion.prev_vertical_velocity = vertical;
    }

    /// Compute the velocity the motor should try to move with this tick.
    pub fn compute_velocity(&mut self, motor: &mut dyn CharacterMotor, velocity: &mut Vec3, delta_time: f32) {
        let state = self.state;
        {
            let mut tick = self.tick(motor, delta_time);
            state.mode().compute_velocity(&mut tick, velocity);
        }

        let added = std::mem::take(&mut self.locomotion.pending_velocity);
        *velocity += added;
    }

    /// Compute the rotation the motor should end the tick with.
    pub fn compute_rotation(&mut self, motor: &mut dyn CharacterMotor, rotation: &mut Quat, delta_time: f32) {
        let state = self.state;
        let mut tick = self.tick(motor, delta_time);
        state.mode().compute_rotation(&mut tick, rotation);
    }

    /// Post-update: state bookkeeping after the motor resolved the move.
    pub fn after_update(&mut self, motor: &mut dyn CharacterMotor, delta_time: f32) {
        let state = self.state;
        let next = {
            let mut tick = self.tick(motor, delta_time);
            state.mode().after_update(&mut tick)
        };
        if let Some(next) = next {
            self.transition_to(next, motor);
        }

        // Falling can come out of any state but Swimming.
        let grounded = motor.grounding_status().is_stable_on_ground;
        if !grounded && !matches!(self.state, CharacterState::Swimming | CharacterState::Falling) {
            self.transition_to(CharacterState::Falling, motor);
        }
    }

    // ========================================================================
    // State Management
    // ========================================================================

    /// Switch state and run the new state's entry effects.
    pub fn transition_to(&mut self, new_state: CharacterState, motor: &mut dyn CharacterMotor) {
        debug!("character state {:?} -> {:?}", self.state, new_state);
        self.state = new_state;
        self.enter_state(new_state, motor);
    }

    fn enter_state(&mut self, state: CharacterState, motor: &mut dyn CharacterMotor) {
        let mut tick = self.tick(motor, 0.0);
        state.mode().on_enter(&mut tick);
    }

    /// Enter or leave Swimming depending on whether the swim reference point
    /// is inside a water volume.
    fn update_submersion(&mut self, motor: &mut dyn CharacterMotor) {
        self.probe_buffer.clear();
        motor.overlap(
            motor.transient_position(),
            motor.transient_rotation(),
            &mut self.probe_buffer,
            self.config.water_mask,
            TriggerInteraction::Collide,
        );

        let reference = swim_reference_point(&self.config, &*motor);
        let submerged_in = self.probe_buffer.iter().copied().find(|&zone| {
            motor
                .closest_point(zone, reference)
                .is_some_and(|closest| is_contained(closest, reference))
        });

        match submerged_in {
            Some(zone) => {
                self.locomotion.water_zone = Some(zone);
                if self.state != CharacterState::Swimming {
                    self.transition_to(CharacterState::Swimming, motor);
                }
            }
            None => {
                self.locomotion.water_zone = None;
                if self.state == CharacterState::Swimming {
                    self.transition_to(CharacterState::Default, motor);
                }
            }
        }
    }

    fn tick<'a>(&'a mut self, motor: &'a mut dyn CharacterMotor, delta_time: f32) -> Tick<'a> {
        Tick {
            config: &self.config,
            locomotion: &mut self.locomotion,
            motor,
            standing_capsule: self.standing_capsule,
            probe_buffer: &mut self.probe_buffer,
            delta_time,
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Add an impulse on top of the next computed velocity.
    pub fn add_velocity(&mut self, velocity: Vec3) {
        self.locomotion.pending_velocity += velocity;
    }

    /// Start the movement lockout countdown.
    ///
    /// Input is only locked while `freeze_on_hard_land` is enabled; the
    /// countdown runs either way.
    pub fn freeze(&mut self, duration: f32) {
        self.locomotion.freeze_remaining = duration.max(0.0);
    }

    /// Reset every timer and latch, restore the standing capsule and return
    /// to Default (respawn, teleport).
    pub fn reset(&mut self, motor: &mut dyn CharacterMotor) {
        self.locomotion.reset(self.config.stable_move_speed);
        self.locomotion.gravity = self
            .gravity
            .sample(motor.transient_position(), motor.character_up());
        motor.set_capsule_dimensions(self.standing_capsule);
        self.transition_to(CharacterState::Default, motor);
    }

    pub fn set_orientation_method(&mut self, method: OrientationMethod) {
        self.config.orientation_method = method;
    }

    /// Slope and planet volumes switch this at runtime.
    pub fn set_gravity_orientation_method(&mut self, method: GravityOrientationMethod) {
        self.config.gravity_orientation_method = method;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn state(&self) -> CharacterState {
        self.state
    }

    pub fn is_crouching(&self) -> bool {
        self.locomotion.crouch.is_crouching()
    }

    /// An impact was detected in this tick's update.
    pub fn is_hard_landing(&self) -> bool {
        self.locomotion.hard_landing
    }

    /// Seconds spent falling since the character was last stable.
    pub fn no_ground_time(&self) -> f32 {
        self.locomotion.no_ground_time
    }

    /// Gravity sampled at the last pre-update.
    pub fn gravity(&self) -> GravitySample {
        self.locomotion.gravity
    }

    pub fn is_jumping_this_frame(&self) -> bool {
        self.locomotion.jump.jumped_this_frame()
    }

    pub fn config(&self) -> &CharacterConfig {
        &self.config
    }

    pub fn locomotion(&self) -> &LocomotionState {
        &self.locomotion
    }

    pub fn standing_capsule(&self) -> CapsuleDimensions {
        self.standing_capsule
    }
}

// ============================================================================
// Tests
// ============================================================================
