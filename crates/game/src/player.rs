//! Player entity: a character controller driving a reference motor.

use std::sync::Arc;

use glam::{Quat, Vec3};
use kinetic_physics::{
    CapsuleDimensions, CharacterConfig, CharacterController, CharacterMotor, CharacterState, CollisionWorld,
    ConfigError, GravityField, PlayerCharacterInputs,
};
use log::debug;

use crate::level::SpawnPoint;
use crate::motor::SimpleMotor;

/// Unique identifier for entities.
pub type EntityId = u32;

/// A player in the game.
#[derive(Debug)]
pub struct Player {
    /// Unique player ID.
    pub id: EntityId,

    /// Player name/handle.
    pub name: String,

    /// Where the player respawns.
    pub spawn: SpawnPoint,

    /// Hard landings so far.
    pub hard_landings: u32,

    controller: CharacterController,
    motor: SimpleMotor,
}

impl Player {
    /// Create a new player standing at `spawn`.
    pub fn new(
        id: EntityId,
        name: &str,
        spawn: SpawnPoint,
        world: Arc<CollisionWorld>,
        gravity: Arc<GravityField>,
        config: CharacterConfig,
    ) -> Result<Self, ConfigError> {
        let mut motor = SimpleMotor::new(world, spawn.position, spawn.rotation(), CapsuleDimensions::default());
        let controller = CharacterController::new(config, gravity, &mut motor)?;

        Ok(Self {
            id,
            name: name.to_string(),
            spawn,
            hard_landings: 0,
            controller,
            motor,
        })
    }

    /// Advance the player by one fixed tick.
    pub fn tick(&mut self, inputs: &PlayerCharacterInputs, delta_time: f32) {
        let controller = &mut self.controller;
        let motor = &mut self.motor;

        controller.set_inputs(motor, inputs, delta_time);
        controller.before_update(motor, delta_time);

        let mut velocity = motor.velocity();
        controller.compute_velocity(motor, &mut velocity, delta_time);
        let mut rotation = motor.transient_rotation();
        controller.compute_rotation(motor, &mut rotation, delta_time);

        motor.step(velocity, rotation, delta_time);
        controller.after_update(motor, delta_time);

        if controller.is_hard_landing() {
            self.hard_landings += 1;
            let config = controller.config();
            if config.freeze_on_hard_land {
                debug!("player {} frozen for {:.2}s", self.id, config.freeze_time);
                let freeze_time = config.freeze_time;
                controller.freeze(freeze_time);
            }
        }
    }

    /// Put the player back at its spawn point with fresh locomotion state.
    pub fn respawn(&mut self) {
        self.motor.teleport(self.spawn.position, self.spawn.rotation());
        self.controller.reset(&mut self.motor);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Get the player's current position (feet).
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.motor.position()
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        self.motor.rotation()
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.motor.velocity()
    }

    #[inline]
    pub fn state(&self) -> CharacterState {
        self.controller.state()
    }

    /// Check if the player is standing on stable ground.
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.motor.grounding_status().is_stable_on_ground
    }

    #[inline]
    pub fn is_crouching(&self) -> bool {
        self.controller.is_crouching()
    }

    pub fn capsule(&self) -> CapsuleDimensions {
        self.motor.capsule()
    }

    pub fn controller(&self) -> &CharacterController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut CharacterController {
        &mut self.controller
    }

    pub fn motor(&self) -> &SimpleMotor {
        &self.motor
    }
}
