//! Game simulation - the fixed-timestep loop.
//!
//! The simulation owns the world's [`GravityField`]: a uniform world gravity
//! source is registered when the simulation starts and unregistered when it
//! is dropped. Other sources (planet volumes) come and go through
//! [`Simulation::add_gravity_source`] and [`Simulation::remove_gravity_source`].

use std::sync::Arc;

use glam::Vec3;
use kinetic_physics::gravity::SourceHandle;
use kinetic_physics::{CharacterConfig, ConfigError, GravityError, GravityField, UniformGravity};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::input::{InputMapper, RawInput};
use crate::level::Level;
use crate::player::{EntityId, Player};

/// Game simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Simulation tick rate (ticks per second).
    pub tick_rate: u32,

    /// Character movement configuration for new players.
    pub character: CharacterConfig,

    /// Acceleration of the world's uniform gravity source.
    pub world_gravity: Vec3,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            character: CharacterConfig::default(),
            world_gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

impl SimulationConfig {
    /// Get the time step per tick in seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

/// The main game simulation.
#[derive(Debug)]
pub struct Simulation {
    /// Current frame/tick number.
    pub frame: u64,

    /// Simulation configuration.
    pub config: SimulationConfig,

    /// Current level.
    pub level: Level,

    /// All players in the game.
    pub players: Vec<Player>,

    /// One input mapper per player, same order as `players`.
    mappers: Vec<InputMapper>,

    gravity: Arc<GravityField>,

    world_gravity: SourceHandle,

    /// Next entity ID to assign.
    next_entity_id: EntityId,
}

impl Simulation {
    /// Create a new simulation with the given configuration and level.
    pub fn new(config: SimulationConfig, level: Level) -> Self {
        let gravity = Arc::new(GravityField::new());
        let world_gravity: SourceHandle = Arc::new(UniformGravity::new(config.world_gravity));
        if let Err(err) = gravity.register(Arc::clone(&world_gravity)) {
            warn!("world gravity not registered: {err}");
        }
        info!(
            "simulation started on '{}' at {} Hz",
            level.name, config.tick_rate
        );

        Self {
            frame: 0,
            config,
            level,
            players: Vec::new(),
            mappers: Vec::new(),
            gravity,
            world_gravity,
            next_entity_id: 1,
        }
    }

    /// Create a simulation with default configuration and the test pool.
    pub fn test() -> Self {
        let (level, _) = Level::test_pool();
        Self::new(SimulationConfig::default(), level)
    }

    /// Add a player to the simulation.
    ///
    /// Returns the player's ID.
    pub fn add_player(&mut self, name: &str) -> Result<EntityId, ConfigError> {
        // Find a spawn point
        let spawn_index = self.players.len() % self.level.player_spawn_count().max(1);
        let spawn = self
            .level
            .get_player_spawn(spawn_index)
            .copied()
            .unwrap_or_default();

        let id = self.next_entity_id;
        let player = Player::new(
            id,
            name,
            spawn,
            Arc::clone(&self.level.collision),
            Arc::clone(&self.gravity),
            self.config.character.clone(),
        )?;
        self.next_entity_id += 1;

        debug!("player {id} '{name}' spawned at {}", spawn.position);
        self.players.push(player);
        self.mappers.push(InputMapper::new());
        Ok(id)
    }

    /// Remove a player from the simulation.
    pub fn remove_player(&mut self, player_id: EntityId) {
        if let Some(index) = self.players.iter().position(|p| p.id == player_id) {
            self.players.remove(index);
            self.mappers.remove(index);
        }
    }

    /// Get a player by ID.
    pub fn get_player(&self, player_id: EntityId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Get a mutable reference to a player by ID.
    pub fn get_player_mut(&mut self, player_id: EntityId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    /// The world's gravity field.
    pub fn gravity_field(&self) -> &Arc<GravityField> {
        &self.gravity
    }

    /// Activate an additional gravity source.
    pub fn add_gravity_source(&self, source: SourceHandle) -> Result<(), GravityError> {
        self.gravity.register(source)
    }

    /// Deactivate a gravity source.
    pub fn remove_gravity_source(&self, source: &SourceHandle) -> Result<(), GravityError> {
        self.gravity.unregister(source)
    }

    /// Advance the simulation by one tick.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Player inputs indexed by player position in the `players` array
    pub fn tick(&mut self, inputs: &[RawInput]) {
        let delta_time = self.config.delta_time();

        for (i, (player, mapper)) in self.players.iter_mut().zip(&mut self.mappers).enumerate() {
            // Get input for this player (default if not provided)
            let raw = inputs.get(i).copied().unwrap_or_default();
            let character_inputs = mapper.map(&raw);

            let before = player.state();
            player.tick(&character_inputs, delta_time);
            let after = player.state();
            if before != after {
                debug!("frame {}: player {} {before:?} -> {after:?}", self.frame, player.id);
            }
        }

        self.frame += 1;
    }

    /// Respawn a player at its spawn point.
    pub fn respawn(&mut self, player_id: EntityId) {
        if let Some(index) = self.players.iter().position(|p| p.id == player_id) {
            self.players[index].respawn();
            self.mappers[index].reset();
        }
    }

    /// Get the delta time for this simulation.
    pub fn delta_time(&self) -> f32 {
        self.config.delta_time()
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        if let Err(err) = self.gravity.unregister(&self.world_gravity) {
            warn!("world gravity already removed: {err}");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kinetic_physics::{CharacterState, PlanetGravity};

    fn walking_forward() -> RawInput {
        let mut input = RawInput::default();
        input.movement.forward = true;
        input
    }

    fn run(sim: &mut Simulation, input: RawInput, ticks: usize) {
        for _ in 0..ticks {
            sim.tick(&[input]);
        }
    }

    #[test]
    fn test_simulation_creation() {
        let sim = Simulation::test();
        assert_eq!(sim.frame, 0);
        assert!(sim.players.is_empty());
        assert_eq!(sim.gravity_field().len(), 1);
    }

    #[test]
    fn test_add_player() {
        let mut sim = Simulation::test();

        let id = sim.add_player("Player1").unwrap();
        assert!(id > 0);
        assert_eq!(sim.players.len(), 1);

        let player = sim.get_player(id).unwrap();
        assert_eq!(player.name, "Player1");
        assert!(player.on_ground());
    }

    #[test]
    fn test_add_player_rejects_bad_config() {
        let (level, _) = Level::test_pool();
        let config = SimulationConfig {
            character: CharacterConfig {
                drag: -1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut sim = Simulation::new(config, level);
        assert!(sim.add_player("Test").is_err());
        assert!(sim.players.is_empty());
    }

    #[test]
    fn test_remove_player() {
        let mut sim = Simulation::test();
        let first = sim.add_player("A").unwrap();
        let second = sim.add_player("B").unwrap();

        sim.remove_player(first);
        assert!(sim.get_player(first).is_none());
        assert!(sim.get_player(second).is_some());

        sim.tick(&[walking_forward()]);
        assert_eq!(sim.frame, 1);
    }

    #[test]
    fn test_tick_advances_frame() {
        let mut sim = Simulation::test();
        sim.add_player("Test").unwrap();

        sim.tick(&[RawInput::default()]);
        assert_eq!(sim.frame, 1);

        sim.tick(&[]);
        assert_eq!(sim.frame, 2);
    }

    #[test]
    fn test_movement_input() {
        let mut sim = Simulation::test();
        let id = sim.add_player("Test").unwrap();
        let start = sim.get_player(id).unwrap().position();

        run(&mut sim, walking_forward(), 30);

        let end = sim.get_player(id).unwrap().position();
        let distance = (end - start).length();
        assert!(distance > 1.0, "Player should have moved, distance={distance}");
    }

    #[test]
    fn test_jump_and_land() {
        let mut sim = Simulation::test();
        let id = sim.add_player("Test").unwrap();
        run(&mut sim, RawInput::default(), 5);

        let mut jump = RawInput::default();
        jump.actions.jump = true;
        // Held for several ticks: only the first one is a press
        let mut peak: f32 = 0.0;
        for _ in 0..20 {
            sim.tick(&[jump]);
            peak = peak.max(sim.get_player(id).unwrap().position().y);
        }
        assert_eq!(sim.get_player(id).unwrap().state(), CharacterState::Falling);

        for _ in 0..120 {
            sim.tick(&[RawInput::default()]);
            peak = peak.max(sim.get_player(id).unwrap().position().y);
        }

        // v²/2g with jump speed 10
        assert!(peak > 4.0 && peak < 5.2, "peak {peak}");
        let player = sim.get_player(id).unwrap();
        assert_eq!(player.state(), CharacterState::Default);
        assert!(player.on_ground());
    }

    #[test]
    fn test_crouch_under_ceiling() {
        let mut sim = Simulation::test();
        let id = sim.add_player("Test").unwrap();

        let mut crouch_walk = walking_forward();
        crouch_walk.actions.crouch = true;
        run(&mut sim, crouch_walk, 66);
        run(&mut sim, RawInput::default(), 30);

        // Under the slab with crouch released: still crouched
        let player = sim.get_player(id).unwrap();
        let z = player.position().z;
        assert!(z > 4.0 && z < 6.0, "z {z}");
        assert!(player.is_crouching());
        assert_eq!(player.capsule(), sim.config.character.crouched_capsule);

        // Walk out from under it and stand up
        run(&mut sim, walking_forward(), 30);
        let player = sim.get_player(id).unwrap();
        assert!(player.position().z > 6.5);
        assert_eq!(player.state(), CharacterState::Default);
        assert!(!player.is_crouching());
        assert_eq!(player.capsule().height, 1.8);
    }

    #[test]
    fn test_swim_across_pool() {
        let mut sim = Simulation::test();
        let id = sim.add_player("Test").unwrap();

        let mut entered_pool = false;
        for _ in 0..240 {
            sim.tick(&[walking_forward()]);
            let player = sim.get_player(id).unwrap();
            if player.state() == CharacterState::Swimming {
                entered_pool = true;
                assert!(!player.motor().is_ground_solving());
                break;
            }
        }
        assert!(entered_pool);

        // The water volume's far side holds the swimmer in
        run(&mut sim, walking_forward(), 600);
        let player = sim.get_player(id).unwrap();
        assert_eq!(player.state(), CharacterState::Swimming);
        assert!(player.position().z <= 20.0 + 1e-3);
        assert!(player.position().z > 19.0);

        // Jumping gets out
        let mut jump_forward = walking_forward();
        jump_forward.actions.jump = true;
        let left_pool = (0..120).any(|_| {
            sim.tick(&[jump_forward]);
            sim.get_player(id).unwrap().state() == CharacterState::Falling
        });
        assert!(left_pool);
    }

    #[test]
    fn test_planet_source_changes_gravity() {
        let mut sim = Simulation::test();
        let id = sim.add_player("Test").unwrap();

        let planet: SourceHandle = Arc::new(PlanetGravity::new(Vec3::new(0.0, 0.0, 100.0), 20.0, 500.0));
        sim.add_gravity_source(Arc::clone(&planet)).unwrap();
        assert_eq!(sim.add_gravity_source(Arc::clone(&planet)), Err(GravityError::DuplicateSource));

        sim.tick(&[RawInput::default()]);
        let gravity = sim.get_player(id).unwrap().controller().gravity().gravity;
        assert!(gravity.z > 19.0, "planet pull toward +Z, got {gravity}");

        sim.remove_gravity_source(&planet).unwrap();
        sim.tick(&[RawInput::default()]);
        let gravity = sim.get_player(id).unwrap().controller().gravity().gravity;
        assert!((gravity - Vec3::new(0.0, -9.81, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_respawn_resets_player() {
        let mut sim = Simulation::test();
        let id = sim.add_player("Test").unwrap();
        run(&mut sim, walking_forward(), 30);

        sim.respawn(id);
        let player = sim.get_player(id).unwrap();
        assert!(player.position().z.abs() < 1e-3);
        assert_eq!(player.state(), CharacterState::Default);
    }

    #[test]
    fn test_drop_unregisters_world_gravity() {
        let sim = Simulation::test();
        let field = Arc::clone(sim.gravity_field());
        assert_eq!(field.len(), 1);
        drop(sim);
        assert!(field.is_empty());
    }

    #[test]
    fn test_determinism() {
        // Run simulation twice with same inputs - should get same results
        let inputs: Vec<_> = (0..200)
            .map(|i| {
                let mut input = walking_forward();
                input.movement.right = i % 3 == 0;
                input.actions.jump = i % 40 < 3;
                input.actions.crouch = i % 50 > 40;
                input.camera_yaw = i as f32 * 0.01;
                input
            })
            .collect();

        let mut sim1 = Simulation::test();
        sim1.add_player("Test").unwrap();
        for input in &inputs {
            sim1.tick(&[*input]);
        }

        let mut sim2 = Simulation::test();
        sim2.add_player("Test").unwrap();
        for input in &inputs {
            sim2.tick(&[*input]);
        }

        let pos1 = sim1.get_player(1).unwrap().position();
        let pos2 = sim2.get_player(1).unwrap().position();
        assert_eq!(pos1, pos2, "Simulations should be deterministic");
    }
}
