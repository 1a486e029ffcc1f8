//! Kinetic - headless demo.
//!
//! Runs a scripted walk through the test pool: a stroll, a jump, a crouch
//! under the low ceiling, a swim and a jump back out. Run with
//! `RUST_LOG=debug` to see every state transition.

use kinetic_game::{CharacterState, RawInput, Simulation};
use kinetic_physics::ConfigError;
use log::info;

/// One step of the demo script.
struct Segment {
    name: &'static str,
    ticks: u32,
    input: RawInput,
}

impl Segment {
    fn new(name: &'static str, ticks: u32, edit: impl FnOnce(&mut RawInput)) -> Self {
        let mut input = RawInput::default();
        edit(&mut input);
        Self { name, ticks, input }
    }
}

fn script() -> Vec<Segment> {
    vec![
        Segment::new("settle", 30, |_| {}),
        Segment::new("jump in place", 90, |input| input.actions.jump = true),
        Segment::new("crouch-walk under the slab", 66, |input| {
            input.movement.forward = true;
            input.actions.crouch = true;
        }),
        Segment::new("release crouch under the slab", 30, |_| {}),
        Segment::new("walk to the pool", 120, |input| input.movement.forward = true),
        Segment::new("swim to the far side", 300, |input| input.movement.forward = true),
        Segment::new("jump out", 60, |input| {
            input.movement.forward = true;
            input.actions.jump = true;
        }),
        Segment::new("sprint away", 120, |input| {
            input.movement.forward = true;
            input.actions.sprint = true;
        }),
    ]
}

fn main() -> Result<(), ConfigError> {
    env_logger::init();

    let mut simulation = Simulation::test();
    let player_id = simulation.add_player("Player1")?;

    let mut last_state = CharacterState::Default;
    for segment in script() {
        info!("-- {} ({} ticks)", segment.name, segment.ticks);

        for _ in 0..segment.ticks {
            simulation.tick(&[segment.input]);

            let Some(player) = simulation.get_player(player_id) else {
                continue;
            };
            if player.state() != last_state {
                info!(
                    "frame {}: {:?} -> {:?} at {:.2}",
                    simulation.frame,
                    last_state,
                    player.state(),
                    player.position()
                );
                last_state = player.state();
            }
        }

        if let Some(player) = simulation.get_player(player_id) {
            info!(
                "   position {:.2} speed {:.2} state {:?} crouching {} hard landings {}",
                player.position(),
                player.velocity().length(),
                player.state(),
                player.is_crouching(),
                player.hard_landings
            );
        }
    }

    info!("done after {} frames", simulation.frame);
    Ok(())
}
