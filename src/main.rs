//! Headless demo runner
//!
//! Loads a level (a JSON file if given, else the built-in arena), drives the
//! first player with a canned thrust-and-turn script and steps the world at
//! a fixed 60 Hz for a few simulated seconds, logging player state once per
//! second. Useful for eyeballing the physics without a renderer.

use bumper_arena::{Level, PlayerInput, World, level};

const DT: f32 = 1.0 / 60.0;
const RUN_SECONDS: f32 = 10.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let level = match std::env::args().nth(1) {
        Some(path) => {
            let data = std::fs::read_to_string(&path)?;
            let level: Level = serde_json::from_str(&data)?;
            log::info!("loaded level from {path}");
            level
        }
        None => level::arena(),
    };

    let mut world = World::load(&level)?;
    let driver = world.players().next().map(|p| p.id);

    let steps = (RUN_SECONDS / DT) as u32;
    for frame in 0..steps {
        let t = frame as f32 * DT;
        if let Some(id) = driver {
            // Thrust for the first half, then swing right while coasting.
            let input = if t < RUN_SECONDS / 2.0 {
                PlayerInput { x_axis: 0, y_axis: 1 }
            } else {
                PlayerInput { x_axis: 1, y_axis: 0 }
            };
            world.set_player_input(id, input);
        }
        world.step(DT)?;

        if frame % 60 == 0 {
            for player in world.players() {
                log::info!(
                    "t={:>4.1}s player {}: pos=({:6.2}, {:6.2}) speed={:5.2} damage={:5.1}",
                    t,
                    player.id,
                    player.pos.x,
                    player.pos.y,
                    player.speed(),
                    player.damage().unwrap_or(0.0),
                );
            }
        }
    }

    println!("simulated {RUN_SECONDS}s: {} bodies remain", world.bodies().len());
    Ok(())
}
