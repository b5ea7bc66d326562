//! Carrom demo runner
//!
//! Plays one autoplay round through the fixed-step clock and logs every event.
//!
//! Usage: `carrom-demo [seed] [config.json]`

use carrom_engine::consts::BOARD_SIZE;
use carrom_engine::scores::{MemoryStore, ScoreKeeper};
use carrom_engine::sim::{Autoplayer, Engine, FixedStep, GameEvent, Layout, Phase};
use carrom_engine::{EngineConfig, EngineError};

/// Give up after this many host frames
const MAX_FRAMES: u32 = 200_000;

/// Simulated host frame times (seconds), cycled to mimic an uneven display rate
const FRAME_TIMES: [f32; 4] = [0.016, 0.017, 0.021, 0.012];

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345u64);
    let config = match args.next() {
        Some(path) => match EngineConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{}", err);
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    log::info!("Carrom demo starting (seed {})", seed);
    match play_round(config, seed) {
        Ok(events) => {
            let keeper = ScoreKeeper::new("demo");
            let mut store = MemoryStore::default();
            keeper.apply(&events, &mut store);
            match serde_json::to_string_pretty(&keeper.load(&store)) {
                Ok(json) => println!("{json}"),
                Err(err) => log::error!("Failed to encode totals: {}", err),
            }
        }
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    }
}

fn play_round(config: EngineConfig, seed: u64) -> Result<Vec<GameEvent>, Box<dyn std::error::Error>> {
    let layout = Layout::standard(
        carrom_engine::sim::Arena::new(BOARD_SIZE, BOARD_SIZE),
        config.disc_radius,
    );
    let mut engine = Engine::new(config, BOARD_SIZE, BOARD_SIZE, &layout)?;
    let mut player = Autoplayer::new(seed);
    let mut clock = FixedStep::default();
    let mut events = Vec::new();

    for frame in 0..MAX_FRAMES {
        match engine.phase() {
            Phase::Placing => {
                let Some((x, shot)) = player.plan(engine.state(), engine.config()) else {
                    break;
                };
                match engine.confirm_placement(x) {
                    Ok(()) => engine.commit_shot(shot.angle, shot.power)?,
                    // Planner picked a blocked spot; try again next frame
                    Err(err @ EngineError::InvalidPlacement(_)) => log::warn!("{}", err),
                    Err(err) => return Err(err.into()),
                }
                clock.reset();
            }
            Phase::RoundOver => break,
            _ => {
                let elapsed = FRAME_TIMES[frame as usize % FRAME_TIMES.len()];
                for snapshot in engine.advance(&mut clock, elapsed)? {
                    for event in &snapshot.events {
                        log::info!("tick {}: {:?}", snapshot.tick, event);
                    }
                    events.extend(snapshot.events);
                }
            }
        }
    }

    let scores = engine.scores();
    log::info!("Finished in {:?}: A={} B={}", engine.phase(), scores.a, scores.b);
    Ok(events)
}
