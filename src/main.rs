//! Flag Racer entry point
//!
//! Headless driver: loads a level, runs the simulation at a fixed step with a
//! simple autopilot and reports how the run went.

use std::path::PathBuf;

use clap::Parser;
use flag_racer::consts::SIM_DT;
use flag_racer::renderer;
use flag_racer::sim::{DriveInput, GameEvent, GameState, Level, PursuerMode, TickInput, tick};
use flag_racer::{Settings, heading_between, wrap_degrees};

/// Distance at which a chasing pursuer triggers a smoke drop (px)
const SMOKE_TRIGGER_DISTANCE: f32 = 120.0;

#[derive(Debug, Parser)]
#[command(name = "flag-racer", version, about = "Top-down maze racer, headless runner")]
struct Args {
    /// Level file; the built-in demo level is used when omitted
    level: Option<PathBuf>,
    /// Number of fixed simulation steps to run
    #[arg(long, default_value_t = 3600)]
    ticks: u64,
    /// RNG seed for the pursuers
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn load_level(path: Option<&PathBuf>, tile_size: u32) -> Option<Level> {
    if let Some(path) = path {
        match Level::load(path, tile_size) {
            Ok(level) => return Some(level),
            Err(e) => log::error!("{e}; falling back to the demo level"),
        }
    }
    match Level::demo(tile_size) {
        Ok(level) => Some(level),
        Err(e) => {
            log::error!("Demo level failed to load: {e}");
            None
        }
    }
}

/// Steer toward the nearest remaining flag, easing off for sharp turns
fn autopilot(state: &GameState) -> TickInput {
    let pos = state.player.pos();
    let target = state
        .flags
        .iter()
        .filter(|f| !f.taken)
        .map(|f| f.pos)
        .min_by(|a, b| a.distance_squared(pos).total_cmp(&b.distance_squared(pos)));

    let drive = match target {
        Some(target) => {
            let error = wrap_degrees(heading_between(pos, target) - state.player.heading());
            let throttle = if error.abs() < 45.0 { 1.0 } else { 0.4 };
            DriveInput::new(throttle, 0.0, error / 30.0)
        }
        None => DriveInput::new(0.0, 1.0, 0.0),
    };

    let threatened = state.pursuers.iter().any(|p| {
        p.mode() == PursuerMode::Chase && p.pos().distance(pos) < SMOKE_TRIGGER_DISTANCE
    });

    TickInput {
        drive,
        smoke: threatened && state.smoke_charges > 0,
        pause: false,
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    log::info!("Flag Racer (headless) starting...");

    let settings = match &args.settings {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let Some(level) = load_level(args.level.as_ref(), settings.tile_size) else {
        std::process::exit(1);
    };

    let mut state = GameState::new(level, &settings, args.seed);
    log::info!(
        "Map {}x{}, {} pursuers, {} flags",
        state.map.cols(),
        state.map.rows(),
        state.pursuers.len(),
        state.total_flags()
    );

    let mut last_phase = state.phase;
    for _ in 0..args.ticks {
        let input = autopilot(&state);
        for event in tick(&mut state, &input, SIM_DT) {
            match event {
                GameEvent::FlagCollected { remaining, .. } => {
                    log::debug!("Flag taken, {remaining} to go");
                }
                GameEvent::Captured { lives_left } => log::debug!("Caught, {lives_left} lives"),
                GameEvent::SmokeDeployed { blinded } => log::debug!("Smoke blinded {blinded}"),
                GameEvent::Won { .. } | GameEvent::Lost { .. } => {}
            }
        }

        if state.phase != last_phase {
            log::info!("Phase: {:?} -> {:?}", last_phase, state.phase);
            last_phase = state.phase;
        }
        if state.phase.is_terminal() {
            break;
        }
    }

    let vertices = renderer::frame(&state);
    let player = state.player.pos();
    log::debug!(
        "Final frame: {} vertices, player at ({:.1}, {:.1})",
        vertices.len(),
        player.x,
        player.y
    );

    println!(
        "{:?} after {} ticks. {}",
        state.phase,
        state.time_ticks,
        state.status_line()
    );
}
