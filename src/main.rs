//! Comet Strike headless host
//!
//! Drives the simulation with a fixed-timestep clock and a simple autopilot,
//! routes sound cues to a logging sink and builds a frame every tick. Useful
//! for soak runs and reproducing a seed.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glam::IVec2;
use serde::Serialize;

use comet_strike::audio::{AudioSink, LogAudio};
use comet_strike::consts::*;
use comet_strike::platform::FixedClock;
use comet_strike::renderer::build_frame;
use comet_strike::sim::{GameEvent, GameState, RunPhase, TickInput, tick};
use comet_strike::{GameVariant, Settings};

/// Host frame rate the clock is fed at
const HOST_FPS: f32 = 60.0;

#[derive(Parser, Debug)]
#[command(name = "comet-strike")]
#[command(about = "Run the comet shooter simulation headless under an autopilot")]
struct Cli {
    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,
    /// Game variant; overrides the config file
    #[arg(long, value_enum)]
    variant: Option<CliVariant>,
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Give up after this many ticks
    #[arg(long, default_value_t = 30_000)]
    max_ticks: u64,
    /// Print the run summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Debug-level logging (sound cues, pickups)
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
    /// Keep counting sound cues but stop logging them
    #[arg(long, default_value_t = false)]
    mute: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliVariant {
    Classic,
    Boss,
}

impl From<CliVariant> for GameVariant {
    fn from(value: CliVariant) -> Self {
        match value {
            CliVariant::Classic => GameVariant::Classic,
            CliVariant::Boss => GameVariant::Boss,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    GameOver,
    Victory,
    Timeout,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    variant: GameVariant,
    outcome: Outcome,
    score: u64,
    /// Difficulty tier the run ended in
    tier: usize,
    ticks: u64,
    frames: u64,
    sounds_played: u32,
    last_frame_commands: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(variant) = cli.variant {
        settings.variant = variant.into();
    }
    settings.validate().context("invalid settings")?;

    let seed = cli.seed.unwrap_or_else(time_seed);
    log::info!(
        "Comet Strike starting: variant={} seed={seed}",
        settings.variant.as_str()
    );

    let summary = run(settings, seed, cli.max_ticks, cli.mute);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("seed={}", summary.seed);
        println!("variant={}", summary.variant.as_str());
        println!("outcome={:?}", summary.outcome);
        println!("score={}", summary.score);
        println!("tier={}", summary.tier);
        println!("ticks={}", summary.ticks);
    }
    Ok(())
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn run(settings: Settings, seed: u64, max_ticks: u64, mute: bool) -> RunSummary {
    let variant = settings.variant;
    let mut clock = FixedClock::new(settings.tick_rate_hz);
    let mut state = GameState::new(settings, seed);
    let mut audio = LogAudio::new();
    audio.set_muted(mute);
    let mut outcome = Outcome::Timeout;
    let mut frames = 0u64;
    let mut last_frame_commands = 0;

    while clock.is_running() && state.time_ticks < max_ticks {
        frames += 1;
        for _ in 0..clock.advance(1.0 / HOST_FPS) {
            let input = autopilot(&state);
            tick(&mut state, &input);
            last_frame_commands = build_frame(&state).commands.len();

            for event in state.drain_events() {
                match event {
                    GameEvent::Sound(cue) => audio.play(cue),
                    GameEvent::GameOver { .. } => {
                        outcome = Outcome::GameOver;
                        clock.stop();
                    }
                    GameEvent::Victory { .. } => {
                        outcome = Outcome::Victory;
                        clock.stop();
                    }
                }
            }
            if !clock.is_running() {
                break;
            }
        }
    }

    if matches!(outcome, Outcome::Timeout) {
        log::warn!("Run hit the {max_ticks}-tick limit in phase {:?}", state.phase);
    }

    RunSummary {
        seed,
        variant,
        outcome,
        score: state.score,
        tier: state.tier(),
        ticks: state.time_ticks,
        frames,
        sounds_played: audio.total(),
        last_frame_commands,
    }
}

/// Line up under the lowest comet (or the boss weak point) and keep firing
fn autopilot(state: &GameState) -> TickInput {
    if state.phase != RunPhase::Alive {
        return TickInput::default();
    }
    let ship_x = state.spaceship.center().x;

    let target_x = state
        .boss
        .active()
        .filter(|b| b.is_alive())
        .map(|b| b.weak_point().center().x)
        .or_else(|| {
            state
                .hazards
                .iter()
                .max_by_key(|h| h.pos.y)
                .map(|h| h.bounds().center().x)
        });

    let dx = match target_x {
        Some(x) if x < ship_x - SHIP_STEP => -SHIP_STEP,
        Some(x) if x > ship_x + SHIP_STEP => SHIP_STEP,
        _ => 0,
    };
    TickInput {
        intent: IVec2::new(dx, 0),
        fire: true,
    }
}
