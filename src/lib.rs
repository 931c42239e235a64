//! Comet Strike - simulation core of a top-down comet shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, boss, game state)
//! - `renderer`: Draw-list construction for an external rasterizer
//! - `audio`: Sound cues and the audio collaborator seam
//! - `platform`: Fixed-timestep clock for the host
//! - `settings`: Data-driven configuration

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{GameVariant, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Default tick rate (one tick every 20 ms)
    pub const TICK_RATE_HZ: u32 = 50;
    /// Each tick advances explosion animations by this many milliseconds
    pub const ANIMATION_STEP_MS: u32 = 16;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: i32 = 800;
    pub const PLAYFIELD_HEIGHT: i32 = 600;

    /// Spaceship
    pub const SHIP_SIZE: i32 = 50;
    pub const SHIP_STEP: i32 = 10;
    /// Distance of the ship's top edge from the playfield bottom at start
    pub const SHIP_START_BOTTOM_OFFSET: i32 = 60;

    /// Projectiles
    pub const ROCKET_WIDTH: i32 = 15;
    pub const ROCKET_HEIGHT: i32 = 40;
    pub const ROCKET_SPEED: f32 = 10.0;
    pub const HOSTILE_ROCKET_SPEED: f32 = 8.0;
    /// Hostile projectiles may stray this far past any edge before pruning
    pub const HOSTILE_ROCKET_MARGIN: i32 = 40;
    pub const STARTING_ROCKET_CAPACITY: u32 = 2;
    pub const STARTING_EXPLOSION_RADIUS: i32 = 50;

    /// Hazards
    pub const HAZARD_MIN_SIZE: i32 = 60;
    pub const HAZARD_MAX_SIZE: i32 = 150;
    pub const HAZARD_SIDE_MARGIN: i32 = 10;
    /// Percent chance a spawned hazard is rare
    pub const RARE_HAZARD_PERCENT: u32 = 5;
    pub const COMMON_HAZARD_SCORE: u64 = 10;
    pub const RARE_HAZARD_SCORE: u64 = 50;

    /// Pickups
    pub const PICKUP_SIZE: i32 = 30;
    pub const PICKUP_FALL_SPEED: i32 = 3;
    pub const PICKUP_DROP_CHANCE: f64 = 0.3;

    /// Player death sequence (ticks)
    pub const DEATH_COUNTDOWN: u32 = 130;
    pub const DEATH_BLAST_TICK: u32 = 65;
    pub const DEATH_CUE_TICK: u32 = 85;
    pub const DEATH_DETONATION_EVERY: u32 = 4;
    /// Ship sprite stays hidden once the countdown drops to this value
    pub const DEATH_HIDE_SHIP_AT: u32 = 50;

    /// Boss encounter
    pub const BOSS_SCORE_THRESHOLD: u64 = 1500;
    pub const BOSS_VICTORY_BONUS: u64 = 500;
    pub const BOSS_WIDTH: i32 = 300;
    pub const BOSS_HEIGHT: i32 = 200;
    pub const BOSS_DESCENT_SPEED: i32 = 2;
    pub const BOSS_ALTITUDE: i32 = 20;
    pub const BOSS_HIT_POINTS: u32 = 1;
    /// Weak point rectangle, relative to the boss's top-left corner
    pub const BOSS_WEAK_POINT: (i32, i32, i32, i32) = (130, 150, 40, 30);
    pub const BOSS_DEATH_COUNTDOWN: u32 = 150;
    pub const BOSS_DEATH_BLAST_TICK: u32 = 65;
    pub const BOSS_DETONATION_EVERY: u32 = 15;
    pub const BOSS_DETONATION_SIZE: i32 = 100;

    /// Background scroll speed (pixels per tick)
    pub const BACKGROUND_SPEED: i32 = 2;
}

/// Convert a duration in seconds to a whole number of ticks at `tick_rate_hz`
#[inline]
pub fn secs_to_ticks(secs: f32, tick_rate_hz: u32) -> u64 {
    (secs.max(0.0) * tick_rate_hz as f32).round() as u64
}
