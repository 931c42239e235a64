//! Game settings
//!
//! Loaded from JSON; every field has a default so partial files are fine.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::secs_to_ticks;
use crate::sim::AnimationSheet;

/// Which ruleset the run follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameVariant {
    /// Endless comets, escalating until the player dies
    Classic,
    /// Comets until the score floor, then the boss encounter
    #[default]
    Boss,
}

impl GameVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameVariant::Classic => "classic",
            GameVariant::Boss => "boss",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "endless" => Some(GameVariant::Classic),
            "boss" => Some(GameVariant::Boss),
            _ => None,
        }
    }

    /// Whether crossing the score floor starts a boss encounter
    pub fn has_boss(&self) -> bool {
        matches!(self, GameVariant::Boss)
    }
}

/// Errors from loading or validating settings
#[derive(Debug)]
pub enum SettingsError {
    Io { path: String, source: std::io::Error },
    Parse(serde_json::Error),
    TickRateZero,
    PlayfieldTooSmall { width: i32, height: i32 },
    EmptyAnimation,
    NonPositiveRadius(i32),
    NegativeDelay { field: &'static str, secs: f32 },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read settings '{path}': {source}"),
            Self::Parse(err) => write!(f, "invalid settings json: {err}"),
            Self::TickRateZero => write!(f, "tick_rate_hz must be > 0"),
            Self::PlayfieldTooSmall { width, height } => write!(
                f,
                "playfield {width}x{height} cannot hold a {SHIP_SIZE}x{SHIP_SIZE} spaceship"
            ),
            Self::EmptyAnimation => write!(f, "explosion animation needs at least one frame"),
            Self::NonPositiveRadius(radius) => {
                write!(f, "starting_explosion_radius must be > 0 (got {radius})")
            }
            Self::NegativeDelay { field, secs } => write!(f, "{field} must be >= 0 (got {secs})"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub variant: GameVariant,
    /// Ticks per second of the driving clock
    pub tick_rate_hz: u32,
    pub playfield_width: i32,
    pub playfield_height: i32,

    // === Player ===
    pub starting_rocket_capacity: u32,
    pub starting_explosion_radius: i32,
    /// How long a radius boost lasts before it is halved again
    pub radius_boost_secs: f32,

    // === Boss ===
    /// Full open/closed period
    pub boss_cycle_secs: f32,
    pub boss_fire_cooldown_secs: f32,
    /// Delay between the boss's destruction and the victory notification
    pub victory_delay_secs: f32,

    // === Presentation ===
    pub explosion_animation: AnimationSheet,
    /// Height of the scrolling background image
    pub background_height: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: GameVariant::default(),
            tick_rate_hz: TICK_RATE_HZ,
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            starting_rocket_capacity: STARTING_ROCKET_CAPACITY,
            starting_explosion_radius: STARTING_EXPLOSION_RADIUS,
            radius_boost_secs: 5.0,

            boss_cycle_secs: 10.0,
            boss_fire_cooldown_secs: 1.0,
            victory_delay_secs: 2.0,

            explosion_animation: AnimationSheet::default(),
            background_height: PLAYFIELD_HEIGHT,
        }
    }
}

impl Settings {
    /// Default settings for a variant
    pub fn for_variant(variant: GameVariant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json).map_err(SettingsError::Parse)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_rate_hz == 0 {
            return Err(SettingsError::TickRateZero);
        }
        if self.playfield_width < SHIP_SIZE || self.playfield_height < SHIP_SIZE {
            return Err(SettingsError::PlayfieldTooSmall {
                width: self.playfield_width,
                height: self.playfield_height,
            });
        }
        if self.explosion_animation.frame_count == 0 {
            return Err(SettingsError::EmptyAnimation);
        }
        if self.starting_explosion_radius <= 0 {
            return Err(SettingsError::NonPositiveRadius(
                self.starting_explosion_radius,
            ));
        }
        let delays = [
            ("radius_boost_secs", self.radius_boost_secs),
            ("boss_cycle_secs", self.boss_cycle_secs),
            ("boss_fire_cooldown_secs", self.boss_fire_cooldown_secs),
            ("victory_delay_secs", self.victory_delay_secs),
        ];
        if let Some((field, secs)) = delays
            .into_iter()
            .find(|(_, secs)| secs.is_nan() || *secs < 0.0)
        {
            return Err(SettingsError::NegativeDelay { field, secs });
        }
        Ok(())
    }

    /// Convert seconds to ticks at this run's tick rate
    pub fn ticks(&self, secs: f32) -> u64 {
        secs_to_ticks(secs, self.tick_rate_hz)
    }

    pub fn radius_boost_ticks(&self) -> u64 {
        self.ticks(self.radius_boost_secs)
    }

    pub fn victory_delay_ticks(&self) -> u64 {
        self.ticks(self.victory_delay_secs)
    }

    /// Boss cycle length in ticks (never zero)
    pub fn boss_cycle_ticks(&self) -> u32 {
        self.ticks(self.boss_cycle_secs).max(2) as u32
    }

    pub fn boss_fire_cooldown_ticks(&self) -> u32 {
        self.ticks(self.boss_fire_cooldown_secs).max(1) as u32
    }
}
