//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod animation;
pub mod boss;
pub mod collision;
pub mod difficulty;
pub mod entities;
pub mod geometry;
pub mod schedule;
pub mod state;
pub mod tick;

pub use animation::{Animation, AnimationSheet};
pub use boss::{Boss, BossEffect, BossStage};
pub use difficulty::{Difficulty, difficulty_for, tier_index};
pub use entities::{
    Hazard, HazardRank, Owner, Pickup, PickupKind, Projectile, Spaceship, VisualEffect,
};
pub use geometry::Rect;
pub use schedule::{DeferredAction, Scheduler};
pub use state::{BossEncounter, GameEvent, GameState, RunPhase};
pub use tick::{TickInput, tick};
