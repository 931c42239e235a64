//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Order within a
//! tick: deferred actions, input, motion, pruning, boss entry, spawning,
//! collisions, boss phases, effects, death sequence.

use glam::IVec2;

use super::boss::{BossEffect, BossTick};
use super::collision;
use super::difficulty::{roll_spawn, spawn_hazard};
use super::schedule::DeferredAction;
use super::state::{BossEncounter, GameEvent, GameState, RunPhase};
use crate::audio::SoundCue;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Resolved movement intent, each axis one of -10, 0, 10
    pub intent: IVec2,
    /// Fire pulse (edge-triggered by the host)
    pub fire: bool,
}

impl TickInput {
    /// Build from held directions
    pub fn from_keys(up: bool, down: bool, left: bool, right: bool, fire: bool) -> Self {
        let axis = |neg: bool, pos: bool| (pos as i32 - neg as i32) * SHIP_STEP;
        Self {
            intent: IVec2::new(axis(left, right), axis(up, down)),
            fire,
        }
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.is_halted() {
        return;
    }

    state.time_ticks += 1;

    apply_deferred(state);
    if state.is_halted() {
        return;
    }

    apply_input(state, input);
    advance_entities(state);
    prune_out_of_bounds(state);

    state.check_boss_entry();
    spawn_hazards(state);

    collision::resolve(state);

    step_boss(state);
    update_effects(state);
    step_death_sequence(state);

    // Ensure deterministic ordering
    state.normalize_order();
}

fn apply_deferred(state: &mut GameState) {
    for action in state.scheduler.drain_due(state.time_ticks) {
        match action {
            DeferredAction::RevertRadiusBoost => state.revert_radius_boost(),
            DeferredAction::AnnounceVictory => state.announce_victory(),
        }
    }
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    // Intent is frozen once dying
    if !state.is_alive() {
        return;
    }
    state.spaceship.steer(input.intent);
    if input.fire {
        state.try_fire();
    }
}

fn advance_entities(state: &mut GameState) {
    let (w, h) = (state.settings.playfield_width, state.settings.playfield_height);

    state.background_offset += BACKGROUND_SPEED;
    if state.background_offset >= state.settings.background_height {
        state.background_offset = 0;
    }

    state.spaceship.advance(w, h);
    for rocket in &mut state.projectiles {
        rocket.advance();
    }
    for hazard in &mut state.hazards {
        hazard.advance();
    }
    for pickup in &mut state.pickups {
        pickup.advance();
    }
}

fn prune_out_of_bounds(state: &mut GameState) {
    let (w, h) = (state.settings.playfield_width, state.settings.playfield_height);
    state.projectiles.retain(|p| !p.is_out_of_bounds(w, h));
    state.hazards.retain(|c| !c.is_out_of_bounds(w, h));
    state.pickups.retain(|p| !p.is_out_of_bounds(h));
}

fn spawn_hazards(state: &mut GameState) {
    let difficulty = state.difficulty();
    if !roll_spawn(state.rng(), difficulty) {
        return;
    }
    let (w, h) = (state.settings.playfield_width, state.settings.playfield_height);
    let id = state.next_entity_id();
    let hazard = spawn_hazard(state.rng(), difficulty, id, w, h);
    state.hazards.push(hazard);
}

fn step_boss(state: &mut GameState) {
    let BossEncounter::Active(boss) = state.boss else {
        return;
    };

    let frame = BossTick {
        target: state.spaceship.center(),
    };
    let mut effects = Vec::new();
    state.boss = BossEncounter::Active(boss.step(&frame, &mut effects));

    for effect in effects {
        match effect {
            BossEffect::Fire { origin, target } => state.fire_hostile(origin, target),
            BossEffect::Explosion(area) => state.spawn_effect(area),
            BossEffect::Sound(cue) => state.play(cue),
            BossEffect::Destroyed => state.resolve_boss(),
        }
    }
}

fn update_effects(state: &mut GameState) {
    for effect in &mut state.effects {
        effect.update();
    }
    state.effects.retain(|e| !e.is_finished());
}

/// Scripted player explosion: small blasts, a cue, one big blast, then game over
fn step_death_sequence(state: &mut GameState) {
    let RunPhase::Dying { countdown } = state.phase else {
        return;
    };
    let next = countdown.saturating_sub(1);

    if countdown > DEATH_BLAST_TICK && next % DEATH_DETONATION_EVERY == 0 {
        state.spawn_effect(state.spaceship.bounds());
    }
    if next == DEATH_CUE_TICK {
        state.play(SoundCue::PlayerDestroyed);
    }
    if next == DEATH_BLAST_TICK {
        state.spaceship.halt();
        state.spawn_effect(state.spaceship.bounds().scaled(3));
    }

    if next == 0 {
        state.phase = RunPhase::GameOver;
        state.emit(GameEvent::GameOver { score: state.score });
        log::info!("Game over at tick {}. Final score {}", state.time_ticks, state.score);
    } else {
        state.phase = RunPhase::Dying { countdown: next };
    }
}
