//! Collision detection and resolution
//!
//! Runs once per tick after motion and spawning. Removals are gathered by ID
//! and applied with `retain`, so an entity destroyed earlier in the pass is
//! simply skipped by later checks.

use glam::IVec2;

use super::entities::HazardRank;
use super::geometry::Rect;
use super::state::{BossEncounter, GameState};
use crate::audio::SoundCue;

/// One rocket's explosion and everything caught in it
#[derive(Debug, Clone)]
struct Detonation {
    area: Rect,
    friendly: bool,
    /// (id, last position, rank) of each caught hazard
    caught: Vec<(u32, IVec2, HazardRank)>,
}

/// Resolve every interaction for this tick
pub fn resolve(state: &mut GameState) {
    let mut spent = detonate_rockets(state);
    spent.extend(hit_weak_point(state, &spent));
    state.projectiles.retain(|p| !spent.contains(&p.id));

    check_player_hit(state);
    collect_pickups(state);
}

/// Rockets touching a hazard explode and destroy every hazard in the blast.
/// Returns the IDs of rockets that exploded.
fn detonate_rockets(state: &mut GameState) -> Vec<u32> {
    let mut spent = Vec::new();
    let mut destroyed: Vec<u32> = Vec::new();
    let mut detonations = Vec::new();

    for rocket in &state.projectiles {
        let bounds = rocket.bounds();
        let live = |id: &u32| !destroyed.contains(id);
        let touching = state
            .hazards
            .iter()
            .any(|h| live(&h.id) && bounds.intersects(&h.bounds()));
        if !touching {
            continue;
        }

        let area = rocket.explosion_area();
        let caught: Vec<_> = state
            .hazards
            .iter()
            .filter(|h| live(&h.id) && area.intersects(&h.bounds()))
            .map(|h| (h.id, h.pos, h.rank))
            .collect();
        if caught.is_empty() {
            continue;
        }

        spent.push(rocket.id);
        destroyed.extend(caught.iter().map(|(id, _, _)| *id));
        detonations.push(Detonation {
            area,
            friendly: rocket.is_friendly(),
            caught,
        });
    }

    for detonation in detonations {
        state.spawn_effect(detonation.area);
        state.play(SoundCue::HazardDestroyed);
        for (_, pos, rank) in &detonation.caught {
            state.roll_pickup_drop(*pos);
            if detonation.friendly {
                state.award(rank.points());
            }
        }
    }

    state.hazards.retain(|h| !destroyed.contains(&h.id));
    spent
}

/// Player rockets striking the open weak point. Returns the IDs of rockets used.
fn hit_weak_point(state: &mut GameState, spent: &[u32]) -> Vec<u32> {
    let BossEncounter::Active(boss) = &mut state.boss else {
        return Vec::new();
    };

    let mut used = Vec::new();
    let mut blasts = Vec::new();
    for rocket in state
        .projectiles
        .iter()
        .filter(|p| p.is_friendly() && !spent.contains(&p.id))
    {
        if boss.is_vulnerable()
            && rocket.bounds().intersects(&boss.weak_point())
            && boss.register_hit()
        {
            used.push(rocket.id);
            blasts.push(boss.weak_point());
            log::debug!("Boss hit, {} hp left", boss.hit_points);
        }
    }

    for area in blasts {
        state.spawn_effect(area);
        state.play(SoundCue::BossBlast);
    }
    used
}

/// Boss rockets or hazards touching the player start the death sequence
fn check_player_hit(state: &mut GameState) {
    if !state.is_alive() {
        return;
    }
    let ship = state.spaceship.bounds();

    let rocket = state
        .projectiles
        .iter()
        .find(|p| !p.is_friendly() && p.bounds().intersects(&ship))
        .map(|p| p.id);
    if let Some(id) = rocket {
        state.projectiles.retain(|p| p.id != id);
        state.begin_dying();
        return;
    }

    let hazard = state
        .hazards
        .iter()
        .find(|h| h.bounds().intersects(&ship))
        .map(|h| h.id);
    if let Some(id) = hazard {
        state.hazards.retain(|h| h.id != id);
        state.begin_dying();
    }
}

fn collect_pickups(state: &mut GameState) {
    let ship = state.spaceship.bounds();
    let collected: Vec<_> = state
        .pickups
        .iter()
        .filter(|p| p.bounds().intersects(&ship))
        .map(|p| (p.id, p.kind))
        .collect();
    if collected.is_empty() {
        return;
    }

    state.pickups.retain(|p| !collected.iter().any(|(id, _)| *id == p.id));
    for (_, kind) in collected {
        state.apply_pickup(kind);
    }
}
