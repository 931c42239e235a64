//! Game state and run-level rules
//!
//! The orchestrator owns every entity collection here; nothing outside the
//! simulation holds references into them between ticks.

use std::sync::Arc;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::animation::{Animation, AnimationSheet};
use super::boss::Boss;
use super::difficulty::{Difficulty, difficulty_for, tier_index};
use super::entities::{Hazard, Pickup, PickupKind, Projectile, Spaceship, VisualEffect};
use super::geometry::Rect;
use super::schedule::{DeferredAction, Scheduler};
use crate::audio::SoundCue;
use crate::consts::*;
use crate::settings::Settings;

/// Where the run is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Accepting input
    Alive,
    /// Player hit; scripted explosion countdown running
    Dying { countdown: u32 },
    /// Death sequence finished; halted
    GameOver,
    /// Boss defeated and announced; halted
    Victory,
}

/// Boss encounter progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossEncounter {
    /// Score has not reached the threshold yet
    Pending,
    Active(Boss),
    /// Boss destroyed; never re-enters
    Defeated,
}

impl BossEncounter {
    pub fn active(&self) -> Option<&Boss> {
        match self {
            BossEncounter::Active(boss) => Some(boss),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, BossEncounter::Defeated)
    }
}

/// Outbound notifications produced during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Sound(SoundCue),
    /// Death sequence finished; stop the clock
    GameOver { score: u64 },
    /// Boss defeated and announced; stop the clock
    Victory { score: u64 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Only ever increases
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: RunPhase,
    pub spaceship: Spaceship,
    /// Active rockets (sorted by id)
    pub projectiles: Vec<Projectile>,
    /// Active comets (sorted by id)
    pub hazards: Vec<Hazard>,
    /// Active pickups (sorted by id)
    pub pickups: Vec<Pickup>,
    /// Explosions, in spawn order
    pub effects: Vec<VisualEffect>,
    pub boss: BossEncounter,
    /// Maximum concurrent player rockets
    pub rocket_capacity: u32,
    /// Radius given to newly fired rockets
    pub explosion_radius: i32,
    /// Vertical scroll of the background image
    pub background_offset: i32,
    pub scheduler: Scheduler,
    events: Vec<GameEvent>,
    explosion_sheet: Arc<AnimationSheet>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(settings: Settings, seed: u64) -> Self {
        let spaceship = Spaceship::new(settings.playfield_width, settings.playfield_height);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            time_ticks: 0,
            phase: RunPhase::Alive,
            spaceship,
            projectiles: Vec::new(),
            hazards: Vec::new(),
            pickups: Vec::new(),
            effects: Vec::new(),
            boss: BossEncounter::Pending,
            rocket_capacity: settings.starting_rocket_capacity,
            explosion_radius: settings.starting_explosion_radius,
            background_offset: 0,
            scheduler: Scheduler::new(),
            events: Vec::new(),
            explosion_sheet: Arc::new(settings.explosion_animation.clone()),
            next_id: 1,
            settings,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// The run's single random source
    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.phase, RunPhase::GameOver | RunPhase::Victory)
    }

    pub fn is_alive(&self) -> bool {
        self.phase == RunPhase::Alive
    }

    /// Current spawn parameters, derived from score
    pub fn difficulty(&self) -> Difficulty {
        difficulty_for(self.settings.variant, self.score)
    }

    pub fn tier(&self) -> usize {
        tier_index(self.settings.variant, self.score)
    }

    /// Add points. Until the boss is beaten (boss variant), the score is
    /// pinned at the boss threshold.
    pub fn award(&mut self, points: u64) {
        let mut next = self.score.saturating_add(points);
        if self.settings.variant.has_boss() && !self.boss.is_resolved() {
            next = next.min(BOSS_SCORE_THRESHOLD.max(self.score));
        }
        self.score = next;
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn play(&mut self, cue: SoundCue) {
        self.emit(GameEvent::Sound(cue));
    }

    /// Take this tick's events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start an explosion animation covering `area`
    pub fn spawn_effect(&mut self, area: Rect) {
        let animation = Animation::new(Arc::clone(&self.explosion_sheet));
        self.effects.push(VisualEffect::new(area, animation));
    }

    pub fn friendly_rockets(&self) -> usize {
        self.projectiles.iter().filter(|p| p.is_friendly()).count()
    }

    /// Fire a player rocket if under capacity. Returns whether it launched.
    pub fn try_fire(&mut self) -> bool {
        if !self.is_alive() || self.friendly_rockets() >= self.rocket_capacity as usize {
            return false;
        }
        let id = self.next_entity_id();
        let rocket = Projectile::friendly(id, self.spaceship.muzzle(), self.explosion_radius);
        self.projectiles.push(rocket);
        self.play(SoundCue::Shoot);
        true
    }

    /// Launch a boss rocket
    pub fn fire_hostile(&mut self, origin: IVec2, target: IVec2) {
        let id = self.next_entity_id();
        self.projectiles.push(Projectile::hostile(
            id,
            origin,
            target,
            self.settings.starting_explosion_radius,
        ));
    }

    /// Maybe drop a pickup where a destroyed hazard was
    pub fn roll_pickup_drop(&mut self, at: IVec2) {
        if !self.rng.random_bool(PICKUP_DROP_CHANCE) {
            return;
        }
        let kind = if self.rng.random_bool(0.5) {
            PickupKind::ExtraRocket
        } else {
            PickupKind::RadiusBoost
        };
        let id = self.next_entity_id();
        self.pickups.push(Pickup { id, pos: at, kind });
    }

    /// Apply a collected pickup's effect
    pub fn apply_pickup(&mut self, kind: PickupKind) {
        self.play(SoundCue::Pickup);
        match kind {
            PickupKind::ExtraRocket => {
                self.rocket_capacity = self.rocket_capacity.saturating_add(1);
                log::debug!("Rocket capacity now {}", self.rocket_capacity);
            }
            PickupKind::RadiusBoost => {
                self.explosion_radius = self.explosion_radius.saturating_mul(2);
                let due = self.time_ticks + self.settings.radius_boost_ticks();
                self.scheduler.schedule(due, DeferredAction::RevertRadiusBoost);
                log::debug!(
                    "Explosion radius boosted to {} until tick {}",
                    self.explosion_radius,
                    due
                );
            }
        }
    }

    /// Halve the radius, whatever it currently is
    pub fn revert_radius_boost(&mut self) {
        self.explosion_radius = (self.explosion_radius / 2).max(1);
        log::debug!("Explosion radius reverted to {}", self.explosion_radius);
    }

    /// Enter the death sequence. No-op unless alive.
    pub fn begin_dying(&mut self) {
        if !self.is_alive() {
            return;
        }
        self.phase = RunPhase::Dying {
            countdown: DEATH_COUNTDOWN,
        };
        self.spaceship.dampen();
        self.spawn_effect(self.spaceship.bounds());
        self.play(SoundCue::HazardDestroyed);
        log::info!(
            "Player hit at tick {} (score {})",
            self.time_ticks,
            self.score
        );
    }

    /// Spawn the boss once the score reaches the threshold
    pub fn check_boss_entry(&mut self) {
        if !self.settings.variant.has_boss()
            || self.boss != BossEncounter::Pending
            || self.score < BOSS_SCORE_THRESHOLD
        {
            return;
        }
        let boss = Boss::spawn(
            self.settings.playfield_width,
            self.settings.boss_cycle_ticks(),
            self.settings.boss_fire_cooldown_ticks(),
        );
        self.boss = BossEncounter::Active(boss);
        log::info!("Boss arriving at tick {}", self.time_ticks);
    }

    /// Boss death sequence finished: bonus and delayed announcement
    pub fn resolve_boss(&mut self) {
        self.boss = BossEncounter::Defeated;
        self.award(BOSS_VICTORY_BONUS);
        let due = self.time_ticks + self.settings.victory_delay_ticks();
        self.scheduler.schedule(due, DeferredAction::AnnounceVictory);
        log::info!("Boss destroyed at tick {}, score {}", self.time_ticks, self.score);
    }

    /// Report victory and halt
    pub fn announce_victory(&mut self) {
        if self.is_halted() {
            return;
        }
        self.phase = RunPhase::Victory;
        self.emit(GameEvent::Victory { score: self.score });
        log::info!("Victory! Final score {}", self.score);
    }

    /// Ensure entity collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.projectiles.sort_by_key(|p| p.id);
        self.hazards.sort_by_key(|h| h.id);
        self.pickups.sort_by_key(|p| p.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameVariant;

    #[test]
    fn test_new_state() {
        let state = GameState::new(Settings::default(), 1);
        assert_eq!(state.phase, RunPhase::Alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.rocket_capacity, 2);
        assert_eq!(state.explosion_radius, 50);
        assert_eq!(state.boss, BossEncounter::Pending);
        assert_eq!(state.tier(), 0);
    }

    #[test]
    fn test_award_pins_at_boss_threshold() {
        let mut state = GameState::new(Settings::for_variant(GameVariant::Boss), 1);
        state.score = 1490;
        state.award(RARE_HAZARD_SCORE);
        assert_eq!(state.score, BOSS_SCORE_THRESHOLD);
        state.award(COMMON_HAZARD_SCORE);
        assert_eq!(state.score, BOSS_SCORE_THRESHOLD);

        state.boss = BossEncounter::Defeated;
        state.award(BOSS_VICTORY_BONUS);
        assert_eq!(state.score, 2000);
    }

    #[test]
    fn test_award_unpinned_in_classic() {
        let mut state = GameState::new(Settings::for_variant(GameVariant::Classic), 1);
        state.score = 1490;
        state.award(RARE_HAZARD_SCORE);
        assert_eq!(state.score, 1540);
    }

    #[test]
    fn test_fire_respects_capacity() {
        let mut state = GameState::new(Settings::default(), 1);
        assert!(state.try_fire());
        assert!(state.try_fire());
        assert!(!state.try_fire());
        assert_eq!(state.friendly_rockets(), 2);

        state.apply_pickup(PickupKind::ExtraRocket);
        assert!(state.try_fire());
        assert!(!state.try_fire());

        let sounds = state
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::Sound(SoundCue::Shoot))
            .count();
        assert_eq!(sounds, 3);
    }

    #[test]
    fn test_hostile_rockets_do_not_use_capacity() {
        let mut state = GameState::new(Settings::default(), 1);
        state.fire_hostile(IVec2::new(400, 200), IVec2::new(400, 560));
        assert!(state.try_fire());
        assert!(state.try_fire());
        assert_eq!(state.projectiles.len(), 3);
    }

    #[test]
    fn test_hostile_radius_follows_settings() {
        let mut settings = Settings::default();
        settings.starting_explosion_radius = 80;
        let mut state = GameState::new(settings, 1);
        state.fire_hostile(IVec2::new(400, 200), IVec2::new(400, 560));
        assert_eq!(state.projectiles[0].explosion_radius, 80);
    }

    #[test]
    fn test_rocket_keeps_radius_from_launch() {
        let mut state = GameState::new(Settings::default(), 1);
        assert!(state.try_fire());
        state.apply_pickup(PickupKind::RadiusBoost);
        assert_eq!(state.explosion_radius, 100);
        assert_eq!(state.projectiles[0].explosion_radius, 50);

        assert!(state.try_fire());
        state.revert_radius_boost();
        assert_eq!(state.explosion_radius, 50);
        assert_eq!(state.projectiles[1].explosion_radius, 100);
    }

    #[test]
    fn test_pickup_drop_rate_and_kinds() {
        let mut state = GameState::new(Settings::default(), 2024);
        let rolls = 20_000;
        for _ in 0..rolls {
            state.roll_pickup_drop(IVec2::new(120, 80));
        }
        let drops = state.pickups.len();
        let extra = state
            .pickups
            .iter()
            .filter(|p| p.kind == PickupKind::ExtraRocket)
            .count();
        // 30 % drop chance, kinds split evenly
        assert!((5_400..6_600).contains(&drops), "drops={drops}");
        assert!(extra * 100 / drops >= 45 && extra * 100 / drops <= 55, "extra={extra}");
        assert!(state.pickups.iter().all(|p| p.pos == IVec2::new(120, 80)));
    }

    #[test]
    fn test_begin_dying_only_once() {
        let mut state = GameState::new(Settings::default(), 1);
        state.spaceship.steer(IVec2::new(10, -10));
        state.begin_dying();
        assert_eq!(state.phase, RunPhase::Dying { countdown: DEATH_COUNTDOWN });
        assert_eq!(state.spaceship.direction, IVec2::new(3, -3));
        assert_eq!(state.effects.len(), 1);

        state.begin_dying();
        assert_eq!(state.effects.len(), 1);
        assert_eq!(state.spaceship.direction, IVec2::new(3, -3));
        assert!(!state.try_fire());
    }

    #[test]
    fn test_boss_entry_once() {
        let mut state = GameState::new(Settings::for_variant(GameVariant::Boss), 1);
        state.score = 1499;
        state.check_boss_entry();
        assert_eq!(state.boss, BossEncounter::Pending);

        state.score = BOSS_SCORE_THRESHOLD;
        state.check_boss_entry();
        assert!(state.boss.active().is_some());

        state.resolve_boss();
        state.check_boss_entry();
        assert_eq!(state.boss, BossEncounter::Defeated);
        assert_eq!(state.scheduler.pending(), 1);
    }

    #[test]
    fn test_classic_never_spawns_boss() {
        let mut state = GameState::new(Settings::for_variant(GameVariant::Classic), 1);
        state.score = 10_000;
        state.check_boss_entry();
        assert_eq!(state.boss, BossEncounter::Pending);
    }
}
