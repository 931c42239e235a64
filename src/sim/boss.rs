//! Boss encounter state machine
//!
//! Each tick the boss runs a fixed, ordered list of phases. Every phase takes
//! the boss produced by the previous one and returns the next, pushing any
//! side effects (rockets, explosions, cues) for the orchestrator to apply.
//!
//! Stages: `Descending -> Cycling -> Dying -> Destroyed`. While descending or
//! cycling the hatch alternates closed (firing) and open (vulnerable) on a
//! tick-counted period.

use glam::IVec2;

use super::geometry::Rect;
use crate::audio::SoundCue;
use crate::consts::*;

/// Lifecycle stage of the boss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossStage {
    /// Moving down to its fighting altitude
    Descending,
    /// At altitude, hatch cycling
    Cycling,
    /// Staged detonation countdown
    Dying { countdown: u32 },
    Destroyed,
}

/// Side effect requested by a boss phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossEffect {
    /// Launch a hostile rocket from `origin` toward `target`
    Fire { origin: IVec2, target: IVec2 },
    Explosion(Rect),
    Sound(SoundCue),
    /// Death sequence finished
    Destroyed,
}

/// Per-tick inputs the boss reads from the rest of the world
#[derive(Debug, Clone, Copy)]
pub struct BossTick {
    /// Player centre, used for aiming
    pub target: IVec2,
}

/// The boss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boss {
    pub pos: IVec2,
    pub hit_points: u32,
    pub stage: BossStage,
    pub is_open: bool,
    /// Set by a weak-point hit; keeps the hatch shut until the next cycle
    pub was_hit: bool,
    /// Ticks since spawn
    pub clock: u32,
    pub fire_cooldown: u32,
    cycle_ticks: u32,
    fire_cooldown_ticks: u32,
}

type BossPhase = fn(Boss, &BossTick, &mut Vec<BossEffect>) -> Boss;

/// Per-tick phase order
const PHASES: [BossPhase; 5] = [descend, cycle_hatch, fire, death_sequence, advance_clock];

impl Boss {
    /// Spawn above the playfield, centred horizontally, closed
    pub fn spawn(playfield_width: i32, cycle_ticks: u32, fire_cooldown_ticks: u32) -> Self {
        Self {
            pos: IVec2::new(playfield_width / 2 - BOSS_WIDTH / 2, -BOSS_HEIGHT),
            hit_points: BOSS_HIT_POINTS,
            stage: BossStage::Descending,
            is_open: false,
            was_hit: false,
            clock: 0,
            fire_cooldown: 0,
            cycle_ticks: cycle_ticks.max(2),
            fire_cooldown_ticks: fire_cooldown_ticks.max(1),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::at(self.pos, IVec2::new(BOSS_WIDTH, BOSS_HEIGHT))
    }

    /// The only damageable region
    pub fn weak_point(&self) -> Rect {
        let (dx, dy, w, h) = BOSS_WEAK_POINT;
        Rect::new(self.pos.x + dx, self.pos.y + dy, w, h)
    }

    /// Rocket launch point
    pub fn muzzle(&self) -> IVec2 {
        IVec2::new(self.pos.x + BOSS_WIDTH / 2, self.bounds().bottom())
    }

    pub fn is_alive(&self) -> bool {
        matches!(self.stage, BossStage::Descending | BossStage::Cycling)
    }

    pub fn is_destroyed(&self) -> bool {
        self.stage == BossStage::Destroyed
    }

    /// Weak point is collidable
    pub fn is_vulnerable(&self) -> bool {
        self.is_open && self.is_alive()
    }

    /// First half of each cycle: hatch closed, guns active
    pub fn in_closed_half(&self) -> bool {
        self.clock % self.cycle_ticks < self.cycle_ticks / 2
    }

    /// Apply a weak-point hit. Returns false (and changes nothing) while closed.
    pub fn register_hit(&mut self) -> bool {
        if !self.is_vulnerable() {
            return false;
        }
        self.hit_points = self.hit_points.saturating_sub(1);
        self.was_hit = true;
        if self.hit_points == 0 {
            self.is_open = false;
            self.stage = BossStage::Dying {
                countdown: BOSS_DEATH_COUNTDOWN,
            };
        }
        true
    }

    /// Run this tick's phases in order
    pub fn step(self, tick: &BossTick, effects: &mut Vec<BossEffect>) -> Boss {
        PHASES
            .iter()
            .fold(self, |boss, phase| phase(boss, tick, effects))
    }
}

fn descend(mut boss: Boss, _tick: &BossTick, _effects: &mut Vec<BossEffect>) -> Boss {
    if boss.stage == BossStage::Descending {
        boss.pos.y = (boss.pos.y + BOSS_DESCENT_SPEED).min(BOSS_ALTITUDE);
        if boss.pos.y >= BOSS_ALTITUDE {
            boss.stage = BossStage::Cycling;
        }
    }
    boss
}

fn cycle_hatch(mut boss: Boss, _tick: &BossTick, _effects: &mut Vec<BossEffect>) -> Boss {
    if !boss.is_alive() {
        boss.is_open = false;
        return boss;
    }
    if boss.clock % boss.cycle_ticks == 0 {
        boss.was_hit = false;
    }
    boss.is_open = !boss.in_closed_half() && !boss.was_hit;
    boss
}

fn fire(mut boss: Boss, tick: &BossTick, effects: &mut Vec<BossEffect>) -> Boss {
    boss.fire_cooldown = boss.fire_cooldown.saturating_sub(1);
    if boss.is_alive() && boss.in_closed_half() && boss.fire_cooldown == 0 {
        effects.push(BossEffect::Fire {
            origin: boss.muzzle(),
            target: tick.target,
        });
        boss.fire_cooldown = boss.fire_cooldown_ticks;
    }
    boss
}

fn death_sequence(mut boss: Boss, _tick: &BossTick, effects: &mut Vec<BossEffect>) -> Boss {
    let BossStage::Dying { countdown } = boss.stage else {
        return boss;
    };
    let next = countdown.saturating_sub(1);
    let body = boss.bounds();

    if countdown > BOSS_DEATH_BLAST_TICK && next % BOSS_DETONATION_EVERY == 0 {
        // Five staged blasts sweep the body left to right (steps 4..=0)
        let step = (next / BOSS_DETONATION_EVERY).saturating_sub(5).min(4) as i32;
        let x = body.left() + body.width * (4 - step) / 4;
        let center = IVec2::new(x, body.center().y);
        effects.push(BossEffect::Explosion(Rect::centered(
            center,
            BOSS_DETONATION_SIZE,
            BOSS_DETONATION_SIZE,
        )));
        effects.push(BossEffect::Sound(SoundCue::HazardDestroyed));
    }

    if next == BOSS_DEATH_BLAST_TICK {
        effects.push(BossEffect::Explosion(body));
        effects.push(BossEffect::Sound(SoundCue::BossBlast));
    }

    if next == 0 {
        boss.stage = BossStage::Destroyed;
        effects.push(BossEffect::Destroyed);
    } else {
        boss.stage = BossStage::Dying { countdown: next };
    }
    boss
}

fn advance_clock(mut boss: Boss, _tick: &BossTick, _effects: &mut Vec<BossEffect>) -> Boss {
    boss.clock = boss.clock.wrapping_add(1);
    boss
}

#[cfg(test)]
mod tests {
    use super::*;

    const CYCLE: u32 = 500;
    const COOLDOWN: u32 = 50;

    fn target() -> BossTick {
        BossTick {
            target: IVec2::new(400, 560),
        }
    }

    fn run(mut boss: Boss, ticks: u32) -> (Boss, Vec<BossEffect>) {
        let mut effects = Vec::new();
        for _ in 0..ticks {
            boss = boss.step(&target(), &mut effects);
        }
        (boss, effects)
    }

    #[test]
    fn test_spawns_above_and_descends_to_altitude() {
        let boss = Boss::spawn(800, CYCLE, COOLDOWN);
        assert_eq!(boss.pos, IVec2::new(250, -BOSS_HEIGHT));
        assert_eq!(boss.hit_points, 1);
        assert!(!boss.is_open);

        let (boss, _) = run(boss, 109);
        assert_eq!(boss.stage, BossStage::Descending);
        let (boss, _) = run(boss, 1);
        assert_eq!(boss.pos.y, BOSS_ALTITUDE);
        assert_eq!(boss.stage, BossStage::Cycling);
        let (boss, _) = run(boss, 50);
        assert_eq!(boss.pos.y, BOSS_ALTITUDE);
    }

    #[test]
    fn test_hatch_closed_then_open() {
        let boss = Boss::spawn(800, CYCLE, COOLDOWN);
        let (boss, _) = run(boss, 250);
        assert!(!boss.is_open);
        let (boss, _) = run(boss, 1);
        assert!(boss.is_open);
        let (boss, _) = run(boss, 249);
        assert!(boss.is_open);
        let (boss, _) = run(boss, 1);
        assert!(!boss.is_open, "new cycle starts closed");
    }

    #[test]
    fn test_fires_only_in_closed_half_on_cooldown() {
        let boss = Boss::spawn(800, CYCLE, COOLDOWN);
        let (boss, effects) = run(boss, 250);
        let shots = effects
            .iter()
            .filter(|e| matches!(e, BossEffect::Fire { .. }))
            .count();
        assert_eq!(shots, 5);
        if let Some(BossEffect::Fire { target, .. }) = effects.first() {
            assert_eq!(*target, IVec2::new(400, 560));
        }

        let (_, effects) = run(boss, 250);
        assert!(!effects.iter().any(|e| matches!(e, BossEffect::Fire { .. })));
    }

    #[test]
    fn test_closed_weak_point_ignores_hits() {
        let mut boss = Boss::spawn(800, CYCLE, COOLDOWN);
        assert!(!boss.register_hit());
        assert_eq!(boss.hit_points, 1);
        assert!(boss.is_alive());
    }

    #[test]
    fn test_hit_suppresses_opening_for_the_cycle() {
        let mut boss = Boss::spawn(800, CYCLE, COOLDOWN);
        boss.hit_points = 3;
        let (mut boss, _) = run(boss, 251);
        assert!(boss.is_open);
        assert!(boss.register_hit());
        assert_eq!(boss.hit_points, 2);

        let (boss, _) = run(boss, 1);
        assert!(!boss.is_open);
        let (boss, _) = run(boss, 248);
        assert!(!boss.is_open);
        // Next cycle: closed half, then open again
        let (boss, _) = run(boss, 251);
        assert!(boss.is_open);
    }

    #[test]
    fn test_single_hit_enters_death_sequence() {
        let boss = Boss::spawn(800, CYCLE, COOLDOWN);
        let (mut boss, _) = run(boss, 251);
        assert!(boss.register_hit());
        assert_eq!(boss.hit_points, 0);
        assert_eq!(
            boss.stage,
            BossStage::Dying {
                countdown: BOSS_DEATH_COUNTDOWN
            }
        );
        assert!(!boss.is_vulnerable());
        assert!(!boss.register_hit());
    }

    #[test]
    fn test_death_sequence_timeline() {
        let mut boss = Boss::spawn(800, CYCLE, COOLDOWN);
        boss.pos = IVec2::new(250, BOSS_ALTITUDE);
        boss.stage = BossStage::Dying {
            countdown: BOSS_DEATH_COUNTDOWN,
        };
        let body = boss.bounds();

        let (boss, effects) = run(boss, 149);
        assert_eq!(boss.stage, BossStage::Dying { countdown: 1 });
        assert!(!effects.iter().any(|e| matches!(e, BossEffect::Fire { .. })));

        let blasts: Vec<Rect> = effects
            .iter()
            .filter_map(|e| match e {
                BossEffect::Explosion(r) => Some(*r),
                _ => None,
            })
            .collect();
        // Five staged detonations, then the full-body blast
        assert_eq!(blasts.len(), 6);
        let xs: Vec<i32> = blasts[..5].iter().map(|r| r.center().x).collect();
        assert_eq!(xs, vec![250, 325, 400, 475, 550]);
        assert_eq!(blasts[5], body);
        assert!(effects.contains(&BossEffect::Sound(SoundCue::BossBlast)));

        let (boss, effects) = run(boss, 1);
        assert!(boss.is_destroyed());
        assert_eq!(effects, vec![BossEffect::Destroyed]);
    }
}
