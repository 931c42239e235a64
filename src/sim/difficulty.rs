//! Difficulty tables and the hazard spawner
//!
//! Difficulty is a pure step function of score. The spawner draws every value
//! from the RNG it is handed, so a seeded run spawns the same comets.

use glam::IVec2;
use rand::Rng;
use serde::Serialize;

use super::entities::{Hazard, HazardRank};
use crate::consts::*;
use crate::settings::GameVariant;

/// Spawn parameters for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Difficulty {
    /// Percent chance per tick of spawning a hazard
    pub spawn_rate: u32,
    /// Horizontal speed bound (exclusive, both directions)
    pub speed_x: i32,
    /// Minimum downward speed
    pub speed_y: i32,
}

const fn tier(spawn_rate: u32, speed_x: i32, speed_y: i32) -> Difficulty {
    Difficulty {
        spawn_rate,
        speed_x,
        speed_y,
    }
}

/// (lower score bound, parameters), ascending
const CLASSIC_TIERS: [(u64, Difficulty); 6] = [
    (0, tier(3, 2, 3)),
    (200, tier(5, 3, 4)),
    (400, tier(7, 3, 5)),
    (600, tier(9, 5, 6)),
    (800, tier(11, 5, 7)),
    (1000, tier(13, 7, 8)),
];

const BOSS_TIERS: [(u64, Difficulty); 7] = [
    (0, tier(3, 2, 3)),
    (200, tier(5, 3, 4)),
    (400, tier(7, 3, 5)),
    (600, tier(8, 5, 6)),
    (800, tier(9, 5, 7)),
    (1000, tier(7, 4, 5)),
    (BOSS_SCORE_THRESHOLD, tier(0, 4, 5)),
];

fn tiers(variant: GameVariant) -> &'static [(u64, Difficulty)] {
    match variant {
        GameVariant::Classic => &CLASSIC_TIERS,
        GameVariant::Boss => &BOSS_TIERS,
    }
}

/// Index of the tier `score` falls in
pub fn tier_index(variant: GameVariant, score: u64) -> usize {
    tiers(variant)
        .iter()
        .rposition(|(floor, _)| score >= *floor)
        .unwrap_or(0)
}

/// Spawn parameters for `score`
pub fn difficulty_for(variant: GameVariant, score: u64) -> Difficulty {
    tiers(variant)[tier_index(variant, score)].1
}

/// Roll the per-tick spawn chance
pub fn roll_spawn<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty) -> bool {
    rng.random_range(0..100) < difficulty.spawn_rate
}

/// Build a hazard entering from the top (50 %), left (25 %) or right (25 %) edge
pub fn spawn_hazard<R: Rng + ?Sized>(
    rng: &mut R,
    difficulty: Difficulty,
    id: u32,
    playfield_width: i32,
    playfield_height: i32,
) -> Hazard {
    let size = rng.random_range(HAZARD_MIN_SIZE..=HAZARD_MAX_SIZE);
    let side_band = -size..(playfield_height / 2).max(1 - size);

    let edge: f64 = rng.random();
    let pos = if edge < 0.5 {
        IVec2::new(rng.random_range(-size..playfield_width.max(1 - size)), -size)
    } else if edge < 0.75 {
        IVec2::new(-size, rng.random_range(side_band))
    } else {
        IVec2::new(playfield_width, rng.random_range(side_band))
    };

    let vx = if difficulty.speed_x > 0 {
        rng.random_range(-difficulty.speed_x + 1..difficulty.speed_x)
    } else {
        0
    };
    let vy = rng.random_range(difficulty.speed_y..difficulty.speed_y + 2);

    let rank = if rng.random_range(0..100) < RARE_HAZARD_PERCENT {
        HazardRank::Rare
    } else {
        HazardRank::Common
    };

    log::trace!("Spawned {:?} hazard {} at {} size {}", rank, id, pos, size);

    Hazard {
        id,
        pos,
        velocity: IVec2::new(vx, vy),
        size,
        rank,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_boss_table_boundaries() {
        let v = GameVariant::Boss;
        assert_eq!(difficulty_for(v, 0), tier(3, 2, 3));
        assert_eq!(difficulty_for(v, 199), tier(3, 2, 3));
        assert_eq!(difficulty_for(v, 200), tier(5, 3, 4));
        assert_eq!(difficulty_for(v, 400), tier(7, 3, 5));
        assert_eq!(difficulty_for(v, 600), tier(8, 5, 6));
        assert_eq!(difficulty_for(v, 800), tier(9, 5, 7));
        assert_eq!(difficulty_for(v, 999), tier(9, 5, 7));
        assert_eq!(difficulty_for(v, 1000), tier(7, 4, 5));
        assert_eq!(difficulty_for(v, 1499), tier(7, 4, 5));
        assert_eq!(difficulty_for(v, 1500).spawn_rate, 0);
        assert_eq!(difficulty_for(v, 1_000_000).spawn_rate, 0);
    }

    #[test]
    fn test_classic_table_boundaries() {
        let v = GameVariant::Classic;
        assert_eq!(difficulty_for(v, 0), tier(3, 2, 3));
        assert_eq!(difficulty_for(v, 200), tier(5, 3, 4));
        assert_eq!(difficulty_for(v, 599), tier(7, 3, 5));
        assert_eq!(difficulty_for(v, 600), tier(9, 5, 6));
        assert_eq!(difficulty_for(v, 800), tier(11, 5, 7));
        assert_eq!(difficulty_for(v, 1000), tier(13, 7, 8));
        assert_eq!(difficulty_for(v, 5000), tier(13, 7, 8));
        assert_eq!(tier_index(v, 5000), 5);
    }

    #[test]
    fn test_zero_rate_never_spawns() {
        let mut rng = Pcg32::seed_from_u64(7);
        let calm = difficulty_for(GameVariant::Boss, BOSS_SCORE_THRESHOLD);
        for _ in 0..1000 {
            assert!(!roll_spawn(&mut rng, calm));
        }
    }

    #[test]
    fn test_spawned_hazards_respect_bounds() {
        let mut rng = Pcg32::seed_from_u64(42);
        let d = difficulty_for(GameVariant::Classic, 650);
        let (mut top, mut left, mut right, mut rare) = (0, 0, 0, 0);
        for id in 0..2000 {
            let h = spawn_hazard(&mut rng, d, id, 800, 600);
            if h.rank == HazardRank::Rare {
                rare += 1;
            }
            assert!((HAZARD_MIN_SIZE..=HAZARD_MAX_SIZE).contains(&h.size));
            assert!(h.velocity.x > -d.speed_x && h.velocity.x < d.speed_x);
            assert!(h.velocity.y >= d.speed_y && h.velocity.y < d.speed_y + 2);
            if h.pos.y == -h.size && h.pos.x != -h.size && h.pos.x != 800 {
                top += 1;
            } else if h.pos.x == -h.size {
                left += 1;
                assert!(h.pos.y >= -h.size && h.pos.y < 300);
            } else {
                assert_eq!(h.pos.x, 800);
                right += 1;
            }
        }
        // Roughly 50/25/25
        assert!(top > 800 && top < 1200, "top={top}");
        assert!(left > 350 && left < 650, "left={left}");
        assert!(right > 350 && right < 650, "right={right}");
        // 5 % promoted to rare
        assert!(rare > 50 && rare < 160, "rare={rare}");
    }

    #[test]
    fn test_seeded_spawner_is_reproducible() {
        let d = difficulty_for(GameVariant::Boss, 0);
        let mut a = Pcg32::seed_from_u64(99);
        let mut b = Pcg32::seed_from_u64(99);
        for id in 0..50 {
            assert_eq!(
                spawn_hazard(&mut a, d, id, 800, 600),
                spawn_hazard(&mut b, d, id, 800, 600)
            );
        }
    }

    proptest! {
        #[test]
        fn prop_difficulty_is_pure(score in 0u64..5000) {
            for variant in [GameVariant::Classic, GameVariant::Boss] {
                prop_assert_eq!(difficulty_for(variant, score), difficulty_for(variant, score));
            }
        }

        #[test]
        fn prop_tier_is_monotonic(a in 0u64..5000, b in 0u64..5000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            for variant in [GameVariant::Classic, GameVariant::Boss] {
                prop_assert!(tier_index(variant, lo) <= tier_index(variant, hi));
            }
        }
    }
}
