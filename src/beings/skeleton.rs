//! Skeleton enemies spawned by random encounters

use rand::Rng;

use crate::beings::creature::Creature;
use crate::core::config::Span;
use crate::stats::Stats;

pub const SKELETON_NAME: &str = "Skeleton";

/// Level used when the encounter table gives no range
pub const DEFAULT_LEVEL: i32 = 4;

const VITALITY: i32 = 12;
const STRENGTH: (i32, i32) = (15, 20);
const EVASION: i32 = 10;
const ACCURACY: i32 = 16;

/// Experience a slain skeleton adds to the battle result
pub const EXP_REWARD: u32 = 1;

/// Pick a level inside `range`, or the default level
pub fn roll_level<R: Rng + ?Sized>(range: Option<Span>, rng: &mut R) -> i32 {
    match range {
        Some([low, high]) => rng.gen_range(low.min(high)..=low.max(high)) as i32,
        None => DEFAULT_LEVEL,
    }
}

/// Roll a fresh skeleton at full health
pub fn roll_creature<R: Rng + ?Sized>(level: i32, wait: u32, rng: &mut R) -> Creature {
    let mut stats = Stats {
        level: level.max(1),
        vitality: VITALITY,
        strength: rng.gen_range(STRENGTH.0..=STRENGTH.1),
        evasion: EVASION,
        accuracy: ACCURACY,
        ..Stats::default()
    };
    stats.derive_max_health();
    stats.refill();

    Creature {
        stats,
        wait,
        exp_reward: EXP_REWARD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rolled_skeleton_stats() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let skeleton = roll_creature(DEFAULT_LEVEL, 6, &mut rng);

        assert_eq!(skeleton.wait, 6);
        assert_eq!(skeleton.stats.max_health, 36);
        assert_eq!(skeleton.stats.health, 36);
        assert!((15..=20).contains(&skeleton.stats.strength));
        assert_eq!(skeleton.stats.accuracy, 16);
        assert_eq!(skeleton.exp_reward, 1);
    }

    #[test]
    fn test_level_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..50 {
            let level = roll_level(Some([1, 2]), &mut rng);
            assert!((1..=2).contains(&level));
        }
        assert_eq!(roll_level(None, &mut rng), DEFAULT_LEVEL);
    }
}
