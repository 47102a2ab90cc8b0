//! Damage values, damage ranges and hit chance

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::stats::{round_half_up, Stats};

/// Lowest chance any attack has to land
pub const MIN_HIT_CHANCE: f64 = 0.1;
/// Highest chance any attack has to land
pub const MAX_HIT_CHANCE: f64 = 1.0;

/// A signed amount of damage; negative values heal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Damage(i32);

impl Damage {
    /// Build from a raw roll, rounded to a whole number
    pub fn new(amount: f64) -> Self {
        Self(round_half_up(amount))
    }

    pub const fn from_amount(amount: i32) -> Self {
        Self(amount)
    }

    /// Healing of `amount` points
    pub const fn heal(amount: i32) -> Self {
        Self(-amount)
    }

    pub const fn amount(&self) -> i32 {
        self.0
    }

    pub const fn is_healing(&self) -> bool {
        self.0 < 0
    }

    pub const fn absolute(&self) -> i32 {
        self.0.abs()
    }
}

/// Inclusive range a damage or heal roll is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRange {
    pub min: i32,
    pub max: i32,
}

impl DamageRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Range of a basic weapon attack: `1 + strength / 4`, spread by -15%/+15%
    pub fn attack(stats: &Stats) -> Self {
        let base = 1.0 + f64::from(stats.strength) / 4.0;
        Self {
            min: (base * 0.85).floor() as i32,
            max: (base * 1.15).ceil() as i32,
        }
    }

    pub fn contains(&self, amount: i32) -> bool {
        let (low, high) = self.bounds();
        (low..=high).contains(&amount)
    }

    fn bounds(&self) -> (i32, i32) {
        (self.min.min(self.max), self.min.max(self.max))
    }

    /// Roll a whole amount uniformly inside the range
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        let (low, high) = self.bounds();
        rng.gen_range(low..=high)
    }
}

/// Chance that `attacker` lands a hit on `defender`, between 10% and 100%
///
/// Half the attacker's accuracy against the defender's evasion: equal accuracy
/// and evasion gives 50%, double accuracy or more always hits.
pub fn hit_chance(attacker: &Stats, defender: &Stats) -> f64 {
    if defender.evasion <= 0 {
        return MAX_HIT_CHANCE;
    }
    let ratio = (f64::from(attacker.accuracy) / 2.0) / f64::from(defender.evasion);
    ratio.clamp(MIN_HIT_CHANCE, MAX_HIT_CHANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn stats(accuracy: i32, evasion: i32, strength: i32) -> Stats {
        Stats {
            accuracy,
            evasion,
            strength,
            ..Stats::default()
        }
    }

    #[test]
    fn test_hit_chance_caps_at_certain() {
        let hero = stats(20, 1, 1);
        let enemy = stats(1, 10, 1);
        assert!((hit_chance(&hero, &enemy) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_chance_floors_at_ten_percent() {
        let hero = stats(2, 1, 1);
        let enemy = stats(1, 100, 1);
        assert!((hit_chance(&hero, &enemy) - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_matching_accuracy_and_evasion_is_even_odds() {
        let a = stats(16, 16, 1);
        assert!((hit_chance(&a, &a) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_evasion_always_hit() {
        assert_eq!(hit_chance(&stats(1, 1, 1), &stats(1, 0, 1)), 1.0);
    }

    #[test]
    fn test_attack_range_from_strength() {
        // base = 1 + 50/4 = 13.5 -> floor(11.475) .. ceil(15.525)
        assert_eq!(DamageRange::attack(&stats(1, 1, 50)), DamageRange::new(11, 16));
        // base = 1 + 16/4 = 5 -> floor(4.25) .. ceil(5.75)
        assert_eq!(DamageRange::attack(&stats(1, 1, 16)), DamageRange::new(4, 6));
    }

    #[test]
    fn test_roll_stays_inside_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let range = DamageRange::new(9, 13);
        for _ in 0..200 {
            assert!(range.contains(range.roll(&mut rng)));
        }

        // Inverted bounds are tolerated
        let inverted = DamageRange::new(5, 2);
        assert!(inverted.contains(inverted.roll(&mut rng)));
    }

    #[test]
    fn test_damage_rounding_and_sign() {
        assert_eq!(Damage::new(4.5).amount(), 5);
        assert_eq!(Damage::new(4.4).amount(), 4);
        let heal = Damage::heal(11);
        assert!(heal.is_healing());
        assert_eq!(heal.amount(), -11);
        assert_eq!(heal.absolute(), 11);
    }
}
