//! Combat facet shared by heroes and enemies

use serde::{Deserialize, Serialize};

use crate::stats::{Damage, Stats};

/// What happened when damage reached a creature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The creature was already dead; nothing changed
    Ignored,
    /// Health changed by `applied` (after clamping)
    Applied { applied: i32, died: bool },
}

impl DamageOutcome {
    pub fn died(&self) -> bool {
        matches!(self, DamageOutcome::Applied { died: true, .. })
    }
}

/// Stats plus turn speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub stats: Stats,
    /// Added to the creature's timeline accumulator every pass
    pub wait: u32,
    /// Experience granted to the party when this creature is slain
    pub exp_reward: u32,
}

impl Creature {
    pub fn new(stats: Stats, wait: u32) -> Self {
        Self {
            stats,
            wait,
            exp_reward: 0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.stats.health <= 0
    }

    /// Subtract `damage` from health, clamped to `[0, maxHealth]`
    ///
    /// Reports `died` only on the transition from alive to dead.
    pub fn take_damage(&mut self, damage: Damage) -> DamageOutcome {
        if self.is_dead() {
            tracing::warn!("Dead creatures cannot take damage");
            return DamageOutcome::Ignored;
        }

        let before = self.stats.health;
        let after = (i64::from(before) - i64::from(damage.amount()))
            .clamp(0, i64::from(self.stats.max_health)) as i32;
        self.stats.health = after;

        DamageOutcome::Applied {
            applied: before - after,
            died: after <= 0,
        }
    }

    /// Bring a dead creature back with 1 health
    pub fn revive(&mut self) -> bool {
        if !self.is_dead() {
            return false;
        }
        self.stats.health = 1;
        true
    }

    pub fn health_percentage(&self) -> f32 {
        self.stats.health_percentage()
    }
}
