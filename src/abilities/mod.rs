//! Ability descriptors and the fixed ability registry
//!
//! Abilities are stateless: a descriptor names the targeting flow and the
//! numeric ranges, `targeting` acquires a target and `effects` applies it.

pub mod effects;
pub mod targeting;

pub use effects::resolve;
pub use targeting::{acquire_target, Target};

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::stats::{DamageRange, Stats};

/// Identifiers of every ability in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityKind {
    Attack,
    Skip,
    Bandage,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 3] = [AbilityKind::Attack, AbilityKind::Skip, AbilityKind::Bandage];

    pub fn id(&self) -> &'static str {
        match self {
            AbilityKind::Attack => "attack",
            AbilityKind::Skip => "skip",
            AbilityKind::Bandage => "bandage",
        }
    }

    /// The registry descriptor for this kind
    pub fn ability(&self) -> &'static Ability {
        // The registry is built in `ALL` order, which is declaration order
        &registry()[*self as usize]
    }
}

impl fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// What an ability needs before its effect can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetingFlow {
    /// A creature picked by a cell selection
    CreatureTargeted,
    /// Any cell; reserved for area effects
    CellTargeted,
    /// Resolves against the actor alone
    Untargeted,
}

/// Bandage heal bounds, before sign inversion
const BANDAGE_HEAL: (i32, i32) = (9, 13);

#[derive(Debug, Clone, PartialEq)]
pub struct Ability {
    pub kind: AbilityKind,
    pub name: &'static str,
    pub flow: TargetingFlow,
    pub allow_dead_targets: bool,
    pub description: &'static str,
}

impl Ability {
    /// Damage dealt by `stats`, for abilities that deal damage
    pub fn damage_range(&self, stats: &Stats) -> Option<DamageRange> {
        match self.kind {
            AbilityKind::Attack => Some(DamageRange::attack(stats)),
            _ => None,
        }
    }

    /// Health restored, as a positive range, for abilities that heal
    pub fn heal_range(&self, _stats: &Stats) -> Option<DamageRange> {
        match self.kind {
            AbilityKind::Bandage => Some(DamageRange::new(BANDAGE_HEAL.0, BANDAGE_HEAL.1)),
            _ => None,
        }
    }

    /// Tooltip lines: name, description, then the numbers for `stats`
    pub fn tip(&self, stats: &Stats) -> Vec<String> {
        let mut lines = vec![self.name.to_string(), self.description.to_string()];
        if let Some(range) = self.damage_range(stats) {
            lines.push(format!("Damage: {}-{}", range.min, range.max));
        }
        if let Some(range) = self.heal_range(stats) {
            lines.push(format!("Heals: {}-{}", range.min, range.max));
        }
        lines
    }
}

fn registry() -> &'static [Ability] {
    static REGISTRY: OnceLock<Vec<Ability>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        AbilityKind::ALL
            .iter()
            .map(|&kind| match kind {
                AbilityKind::Attack => Ability {
                    kind,
                    name: "Attack",
                    flow: TargetingFlow::CreatureTargeted,
                    allow_dead_targets: false,
                    description: "Strike an enemy with weapon held.",
                },
                AbilityKind::Skip => Ability {
                    kind,
                    name: "Skip",
                    flow: TargetingFlow::Untargeted,
                    allow_dead_targets: false,
                    description: "Skip this turn and perform no action.",
                },
                AbilityKind::Bandage => Ability {
                    kind,
                    name: "Bandage",
                    flow: TargetingFlow::CreatureTargeted,
                    allow_dead_targets: false,
                    description: "Apply bandages to a target and restore HP.",
                },
            })
            .collect()
    })
}

/// Look up an ability by identifier
pub fn find(id: &str) -> Result<&'static Ability> {
    registry()
        .iter()
        .find(|ability| ability.kind.id() == id)
        .ok_or_else(|| EngineError::UnknownAbility(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_is_memoized() {
        let first = find("attack").unwrap();
        let second = find("attack").unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(std::ptr::eq(first, AbilityKind::Attack.ability()));
    }

    #[test]
    fn test_unknown_ability() {
        assert!(matches!(find("teleport"), Err(EngineError::UnknownAbility(id)) if id == "teleport"));
    }

    #[test]
    fn test_flows() {
        assert_eq!(AbilityKind::Attack.ability().flow, TargetingFlow::CreatureTargeted);
        assert_eq!(AbilityKind::Skip.ability().flow, TargetingFlow::Untargeted);
        assert!(!AbilityKind::Bandage.ability().allow_dead_targets);
    }

    #[test]
    fn test_ranges_and_tip() {
        let stats = Stats {
            strength: 16,
            ..Stats::default()
        };
        let attack = AbilityKind::Attack.ability();
        assert_eq!(attack.damage_range(&stats), Some(DamageRange::new(4, 6)));
        assert_eq!(attack.heal_range(&stats), None);
        assert_eq!(attack.tip(&stats).last().map(String::as_str), Some("Damage: 4-6"));

        let bandage = AbilityKind::Bandage.ability();
        assert_eq!(bandage.heal_range(&stats), Some(DamageRange::new(9, 13)));
        assert_eq!(bandage.tip(&stats).last().map(String::as_str), Some("Heals: 9-13"));
    }
}
