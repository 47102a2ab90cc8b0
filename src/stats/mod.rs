//! Creature attributes and the damage model

pub mod damage;

pub use damage::{hit_chance, Damage, DamageRange};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Round to the nearest integer with halves going up (2.5 -> 3, -2.5 -> -2)
pub(crate) fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Creature attributes
///
/// Serialized with the camelCase keys used by level and save data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub level: i32,
    pub health: i32,
    pub max_health: i32,
    pub energy: i32,
    pub max_energy: i32,
    pub strength: i32,
    pub vitality: i32,
    pub evasion: i32,
    pub accuracy: i32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            level: 1,
            health: 1,
            max_health: 1,
            energy: 1,
            max_energy: 1,
            strength: 1,
            vitality: 1,
            evasion: 1,
            accuracy: 1,
        }
    }
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stats built from defaults overlaid with `partial`
    pub fn from_partial(partial: &Map<String, Value>) -> Self {
        let mut stats = Self::default();
        stats.merge(partial);
        stats
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut i32> {
        match name {
            "level" => Some(&mut self.level),
            "health" => Some(&mut self.health),
            "maxHealth" => Some(&mut self.max_health),
            "energy" => Some(&mut self.energy),
            "maxEnergy" => Some(&mut self.max_energy),
            "strength" => Some(&mut self.strength),
            "vitality" => Some(&mut self.vitality),
            "evasion" => Some(&mut self.evasion),
            "accuracy" => Some(&mut self.accuracy),
            _ => None,
        }
    }

    /// Overlay every known numeric field of `partial`, rounded to an integer
    ///
    /// Unknown or non-numeric fields are skipped so older and newer level data
    /// keep loading. Afterwards `maxHealth >= 1` and health lies in `[0, maxHealth]`.
    pub fn merge(&mut self, partial: &Map<String, Value>) {
        for (name, value) in partial {
            let Some(number) = value.as_f64() else {
                tracing::debug!("Ignoring non-numeric stat {} = {}", name, value);
                continue;
            };
            if let Some(field) = self.field_mut(name) {
                *field = round_half_up(number);
            }
        }
        self.normalize();
    }

    fn normalize(&mut self) {
        self.max_health = self.max_health.max(1);
        self.max_energy = self.max_energy.max(1);
        self.health = self.health.clamp(0, self.max_health);
        self.energy = self.energy.clamp(0, self.max_energy);
    }

    /// Recompute max health from vitality and level
    ///
    /// `round(vitality * 2 + level * vitality * 0.25)`, never below 1.
    pub fn derive_max_health(&mut self) {
        self.max_health = self.derived_max_health();
        self.normalize();
    }

    /// Max health the vitality and level formula gives, never below 1
    pub fn derived_max_health(&self) -> i32 {
        let vitality = f64::from(self.vitality);
        let level = f64::from(self.level);
        round_half_up(vitality * 2.0 + level * vitality * 0.25).max(1)
    }

    /// Raise the level by `levels`, growing max health by what the formula adds
    ///
    /// A stored max health above the formula keeps its surplus.
    pub fn gain_levels(&mut self, levels: u32) {
        if levels == 0 {
            return;
        }
        let before = self.derived_max_health();
        self.level += levels as i32;
        let growth = self.derived_max_health() - before;
        self.max_health += growth.max(0);
    }

    /// Restore health and energy to their maximum
    pub fn refill(&mut self) {
        self.health = self.max_health;
        self.energy = self.max_energy;
    }

    pub fn health_percentage(&self) -> f32 {
        self.health as f32 / self.max_health.max(1) as f32
    }

    pub fn energy_percentage(&self) -> f32 {
        self.energy as f32 / self.max_energy.max(1) as f32
    }

    /// Plain record for save data
    pub fn save(&self) -> Value {
        // A struct of integers always serializes
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
