//! Player-controlled heroes: roster data and levelling

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::abilities::{self, AbilityKind};
use crate::core::error::Result;

/// Hero record as found in party descriptors and save data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroData {
    pub name: String,
    /// Presentation attributes (texture, colour); carried through untouched
    #[serde(default)]
    pub attrs: Value,
    /// Partial stats overlaid on the defaults
    #[serde(default)]
    pub stats: Map<String, Value>,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levelling: Option<Levelling>,
}

/// Experience progress towards the next level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Levelling {
    pub exp: u32,
    pub next_level: u32,
    pub ability_points: u32,
    pub stat_points: u32,
}

impl Default for Levelling {
    fn default() -> Self {
        Self {
            exp: 0,
            next_level: 10,
            ability_points: 0,
            stat_points: 0,
        }
    }
}

/// Hero-only facet of a being
#[derive(Debug, Clone, PartialEq)]
pub struct HeroProfile {
    pub attrs: Value,
    pub abilities: Vec<AbilityKind>,
    pub levelling: Levelling,
}

impl HeroProfile {
    /// Resolve the ability identifiers of `data`
    pub fn from_data(data: &HeroData) -> Result<Self> {
        let abilities = data
            .abilities
            .iter()
            .map(|id| abilities::find(id).map(|ability| ability.kind))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            attrs: data.attrs.clone(),
            abilities,
            levelling: data.levelling.clone().unwrap_or_default(),
        })
    }

    pub fn knows(&self, kind: AbilityKind) -> bool {
        self.abilities.contains(&kind)
    }

    pub fn ability_ids(&self) -> Vec<String> {
        self.abilities.iter().map(|kind| kind.id().to_string()).collect()
    }
}

impl Levelling {
    /// Add experience one point at a time and return the levels gained
    ///
    /// Every level-up resets `exp` and multiplies `next_level` by 1.25 (rounded).
    pub fn add_exp(&mut self, amount: u32) -> u32 {
        let mut levels = 0;

        for _ in 0..amount {
            self.exp += 1;

            if self.exp >= self.next_level {
                self.ability_points += 1;
                self.stat_points += 2;
                self.exp = 0;
                self.next_level = (f64::from(self.next_level) * 1.25).round() as u32;
                levels += 1;
            }
        }

        levels
    }

    pub fn progress(&self) -> f32 {
        self.exp as f32 / self.next_level.max(1) as f32
    }
}
