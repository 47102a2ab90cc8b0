//! Level, party and save descriptors

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::beings::{BeingDef, BeingKind, HeroData};
use crate::core::config::Span;
use crate::core::error::{EngineError, Result};

/// One entry of a level's random encounter table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyDef {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, rename = "levelRange", alias = "level", skip_serializing_if = "Option::is_none")]
    pub level_range: Option<Span>,
}

/// A door placed by the level, separately from its other beings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorDef {
    pub x: i64,
    pub y: i64,
    pub destination: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub beings: Vec<BeingDef>,
    /// Enemy types that can appear in random encounters; empty means none
    #[serde(default)]
    pub enemies: Vec<EnemyDef>,
    #[serde(default)]
    pub doors: Vec<DoorDef>,
}

impl LevelDef {
    /// Parse a campaign: a JSON array of levels
    pub fn list_from_json(source: &str) -> Result<Vec<LevelDef>> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load a campaign from a JSON file on disk
    pub fn list_from_file(path: &Path) -> Result<Vec<LevelDef>> {
        let content = std::fs::read_to_string(path)?;
        Self::list_from_json(&content)
    }

    pub fn has_encounters(&self) -> bool {
        !self.enemies.is_empty()
    }

    /// Every encounter table entry must name an enemy type
    pub fn check_enemies(&self) -> Result<()> {
        for entry in &self.enemies {
            let kind: BeingKind = entry.kind.parse()?;
            if !kind.is_enemy() {
                return Err(EngineError::InvalidField {
                    field: "enemies",
                    reason: format!("{} is not an enemy type", entry.kind),
                });
            }
        }
        Ok(())
    }
}

/// Where the party enters a level and who is in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyDef {
    pub x: i64,
    pub y: i64,
    pub heroes: Vec<HeroData>,
}

impl PartyDef {
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// Snapshot of the loaded level's persistent beings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveDef {
    pub width: u32,
    pub height: u32,
    pub beings: Vec<BeingDef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_descriptor_parses() {
        let levels = LevelDef::list_from_json(
            r#"[{
                "width": 6, "height": 4,
                "beings": [{ "type": "Wall", "x": 0, "y": 0 }],
                "enemies": [{ "type": "Skeleton", "level": [1, 2] }],
                "doors": [{ "x": 5, "y": 1, "destination": { "level": 1, "x": 1, "y": 1 } }]
            }, { "width": 3, "height": 3 }]"#,
        )
        .unwrap();

        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].enemies[0].level_range, Some([1, 2]));
        assert!(levels[0].has_encounters());
        assert!(!levels[1].has_encounters());
        assert!(levels[1].doors.is_empty());
    }

    #[test]
    fn test_encounter_table_holds_only_enemies() {
        let level = |enemies: &str| -> LevelDef {
            serde_json::from_str(&format!(r#"{{ "width": 3, "height": 3, "enemies": {} }}"#, enemies))
                .unwrap()
        };

        assert!(level(r#"[{ "type": "Skeleton" }]"#).check_enemies().is_ok());
        assert!(level("[]").check_enemies().is_ok());
        assert!(matches!(
            level(r#"[{ "type": "Skeleton" }, { "type": "Wall" }]"#).check_enemies(),
            Err(EngineError::InvalidField { field: "enemies", .. })
        ));
        assert!(matches!(
            level(r#"[{ "type": "Ghoul" }]"#).check_enemies(),
            Err(EngineError::UnknownBeingType(name)) if name == "Ghoul"
        ));
    }

    #[test]
    fn test_level_range_key() {
        let enemy: EnemyDef =
            serde_json::from_str(r#"{ "type": "Skeleton", "levelRange": [3, 5] }"#).unwrap();
        assert_eq!(enemy.level_range, Some([3, 5]));
    }
}
