//! Everything that occupies a cell
//!
//! A `Being` carries the common capabilities (cell, walkability, layer, save)
//! and optional facets: `Creature` for anything that fights, `HeroProfile` for
//! party members and `Interactive` for fixtures the party can use.

pub mod creature;
pub mod hero;
pub mod registry;
pub mod skeleton;
pub mod structures;

pub use creature::{Creature, DamageOutcome};
pub use hero::{HeroData, HeroProfile, Levelling};
pub use registry::Beings;
pub use structures::{ClickAction, DoorDestination, Interactive};

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::{BeingId, VisualHandle};
use crate::grid::{CellCoord, Grid};
use crate::stats::{Damage, Stats};

/// Concrete being variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeingKind {
    Wall,
    Door,
    Hero,
    Skeleton,
}

impl BeingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BeingKind::Wall => "Wall",
            BeingKind::Door => "Door",
            BeingKind::Hero => "Hero",
            BeingKind::Skeleton => "Skeleton",
        }
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self, BeingKind::Skeleton)
    }
}

impl fmt::Display for BeingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BeingKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Wall" => Ok(BeingKind::Wall),
            "Door" => Ok(BeingKind::Door),
            "Hero" => Ok(BeingKind::Hero),
            "Skeleton" => Ok(BeingKind::Skeleton),
            other => Err(EngineError::UnknownBeingType(other.to_string())),
        }
    }
}

/// Drawing layer, bottom to top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Terrain,
    Structures,
    Creatures,
}

impl FromStr for Layer {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "terrain" => Ok(Layer::Terrain),
            "structures" => Ok(Layer::Structures),
            "creatures" => Ok(Layer::Creatures),
            other => Err(EngineError::UnknownLayer(other.to_string())),
        }
    }
}

/// A being as written in level and save data: `{type, x, y, ...}`
///
/// Everything besides the three common keys is kept in `data` and interpreted
/// by the variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeingDef {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i64>,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl BeingDef {
    pub fn new(kind: BeingKind, x: i64, y: i64) -> Self {
        Self {
            kind: Some(kind.as_str().to_string()),
            x: Some(x),
            y: Some(y),
            data: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Being {
    id: BeingId,
    kind: BeingKind,
    name: String,
    cell: CellCoord,
    prev_cell: Option<CellCoord>,
    walkable: bool,
    layer: Layer,
    visual: Option<VisualHandle>,
    creature: Option<Creature>,
    hero: Option<HeroProfile>,
    interactive: Option<Interactive>,
}

impl Being {
    fn base(kind: BeingKind, cell: CellCoord, layer: Layer) -> Self {
        Self {
            id: BeingId::new(),
            kind,
            name: kind.as_str().to_string(),
            cell,
            prev_cell: None,
            walkable: false,
            layer,
            visual: None,
            creature: None,
            hero: None,
            interactive: None,
        }
    }

    pub fn wall(cell: CellCoord) -> Self {
        Self::base(BeingKind::Wall, cell, Layer::Structures)
    }

    pub fn door(cell: CellCoord, destination: DoorDestination) -> Self {
        let mut door = Self::base(BeingKind::Door, cell, Layer::Structures);
        door.interactive = Some(Interactive::new(ClickAction::Travel(destination)));
        door
    }

    /// A hero from roster data; health at or below zero yields a dead hero
    pub fn hero(cell: CellCoord, data: &HeroData, wait: u32) -> Result<Self> {
        let profile = HeroProfile::from_data(data)?;
        let stats = Stats::from_partial(&data.stats);

        let mut hero = Self::base(BeingKind::Hero, cell, Layer::Creatures);
        hero.name = data.name.clone();
        hero.creature = Some(Creature::new(stats, wait));
        hero.hero = Some(profile);
        Ok(hero)
    }

    pub fn skeleton<R: Rng + ?Sized>(cell: CellCoord, level: i32, wait: u32, rng: &mut R) -> Self {
        let mut skeleton = Self::base(BeingKind::Skeleton, cell, Layer::Creatures);
        skeleton.name = skeleton::SKELETON_NAME.to_string();
        skeleton.creature = Some(skeleton::roll_creature(level, wait, rng));
        skeleton
    }

    /// Validate a definition against the grid and build the being it describes
    pub fn from_def<R: Rng + ?Sized>(
        def: &BeingDef,
        grid: &Grid,
        config: &EngineConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let kind_name = def.kind.as_deref().ok_or(EngineError::MissingField("type"))?;
        let kind: BeingKind = kind_name.parse()?;
        let x = def.x.ok_or(EngineError::MissingField("x"))?;
        let y = def.y.ok_or(EngineError::MissingField("y"))?;

        if !grid.is_within(x, y) {
            return Err(EngineError::OutOfBounds {
                kind: kind.to_string(),
                x,
                y,
            });
        }
        let cell = CellCoord::new(x as u32, y as u32);

        match kind {
            BeingKind::Wall => Ok(Being::wall(cell)),
            BeingKind::Door => {
                let raw = def
                    .data
                    .get("destination")
                    .ok_or(EngineError::MissingField("destination"))?;
                let destination: DoorDestination =
                    serde_json::from_value(raw.clone()).map_err(|err| {
                        EngineError::InvalidField {
                            field: "destination",
                            reason: err.to_string(),
                        }
                    })?;
                Ok(Being::door(cell, destination))
            }
            BeingKind::Hero => {
                // Either nested under "data" or flattened next to type/x/y
                let raw = match def.data.get("data") {
                    Some(nested) => nested.clone(),
                    None => Value::Object(def.data.clone()),
                };
                let data: HeroData =
                    serde_json::from_value(raw).map_err(|err| EngineError::InvalidField {
                        field: "data",
                        reason: err.to_string(),
                    })?;
                Being::hero(cell, &data, config.hero_wait)
            }
            BeingKind::Skeleton => {
                let level = match def.data.get("level") {
                    None => skeleton::DEFAULT_LEVEL,
                    Some(value) => value.as_i64().ok_or(EngineError::InvalidField {
                        field: "level",
                        reason: format!("expected an integer, found {}", value),
                    })? as i32,
                };
                Ok(Being::skeleton(cell, level, config.skeleton_wait, rng))
            }
        }
    }

    pub fn id(&self) -> BeingId {
        self.id
    }

    pub fn kind(&self) -> BeingKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cell(&self) -> CellCoord {
        self.cell
    }

    /// The cell this being stood on before its last move
    pub fn prev_cell(&self) -> Option<CellCoord> {
        self.prev_cell
    }

    pub fn set_cell(&mut self, cell: CellCoord) {
        self.prev_cell = Some(self.cell);
        self.cell = cell;
    }

    pub fn is_walkable(&self) -> bool {
        self.walkable
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn visual(&self) -> Option<VisualHandle> {
        self.visual
    }

    pub fn attach_visual(&mut self, handle: VisualHandle) {
        self.visual = Some(handle);
    }

    pub fn creature(&self) -> Option<&Creature> {
        self.creature.as_ref()
    }

    pub fn creature_mut(&mut self) -> Option<&mut Creature> {
        self.creature.as_mut()
    }

    pub fn is_creature(&self) -> bool {
        self.creature.is_some()
    }

    pub fn stats(&self) -> Option<&Stats> {
        self.creature.as_ref().map(|c| &c.stats)
    }

    /// Non-creatures never count as dead
    pub fn is_dead(&self) -> bool {
        self.creature.as_ref().is_some_and(Creature::is_dead)
    }

    pub fn is_alive_creature(&self) -> bool {
        self.creature.as_ref().is_some_and(|c| !c.is_dead())
    }

    pub fn hero_profile(&self) -> Option<&HeroProfile> {
        self.hero.as_ref()
    }

    pub fn interactive(&self) -> Option<&Interactive> {
        self.interactive.as_ref()
    }

    pub fn interactive_mut(&mut self) -> Option<&mut Interactive> {
        self.interactive.as_mut()
    }

    pub fn take_damage(&mut self, damage: Damage) -> DamageOutcome {
        match self.creature.as_mut() {
            Some(creature) => {
                let outcome = creature.take_damage(damage);
                if outcome.died() {
                    tracing::debug!("{} dies at {:?}", self.name, self.cell);
                }
                outcome
            }
            None => {
                tracing::warn!("{} cannot take damage", self.kind);
                DamageOutcome::Ignored
            }
        }
    }

    pub fn revive(&mut self) -> bool {
        self.creature.as_mut().is_some_and(Creature::revive)
    }

    /// Grant experience to a hero and return the levels gained
    ///
    /// Each level gained grows max health by what the vitality formula adds.
    pub fn add_exp(&mut self, amount: u32) -> u32 {
        let (Some(profile), Some(creature)) = (self.hero.as_mut(), self.creature.as_mut()) else {
            return 0;
        };
        let levels = profile.levelling.add_exp(amount);
        creature.stats.gain_levels(levels);
        levels
    }

    /// Roster record of a hero in its current state
    pub fn hero_data(&self) -> Option<HeroData> {
        let profile = self.hero.as_ref()?;
        let creature = self.creature.as_ref()?;
        let stats = match creature.stats.save() {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Some(HeroData {
            name: self.name.clone(),
            attrs: profile.attrs.clone(),
            stats,
            abilities: profile.ability_ids(),
            levelling: Some(profile.levelling.clone()),
        })
    }

    /// Definition that recreates this being, or None for transient beings
    pub fn save(&self) -> Option<BeingDef> {
        let def = BeingDef::new(self.kind, i64::from(self.cell.x), i64::from(self.cell.y));

        match self.kind {
            BeingKind::Wall => Some(def),
            BeingKind::Door => {
                let ClickAction::Travel(destination) = self.interactive.as_ref()?.action();
                let destination = serde_json::to_value(destination).ok()?;
                Some(def.with("destination", destination))
            }
            BeingKind::Hero => {
                let Value::Object(fields) = serde_json::to_value(self.hero_data()?).ok()? else {
                    return None;
                };
                Some(fields.into_iter().fold(def, |def, (key, value)| def.with(&key, value)))
            }
            BeingKind::Skeleton => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::json;

    fn def(value: Value) -> BeingDef {
        serde_json::from_value(value).unwrap()
    }

    fn build(value: Value) -> Result<Being> {
        let grid = Grid::new(10, 8);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        Being::from_def(&def(value), &grid, &EngineConfig::default(), &mut rng)
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        assert!(matches!(
            build(json!({ "x": 1, "y": 1 })),
            Err(EngineError::MissingField("type"))
        ));
        assert!(matches!(
            build(json!({ "type": "Wall", "y": 1 })),
            Err(EngineError::MissingField("x"))
        ));
        assert!(matches!(
            build(json!({ "type": "Door", "x": 1, "y": 1 })),
            Err(EngineError::MissingField("destination"))
        ));
    }

    #[test]
    fn test_unknown_type_and_out_of_bounds() {
        assert!(matches!(
            build(json!({ "type": "Dragon", "x": 1, "y": 1 })),
            Err(EngineError::UnknownBeingType(name)) if name == "Dragon"
        ));
        assert!(matches!(
            build(json!({ "type": "Wall", "x": 10, "y": 0 })),
            Err(EngineError::OutOfBounds { x: 10, y: 0, .. })
        ));
    }

    #[test]
    fn test_wall_round_trips_through_save() {
        let wall = build(json!({ "type": "Wall", "x": 3, "y": 4 })).unwrap();
        assert!(!wall.is_walkable());
        assert_eq!(wall.layer(), Layer::Structures);
        assert_eq!(wall.save(), Some(BeingDef::new(BeingKind::Wall, 3, 4)));
    }

    #[test]
    fn test_door_save_keeps_destination() {
        let door = build(json!({
            "type": "Door", "x": 0, "y": 2,
            "destination": { "level": 1, "x": 5, "y": 5 }
        }))
        .unwrap();

        let saved = door.save().unwrap();
        assert_eq!(saved.data["destination"], json!({ "level": 1, "x": 5, "y": 5 }));
    }

    #[test]
    fn test_hero_save_includes_roster_fields() {
        let hero = build(json!({
            "type": "Hero", "x": 2, "y": 2,
            "data": {
                "name": "Marty",
                "stats": { "health": 30, "maxHealth": 36, "strength": 50 },
                "abilities": ["attack", "skip"]
            }
        }))
        .unwrap();

        assert_eq!(hero.name(), "Marty");
        assert_eq!(hero.layer(), Layer::Creatures);

        let saved = hero.save().unwrap();
        assert_eq!(saved.kind.as_deref(), Some("Hero"));
        assert_eq!(saved.data["name"], "Marty");
        assert_eq!(saved.data["stats"]["health"], 30);
        assert_eq!(saved.data["abilities"], json!(["attack", "skip"]));
        assert_eq!(saved.data["levelling"]["nextLevel"], 10);

        // A flattened save loads back into the same hero
        let reloaded = build(serde_json::to_value(&saved).unwrap()).unwrap();
        assert_eq!(reloaded.hero_data(), hero.hero_data());
    }

    #[test]
    fn test_hero_created_dead_when_health_is_zero() {
        let hero = build(json!({
            "type": "Hero", "x": 0, "y": 0,
            "data": { "name": "Mia", "stats": { "health": 0, "maxHealth": 20 } }
        }))
        .unwrap();
        assert!(hero.is_dead());
    }

    #[test]
    fn test_skeletons_do_not_save() {
        let skeleton = build(json!({ "type": "Skeleton", "x": 4, "y": 4, "level": 2 })).unwrap();
        assert_eq!(skeleton.stats().map(|s| s.level), Some(2));
        assert!(skeleton.kind().is_enemy());
        assert_eq!(skeleton.save(), None);
    }

    #[test]
    fn test_set_cell_remembers_previous() {
        let mut wall = Being::wall(CellCoord::new(1, 1));
        assert_eq!(wall.prev_cell(), None);
        wall.set_cell(CellCoord::new(2, 1));
        assert_eq!(wall.prev_cell(), Some(CellCoord::new(1, 1)));
    }

    #[test]
    fn test_add_exp_raises_stat_level() {
        let data: HeroData = serde_json::from_value(json!({ "name": "Carlie" })).unwrap();
        let mut hero = Being::hero(CellCoord::new(0, 0), &data, 5).unwrap();

        assert_eq!(hero.add_exp(10), 1);
        assert_eq!(hero.stats().map(|s| s.level), Some(2));
        assert_eq!(Being::wall(CellCoord::new(0, 0)).add_exp(10), 0);
    }

    #[test]
    fn test_level_up_grows_max_health() {
        let data: HeroData = serde_json::from_value(json!({
            "name": "Mia",
            "stats": { "vitality": 12, "health": 30, "maxHealth": 40 }
        }))
        .unwrap();
        let mut hero = Being::hero(CellCoord::new(0, 0), &data, 5).unwrap();

        assert_eq!(hero.add_exp(4), 0);
        assert_eq!(hero.stats().map(|s| s.max_health), Some(40));

        // Level 1 to 2 adds 12 * 0.25 on top of the roster value
        assert_eq!(hero.add_exp(6), 1);
        let stats = hero.stats().unwrap();
        assert_eq!(stats.level, 2);
        assert_eq!(stats.max_health, 43);
        assert_eq!(stats.health, 30);
    }

    #[test]
    fn test_hero_profile_facet() {
        let data: HeroData = serde_json::from_value(json!({
            "name": "Marty",
            "abilities": ["attack", "skip"]
        }))
        .unwrap();
        let hero = Being::hero(CellCoord::new(2, 1), &data, 5).unwrap();

        let profile = hero.hero_profile().unwrap();
        assert!(profile.knows(crate::abilities::AbilityKind::Attack));
        assert_eq!(profile.ability_ids(), vec!["attack", "skip"]);
        assert_eq!(profile.levelling.next_level, 10);
        assert!(Being::wall(CellCoord::new(0, 0)).hero_profile().is_none());
    }

    #[test]
    fn test_layer_names() {
        assert_eq!("creatures".parse::<Layer>().unwrap(), Layer::Creatures);
        assert!(matches!(
            "sky".parse::<Layer>(),
            Err(EngineError::UnknownLayer(name)) if name == "sky"
        ));
    }
}
