//! The world: loaded level, live beings, the party and the state machine
//!
//! `Idle` waits for interactions. Clicking an empty reachable cell walks the
//! party there (`Walking`); a due random encounter stops the walk and opens a
//! `Battle`, which `run_battle` resolves. Victory returns to `Idle`, defeat ends
//! the session in `Defeated`.

pub mod encounter;
pub mod events;
pub mod level;
pub mod party;

pub use encounter::EncounterCounter;
pub use events::{EventLog, WorldEvent};
pub use level::{DoorDef, EnemyDef, LevelDef, PartyDef, SaveDef};
pub use party::Party;

use std::ops::ControlFlow;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use serde_json::Value;

use crate::battle::{Battle, BattleOutcome, TurnContext};
use crate::beings::{skeleton, Being, BeingDef, BeingKind, Beings, ClickAction, Interactive, Layer};
use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::BeingId;
use crate::grid::{CellCoord, Grid, StepDriver};
use crate::interface::{Feedback, Frontend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WorldState {
    Idle,
    Walking,
    Battle,
    /// The party fell; only a new `load` leaves this state
    Defeated,
}

/// What an interaction led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Broadcast only; nothing changed
    Ignored,
    /// No walkable route to the clicked cell
    Unreachable,
    /// The party walked the whole path
    Walked { to: CellCoord },
    /// A random encounter stopped the walk on `at`
    Encounter { at: CellCoord },
    /// A door took the party to another level
    Travelled { level: usize },
}

pub struct World {
    config: EngineConfig,
    rng: ChaCha8Rng,
    levels: Vec<LevelDef>,
    level: Option<usize>,
    grid: Option<Grid>,
    beings: Beings,
    party: Option<Party>,
    state: WorldState,
    battle: Option<Battle>,
    encounter: EncounterCounter,
    events: EventLog,
}

impl World {
    /// A world over a campaign of levels; nothing is loaded yet
    pub fn new(config: EngineConfig, levels: Vec<LevelDef>) -> Result<Self> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let encounter = EncounterCounter::new(config.encounter_steps, &mut rng);

        Ok(Self {
            config,
            rng,
            levels,
            level: None,
            grid: None,
            beings: Beings::new(),
            party: None,
            state: WorldState::Idle,
            battle: None,
            encounter,
            events: EventLog::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> WorldState {
        self.state
    }

    pub fn level_index(&self) -> Option<usize> {
        self.level
    }

    pub fn level_def(&self) -> Option<&LevelDef> {
        self.level.and_then(|index| self.levels.get(index))
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn beings(&self) -> &Beings {
        &self.beings
    }

    pub fn beings_mut(&mut self) -> &mut Beings {
        &mut self.beings
    }

    pub fn party(&self) -> Option<&Party> {
        self.party.as_ref()
    }

    pub fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    pub fn encounter(&self) -> &EncounterCounter {
        &self.encounter
    }

    pub fn events(&self) -> &[WorldEvent] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        self.events.drain()
    }

    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    fn set_state(&mut self, to: WorldState) {
        let from = self.state;
        if from == to {
            return;
        }
        tracing::debug!("World state {:?} -> {:?}", from, to);
        self.state = to;
        self.events.push(WorldEvent::State { from, to });
    }

    /// Load level `index` and place the party on it
    ///
    /// The level is built aside first. Whatever was loaded before is only
    /// unloaded once every definition and the party placement succeeded.
    pub fn load(&mut self, index: usize, party: PartyDef) -> Result<()> {
        let level = self
            .levels
            .get(index)
            .ok_or(EngineError::UnknownLevel(index))?;
        level.check_enemies()?;

        let grid = Grid::new(level.width, level.height);
        let mut beings = Beings::new();
        for def in &level.beings {
            let being = Being::from_def(def, &grid, &self.config, &mut self.rng)?;
            place(&mut beings, being)?;
        }
        for door in &level.doors {
            let def = BeingDef::new(BeingKind::Door, door.x, door.y)
                .with("destination", door.destination.clone());
            let being = Being::from_def(&def, &grid, &self.config, &mut self.rng)?;
            place(&mut beings, being)?;
        }
        let party = spawn_party(&grid, &mut beings, &party, &self.config)?;
        let (width, height) = (level.width, level.height);

        self.unload();
        self.level = Some(index);
        self.grid = Some(grid);
        self.beings = beings;
        self.party = Some(party);

        self.encounter.reseed(&mut self.rng);
        self.set_state(WorldState::Idle);
        self.update_proximity();

        tracing::info!(
            "Loaded level {} ({}x{}, {} beings)",
            index,
            width,
            height,
            self.beings.len()
        );
        self.events.push(WorldEvent::Load { level: index });
        Ok(())
    }

    /// Drop the loaded level with every being on it
    pub fn unload(&mut self) {
        let Some(level) = self.level.take() else {
            return;
        };

        self.beings.clear();
        self.battle = None;
        self.party = None;
        self.grid = None;
        self.set_state(WorldState::Idle);

        tracing::info!("Unloaded level {}", level);
        self.events.push(WorldEvent::Unload { level });
    }

    /// Build a being from its definition and add it to the level
    ///
    /// Missing fields, unknown types, out-of-bounds coordinates and occupied
    /// cells are rejected.
    pub fn create(&mut self, def: &BeingDef) -> Result<BeingId> {
        let grid = self.grid.as_ref().ok_or(EngineError::NoLevelLoaded)?;
        let being = Being::from_def(def, grid, &self.config, &mut self.rng)?;
        place(&mut self.beings, being)
    }

    pub fn destroy(&mut self, id: BeingId) -> Option<Being> {
        self.beings.remove(id)
    }

    /// Persistent beings of the loaded level
    pub fn save(&self) -> Result<SaveDef> {
        let grid = self.grid.as_ref().ok_or(EngineError::NoLevelLoaded)?;
        Ok(SaveDef {
            width: grid.width(),
            height: grid.height(),
            beings: self.beings.iter().filter_map(Being::save).collect(),
        })
    }

    /// Beings on the layer called `name`
    pub fn layer(&self, name: &str) -> Result<Vec<&Being>> {
        let layer: Layer = name.parse()?;
        Ok(self.beings.on_layer(layer).collect())
    }

    pub fn hover(&mut self, cell: CellCoord) {
        self.events.push(WorldEvent::Hover { cell });
    }

    /// Bring a dead creature back with 1 health
    pub fn revive(&mut self, id: BeingId) -> bool {
        let revived = self.beings.get_mut(id).is_some_and(Being::revive);
        if revived {
            self.events.push(WorldEvent::Revive { being: id });
        }
        revived
    }

    /// Handle a click on `cell`
    ///
    /// Always broadcast. Occupied cells go to the occupant's click handler
    /// (idle or in battle); empty cells start a walk while idle.
    pub async fn interact<F: Feedback>(&mut self, cell: CellCoord, ui: &mut F) -> Result<Interaction> {
        self.events.push(WorldEvent::Interact { cell });

        let grid = self.grid.as_ref().ok_or(EngineError::NoLevelLoaded)?;
        if !grid.contains(cell) {
            tracing::warn!("Interaction outside the level at {:?}", cell);
            return Ok(Interaction::Ignored);
        }

        match self.state {
            WorldState::Walking | WorldState::Defeated => Ok(Interaction::Ignored),
            WorldState::Idle | WorldState::Battle => {
                if let Some(occupant) = self.beings.occupant(cell) {
                    let id = occupant.id();
                    return self.click(id);
                }
                if self.state == WorldState::Idle {
                    self.walk_to(cell, ui).await
                } else {
                    Ok(Interaction::Ignored)
                }
            }
        }
    }

    fn click(&mut self, id: BeingId) -> Result<Interaction> {
        let action = self
            .beings
            .get(id)
            .and_then(Being::interactive)
            .and_then(Interactive::click);

        match action {
            Some(ClickAction::Travel(destination)) => {
                let level = destination.level;
                if level >= self.levels.len() {
                    return Err(EngineError::UnknownLevel(level));
                }

                let heroes = self
                    .party
                    .as_ref()
                    .map(|party| party.save(&self.beings))
                    .unwrap_or_default();
                let party = PartyDef {
                    x: i64::from(destination.x),
                    y: i64::from(destination.y),
                    heroes,
                };

                tracing::info!("Travelling to level {} at {:?}", level, destination.cell());
                self.load(level, party)?;
                Ok(Interaction::Travelled { level })
            }
            None => Ok(Interaction::Ignored),
        }
    }

    async fn walk_to<F: Feedback>(&mut self, goal: CellCoord, ui: &mut F) -> Result<Interaction> {
        let start = self
            .party
            .as_ref()
            .and_then(|party| party.leader_cell(&self.beings))
            .ok_or(EngineError::NoLevelLoaded)?;

        let path = {
            let grid = self.grid.as_ref().ok_or(EngineError::NoLevelLoaded)?;
            grid.path(self.beings.blocking_cells(), start, goal).shift(1)
        };
        if path.is_empty() {
            tracing::debug!("No route from {:?} to {:?}", start, goal);
            return Ok(Interaction::Unreachable);
        }

        self.set_state(WorldState::Walking);

        let mut walker = Walker {
            world: &mut *self,
            ui: &mut *ui,
            encounter: None,
            error: None,
        };
        let last = path.follow(&mut walker).await;
        let Walker {
            encounter, error, ..
        } = walker;

        if let Some(err) = error {
            self.set_state(WorldState::Idle);
            return Err(err);
        }

        match encounter {
            Some(at) => Ok(Interaction::Encounter { at }),
            None => {
                self.set_state(WorldState::Idle);
                Ok(Interaction::Walked {
                    to: last.unwrap_or(start),
                })
            }
        }
    }

    fn step_party(&mut self, cell: CellCoord) {
        if let Some(party) = self.party.as_ref() {
            party.move_to(cell, &mut self.beings);
        }
        self.update_proximity();
        tracing::trace!("Party steps onto {:?}", cell);
    }

    /// Interactive beings next to the leader are approached, all others left
    fn update_proximity(&mut self) {
        let Some(leader) = self
            .party
            .as_ref()
            .and_then(|party| party.leader_cell(&self.beings))
        else {
            return;
        };

        for being in self.beings.iter_mut() {
            let own = being.cell();
            if let Some(interactive) = being.interactive_mut() {
                if Interactive::in_reach(own, leader) {
                    if interactive.approach() {
                        tracing::debug!("Within reach of {:?}", own);
                    }
                } else {
                    interactive.leave();
                }
            }
        }
    }

    /// Count a step; true once an encounter has started
    fn tick_encounter(&mut self) -> Result<bool> {
        if !self.level_def().is_some_and(LevelDef::has_encounters) {
            return Ok(false);
        }
        if !self.encounter.tick() {
            return Ok(false);
        }
        self.encounter.reseed(&mut self.rng);
        self.start_encounter()
    }

    /// Spawn enemies around the leader and open a battle
    ///
    /// Skipped, returning false, when no free cell is in range.
    pub fn start_encounter(&mut self) -> Result<bool> {
        let table = self
            .level_def()
            .map(|level| level.enemies.clone())
            .unwrap_or_default();
        let party = self.party.clone().ok_or(EngineError::NoLevelLoaded)?;
        let leader = party
            .leader_cell(&self.beings)
            .ok_or(EngineError::NoLevelLoaded)?;

        let mut spots = {
            let grid = self.grid.as_ref().ok_or(EngineError::NoLevelLoaded)?;
            grid.cluster(leader, self.config.spawn_radius)
                .filter(|&cell| self.beings.is_empty_cell(cell))
        };

        let [low, high] = self.config.encounter_size;
        let count = self.rng.gen_range(low..=high);

        let mut enemies = Vec::new();
        for _ in 0..count {
            let Some(cell) = spots.take_random(&mut self.rng) else {
                break;
            };
            let Some(entry) = table.choose(&mut self.rng) else {
                break;
            };

            let level = skeleton::roll_level(entry.level_range, &mut self.rng);
            let def = BeingDef {
                kind: Some(entry.kind.clone()),
                x: Some(i64::from(cell.x)),
                y: Some(i64::from(cell.y)),
                data: Default::default(),
            }
            .with("level", Value::from(level));

            let spawned = self.create(&def).and_then(|id| {
                if self.beings.get(id).is_some_and(|b| b.kind().is_enemy()) {
                    return Ok(id);
                }
                self.beings.remove(id);
                Err(EngineError::InvalidField {
                    field: "enemies",
                    reason: format!("{} is not an enemy type", entry.kind),
                })
            });
            match spawned {
                Ok(id) => enemies.push(id),
                Err(err) => {
                    tracing::warn!("Encounter aborted, removing {} spawned enemies", enemies.len());
                    for id in enemies {
                        self.beings.remove(id);
                    }
                    return Err(err);
                }
            }
        }

        if enemies.is_empty() {
            tracing::warn!("No room for an encounter around {:?}, skipping", leader);
            return Ok(false);
        }

        tracing::info!("Encounter: {} enemies around {:?}", enemies.len(), leader);
        let battle = Battle::new(party.heroes().to_vec(), enemies.clone(), &self.beings, &self.config);
        self.battle = Some(battle);
        self.set_state(WorldState::Battle);
        self.events.push(WorldEvent::StartBattle {
            heroes: party.heroes().to_vec(),
            enemies,
        });
        Ok(true)
    }

    /// Fight the open battle to its end
    ///
    /// Returns None when no battle is open. A stuck battle stays open and is
    /// returned as an error.
    pub async fn run_battle<U: Frontend>(&mut self, ui: &mut U) -> Result<Option<BattleOutcome>> {
        let Some(mut battle) = self.battle.take() else {
            return Ok(None);
        };

        let outcome = {
            let mut ctx = TurnContext::new(
                &mut self.beings,
                &mut self.rng,
                &mut self.events,
                &self.config,
            );
            battle.run(&mut ctx, ui).await
        };
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                self.battle = Some(battle);
                return Err(err);
            }
        };

        let result = *battle.result();
        match outcome {
            BattleOutcome::Victory => {
                for &id in battle.heroes() {
                    self.award_exp(id, result.exp);
                }
                ui.victory(&result).await;
                self.set_state(WorldState::Idle);
            }
            BattleOutcome::Defeat => {
                ui.game_over(&result).await;
                self.set_state(WorldState::Defeated);
            }
        }

        Ok(Some(outcome))
    }

    fn award_exp(&mut self, hero: BeingId, exp: u32) {
        let Some(being) = self.beings.get_mut(hero) else {
            return;
        };
        if being.is_dead() {
            return;
        }

        if being.add_exp(exp) > 0 {
            let level = being.stats().map_or(1, |s| s.level);
            tracing::info!("{} reached level {}", being.name(), level);
            self.events.push(WorldEvent::LevelUp { hero, level });
        }
    }
}

fn place(beings: &mut Beings, being: Being) -> Result<BeingId> {
    let cell = being.cell();
    if beings.occupant(cell).is_some() {
        return Err(EngineError::CellOccupied(cell));
    }
    Ok(beings.insert(being))
}

/// Leader on the descriptor's cell, followers on the nearest free cells
fn spawn_party(grid: &Grid, beings: &mut Beings, def: &PartyDef, config: &EngineConfig) -> Result<Party> {
    let (leader_data, followers) = def.heroes.split_first().ok_or(EngineError::EmptyParty)?;

    if !grid.is_within(def.x, def.y) {
        return Err(EngineError::OutOfBounds {
            kind: BeingKind::Hero.to_string(),
            x: def.x,
            y: def.y,
        });
    }
    let origin = CellCoord::new(def.x as u32, def.y as u32);

    let mut heroes = Vec::with_capacity(def.heroes.len());
    heroes.push(place(beings, Being::hero(origin, leader_data, config.hero_wait)?)?);

    for data in followers {
        let cell = free_cells_near(grid, beings, origin)
            .first()
            .copied()
            .ok_or_else(|| EngineError::InvalidField {
                field: "heroes",
                reason: format!("no free cell left for {}", data.name),
            })?;
        heroes.push(place(beings, Being::hero(cell, data, config.hero_wait)?)?);
    }

    Party::new(heroes)
}

/// Empty walkable cells ordered by distance from `origin`
fn free_cells_near(grid: &Grid, beings: &Beings, origin: CellCoord) -> Vec<CellCoord> {
    let radius = (grid.width() + grid.height()) as f32;
    grid.cluster(origin, radius)
        .filter(|&cell| beings.is_empty_cell(cell))
        .nearest_first(origin)
        .cells()
        .to_vec()
}

/// Steps the party along a path, one awaited cell at a time
struct Walker<'w, F> {
    world: &'w mut World,
    ui: &'w mut F,
    encounter: Option<CellCoord>,
    error: Option<EngineError>,
}

impl<F: Feedback> StepDriver for Walker<'_, F> {
    async fn step(&mut self, cell: CellCoord) -> ControlFlow<()> {
        self.world.step_party(cell);
        self.ui.step(cell).await;

        match self.world.tick_encounter() {
            Ok(false) => ControlFlow::Continue(()),
            Ok(true) => {
                self.encounter = Some(cell);
                ControlFlow::Break(())
            }
            Err(err) => {
                self.error = Some(err);
                ControlFlow::Break(())
            }
        }
    }
}
