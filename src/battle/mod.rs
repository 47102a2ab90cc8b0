//! Turn-based battles between the party and an encounter
//!
//! A battle owns the combatant lists and the timeline. Creatures themselves stay
//! in the world's registry; each cycle checks victory and defeat, picks the next
//! actor and awaits its turn before anything else happens.

pub mod context;
pub mod scheduler;
pub mod turn;

pub use context::TurnContext;
pub use scheduler::{Pace, Timeline, TimelineEntry};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::beings::Beings;
use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::BeingId;
use crate::interface::Frontend;
use crate::world::events::WorldEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleOutcome {
    Victory,
    Defeat,
}

/// Rewards collected over the battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BattleResult {
    pub exp: u32,
}

#[derive(Debug, Clone)]
pub struct Battle {
    heroes: Vec<BeingId>,
    enemies: Vec<BeingId>,
    creatures: Vec<BeingId>,
    timeline: Timeline,
    result: BattleResult,
    outcome: Option<BattleOutcome>,
    turns: u32,
}

impl Battle {
    /// Heroes in roster order, then enemies in spawn order
    ///
    /// Only creatures alive at the start get a timeline entry.
    pub fn new(
        heroes: Vec<BeingId>,
        enemies: Vec<BeingId>,
        beings: &Beings,
        config: &EngineConfig,
    ) -> Self {
        let creatures: Vec<BeingId> = heroes.iter().chain(enemies.iter()).copied().collect();
        let timeline = Timeline::new(
            creatures.iter().copied().filter(|&id| beings.is_alive(id)),
            config.turn_threshold,
        );

        Self {
            heroes,
            enemies,
            creatures,
            timeline,
            result: BattleResult {
                exp: config.base_exp_reward,
            },
            outcome: None,
            turns: 0,
        }
    }

    pub fn heroes(&self) -> &[BeingId] {
        &self.heroes
    }

    pub fn enemies(&self) -> &[BeingId] {
        &self.enemies
    }

    pub fn creatures(&self) -> &[BeingId] {
        &self.creatures
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn result(&self) -> &BattleResult {
        &self.result
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Turns taken so far
    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// Take `enemy` out of the enemy list, the creature list and the timeline
    ///
    /// Matches the exact id; anything that is not one of this battle's enemies
    /// leaves the battle untouched.
    pub fn remove_enemy(&mut self, enemy: BeingId) -> bool {
        if !self.enemies.contains(&enemy) {
            tracing::debug!("{:?} is not an enemy in this battle", enemy);
            return false;
        }

        self.enemies.retain(|&id| id != enemy);
        self.creatures.retain(|&id| id != enemy);
        self.timeline.remove(enemy);
        true
    }

    /// Victory once no enemy remains, defeat once every hero is dead
    pub fn check_outcome(&self, beings: &Beings) -> Option<BattleOutcome> {
        if self.enemies.is_empty() {
            Some(BattleOutcome::Victory)
        } else if self.heroes.iter().all(|&id| !beings.is_alive(id)) {
            Some(BattleOutcome::Defeat)
        } else {
            None
        }
    }

    /// Next creature to act; a finished battle schedules nobody
    pub fn next_actor(&mut self, beings: &Beings) -> Option<BeingId> {
        if self.is_finished() {
            return None;
        }

        self.timeline.next_actor(|id| {
            beings
                .get(id)
                .and_then(|being| being.creature())
                .map(|creature| Pace {
                    wait: creature.wait,
                    alive: !creature.is_dead(),
                })
        })
    }

    /// One scheduling cycle: outcome check, then at most one turn
    ///
    /// Returns the outcome once the battle is over. A battle that has combatants
    /// left but nobody able to act is reported as `EngineError::StuckBattle`.
    pub async fn advance<U: Frontend>(
        &mut self,
        ctx: &mut TurnContext<'_>,
        ui: &mut U,
    ) -> Result<Option<BattleOutcome>> {
        if let Some(outcome) = self.outcome {
            return Ok(Some(outcome));
        }

        if let Some(outcome) = self.check_outcome(ctx.beings) {
            self.finish(outcome, ctx);
            return Ok(Some(outcome));
        }

        let Some(actor) = self.next_actor(ctx.beings) else {
            tracing::error!(
                "Stuck battle: {} creatures, {} timeline entries, nobody can act",
                self.creatures.len(),
                self.timeline.len()
            );
            return Err(EngineError::StuckBattle {
                remaining: self.creatures.len(),
            });
        };

        tracing::debug!("Turn {}: {:?} acts", self.turns + 1, actor);
        let died = turn::take_turn(actor, self, ctx, ui).await;
        self.turns += 1;

        for id in died {
            self.handle_death(id, ctx);
        }

        Ok(None)
    }

    /// Drive the battle until victory or defeat
    pub async fn run<U: Frontend>(
        &mut self,
        ctx: &mut TurnContext<'_>,
        ui: &mut U,
    ) -> Result<BattleOutcome> {
        loop {
            if let Some(outcome) = self.advance(ctx, ui).await? {
                return Ok(outcome);
            }
        }
    }

    /// Slain enemies pay out and leave the battle and the level
    ///
    /// Fallen heroes only lose their timeline entry; they stay in the roster
    /// and on the level.
    fn handle_death(&mut self, id: BeingId, ctx: &mut TurnContext<'_>) {
        if !self.enemies.contains(&id) {
            self.timeline.remove(id);
            return;
        }

        let reward = ctx
            .beings
            .get(id)
            .and_then(|b| b.creature())
            .map_or(0, |c| c.exp_reward);
        self.result.exp += reward;

        self.remove_enemy(id);
        ctx.beings.remove(id);
    }

    fn finish(&mut self, outcome: BattleOutcome, ctx: &mut TurnContext<'_>) {
        self.outcome = Some(outcome);

        match outcome {
            BattleOutcome::Victory => {
                tracing::info!("Victory after {} turns, {} exp", self.turns, self.result.exp);
                ctx.events.push(WorldEvent::Victory {
                    exp: self.result.exp,
                });
            }
            BattleOutcome::Defeat => {
                tracing::info!("Defeat after {} turns", self.turns);
                ctx.events.push(WorldEvent::Defeat);
            }
        }
    }

    pub fn random_hero<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<BeingId> {
        self.heroes.choose(rng).copied()
    }

    pub fn random_enemy<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<BeingId> {
        self.enemies.choose(rng).copied()
    }

    pub fn random_alive_hero<R: Rng + ?Sized>(&self, beings: &Beings, rng: &mut R) -> Option<BeingId> {
        let alive: Vec<BeingId> = self
            .heroes
            .iter()
            .copied()
            .filter(|&id| beings.is_alive(id))
            .collect();
        alive.choose(rng).copied()
    }
}
