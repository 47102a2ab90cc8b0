//! Headless frontend that plays the party's side on its own
//!
//! Heroes bandage a badly hurt ally when they can and attack a random living
//! enemy otherwise.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::abilities::{Ability, AbilityKind};
use crate::battle::{Battle, BattleResult};
use crate::beings::{Being, Beings};
use crate::core::types::BeingId;
use crate::grid::CellCoord;
use crate::interface::{ActionMenu, Feedback, TargetSource};
use crate::stats::Damage;

/// Health fraction under which an ally gets bandaged
const HEAL_BELOW: f32 = 0.5;

/// What the autopilot saw happen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub steps: u32,
    pub hits: u32,
    pub misses: u32,
    pub damage_dealt: u32,
    pub health_restored: u32,
    pub victories: u32,
    pub defeats: u32,
}

#[derive(Debug, Clone)]
pub struct AutoPilot {
    rng: ChaCha8Rng,
    step_delay: Option<Duration>,
    tally: Tally,
}

impl AutoPilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            step_delay: None,
            tally: Tally::default(),
        }
    }

    /// Sleep this long after every party step
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = Some(delay);
        self
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    fn living(ids: &[BeingId], beings: &Beings) -> Vec<BeingId> {
        ids.iter().copied().filter(|&id| beings.is_alive(id)).collect()
    }

    fn most_wounded<'b>(battle: &Battle, beings: &'b Beings) -> Option<&'b Being> {
        Self::living(battle.heroes(), beings)
            .into_iter()
            .filter_map(|id| beings.get(id))
            .filter(|hero| hero.creature().is_some_and(|c| c.health_percentage() < HEAL_BELOW))
            .min_by(|a, b| {
                let health = |being: &Being| being.creature().map_or(1.0, |c| c.health_percentage());
                health(a).total_cmp(&health(b))
            })
    }
}

impl ActionMenu for AutoPilot {
    async fn choose_ability(&mut self, hero: &Being, battle: &Battle, beings: &Beings) -> AbilityKind {
        let Some(profile) = hero.hero_profile() else {
            return AbilityKind::Skip;
        };

        if profile.knows(AbilityKind::Bandage) && Self::most_wounded(battle, beings).is_some() {
            return AbilityKind::Bandage;
        }
        if profile.knows(AbilityKind::Attack) {
            return AbilityKind::Attack;
        }
        profile.abilities.first().copied().unwrap_or(AbilityKind::Skip)
    }
}

impl TargetSource for AutoPilot {
    async fn select_cell(
        &mut self,
        actor: &Being,
        ability: &Ability,
        battle: &Battle,
        beings: &Beings,
    ) -> CellCoord {
        let target = match ability.kind {
            AbilityKind::Bandage => Self::most_wounded(battle, beings).map(Being::id),
            AbilityKind::Attack => Self::living(battle.enemies(), beings)
                .choose(&mut self.rng)
                .copied(),
            AbilityKind::Skip => None,
        };

        target
            .and_then(|id| beings.get(id))
            .map_or(actor.cell(), Being::cell)
    }
}

impl Feedback for AutoPilot {
    async fn show_damage(&mut self, target: &Being, damage: Damage) {
        if damage.is_healing() {
            self.tally.health_restored += damage.absolute() as u32;
        } else {
            self.tally.hits += 1;
            self.tally.damage_dealt += damage.absolute() as u32;
        }
        tracing::debug!("{} takes {}", target.name(), damage.amount());
    }

    async fn show_text(&mut self, cell: CellCoord, text: &str) {
        self.tally.misses += 1;
        tracing::debug!("{} at {:?}", text, cell);
    }

    async fn step(&mut self, _cell: CellCoord) {
        self.tally.steps += 1;
        if let Some(delay) = self.step_delay {
            tokio::time::sleep(delay).await;
        }
    }

    async fn victory(&mut self, result: &BattleResult) {
        self.tally.victories += 1;
        tracing::info!("Battle won for {} exp", result.exp);
    }

    async fn game_over(&mut self, _result: &BattleResult) {
        self.tally.defeats += 1;
        tracing::info!("The party has fallen");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beings::HeroData;
    use crate::core::config::EngineConfig;
    use serde_json::json;

    fn hero(beings: &mut Beings, x: u32, health: i32) -> BeingId {
        let data: HeroData = serde_json::from_value(json!({
            "name": "Carlie",
            "stats": { "health": health, "maxHealth": 20 },
            "abilities": ["attack", "bandage"]
        }))
        .unwrap();
        beings.insert(Being::hero(CellCoord::new(x, 0), &data, 5).unwrap())
    }

    #[tokio::test]
    async fn test_bandages_wounded_ally_first() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut beings = Beings::new();
        let medic = hero(&mut beings, 0, 20);
        let hurt = hero(&mut beings, 1, 4);
        let enemy = beings.insert(Being::skeleton(CellCoord::new(3, 0), 1, 6, &mut rng));
        let battle = Battle::new(vec![medic, hurt], vec![enemy], &beings, &EngineConfig::default());

        let mut pilot = AutoPilot::new(3);
        let actor = beings.get(medic).unwrap();
        let choice = pilot.choose_ability(actor, &battle, &beings).await;
        assert_eq!(choice, AbilityKind::Bandage);

        let cell = pilot.select_cell(actor, choice.ability(), &battle, &beings).await;
        assert_eq!(cell, CellCoord::new(1, 0));
    }

    #[tokio::test]
    async fn test_attacks_living_enemy() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut beings = Beings::new();
        let fighter = hero(&mut beings, 0, 20);
        let fallen = beings.insert(Being::skeleton(CellCoord::new(2, 0), 1, 6, &mut rng));
        let standing = beings.insert(Being::skeleton(CellCoord::new(4, 0), 1, 6, &mut rng));
        beings.get_mut(fallen).unwrap().take_damage(Damage::from_amount(500));
        let battle = Battle::new(vec![fighter], vec![fallen, standing], &beings, &EngineConfig::default());

        let mut pilot = AutoPilot::new(9);
        let actor = beings.get(fighter).unwrap();
        assert_eq!(pilot.choose_ability(actor, &battle, &beings).await, AbilityKind::Attack);
        for _ in 0..10 {
            let cell = pilot
                .select_cell(actor, AbilityKind::Attack.ability(), &battle, &beings)
                .await;
            assert_eq!(cell, CellCoord::new(4, 0));
        }
    }
}
