//! Target acquisition for an ability invocation

use crate::abilities::{Ability, TargetingFlow};
use crate::battle::Battle;
use crate::beings::{Being, Beings};
use crate::core::types::BeingId;
use crate::grid::CellCoord;
use crate::interface::TargetSource;

/// What an ability's effect is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The acting creature alone
    Actor,
    Creature(BeingId),
    Cell(CellCoord),
}

/// Whether `being` is an acceptable creature target for `ability`
pub fn is_valid_creature_target(ability: &Ability, being: &Being) -> bool {
    being.is_creature() && (ability.allow_dead_targets || !being.is_dead())
}

/// Wait for a usable target according to the ability's flow
///
/// Invalid selections for creature-targeted abilities are rejected and the
/// source is asked again; the turn is never abandoned.
pub async fn acquire_target<S: TargetSource>(
    ability: &Ability,
    actor: &Being,
    battle: &Battle,
    beings: &Beings,
    source: &mut S,
) -> Target {
    match ability.flow {
        TargetingFlow::Untargeted => Target::Actor,
        TargetingFlow::CellTargeted => {
            Target::Cell(source.select_cell(actor, ability, battle, beings).await)
        }
        TargetingFlow::CreatureTargeted => loop {
            let cell = source.select_cell(actor, ability, battle, beings).await;

            match beings.occupant(cell) {
                Some(being) if is_valid_creature_target(ability, being) => {
                    break Target::Creature(being.id());
                }
                Some(being) => {
                    tracing::warn!(
                        "{} cannot target {} at {:?}",
                        ability.name,
                        being.name(),
                        cell
                    );
                }
                None => {
                    tracing::warn!("{} needs a creature, {:?} is empty", ability.name, cell);
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::AbilityKind;
    use crate::beings::HeroData;
    use crate::core::config::EngineConfig;
    use crate::stats::Damage;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::json;

    /// Answers with a fixed list of cells, counting how often it was asked
    struct Clicks {
        cells: Vec<CellCoord>,
        asked: usize,
    }

    impl TargetSource for Clicks {
        async fn select_cell(
            &mut self,
            _actor: &Being,
            _ability: &Ability,
            _battle: &Battle,
            _beings: &Beings,
        ) -> CellCoord {
            let cell = self.cells[self.asked.min(self.cells.len() - 1)];
            self.asked += 1;
            cell
        }
    }

    struct Scene {
        beings: Beings,
        battle: Battle,
        hero: BeingId,
        enemy: BeingId,
        wall: CellCoord,
    }

    fn scene() -> Scene {
        let config = EngineConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut beings = Beings::new();

        let data: HeroData = serde_json::from_value(json!({ "name": "Marty" })).unwrap();
        let hero = beings.insert(Being::hero(CellCoord::new(0, 0), &data, 5).unwrap());
        let enemy = beings.insert(Being::skeleton(CellCoord::new(2, 0), 1, 6, &mut rng));
        let wall = CellCoord::new(1, 1);
        beings.insert(Being::wall(wall));

        let battle = Battle::new(vec![hero], vec![enemy], &beings, &config);
        Scene {
            beings,
            battle,
            hero,
            enemy,
            wall,
        }
    }

    #[tokio::test]
    async fn test_creature_target_retries_until_valid() {
        let scene = scene();
        let actor = scene.beings.get(scene.hero).unwrap();
        let mut clicks = Clicks {
            cells: vec![CellCoord::new(5, 5), scene.wall, CellCoord::new(2, 0)],
            asked: 0,
        };

        let target = acquire_target(
            AbilityKind::Attack.ability(),
            actor,
            &scene.battle,
            &scene.beings,
            &mut clicks,
        )
        .await;

        assert_eq!(target, Target::Creature(scene.enemy));
        assert_eq!(clicks.asked, 3);
    }

    #[tokio::test]
    async fn test_dead_creatures_are_rejected() {
        let mut scene = scene();
        scene
            .beings
            .get_mut(scene.enemy)
            .unwrap()
            .take_damage(Damage::from_amount(999));

        let actor = scene.beings.get(scene.hero).unwrap();
        let mut clicks = Clicks {
            cells: vec![CellCoord::new(2, 0), CellCoord::new(0, 0)],
            asked: 0,
        };

        let target = acquire_target(
            AbilityKind::Bandage.ability(),
            actor,
            &scene.battle,
            &scene.beings,
            &mut clicks,
        )
        .await;

        assert_eq!(target, Target::Creature(scene.hero));
        assert_eq!(clicks.asked, 2);
    }

    #[tokio::test]
    async fn test_untargeted_never_asks() {
        let scene = scene();
        let actor = scene.beings.get(scene.hero).unwrap();
        let mut clicks = Clicks {
            cells: vec![CellCoord::new(0, 0)],
            asked: 0,
        };

        let target = acquire_target(
            AbilityKind::Skip.ability(),
            actor,
            &scene.battle,
            &scene.beings,
            &mut clicks,
        )
        .await;

        assert_eq!(target, Target::Actor);
        assert_eq!(clicks.asked, 0);
    }

    #[tokio::test]
    async fn test_cell_targeted_accepts_any_cell() {
        let scene = scene();
        let actor = scene.beings.get(scene.hero).unwrap();
        let area = Ability {
            flow: TargetingFlow::CellTargeted,
            ..AbilityKind::Attack.ability().clone()
        };
        let mut clicks = Clicks {
            cells: vec![scene.wall],
            asked: 0,
        };

        let target = acquire_target(&area, actor, &scene.battle, &scene.beings, &mut clicks).await;
        assert_eq!(target, Target::Cell(scene.wall));
    }
}
