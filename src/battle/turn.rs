//! What each kind of creature does with its turn

use crate::abilities::{self, AbilityKind, Target};
use crate::battle::{Battle, TurnContext};
use crate::beings::BeingKind;
use crate::core::types::BeingId;
use crate::interface::Frontend;

/// Let `actor` act once; returns the creatures that died during the turn
pub async fn take_turn<U: Frontend>(
    actor: BeingId,
    battle: &Battle,
    ctx: &mut TurnContext<'_>,
    ui: &mut U,
) -> Vec<BeingId> {
    let Some(kind) = ctx.beings.get(actor).map(|b| b.kind()) else {
        tracing::warn!("Turn for missing creature {:?}", actor);
        return Vec::new();
    };

    match kind {
        BeingKind::Hero => hero_turn(actor, battle, ctx, ui).await,
        kind if kind.is_enemy() => enemy_turn(actor, battle, ctx, ui).await,
        kind => {
            tracing::warn!("{} cannot take a turn", kind);
            Vec::new()
        }
    }
}

/// Ask the action menu for an ability, then run the targeting protocol
async fn hero_turn<U: Frontend>(
    actor: BeingId,
    battle: &Battle,
    ctx: &mut TurnContext<'_>,
    ui: &mut U,
) -> Vec<BeingId> {
    let (ability, target) = {
        let beings = &*ctx.beings;
        let Some(hero) = beings.get(actor) else {
            return Vec::new();
        };
        if hero.hero_profile().map_or(true, |profile| profile.abilities.is_empty()) {
            tracing::warn!("{} has no abilities and passes", hero.name());
            return Vec::new();
        }

        let ability = loop {
            let kind = ui.choose_ability(hero, battle, beings).await;
            if hero.hero_profile().is_some_and(|profile| profile.knows(kind)) {
                break kind.ability();
            }
            tracing::warn!("{} does not know {}", hero.name(), kind);
        };

        let target = abilities::acquire_target(ability, hero, battle, beings, ui).await;
        (ability, target)
    };

    tracing::debug!("Hero {:?} uses {} on {:?}", actor, ability.name, target);
    abilities::resolve(ability, actor, target, ctx, ui).await
}

/// Attack a random living hero
async fn enemy_turn<U: Frontend>(
    actor: BeingId,
    battle: &Battle,
    ctx: &mut TurnContext<'_>,
    ui: &mut U,
) -> Vec<BeingId> {
    let Some(victim) = battle.random_alive_hero(ctx.beings, &mut *ctx.rng) else {
        tracing::warn!("Enemy {:?} found no living hero to attack", actor);
        return Vec::new();
    };

    abilities::resolve(
        AbilityKind::Attack.ability(),
        actor,
        Target::Creature(victim),
        ctx,
        ui,
    )
    .await
}
