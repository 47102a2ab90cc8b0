//! Effect routines: the only place abilities change stats

use rand::Rng;

use crate::abilities::{Ability, AbilityKind, Target};
use crate::battle::TurnContext;
use crate::core::types::BeingId;
use crate::interface::Feedback;
use crate::stats::{hit_chance, Damage};
use crate::world::events::WorldEvent;

/// Apply `ability` used by `actor` on `target`
///
/// Completes once every feedback hook has resolved. Returns the creatures that
/// died from this use.
pub async fn resolve<F: Feedback>(
    ability: &Ability,
    actor: BeingId,
    target: Target,
    ctx: &mut TurnContext<'_>,
    feedback: &mut F,
) -> Vec<BeingId> {
    match (ability.kind, target) {
        (AbilityKind::Skip, _) => {
            tracing::debug!("{:?} skips the turn", actor);
            Vec::new()
        }
        (AbilityKind::Attack, Target::Creature(defender)) => {
            attack(ability, actor, defender, ctx, feedback).await
        }
        (AbilityKind::Bandage, Target::Creature(patient)) => {
            bandage(ability, actor, patient, ctx, feedback).await
        }
        (kind, target) => {
            tracing::warn!("{} cannot resolve against {:?}", kind, target);
            Vec::new()
        }
    }
}

async fn attack<F: Feedback>(
    ability: &Ability,
    actor: BeingId,
    defender: BeingId,
    ctx: &mut TurnContext<'_>,
    feedback: &mut F,
) -> Vec<BeingId> {
    let stats = (
        ctx.beings.get(actor).and_then(|b| b.stats().cloned()),
        ctx.beings.get(defender).and_then(|b| b.stats().cloned()),
    );
    let (Some(attacker), Some(target)) = stats else {
        tracing::warn!("Attack between {:?} and {:?} has no combatants", actor, defender);
        return Vec::new();
    };

    if !ctx.rng.gen_bool(hit_chance(&attacker, &target)) {
        if let Some(cell) = ctx.beings.get(defender).map(|b| b.cell()) {
            feedback.show_text(cell, "Miss!").await;
        }
        return Vec::new();
    }

    let Some(range) = ability.damage_range(&attacker) else {
        return Vec::new();
    };
    let damage = Damage::from_amount(range.roll(&mut *ctx.rng));
    strike(defender, damage, ctx, feedback).await.into_iter().collect()
}

async fn bandage<F: Feedback>(
    ability: &Ability,
    actor: BeingId,
    patient: BeingId,
    ctx: &mut TurnContext<'_>,
    feedback: &mut F,
) -> Vec<BeingId> {
    let Some(range) = ctx
        .beings
        .get(actor)
        .and_then(|b| b.stats())
        .and_then(|stats| ability.heal_range(stats))
    else {
        return Vec::new();
    };

    let heal = Damage::heal(range.roll(&mut *ctx.rng));
    strike(patient, heal, ctx, feedback).await.into_iter().collect()
}

/// Apply damage and report a death
async fn strike<F: Feedback>(
    target: BeingId,
    damage: Damage,
    ctx: &mut TurnContext<'_>,
    feedback: &mut F,
) -> Option<BeingId> {
    let Some(being) = ctx.beings.get_mut(target) else {
        tracing::warn!("Damage target {:?} no longer exists", target);
        return None;
    };

    let outcome = being.take_damage(damage);
    tracing::debug!("{} takes {} ({:?})", being.name(), damage.amount(), outcome);
    feedback.show_damage(being, damage).await;

    if outcome.died() {
        ctx.events.push(WorldEvent::Die { being: target });
        Some(target)
    } else {
        None
    }
}
