//! Collaborators the engine waits on: menus, target pickers and feedback
//!
//! Every method is a suspension point. The engine awaits them one at a time and
//! never moves on before the returned future completes; an implementation that
//! never resolves stalls the turn or the walk indefinitely.

use crate::abilities::{Ability, AbilityKind};
use crate::battle::{Battle, BattleResult};
use crate::beings::{Being, Beings};
use crate::grid::CellCoord;
use crate::stats::Damage;

/// Picks the ability a hero uses on its turn
#[allow(async_fn_in_trait)]
pub trait ActionMenu {
    /// Should answer with one of `hero`'s abilities; anything else is asked again
    async fn choose_ability(&mut self, hero: &Being, battle: &Battle, beings: &Beings)
        -> AbilityKind;
}

/// Supplies cell selections while an ability waits for a target
#[allow(async_fn_in_trait)]
pub trait TargetSource {
    async fn select_cell(
        &mut self,
        actor: &Being,
        ability: &Ability,
        battle: &Battle,
        beings: &Beings,
    ) -> CellCoord;
}

/// Visual pacing hooks; the defaults resolve immediately
#[allow(async_fn_in_trait)]
pub trait Feedback {
    async fn show_damage(&mut self, _target: &Being, _damage: Damage) {}

    async fn show_text(&mut self, _cell: CellCoord, _text: &str) {}

    /// The party leader finished moving onto `cell`
    async fn step(&mut self, _cell: CellCoord) {}

    async fn victory(&mut self, _result: &BattleResult) {}

    async fn game_over(&mut self, _result: &BattleResult) {}
}

/// Everything a battle needs from the outside
pub trait Frontend: ActionMenu + TargetSource + Feedback {}

impl<T: ActionMenu + TargetSource + Feedback> Frontend for T {}

/// Feedback that resolves every hook immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Feedback for Silent {}
