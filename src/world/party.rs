//! The player's ordered roster of heroes

use crate::beings::{Beings, HeroData};
use crate::core::error::{EngineError, Result};
use crate::core::types::BeingId;
use crate::grid::CellCoord;

/// Leader first, followers trailing behind in roster order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    heroes: Vec<BeingId>,
}

impl Party {
    pub fn new(heroes: Vec<BeingId>) -> Result<Self> {
        if heroes.is_empty() {
            return Err(EngineError::EmptyParty);
        }
        Ok(Self { heroes })
    }

    pub fn heroes(&self) -> &[BeingId] {
        &self.heroes
    }

    pub fn leader(&self) -> BeingId {
        self.heroes[0]
    }

    pub fn followers(&self) -> &[BeingId] {
        &self.heroes[1..]
    }

    pub fn contains(&self, id: BeingId) -> bool {
        self.heroes.contains(&id)
    }

    pub fn leader_cell(&self, beings: &Beings) -> Option<CellCoord> {
        beings.get(self.leader()).map(|b| b.cell())
    }

    /// Move the leader onto `cell`; each follower takes the cell the hero in
    /// front of it just left
    pub fn move_to(&self, cell: CellCoord, beings: &mut Beings) {
        let mut next = Some(cell);

        for &id in &self.heroes {
            let (Some(target), Some(hero)) = (next, beings.get_mut(id)) else {
                break;
            };
            if hero.cell() == target {
                break;
            }
            hero.set_cell(target);
            next = hero.prev_cell();
        }
    }

    pub fn all_dead(&self, beings: &Beings) -> bool {
        self.heroes.iter().all(|&id| !beings.is_alive(id))
    }

    /// Roster records in party order
    pub fn save(&self, beings: &Beings) -> Vec<HeroData> {
        self.heroes
            .iter()
            .filter_map(|&id| beings.get(id).and_then(|b| b.hero_data()))
            .collect()
    }
}
