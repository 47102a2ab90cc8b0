//! Fixtures: walls, doors and the interactive facet

use serde::{Deserialize, Serialize};

use crate::grid::CellCoord;

/// Where a door leads: a level index and the party's arrival cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorDestination {
    pub level: usize,
    pub x: u32,
    pub y: u32,
}

impl DoorDestination {
    pub fn cell(&self) -> CellCoord {
        CellCoord::new(self.x, self.y)
    }
}

/// What a click on an interactive being asks the world to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    Travel(DoorDestination),
}

/// Facet for beings the party can use once it stands next to them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interactive {
    interacting: bool,
    action: ClickAction,
}

impl Interactive {
    pub fn new(action: ClickAction) -> Self {
        Self {
            interacting: false,
            action,
        }
    }

    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    pub fn action(&self) -> ClickAction {
        self.action
    }

    /// The party leader came within reach
    pub fn approach(&mut self) -> bool {
        let changed = !self.interacting;
        self.interacting = true;
        changed
    }

    /// The party leader moved out of reach
    pub fn leave(&mut self) -> bool {
        let changed = self.interacting;
        self.interacting = false;
        changed
    }

    /// Only answers while the party is within reach
    pub fn click(&self) -> Option<ClickAction> {
        if self.interacting {
            Some(self.action)
        } else {
            tracing::debug!("Clicked an interactive being out of reach");
            None
        }
    }

    /// Reach covers the being's own cell and its four neighbours
    pub fn in_reach(own: CellCoord, leader: CellCoord) -> bool {
        own == leader || own.is_adjacent(leader)
    }
}
