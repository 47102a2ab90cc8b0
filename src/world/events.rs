//! Typed notifications broadcast by the world, its battles and its beings
//!
//! Events are collected in an `EventLog` owned by the world; consumers drain it
//! after each call instead of subscribing to callbacks.

use serde::Serialize;

use crate::core::types::BeingId;
use crate::grid::CellCoord;
use crate::world::WorldState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum WorldEvent {
    Load { level: usize },
    Unload { level: usize },
    State { from: WorldState, to: WorldState },
    Interact { cell: CellCoord },
    Hover { cell: CellCoord },
    StartBattle { heroes: Vec<BeingId>, enemies: Vec<BeingId> },
    Die { being: BeingId },
    Revive { being: BeingId },
    Victory { exp: u32 },
    Defeat,
    LevelUp { hero: BeingId, level: i32 },
}

/// Append-only buffer of events since the last drain
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<WorldEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: WorldEvent) {
        tracing::trace!(?event, "event");
        self.events.push(event);
    }

    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn count(&self, predicate: impl Fn(&WorldEvent) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }
}
