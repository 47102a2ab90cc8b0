//! Explicit dependencies of a battle turn

use rand_chacha::ChaCha8Rng;

use crate::beings::Beings;
use crate::core::config::EngineConfig;
use crate::world::events::EventLog;

/// Mutable world pieces a turn reads and writes
///
/// Borrowed from the world for the duration of a battle.
pub struct TurnContext<'a> {
    pub beings: &'a mut Beings,
    pub rng: &'a mut ChaCha8Rng,
    pub events: &'a mut EventLog,
    pub config: &'a EngineConfig,
}

impl<'a> TurnContext<'a> {
    pub fn new(
        beings: &'a mut Beings,
        rng: &'a mut ChaCha8Rng,
        events: &'a mut EventLog,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            beings,
            rng,
            events,
            config,
        }
    }
}
