//! Engine configuration with documented constants
//!
//! Every tunable number of the simulation lives here. The config is owned by
//! the `World` and handed to whatever needs it; there is no global instance.

use std::path::Path;

use serde::Deserialize;

use crate::core::error::{EngineError, Result};

/// Inclusive `[min, max]` range read from TOML as a two-element array
pub type Span = [u32; 2];

/// Configuration for the simulation engine
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the engine RNG (encounters, hit rolls, damage rolls, AI targets)
    pub seed: u64,

    // === ENCOUNTERS ===
    /// Steps walked before a random encounter, rolled again after every encounter
    ///
    /// Only steps on levels that declare at least one enemy type count.
    pub encounter_steps: Span,

    /// Number of enemies spawned per encounter
    ///
    /// Fewer may appear when the area around the leader is crowded.
    pub encounter_size: Span,

    /// Radius (Euclidean, exclusive) around the leader searched for spawn cells
    pub spawn_radius: f32,

    // === TURN ORDER ===
    /// Accumulator value a creature must reach before it acts
    pub turn_threshold: u32,

    /// Speed ("wait") of every hero
    pub hero_wait: u32,

    /// Speed ("wait") of skeletons
    ///
    /// Slightly faster than heroes, so skeletons act about 6 times for every
    /// 5 hero turns.
    pub skeleton_wait: u32,

    // === REWARDS ===
    /// Experience granted for any won battle, before per-enemy rewards
    pub base_exp_reward: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed_1234,
            encounter_steps: [8, 20],
            encounter_size: [1, 3],
            spawn_radius: 4.0,
            turn_threshold: 100,
            hero_wait: 5,
            skeleton_wait: 6,
            base_exp_reward: 10,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        check_span("encounter_steps", self.encounter_steps)?;
        check_span("encounter_size", self.encounter_size)?;

        // A zero-step encounter would fire before the first step
        if self.encounter_steps[0] == 0 {
            return Err(EngineError::Config(
                "encounter_steps must start at 1 or more".into(),
            ));
        }

        if !(self.spawn_radius > 0.0) {
            return Err(EngineError::Config(format!(
                "spawn_radius ({}) must be positive",
                self.spawn_radius
            )));
        }

        if self.turn_threshold == 0 {
            return Err(EngineError::Config("turn_threshold must be positive".into()));
        }

        Ok(())
    }
}

fn check_span(name: &str, span: Span) -> Result<()> {
    if span[0] > span[1] {
        return Err(EngineError::Config(format!(
            "{} range is inverted ({} > {})",
            name, span[0], span[1]
        )));
    }
    Ok(())
}
