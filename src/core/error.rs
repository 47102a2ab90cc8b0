use thiserror::Error;

use crate::grid::CellCoord;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Definition is missing \"{0}\"")]
    MissingField(&'static str),

    #[error("Unknown being type \"{0}\"")]
    UnknownBeingType(String),

    #[error("Cannot create {kind} out of bounds ({x}, {y})")]
    OutOfBounds { kind: String, x: i64, y: i64 },

    #[error("Ability \"{0}\" does not exist")]
    UnknownAbility(String),

    #[error("Unknown layer \"{0}\"")]
    UnknownLayer(String),

    #[error("Level {0} does not exist")]
    UnknownLevel(usize),

    #[error("Invalid field \"{field}\": {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("A party needs at least one hero")]
    EmptyParty,

    #[error("No level is loaded")]
    NoLevelLoaded,

    #[error("Cell {0:?} is already occupied")]
    CellOccupied(CellCoord),

    #[error("Stuck battle: no creature can act while {remaining} combatants remain")]
    StuckBattle { remaining: usize },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl EngineError {
    /// Content bugs in level, party or ability data
    pub fn is_definition_error(&self) -> bool {
        matches!(
            self,
            EngineError::MissingField(_)
                | EngineError::UnknownBeingType(_)
                | EngineError::OutOfBounds { .. }
                | EngineError::UnknownAbility(_)
                | EngineError::UnknownLayer(_)
                | EngineError::UnknownLevel(_)
                | EngineError::InvalidField { .. }
                | EngineError::EmptyParty
                | EngineError::CellOccupied(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
