//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for beings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BeingId(pub Uuid);

impl BeingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BeingId {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque handle to the visual proxy a renderer keeps for a being
///
/// The engine only stores and hands it back; the renderer owns what it points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);
