//! Gridbound - tile-based tactical role-playing simulation engine
//!
//! A party of heroes walks a grid level, runs into random encounters and
//! fights them in turn-based battles. Rendering, menus and animation stay
//! outside the engine behind the collaborator traits in [`interface`].

pub mod abilities;
pub mod autopilot;
pub mod battle;
pub mod beings;
pub mod core;
pub mod grid;
pub mod interface;
pub mod stats;
pub mod world;
