//! Entity Component System module
//!
//! Components and systems for the actors that explore the map.

pub mod components;
pub mod systems;

pub use components::*;
pub use systems::{apply_velocity, collect_probes, run_followers};
