//! Player module - player entity, stats, and locomotion on land and in water.

mod components;
mod movement;
mod plugin;
mod swimming;

pub use components::*;
pub use movement::spawn_player;
pub use plugin::PlayerPlugin;
