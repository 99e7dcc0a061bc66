//! Combat module - attack channels, combo state machine, weapon prop.

mod components;
mod plugin;
mod systems;

pub use components::*;
pub use plugin::CombatPlugin;
pub use systems::{reset_channel_animation, set_weapon_visible, CombatSet};
