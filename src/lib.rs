//! Scythe Isle - a third-person island adventure in Bevy.
//!
//! The player explores an island on foot or swimming, fights with scythe
//! combos and magic, and saves progress per user.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, config, retry and tween helpers
//! - **Animation**: Named animation parameters fed by gameplay
//! - **Player**: Land movement, swimming, player stats
//! - **Combat**: Physical and magical combo attack channels
//! - **Camera**: Over-the-shoulder follow camera
//! - **World**: Scene registry, level building, scene transitions
//! - **Persistence**: Save files, user session, load reconciliation
//! - **UI**: Menus, login dialog, HUD, toasts

pub mod animation;
pub mod camera;
pub mod combat;
pub mod core;
pub mod persistence;
pub mod player;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct ScytheIslePlugin;

impl Plugin for ScytheIslePlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Trigger consumption after gameplay
            .add_plugins(animation::AnimationPlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Combat systems
            .add_plugins(combat::CombatPlugin)

            // Camera
            .add_plugins(camera::CameraPlugin)

            // World systems
            .add_plugins(world::WorldPlugin)

            // Saves and session (reads the config inserted by CorePlugin)
            .add_plugins(persistence::PersistencePlugin)

            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
