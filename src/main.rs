//! Scythe Isle - Entry Point
//!
//! Controls:
//! - WASD: Move
//! - Mouse: Turn
//! - Space: Jump / swim up
//! - Ctrl: Swim down
//! - Left mouse: Scythe combo
//! - Right mouse: Magic combo
//! - T: Toggle scythe
//! - Escape: Pause/Unpause

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Scythe Isle".to_string(),
                        resolution: (1280.0, 720.0).into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: "info,wgpu=error,naga=warn,scythe_isle=debug".to_string(),
                    ..default()
                }),
        )

        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())

        // Our game plugin
        .add_plugins(scythe_isle::ScytheIslePlugin)

        .run();
}
