//! Player plugin - land and water movement.

use bevy::prelude::*;

use super::movement;

/// Player plugin - handles player movement on land and in water.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        movement::setup_movement_systems(app);
    }
}
