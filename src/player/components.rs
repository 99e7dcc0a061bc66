//! Player-related components.

use bevy::prelude::*;

/// Distance from the player's origin (capsule center) down to the feet.
pub const PLAYER_HALF_HEIGHT: f32 = 0.8;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Marker for the visible body, a child of the player that turns
/// independently of the player's yaw.
#[derive(Component)]
pub struct PlayerModel;

/// Player's core statistics.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PlayerStats {
    pub max_health: f32,
    pub current_health: f32,
    pub max_mana: f32,
    pub current_mana: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            max_health: 500.0,
            current_health: 500.0,
            max_mana: 250.0,
            current_mana: 250.0,
        }
    }
}

impl PlayerStats {
    pub fn set_health(&mut self, value: f32) {
        self.current_health = value.clamp(0.0, self.max_health);
    }

    pub fn set_mana(&mut self, value: f32) {
        self.current_mana = value.clamp(0.0, self.max_mana);
    }

    pub fn health_fraction(&self) -> f32 {
        fraction(self.current_health, self.max_health)
    }

    pub fn mana_fraction(&self) -> f32 {
        fraction(self.current_mana, self.max_mana)
    }
}

fn fraction(current: f32, max: f32) -> f32 {
    if max <= 0.0 {
        0.0
    } else {
        (current / max).clamp(0.0, 1.0)
    }
}

/// Tracks land movement state for the character controller.
#[derive(Component, Debug, Default)]
pub struct MovementState {
    pub is_grounded: bool,
    pub vertical_velocity: f32,
}

/// Tracks whether the player is in deep water.
#[derive(Component, Debug, Default)]
pub struct WaterState {
    pub is_swimming: bool,
    pub was_swimming_last_frame: bool,
    /// Low-pass filtered swim speed, drives the swim animation flag
    pub swim_smoothing: f32,
}

/// A flat body of water covering a rectangle on the XZ plane.
#[derive(Component, Debug, Clone, Copy)]
pub struct WaterSurface {
    pub height: f32,
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl WaterSurface {
    /// Surface height above `point`, if the point lies over this water.
    pub fn project(&self, point: Vec3) -> Option<f32> {
        let offset = (Vec2::new(point.x, point.z) - self.center).abs();
        (offset.x <= self.half_extents.x && offset.y <= self.half_extents.y).then_some(self.height)
    }
}

/// Whether a character standing at `feet_y` is deep enough to swim.
pub fn is_submerged(surface_height: Option<f32>, feet_y: f32, chest_height: f32) -> bool {
    surface_height.is_some_and(|height| height >= feet_y + chest_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_are_clamped() {
        let mut stats = PlayerStats::default();
        stats.set_health(900.0);
        stats.set_mana(-3.0);
        assert_eq!(stats.current_health, 500.0);
        assert_eq!(stats.current_mana, 0.0);
        assert_eq!(stats.health_fraction(), 1.0);
        assert_eq!(stats.mana_fraction(), 0.0);
    }

    #[test]
    fn water_projects_only_inside_extent() {
        let water = WaterSurface {
            height: 2.0,
            center: Vec2::new(10.0, 0.0),
            half_extents: Vec2::new(5.0, 5.0),
        };
        assert_eq!(water.project(Vec3::new(12.0, 0.0, 4.0)), Some(2.0));
        assert_eq!(water.project(Vec3::new(0.0, 0.0, 0.0)), None);
    }

    #[test]
    fn submerged_when_surface_reaches_chest() {
        assert!(is_submerged(Some(2.0), 0.5, 1.5));
        assert!(!is_submerged(Some(1.9), 0.5, 1.5));
        assert!(!is_submerged(None, -10.0, 1.5));
    }
}
