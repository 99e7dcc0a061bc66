//! Gameplay tuning loaded from an external RON file.
//!
//! Allows tweaking combo timings, movement and persistence settings without
//! recompilation. Every field has a default, so the file may be partial or
//! missing entirely.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use super::retry::RetryPolicy;

/// Default location of the config file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/data/config/game.ron";

/// Errors that can occur when loading the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in config '{path}': {details}")]
    Parse { path: String, details: String },
}

/// Root of `game.ron`.
#[derive(Resource, Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub combo: ComboConfig,
    pub movement: MovementConfig,
    pub swimming: SwimConfig,
    pub camera: CameraConfig,
    pub persistence: PersistenceConfig,
}

/// Timing shared by both attack channels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComboConfig {
    /// Seconds without an accepted input before the combo resets
    pub reset_window: f32,
    /// Seconds an attack animation blocks further input
    pub animation_length: f32,
    /// Number of steps in a combo chain
    pub max_combo: u8,
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self {
            reset_window: 1.0,
            animation_length: 0.5,
            max_combo: 3,
        }
    }
}

impl ComboConfig {
    /// Longest chain the attack animations cover.
    pub const MAX_COMBO: u8 = 3;

    /// Replace out-of-range values with usable ones, logging each fix.
    ///
    /// Both timings must be positive and finite; `max_combo` is clamped to
    /// `1..=MAX_COMBO`.
    pub fn validated(self) -> Self {
        let defaults = Self::default();
        let mut config = self;

        if !(config.reset_window.is_finite() && config.reset_window > 0.0) {
            warn!(
                "combo.reset_window must be positive, got {}. Using {}.",
                config.reset_window, defaults.reset_window
            );
            config.reset_window = defaults.reset_window;
        }
        if !(config.animation_length.is_finite() && config.animation_length > 0.0) {
            warn!(
                "combo.animation_length must be positive, got {}. Using {}.",
                config.animation_length, defaults.animation_length
            );
            config.animation_length = defaults.animation_length;
        }
        let clamped = config.max_combo.clamp(1, Self::MAX_COMBO);
        if clamped != config.max_combo {
            warn!(
                "combo.max_combo must be in 1..={}, got {}. Using {}.",
                Self::MAX_COMBO,
                config.max_combo,
                clamped
            );
            config.max_combo = clamped;
        }
        config
    }
}

/// Land locomotion.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Horizontal speed in units per second
    pub speed: f32,
    /// Vertical acceleration (negative is down)
    pub gravity: f32,
    /// Apex height of a jump
    pub jump_height: f32,
    /// Velocity kept while grounded so the controller stays snapped down
    pub grounded_velocity: f32,
    /// Radius of the ground check sphere at the feet
    pub ground_distance: f32,
    /// Model turn rate in radians per second
    pub rotation_speed: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 12.0,
            gravity: -9.81,
            jump_height: 2.0,
            grounded_velocity: -5.0,
            ground_distance: 0.4,
            rotation_speed: 10.0,
        }
    }
}

impl MovementConfig {
    /// Initial vertical velocity that reaches `jump_height`.
    pub fn jump_velocity(&self) -> f32 {
        (self.jump_height * -2.0 * self.gravity).max(0.0).sqrt()
    }
}

/// Water locomotion.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SwimConfig {
    /// Height above the feet at which the player starts swimming
    pub chest_height: f32,
    pub swim_speed: f32,
    pub rotation_speed: f32,
    /// Rate at which the swim animation flag follows actual movement
    pub smoothing_rate: f32,
    /// Smoothed speed above which the player counts as swimming forward
    pub moving_threshold: f32,
}

impl Default for SwimConfig {
    fn default() -> Self {
        Self {
            chest_height: 1.5,
            swim_speed: 6.0,
            rotation_speed: 5.0,
            smoothing_rate: 10.0,
            moving_threshold: 0.1,
        }
    }
}

/// Over-the-shoulder follow camera.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Offset from the player in the player's local frame
    pub offset: (f32, f32, f32),
    /// Height above the player's origin the camera looks at
    pub look_height: f32,
    pub follow_speed: f32,
    /// Yaw radians per pixel of mouse movement
    pub mouse_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: (0.5, 3.5, 5.0),
            look_height: 1.0,
            follow_speed: 7.5,
            mouse_sensitivity: 0.003,
        }
    }
}

impl CameraConfig {
    pub fn offset(&self) -> Vec3 {
        Vec3::new(self.offset.0, self.offset.1, self.offset.2)
    }
}

/// Save files and load reconciliation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Overrides the per-user data directory when set
    pub data_root: Option<PathBuf>,
    /// Attempts to find the player after a scene load
    pub reconcile_attempts: u32,
    /// Real-time seconds between attempts
    pub reconcile_delay: f32,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            data_root: None,
            reconcile_attempts: 10,
            reconcile_delay: 0.1,
        }
    }
}

impl PersistenceConfig {
    pub fn reconcile_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.reconcile_attempts,
            Duration::from_secs_f32(self.reconcile_delay.max(0.0)),
        )
    }
}

impl GameConfig {
    /// Parse a config from RON text.
    ///
    /// Out-of-range combo values are replaced, see [`ComboConfig::validated`].
    pub fn from_ron(contents: &str, path: &str) -> Result<Self, ConfigError> {
        let mut config: Self = ron::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            details: e.to_string(),
        })?;
        config.combo = config.combo.validated();
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_ron(&contents, &display)
    }

    /// Load from [`CONFIG_PATH`], falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from(CONFIG_PATH) {
            Ok(config) => {
                info!("Loaded game config from {}", CONFIG_PATH);
                config
            }
            Err(e @ ConfigError::Parse { .. }) => {
                error!("{}. Using defaults.", e);
                Self::default()
            }
            Err(e) => {
                warn!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }
}
