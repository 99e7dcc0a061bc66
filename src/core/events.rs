//! Global events used for cross-system communication.
//!
//! The scene loader, the session and the UI never call each other directly;
//! they exchange these events instead.

use bevy::prelude::*;

/// Name of the scene that shows the main menu.
pub const MAIN_MENU_SCENE: &str = "MainMenu";

/// Name of the scene a new game starts in.
pub const START_SCENE: &str = "Island";

/// Ask the scene loader to switch to another scene.
#[derive(Event, Debug, Clone)]
pub struct LoadSceneRequest {
    pub name: String,
}

impl LoadSceneRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Sent once a level scene has been built.
///
/// Entities spawned while building the scene go through `Commands`, so they
/// may not be queryable yet in the frame this event is read.
#[derive(Event, Debug, Clone)]
pub struct SceneLoaded {
    pub name: String,
}

/// Ask the session to save the current player state.
#[derive(Event, Debug, Clone, Default)]
pub struct SaveRequest {
    pub save_name: Option<String>,
}

/// Ask the session to load a save file and start its scene.
#[derive(Event, Debug, Clone)]
pub struct LoadRequest {
    pub file_name: String,
}

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// A message that should be shown to the player (toast).
#[derive(Event, Debug, Clone)]
pub struct UiMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl UiMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}
