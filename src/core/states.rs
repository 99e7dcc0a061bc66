//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. For example,
//! player movement only runs while playing, while menu systems only run in
//! the MainMenu state.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading`, which routes to the scene named by `CurrentScene`
/// - `MainMenu` is the title screen (the "MainMenu" scene)
/// - `InGame` is any playable scene
///
/// Every scene transition passes back through `Loading`, so leaving and
/// re-entering `InGame` always rebuilds the level.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Resolving which scene to show next
    #[default]
    Loading,
    /// Main menu / title screen
    MainMenu,
    /// Active gameplay in a level scene
    InGame,
}

/// Sub-states for gameplay - only active when GameState::InGame.
#[derive(SubStates, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[source(GameState = GameState::InGame)]
pub enum PlayState {
    /// Normal gameplay - movement, combat, exploration
    #[default]
    Exploring,
    /// Pause menu is open and virtual time is stopped
    Paused,
}
