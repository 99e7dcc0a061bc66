//! Core plugin that sets up game states, events, config and fundamental systems.

use bevy::prelude::*;
use bevy::transform::TransformSystem;

use super::config::GameConfig;
use super::events::*;
use super::states::*;
use super::tween::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, MainMenu, InGame) and the Paused sub-state
/// - Global events (scene, save/load and UI messages)
/// - The `GameConfig` resource
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            // Config is needed by other plugins' startup systems
            .insert_resource(GameConfig::load())

            // Initialize game states
            .init_state::<GameState>()
            .add_sub_state::<PlayState>()

            // Register global events
            .add_event::<LoadSceneRequest>()
            .add_event::<SceneLoaded>()
            .add_event::<SaveRequest>()
            .add_event::<LoadRequest>()
            .add_event::<UiMessage>()

            // Pause/unpause with Escape key
            .add_systems(
                Update,
                handle_pause_input.run_if(in_state(GameState::InGame)),
            )
            .add_systems(OnEnter(PlayState::Paused), pause_virtual_time)
            .add_systems(OnExit(PlayState::Paused), resume_virtual_time)

            // Smooth transform interpolation (runs for all game states)
            .add_systems(
                PostUpdate,
                update_smooth_transforms.before(TransformSystem::TransformPropagate),
            );
    }
}

/// Handle Escape key to pause/unpause the game.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<PlayState>>,
    mut next_state: ResMut<NextState<PlayState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            PlayState::Exploring => next_state.set(PlayState::Paused),
            PlayState::Paused => next_state.set(PlayState::Exploring),
        }
    }
}

fn pause_virtual_time(mut time: ResMut<Time<Virtual>>) {
    time.pause();
}

fn resume_virtual_time(mut time: ResMut<Time<Virtual>>) {
    time.unpause();
}
