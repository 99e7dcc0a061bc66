//! Over-the-shoulder follow camera.
//!
//! Mouse X turns the player; the camera trails behind at a fixed offset in
//! the player's frame and keeps looking at the player's center.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use crate::core::{GameConfig, GameState, PlayState, SmoothTransform};
use crate::player::Player;

/// Marker for the gameplay camera.
#[derive(Component)]
pub struct FollowCamera;

/// Camera plugin - mouse yaw, follow target and cursor capture.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(PlayState::Exploring), grab_cursor)
            .add_systems(OnExit(PlayState::Exploring), release_cursor)
            .add_systems(
                Update,
                (mouse_yaw, follow_player)
                    .chain()
                    .run_if(in_state(GameState::InGame))
                    .run_if(in_state(PlayState::Exploring)),
            );
    }
}

/// Spawn the follow camera behind a spawn point.
pub fn spawn_follow_camera(commands: &mut Commands, position: Vec3, config: &GameConfig) -> Entity {
    let camera = &config.camera;
    let eye = position + camera.offset();
    let focus = position + Vec3::Y * camera.look_height;

    commands
        .spawn((
            Camera3d::default(),
            FollowCamera,
            Transform::from_translation(eye).looking_at(focus, Vec3::Y),
            SmoothTransform::new(camera.follow_speed),
        ))
        .id()
}

/// Where the camera wants to be for a player transform.
pub fn desired_camera_position(player: &Transform, offset: Vec3) -> Vec3 {
    player.translation + player.rotation * offset
}

/// Grab and hide cursor while playing.
fn grab_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }
}

/// Release cursor for menus.
fn release_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

/// Rotate the player around Y with horizontal mouse movement.
fn mouse_yaw(
    mut mouse_motion: EventReader<MouseMotion>,
    config: Res<GameConfig>,
    mut player_query: Query<&mut Transform, With<Player>>,
) {
    let delta_x: f32 = mouse_motion.read().map(|event| event.delta.x).sum();
    if delta_x == 0.0 {
        return;
    }

    let Ok(mut player_transform) = player_query.get_single_mut() else {
        return;
    };
    player_transform.rotate_y(-delta_x * config.camera.mouse_sensitivity);
}

/// Update the camera's smoothing targets from the player transform.
fn follow_player(
    config: Res<GameConfig>,
    player_query: Query<&Transform, With<Player>>,
    mut camera_query: Query<&mut SmoothTransform, With<FollowCamera>>,
) {
    let Ok(player) = player_query.get_single() else {
        return;
    };
    let Ok(mut smooth) = camera_query.get_single_mut() else {
        return;
    };

    smooth.target_translation = Some(desired_camera_position(player, config.camera.offset()));
    smooth.look_at = Some(player.translation + Vec3::Y * config.camera.look_height);
}
