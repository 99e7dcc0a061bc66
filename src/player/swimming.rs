//! Deep-water detection and swim movement.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::*;
use super::movement::{camera_relative, movement_axes, turn_model_toward};
use crate::animation::{params, Animator};
use crate::camera::FollowCamera;
use crate::combat::AttackChannels;
use crate::core::GameConfig;

/// Vertical swim input: Space rises, Ctrl dives.
fn vertical_axis(keyboard: &ButtonInput<KeyCode>) -> f32 {
    if keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]) {
        -1.0
    } else if keyboard.pressed(KeyCode::Space) {
        1.0
    } else {
        0.0
    }
}

/// Exponential smoothing step used for the swim animation flag.
pub fn smooth_toward(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * (rate * dt).min(1.0)
}

/// Detect deep water and move the player while swimming.
///
/// On the first frame in deep water the player snaps so the chest sits at the
/// surface and starts floating. Leaving the water clears the swim flags and
/// hands control back to land movement.
#[allow(clippy::type_complexity)]
pub fn swim_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<GameConfig>,
    water_query: Query<&WaterSurface>,
    camera_query: Query<&Transform, (With<FollowCamera>, Without<Player>)>,
    mut player_query: Query<
        (
            &mut Transform,
            &mut WaterState,
            &mut MovementState,
            &AttackChannels,
            &mut KinematicCharacterController,
            &mut Animator,
            &Children,
        ),
        With<Player>,
    >,
    mut model_query: Query<&mut Transform, (With<PlayerModel>, Without<Player>, Without<FollowCamera>)>,
) {
    let Ok((mut transform, mut water, mut movement_state, channels, mut controller, mut animator, children)) =
        player_query.get_single_mut()
    else {
        return;
    };

    let swim = &config.swimming;
    let dt = time.delta_secs();

    let surface = water_query
        .iter()
        .find_map(|water| water.project(transform.translation));
    let feet_y = transform.translation.y - PLAYER_HALF_HEIGHT;
    water.is_swimming = is_submerged(surface, feet_y, swim.chest_height);

    if water.is_swimming {
        if let (false, Some(height)) = (water.was_swimming_last_frame, surface) {
            // Slightly below the threshold so rounding does not bounce us out
            transform.translation.y = height - swim.chest_height - 0.01 + PLAYER_HALF_HEIGHT;
            movement_state.vertical_velocity = 0.0;
            animator.set_bool(params::IS_FLOATING, true);
            debug!("Entered deep water at surface height {}", height);
        }

        let camera_rotation = camera_query
            .get_single()
            .map(|camera| camera.rotation)
            .unwrap_or(transform.rotation);
        let horizontal = camera_relative(movement_axes(&keyboard), camera_rotation) * swim.swim_speed;
        let vertical = Vec3::Y * vertical_axis(&keyboard) * swim.swim_speed;

        let mut velocity = horizontal + vertical;
        if channels.physical.is_attacking() {
            velocity = Vec3::ZERO;
        }
        controller.translation = Some(velocity * dt);

        if horizontal != Vec3::ZERO {
            for child in children.iter() {
                if let Ok(mut model) = model_query.get_mut(*child) {
                    turn_model_toward(&mut model, transform.rotation, horizontal, swim.rotation_speed, dt);
                }
            }
        }

        water.swim_smoothing = smooth_toward(water.swim_smoothing, velocity.length(), swim.smoothing_rate, dt);
        animator.set_bool(params::IS_SWIMMING, water.swim_smoothing > swim.moving_threshold);
    } else {
        water.swim_smoothing = 0.0;
        animator.set_bool(params::IS_FLOATING, false);
        animator.set_bool(params::IS_SWIMMING, false);
    }

    water.was_swimming_last_frame = water.is_swimming;
}
