//! Third-person land movement and player spawning.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::*;
use crate::animation::{params, Animator};
use crate::camera::FollowCamera;
use crate::combat::{AttackChannels, AttackInputGate, WeaponProp};
use crate::core::{GameConfig, GameState, PlayState};

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app.add_systems(
        Update,
        (super::swimming::swim_movement, land_movement)
            .chain()
            .run_if(in_state(GameState::InGame))
            .run_if(in_state(PlayState::Exploring)),
    );
}

/// Read WASD / arrow keys as a 2D axis (x = strafe, y = forward).
pub fn movement_axes(keyboard: &ButtonInput<KeyCode>) -> Vec2 {
    let mut axes = Vec2::ZERO;
    if keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        axes.y += 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        axes.y -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        axes.x -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        axes.x += 1.0;
    }
    axes
}

/// Map input axes to a horizontal world direction relative to the camera.
///
/// The camera's forward and right vectors are flattened onto the ground
/// plane, so looking down does not slow the player.
pub fn camera_relative(axes: Vec2, camera_rotation: Quat) -> Vec3 {
    let forward = flatten(camera_rotation * Vec3::NEG_Z);
    let right = flatten(camera_rotation * Vec3::X);
    (right * axes.x + forward * axes.y).normalize_or_zero()
}

fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

/// Turn the visible model toward a world-space direction.
pub fn turn_model_toward(
    model: &mut Transform,
    parent_rotation: Quat,
    world_direction: Vec3,
    rate: f32,
    dt: f32,
) {
    let local = parent_rotation.inverse() * world_direction;
    let local = flatten(local);
    if local == Vec3::ZERO {
        return;
    }
    let target = Transform::IDENTITY.looking_to(local, Vec3::Y).rotation;
    model.rotation = model.rotation.slerp(target, (rate * dt).min(1.0));
}

/// Handle WASD movement, gravity and jumping on land.
///
/// Uses Rapier's KinematicCharacterController for collision detection.
/// Movement and jumping are suppressed while the scythe combo plays.
#[allow(clippy::type_complexity)]
pub fn land_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<GameConfig>,
    rapier_context: Query<&RapierContext>,
    camera_query: Query<&Transform, (With<FollowCamera>, Without<Player>)>,
    mut player_query: Query<
        (
            Entity,
            &Transform,
            &WaterState,
            &AttackChannels,
            &mut MovementState,
            &mut KinematicCharacterController,
            &mut Animator,
            &Children,
        ),
        With<Player>,
    >,
    mut model_query: Query<&mut Transform, (With<PlayerModel>, Without<Player>, Without<FollowCamera>)>,
) {
    let Ok((entity, transform, water, channels, mut movement_state, mut controller, mut animator, children)) =
        player_query.get_single_mut()
    else {
        return;
    };

    // Swimming owns the controller while in deep water
    if water.is_swimming {
        return;
    }

    let movement = &config.movement;
    let dt = time.delta_secs();

    // Sphere check at the feet
    let is_grounded = if let Ok(context) = rapier_context.get_single() {
        let feet = transform.translation - Vec3::Y * PLAYER_HALF_HEIGHT;
        context
            .intersection_with_shape(
                feet,
                Quat::IDENTITY,
                &Collider::ball(movement.ground_distance),
                QueryFilter::default().exclude_collider(entity),
            )
            .is_some()
    } else {
        // Fallback: assume grounded if no physics context
        true
    };
    movement_state.is_grounded = is_grounded;

    if is_grounded && movement_state.vertical_velocity < 0.0 {
        movement_state.vertical_velocity = movement.grounded_velocity;
    }

    let camera_rotation = camera_query
        .get_single()
        .map(|camera| camera.rotation)
        .unwrap_or(transform.rotation);
    let mut direction = camera_relative(movement_axes(&keyboard), camera_rotation);

    let is_attacking = channels.physical.is_attacking();
    if is_attacking {
        direction = Vec3::ZERO;
    }

    if keyboard.just_pressed(KeyCode::Space) && is_grounded && !is_attacking {
        movement_state.vertical_velocity = movement.jump_velocity();
        debug!("Jump triggered, vertical velocity {}", movement_state.vertical_velocity);
    }

    movement_state.vertical_velocity += movement.gravity * dt;

    let horizontal = direction * movement.speed * dt;
    let vertical = Vec3::Y * movement_state.vertical_velocity * dt;
    controller.translation = Some(horizontal + vertical);

    let is_moving = direction.length() > 0.1;
    animator.set_bool(params::IS_RUNNING, is_moving);

    if is_moving {
        for child in children.iter() {
            if let Ok(mut model) = model_query.get_mut(*child) {
                turn_model_toward(&mut model, transform.rotation, direction, movement.rotation_speed, dt);
            }
        }
    }
}

/// Spawn the player entity with its model and scythe prop.
pub fn spawn_player(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    position: Vec3,
    config: &GameConfig,
) -> Entity {
    // Scythe prop, hidden until the first swing
    let scythe = commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(0.06, 1.6, 0.06))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.55, 0.55, 0.6),
                metallic: 0.8,
                perceptual_roughness: 0.3,
                ..default()
            })),
            Transform::from_xyz(0.45, 0.1, -0.2).with_rotation(Quat::from_rotation_z(0.35)),
            Visibility::Hidden,
        ))
        .id();

    let model = commands
        .spawn((
            PlayerModel,
            Mesh3d(meshes.add(Capsule3d::new(0.3, 1.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.25, 0.3, 0.45),
                ..default()
            })),
            Transform::default(),
            Visibility::default(),
        ))
        .add_child(scythe)
        .id();

    commands
        .spawn((
            Player,
            PlayerStats::default(),
            MovementState::default(),
            WaterState::default(),
            // Combat components
            AttackChannels::new(&config.combo),
            AttackInputGate::default(),
            WeaponProp { entity: scythe },
            Animator::default(),
            // Transform
            Transform::from_translation(position),
            Visibility::default(),
            // Rapier physics components
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.3),
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.01),
                autostep: Some(CharacterAutostep {
                    max_height: CharacterLength::Absolute(0.4),
                    min_width: CharacterLength::Absolute(0.3),
                    include_dynamic_bodies: false,
                }),
                max_slope_climb_angle: 45_f32.to_radians(),
                min_slope_slide_angle: 30_f32.to_radians(),
                snap_to_ground: Some(CharacterLength::Absolute(0.5)),
                ..default()
            },
        ))
        .add_child(model)
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_follows_camera_yaw() {
        // Camera turned 90 degrees left: forward is -X
        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let dir = camera_relative(Vec2::new(0.0, 1.0), rotation);
        assert!((dir - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn camera_pitch_does_not_change_ground_direction() {
        let rotation = Quat::from_rotation_x(-0.6);
        let dir = camera_relative(Vec2::new(0.0, 1.0), rotation);
        assert!((dir - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn diagonal_input_is_normalized() {
        let dir = camera_relative(Vec2::new(1.0, 1.0), Quat::IDENTITY);
        assert!((dir.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn no_input_is_no_movement() {
        assert_eq!(camera_relative(Vec2::ZERO, Quat::IDENTITY), Vec3::ZERO);
    }

    #[test]
    fn axes_from_keys() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::KeyW);
        keyboard.press(KeyCode::KeyD);
        assert_eq!(movement_axes(&keyboard), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn model_turns_toward_direction() {
        let mut model = Transform::default();
        turn_model_toward(&mut model, Quat::IDENTITY, Vec3::X, 10.0, 1.0);
        let facing = model.rotation * Vec3::NEG_Z;
        assert!((facing - Vec3::X).length() < 1e-4);
    }
}
