//! Level construction from scene definitions.

use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::data::{SceneDefinition, WaterDef};
use crate::player::WaterSurface;

/// Thickness of ground slabs.
const SLAB_THICKNESS: f32 = 1.0;

/// Marker for all level geometry that should be cleaned up.
#[derive(Component)]
pub struct LevelGeometry;

/// Build a scene and return the player spawn position.
pub fn build_level_from_data(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    scene: &SceneDefinition,
) -> Vec3 {
    setup_environment(commands);

    let (half_x, half_z) = scene.ground_half_extents;
    let ground_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.36, 0.45, 0.28),
        perceptual_roughness: 0.9,
        ..default()
    });
    spawn_slab(
        commands,
        meshes,
        ground_material,
        Vec3::ZERO,
        Vec2::new(half_x, half_z),
    );

    if let Some(water) = &scene.water {
        spawn_water(commands, meshes, materials, water);
    }

    scene.spawn_point()
}

/// Ambient light plus a sun.
fn setup_environment(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.85, 0.9, 1.0),
        brightness: 400.0,
    });

    commands.spawn((
        DirectionalLight {
            color: Color::srgb(1.0, 0.96, 0.88),
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            -std::f32::consts::FRAC_PI_3,
            std::f32::consts::FRAC_PI_6,
            0.0,
        )),
        LevelGeometry,
    ));
}

/// Solid slab whose top face sits at `top.y`.
fn spawn_slab(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    top: Vec3,
    half_extents: Vec2,
) {
    let half_thickness = SLAB_THICKNESS / 2.0;
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(
            half_extents.x * 2.0,
            SLAB_THICKNESS,
            half_extents.y * 2.0,
        ))),
        MeshMaterial3d(material),
        Transform::from_translation(top - Vec3::Y * half_thickness),
        Collider::cuboid(half_extents.x, half_thickness, half_extents.y),
        LevelGeometry,
    ));
}

/// Basin floor plus a translucent, non-colliding surface tagged as water.
fn spawn_water(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    water: &WaterDef,
) {
    let center = Vec2::new(water.center.0, water.center.1);
    let half_extents = Vec2::new(water.half_extents.0, water.half_extents.1);

    let basin_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.5, 0.38),
        perceptual_roughness: 1.0,
        ..default()
    });
    spawn_slab(
        commands,
        meshes,
        basin_material,
        Vec3::new(center.x, -water.floor_depth, center.y),
        half_extents,
    );

    let water_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.1, 0.35, 0.6, 0.6),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 0.1,
        ..default()
    });
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(half_extents.x * 2.0, half_extents.y * 2.0))),
        MeshMaterial3d(water_material),
        Transform::from_xyz(center.x, water.height, center.y),
        WaterSurface {
            height: water.height,
            center,
            half_extents,
        },
        NotShadowCaster,
        LevelGeometry,
    ));
}
