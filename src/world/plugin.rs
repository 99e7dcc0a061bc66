//! World plugin - scene requests, level building and teardown.

use bevy::prelude::*;

use crate::camera::{spawn_follow_camera, FollowCamera};
use crate::core::{
    GameConfig, GameState, LoadSceneRequest, SceneLoaded, UiMessage, MAIN_MENU_SCENE,
};
use crate::player::{spawn_player, Player};

use super::builder::{build_level_from_data, LevelGeometry};
use super::data::{load_scene_definitions, CurrentScene, SceneRegistry};

/// World plugin - handles scene loading and world setup.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentScene>()
            .init_resource::<SceneRegistry>()
            .add_systems(Startup, load_scene_definitions)
            .add_systems(Update, handle_scene_requests)
            .add_systems(OnEnter(GameState::Loading), route_loaded_scene)
            .add_systems(OnEnter(GameState::InGame), setup_level)
            .add_systems(OnExit(GameState::InGame), cleanup_level);
    }
}

/// Outcome of asking for a scene by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneTarget {
    MainMenu,
    Playable(String),
}

/// Resolve a requested scene name against the registry.
pub fn resolve_scene(registry: &SceneRegistry, name: &str) -> Option<SceneTarget> {
    if name == MAIN_MENU_SCENE {
        Some(SceneTarget::MainMenu)
    } else if registry.contains(name) {
        Some(SceneTarget::Playable(name.to_string()))
    } else {
        None
    }
}

/// Accept scene requests; the last valid request in a frame wins.
fn handle_scene_requests(
    mut requests: EventReader<LoadSceneRequest>,
    registry: Res<SceneRegistry>,
    mut current: ResMut<CurrentScene>,
    mut next_state: ResMut<NextState<GameState>>,
    mut messages: EventWriter<UiMessage>,
) {
    let mut accepted = None;
    for request in requests.read() {
        if resolve_scene(&registry, &request.name).is_some() {
            accepted = Some(request.name.clone());
        } else {
            warn!("Unknown scene requested: {}", request.name);
            messages.send(UiMessage::error(format!("Unknown scene '{}'", request.name)));
        }
    }

    if let Some(name) = accepted {
        info!("Loading scene: {}", name);
        current.name = name;
        next_state.set(GameState::Loading);
    }
}

/// Leave the loading state for wherever the current scene lives.
fn route_loaded_scene(
    current: Res<CurrentScene>,
    registry: Res<SceneRegistry>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    match resolve_scene(&registry, &current.name) {
        Some(SceneTarget::Playable(_)) => next_state.set(GameState::InGame),
        Some(SceneTarget::MainMenu) => next_state.set(GameState::MainMenu),
        None => {
            error!("Scene '{}' not found, returning to main menu", current.name);
            next_state.set(GameState::MainMenu);
        }
    }
}

/// Set up the level from data.
pub fn setup_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    registry: Res<SceneRegistry>,
    current: Res<CurrentScene>,
    config: Res<GameConfig>,
    mut loaded: EventWriter<SceneLoaded>,
) {
    let Some(scene) = registry.get(&current.name) else {
        error!("Scene '{}' not found in registry!", current.name);
        return;
    };

    info!("Building scene: {}", scene.name);

    let spawn = build_level_from_data(&mut commands, &mut meshes, &mut materials, scene);
    spawn_player(&mut commands, &mut meshes, &mut materials, spawn, &config);
    spawn_follow_camera(&mut commands, spawn, &config);

    loaded.send(SceneLoaded {
        name: scene.name.clone(),
    });
}

/// Clean up level entities when leaving InGame state.
fn cleanup_level(
    mut commands: Commands,
    level_query: Query<Entity, With<LevelGeometry>>,
    player_query: Query<Entity, With<Player>>,
    camera_query: Query<Entity, With<FollowCamera>>,
) {
    for entity in level_query
        .iter()
        .chain(player_query.iter())
        .chain(camera_query.iter())
    {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::START_SCENE;

    #[test]
    fn resolves_menu_and_known_scenes() {
        let registry = SceneRegistry::default();
        assert_eq!(resolve_scene(&registry, MAIN_MENU_SCENE), Some(SceneTarget::MainMenu));
        assert_eq!(
            resolve_scene(&registry, START_SCENE),
            Some(SceneTarget::Playable(START_SCENE.to_string()))
        );
        assert_eq!(resolve_scene(&registry, "Atlantis"), None);
    }
}
