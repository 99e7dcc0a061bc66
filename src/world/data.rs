//! Scene definitions and RON loading.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use super::error::DataLoadError;
use crate::core::{MAIN_MENU_SCENE, START_SCENE};

/// Default location of the scene file, relative to the working directory.
pub const SCENES_PATH: &str = "assets/data/scenes.ron";

/// A body of water in a scene.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WaterDef {
    /// Surface height
    pub height: f32,
    /// Center of the water rectangle on the XZ plane
    pub center: (f32, f32),
    pub half_extents: (f32, f32),
    /// Depth of the basin floor below y = 0
    #[serde(default = "default_floor_depth")]
    pub floor_depth: f32,
}

fn default_floor_depth() -> f32 {
    4.0
}

/// One playable scene.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneDefinition {
    pub name: String,
    /// Where a new game places the player
    pub spawn_point: (f32, f32, f32),
    /// Half size of the walkable ground around the origin
    pub ground_half_extents: (f32, f32),
    #[serde(default)]
    pub water: Option<WaterDef>,
}

impl SceneDefinition {
    /// Built-in island used when no scene file is present.
    pub fn island() -> Self {
        Self {
            name: START_SCENE.to_string(),
            spawn_point: (0.0, 2.0, 0.0),
            ground_half_extents: (30.0, 30.0),
            water: Some(WaterDef {
                height: 0.5,
                center: (0.0, -50.0),
                half_extents: (30.0, 20.0),
                floor_depth: 4.0,
            }),
        }
    }

    pub fn spawn_point(&self) -> Vec3 {
        Vec3::new(self.spawn_point.0, self.spawn_point.1, self.spawn_point.2)
    }
}

/// Root of `scenes.ron`.
#[derive(Debug, Deserialize)]
struct SceneFile {
    scenes: Vec<SceneDefinition>,
}

/// All known playable scenes, by name.
#[derive(Resource, Debug, Clone)]
pub struct SceneRegistry {
    scenes: HashMap<String, SceneDefinition>,
}

impl Default for SceneRegistry {
    fn default() -> Self {
        let island = SceneDefinition::island();
        Self {
            scenes: HashMap::from([(island.name.clone(), island)]),
        }
    }
}

impl SceneRegistry {
    /// Parse scene definitions; the built-in island stays available unless
    /// the file overrides it.
    pub fn from_ron(contents: &str, path: &str) -> Result<Self, DataLoadError> {
        let file: SceneFile = ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: path.to_string(),
            details: e.to_string(),
        })?;

        let mut registry = Self::default();
        let mut seen = Vec::new();
        for scene in file.scenes {
            if scene.name == MAIN_MENU_SCENE {
                return Err(DataLoadError::ReservedName(scene.name));
            }
            if seen.contains(&scene.name) {
                return Err(DataLoadError::DuplicateScene(scene.name));
            }
            seen.push(scene.name.clone());
            registry.scenes.insert(scene.name.clone(), scene);
        }
        Ok(registry)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DataLoadError::FileNotFound(display.clone()),
            _ => DataLoadError::ReadError {
                path: display.clone(),
                details: e.to_string(),
            },
        })?;
        Self::from_ron(&contents, &display)
    }

    pub fn get(&self, name: &str) -> Option<&SceneDefinition> {
        self.scenes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

/// The scene that is shown, or about to be shown.
#[derive(Resource, Debug, Clone)]
pub struct CurrentScene {
    pub name: String,
}

impl Default for CurrentScene {
    fn default() -> Self {
        Self {
            name: MAIN_MENU_SCENE.to_string(),
        }
    }
}

/// Load scene definitions from assets/data/scenes.ron.
pub fn load_scene_definitions(mut commands: Commands) {
    let registry = match SceneRegistry::load_from(SCENES_PATH) {
        Ok(registry) => registry,
        Err(DataLoadError::FileNotFound(path)) => {
            info!("Scene file {} not found, using built-in scenes only", path);
            SceneRegistry::default()
        }
        Err(e) => {
            error!("Failed to load scenes: {}", e);
            SceneRegistry::default()
        }
    };

    info!("Loaded {} scene(s)", registry.len());
    commands.insert_resource(registry);
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = r#"(
        scenes: [
            (
                name: "Cove",
                spawn_point: (1.0, 2.0, 3.0),
                ground_half_extents: (10.0, 10.0),
                water: Some((height: 1.0, center: (0.0, 20.0), half_extents: (5.0, 5.0))),
            ),
        ],
    )"#;

    #[test]
    fn parses_scenes_and_keeps_builtin_island() {
        let registry = SceneRegistry::from_ron(FILE, "scenes.ron").unwrap();
        let cove = registry.get("Cove").unwrap();
        assert_eq!(cove.spawn_point(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cove.water.unwrap().floor_depth, 4.0);
        assert!(registry.contains(START_SCENE));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn rejects_duplicate_names() {
        let file = r#"(scenes: [
            (name: "A", spawn_point: (0.0, 0.0, 0.0), ground_half_extents: (1.0, 1.0)),
            (name: "A", spawn_point: (0.0, 0.0, 0.0), ground_half_extents: (1.0, 1.0)),
        ])"#;
        assert!(matches!(
            SceneRegistry::from_ron(file, "scenes.ron"),
            Err(DataLoadError::DuplicateScene(name)) if name == "A"
        ));
    }

    #[test]
    fn rejects_main_menu_name() {
        let file = r#"(scenes: [
            (name: "MainMenu", spawn_point: (0.0, 0.0, 0.0), ground_half_extents: (1.0, 1.0)),
        ])"#;
        assert!(matches!(
            SceneRegistry::from_ron(file, "scenes.ron"),
            Err(DataLoadError::ReservedName(_))
        ));
    }

    #[test]
    fn shipped_scene_file_parses() {
        let registry =
            SceneRegistry::from_ron(include_str!("../../assets/data/scenes.ron"), SCENES_PATH)
                .unwrap();
        assert!(registry.contains(START_SCENE));
        assert!(registry.contains("Lagoon"));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SceneRegistry::load_from(dir.path().join("scenes.ron")),
            Err(DataLoadError::FileNotFound(_))
        ));
    }
}
