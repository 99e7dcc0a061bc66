//! World module - scene registry, level building and scene transitions.

mod builder;
mod data;
mod error;
mod plugin;

pub use builder::LevelGeometry;
pub use data::{CurrentScene, SceneDefinition, SceneRegistry, WaterDef};
pub use error::DataLoadError;
pub use plugin::{resolve_scene, SceneTarget, WorldPlugin};
