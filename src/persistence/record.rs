//! On-disk save format.
//!
//! Records are plain serde structs, decoupled from the ECS components they
//! are captured from. Keys are camelCase.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// A position in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SavedVec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for SavedVec3 {
    fn from(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl From<SavedVec3> for Vec3 {
    fn from(v: SavedVec3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// Snapshot of the player at save time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    #[serde(default)]
    pub save_name: Option<String>,
    /// Assigned by the store when written
    #[serde(default)]
    pub timestamp: String,
    /// Tie-break for records sharing a timestamp
    #[serde(default)]
    pub sequence: u64,
    pub scene_name: String,
    pub player_position: SavedVec3,
    pub is_running: bool,
    pub is_swimming: bool,
    pub is_floating: bool,
    pub is_physical_attacking: bool,
    pub physical_combo_index: u8,
    pub is_magical_attacking: bool,
    pub magical_combo_index: u8,
    pub health: f32,
    pub mana: f32,
}

/// What the save list shows for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMeta {
    pub file_name: String,
    pub save_name: String,
    pub timestamp: String,
    pub sequence: u64,
    pub scene_name: String,
    pub health: f32,
    pub mana: f32,
}

impl SaveMeta {
    /// Summarize a record read from `file_name`. Unnamed saves show the file stem.
    pub fn from_record(file_name: &str, record: &SaveRecord) -> Self {
        let save_name = record
            .save_name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| {
                Path::new(file_name)
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file_name.to_string())
            });

        Self {
            file_name: file_name.to_string(),
            save_name,
            timestamp: record.timestamp.clone(),
            sequence: record.sequence,
            scene_name: record.scene_name.clone(),
            health: record.health,
            mana: record.mana,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_camel_case_keys() {
        let record = SaveRecord {
            scene_name: "Island".into(),
            physical_combo_index: 2,
            ..default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"sceneName\":\"Island\""));
        assert!(json.contains("\"physicalComboIndex\":2"));
        assert!(json.contains("\"playerPosition\":{\"x\":0.0,\"y\":0.0,\"z\":0.0}"));
    }

    #[test]
    fn accepts_records_without_sequence() {
        let json = r#"{
            "saveName": null,
            "timestamp": "2024-01-01T00:00:00.000000Z",
            "sceneName": "Island",
            "playerPosition": {"x": 1.0, "y": 2.0, "z": 3.0},
            "isRunning": false, "isSwimming": true, "isFloating": true,
            "isPhysicalAttacking": false, "physicalComboIndex": 0,
            "isMagicalAttacking": false, "magicalComboIndex": 0,
            "health": 400.0, "mana": 100.0
        }"#;
        let record: SaveRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.sequence, 0);
        assert_eq!(Vec3::from(record.player_position), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn meta_falls_back_to_file_stem() {
        let record = SaveRecord::default();
        let meta = SaveMeta::from_record("save_20240101_120000.json", &record);
        assert_eq!(meta.save_name, "save_20240101_120000");

        let named = SaveRecord {
            save_name: Some("Before boss".into()),
            ..default()
        };
        assert_eq!(SaveMeta::from_record("x.json", &named).save_name, "Before boss");
    }
}
