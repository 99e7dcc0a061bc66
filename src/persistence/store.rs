//! Per-user save files on disk.
//!
//! Layout: `<root>/<userId>/<name>_<yyyyMMdd_HHmmss>[_n].json`, one JSON
//! [`SaveRecord`] per file. The store stamps every record it writes with a
//! fixed-width UTC timestamp and a sequence number, both strictly increasing
//! for the lifetime of the store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use chrono::{DateTime, Duration, SubsecRound, Utc};

use super::error::SaveError;
use super::record::{SaveMeta, SaveRecord};

const DEFAULT_SAVE_NAME: &str = "save";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";
const FILE_TIME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Replace characters that are not allowed in file names with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Directory name for a user's saves.
///
/// Names made only of dots would resolve to the saves root or its parent,
/// so their dots become `_` as well.
fn user_dir_name(user_id: &str) -> String {
    let name = sanitize_file_name(user_id);
    if name.chars().all(|c| c == '.') {
        "_".repeat(name.len().max(1))
    } else {
        name
    }
}

/// Whether `file_name` names a file directly inside a directory.
fn is_plain_file_name(file_name: &str) -> bool {
    !file_name.is_empty()
        && Path::new(file_name).file_name().and_then(|n| n.to_str()) == Some(file_name)
}

#[derive(Debug)]
pub struct SaveStore {
    root: PathBuf,
    last_timestamp: Option<DateTime<Utc>>,
    last_sequence: u64,
}

impl SaveStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            last_timestamp: None,
            last_sequence: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one user's saves.
    pub fn user_dir(&self, user_id: &str) -> PathBuf {
        self.root.join(user_dir_name(user_id))
    }

    /// Write `record` for `user_id` and return the new file name.
    pub fn save(&mut self, user_id: &str, record: &SaveRecord) -> Result<String, SaveError> {
        self.save_at(user_id, record, Utc::now())
    }

    /// Like [`SaveStore::save`] with an explicit clock reading.
    pub fn save_at(
        &mut self,
        user_id: &str,
        record: &SaveRecord,
        now: DateTime<Utc>,
    ) -> Result<String, SaveError> {
        if user_id.is_empty() {
            return Err(SaveError::NoUser);
        }

        let dir = self.user_dir(user_id);
        fs::create_dir_all(&dir).map_err(|source| SaveError::Io {
            path: dir.clone(),
            source,
        })?;

        let stamp = self.next_timestamp(now);
        let sequence = self.next_sequence(&dir);

        let mut record = record.clone();
        record.timestamp = stamp.format(TIMESTAMP_FORMAT).to_string();
        record.sequence = sequence;

        let base = match record.save_name.as_deref() {
            Some(name) if !name.trim().is_empty() => sanitize_file_name(name),
            _ => DEFAULT_SAVE_NAME.to_string(),
        };
        let stem = format!("{}_{}", base, stamp.format(FILE_TIME_FORMAT));
        let file_name = unique_file_name(&dir, &stem);
        let path = dir.join(&file_name);

        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&path, json).map_err(|source| SaveError::Io {
            path: path.clone(),
            source,
        })?;

        self.last_timestamp = Some(stamp);
        self.last_sequence = sequence;
        info!("Saved game to {}", path.display());
        Ok(file_name)
    }

    /// Metadata for every readable save, most recent first.
    pub fn list_metas(&self, user_id: &str) -> Vec<SaveMeta> {
        if user_id.is_empty() {
            return Vec::new();
        }

        let mut metas: Vec<SaveMeta> = self
            .read_records(&self.user_dir(user_id))
            .into_iter()
            .map(|(file_name, record)| SaveMeta::from_record(&file_name, &record))
            .collect();

        metas.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.sequence.cmp(&a.sequence))
        });
        metas
    }

    /// Read one save; `None` when it is missing or corrupt.
    pub fn load(&self, user_id: &str, file_name: &str) -> Option<SaveRecord> {
        if user_id.is_empty() || !is_plain_file_name(file_name) {
            return None;
        }

        let path = self.user_dir(user_id).join(file_name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Save file not found: {}", path.display());
                return None;
            }
            Err(e) => {
                error!("Failed to read save {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(record) => Some(record),
            Err(e) => {
                error!("Corrupt save {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Remove a save; false if it did not exist or could not be removed.
    pub fn delete(&self, user_id: &str, file_name: &str) -> bool {
        if user_id.is_empty() || !is_plain_file_name(file_name) {
            return false;
        }

        let path = self.user_dir(user_id).join(file_name);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Deleted save {}", path.display());
                true
            }
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                error!("Failed to delete save {}: {}", path.display(), e);
                false
            }
        }
    }

    fn next_timestamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let now = now.trunc_subsecs(6);
        match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        }
    }

    fn next_sequence(&self, dir: &Path) -> u64 {
        let on_disk = self
            .read_records(dir)
            .iter()
            .map(|(_, record)| record.sequence)
            .max()
            .unwrap_or(0);
        on_disk.max(self.last_sequence) + 1
    }

    /// Parse every `*.json` file in `dir`, skipping the ones that fail.
    fn read_records(&self, dir: &Path) -> Vec<(String, SaveRecord)> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Failed to list saves in {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut records = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let parsed = fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|contents| {
                    serde_json::from_str::<SaveRecord>(&contents).map_err(|e| e.to_string())
                });
            match parsed {
                Ok(record) => records.push((file_name.to_string(), record)),
                Err(e) => warn!("Skipping unreadable save {}: {}", path.display(), e),
            }
        }
        records
    }
}

/// `<stem>.json`, or `<stem>_<n>.json` for the first free `n`.
fn unique_file_name(dir: &Path, stem: &str) -> String {
    let first = format!("{stem}.json");
    if !dir.join(&first).exists() {
        return first;
    }
    (1u32..)
        .map(|n| format!("{stem}_{n}.json"))
        .find(|name| !dir.join(name).exists())
        .unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(name: Option<&str>) -> SaveRecord {
        SaveRecord {
            save_name: name.map(str::to_string),
            scene_name: "Island".into(),
            player_position: Vec3::new(4.0, 1.5, -2.0).into(),
            is_swimming: true,
            is_physical_attacking: true,
            physical_combo_index: 2,
            health: 320.0,
            mana: 75.5,
            ..default()
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap()
    }

    #[test]
    fn round_trips_everything_but_stamp() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SaveStore::new(dir.path());

        let written = record(Some("Cliffs"));
        let file_name = store.save_at("alice", &written, noon()).unwrap();
        assert_eq!(file_name, "Cliffs_20240309_120000.json");

        let loaded = store.load("alice", &file_name).unwrap();
        assert_eq!(loaded.timestamp, "2024-03-09T12:00:00.000000Z");
        assert_eq!(loaded.sequence, 1);
        assert_eq!(
            SaveRecord {
                timestamp: String::new(),
                sequence: 0,
                ..loaded
            },
            written
        );
    }

    #[test]
    fn same_second_saves_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SaveStore::new(dir.path());

        let first = store.save_at("alice", &record(None), noon()).unwrap();
        let second = store.save_at("alice", &record(None), noon()).unwrap();
        assert_eq!(first, "save_20240309_120000.json");
        assert_eq!(second, "save_20240309_120000_1.json");
        assert_eq!(store.list_metas("alice").len(), 2);
    }

    #[test]
    fn lists_newest_first_with_strictly_decreasing_stamps() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SaveStore::new(dir.path());

        for name in ["a", "b", "c"] {
            store.save_at("alice", &record(Some(name)), noon()).unwrap();
        }

        let metas = store.list_metas("alice");
        let names: Vec<_> = metas.iter().map(|m| m.save_name.as_str()).collect();
        assert_eq!(names, ["c", "b", "a"]);
        assert!(metas.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
    }

    #[test]
    fn stamps_survive_a_clock_going_backwards() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SaveStore::new(dir.path());

        store.save_at("alice", &record(Some("late")), noon()).unwrap();
        let earlier = noon() - Duration::seconds(30);
        store.save_at("alice", &record(Some("early")), earlier).unwrap();

        let metas = store.list_metas("alice");
        assert_eq!(metas[0].save_name, "early");
        assert_eq!(metas[0].timestamp, "2024-03-09T12:00:00.000001Z");
    }

    #[test]
    fn corrupt_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SaveStore::new(dir.path());
        store.save_at("alice", &record(Some("ok")), noon()).unwrap();
        fs::write(store.user_dir("alice").join("broken.json"), "{ not json").unwrap();
        fs::write(store.user_dir("alice").join("notes.txt"), "hello").unwrap();

        let metas = store.list_metas("alice");
        assert_eq!(metas.len(), 1);
        assert!(store.load("alice", "broken.json").is_none());
    }

    #[test]
    fn empty_user_or_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SaveStore::new(dir.path());

        assert!(matches!(
            store.save_at("", &record(None), noon()),
            Err(SaveError::NoUser)
        ));
        assert!(store.list_metas("").is_empty());
        assert!(store.list_metas("nobody").is_empty());
        assert!(store.load("", "x.json").is_none());
        assert!(store.load("alice", "").is_none());
    }

    #[test]
    fn delete_reports_presence() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SaveStore::new(dir.path());
        let file_name = store.save_at("alice", &record(None), noon()).unwrap();

        assert!(store.delete("alice", &file_name));
        assert!(!store.delete("alice", &file_name));
        assert!(!store.delete("alice", "../escape.json"));
    }

    #[test]
    fn sanitizes_invalid_characters() {
        assert_eq!(sanitize_file_name("a/b\\c:d*e?f\"g<h>i|j"), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(sanitize_file_name("tab\there"), "tab_here");
        assert_eq!(sanitize_file_name("Boss Fight"), "Boss Fight");
    }

    #[test]
    fn dot_user_names_stay_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("saves");
        let mut store = SaveStore::new(&root);

        let file_name = store.save_at("..", &record(None), noon()).unwrap();
        assert!(root.join("__").join(&file_name).is_file());
        assert!(!dir.path().join(&file_name).exists());
        assert!(store.load("..", &file_name).is_some());

        let file_name = store.save_at(".", &record(None), noon()).unwrap();
        assert!(root.join("_").join(&file_name).is_file());
        assert!(!root.join(&file_name).exists());

        assert_eq!(store.user_dir("a.b"), root.join("a.b"));
    }

    #[test]
    fn sequence_continues_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        SaveStore::new(dir.path())
            .save_at("alice", &record(None), noon())
            .unwrap();

        let mut reopened = SaveStore::new(dir.path());
        let file_name = reopened
            .save_at("alice", &record(Some("next")), noon())
            .unwrap();
        assert_eq!(reopened.load("alice", &file_name).unwrap().sequence, 2);
    }
}
