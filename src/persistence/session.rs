//! The logged-in user and save/load orchestration.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{LoginError, SessionError};
use super::record::{SaveMeta, SaveRecord};
use super::store::SaveStore;

/// Folder under the platform data directory.
pub const APP_DIR_NAME: &str = "ScytheIsle";

const SAVES_DIR: &str = "saves";
const PROFILE_FILE: &str = "profile.json";

/// Where saves and the profile live unless the config says otherwise.
pub fn default_data_root() -> PathBuf {
    match dirs::data_local_dir() {
        Some(dir) => dir.join(APP_DIR_NAME),
        None => {
            warn!("No local data directory available, saving next to the executable");
            PathBuf::from(APP_DIR_NAME)
        }
    }
}

/// Remembers the last user between runs.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Profile {
    user_id: String,
}

/// Session state: who is playing and which save is waiting to be applied.
#[derive(Resource, Debug)]
pub struct SessionManager {
    store: SaveStore,
    profile_path: PathBuf,
    current_user_id: Option<String>,
    pending_load: Option<SaveRecord>,
}

impl SessionManager {
    /// Open the session rooted at `data_root`, restoring the last user.
    pub fn open(data_root: impl AsRef<Path>) -> Self {
        let data_root = data_root.as_ref();
        let profile_path = data_root.join(PROFILE_FILE);
        let current_user_id = read_profile(&profile_path);
        if let Some(user) = &current_user_id {
            info!("Restored user '{}'", user);
        }

        Self {
            store: SaveStore::new(data_root.join(SAVES_DIR)),
            profile_path,
            current_user_id,
            pending_load: None,
        }
    }

    pub fn current_user_id(&self) -> Option<&str> {
        self.current_user_id.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user_id.is_some()
    }

    /// Log in as `user_id` (trimmed) and remember it.
    pub fn set_current_user(&mut self, user_id: &str) -> Result<(), LoginError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(LoginError::EmptyUserName);
        }

        info!("Logged in as '{}'", user_id);
        self.current_user_id = Some(user_id.to_string());
        self.write_profile(user_id);
        Ok(())
    }

    /// Log out and forget any pending load.
    pub fn clear_current_user(&mut self) {
        if let Some(user) = self.current_user_id.take() {
            info!("Logged out '{}'", user);
        }
        self.pending_load = None;
        match fs::remove_file(&self.profile_path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove profile {}: {}", self.profile_path.display(), e),
        }
    }

    /// Persist a captured snapshot under the current user.
    pub fn save_game(
        &mut self,
        snapshot: Result<SaveRecord, SessionError>,
        save_name: Option<String>,
    ) -> Result<String, SessionError> {
        let user_id = self
            .current_user_id
            .clone()
            .ok_or(SessionError::NotLoggedIn)?;
        let mut record = snapshot?;
        record.save_name = save_name;
        Ok(self.store.save(&user_id, &record)?)
    }

    /// Queue a save for applying and return the scene it belongs to.
    pub fn request_load_and_start(&mut self, file_name: &str) -> Result<String, SessionError> {
        let user_id = self
            .current_user_id
            .as_deref()
            .ok_or(SessionError::NotLoggedIn)?;
        let record = self
            .store
            .load(user_id, file_name)
            .ok_or_else(|| SessionError::NotFound(file_name.to_string()))?;

        let scene = record.scene_name.clone();
        info!("Loading '{}' into scene '{}'", file_name, scene);
        self.pending_load = Some(record);
        Ok(scene)
    }

    pub fn has_pending_load(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Hand over the pending load; later calls return `None`.
    pub fn take_pending_load(&mut self) -> Option<SaveRecord> {
        self.pending_load.take()
    }

    pub fn clear_pending_load(&mut self) {
        self.pending_load = None;
    }

    pub fn has_saves(&self) -> bool {
        !self.list_saves().is_empty()
    }

    /// Saves of the current user, most recent first.
    pub fn list_saves(&self) -> Vec<SaveMeta> {
        self.current_user_id
            .as_deref()
            .map(|user| self.store.list_metas(user))
            .unwrap_or_default()
    }

    pub fn latest_save(&self) -> Option<SaveMeta> {
        self.list_saves().into_iter().next()
    }

    pub fn load_save_file(&self, file_name: &str) -> Option<SaveRecord> {
        let user = self.current_user_id.as_deref()?;
        self.store.load(user, file_name)
    }

    pub fn delete_save(&self, file_name: &str) -> bool {
        self.current_user_id
            .as_deref()
            .is_some_and(|user| self.store.delete(user, file_name))
    }

    fn write_profile(&self, user_id: &str) {
        let profile = Profile {
            user_id: user_id.to_string(),
        };
        let result = serde_json::to_string_pretty(&profile)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                if let Some(parent) = self.profile_path.parent() {
                    fs::create_dir_all(parent).map_err(|e| e.to_string())?;
                }
                fs::write(&self.profile_path, json).map_err(|e| e.to_string())
            });
        if let Err(e) = result {
            warn!("Failed to write profile {}: {}", self.profile_path.display(), e);
        }
    }
}

fn read_profile(path: &Path) -> Option<String> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("Failed to read profile {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str::<Profile>(&contents) {
        Ok(profile) if !profile.user_id.trim().is_empty() => Some(profile.user_id),
        Ok(_) => None,
        Err(e) => {
            warn!("Ignoring corrupt profile {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::error::SaveError;

    fn snapshot() -> Result<SaveRecord, SessionError> {
        Ok(SaveRecord {
            scene_name: "Island".into(),
            health: 300.0,
            mana: 200.0,
            ..default()
        })
    }

    #[test]
    fn save_without_user_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionManager::open(dir.path());

        assert!(matches!(
            session.save_game(snapshot(), None),
            Err(SessionError::NotLoggedIn)
        ));
        assert!(!dir.path().join(SAVES_DIR).exists());
    }

    #[test]
    fn incomplete_snapshot_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionManager::open(dir.path());
        session.set_current_user("alice").unwrap();

        let result = session.save_game(Err(SessionError::IncompleteState(vec!["Player"])), None);
        assert!(matches!(result, Err(SessionError::IncompleteState(_))));
        assert!(!session.has_saves());
    }

    #[test]
    fn save_then_load_queues_pending_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionManager::open(dir.path());
        session.set_current_user("alice").unwrap();

        let file_name = session
            .save_game(snapshot(), Some("Shore".into()))
            .unwrap();
        assert!(session.has_saves());
        assert_eq!(session.latest_save().unwrap().save_name, "Shore");

        let scene = session.request_load_and_start(&file_name).unwrap();
        assert_eq!(scene, "Island");
        assert!(session.has_pending_load());

        let pending = session.take_pending_load().unwrap();
        assert_eq!(pending.health, 300.0);
        assert!(session.take_pending_load().is_none());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionManager::open(dir.path());
        session.set_current_user("alice").unwrap();

        assert!(matches!(
            session.request_load_and_start("missing.json"),
            Err(SessionError::NotFound(name)) if name == "missing.json"
        ));
        assert!(!session.has_pending_load());
    }

    #[test]
    fn load_requires_login() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionManager::open(dir.path());
        assert!(matches!(
            session.request_load_and_start("x.json"),
            Err(SessionError::NotLoggedIn)
        ));
        assert!(session.list_saves().is_empty());
        assert!(session.load_save_file("x.json").is_none());
        assert!(!session.delete_save("x.json"));
    }

    #[test]
    fn login_is_remembered_until_logout() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut session = SessionManager::open(dir.path());
            assert_eq!(session.set_current_user("   "), Err(LoginError::EmptyUserName));
            session.set_current_user("  bob ").unwrap();
        }

        let mut session = SessionManager::open(dir.path());
        assert_eq!(session.current_user_id(), Some("bob"));

        session.clear_current_user();
        assert!(!session.is_logged_in());
        assert_eq!(SessionManager::open(dir.path()).current_user_id(), None);
    }

    #[test]
    fn store_errors_are_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the saves directory should be makes writes fail.
        fs::write(dir.path().join(SAVES_DIR), "not a dir").unwrap();
        let mut session = SessionManager::open(dir.path());
        session.set_current_user("alice").unwrap();

        assert!(matches!(
            session.save_game(snapshot(), None),
            Err(SessionError::Store(SaveError::Io { .. }))
        ));
    }

    #[test]
    fn delete_removes_from_listing() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionManager::open(dir.path());
        session.set_current_user("alice").unwrap();
        let file_name = session.save_game(snapshot(), None).unwrap();

        assert!(session.load_save_file(&file_name).is_some());
        assert!(session.delete_save(&file_name));
        assert!(!session.has_saves());
    }
}
