//! Persistence plugin - session resource, save/load requests and reconcile.

use bevy::prelude::*;

use super::reconcile::{begin_reconcile, cancel_reconcile, run_reconcile};
use super::session::{default_data_root, SessionManager};
use super::snapshot::{capture_record, PlayerView};
use crate::animation::Animator;
use crate::combat::AttackChannels;
use crate::core::{GameConfig, GameState, LoadRequest, LoadSceneRequest, SaveRequest, UiMessage};
use crate::player::{Player, PlayerStats, WaterState};
use crate::world::CurrentScene;

/// Persistence plugin - owns the [`SessionManager`] and routes save/load events.
pub struct PersistencePlugin;

impl Plugin for PersistencePlugin {
    fn build(&self, app: &mut App) {
        let data_root = app
            .world()
            .get_resource::<GameConfig>()
            .and_then(|config| config.persistence.data_root.clone())
            .unwrap_or_else(default_data_root);
        info!("Save data root: {}", data_root.display());

        app.insert_resource(SessionManager::open(&data_root))
            .add_systems(
                Update,
                (handle_save_requests, handle_load_requests, begin_reconcile, run_reconcile)
                    .chain(),
            )
            .add_systems(OnExit(GameState::InGame), cancel_reconcile);
    }
}

type SnapshotQuery = (
    Option<&'static Transform>,
    Option<&'static PlayerStats>,
    Option<&'static WaterState>,
    Option<&'static AttackChannels>,
    Option<&'static Animator>,
);

fn handle_save_requests(
    mut requests: EventReader<SaveRequest>,
    mut session: ResMut<SessionManager>,
    current: Res<CurrentScene>,
    player_query: Query<SnapshotQuery, With<Player>>,
    mut messages: EventWriter<UiMessage>,
) {
    for request in requests.read() {
        let snapshot = match player_query.get_single() {
            Ok((transform, stats, water, channels, animator)) => capture_record(
                &current.name,
                PlayerView {
                    transform,
                    stats,
                    water,
                    channels,
                    animator,
                },
            ),
            Err(_) => capture_record(&current.name, PlayerView::default()),
        };

        match session.save_game(snapshot, request.save_name.clone()) {
            Ok(file_name) => {
                messages.send(UiMessage::info(format!("Saved {}", file_name)));
            }
            Err(e) => {
                error!("Save failed: {}", e);
                messages.send(UiMessage::error(format!("Save failed: {}", e)));
            }
        }
    }
}

fn handle_load_requests(
    mut requests: EventReader<LoadRequest>,
    mut session: ResMut<SessionManager>,
    mut scene_requests: EventWriter<LoadSceneRequest>,
    mut messages: EventWriter<UiMessage>,
) {
    for request in requests.read() {
        match session.request_load_and_start(&request.file_name) {
            Ok(scene) => {
                scene_requests.send(LoadSceneRequest::new(scene));
            }
            Err(e) => {
                warn!("Load failed: {}", e);
                messages.send(UiMessage::error(format!("Load failed: {}", e)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::SaveRecord;

    fn load_app(session: SessionManager) -> App {
        let mut app = App::new();
        app.add_event::<LoadRequest>()
            .add_event::<LoadSceneRequest>()
            .add_event::<UiMessage>()
            .insert_resource(session)
            .add_systems(Update, handle_load_requests);
        app
    }

    fn request_load(app: &mut App, file_name: &str) {
        app.world_mut().send_event(LoadRequest {
            file_name: file_name.to_string(),
        });
        app.update();
    }

    fn scene_requests(app: &App) -> Vec<String> {
        app.world()
            .resource::<Events<LoadSceneRequest>>()
            .iter_current_update_events()
            .map(|request| request.name.clone())
            .collect()
    }

    fn ui_messages(app: &App) -> Vec<String> {
        app.world()
            .resource::<Events<UiMessage>>()
            .iter_current_update_events()
            .map(|message| message.text.clone())
            .collect()
    }

    #[test]
    fn missing_save_changes_no_scene() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionManager::open(dir.path());
        session.set_current_user("mira").unwrap();
        let mut app = load_app(session);

        request_load(&mut app, "missing.json");

        assert!(scene_requests(&app).is_empty());
        assert!(!app.world().resource::<SessionManager>().has_pending_load());
        let messages = ui_messages(&app);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Load failed"));
    }

    #[test]
    fn load_while_logged_out_changes_no_scene() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = load_app(SessionManager::open(dir.path()));

        request_load(&mut app, "anything.json");

        assert!(scene_requests(&app).is_empty());
    }

    #[test]
    fn existing_save_requests_its_scene() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionManager::open(dir.path());
        session.set_current_user("mira").unwrap();
        let record = SaveRecord {
            scene_name: "Lagoon".into(),
            ..default()
        };
        let file_name = session.save_game(Ok(record), None).unwrap();
        let mut app = load_app(session);

        request_load(&mut app, &file_name);

        assert_eq!(scene_requests(&app), vec!["Lagoon".to_string()]);
        assert!(app.world().resource::<SessionManager>().has_pending_load());
    }
}
