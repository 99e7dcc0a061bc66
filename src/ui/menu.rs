//! Main menu and pause menu.

use bevy::prelude::*;

use super::login::{continue_latest_save, LoginDialog};
use super::widgets::{
    despawn_with, overlay_node, spawn_menu_button, title, TEXT_COLOR,
};
use crate::core::{
    GameState, LoadRequest, LoadSceneRequest, PlayState, SaveRequest, UiMessage, MAIN_MENU_SCENE,
    START_SCENE,
};
use crate::persistence::SessionManager;

/// Marker for main menu UI entities.
#[derive(Component)]
struct MainMenuUi;

/// Marker for pause menu UI entities.
#[derive(Component)]
struct PauseMenuUi;

#[derive(Component)]
struct CurrentUserText;

#[derive(Component)]
struct LoginButtonText;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
enum MainMenuButton {
    Start,
    Continue,
    LoginLogout,
    Quit,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
enum PauseMenuButton {
    Resume,
    Save,
    MainMenu,
}

pub fn setup_menu_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::MainMenu), setup_main_menu)
        .add_systems(
            Update,
            (
                main_menu_input.run_if(not(resource_exists::<LoginDialog>)),
                update_user_labels,
            )
                .run_if(in_state(GameState::MainMenu)),
        )
        .add_systems(OnExit(GameState::MainMenu), despawn_with::<MainMenuUi>)
        .add_systems(OnEnter(PlayState::Paused), setup_pause_menu)
        .add_systems(
            Update,
            pause_menu_input.run_if(in_state(PlayState::Paused)),
        )
        .add_systems(OnExit(PlayState::Paused), despawn_with::<PauseMenuUi>);
}

/// Label for the current user line.
fn user_label(session: &SessionManager) -> String {
    match session.current_user_id() {
        Some(user) => format!("Logged in as {user}"),
        None => "Not logged in".to_string(),
    }
}

fn login_button_label(session: &SessionManager) -> &'static str {
    if session.is_logged_in() {
        "Logout"
    } else {
        "Login"
    }
}

/// Set up the main menu.
fn setup_main_menu(mut commands: Commands, session: Res<SessionManager>) {
    commands
        .spawn((
            overlay_node(),
            BackgroundColor(Color::srgb(0.05, 0.07, 0.1)),
            MainMenuUi,
        ))
        .with_children(|parent| {
            parent.spawn(title("SCYTHE ISLE", 72.0, Color::srgb(0.75, 0.8, 0.7)));

            parent.spawn((
                Text::new(user_label(&session)),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgb(0.5, 0.5, 0.55)),
                Node {
                    margin: UiRect::bottom(Val::Px(30.0)),
                    ..default()
                },
                CurrentUserText,
            ));

            spawn_menu_button(parent, "Start", MainMenuButton::Start, ());
            spawn_menu_button(parent, "Continue", MainMenuButton::Continue, ());
            spawn_menu_button(
                parent,
                login_button_label(&session),
                MainMenuButton::LoginLogout,
                LoginButtonText,
            );
            spawn_menu_button(parent, "Quit", MainMenuButton::Quit, ());
        });
}

/// Handle main menu button presses.
fn main_menu_input(
    mut commands: Commands,
    interaction_query: Query<(&Interaction, &MainMenuButton), Changed<Interaction>>,
    mut session: ResMut<SessionManager>,
    mut scene_requests: EventWriter<LoadSceneRequest>,
    mut load_requests: EventWriter<LoadRequest>,
    mut messages: EventWriter<UiMessage>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, button) in interaction_query.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }

        match button {
            MainMenuButton::Start => {
                session.clear_pending_load();
                scene_requests.send(LoadSceneRequest::new(START_SCENE));
            }
            MainMenuButton::Continue => {
                if session.is_logged_in() {
                    continue_latest_save(&session, &mut load_requests, &mut messages);
                } else {
                    commands.insert_resource(LoginDialog {
                        continue_after: true,
                        ..default()
                    });
                }
            }
            MainMenuButton::LoginLogout => {
                if session.is_logged_in() {
                    session.clear_current_user();
                    messages.send(UiMessage::info("Logged out"));
                } else {
                    commands.insert_resource(LoginDialog::default());
                }
            }
            MainMenuButton::Quit => {
                exit.send(AppExit::Success);
            }
        }
    }
}

/// Keep the user line and login button in step with the session.
fn update_user_labels(
    session: Res<SessionManager>,
    mut user_query: Query<&mut Text, (With<CurrentUserText>, Without<LoginButtonText>)>,
    mut button_query: Query<&mut Text, (With<LoginButtonText>, Without<CurrentUserText>)>,
) {
    if !session.is_changed() {
        return;
    }
    for mut text in user_query.iter_mut() {
        text.0 = user_label(&session);
    }
    for mut text in button_query.iter_mut() {
        text.0 = login_button_label(&session).to_string();
    }
}

/// Set up the pause menu.
fn setup_pause_menu(mut commands: Commands) {
    commands
        .spawn((
            overlay_node(),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            PauseMenuUi,
        ))
        .with_children(|parent| {
            parent.spawn(title("PAUSED", 48.0, TEXT_COLOR));

            spawn_menu_button(parent, "Resume", PauseMenuButton::Resume, ());
            spawn_menu_button(parent, "Save", PauseMenuButton::Save, ());
            spawn_menu_button(parent, "Main Menu", PauseMenuButton::MainMenu, ());
        });
}

/// Handle pause menu button presses.
fn pause_menu_input(
    interaction_query: Query<(&Interaction, &PauseMenuButton), Changed<Interaction>>,
    mut next_play_state: ResMut<NextState<PlayState>>,
    mut save_requests: EventWriter<SaveRequest>,
    mut scene_requests: EventWriter<LoadSceneRequest>,
) {
    for (interaction, button) in interaction_query.iter() {
        if *interaction != Interaction::Pressed {
            continue;
        }

        match button {
            PauseMenuButton::Resume => {
                next_play_state.set(PlayState::Exploring);
            }
            PauseMenuButton::Save => {
                save_requests.send(SaveRequest::default());
            }
            PauseMenuButton::MainMenu => {
                scene_requests.send(LoadSceneRequest::new(MAIN_MENU_SCENE));
            }
        }
    }
}
