//! Login dialog - a typed user name resolved locally.

use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::ui::FocusPolicy;

use super::widgets::{overlay_node, title, TEXT_COLOR};
use crate::core::{GameState, LoadRequest, UiMessage};
use crate::persistence::{LoginError, SessionManager};

const MAX_NAME_LENGTH: usize = 32;

/// Present while the dialog is open.
#[derive(Resource, Debug, Default)]
pub struct LoginDialog {
    pub input: String,
    pub error: Option<LoginError>,
    /// Continue with the latest save after logging in
    pub continue_after: bool,
}

#[derive(Component)]
struct LoginDialogUi;

#[derive(Component)]
struct LoginInputText;

#[derive(Component)]
struct LoginErrorText;

/// What a key press did to the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginKeyAction {
    Edited,
    Submit,
    Cancel,
    Ignored,
}

/// Apply one key press to the typed name.
pub fn apply_login_key(input: &mut String, key: &Key) -> LoginKeyAction {
    match key {
        Key::Enter => LoginKeyAction::Submit,
        Key::Escape => LoginKeyAction::Cancel,
        Key::Backspace => {
            if input.pop().is_some() {
                LoginKeyAction::Edited
            } else {
                LoginKeyAction::Ignored
            }
        }
        Key::Space => push_chars(input, " "),
        Key::Character(text) => push_chars(input, text),
        _ => LoginKeyAction::Ignored,
    }
}

fn push_chars(input: &mut String, text: &str) -> LoginKeyAction {
    let mut edited = false;
    for c in text.chars().filter(|c| !c.is_control()) {
        if input.chars().count() >= MAX_NAME_LENGTH {
            break;
        }
        input.push(c);
        edited = true;
    }
    if edited {
        LoginKeyAction::Edited
    } else {
        LoginKeyAction::Ignored
    }
}

pub fn setup_login_systems(app: &mut App) {
    app.add_systems(
        Update,
        (login_text_input, sync_login_dialog_ui)
            .chain()
            .run_if(in_state(GameState::MainMenu)),
    )
    .add_systems(OnExit(GameState::MainMenu), close_login_dialog);
}

fn login_text_input(
    mut commands: Commands,
    mut keys: EventReader<KeyboardInput>,
    dialog: Option<ResMut<LoginDialog>>,
    mut session: ResMut<SessionManager>,
    mut load_requests: EventWriter<LoadRequest>,
    mut messages: EventWriter<UiMessage>,
) {
    let Some(mut dialog) = dialog else {
        keys.clear();
        return;
    };

    for event in keys.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }

        match apply_login_key(&mut dialog.input, &event.logical_key) {
            LoginKeyAction::Edited => dialog.error = None,
            LoginKeyAction::Ignored => {}
            LoginKeyAction::Cancel => {
                commands.remove_resource::<LoginDialog>();
                return;
            }
            LoginKeyAction::Submit => match session.set_current_user(&dialog.input) {
                Ok(()) => {
                    messages.send(UiMessage::info(format!(
                        "Logged in as {}",
                        dialog.input.trim()
                    )));
                    if dialog.continue_after {
                        continue_latest_save(&session, &mut load_requests, &mut messages);
                    }
                    commands.remove_resource::<LoginDialog>();
                    return;
                }
                Err(e) => dialog.error = Some(e),
            },
        }
    }
}

/// Load the newest save of the current user, or say there is none.
pub fn continue_latest_save(
    session: &SessionManager,
    load_requests: &mut EventWriter<LoadRequest>,
    messages: &mut EventWriter<UiMessage>,
) {
    match session.latest_save() {
        Some(meta) => {
            load_requests.send(LoadRequest {
                file_name: meta.file_name,
            });
        }
        None => {
            messages.send(UiMessage::info("No saves found"));
        }
    }
}

/// Spawn, refresh or despawn the dialog to match [`LoginDialog`].
fn sync_login_dialog_ui(
    mut commands: Commands,
    dialog: Option<Res<LoginDialog>>,
    ui_query: Query<Entity, With<LoginDialogUi>>,
    mut input_query: Query<&mut Text, (With<LoginInputText>, Without<LoginErrorText>)>,
    mut error_query: Query<&mut Text, (With<LoginErrorText>, Without<LoginInputText>)>,
) {
    let Some(dialog) = dialog else {
        for entity in ui_query.iter() {
            commands.entity(entity).despawn_recursive();
        }
        return;
    };

    if ui_query.is_empty() {
        spawn_login_dialog(&mut commands);
        return;
    }

    let input = format!("{}_", dialog.input);
    if let Ok(mut text) = input_query.get_single_mut() {
        if text.0 != input {
            text.0 = input;
        }
    }
    let error = dialog
        .error
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    if let Ok(mut text) = error_query.get_single_mut() {
        if text.0 != error {
            text.0 = error;
        }
    }
}

fn spawn_login_dialog(commands: &mut Commands) {
    commands
        .spawn((
            overlay_node(),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.8)),
            FocusPolicy::Block,
            GlobalZIndex(50),
            LoginDialogUi,
        ))
        .with_children(|parent| {
            parent.spawn(title("LOGIN", 40.0, TEXT_COLOR));

            parent
                .spawn((
                    Node {
                        width: Val::Px(320.0),
                        padding: UiRect::all(Val::Px(10.0)),
                        margin: UiRect::bottom(Val::Px(10.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.12, 0.12, 0.16)),
                ))
                .with_children(|field| {
                    field.spawn((
                        Text::new("_"),
                        TextFont {
                            font_size: 24.0,
                            ..default()
                        },
                        TextColor(TEXT_COLOR),
                        LoginInputText,
                    ));
                });

            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.45, 0.4)),
                LoginErrorText,
            ));

            parent.spawn((
                Text::new("Enter to log in, Escape to cancel"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.5, 0.5, 0.55)),
                Node {
                    margin: UiRect::top(Val::Px(20.0)),
                    ..default()
                },
            ));
        });
}

fn close_login_dialog(mut commands: Commands, ui_query: Query<Entity, With<LoginDialogUi>>) {
    commands.remove_resource::<LoginDialog>();
    for entity in ui_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(keys: &[Key]) -> (String, Vec<LoginKeyAction>) {
        let mut input = String::new();
        let actions = keys.iter().map(|k| apply_login_key(&mut input, k)).collect();
        (input, actions)
    }

    #[test]
    fn typing_and_backspace() {
        let (input, _) = typed(&[
            Key::Character("a".into()),
            Key::Character("b".into()),
            Key::Backspace,
            Key::Space,
            Key::Character("c".into()),
        ]);
        assert_eq!(input, "a c");
    }

    #[test]
    fn enter_and_escape_are_commands() {
        let (input, actions) = typed(&[Key::Enter, Key::Escape, Key::Backspace, Key::Tab]);
        assert!(input.is_empty());
        assert_eq!(
            actions,
            [
                LoginKeyAction::Submit,
                LoginKeyAction::Cancel,
                LoginKeyAction::Ignored,
                LoginKeyAction::Ignored
            ]
        );
    }

    #[test]
    fn name_length_is_capped() {
        let mut input = "x".repeat(MAX_NAME_LENGTH);
        assert_eq!(
            apply_login_key(&mut input, &Key::Character("y".into())),
            LoginKeyAction::Ignored
        );
        assert_eq!(input.len(), MAX_NAME_LENGTH);
    }
}
