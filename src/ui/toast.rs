//! Short-lived messages stacked at the top of the screen.

use bevy::prelude::*;

use crate::core::{MessageKind, UiMessage};

const TOAST_SECONDS: f32 = 3.0;
const MAX_TOASTS: usize = 4;

#[derive(Component)]
pub struct ToastRoot;

/// A visible message and the real time it has left.
#[derive(Component)]
pub struct Toast {
    timer: Timer,
}

pub fn setup_toast_systems(app: &mut App) {
    app.add_systems(Startup, spawn_toast_root)
        .add_systems(Update, (show_toasts, expire_toasts).chain());
}

fn spawn_toast_root(mut commands: Commands) {
    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            top: Val::Px(20.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            ..default()
        },
        GlobalZIndex(100),
        ToastRoot,
    ));
}

fn toast_color(kind: MessageKind) -> Color {
    match kind {
        MessageKind::Info => Color::srgb(0.85, 0.85, 0.9),
        MessageKind::Error => Color::srgb(1.0, 0.45, 0.4),
    }
}

fn show_toasts(
    mut commands: Commands,
    mut messages: EventReader<UiMessage>,
    root_query: Query<(Entity, Option<&Children>), With<ToastRoot>>,
) {
    let Ok((root, children)) = root_query.get_single() else {
        return;
    };
    let mut visible = children.map_or(0, |c| c.len());

    for message in messages.read() {
        match message.kind {
            MessageKind::Info => info!("Toast: {}", message.text),
            MessageKind::Error => warn!("Toast: {}", message.text),
        }

        // Oldest first; drop from the front when full.
        if visible >= MAX_TOASTS {
            if let Some(oldest) = children.and_then(|c| c.get(visible - MAX_TOASTS)) {
                commands.entity(*oldest).despawn_recursive();
            }
        }
        visible += 1;

        let toast = commands
            .spawn((
                Node {
                    padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                    margin: UiRect::bottom(Val::Px(6.0)),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.75)),
                Toast {
                    timer: Timer::from_seconds(TOAST_SECONDS, TimerMode::Once),
                },
            ))
            .with_children(|toast| {
                toast.spawn((
                    Text::new(message.text.clone()),
                    TextFont {
                        font_size: 18.0,
                        ..default()
                    },
                    TextColor(toast_color(message.kind)),
                ));
            })
            .id();
        commands.entity(root).add_child(toast);
    }
}

/// Toasts keep counting down while the game is paused.
fn expire_toasts(
    mut commands: Commands,
    time: Res<Time<Real>>,
    mut toast_query: Query<(Entity, &mut Toast)>,
) {
    for (entity, mut toast) in toast_query.iter_mut() {
        if toast.timer.tick(time.delta()).finished() {
            commands.entity(entity).despawn_recursive();
        }
    }
}
