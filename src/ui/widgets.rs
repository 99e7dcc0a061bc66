//! Shared menu widgets.

use bevy::prelude::*;

pub const NORMAL_BUTTON: Color = Color::srgb(0.15, 0.15, 0.2);
pub const HOVERED_BUTTON: Color = Color::srgb(0.25, 0.25, 0.3);
pub const PRESSED_BUTTON: Color = Color::srgb(0.3, 0.3, 0.35);
pub const TEXT_COLOR: Color = Color::srgb(0.8, 0.8, 0.85);

/// Marker for the camera that renders menus when no game camera exists.
#[derive(Component)]
pub struct MenuCamera;

/// Full-screen column that centers its children.
pub fn overlay_node() -> Node {
    Node {
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        flex_direction: FlexDirection::Column,
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        position_type: PositionType::Absolute,
        ..default()
    }
}

/// Helper to spawn a menu button carrying `action`.
///
/// The label is a child entity; `label_marker` lets callers rewrite it later.
pub fn spawn_menu_button<A: Component, L: Bundle>(
    parent: &mut ChildBuilder,
    text: &str,
    action: A,
    label_marker: L,
) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(220.0),
                height: Val::Px(50.0),
                margin: UiRect::all(Val::Px(8.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(NORMAL_BUTTON),
            action,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(text),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                label_marker,
            ));
        });
}

/// Title text with space below it.
pub fn title(text: &str, font_size: f32, color: Color) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(color),
        Node {
            margin: UiRect::bottom(Val::Px(40.0)),
            ..default()
        },
    )
}

/// Hover/press colors for every button.
pub fn button_feedback(
    mut interaction_query: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
) {
    for (interaction, mut bg_color) in interaction_query.iter_mut() {
        *bg_color = match interaction {
            Interaction::Pressed => PRESSED_BUTTON,
            Interaction::Hovered => HOVERED_BUTTON,
            Interaction::None => NORMAL_BUTTON,
        }
        .into();
    }
}

pub fn spawn_menu_camera(mut commands: Commands) {
    commands.spawn((Camera2d, MenuCamera));
}

pub fn despawn_menu_camera(mut commands: Commands, camera_query: Query<Entity, With<MenuCamera>>) {
    for entity in camera_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

/// Despawn every entity carrying marker `M`.
pub fn despawn_with<M: Component>(mut commands: Commands, query: Query<Entity, With<M>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
