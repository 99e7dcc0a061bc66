//! In-game HUD - health and mana display.

use bevy::prelude::*;

use super::widgets::despawn_with;
use crate::core::GameState;
use crate::player::{Player, PlayerStats};

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

/// Marker for health bar fill.
#[derive(Component)]
pub struct HealthBar;

/// Marker for mana bar fill.
#[derive(Component)]
pub struct ManaBar;

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnExit(GameState::InGame), despawn_with::<HudRoot>)
        .add_systems(Update, update_bars.run_if(in_state(GameState::InGame)));
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands) {
    // Bottom-left corner
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::End,
                align_items: AlignItems::Start,
                padding: UiRect::all(Val::Px(20.0)),
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            spawn_bar(parent, "Health", Color::srgb(0.8, 0.2, 0.2), HealthBar);
            spawn_bar(parent, "Mana", Color::srgb(0.2, 0.4, 0.9), ManaBar);
        });
}

/// Helper to spawn a status bar.
fn spawn_bar<M: Component>(parent: &mut ChildBuilder, label: &str, color: Color, bar_marker: M) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            margin: UiRect::bottom(Val::Px(5.0)),
            ..default()
        })
        .with_children(|bar_parent| {
            bar_parent.spawn((
                Text::new(label),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
                Node {
                    width: Val::Px(60.0),
                    ..default()
                },
            ));

            bar_parent
                .spawn((
                    Node {
                        width: Val::Px(180.0),
                        height: Val::Px(12.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
                ))
                .with_children(|bg| {
                    bg.spawn((
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(color),
                        bar_marker,
                    ));
                });
        });
}

/// Resize both fills from the player's stats.
fn update_bars(
    player_query: Query<&PlayerStats, (With<Player>, Changed<PlayerStats>)>,
    mut health_query: Query<&mut Node, (With<HealthBar>, Without<ManaBar>)>,
    mut mana_query: Query<&mut Node, (With<ManaBar>, Without<HealthBar>)>,
) {
    let Ok(stats) = player_query.get_single() else {
        return;
    };

    if let Ok(mut bar) = health_query.get_single_mut() {
        bar.width = Val::Percent(stats.health_fraction() * 100.0);
    }
    if let Ok(mut bar) = mana_query.get_single_mut() {
        bar.width = Val::Percent(stats.mana_fraction() * 100.0);
    }
}
