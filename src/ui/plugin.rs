//! UI plugin - menus, login dialog, HUD and toasts.

use bevy::prelude::*;

use super::widgets::{button_feedback, despawn_menu_camera, spawn_menu_camera};
use super::{hud, login, menu, toast};
use crate::core::GameState;

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);
        menu::setup_menu_systems(app);
        login::setup_login_systems(app);
        toast::setup_toast_systems(app);

        app.add_systems(OnEnter(GameState::MainMenu), spawn_menu_camera)
            .add_systems(OnExit(GameState::MainMenu), despawn_menu_camera)
            .add_systems(Update, button_feedback);
    }
}
