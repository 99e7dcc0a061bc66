//! UI module - main menu, login, pause menu, HUD and toasts.

mod hud;
mod login;
mod menu;
mod plugin;
mod toast;
mod widgets;

pub use login::{apply_login_key, LoginDialog, LoginKeyAction};
pub use plugin::UiPlugin;
