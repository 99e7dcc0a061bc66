//! Persistence module - per-user save files, the session and load reconciliation.
//!
//! Saving captures a [`SaveRecord`] from the player and writes it through
//! the [`SaveStore`]. Loading is two-phase: the session queues the record and
//! asks for its scene, and once the scene is built the record is applied to
//! the new player.

mod applier;
mod error;
mod plugin;
mod reconcile;
mod record;
mod session;
mod snapshot;
mod store;

pub use applier::{apply_record, PlayerTarget};
pub use error::{LoginError, ReconcileError, SaveError, SessionError};
pub use plugin::PersistencePlugin;
pub use reconcile::PendingReconcile;
pub use record::{SaveMeta, SaveRecord, SavedVec3};
pub use session::{default_data_root, SessionManager, APP_DIR_NAME};
pub use snapshot::{capture_record, PlayerView};
pub use store::{sanitize_file_name, SaveStore};
