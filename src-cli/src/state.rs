//! Per-invocation application state.

use std::path::{Path, PathBuf};

use anyhow::Context;
use authenticator_store::db::Connection;
use authenticator_store::{Preferences, TokenDb};

/// Directory name under the platform data directory.
const APP_DIR: &str = "authenticator";

/// Everything a command needs.
#[derive(Debug)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub db: TokenDb,
    pub preferences: Preferences,
}

impl AppState {
    /// Open (or create) the database and load preferences under `data_dir`.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be created or the database cannot be
    /// opened and migrated.
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let db = TokenDb::open_in_dir(data_dir)
            .with_context(|| format!("failed to open token database in {}", data_dir.display()))?;
        let preferences = Preferences::load(data_dir);
        tracing::debug!(data_dir = %data_dir.display(), "state opened");
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            db,
            preferences,
        })
    }

    /// Shorthand for the underlying connection.
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        self.db.connection()
    }
}

/// The platform data directory joined with `authenticator`.
///
/// # Errors
///
/// Fails when the platform exposes no data directory (set
/// `--data-dir` or `AUTHENTICATOR_DATA_DIR` instead).
pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .context("no platform data directory; pass --data-dir")
}
