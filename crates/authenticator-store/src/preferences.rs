//! User preferences, stored as plain JSON next to the token database.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::export::write_owner_only;

// ── Preferences ────────────────────────────────────────────────────

/// Display and export preferences.
///
/// Persisted to `{data_dir}/preferences.json`. Missing fields take their
/// defaults, so older files keep loading as fields are added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Split codes into two groups (`"123 456"`).
    #[serde(default = "default_code_grouping")]
    pub code_grouping: bool,

    /// Milliseconds between code board refreshes in `watch`.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,

    /// File-name prefix for exports.
    #[serde(default = "default_export_prefix")]
    pub export_file_prefix: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            code_grouping: default_code_grouping(),
            refresh_interval_ms: default_refresh_interval(),
            export_file_prefix: default_export_prefix(),
        }
    }
}

const fn default_code_grouping() -> bool {
    true
}
const fn default_refresh_interval() -> u64 {
    1_000
}
fn default_export_prefix() -> String {
    "2FA-".into()
}

// ── File I/O ───────────────────────────────────────────────────────

const PREFERENCES_FILE: &str = "preferences.json";

impl Preferences {
    /// Load preferences from `{data_dir}/preferences.json`.
    ///
    /// Returns [`Default::default()`] when the file is missing or
    /// contains invalid JSON.
    #[must_use]
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(PREFERENCES_FILE);
        let Ok(contents) = fs::read_to_string(&path) else {
            return Self::default();
        };
        serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "ignoring corrupt preferences file"
            );
            Self::default()
        })
    }

    /// Persist preferences to `{data_dir}/preferences.json` (write to
    /// `.tmp`, then rename).
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the directory does not exist or the
    /// file system rejects the write/rename.
    pub fn save(&self, data_dir: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        write_owner_only(&data_dir.join(PREFERENCES_FILE), json.as_bytes())
    }
}

// ── Tests ──────────────────────────────────────────────────────────
