//! `prefs`: show or change preferences.

use std::io::Write;

use anyhow::Context;

use super::write_json;
use crate::state::AppState;

/// Fields to change; `None` leaves the current value.
#[derive(Debug, Default)]
pub struct PrefsUpdate {
    pub code_grouping: Option<bool>,
    pub refresh_interval_ms: Option<u64>,
    pub export_file_prefix: Option<String>,
}

impl PrefsUpdate {
    const fn is_empty(&self) -> bool {
        self.code_grouping.is_none()
            && self.refresh_interval_ms.is_none()
            && self.export_file_prefix.is_none()
    }
}

/// Apply `update` (saving if anything changed) and print the result.
pub fn prefs(
    state: &mut AppState,
    update: PrefsUpdate,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if !update.is_empty() {
        let prefs = &mut state.preferences;
        if let Some(v) = update.code_grouping {
            prefs.code_grouping = v;
        }
        if let Some(v) = update.refresh_interval_ms {
            prefs.refresh_interval_ms = v;
        }
        if let Some(v) = update.export_file_prefix {
            prefs.export_file_prefix = v;
        }
        prefs
            .save(&state.data_dir)
            .context("failed to save preferences")?;
        tracing::info!("preferences saved");
    }

    let prefs = &state.preferences;
    if json {
        return write_json(out, prefs);
    }
    writeln!(out, "codeGrouping:      {}", prefs.code_grouping)?;
    writeln!(out, "refreshIntervalMs: {}", prefs.refresh_interval_ms)?;
    writeln!(out, "exportFilePrefix:  {}", prefs.export_file_prefix)?;
    Ok(())
}
