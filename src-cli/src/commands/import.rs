//! `import <FILE>`

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use authenticator_store as store;

use super::write_json;
use crate::state::AppState;

/// Import a text file of key URIs and print the summary.
pub fn import(
    state: &AppState,
    file: &Path,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let summary = store::import_file(state.conn(), file)
        .with_context(|| format!("failed to import {}", file.display()))?;

    if json {
        return write_json(out, &summary);
    }
    writeln!(
        out,
        "imported {} token(s), skipped {} line(s)",
        summary.imported,
        summary.skipped.len()
    )?;
    for skipped in &summary.skipped {
        writeln!(out, "  line {}: {}", skipped.line, skipped.reason)?;
    }
    Ok(())
}
