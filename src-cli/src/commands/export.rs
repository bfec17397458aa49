//! `export [--out DIR] [--stdout]`

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use authenticator_store::{self as store, unix_now};

use super::write_json;
use crate::state::AppState;

/// Write every stored URI to a timestamped file, or to `out`.
pub fn export(
    state: &AppState,
    dir: Option<PathBuf>,
    to_stdout: bool,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let records = store::list_tokens(state.conn())?;

    if to_stdout {
        out.write_all(store::export_text(&records).as_bytes())?;
        return Ok(());
    }

    let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("no current directory; pass --out")?,
    };
    let path = store::write_export(
        &dir,
        &state.preferences.export_file_prefix,
        &records,
        unix_now(),
    )
    .with_context(|| format!("failed to write export into {}", dir.display()))?;

    if json {
        return write_json(
            out,
            &serde_json::json!({ "path": path, "count": records.len() }),
        );
    }
    writeln!(out, "exported {} token(s) to {}", records.len(), path.display())?;
    Ok(())
}
