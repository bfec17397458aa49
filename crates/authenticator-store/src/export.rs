//! Plain-text export: one key URI per line.
//!
//! The export file is a backup of every stored URI, written to
//! `{dir}/{prefix}yyyyMMdd-HHmmss.txt` (UTC). It round-trips through
//! [`crate::import::import_text`].

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::clock::UtcDateTime;
use crate::error::StoreError;
use crate::tokens::TokenRecord;

/// Join the stored URIs in list order, one per line, with a trailing newline.
#[must_use]
pub fn export_text(records: &[TokenRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.uri);
        out.push('\n');
    }
    out
}

/// File name for an export taken at `unix_time`.
#[must_use]
pub fn export_file_name(prefix: &str, unix_time: u64) -> String {
    format!("{prefix}{}.txt", UtcDateTime::from_unix(unix_time).compact())
}

/// Write the export file into `dir` and return its path.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the directory does not exist or the
/// file system rejects the write or rename.
pub fn write_export(
    dir: &Path,
    prefix: &str,
    records: &[TokenRecord],
    unix_time: u64,
) -> Result<PathBuf, StoreError> {
    let path = dir.join(export_file_name(prefix, unix_time));
    write_owner_only(&path, export_text(records).as_bytes())?;
    tracing::info!(path = %path.display(), count = records.len(), "tokens exported");
    Ok(path)
}

/// Atomically replace `path` with `contents`: write a hidden `.tmp`
/// sibling, then rename it over `path`.
///
/// On Unix the `.tmp` file is created with mode `0o600`, so the contents are
/// never readable by others. It is removed again if any step fails.
pub(crate) fn write_owner_only(path: &Path, contents: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no file name"))?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    // A stale file from an interrupted write keeps its old mode; start over.
    if let Err(err) = fs::remove_file(&tmp) {
        if err.kind() != io::ErrorKind::NotFound {
            return Err(err);
        }
    }

    let result = write_new_file(&tmp, contents).and_then(|()| fs::rename(&tmp, path));
    if result.is_err() {
        if let Err(err) = fs::remove_file(&tmp) {
            tracing::debug!(path = %tmp.display(), error = %err, "could not remove temp file");
        }
    }
    result
}

fn write_new_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}
