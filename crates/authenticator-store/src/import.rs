//! Bulk and single-token import.
//!
//! A text import is a list of key URIs, one per line. Any newline character
//! ends a line (`\n`, `\r\n`, bare `\r`, and the Unicode separators).
//! Lines are parsed independently: a bad line, including one that is not
//! UTF-8, is reported and skipped, it never aborts the rest of the batch. Every credential that parsed is then inserted in a
//! single transaction.

use std::path::Path;

use authenticator_otp::{Credential, CredentialParams};
use serde::Serialize;

use crate::error::StoreError;
use crate::tokens::{self, TokenRecord};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A line that was not imported, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedLine {
    /// 1-based line number in the source text.
    pub line: usize,
    /// Human-readable parse error.
    pub reason: String,
}

/// Result of parsing a multi-line text without touching the database.
#[derive(Debug, Default)]
pub struct LineImport {
    /// Credentials that parsed, in source order.
    pub credentials: Vec<Credential>,
    /// Non-blank lines that failed to parse.
    pub skipped: Vec<SkippedLine>,
}

/// Summary returned after an import is written.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Number of tokens inserted.
    pub imported: usize,
    /// Lines that were skipped.
    pub skipped: Vec<SkippedLine>,
    /// IDs of the inserted tokens, in insertion order.
    pub imported_ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Line separators outside ASCII.
const UNICODE_LINE_BREAKS: [char; 3] = ['\u{85}', '\u{2028}', '\u{2029}'];

fn clean_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c.is_control())
}

/// Split raw bytes on the ASCII line breaks, `\r\n` counting as one.
///
/// None of these bytes occurs inside a multi-byte UTF-8 sequence, so each
/// piece can be decoded on its own.
fn raw_lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    bytes.split_inclusive(|b| *b == b'\n').flat_map(|line| {
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        line.split(|b| matches!(*b, b'\r' | 0x0B | 0x0C))
    })
}

impl LineImport {
    fn skip(&mut self, line: usize, reason: String) {
        tracing::warn!(line, reason = %reason, "skipping unparseable import line");
        self.skipped.push(SkippedLine { line, reason });
    }
}

/// Parse every non-blank line of `text` as a key URI.
#[must_use]
pub fn parse_lines(text: &str) -> LineImport {
    parse_bytes(text.as_bytes())
}

/// Parse every non-blank line of raw file contents as a key URI.
///
/// Lines that are not valid UTF-8 are skipped with the reason `not UTF-8`.
#[must_use]
pub fn parse_bytes(bytes: &[u8]) -> LineImport {
    let mut out = LineImport::default();
    let mut number: usize = 0;

    for raw in raw_lines(bytes) {
        let Ok(text) = std::str::from_utf8(raw) else {
            number = number.saturating_add(1);
            out.skip(number, "not UTF-8".to_owned());
            continue;
        };
        for piece in text.split(UNICODE_LINE_BREAKS) {
            number = number.saturating_add(1);
            let line = clean_line(piece);
            if line.is_empty() {
                continue;
            }
            match Credential::parse(line) {
                Ok(credential) => out.credentials.push(credential),
                Err(err) => out.skip(number, err.to_string()),
            }
        }
    }

    out
}

/// Build parameters for a manually keyed-in token.
///
/// The single issuer field fills both the label prefix and the `issuer`
/// parameter. All inputs are trimmed; blank ones are left out.
#[must_use]
pub fn manual_entry_params(secret: &str, issuer: &str, account_name: &str) -> CredentialParams {
    let non_empty = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_owned())
    };

    let issuer = non_empty(issuer);
    let mut params = CredentialParams::new(secret.trim());
    params.issuer_prefix.clone_from(&issuer);
    params.issuer = issuer;
    params.account_name = non_empty(account_name);
    params
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Insert already-parsed credentials atomically, appended in order.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if the transaction fails.
/// On any error, the entire batch is rolled back.
pub fn import_credentials(
    conn: &rusqlite::Connection,
    credentials: &[Credential],
) -> Result<Vec<TokenRecord>, StoreError> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| StoreError::Database(format!("failed to begin transaction: {e}")))?;

    let mut records = Vec::with_capacity(credentials.len());
    for credential in credentials {
        records.push(tokens::add_token(&tx, credential)?);
    }

    tx.commit()
        .map_err(|e| StoreError::Database(format!("failed to commit import: {e}")))?;
    Ok(records)
}

/// Parse `text` line by line and store every credential that parsed.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if the insert transaction fails.
/// Unparseable lines are reported in the summary, not as errors.
pub fn import_text(conn: &rusqlite::Connection, text: &str) -> Result<ImportSummary, StoreError> {
    store_lines(conn, parse_lines(text))
}

/// Read a text file and import it line by line.
///
/// The file is not required to be UTF-8 as a whole: undecodable lines are
/// skipped like any other bad line.
///
/// # Errors
///
/// - [`StoreError::Io`] if the file cannot be read
/// - Same as [`import_text`] otherwise
pub fn import_file(conn: &rusqlite::Connection, path: &Path) -> Result<ImportSummary, StoreError> {
    let bytes = std::fs::read(path)?;
    store_lines(conn, parse_bytes(&bytes))
}

fn store_lines(
    conn: &rusqlite::Connection,
    parsed: LineImport,
) -> Result<ImportSummary, StoreError> {
    let LineImport {
        credentials,
        skipped,
    } = parsed;

    let records = import_credentials(conn, &credentials)?;
    let imported_ids: Vec<String> = records.into_iter().map(|r| r.id).collect();

    tracing::info!(
        imported = imported_ids.len(),
        skipped = skipped.len(),
        "text import finished"
    );

    Ok(ImportSummary {
        imported: imported_ids.len(),
        skipped,
        imported_ids,
    })
}

/// Parse a single scanned or pasted key URI and store it.
///
/// # Errors
///
/// - [`StoreError::Otp`] if the text is not a usable TOTP key URI
/// - [`StoreError::Database`] if the INSERT fails
pub fn import_uri(conn: &rusqlite::Connection, text: &str) -> Result<TokenRecord, StoreError> {
    let credential = Credential::parse(clean_line(text))?;
    tokens::add_token(conn, &credential)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
