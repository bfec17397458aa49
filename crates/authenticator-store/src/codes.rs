//! Code board: the current code and countdown for every stored token.

use authenticator_otp::PLACEHOLDER_CODE;
use serde::Serialize;

use crate::error::StoreError;
use crate::tokens::{self, TokenRecord};

/// What the list shows for one token at a given instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeView {
    pub id: String,
    pub display_issuer: String,
    pub display_account_name: String,
    /// Ungrouped digits; `"000000"` when the token cannot produce a code.
    pub code: String,
    pub period: u32,
    pub seconds_remaining: u32,
}

/// Compute the view of one record at `unix_time`.
///
/// A record whose URI no longer parses, or whose code cannot be
/// generated, shows the placeholder code instead of failing.
#[must_use]
pub fn code_for(record: &TokenRecord, unix_time: u64) -> CodeView {
    let credential = record.credential_or_placeholder();
    let code = credential.code_at(unix_time).unwrap_or_else(|err| {
        tracing::debug!(token_id = %record.id, error = %err, "code generation failed");
        PLACEHOLDER_CODE.to_owned()
    });

    CodeView {
        id: record.id.clone(),
        display_issuer: record.display_issuer.clone(),
        display_account_name: record.display_account_name.clone(),
        code,
        period: credential.period(),
        seconds_remaining: credential.seconds_remaining(unix_time),
    }
}

/// Compute the view of every stored token, in list order.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if the token list cannot be read.
pub fn code_board(
    conn: &rusqlite::Connection,
    unix_time: u64,
) -> Result<Vec<CodeView>, StoreError> {
    Ok(tokens::list_tokens(conn)?
        .iter()
        .map(|record| code_for(record, unix_time))
        .collect())
}

/// Split a code into two space-separated halves, the first rounded up
/// (`"123 456"`, `"1234 567"`). Returns the code unchanged when grouping
/// is off.
#[must_use]
pub fn format_code(code: &str, grouping: bool) -> String {
    if !grouping || code.len() < 2 || !code.is_ascii() {
        return code.to_owned();
    }
    let (head, tail) = code.split_at(code.len().div_ceil(2));
    format!("{head} {tail}")
}
