//! Token CRUD operations.
//!
//! Each persisted token is the canonical key URI plus two display fields
//! the user may edit independently, and an `index_number` that fixes the
//! list order. The URI column is written once and never rewritten.

use std::fmt;

use authenticator_otp::{Credential, OtpError};
use rusqlite::{params, OptionalExtension};
use serde::Serialize;

use crate::error::StoreError;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A persisted token row.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    /// Unique identifier (UUID v4), carried over from the credential.
    pub id: String,
    /// Canonical key URI, exactly as it was added.
    pub uri: String,
    /// Issuer shown in the list.
    pub display_issuer: String,
    /// Account name shown in the list.
    pub display_account_name: String,
    /// Sort key; the list is shown in ascending order.
    pub index_number: i64,
}

impl fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRecord")
            .field("id", &self.id)
            .field("uri", &"***")
            .field("display_issuer", &self.display_issuer)
            .field("display_account_name", &self.display_account_name)
            .field("index_number", &self.index_number)
            .finish()
    }
}

impl TokenRecord {
    /// Re-parse the stored URI into a credential, keeping id and display fields.
    ///
    /// # Errors
    ///
    /// Propagates the [`OtpError`] from [`Credential::from_stored`].
    pub fn credential(&self) -> Result<Credential, OtpError> {
        Credential::from_stored(
            &self.id,
            &self.uri,
            &self.display_issuer,
            &self.display_account_name,
        )
    }

    /// Like [`TokenRecord::credential`], but a row that no longer parses
    /// yields the placeholder credential instead of an error.
    #[must_use]
    pub fn credential_or_placeholder(&self) -> Credential {
        self.credential().unwrap_or_else(|err| {
            tracing::warn!(token_id = %self.id, error = %err, "stored token no longer parses");
            Credential::placeholder()
        })
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

const SELECT_COLUMNS: &str =
    "SELECT id, uri, display_issuer, display_account_name, index_number FROM tokens";

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<TokenRecord> {
    Ok(TokenRecord {
        id: row.get(0)?,
        uri: row.get(1)?,
        display_issuer: row.get(2)?,
        display_account_name: row.get(3)?,
        index_number: row.get(4)?,
    })
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// Persist a credential at the end of the list.
///
/// The new `index_number` is one past the current maximum, or `1` when
/// the table is empty.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if the INSERT fails.
pub fn add_token(
    conn: &rusqlite::Connection,
    credential: &Credential,
) -> Result<TokenRecord, StoreError> {
    let last: Option<i64> = conn
        .query_row("SELECT MAX(index_number) FROM tokens", [], |row| row.get(0))
        .map_err(|e| StoreError::Database(format!("failed to read last index: {e}")))?;

    let index_number = match last {
        Some(n) => n
            .checked_add(1)
            .ok_or_else(|| StoreError::Database("index_number overflow".into()))?,
        None => 1,
    };

    let record = TokenRecord {
        id: credential.id().to_owned(),
        uri: credential.uri().to_owned(),
        display_issuer: credential.display_issuer.clone(),
        display_account_name: credential.display_account_name.clone(),
        index_number,
    };

    conn.execute(
        "INSERT INTO tokens (id, uri, display_issuer, display_account_name, index_number) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            record.id,
            record.uri,
            record.display_issuer,
            record.display_account_name,
            record.index_number,
        ],
    )
    .map_err(|e| StoreError::Database(format!("failed to insert token: {e}")))?;

    tracing::info!(token_id = %record.id, index_number, "token added");
    Ok(record)
}

/// List all tokens in display order (ascending `index_number`).
///
/// # Errors
///
/// Returns [`StoreError::Database`] if the query fails.
pub fn list_tokens(conn: &rusqlite::Connection) -> Result<Vec<TokenRecord>, StoreError> {
    let mut stmt = conn
        .prepare(&format!(
            "{SELECT_COLUMNS} ORDER BY index_number ASC, rowid ASC"
        ))
        .map_err(|e| StoreError::Database(format!("failed to prepare list query: {e}")))?;

    let rows = stmt
        .query_map([], row_to_record)
        .map_err(|e| StoreError::Database(format!("failed to execute list query: {e}")))?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| StoreError::Database(format!("row read error: {e}")))?);
    }
    Ok(result)
}

/// Fetch a single token by id.
///
/// # Errors
///
/// - [`StoreError::TokenNotFound`] if no token matches the ID
/// - [`StoreError::Database`] if the query fails
pub fn get_token(conn: &rusqlite::Connection, token_id: &str) -> Result<TokenRecord, StoreError> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
        params![token_id],
        row_to_record,
    )
    .optional()
    .map_err(|e| StoreError::Database(format!("failed to query token: {e}")))?
    .ok_or_else(|| StoreError::TokenNotFound(token_id.to_string()))
}

/// Edit the display fields of a token.
///
/// Both inputs are trimmed; a value that is empty after trimming leaves
/// the current field unchanged. The stored URI is never touched.
///
/// # Errors
///
/// - [`StoreError::TokenNotFound`] if no token matches the ID
/// - [`StoreError::Database`] if the UPDATE fails
pub fn update_display(
    conn: &rusqlite::Connection,
    token_id: &str,
    issuer: &str,
    account_name: &str,
) -> Result<TokenRecord, StoreError> {
    let mut record = get_token(conn, token_id)?;

    let issuer = issuer.trim();
    if !issuer.is_empty() {
        issuer.clone_into(&mut record.display_issuer);
    }
    let account_name = account_name.trim();
    if !account_name.is_empty() {
        account_name.clone_into(&mut record.display_account_name);
    }

    conn.execute(
        "UPDATE tokens SET display_issuer = ?1, display_account_name = ?2 WHERE id = ?3",
        params![record.display_issuer, record.display_account_name, token_id],
    )
    .map_err(|e| StoreError::Database(format!("failed to update token: {e}")))?;

    tracing::info!(token_id = %token_id, "token display fields updated");
    Ok(record)
}

/// Move the tokens at positions `from` so they sit before position `to`,
/// then renumber every token so `index_number` equals its new position.
///
/// Positions refer to the current display order. `to` may equal the list
/// length to move to the end. Runs inside a single transaction.
///
/// # Errors
///
/// - [`StoreError::InvalidMove`] if a position is out of range
/// - [`StoreError::Database`] if the transaction fails
pub fn move_tokens(
    conn: &rusqlite::Connection,
    from: &[usize],
    to: usize,
) -> Result<Vec<TokenRecord>, StoreError> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| StoreError::Database(format!("failed to begin transaction: {e}")))?;

    let mut records = list_tokens(&tx)?;
    reorder(&mut records, from, to)?;

    for (position, record) in records.iter_mut().enumerate() {
        let index_number = i64::try_from(position)
            .map_err(|_| StoreError::Database("index_number overflow".into()))?;
        if record.index_number != index_number {
            tx.execute(
                "UPDATE tokens SET index_number = ?1 WHERE id = ?2",
                params![index_number, record.id],
            )
            .map_err(|e| StoreError::Database(format!("failed to renumber token: {e}")))?;
            record.index_number = index_number;
        }
    }

    tx.commit()
        .map_err(|e| StoreError::Database(format!("failed to commit reorder: {e}")))?;

    tracing::debug!(moved = from.len(), to, "tokens reordered");
    Ok(records)
}

/// Delete a token by ID.
///
/// # Errors
///
/// - [`StoreError::TokenNotFound`] if no token matches the ID
/// - [`StoreError::Database`] if the DELETE fails
pub fn delete_token(conn: &rusqlite::Connection, token_id: &str) -> Result<(), StoreError> {
    let rows_affected = conn
        .execute("DELETE FROM tokens WHERE id = ?1", params![token_id])
        .map_err(|e| StoreError::Database(format!("failed to delete token: {e}")))?;

    if rows_affected == 0 {
        return Err(StoreError::TokenNotFound(token_id.to_string()));
    }

    tracing::info!(token_id = %token_id, "token deleted");
    Ok(())
}

/// Delete several tokens atomically. Either all are removed or none.
///
/// # Errors
///
/// - [`StoreError::TokenNotFound`] if any ID is unknown (nothing is deleted)
/// - [`StoreError::Database`] if the transaction fails
pub fn delete_tokens(
    conn: &rusqlite::Connection,
    token_ids: &[String],
) -> Result<usize, StoreError> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| StoreError::Database(format!("failed to begin transaction: {e}")))?;

    for id in token_ids {
        delete_token(&tx, id)?;
    }

    tx.commit()
        .map_err(|e| StoreError::Database(format!("failed to commit delete: {e}")))?;
    Ok(token_ids.len())
}

// ---------------------------------------------------------------------------
// Reordering
// ---------------------------------------------------------------------------

/// Move the elements at `from` (any order, duplicates ignored) so they sit
/// before the element originally at `to`, keeping their relative order.
fn reorder<T>(items: &mut Vec<T>, from: &[usize], to: usize) -> Result<(), StoreError> {
    let len = items.len();
    if to > len {
        return Err(StoreError::InvalidMove(format!(
            "destination {to} is past the end of a list of {len}"
        )));
    }

    let mut offsets = from.to_vec();
    offsets.sort_unstable();
    offsets.dedup();
    if let Some(&bad) = offsets.iter().find(|&&i| i >= len) {
        return Err(StoreError::InvalidMove(format!(
            "position {bad} is out of range for a list of {len}"
        )));
    }

    let mut moved = Vec::with_capacity(offsets.len());
    for &i in offsets.iter().rev() {
        moved.push(items.remove(i));
    }
    moved.reverse();

    let before = offsets.iter().filter(|&&i| i < to).count();
    let insert_at = to.saturating_sub(before);
    items.splice(insert_at..insert_at, moved);
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::TokenDb;

    const URI_A: &str = "otpauth://totp/GitHub:alice?secret=JBSWY3DPEHPK3PXP&issuer=GitHub";
    const URI_B: &str = "otpauth://totp/Example:bob?secret=GEZDGNBVGY3TQOJQ";

    fn add(conn: &rusqlite::Connection, uri: &str) -> TokenRecord {
        add_token(conn, &Credential::parse(uri).unwrap()).unwrap()
    }

    #[test]
    fn reorder_single_forward() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        reorder(&mut v, &[0], 3).unwrap();
        assert_eq!(v, ['b', 'c', 'a', 'd']);
    }

    #[test]
    fn reorder_single_backward() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        reorder(&mut v, &[3], 1).unwrap();
        assert_eq!(v, ['a', 'd', 'b', 'c']);
    }

    #[test]
    fn reorder_to_end() {
        let mut v = vec!['a', 'b', 'c'];
        reorder(&mut v, &[0], 3).unwrap();
        assert_eq!(v, ['b', 'c', 'a']);
    }

    #[test]
    fn reorder_multiple_keeps_relative_order() {
        let mut v = vec!['a', 'b', 'c', 'd', 'e'];
        reorder(&mut v, &[3, 0], 2).unwrap();
        assert_eq!(v, ['b', 'a', 'd', 'c', 'e']);
    }

    #[test]
    fn reorder_onto_itself_is_noop() {
        let mut v = vec!['a', 'b', 'c'];
        reorder(&mut v, &[1], 1).unwrap();
        assert_eq!(v, ['a', 'b', 'c']);
        reorder(&mut v, &[1], 2).unwrap();
        assert_eq!(v, ['a', 'b', 'c']);
    }

    #[test]
    fn reorder_rejects_out_of_range() {
        let mut v = vec!['a', 'b'];
        assert!(matches!(
            reorder(&mut v, &[2], 0),
            Err(StoreError::InvalidMove(_))
        ));
        assert!(matches!(
            reorder(&mut v, &[0], 3),
            Err(StoreError::InvalidMove(_))
        ));
        assert_eq!(v, ['a', 'b']);
    }

    #[test]
    fn first_token_gets_index_one() {
        let db = TokenDb::open_in_memory().unwrap();
        let rec = add(db.connection(), URI_A);
        assert_eq!(rec.index_number, 1);
        assert_eq!(rec.display_issuer, "GitHub");
        assert_eq!(rec.display_account_name, "alice");
        assert_eq!(rec.uri, URI_A);
    }

    #[test]
    fn next_index_follows_maximum() {
        let db = TokenDb::open_in_memory().unwrap();
        add(db.connection(), URI_A);
        let second = add(db.connection(), URI_B);
        assert_eq!(second.index_number, 2);
    }

    #[test]
    fn get_missing_token_is_not_found() {
        let db = TokenDb::open_in_memory().unwrap();
        let err = get_token(db.connection(), "nope").unwrap_err();
        assert!(matches!(err, StoreError::TokenNotFound(id) if id == "nope"));
    }

    #[test]
    fn update_display_trims_and_keeps_blank_fields() {
        let db = TokenDb::open_in_memory().unwrap();
        let rec = add(db.connection(), URI_A);

        let updated = update_display(db.connection(), &rec.id, "  Work  ", "   ").unwrap();
        assert_eq!(updated.display_issuer, "Work");
        assert_eq!(updated.display_account_name, "alice");

        let stored = get_token(db.connection(), &rec.id).unwrap();
        assert_eq!(stored, updated);
        assert_eq!(stored.uri, URI_A);
    }

    #[test]
    fn update_display_unknown_id() {
        let db = TokenDb::open_in_memory().unwrap();
        assert!(matches!(
            update_display(db.connection(), "missing", "a", "b"),
            Err(StoreError::TokenNotFound(_))
        ));
    }

    #[test]
    fn delete_token_removes_row() {
        let db = TokenDb::open_in_memory().unwrap();
        let rec = add(db.connection(), URI_A);
        delete_token(db.connection(), &rec.id).unwrap();
        assert!(list_tokens(db.connection()).unwrap().is_empty());
        assert!(matches!(
            delete_token(db.connection(), &rec.id),
            Err(StoreError::TokenNotFound(_))
        ));
    }

    #[test]
    fn delete_tokens_is_all_or_nothing() {
        let db = TokenDb::open_in_memory().unwrap();
        let a = add(db.connection(), URI_A);
        let b = add(db.connection(), URI_B);

        let err = delete_tokens(db.connection(), &[a.id.clone(), "ghost".into()]).unwrap_err();
        assert!(matches!(err, StoreError::TokenNotFound(_)));
        assert_eq!(list_tokens(db.connection()).unwrap().len(), 2);

        assert_eq!(delete_tokens(db.connection(), &[a.id, b.id]).unwrap(), 2);
        assert!(list_tokens(db.connection()).unwrap().is_empty());
    }

    #[test]
    fn record_debug_redacts_uri() {
        let db = TokenDb::open_in_memory().unwrap();
        let rec = add(db.connection(), URI_A);
        let dbg = format!("{rec:?}");
        assert!(!dbg.contains("JBSWY3DPEHPK3PXP"));
        assert!(dbg.contains("GitHub"));
    }

    #[test]
    fn corrupt_row_falls_back_to_placeholder() {
        let rec = TokenRecord {
            id: "x".into(),
            uri: "otpauth://hotp/Nope?secret=AAAA".into(),
            display_issuer: "Nope".into(),
            display_account_name: String::new(),
            index_number: 1,
        };
        assert!(rec.credential().is_err());
        let cred = rec.credential_or_placeholder();
        assert_eq!(cred.uri(), authenticator_otp::PLACEHOLDER_URI);
    }
}
