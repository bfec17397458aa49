//! `authenticator-store` — persistence around the OTP core.
//!
//! Owns the `SQLite` token table, text import and export, the code board
//! and the JSON preferences file. Parsing and code generation are
//! delegated to `authenticator-otp`.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod clock;
pub mod codes;
pub mod db;
pub mod error;
pub mod export;
pub mod import;
pub mod preferences;
pub mod tokens;

pub use clock::{unix_now, UtcDateTime};
pub use codes::{code_board, code_for, format_code, CodeView};
pub use db::TokenDb;
pub use error::StoreError;
pub use export::{export_file_name, export_text, write_export};
pub use import::{
    import_credentials, import_file, import_text, import_uri, manual_entry_params, parse_bytes,
    parse_lines, ImportSummary, LineImport, SkippedLine,
};
pub use preferences::Preferences;
pub use tokens::{
    add_token, delete_token, delete_tokens, get_token, list_tokens, move_tokens, update_display,
    TokenRecord,
};
