//! Command handlers.
//!
//! Each submodule turns one group of subcommands into store calls and
//! prints either plain text or a JSON DTO. DTOs never carry a raw
//! `TokenRecord`, whose URI holds the secret; only `show` prints the URI.

pub mod codes;
pub mod export;
pub mod import;
pub mod preferences;
pub mod tokens;

use std::io::Write;

use serde::Serialize;

use crate::cli::Command;
use crate::state::AppState;

/// Run one parsed subcommand against an open state.
///
/// # Errors
///
/// Propagates store failures and write errors on `out`.
pub fn dispatch(
    command: Command,
    state: &mut AppState,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Add { uri } => tokens::add(state, &uri, json, out),
        Command::AddKey {
            secret,
            issuer,
            account,
            algorithm,
            digits,
            period,
        } => tokens::add_key(
            state,
            &tokens::KeyEntry {
                secret,
                issuer,
                account,
                algorithm,
                digits,
                period,
            },
            json,
            out,
        ),
        Command::Import { file } => import::import(state, &file, json, out),
        Command::Export { out: dir, stdout } => export::export(state, dir, stdout, json, out),
        Command::List => codes::list(state, json, out),
        Command::Watch { count } => codes::watch(state, count, json, out),
        Command::Rename {
            id,
            issuer,
            account,
        } => tokens::rename(state, &id, &issuer, &account, json, out),
        Command::Move { from, to } => tokens::reorder(state, &from, to, json, out),
        Command::Remove { ids } => tokens::remove(state, &ids, json, out),
        Command::Show { id } => tokens::show(state, &id, json, out),
        Command::Prefs {
            code_grouping,
            refresh_interval_ms,
            export_file_prefix,
        } => preferences::prefs(
            state,
            preferences::PrefsUpdate {
                code_grouping,
                refresh_interval_ms,
                export_file_prefix,
            },
            json,
            out,
        ),
    }
}

/// Write `value` as one line of JSON.
pub(crate) fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
