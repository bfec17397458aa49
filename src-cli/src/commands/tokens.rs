//! Token commands: add, add-key, rename, move, remove, show.

use std::io::Write;

use anyhow::{anyhow, Context};
use authenticator_otp::{Credential, OtpAlgorithm, OtpDigits};
use authenticator_store::{self as store, TokenRecord};
use serde::Serialize;

use super::write_json;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Token as listed: no URI, so no secret.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSummary {
    pub id: String,
    pub display_issuer: String,
    pub display_account_name: String,
    pub index_number: i64,
}

impl From<&TokenRecord> for TokenSummary {
    fn from(record: &TokenRecord) -> Self {
        Self {
            id: record.id.clone(),
            display_issuer: record.display_issuer.clone(),
            display_account_name: record.display_account_name.clone(),
            index_number: record.index_number,
        }
    }
}

/// Full detail of one token, including its key URI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetails {
    pub id: String,
    pub display_issuer: String,
    pub display_account_name: String,
    pub issuer_prefix: Option<String>,
    pub account_name: Option<String>,
    pub issuer: Option<String>,
    pub algorithm: OtpAlgorithm,
    pub digits: OtpDigits,
    pub period: u32,
    pub uri: String,
}

/// Manual-entry fields as typed on the command line.
pub struct KeyEntry {
    pub secret: String,
    pub issuer: String,
    pub account: String,
    pub algorithm: OtpAlgorithm,
    pub digits: u8,
    pub period: u32,
}

fn label(display_issuer: &str, display_account_name: &str) -> String {
    match (display_issuer.is_empty(), display_account_name.is_empty()) {
        (false, false) => format!("{display_issuer} ({display_account_name})"),
        (false, true) => display_issuer.to_owned(),
        (true, false) => display_account_name.to_owned(),
        (true, true) => "(unnamed)".to_owned(),
    }
}

fn print_added(record: &TokenRecord, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    if json {
        return write_json(out, &TokenSummary::from(record));
    }
    writeln!(
        out,
        "added {} {}",
        record.id,
        label(&record.display_issuer, &record.display_account_name)
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// `add <URI>`
pub fn add(state: &AppState, uri: &str, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    let record = store::import_uri(state.conn(), uri).context("could not add key URI")?;
    print_added(&record, json, out)
}

/// `add-key --secret ...`
pub fn add_key(
    state: &AppState,
    entry: &KeyEntry,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut params = store::manual_entry_params(&entry.secret, &entry.issuer, &entry.account);
    params.algorithm = entry.algorithm;
    params.digits = OtpDigits::from_count(entry.digits)
        .ok_or_else(|| anyhow!("invalid key: {} digits is not supported", entry.digits))?;
    params.period = entry.period;

    let credential = Credential::build(&params).context("invalid key")?;
    let record = store::add_token(state.conn(), &credential)?;
    print_added(&record, json, out)
}

/// `rename <ID> [--issuer] [--account]`
pub fn rename(
    state: &AppState,
    id: &str,
    issuer: &str,
    account: &str,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let record = store::update_display(state.conn(), id, issuer, account)?;
    if json {
        return write_json(out, &TokenSummary::from(&record));
    }
    writeln!(
        out,
        "renamed {} {}",
        record.id,
        label(&record.display_issuer, &record.display_account_name)
    )?;
    Ok(())
}

/// `move <FROM>... --to <TO>`
pub fn reorder(
    state: &AppState,
    from: &[usize],
    to: usize,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let records = store::move_tokens(state.conn(), from, to)?;
    if json {
        let list: Vec<TokenSummary> = records.iter().map(TokenSummary::from).collect();
        return write_json(out, &list);
    }
    for (position, record) in records.iter().enumerate() {
        writeln!(
            out,
            "{position:>3}  {}  {}",
            record.id,
            label(&record.display_issuer, &record.display_account_name)
        )?;
    }
    Ok(())
}

/// `remove <ID>...`
pub fn remove(
    state: &AppState,
    ids: &[String],
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let removed = store::delete_tokens(state.conn(), ids)?;
    if json {
        return write_json(out, &serde_json::json!({ "removed": removed }));
    }
    writeln!(out, "removed {removed} token(s)")?;
    Ok(())
}

/// `show <ID>`
pub fn show(state: &AppState, id: &str, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    let record = store::get_token(state.conn(), id)?;
    let credential = record.credential_or_placeholder();

    let details = TokenDetails {
        id: record.id.clone(),
        display_issuer: record.display_issuer.clone(),
        display_account_name: record.display_account_name.clone(),
        issuer_prefix: credential.issuer_prefix().map(str::to_owned),
        account_name: credential.account_name().map(str::to_owned),
        issuer: credential.issuer().map(str::to_owned),
        algorithm: credential.algorithm(),
        digits: credential.digits(),
        period: credential.period(),
        uri: record.uri.clone(),
    };

    if json {
        return write_json(out, &details);
    }
    writeln!(out, "id:           {}", details.id)?;
    writeln!(out, "issuer:       {}", details.display_issuer)?;
    writeln!(out, "account:      {}", details.display_account_name)?;
    writeln!(out, "label issuer: {}", details.issuer_prefix.as_deref().unwrap_or("-"))?;
    writeln!(out, "label name:   {}", details.account_name.as_deref().unwrap_or("-"))?;
    writeln!(out, "issuer param: {}", details.issuer.as_deref().unwrap_or("-"))?;
    writeln!(out, "algorithm:    {}", details.algorithm)?;
    writeln!(out, "digits:       {}", details.digits)?;
    writeln!(out, "period:       {}s", details.period)?;
    writeln!(out, "uri:          {}", details.uri)?;
    Ok(())
}
