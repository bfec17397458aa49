//! `list` and `watch`: the code board.

use std::io::Write;
use std::time::Duration;

use authenticator_store::{self as store, unix_now, CodeView};

use super::write_json;
use crate::state::AppState;

fn render(
    board: &[CodeView],
    grouping: bool,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if json {
        return write_json(out, &board);
    }
    if board.is_empty() {
        writeln!(out, "no tokens; add one with `authenticator add <URI>`")?;
        return Ok(());
    }
    for view in board {
        let name = if view.display_account_name.is_empty() {
            view.display_issuer.clone()
        } else {
            format!("{} ({})", view.display_issuer, view.display_account_name)
        };
        writeln!(
            out,
            "{:>9}  {:>3}s  {}  {}",
            store::format_code(&view.code, grouping),
            view.seconds_remaining,
            name.trim(),
            view.id
        )?;
    }
    Ok(())
}

/// Print the board once.
pub fn list(state: &AppState, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    let board = store::code_board(state.conn(), unix_now())?;
    render(&board, state.preferences.code_grouping, json, out)
}

/// Reprint the board every `refreshIntervalMs` until `count` frames are
/// shown (forever when `count` is `None`).
pub fn watch(
    state: &AppState,
    count: Option<u64>,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let interval = Duration::from_millis(state.preferences.refresh_interval_ms);
    let mut frame: u64 = 0;

    loop {
        if count.is_some_and(|limit| frame >= limit) {
            return Ok(());
        }
        if frame > 0 {
            std::thread::sleep(interval);
            if !json {
                writeln!(out)?;
            }
        }

        let board = store::code_board(state.conn(), unix_now())?;
        render(&board, state.preferences.code_grouping, json, out)?;
        out.flush()?;
        frame = frame.saturating_add(1);
    }
}
