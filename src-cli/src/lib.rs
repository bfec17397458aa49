//! `authenticator` — command-line shell over the token store.
//!
//! Resolves the data directory, installs logging, opens the store and
//! hands the parsed subcommand to [`commands::dispatch`].

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod cli;
pub mod commands;
pub mod state;

use std::io::Write;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub use cli::{Cli, Command};
pub use state::AppState;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Install the global subscriber: `fmt` to a non-blocking stderr writer,
/// filtered by `RUST_LOG` (default `warn`).
///
/// The returned guard flushes buffered lines on drop; keep it alive
/// until the process exits.
#[must_use = "dropping the guard stops log output"]
pub fn init_logging() -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .try_init()
    {
        eprintln!("logging disabled: {err}");
    }
    guard
}

/// Run a parsed command line, printing results to `out`.
///
/// # Errors
///
/// Fails when the store cannot be opened or the command fails.
pub fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => state::default_data_dir()?,
    };
    let mut state = AppState::open(&data_dir)?;
    commands::dispatch(cli.command, &mut state, cli.json, out)
}
