use std::process::ExitCode;

use clap::Parser;

use authenticator::{init_logging, run, Cli};

fn main() -> ExitCode {
    let _log_guard = init_logging();
    let cli = Cli::parse();

    let stdout = std::io::stdout();
    match run(cli, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
