//! Command-line surface.

use std::path::PathBuf;

use authenticator_otp::{OtpAlgorithm, DEFAULT_PERIOD};
use clap::{Parser, Subcommand};

/// TOTP authenticator: stores `otpauth://totp` key URIs and shows their codes.
#[derive(Parser, Debug)]
#[command(name = "authenticator", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the token database and preferences
    #[arg(long, global = true, env = "AUTHENTICATOR_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a token from an otpauth://totp URI
    Add {
        /// The key URI, e.g. otpauth://totp/Issuer:account?secret=...
        uri: String,
    },

    /// Add a token by typing in its Base32 key
    AddKey {
        /// Base32 secret (spaces, dashes and lowercase are accepted)
        #[arg(long)]
        secret: String,

        /// Service name, used for the label and the issuer parameter
        #[arg(long, default_value = "")]
        issuer: String,

        /// Account name
        #[arg(long, default_value = "")]
        account: String,

        /// HMAC algorithm
        #[arg(long, default_value_t = OtpAlgorithm::Sha1)]
        algorithm: OtpAlgorithm,

        /// Code length
        #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(6..=8))]
        digits: u8,

        /// Time step in seconds
        #[arg(long, default_value_t = DEFAULT_PERIOD)]
        period: u32,
    },

    /// Import key URIs from a text file, one per line
    Import {
        /// Path to the text file
        file: PathBuf,
    },

    /// Export every key URI to a text file
    Export {
        /// Destination directory (defaults to the current directory)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Write the URIs to standard output instead of a file
        #[arg(long, conflicts_with = "out")]
        stdout: bool,
    },

    /// Show the current codes
    List,

    /// Keep showing the codes, refreshed on the configured interval
    Watch {
        /// Stop after this many refreshes
        #[arg(long)]
        count: Option<u64>,
    },

    /// Change the issuer or account shown for a token
    Rename {
        /// Token ID
        id: String,

        /// New display issuer (blank keeps the current one)
        #[arg(long, default_value = "")]
        issuer: String,

        /// New display account (blank keeps the current one)
        #[arg(long, default_value = "")]
        account: String,
    },

    /// Reorder tokens by list position (0-based)
    Move {
        /// Positions to move
        #[arg(required = true)]
        from: Vec<usize>,

        /// Position to insert before (the list length moves to the end)
        #[arg(long)]
        to: usize,
    },

    /// Delete tokens
    Remove {
        /// Token IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Show the details of one token
    Show {
        /// Token ID
        id: String,
    },

    /// Show or change preferences
    Prefs {
        /// Split codes into two groups
        #[arg(long)]
        code_grouping: Option<bool>,

        /// Refresh interval for `watch`, in milliseconds
        #[arg(long)]
        refresh_interval_ms: Option<u64>,

        /// File-name prefix for exports
        #[arg(long)]
        export_file_prefix: Option<String>,
    },
}
