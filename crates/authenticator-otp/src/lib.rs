//! `authenticator-otp` — key-URI credentials and one-time code generation.
//!
//! This crate is the pure core: zero I/O, zero clock, zero logging.
//! Callers supply the instant and decide how to present errors.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;

pub mod secret;

pub mod totp;

pub mod key_uri;

pub mod credential;

pub use credential::{Credential, CredentialParams, PLACEHOLDER_URI};
pub use error::OtpError;
pub use key_uri::{KeyUri, KeyUriQuery, Label};
pub use secret::{decode_secret, encode_secret};
pub use totp::{
    generate_code, generate_hotp, generate_totp, seconds_remaining, OtpAlgorithm, OtpDigits,
    DEFAULT_PERIOD, PLACEHOLDER_CODE,
};
