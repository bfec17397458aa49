//! Error types for `authenticator-otp`.

use thiserror::Error;

/// Errors produced while parsing, building, or generating from a credential.
///
/// Every variant is recoverable: callers reject the candidate input (or show
/// a placeholder code) instead of aborting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpError {
    /// The text is not an `otpauth://totp` key URI.
    #[error("unsupported URI kind: {0}")]
    UnsupportedUriKind(String),

    /// The key URI has no `secret` parameter, or it is empty.
    #[error("missing secret")]
    MissingSecret,

    /// The secret is not Base32, decodes to nothing, or cannot produce a code.
    #[error("invalid secret: {0}")]
    InvalidSecret(String),

    /// The synthesized key URI is not a valid URI.
    #[error("failed to build key URI: {0}")]
    BuildFailed(String),

    /// HOTP/TOTP computation failed for an otherwise stored credential.
    #[error("OTP generation failed: {0}")]
    Generation(String),
}
