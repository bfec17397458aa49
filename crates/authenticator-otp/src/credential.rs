//! TOTP credential value: parsed from, or synthesized into, a key URI.
//!
//! A [`Credential`] is fixed at construction except for its two display
//! fields, which users edit freely without touching the canonical URI.
//! The secret is validated eagerly: a credential that exists can always
//! produce a code.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::key_uri::{KeyUri, Label};
use crate::secret::decode_secret;
use crate::totp::{self, OtpAlgorithm, OtpDigits, DEFAULT_PERIOD};
use crate::OtpError;

/// Key URI of the stand-in credential shown when a stored record is broken.
pub const PLACEHOLDER_URI: &str =
    "otpauth://totp/Error:null?algorithm=SHA1&digits=6&issuer=Error&period=30&secret=LLKRKYOT7UCHSHPR";

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// A validated TOTP credential.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential {
    id: String,
    uri: String,
    secret: String,
    issuer_prefix: Option<String>,
    account_name: Option<String>,
    issuer: Option<String>,
    algorithm: OtpAlgorithm,
    digits: OtpDigits,
    period: u32,
    /// Issuer shown to the user; editable, never written back to the URI.
    pub display_issuer: String,
    /// Account name shown to the user; editable, never written back to the URI.
    pub display_account_name: String,
}

/// Parameters for synthesizing a credential from discrete fields.
///
/// [`CredentialParams::new`] fills in the key-URI defaults
/// (SHA1, 6 digits, 30 seconds).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialParams {
    /// Label text before the `:`.
    pub issuer_prefix: Option<String>,
    /// Label text after the `:`.
    pub account_name: Option<String>,
    /// Base32 secret.
    pub secret: String,
    /// `issuer` query parameter.
    pub issuer: Option<String>,
    /// HMAC algorithm.
    pub algorithm: OtpAlgorithm,
    /// Code length.
    pub digits: OtpDigits,
    /// Time step in seconds.
    pub period: u32,
}

impl CredentialParams {
    /// Parameters with only a secret and default algorithm, digits, period.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            issuer_prefix: None,
            account_name: None,
            secret: secret.into(),
            issuer: None,
            algorithm: OtpAlgorithm::Sha1,
            digits: OtpDigits::Six,
            period: DEFAULT_PERIOD,
        }
    }
}

impl Credential {
    /// Parse externally supplied key-URI text into a new credential.
    ///
    /// A fresh id is generated; display fields are derived from the label
    /// and the `issuer` parameter.
    ///
    /// # Errors
    ///
    /// - [`OtpError::UnsupportedUriKind`] for anything but `otpauth://totp`.
    /// - [`OtpError::MissingSecret`] if `secret` is absent or empty.
    /// - [`OtpError::InvalidSecret`] if the secret cannot produce a code.
    pub fn parse(uri: &str) -> Result<Self, OtpError> {
        let key = KeyUri::parse(uri)?;
        validate_secret(&key)?;
        let display_issuer = key.label.display_issuer(key.issuer.as_deref());
        let display_account_name = key.label.display_account_name();
        Ok(Self::assemble(
            generate_id(),
            uri.to_owned(),
            key,
            display_issuer,
            display_account_name,
        ))
    }

    /// Rebuild a persisted credential, keeping its id and display fields.
    ///
    /// # Errors
    ///
    /// Same as [`Credential::parse`].
    pub fn from_stored(
        id: &str,
        uri: &str,
        display_issuer: &str,
        display_account_name: &str,
    ) -> Result<Self, OtpError> {
        let key = KeyUri::parse(uri)?;
        validate_secret(&key)?;
        Ok(Self::assemble(
            id.to_owned(),
            uri.to_owned(),
            key,
            display_issuer.to_owned(),
            display_account_name.to_owned(),
        ))
    }

    /// Synthesize a credential and its canonical key URI from fields.
    ///
    /// # Errors
    ///
    /// - [`OtpError::InvalidSecret`] if the secret cannot produce a code.
    /// - [`OtpError::BuildFailed`] if the period is zero or the synthesized
    ///   text does not parse back as a key URI.
    pub fn build(params: &CredentialParams) -> Result<Self, OtpError> {
        if params.period == 0 {
            return Err(OtpError::BuildFailed("period must be > 0".to_owned()));
        }

        let key = KeyUri {
            label: Label::new(
                params.issuer_prefix.as_deref(),
                params.account_name.as_deref(),
            ),
            secret: params.secret.clone(),
            issuer: params.issuer.clone().filter(|i| !i.is_empty()),
            algorithm: params.algorithm,
            digits: params.digits,
            period: params.period,
        };
        validate_secret(&key)?;

        let uri = key.to_uri_string();
        KeyUri::parse(&uri).map_err(|e| OtpError::BuildFailed(format!("{uri}: {e}")))?;

        let display_issuer = key.label.display_issuer(key.issuer.as_deref());
        let display_account_name = key.label.display_account_name();
        Ok(Self::assemble(
            generate_id(),
            uri,
            key,
            display_issuer,
            display_account_name,
        ))
    }

    /// The stand-in credential for records that no longer parse.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            id: generate_id(),
            uri: PLACEHOLDER_URI.to_owned(),
            secret: "LLKRKYOT7UCHSHPR".to_owned(),
            issuer_prefix: Some("Error".to_owned()),
            account_name: Some("null".to_owned()),
            issuer: Some("Error".to_owned()),
            algorithm: OtpAlgorithm::Sha1,
            digits: OtpDigits::Six,
            period: DEFAULT_PERIOD,
            display_issuer: "Error".to_owned(),
            display_account_name: "null".to_owned(),
        }
    }

    fn assemble(
        id: String,
        uri: String,
        key: KeyUri,
        display_issuer: String,
        display_account_name: String,
    ) -> Self {
        let KeyUri {
            label,
            secret,
            issuer,
            algorithm,
            digits,
            period,
        } = key;
        Self {
            id,
            uri,
            secret,
            issuer_prefix: label.issuer_prefix,
            account_name: label.account_name,
            issuer,
            algorithm,
            digits,
            period,
            display_issuer,
            display_account_name,
        }
    }

    // -- accessors ----------------------------------------------------------

    /// Opaque id assigned at creation.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Key-URI text this credential was parsed from or synthesized into.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Base32 secret exactly as supplied.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    #[must_use]
    pub fn issuer_prefix(&self) -> Option<&str> {
        self.issuer_prefix.as_deref()
    }

    #[must_use]
    pub fn account_name(&self) -> Option<&str> {
        self.account_name.as_deref()
    }

    /// The `issuer` query parameter.
    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    #[must_use]
    pub const fn algorithm(&self) -> OtpAlgorithm {
        self.algorithm
    }

    #[must_use]
    pub const fn digits(&self) -> OtpDigits {
        self.digits
    }

    #[must_use]
    pub const fn period(&self) -> u32 {
        self.period
    }

    // -- generation ---------------------------------------------------------

    /// Code for the time step containing `time` (Unix seconds).
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::Generation`] if the secret no longer decodes.
    pub fn code_at(&self, time: u64) -> Result<String, OtpError> {
        totp::generate_code(&self.secret, self.algorithm, self.digits, self.period, time)
    }

    /// Seconds before the code for `time` changes.
    #[must_use]
    pub const fn seconds_remaining(&self, time: u64) -> u32 {
        totp::seconds_remaining(self.period, time)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("secret", &"***")
            .field("issuer_prefix", &self.issuer_prefix)
            .field("account_name", &self.account_name)
            .field("issuer", &self.issuer)
            .field("algorithm", &self.algorithm)
            .field("digits", &self.digits)
            .field("period", &self.period)
            .field("display_issuer", &self.display_issuer)
            .field("display_account_name", &self.display_account_name)
            .finish_non_exhaustive()
    }
}

impl Drop for Credential {
    fn drop(&mut self) {
        self.secret.zeroize();
        self.uri.zeroize();
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Decode the secret and compute one trial code with the key's own
/// parameters.
fn validate_secret(key: &KeyUri) -> Result<(), OtpError> {
    let bytes = decode_secret(&key.secret)?;
    totp::generate_totp(&bytes, 0, key.digits, key.period, key.algorithm)
        .map_err(|e| OtpError::InvalidSecret(e.to_string()))?;
    Ok(())
}

/// Random RFC 4122 version 4 UUID.
fn generate_id() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);

    bytes[6] = (bytes[6] & 0x0F) | 0x40; // version 4
    bytes[8] = (bytes[8] & 0x3F) | 0x80; // variant 1

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        bytes[6], bytes[7],
        bytes[8], bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15],
    )
}
