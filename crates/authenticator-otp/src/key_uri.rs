//! `otpauth://totp/` key-URI wire format.
//!
//! ```text
//! otpauth://totp/[<label>]?secret=<base32>&issuer=<issuer>&algorithm=<SHA1|SHA256|SHA512>&digits=<6|7|8>&period=<seconds>
//! ```
//!
//! Parsing is lenient (case-insensitive parameter names, per-field
//! defaults); serialization is canonical (lowercase names, fixed order).

use std::borrow::Cow;

use url::Url;

use crate::totp::{OtpAlgorithm, OtpDigits, DEFAULT_PERIOD};
use crate::OtpError;

/// URI scheme of a key URI.
pub const SCHEME: &str = "otpauth";

/// Host (OTP type) accepted by this crate.
pub const TOTP_HOST: &str = "totp";

// ---------------------------------------------------------------------------
// Label
// ---------------------------------------------------------------------------

/// The `Issuer:AccountName` label carried in the URI path.
///
/// Empty components are always `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Label {
    /// Text before the first `:`.
    pub issuer_prefix: Option<String>,
    /// Text after the first `:`, or the whole label without a separator.
    pub account_name: Option<String>,
}

impl Label {
    /// Build a label from optional parts, normalizing empty text to `None`.
    #[must_use]
    pub fn new(issuer_prefix: Option<&str>, account_name: Option<&str>) -> Self {
        Self {
            issuer_prefix: non_empty(issuer_prefix),
            account_name: non_empty(account_name),
        }
    }

    /// Split a raw URI path into a label.
    ///
    /// Leading `/` characters are stripped and the raw path is split on the
    /// first literal `:` before each part is percent-decoded, so an encoded
    /// `%3A` or `%2F` stays inside its component. Issuer prefixes therefore
    /// round-trip with any content, and account names may contain `:`.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let label = path.trim_start_matches('/');
        match label.split_once(':') {
            Some((prefix, account)) => Self::new(
                Some(&*percent_decode(prefix)),
                Some(&*percent_decode(account)),
            ),
            None => Self::new(None, Some(&*percent_decode(label))),
        }
    }

    /// Percent-encoded path text, without the leading `/`.
    ///
    /// `prefix:account`, `prefix`, `:account`, or empty.
    #[must_use]
    pub fn to_path(&self) -> String {
        match (&self.issuer_prefix, &self.account_name) {
            (Some(prefix), Some(account)) => format!(
                "{}:{}",
                urlencoding::encode(prefix),
                urlencoding::encode(account)
            ),
            (Some(prefix), None) => urlencoding::encode(prefix).into_owned(),
            (None, Some(account)) => format!(":{}", urlencoding::encode(account)),
            (None, None) => String::new(),
        }
    }

    /// `displayIssuer` rule: the prefix, else the `issuer` parameter, else empty.
    #[must_use]
    pub fn display_issuer(&self, issuer: Option<&str>) -> String {
        self.issuer_prefix
            .as_deref()
            .or(issuer)
            .unwrap_or_default()
            .to_owned()
    }

    /// `displayAccountName` rule: the account name, else empty.
    #[must_use]
    pub fn display_account_name(&self) -> String {
        self.account_name.clone().unwrap_or_default()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_owned)
}

/// Percent-decode `text`, keeping it verbatim when the result is not UTF-8.
/// `+` is left as is.
fn percent_decode(text: &str) -> Cow<'_, str> {
    urlencoding::decode(text).unwrap_or(Cow::Borrowed(text))
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Raw values of the recognized query parameters.
///
/// Names are matched case-insensitively; the first occurrence wins even if
/// its value is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyUriQuery {
    /// `secret`
    pub secret: Option<String>,
    /// `issuer`
    pub issuer: Option<String>,
    /// `algorithm`
    pub algorithm: Option<String>,
    /// `digits`
    pub digits: Option<String>,
    /// `period`
    pub period: Option<String>,
}

impl KeyUriQuery {
    /// Collect the recognized parameters of `url` in one pass.
    ///
    /// Names and values are percent-decoded from the raw query. A `+` is
    /// kept literally rather than read as a space.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        let mut query = Self::default();
        let pairs = url
            .query()
            .unwrap_or_default()
            .split('&')
            .filter(|pair| !pair.is_empty());
        for pair in pairs {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let slot = match percent_decode(name).to_ascii_lowercase().as_str() {
                "secret" => &mut query.secret,
                "issuer" => &mut query.issuer,
                "algorithm" => &mut query.algorithm,
                "digits" => &mut query.digits,
                "period" => &mut query.period,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(percent_decode(value).into_owned());
            }
        }
        query
    }

    /// Algorithm rule: case-insensitive match, SHA1 otherwise.
    #[must_use]
    pub fn algorithm(&self) -> OtpAlgorithm {
        self.algorithm
            .as_deref()
            .map_or(OtpAlgorithm::Sha1, OtpAlgorithm::from_param)
    }

    /// Digits rule: literal `7` or `8`, 6 otherwise.
    #[must_use]
    pub fn digits(&self) -> OtpDigits {
        self.digits
            .as_deref()
            .map_or(OtpDigits::Six, OtpDigits::from_param)
    }

    /// Period rule: a positive integer, 30 otherwise.
    #[must_use]
    pub fn period(&self) -> u32 {
        self.period
            .as_deref()
            .and_then(|p| p.parse::<u32>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(DEFAULT_PERIOD)
    }

    /// Non-empty `issuer` value.
    #[must_use]
    pub fn issuer(&self) -> Option<String> {
        non_empty(self.issuer.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Parsed key URI
// ---------------------------------------------------------------------------

/// Every field of a key URI after defaulting, before secret validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyUri {
    /// Path label.
    pub label: Label,
    /// Raw Base32 secret text.
    pub secret: String,
    /// `issuer` parameter.
    pub issuer: Option<String>,
    /// HMAC algorithm.
    pub algorithm: OtpAlgorithm,
    /// Code length.
    pub digits: OtpDigits,
    /// Time step in seconds.
    pub period: u32,
}

impl KeyUri {
    /// Parse key-URI text.
    ///
    /// # Errors
    ///
    /// - [`OtpError::UnsupportedUriKind`] if the text is not a URI, or its
    ///   scheme/host is not `otpauth`/`totp`.
    /// - [`OtpError::MissingSecret`] if `secret` is absent or empty.
    pub fn parse(text: &str) -> Result<Self, OtpError> {
        let url = Url::parse(text)
            .map_err(|e| OtpError::UnsupportedUriKind(format!("not a URI: {e}")))?;

        if url.scheme() != SCHEME {
            return Err(OtpError::UnsupportedUriKind(format!(
                "scheme '{}' is not '{SCHEME}'",
                url.scheme()
            )));
        }
        let host = url.host_str().unwrap_or_default();
        if host != TOTP_HOST {
            return Err(OtpError::UnsupportedUriKind(format!(
                "OTP type '{host}' is not '{TOTP_HOST}'"
            )));
        }

        let query = KeyUriQuery::from_url(&url);
        let secret = query
            .secret
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or(OtpError::MissingSecret)?;

        Ok(Self {
            label: Label::from_path(url.path()),
            issuer: query.issuer(),
            algorithm: query.algorithm(),
            digits: query.digits(),
            period: query.period(),
            secret,
        })
    }

    /// Canonical key-URI text.
    ///
    /// Parameters are written lowercase in the fixed order `secret`,
    /// `issuer` (omitted when empty), `algorithm`, `digits`, `period`.
    #[must_use]
    pub fn to_uri_string(&self) -> String {
        let label = self.label.to_path();
        let mut uri = format!("{SCHEME}://{TOTP_HOST}");
        if !label.is_empty() {
            uri.push('/');
            uri.push_str(&label);
        }
        uri.push_str("?secret=");
        uri.push_str(&urlencoding::encode(&self.secret));
        if let Some(issuer) = self.issuer.as_deref().filter(|i| !i.is_empty()) {
            uri.push_str("&issuer=");
            uri.push_str(&urlencoding::encode(issuer));
        }
        uri.push_str(&format!(
            "&algorithm={}&digits={}&period={}",
            self.algorithm, self.digits, self.period
        ));
        uri
    }
}
