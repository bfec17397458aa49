//! RFC 6238 TOTP and RFC 4226 HOTP generation engine.
//!
//! Provides standards-compliant one-time password generation using
//! `ring::hmac` for HMAC-SHA1, HMAC-SHA256, and HMAC-SHA512. Every function
//! here is pure: the caller supplies the instant, the engine owns no clock.

use std::fmt;
use std::str::FromStr;

use ring::hmac;
use serde::{Deserialize, Serialize};

use crate::secret::decode_secret;
use crate::OtpError;

// ── Constants ───────────────────────────────────────────────────────

/// Default TOTP period in seconds (RFC 6238 §4).
pub const DEFAULT_PERIOD: u32 = 30;

/// Code shown in place of a real one when generation fails.
pub const PLACEHOLDER_CODE: &str = "000000";

// ── Types ───────────────────────────────────────────────────────────

/// HMAC algorithm used for OTP generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OtpAlgorithm {
    /// HMAC-SHA1 (default for most authenticator apps).
    #[default]
    #[serde(rename = "SHA1")]
    Sha1,
    /// HMAC-SHA256.
    #[serde(rename = "SHA256")]
    Sha256,
    /// HMAC-SHA512.
    #[serde(rename = "SHA512")]
    Sha512,
}

impl OtpAlgorithm {
    /// Map to the corresponding `ring::hmac::Algorithm`.
    fn to_ring_algorithm(self) -> hmac::Algorithm {
        match self {
            Self::Sha1 => hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
            Self::Sha256 => hmac::HMAC_SHA256,
            Self::Sha512 => hmac::HMAC_SHA512,
        }
    }

    /// Key-URI spelling (`SHA1`, `SHA256`, `SHA512`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }

    /// Lenient key-URI parameter mapping: unknown values fall back to SHA1.
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for OtpAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OtpAlgorithm {
    type Err = OtpError;

    /// Case-insensitive match on `SHA1` / `SHA256` / `SHA512`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SHA1" => Ok(Self::Sha1),
            "SHA256" => Ok(Self::Sha256),
            "SHA512" => Ok(Self::Sha512),
            other => Err(OtpError::Generation(format!(
                "unsupported algorithm: {other}"
            ))),
        }
    }
}

/// Number of digits in an OTP code (6, 7 or 8).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OtpDigits {
    /// 6-digit code (standard).
    #[default]
    Six,
    /// 7-digit code.
    Seven,
    /// 8-digit code.
    Eight,
}

impl OtpDigits {
    /// Return the numeric digit count.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
        }
    }

    /// Return the modulus value (10^digits) for truncation.
    #[must_use]
    const fn modulus(self) -> u32 {
        match self {
            Self::Six => 1_000_000,
            Self::Seven => 10_000_000,
            Self::Eight => 100_000_000,
        }
    }

    /// Map an exact count to a variant; `None` for anything unsupported.
    #[must_use]
    pub const fn from_count(count: u8) -> Option<Self> {
        match count {
            6 => Some(Self::Six),
            7 => Some(Self::Seven),
            8 => Some(Self::Eight),
            _ => None,
        }
    }

    /// Key-URI parameter mapping: only the literals `7` and `8` select
    /// those lengths, everything else is 6.
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        match value {
            "7" => Self::Seven,
            "8" => Self::Eight,
            _ => Self::Six,
        }
    }
}

impl fmt::Display for OtpDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl Serialize for OtpDigits {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

impl<'de> Deserialize<'de> for OtpDigits {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let count = u8::deserialize(deserializer)?;
        Self::from_count(count)
            .ok_or_else(|| serde::de::Error::custom(format!("unsupported digit count: {count}")))
    }
}

// ── HOTP (RFC 4226) ────────────────────────────────────────────────

/// Generate an HOTP code per RFC 4226.
///
/// # Arguments
/// - `secret`: Shared secret key bytes (already Base32-decoded)
/// - `counter`: 8-byte counter value (big-endian per RFC 4226 §5.2)
/// - `digits`: Number of output digits
/// - `algorithm`: HMAC algorithm to use
///
/// # Errors
/// Returns `OtpError::Generation` if the secret is empty.
#[must_use = "OTP code should be used or stored"]
pub fn generate_hotp(
    secret: &[u8],
    counter: u64,
    digits: OtpDigits,
    algorithm: OtpAlgorithm,
) -> Result<String, OtpError> {
    if secret.is_empty() {
        return Err(OtpError::Generation("secret must not be empty".to_owned()));
    }

    let key = hmac::Key::new(algorithm.to_ring_algorithm(), secret);
    let tag = hmac::sign(&key, &counter.to_be_bytes());
    let hmac_result = tag.as_ref();

    // Dynamic Truncation (RFC 4226 §5.3).
    let last = hmac_result
        .last()
        .ok_or_else(|| OtpError::Generation("empty HMAC output".to_owned()))?;
    let offset = usize::from(last & 0x0F);

    // offset <= 15 and the shortest digest (SHA1) is 20 bytes.
    let window = hmac_result
        .get(offset..offset.wrapping_add(4))
        .ok_or_else(|| OtpError::Generation("truncation offset out of range".to_owned()))?;
    let binary_code = u32::from_be_bytes([window[0] & 0x7F, window[1], window[2], window[3]]);

    // modulus is a non-zero power of ten.
    #[allow(clippy::arithmetic_side_effects)]
    let code = binary_code % digits.modulus();
    let width = usize::from(digits.value());

    Ok(format!("{code:0>width$}"))
}

// ── TOTP (RFC 6238) ────────────────────────────────────────────────

/// Generate a TOTP code per RFC 6238.
///
/// # Arguments
/// - `secret`: Shared secret key bytes
/// - `time`: Unix timestamp in seconds
/// - `digits`: Number of output digits
/// - `period`: Time step in seconds (typically 30)
/// - `algorithm`: HMAC algorithm to use
///
/// # Errors
/// Returns `OtpError::Generation` if `period` is 0 or secret is empty.
#[must_use = "OTP code should be used or stored"]
pub fn generate_totp(
    secret: &[u8],
    time: u64,
    digits: OtpDigits,
    period: u32,
    algorithm: OtpAlgorithm,
) -> Result<String, OtpError> {
    if period == 0 {
        return Err(OtpError::Generation("period must be > 0".to_owned()));
    }

    // T = floor(time / period) per RFC 6238 §4; period is non-zero.
    #[allow(clippy::arithmetic_side_effects)]
    let time_step = time / u64::from(period);
    generate_hotp(secret, time_step, digits, algorithm)
}

/// Generate the TOTP code for a Base32 secret at `time`.
///
/// The decoded key is zeroized before returning.
///
/// # Errors
/// Returns `OtpError::Generation` if the secret does not decode, or if
/// `period` is 0.
#[must_use = "OTP code should be used or stored"]
pub fn generate_code(
    secret: &str,
    algorithm: OtpAlgorithm,
    digits: OtpDigits,
    period: u32,
    time: u64,
) -> Result<String, OtpError> {
    let key = decode_secret(secret).map_err(|e| OtpError::Generation(e.to_string()))?;
    generate_totp(&key, time, digits, period, algorithm)
}

/// Seconds left before the code for `time` rolls over.
///
/// Always in `1..=period`; a zero period yields 0.
#[must_use]
pub const fn seconds_remaining(period: u32, time: u64) -> u32 {
    if period == 0 {
        return 0;
    }
    let period_u64 = period as u64;
    // period is non-zero, and time % period < period fits u32.
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    let elapsed = (time % period_u64) as u32;
    #[allow(clippy::arithmetic_side_effects)]
    let remaining = period - elapsed;
    remaining
}

// ── Tests ───────────────────────────────────────────────────────────
