//! Base32 shared-secret decoding (RFC 4648 alphabet).
//!
//! Authenticator secrets are rarely canonical Base32: providers print them
//! in lowercase, grouped with spaces or dashes, and usually without `=`
//! padding. Those cosmetic variations are accepted here; anything outside
//! the alphabet is rejected.

use std::sync::LazyLock;

use data_encoding::{Encoding, Specification};
use zeroize::Zeroizing;

use crate::OtpError;

const BASE32_SYMBOLS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Lenient RFC 4648 Base32 decoder: no padding, case-insensitive,
/// trailing bits unchecked. Built on first use.
static SECRET_ENCODING: LazyLock<Result<Encoding, String>> = LazyLock::new(|| {
    let mut spec = Specification::new();
    spec.symbols.push_str(BASE32_SYMBOLS);
    spec.translate.from.push_str("abcdefghijklmnopqrstuvwxyz");
    spec.translate.to.push_str("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
    spec.check_trailing_bits = false;
    spec.encoding().map_err(|e| e.to_string())
});

fn secret_encoding() -> Result<&'static Encoding, OtpError> {
    SECRET_ENCODING
        .as_ref()
        .map_err(|e| OtpError::InvalidSecret(format!("base32 specification: {e}")))
}

/// Strip grouping separators and trailing padding.
fn normalize(secret: &str) -> Zeroizing<String> {
    let cleaned: String = secret
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && *c != '-')
        .collect();
    Zeroizing::new(cleaned.trim_end_matches('=').to_owned())
}

/// Decode a Base32 secret into raw key bytes.
///
/// The returned buffer is zeroized when dropped.
///
/// # Errors
///
/// Returns [`OtpError::InvalidSecret`] if the text contains characters
/// outside the Base32 alphabet, has an impossible length, or decodes to
/// zero bytes.
pub fn decode_secret(secret: &str) -> Result<Zeroizing<Vec<u8>>, OtpError> {
    let normalized = normalize(secret);
    if normalized.is_empty() {
        return Err(OtpError::InvalidSecret("secret is empty".to_owned()));
    }

    let bytes = secret_encoding()?
        .decode(normalized.as_bytes())
        .map(Zeroizing::new)
        .map_err(|e| OtpError::InvalidSecret(format!("invalid Base32: {e}")))?;

    if bytes.is_empty() {
        return Err(OtpError::InvalidSecret(
            "secret decodes to zero bytes".to_owned(),
        ));
    }
    Ok(bytes)
}

/// Encode raw key bytes as unpadded uppercase Base32.
#[must_use]
pub fn encode_secret(bytes: &[u8]) -> String {
    data_encoding::BASE32_NOPAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoder_is_built_once() {
        let first = secret_encoding().expect("encoding");
        let second = secret_encoding().expect("encoding");
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn decodes_rfc6238_sha1_secret() {
        let key = decode_secret("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ").expect("decode");
        assert_eq!(key.as_slice(), b"12345678901234567890");
    }

    #[test]
    fn accepts_lowercase_grouped_and_padded() {
        let canonical = decode_secret("JBSWY3DPEHPK3PXP").expect("canonical");
        for variant in ["jbswy3dpehpk3pxp", "JBSW Y3DP EHPK 3PXP", "jbsw-y3dp-ehpk-3pxp", "JBSWY3DPEHPK3PXP===="] {
            let decoded = decode_secret(variant).expect("variant should decode");
            assert_eq!(decoded.as_slice(), canonical.as_slice(), "variant {variant}");
        }
    }

    #[test]
    fn accepts_nonzero_trailing_bits() {
        // 'B' as the last symbol leaves a non-zero trailing bit for 16 chars + 2.
        assert!(decode_secret("JBSWY3DPEHPK3PXPJB").is_ok());
    }

    #[test]
    fn rejects_characters_outside_alphabet() {
        for bad in ["JBSWY3DP1", "JBSWY3DP!!", "0000", "888888"] {
            assert!(
                matches!(decode_secret(bad), Err(OtpError::InvalidSecret(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_empty_and_padding_only() {
        for bad in ["", "   ", "====", "-"] {
            assert!(matches!(decode_secret(bad), Err(OtpError::InvalidSecret(_))));
        }
    }

    #[test]
    fn rejects_impossible_length() {
        // A single symbol carries 5 bits, not enough for one byte.
        assert!(matches!(decode_secret("A"), Err(OtpError::InvalidSecret(_))));
    }

    #[test]
    fn encode_then_decode_returns_input() {
        let bytes = b"12345678901234567890";
        let text = encode_secret(bytes);
        assert_eq!(text, "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ");
        assert_eq!(decode_secret(&text).expect("decode").as_slice(), bytes);
    }
}
