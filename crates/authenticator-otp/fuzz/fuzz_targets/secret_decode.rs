//! Fuzz target for lenient Base32 secret decoding.
//!
//! Arbitrary text must either decode or fail cleanly; decoded keys must
//! re-encode to text that decodes to the same bytes.
//!
//! # Usage
//!
//! ```sh
//! cd crates/authenticator-otp
//! cargo +nightly fuzz run secret_decode -- -max_len=512
//! ```

#![no_main]

use authenticator_otp::{decode_secret, encode_secret, generate_hotp, OtpAlgorithm, OtpDigits};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(bytes) = decode_secret(text) {
        let again = decode_secret(&encode_secret(&bytes)).expect("re-encoded secret decodes");
        assert_eq!(*bytes, *again);
        let _ = generate_hotp(&bytes, 0, OtpDigits::Six, OtpAlgorithm::Sha1);
    }
});
