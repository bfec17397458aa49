//! Fuzz target for the key-URI parser.
//!
//! Feeds arbitrary strings to `Credential::parse`; must never panic. A
//! credential that parses must also produce a code.
//!
//! # Usage
//!
//! ```sh
//! cd crates/authenticator-otp
//! cargo +nightly fuzz run key_uri_parse -- -max_len=2048
//! ```

#![no_main]

use authenticator_otp::{Credential, KeyUri};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(key) = KeyUri::parse(text) {
        let _ = KeyUri::parse(&key.to_uri_string());
    }

    if let Ok(credential) = Credential::parse(text) {
        assert!(credential.code_at(0).is_ok());
    }
});
