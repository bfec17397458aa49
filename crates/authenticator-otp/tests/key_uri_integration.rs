//! Integration tests for key-URI parsing as other authenticators emit it.

use authenticator_otp::{Credential, OtpAlgorithm, OtpDigits, OtpError};

const SECRET: &str = "JBSWY3DPEHPK3PXP";

#[test]
fn google_style_uri() {
    let uri = format!("otpauth://totp/Example:alice@google.com?secret={SECRET}&issuer=Example");
    let cred = Credential::parse(&uri).expect("parse");
    assert_eq!(cred.issuer_prefix(), Some("Example"));
    assert_eq!(cred.account_name(), Some("alice@google.com"));
    assert_eq!(cred.issuer(), Some("Example"));
    assert_eq!(cred.display_issuer, "Example");
    assert_eq!(cred.display_account_name, "alice@google.com");
}

#[test]
fn encoded_spaces_in_label_parts() {
    let uri = format!("otpauth://totp/ACME%20Co:john.doe%40email.com?secret={SECRET}&issuer=ACME%20Co");
    let cred = Credential::parse(&uri).expect("parse");
    assert_eq!(cred.issuer_prefix(), Some("ACME Co"));
    assert_eq!(cred.account_name(), Some("john.doe@email.com"));
    assert_eq!(cred.issuer(), Some("ACME Co"));
}

#[test]
fn encoded_colon_is_not_a_label_separator() {
    let uri = format!("otpauth://totp/ACME%20Co%3Ajohn?secret={SECRET}&issuer=ACME%20Co");
    let cred = Credential::parse(&uri).expect("parse");
    assert_eq!(cred.issuer_prefix(), None);
    assert_eq!(cred.account_name(), Some("ACME Co:john"));
    assert_eq!(cred.display_issuer, "ACME Co");
}

#[test]
fn plus_in_issuer_is_literal() {
    let uri = format!("otpauth://totp/bob?secret={SECRET}&issuer=Google+Work");
    let cred = Credential::parse(&uri).expect("parse");
    assert_eq!(cred.issuer(), Some("Google+Work"));
    assert_eq!(cred.display_issuer, "Google+Work");
}

#[test]
fn uppercase_parameter_names_and_values() {
    let uri = format!("otpauth://totp/bob?SECRET={SECRET}&ALGORITHM=SHA512&DIGITS=8&PERIOD=60");
    let cred = Credential::parse(&uri).expect("parse");
    assert_eq!(cred.algorithm(), OtpAlgorithm::Sha512);
    assert_eq!(cred.digits(), OtpDigits::Eight);
    assert_eq!(cred.period(), 60);
}

#[test]
fn lowercase_grouped_secret_is_accepted() {
    let cred = Credential::parse("otpauth://totp/bob?secret=jbsw%20y3dp%20ehpk%203pxp").expect("parse");
    let canonical = Credential::parse(&format!("otpauth://totp/bob?secret={SECRET}")).expect("parse");
    assert_eq!(cred.code_at(1_700_000_000), canonical.code_at(1_700_000_000));
}

#[test]
fn unknown_parameters_are_ignored() {
    let uri = format!("otpauth://totp/bob?secret={SECRET}&image=https%3A%2F%2Fexample.com%2Flogo.png&counter=3");
    assert!(Credential::parse(&uri).is_ok());
}

#[test]
fn defaults_for_missing_and_invalid_parameters() {
    let cred = Credential::parse(&format!("otpauth://totp/bob?secret={SECRET}")).expect("parse");
    assert_eq!(
        (cred.algorithm(), cred.digits(), cred.period()),
        (OtpAlgorithm::Sha1, OtpDigits::Six, 30)
    );

    let cred = Credential::parse(&format!(
        "otpauth://totp/bob?secret={SECRET}&algorithm=MD5&digits=10&period=-30"
    ))
    .expect("parse");
    assert_eq!(
        (cred.algorithm(), cred.digits(), cred.period()),
        (OtpAlgorithm::Sha1, OtpDigits::Six, 30)
    );
}

#[test]
fn hotp_uri_is_unsupported() {
    let result = Credential::parse(&format!("otpauth://hotp/bob?secret={SECRET}&counter=0"));
    assert!(matches!(result, Err(OtpError::UnsupportedUriKind(_))), "got {result:?}");
}

#[test]
fn missing_secret_is_reported() {
    let result = Credential::parse("otpauth://totp/Acme:bob?issuer=Acme");
    assert_eq!(result.map(|c| c.id().to_owned()), Err(OtpError::MissingSecret));
}

#[test]
fn placeholder_code_is_six_zeros() {
    assert_eq!(authenticator_otp::PLACEHOLDER_CODE, "000000");
}
