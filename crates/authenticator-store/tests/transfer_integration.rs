#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Integration tests for export → import round trips through a file.

use authenticator_store::{
    code_board, export_text, import_file, import_text, list_tokens, write_export, Preferences,
    TokenDb,
};

const BACKUP: &str = "\
otpauth://totp/GitHub:alice?secret=JBSWY3DPEHPK3PXP&issuer=GitHub
otpauth://totp/ACME%20Co:bob%40acme.com?secret=GEZDGNBVGY3TQOJQ&algorithm=SHA256&digits=8&period=60
otpauth://totp/Solo?secret=MFRGGZDFMZTWQ2LK
";

#[test]
fn export_file_reimports_identically() {
    let dir = tempfile::tempdir().unwrap();
    let source = TokenDb::open_in_memory().unwrap();
    let summary = import_text(source.connection(), BACKUP).unwrap();
    assert_eq!(summary.imported, 3);
    assert!(summary.skipped.is_empty());

    let prefs = Preferences::default();
    let records = list_tokens(source.connection()).unwrap();
    let path =
        write_export(dir.path(), &prefs.export_file_prefix, &records, 1_700_000_000).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "2FA-20231114-221320.txt"
    );
    assert_eq!(std::fs::read_to_string(&path).unwrap(), BACKUP);

    let target = TokenDb::open_in_memory().unwrap();
    let summary = import_file(target.connection(), &path).unwrap();
    assert_eq!(summary.imported, 3);

    let reimported = list_tokens(target.connection()).unwrap();
    assert_eq!(export_text(&reimported), BACKUP);

    let before = code_board(source.connection(), 1_700_000_000).unwrap();
    let after = code_board(target.connection(), 1_700_000_000).unwrap();
    let codes = |board: &[authenticator_store::CodeView]| {
        board.iter().map(|v| (v.code.clone(), v.period)).collect::<Vec<_>>()
    };
    assert_eq!(codes(&before), codes(&after));
    assert_eq!(after[1].display_issuer, "ACME Co");
    assert_eq!(after[1].display_account_name, "bob@acme.com");
    assert_eq!(after[1].code.len(), 8);
    assert_eq!(after[1].period, 60);
}

#[test]
fn import_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = TokenDb::open_in_memory().unwrap();
    let err = import_file(db.connection(), &dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, authenticator_store::StoreError::Io(_)));
}

#[test]
fn file_with_undecodable_line_keeps_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.txt");
    let mut contents = b"otpauth://totp/GitHub:alice?secret=JBSWY3DPEHPK3PXP\n".to_vec();
    contents.extend_from_slice(b"\xff\xfe garbage\n");
    contents.extend_from_slice(b"otpauth://totp/Solo?secret=MFRGGZDFMZTWQ2LK\n");
    std::fs::write(&path, contents).unwrap();

    let db = TokenDb::open_in_memory().unwrap();
    let summary = import_file(db.connection(), &path).unwrap();
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].line, 2);
    assert_eq!(summary.skipped[0].reason, "not UTF-8");
    assert_eq!(list_tokens(db.connection()).unwrap().len(), 2);
}

#[test]
fn file_with_bare_carriage_returns_imports_every_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classic-mac.txt");
    std::fs::write(&path, BACKUP.replace('\n', "\r")).unwrap();

    let db = TokenDb::open_in_memory().unwrap();
    let summary = import_file(db.connection(), &path).unwrap();
    assert_eq!(summary.imported, 3);
    assert!(summary.skipped.is_empty());
    assert_eq!(export_text(&list_tokens(db.connection()).unwrap()), BACKUP);
}
