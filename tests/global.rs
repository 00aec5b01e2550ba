//! Process-wide configuration.  Kept in its own test binary so no other
//! test can freeze the global before `install` runs.

use fieldcap::*;

#[test]
fn install_once_then_reject() {
    install(TruncationConfig::with_max_length(16).unwrap()).unwrap();
    assert_eq!(TruncationConfig::global().max_length(), 16);

    let err = install(TruncationConfig::default()).unwrap_err();
    assert_eq!(err.code, ERR_ALREADY_CONFIGURED);
    assert_eq!(TruncationConfig::global().max_length(), 16);

    let policy = TruncationPolicy::default();
    assert_eq!(policy.config().max_length(), 16);
    let json = to_string("abcdefghijklmnopqrstuvwxyz", &policy).unwrap();
    assert_eq!(json, r#""abcdefghijklm...""#);
}
