use super::*;

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

/// Tests the matching bearer secret is accepted.
///
/// Expected: Ok(())
#[test]
fn accepts_matching_secret() {
    assert!(require_service_secret(&bearer("s3cret"), "s3cret", "cron").is_ok());
}

/// Tests wrong, missing and malformed credentials are rejected.
///
/// Expected: Err(AuthError::InvalidServiceSecret) naming the caller
#[test]
fn rejects_wrong_or_missing_secret() {
    for headers in [bearer("guess"), bearer("s3cre"), HeaderMap::new()] {
        let result = require_service_secret(&headers, "s3cret", "cron");
        assert!(matches!(
            result,
            Err(AppError::AuthErr(AuthError::InvalidServiceSecret("cron")))
        ));
    }

    let mut basic = HeaderMap::new();
    basic.insert(AUTHORIZATION, HeaderValue::from_static("Basic czNjcmV0"));
    assert!(require_service_secret(&basic, "s3cret", "cron").is_err());
}

/// Tests that an empty configured secret never authorizes.
///
/// Expected: Err for an empty bearer token
#[test]
fn rejects_when_secret_unset() {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
    assert!(require_service_secret(&headers, "", "auth").is_err());
}

/// Tests a secret of the right length but wrong bytes is rejected.
///
/// Expected: Err for a token differing only in its last byte
#[test]
fn rejects_same_length_mismatch() {
    assert!(require_service_secret(&bearer("s3creT"), "s3cret", "cron").is_err());
    assert!(require_service_secret(&bearer("S3cret"), "s3cret", "cron").is_err());
}
