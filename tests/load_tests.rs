// Host-side tests for texture load failures and fetch-error reporting.

#![allow(dead_code)]
mod pano {
    pub mod load {
        include!("../src/core/load.rs");
    }
}

use pano::load::*;

fn not_found() -> LoadError {
    LoadError::Http {
        status: 404,
        reason: "Not Found".into(),
    }
}

fn bad_image() -> LoadError {
    LoadError::Decode("unsupported format".into())
}

#[test]
fn mask_hides_an_earlier_fetch_failure() {
    let err = settle_failure(FetchErrorPolicy::Mask, Some(not_found()), bad_image());
    assert_eq!(err, bad_image());
    assert_eq!(err.to_string(), "could not decode image: unsupported format");
}

#[test]
fn mask_without_fetch_failure_reports_decode() {
    let err = settle_failure(FetchErrorPolicy::Mask, None, bad_image());
    assert_eq!(err, bad_image());
}

#[test]
fn report_combines_fetch_and_decode_failures() {
    let err = settle_failure(FetchErrorPolicy::Report, Some(not_found()), bad_image());
    assert_eq!(
        err,
        LoadError::Both {
            fetch: Box::new(not_found()),
            decode: Box::new(bad_image()),
        }
    );
    assert_eq!(
        err.to_string(),
        "could not decode image: unsupported format (after fetch failed: HTTP 404 Not Found)"
    );
}

#[test]
fn report_without_fetch_failure_reports_decode_only() {
    let err = settle_failure(FetchErrorPolicy::Report, None, bad_image());
    assert_eq!(err, bad_image());
}

#[test]
fn mask_is_the_default_policy() {
    assert_eq!(FetchErrorPolicy::default(), FetchErrorPolicy::Mask);
    let policy: FetchErrorPolicy = serde_json::from_str("\"report\"").unwrap();
    assert_eq!(policy, FetchErrorPolicy::Report);
}
