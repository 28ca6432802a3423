// Texture load failures and how a fetch failure is reported once the
// image-element fallback has also failed.

use serde::{Deserialize, Serialize};

/// How a failed fetch is reported when the image-element fallback runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchErrorPolicy {
    /// The fetch failure is logged and only a fallback failure is shown.
    #[default]
    Mask,
    /// A fallback failure is shown together with the earlier fetch failure.
    Report,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("HTTP {status} {reason}")]
    Http { status: u16, reason: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("could not decode image: {0}")]
    Decode(String),
    #[error("{decode} (after fetch failed: {fetch})")]
    Both { fetch: Box<LoadError>, decode: Box<LoadError> },
}

/// The error a load ends with when the fallback decode failed.
///
/// `fetch` is the earlier fetch failure, if the fetch failed at all. Under
/// `Mask` it is dropped and only `decode` is reported.
pub fn settle_failure(
    policy: FetchErrorPolicy,
    fetch: Option<LoadError>,
    decode: LoadError,
) -> LoadError {
    match (policy, fetch) {
        (FetchErrorPolicy::Report, Some(fetch)) => LoadError::Both {
            fetch: Box::new(fetch),
            decode: Box::new(decode),
        },
        _ => decode,
    }
}
