//! Keyword-based classification of transient failures.

use std::error::Error;

/// Message fragments that mark an error as transient.
///
/// Matching is done against the lower-cased error message, so every entry
/// here must be lower-case.
pub const TRANSIENT_KEYWORDS: &[&str] = &[
    // network
    "network",
    "connection",
    // rate limiting
    "rate limit",
    "429",
    // 5xx
    "server error",
    "500",
    "502",
    "503",
    "504",
    // timeouts
    "timeout",
    "timed out",
];

/// Determine whether an error is worth retrying.
///
/// Lower-cases the error's message and looks for any of
/// [`TRANSIENT_KEYWORDS`]. Errors with an empty message are never transient.
///
/// # Examples
///
/// ```rust
/// use steadfast::error::is_transient_error;
///
/// assert!(is_transient_error(&std::io::Error::other("Connection refused")));
/// assert!(!is_transient_error(&std::io::Error::other("Unauthorized")));
/// ```
pub fn is_transient_error<E>(error: &E) -> bool
where
    E: Error + ?Sized,
{
    is_transient_message(&error.to_string())
}

/// Like [`is_transient_error`], but an absent error is never transient.
pub fn is_transient(error: Option<&(dyn Error + 'static)>) -> bool {
    error.is_some_and(|error| is_transient_error(error))
}

/// Keyword test on a raw error message.
pub fn is_transient_message(message: &str) -> bool {
    if message.is_empty() {
        return false;
    }

    let message = message.to_lowercase();
    TRANSIENT_KEYWORDS
        .iter()
        .any(|keyword| message.contains(keyword))
}
