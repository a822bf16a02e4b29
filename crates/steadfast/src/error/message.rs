//! User-presentable error messages.

use std::error::Error;

/// Fallback shown when an error has nothing presentable to say.
pub const DEFAULT_FALLBACK_MESSAGE: &str = "An unexpected error occurred.";

/// Markers of messages that leak internal exception text ("TypeError: ...").
const TECHNICAL_MARKERS: &[&str] = &["Error:", "TypeError"];

/// Turn an error into a message that is safe to show to a user.
///
/// Returns `fallback` when there is no error, when its message is empty, or
/// when the message looks like internal exception text. Otherwise the
/// error's own message is returned verbatim.
///
/// # Examples
///
/// ```rust
/// use steadfast::error::{format_error_message, DEFAULT_FALLBACK_MESSAGE};
///
/// let friendly = std::io::Error::other("Friendly text");
/// assert_eq!(format_error_message(Some(&friendly), DEFAULT_FALLBACK_MESSAGE), "Friendly text");
///
/// let technical = std::io::Error::other("TypeError: Cannot read property");
/// assert_eq!(format_error_message(Some(&technical), "Try again"), "Try again");
///
/// assert_eq!(format_error_message(None, DEFAULT_FALLBACK_MESSAGE), DEFAULT_FALLBACK_MESSAGE);
/// ```
pub fn format_error_message(error: Option<&(dyn Error + 'static)>, fallback: &str) -> String {
    let Some(error) = error else {
        return fallback.to_string();
    };

    let message = error.to_string();
    if message.is_empty() || is_technical(&message) {
        return fallback.to_string();
    }

    message
}

fn is_technical(message: &str) -> bool {
    TECHNICAL_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}
