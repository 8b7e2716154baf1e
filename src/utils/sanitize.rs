//! Utilities for sanitizing error messages and log output.
//!
//! Removes control characters from error messages before they are recorded in
//! metrics or returned to clients, and redacts credentials that upstream
//! errors tend to echo back (reqwest includes the request URL, query string
//! and all, in its error messages).

use regex::Regex;
use std::sync::LazyLock;

/// Query parameters and `key=value` pairs whose values must never be logged.
static SECRET_PARAM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(token|api_key|apikey|access_token|password|secret)=[^&\s]+")
        .expect("secret parameter pattern is valid")
});

/// Placeholder substituted for redacted values.
pub const REDACTED: &str = "[REDACTED]";

/// Sanitizes an error message by removing control characters.
///
/// Control characters (0x00-0x1F, except newline/tab/carriage return) can cause
/// issues when written to logs or JSON bodies. This function removes them
/// while preserving readability.
pub fn sanitize_error_message(message: &str) -> String {
    message
        .chars()
        .filter(|c| {
            // Allow printable ASCII, newline, tab, carriage return
            let code = *c as u32;
            code >= 0x20 // Printable ASCII starts at 0x20 (space)
                || code == 0x09 // Tab
                || code == 0x0A // Newline
                || code == 0x0D // Carriage return
                || code > 0x7F // Allow non-ASCII (UTF-8)
        })
        .collect()
}

/// Replaces the values of credential-like parameters with [`REDACTED`].
///
/// # Examples
///
/// ```
/// use ip_lookup::utils::redact_secrets;
///
/// let msg = "error sending request for url (https://ipinfo.io/8.8.8.8?token=abc123)";
/// assert_eq!(
///     redact_secrets(msg),
///     "error sending request for url (https://ipinfo.io/8.8.8.8?token=[REDACTED])"
/// );
/// ```
pub fn redact_secrets(message: &str) -> String {
    SECRET_PARAM_PATTERN
        .replace_all(message, |caps: &regex::Captures<'_>| {
            format!("{}={}", &caps[1], REDACTED)
        })
        .into_owned()
}

/// Sanitizes, redacts and truncates an error message.
///
/// This function:
/// 1. Removes control characters
/// 2. Redacts credential-like parameters
/// 3. Truncates to `MAX_ERROR_MESSAGE_LENGTH` if necessary, appending a
///    truncation indicator
pub fn sanitize_and_truncate_error_message(message: &str) -> String {
    let sanitized = redact_secrets(&sanitize_error_message(message));
    let max = crate::config::MAX_ERROR_MESSAGE_LENGTH;

    if sanitized.len() > max {
        // Leave room for the truncation message, and never split a UTF-8 sequence
        let mut truncate_len = max.saturating_sub(50).min(sanitized.len());
        while !sanitized.is_char_boundary(truncate_len) {
            truncate_len -= 1;
        }
        format!(
            "{}... (truncated, original length: {} chars)",
            &sanitized[..truncate_len],
            sanitized.len()
        )
    } else {
        sanitized
    }
}
