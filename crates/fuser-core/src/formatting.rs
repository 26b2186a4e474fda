//! Text normalization for relayed content.
//!
//! The emphasis pattern is compiled through `lazy-regex`, so it is validated
//! at build time and initialized on first use.

// lazy_regex! relies on once_cell internally
#![allow(clippy::non_std_lazy_statics)]

use crate::types::QuotedMessage;
use lazy_regex::lazy_regex;

/// Runs of emphasis markers left over from markdown formatting.
static RE_EMPHASIS: lazy_regex::Lazy<regex::Regex> = lazy_regex!(r"\*+");

/// Sender label used when the replied-to message has no known sender.
pub const UNKNOWN_SENDER: &str = "Unknown";

/// Remove every run of `*` and trim surrounding whitespace.
///
/// Idempotent: applying it twice yields the same text as applying it once.
///
/// # Examples
///
/// ```
/// use fuser_core::formatting::strip_emphasis_markers;
/// assert_eq!(strip_emphasis_markers("  **Hi** *there* "), "Hi there");
/// ```
#[must_use]
pub fn strip_emphasis_markers(text: &str) -> String {
    RE_EMPHASIS.replace_all(text, "").trim().to_string()
}

/// Whether there is nothing worth sending in `text`.
#[must_use]
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Context line describing the message being replied to.
#[must_use]
pub fn reply_annotation(quoted: &QuotedMessage) -> String {
    let sender = quoted.sender.as_deref().unwrap_or(UNKNOWN_SENDER);
    format!("Replying to {sender}: {}", quoted.text)
}

/// Build the outbound text: the normalized body, preceded by the reply
/// annotation and a blank line when the original could be resolved.
#[must_use]
pub fn compose_relay_text(body: &str, reply: Option<&QuotedMessage>) -> String {
    let body = strip_emphasis_markers(body);
    match reply {
        Some(quoted) => format!("{}\n\n{body}", reply_annotation(quoted)),
        None => body,
    }
}
