//! Identifier grammar.
//!
//! Two accepted shapes, checked against the whole string:
//!
//! ```text
//! SHORT = Tag ":" Suffix
//! LSID  = "urn:lsid:" Authority ":" Tag ":" Suffix
//! ```
//!
//! `Suffix` is any non-whitespace run; `Authority` matches
//! `([\w\-.]+\.[\w\-.]+)+`. The tag inside an identifier must equal the tag
//! the record type declares.

use std::sync::OnceLock;

use regex::Regex;

use crate::Tag;

static LSID_RE: OnceLock<Regex> = OnceLock::new();

fn lsid_re() -> &'static Regex {
    LSID_RE.get_or_init(|| {
        Regex::new(r"^urn:lsid:((?:[\w\-.]+\.[\w\-.]+)+):(\w+):(\S+)$")
            .unwrap_or_else(|e| panic!("identifier grammar regex: {e}"))
    })
}

/// Does `raw` match either accepted shape for `tag`.
pub fn matches(tag: Tag, raw: &str) -> bool {
    short_form(tag, raw) || lsid_form(tag, raw)
}

fn short_form(tag: Tag, raw: &str) -> bool {
    match raw.strip_prefix(tag.as_str()).and_then(|r| r.strip_prefix(':')) {
        Some(suffix) => !suffix.is_empty() && !suffix.contains(char::is_whitespace),
        None => false,
    }
}

fn lsid_form(tag: Tag, raw: &str) -> bool {
    lsid_re()
        .captures(raw)
        .is_some_and(|caps| &caps[2] == tag.as_str())
}

/// Token after the last `:`, or the whole string when no colon is present.
pub fn trailing_token(raw: &str) -> &str {
    raw.rsplit(':').next().unwrap_or(raw)
}

/// Signed integer reading of the trailing token.
///
/// Drives counter updates for identifiers that already match the grammar;
/// non-numeric suffixes simply do not participate in numbering.
pub fn trailing_int(raw: &str) -> Option<i64> {
    trailing_token(raw).parse().ok()
}

/// Unsigned decimal reading of the trailing token, used when repairing an
/// identifier that failed validation. Stricter than [`trailing_int`]: no
/// sign, digits only.
pub fn trailing_decimal(raw: &str) -> Option<i64> {
    let token = trailing_token(raw);
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
