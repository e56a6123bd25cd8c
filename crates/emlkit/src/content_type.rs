//! Content-Type parameter extraction.
//!
//! Only the parameters the parser and reader act on are extracted:
//! `boundary` and `charset`. The rest of the value is kept verbatim by the
//! callers.

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)[Bb]oundary=(?:\s*['"](.*?)['"]|([^;\s"']{1,70}))(?:\s*;.*)?$"#,
    )
    .expect("boundary pattern is valid")
});

#[allow(clippy::expect_used)]
static CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*(?:['"]([^'"]*)['"]|([^;\s"']+))"#)
        .expect("charset pattern is valid")
});

/// Extracts the `boundary` parameter.
///
/// Single-quoted, double-quoted and bare (up to 70 characters) forms are
/// accepted, optionally followed by further parameters.
#[must_use]
pub fn get_boundary(content_type: &str) -> Option<String> {
    BOUNDARY
        .captures(content_type)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
}

/// Extracts the `charset` parameter.
#[must_use]
pub fn get_charset(content_type: &str) -> Option<String> {
    CHARSET
        .captures(content_type)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .filter(|charset| !charset.is_empty())
}

/// Comparison key for a charset name: lowercase ASCII alphanumerics only.
///
/// `ISO-8859-1` becomes `iso88591`, `UTF-8` becomes `utf8`.
#[must_use]
pub fn get_charset_name(charset: &str) -> String {
    charset
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Checks for a `multipart/*` media type.
#[must_use]
pub fn is_multipart(content_type: &str) -> bool {
    content_type.starts_with("multipart/")
}
