//! Header value decoding: RFC 2047 encoded-words and quoted-printable.

use crate::charset::{self, DEFAULT_CHARSET};
use crate::content_type::get_charset_name;
use crate::encoding::{decode_base64_lenient, mime_decode};
use regex::{Captures, Regex};
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static ENCODED_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)=\?([^?]+)\?(B|Q)\?([^?]+)\?=").expect("encoded-word pattern is valid")
});

#[allow(clippy::expect_used)]
static TRAILING_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)[ \t]+(\r?)$").expect("whitespace pattern is valid")
});

#[allow(clippy::expect_used)]
static SOFT_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=(?:\r?\n|\z)").expect("soft break pattern is valid"));

#[allow(clippy::expect_used)]
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n").expect("line break pattern is valid"));

fn decode_captures(caps: &Captures<'_>) -> Option<String> {
    let label = if get_charset_name(&caps[1]) == "utf8" {
        DEFAULT_CHARSET
    } else {
        &caps[1]
    };
    let value = &caps[3];

    if caps[2].eq_ignore_ascii_case("b") {
        let bytes = decode_base64_lenient(value).ok()?;
        Some(charset::decode(&bytes, label))
    } else {
        Some(unquote_printable(value, Some(label), true))
    }
}

/// Decodes a single `=?charset?B|Q?text?=` token.
///
/// Input that is not an encoded-word, or whose Base64 payload is corrupt,
/// is returned unchanged.
#[must_use]
pub fn decode_encoded_word(token: &str) -> String {
    ENCODED_WORD
        .captures(token)
        .and_then(|caps| decode_captures(&caps))
        .unwrap_or_else(|| token.to_string())
}

/// Decodes quoted-printable text.
///
/// Trailing whitespace is stripped from every line and soft line breaks are
/// removed. With `q_encoding` (RFC 2047 Q), underscores become spaces before
/// the hex escapes are resolved.
#[must_use]
pub fn unquote_printable(value: &str, charset: Option<&str>, q_encoding: bool) -> String {
    let stripped = TRAILING_WHITESPACE.replace_all(value, "$1");
    let joined = SOFT_BREAK.replace_all(&stripped, "");
    let raw = if q_encoding {
        joined.replace('_', " ")
    } else {
        joined.into_owned()
    };
    mime_decode(&raw, charset.unwrap_or(DEFAULT_CHARSET))
}

/// Decodes every encoded-word in a header value and removes line breaks.
///
/// Text between encoded-words, whitespace included, is kept verbatim.
#[must_use]
pub fn unquote_string(value: &str) -> String {
    let decoded = ENCODED_WORD.replace_all(value, |caps: &Captures<'_>| {
        decode_captures(caps).unwrap_or_else(|| caps[0].to_string())
    });
    LINE_BREAK.replace_all(&decoded, "").into_owned()
}
