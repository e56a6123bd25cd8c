//! Charset conversion between bytes and Unicode text.
//!
//! Messages routinely mislabel or omit their charset, so [`decode`] never
//! fails: it walks a fixed fallback chain and, as a last resort, maps every
//! byte to the code point of the same value.

use encoding_rs::{Encoding, GBK, UTF_8};

/// Charset assumed when a part does not declare one.
pub const DEFAULT_CHARSET: &str = "utf-8";

const FALLBACK_CHARSET: &str = "iso-8859-15";

/// Rewrites common charset aliases into their canonical spelling.
///
/// `utf8`/`utf_16` become `UTF-8`/`UTF-16`, `win-1252` becomes
/// `WINDOWS-1252`, `latin1` becomes `ISO-8859-1`. Anything else is returned
/// unchanged.
#[must_use]
pub fn normalize_charset(charset: &str) -> String {
    const RULES: [(&str, &str); 3] = [
        ("utf", "UTF-"),
        ("win", "WINDOWS-"),
        ("latin", "ISO-8859-"),
    ];

    for (prefix, canonical) in RULES {
        let Some(head) = charset.get(..prefix.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(prefix) {
            continue;
        }
        let rest = &charset[prefix.len()..];
        let digits = rest.strip_prefix(['-', '_']).unwrap_or(rest);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return format!("{canonical}{digits}");
        }
    }

    charset.to_string()
}

fn lookup(charset: &str) -> Option<&'static Encoding> {
    Encoding::for_label(charset.trim().as_bytes())
}

/// Encodes text into bytes under the named charset.
///
/// Unknown charsets, and charsets that cannot be used as an output encoding
/// (UTF-16), produce UTF-8.
#[must_use]
pub fn encode(text: &str, charset: &str) -> Vec<u8> {
    let encoding = lookup(&normalize_charset(charset)).unwrap_or(UTF_8);
    let (bytes, _, _) = encoding.encode(text);
    bytes.into_owned()
}

struct Attempt<'a> {
    charset: &'a str,
    strict: bool,
}

fn try_decode(bytes: &[u8], attempt: &Attempt<'_>) -> Option<String> {
    let encoding = lookup(attempt.charset)?;
    if attempt.strict {
        let stripped = match Encoding::for_bom(bytes) {
            Some((bom_encoding, len)) if bom_encoding == encoding => &bytes[len..],
            _ => bytes,
        };
        encoding
            .decode_without_bom_handling_and_without_replacement(stripped)
            .map(std::borrow::Cow::into_owned)
    } else {
        let (text, _) = encoding.decode_with_bom_removal(bytes);
        Some(text.into_owned())
    }
}

/// Decodes bytes into text, trying the requested charset first.
///
/// The chain is: the normalized charset (strictly then permissively for
/// ISO-8859-15, permissively otherwise), strict UTF-8, permissive
/// ISO-8859-15, and finally a byte-per-character transliteration.
#[must_use]
pub fn decode(bytes: &[u8], charset: &str) -> String {
    let normalized = normalize_charset(charset);
    let is_fallback = normalized.eq_ignore_ascii_case(FALLBACK_CHARSET);
    let is_utf8 = normalized.eq_ignore_ascii_case(DEFAULT_CHARSET);

    let mut attempts = Vec::with_capacity(4);
    if is_fallback {
        attempts.push(Attempt {
            charset: &normalized,
            strict: true,
        });
    }
    attempts.push(Attempt {
        charset: &normalized,
        strict: false,
    });
    if !is_utf8 {
        attempts.push(Attempt {
            charset: DEFAULT_CHARSET,
            strict: true,
        });
    }
    if !is_fallback {
        attempts.push(Attempt {
            charset: FALLBACK_CHARSET,
            strict: false,
        });
    }

    attempts
        .iter()
        .find_map(|attempt| try_decode(bytes, attempt))
        .unwrap_or_else(|| bytes_to_string(bytes))
}

/// Maps every byte to the code point of the same value.
#[must_use]
pub fn bytes_to_string(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// Transcodes bytes in `from_charset` (UTF-8 when `None`) to UTF-8.
#[must_use]
pub fn convert(bytes: &[u8], from_charset: Option<&str>) -> Vec<u8> {
    decode(bytes, from_charset.unwrap_or(DEFAULT_CHARSET)).into_bytes()
}

/// Encodes already-decoded text as UTF-8.
#[must_use]
pub fn convert_str(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Transcodes GBK/GB2312 bytes to UTF-8.
///
/// GB2312 is a subset of GBK, so one decoder covers both labels.
#[must_use]
pub fn gbk_to_utf8(bytes: &[u8]) -> Vec<u8> {
    let (text, _) = GBK.decode_without_bom_handling(bytes);
    text.into_owned().into_bytes()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::needless_collect,
    clippy::unreadable_literal
)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_utf() {
        assert_eq!(normalize_charset("utf-8"), "UTF-8");
        assert_eq!(normalize_charset("utf8"), "UTF-8");
        assert_eq!(normalize_charset("UTF_16"), "UTF-16");
    }

    #[test]
    fn test_normalize_win_and_latin() {
        assert_eq!(normalize_charset("win-1252"), "WINDOWS-1252");
        assert_eq!(normalize_charset("WIN_1251"), "WINDOWS-1251");
        assert_eq!(normalize_charset("latin-1"), "ISO-8859-1");
        assert_eq!(normalize_charset("LATIN_2"), "ISO-8859-2");
    }

    #[test]
    fn test_normalize_passthrough() {
        assert_eq!(normalize_charset("ascii"), "ascii");
        assert_eq!(normalize_charset("koi8-r"), "koi8-r");
        assert_eq!(normalize_charset("utf-"), "utf-");
        assert_eq!(normalize_charset("windows-1252"), "windows-1252");
    }

    #[test]
    fn test_encode_utf8() {
        assert_eq!(encode("€", "utf-8"), vec![0xE2, 0x82, 0xAC]);
        assert!(encode("", "utf-8").is_empty());
    }

    #[test]
    fn test_encode_legacy() {
        assert_eq!(encode("Hällo", "iso-8859-15"), b"H\xe4llo".to_vec());
    }

    #[test]
    fn test_decode_utf8() {
        let bytes = "Hello, World! © €".as_bytes();
        assert_eq!(decode(bytes, "utf-8"), "Hello, World! © €");
        assert_eq!(decode(&[], "utf-8"), "");
    }

    #[test]
    fn test_decode_iso_8859_15() {
        let bytes = b"H\xe4ll\xf6, W\xf6rld! \xa4";
        assert_eq!(decode(bytes, "iso-8859-15"), "Hällö, Wörld! €");
    }

    #[test]
    fn test_decode_unknown_charset_falls_back_to_iso_8859_15() {
        let bytes = b"Gr\xfc\xdfe \xa4";
        assert_eq!(decode(bytes, "my-custom-charset"), "Grüße €");
    }

    #[test]
    fn test_decode_unknown_charset_prefers_valid_utf8() {
        let bytes = "Grüße".as_bytes();
        assert_eq!(decode(bytes, "x-unknown"), "Grüße");
    }

    #[test]
    fn test_bytes_to_string() {
        assert_eq!(bytes_to_string(b"Hello"), "Hello");
        assert_eq!(bytes_to_string(&[0xE9]), "é");
        assert_eq!(bytes_to_string(&[]), "");
    }

    #[test]
    fn test_convert() {
        assert_eq!(convert_str("Grüße"), "Grüße".as_bytes());
        assert_eq!(convert("Grüße".as_bytes(), None), "Grüße".as_bytes());
        assert_eq!(convert(b"Gr\xfc\xdfe", Some("latin1")), "Grüße".as_bytes());
        assert!(convert(&[], Some("utf-8")).is_empty());
    }

    #[test]
    fn test_gbk_to_utf8() {
        // "你好" in GBK
        let gbk = [0xC4, 0xE3, 0xBA, 0xC3];
        assert_eq!(gbk_to_utf8(&gbk), "你好".as_bytes());
        assert_eq!(gbk_to_utf8(b"plain ascii"), b"plain ascii");
    }

    proptest! {
        #[test]
        fn prop_utf8_roundtrip(text in "[ -~àáâäçèéêëìíîïñòóôöùúûüÀÉÖÜß€£¥©]{0,64}") {
            prop_assert_eq!(decode(&encode(&text, "utf-8"), "utf-8"), text);
        }

        #[test]
        fn prop_decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
            let _ = decode(&bytes, "utf-8");
            let _ = decode(&bytes, "iso-8859-15");
        }
    }
}
