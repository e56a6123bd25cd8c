//! Transfer encoding utilities.
//!
//! Base64 in strict and lenient flavours, the generic `=XX` hex decoder
//! shared by quoted-printable and RFC 2047 Q-encoding, and line wrapping for
//! encoded payloads.

use crate::charset;
use crate::error::Result;
use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;

/// Line width for Base64 attachment payloads.
pub const PAYLOAD_LINE_WIDTH: usize = 72;

/// Base64 engine that accepts missing padding and non-canonical trailing bits.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes canonical Base64 data.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data).map_err(Into::into)
}

/// Decodes Base64 the way mail bodies need it: whitespace and line breaks
/// are ignored and padding is optional.
///
/// # Errors
///
/// Returns an error if the remaining characters are not valid Base64.
pub fn decode_base64_lenient(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    LENIENT.decode(cleaned).map_err(Into::into)
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Decodes `=XX` hex escapes and interprets the bytes under `charset`.
///
/// An `=` not followed by two hex digits is kept literally. Characters
/// outside ASCII contribute their UTF-8 bytes.
#[must_use]
pub fn mime_decode(text: &str, charset: &str) -> String {
    let bytes = text.as_bytes();
    let mut buffer = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'=' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                buffer.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        buffer.push(bytes[i]);
        i += 1;
    }

    charset::decode(&buffer, charset)
}

/// Splits `text` into rows of `width` characters joined by CRLF.
///
/// Empty input yields an empty string.
#[must_use]
pub fn wrap(text: &str, width: usize) -> String {
    if width == 0 || text.is_empty() {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width)
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\r\n")
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal
)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_encode_decode() {
        let data = b"Hello, World!";
        let encoded = encode_base64(data);
        assert_eq!(encoded, "SGVsbG8sIFdvcmxkIQ==");

        let decoded = decode_base64(&encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_base64_lenient() {
        let decoded = decode_base64_lenient("SGVsbG8g\r\nV29ybGQ=\r\n").unwrap();
        assert_eq!(decoded, b"Hello World");

        let unpadded = decode_base64_lenient("SGVsbG8").unwrap();
        assert_eq!(unpadded, b"Hello");

        assert!(decode_base64_lenient("<p>not base64</p>").is_err());
    }

    #[test]
    fn test_mime_decode() {
        assert_eq!(mime_decode("=48=65=6C=6C=6F", "UTF-8"), "Hello");
        assert_eq!(mime_decode("=48=65=6c=6c=6f", "UTF-8"), "Hello");
        assert_eq!(mime_decode("Caf=C3=A9", "UTF-8"), "Café");
        assert_eq!(mime_decode("", "UTF-8"), "");
        assert_eq!(mime_decode("Hello World", "UTF-8"), "Hello World");
    }

    #[test]
    fn test_mime_decode_invalid_escape_is_literal() {
        assert_eq!(mime_decode("=XXHello=41", "UTF-8"), "=XXHelloA");
        assert_eq!(mime_decode("=AXHello", "UTF-8"), "=AXHello");
        assert_eq!(mime_decode("trailing=4", "UTF-8"), "trailing=4");
    }

    #[test]
    fn test_mime_decode_charset() {
        assert_eq!(mime_decode("M=FCnchen", "iso-8859-1"), "München");
        assert_eq!(mime_decode("déjà", "UTF-8"), "déjà");
    }

    #[test]
    fn test_wrap() {
        let wrapped = wrap("abcdefghijklmnopqrstuvwxyz", 5);
        assert_eq!(wrapped, "abcde\r\nfghij\r\nklmno\r\npqrst\r\nuvwxy\r\nz");
        assert_eq!(wrap("abc", 5), "abc");
        assert_eq!(wrap("", 5), "");
        assert_eq!(wrap("abcdef", 3), "abc\r\ndef");
    }
}
