//! Reduces a parsed message to a [`SemanticMessage`].
//!
//! The reader walks the tree produced by the parser, transfer-decodes every
//! leaf and sorts it into the HTML body, the plain-text body or the
//! attachment list.

use crate::address::{EmailAddress, parse_address_list};
use crate::charset::{self, DEFAULT_CHARSET, gbk_to_utf8};
use crate::content_type::{get_charset, get_charset_name};
use crate::decoder::{unquote_printable, unquote_string};
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::encoding::{decode_base64, decode_base64_lenient, encode_base64};
use crate::error::{Error, Result};
use crate::header::{CONTENT_DISPOSITION, CONTENT_ID, CONTENT_TRANSFER_ENCODING, CONTENT_TYPE, HeaderMap};
use crate::message::{Attachment, SemanticMessage, TransferEncoding};
use crate::parser::{Body, BoundaryBlock, ParseOptions, ParsedPart, parse_with};
use percent_encoding::percent_decode_str;
use regex::Regex;
use std::sync::LazyLock;

/// Headers searched for a file name, in order.
const NAME_SOURCES: [&str; 3] = ["Content-Disposition", "Content-Type", "Content-type"];

#[allow(clippy::expect_used)]
static NAME_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\s|'|utf-8|\*[0-9]\*)").expect("name noise pattern is valid")
});

#[allow(clippy::expect_used)]
static NAME_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)name\*?="?(.+?)"?$"#).expect("name parameter pattern is valid")
});

/// Reader options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadOptions {
    /// Options for parsing raw text.
    pub parse: ParseOptions,
}

impl ReadOptions {
    /// Creates the default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            parse: ParseOptions::new(),
        }
    }

    /// Sets the parser options.
    #[must_use]
    pub const fn parse(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }
}

/// Parses and reads a message, reporting anomalies through `tracing`.
///
/// # Errors
///
/// Returns [`Error::MissingHeader`] if there is no `Date` header and
/// [`Error::InvalidInput`] if the message has no headers at all.
pub fn read(text: &str, options: &ReadOptions) -> Result<SemanticMessage> {
    read_with(text, options, &mut TracingSink)
}

/// Parses and reads a message, reporting anomalies to `sink`.
///
/// # Errors
///
/// See [`read`].
pub fn read_with(
    text: &str,
    options: &ReadOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<SemanticMessage> {
    let parsed = parse_with(text, &options.parse, sink);
    read_parsed_with(&parsed, sink)
}

/// Reads an already parsed message.
///
/// # Errors
///
/// See [`read`].
pub fn read_parsed(part: &ParsedPart) -> Result<SemanticMessage> {
    read_parsed_with(part, &mut TracingSink)
}

/// Reads an already parsed message, reporting anomalies to `sink`.
///
/// # Errors
///
/// See [`read`].
pub fn read_parsed_with(
    part: &ParsedPart,
    sink: &mut dyn DiagnosticSink,
) -> Result<SemanticMessage> {
    if part.headers.is_empty() {
        return Err(Error::InvalidInput("message has no headers".into()));
    }
    let date = part.headers.get("Date").ok_or(Error::MissingHeader("Date"))?;

    let mut message = SemanticMessage::new(date);
    message.subject = part.headers.get("Subject").map(unquote_string);
    message.from = part.headers.get("From").map(read_addresses);
    message.to = part.headers.get("To").map(read_addresses);
    message.cc = part.headers.probe(&["Cc", "CC"]).map(read_addresses);
    message.headers = part.headers.clone();

    let mut reader = Reader { message, sink };
    match &part.body {
        Some(Body::Parts(blocks)) => reader.walk(blocks, true),
        Some(Body::Text(text)) => reader.append(&part.headers, text),
        None => {}
    }
    Ok(reader.message)
}

fn read_addresses(raw: &str) -> Vec<EmailAddress> {
    parse_address_list(&unquote_string(raw))
}

/// A transfer-decoded body.
enum Content {
    Text(String),
    Bytes(Vec<u8>),
}

impl Content {
    fn into_text(self, charset: &str) -> String {
        match self {
            Self::Text(text) => text,
            Self::Bytes(bytes) => charset::decode(&bytes, charset),
        }
    }

    fn into_bytes(self, charset: &str) -> Vec<u8> {
        match self {
            Self::Text(text) => charset::encode(&text, charset),
            Self::Bytes(bytes) => bytes,
        }
    }
}

struct Reader<'s> {
    message: SemanticMessage,
    sink: &'s mut dyn DiagnosticSink,
}

impl Reader<'_> {
    fn walk(&mut self, blocks: &[BoundaryBlock], top_level: bool) {
        for block in blocks {
            let part = &block.part;
            match &part.body {
                None => self.sink.report(Diagnostic::MissingPartBody {
                    boundary: block.boundary.clone(),
                }),
                Some(Body::Text(text)) => self.append(&part.headers, text),
                Some(Body::Parts(children)) => {
                    if top_level && self.message.multipart_alternative.is_none() {
                        self.message.multipart_alternative = part
                            .content_type()
                            .filter(|ct| ct.contains("multipart"))
                            .map(str::to_string);
                    }
                    self.walk(children, false);
                }
            }
        }
    }

    fn append(&mut self, headers: &HeaderMap, body: &str) {
        let content_type = headers.probe(&CONTENT_TYPE);
        let disposition = headers.probe(&CONTENT_DISPOSITION);
        let mut charset = content_type
            .and_then(get_charset)
            .unwrap_or_else(|| DEFAULT_CHARSET.to_string());
        let encoding_value = headers
            .probe(&CONTENT_TRANSFER_ENCODING)
            .map(str::to_ascii_lowercase);
        let encoding = TransferEncoding::parse(encoding_value.as_deref().unwrap_or_default());

        tracing::debug!(
            content_type = content_type.unwrap_or_default(),
            %encoding,
            charset = %charset,
            "reading part"
        );

        let content = match encoding {
            TransferEncoding::Base64 => match decode_base64_lenient(body) {
                Ok(bytes) if content_type.is_some_and(|ct| ct.contains("gbk")) => {
                    charset = DEFAULT_CHARSET.to_string();
                    Content::Bytes(gbk_to_utf8(&bytes))
                }
                Ok(bytes) => Content::Bytes(bytes),
                Err(err) => {
                    self.sink.report(Diagnostic::UndecodableBody {
                        encoding: encoding.to_string(),
                        reason: err.to_string(),
                    });
                    Content::Text(body.to_string())
                }
            },
            TransferEncoding::QuotedPrintable => {
                Content::Text(unquote_printable(body, Some(charset.as_str()), false))
            }
            e if e.is_eight_bit() && get_charset_name(&charset) != "utf8" => {
                latin1_bytes(body).map_or_else(|| Content::Text(body.to_string()), Content::Bytes)
            }
            _ => Content::Text(body.to_string()),
        };

        let section_headers = || -> HeaderMap {
            [
                ("Content-Type", content_type.unwrap_or_default()),
                (
                    "Content-Transfer-Encoding",
                    encoding_value.as_deref().unwrap_or_default(),
                ),
            ]
            .into_iter()
            .collect()
        };

        let media =
            |kind: &str| disposition.is_none() && content_type.is_some_and(|ct| ct.contains(kind));
        if media("text/html") {
            let mut html = content
                .into_text(&charset)
                .replace("\r\n", "")
                .replace('\r', "")
                .replace("&quot;", "");
            if encoding != TransferEncoding::Base64 {
                if let Some(decoded) = decode_if_base64(&html) {
                    html = decoded;
                }
            }
            self.message.append_html(&html);
            self.message.html_headers = Some(section_headers());
        } else if media("text/plain") {
            let text = content.into_text(&charset);
            self.message.append_text(&text);
            self.message.text_headers = Some(section_headers());
        } else {
            let data = content.into_bytes(&charset);
            let attachment = Attachment {
                id: headers.probe(&CONTENT_ID).map(str::to_string),
                name: attachment_name(headers),
                content_type: content_type.map(str::to_string),
                inline: disposition.is_some_and(|cd| cd.trim_start().starts_with("inline")),
                data64: charset::decode(&data, &charset),
                data,
            };
            self.message.attachments.push(attachment);
        }
    }
}

/// Reinterprets text whose characters all fit in one byte as those bytes.
fn latin1_bytes(text: &str) -> Option<Vec<u8>> {
    text.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect()
}

/// Decodes `text` if it is canonical Base64 of UTF-8 text.
fn decode_if_base64(text: &str) -> Option<String> {
    let bytes = decode_base64(text).ok()?;
    if encode_base64(&bytes) != text {
        return None;
    }
    String::from_utf8(bytes).ok()
}

/// Extracts the file name from the `name`/`filename` parameters.
///
/// RFC 2231 continuations (`name*0*=`, `name*1*=`) are concatenated and the
/// result is percent-decoded.
fn attachment_name(headers: &HeaderMap) -> Option<String> {
    NAME_SOURCES.iter().find_map(|key| {
        let value = headers.get(key)?;
        let cleaned = NAME_NOISE.replace_all(value, "");
        let name: String = cleaned
            .split(';')
            .filter_map(|param| NAME_PARAM.captures(param))
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect();
        (!name.is_empty()).then(|| percent_decode_str(&name).decode_utf8_lossy().into_owned())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::needless_collect)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn read_collect(text: &str) -> (SemanticMessage, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let message = read_with(text, &ReadOptions::default(), &mut diagnostics).unwrap();
        (message, diagnostics)
    }

    #[test]
    fn test_read_basic_headers() {
        let eml = "Date: Mon, 23 Sep 2024 10:00:00 +0000\r\n\
                   From: \"Sender\" <sender@example.com>\r\n\
                   To: \"Receiver\" <receiver@example.com>\r\n\
                   CC: \"Carbon Copy\" <cc@example.com>\r\n\
                   Subject: Test Subject\r\n\
                   Content-Type: text/plain; charset=utf-8\r\n\
                   \r\n\
                   This is the plain text body of the email.\r\n";
        let (message, _) = read_collect(eml);
        assert_eq!(message.date, "Mon, 23 Sep 2024 10:00:00 +0000");
        assert_eq!(message.subject.as_deref(), Some("Test Subject"));
        assert_eq!(
            message.from,
            Some(vec![EmailAddress::new("Sender", "sender@example.com")])
        );
        assert_eq!(
            message.to,
            Some(vec![EmailAddress::new("Receiver", "receiver@example.com")])
        );
        assert_eq!(
            message.cc,
            Some(vec![EmailAddress::new("Carbon Copy", "cc@example.com")])
        );
        assert_eq!(
            message.text.as_deref(),
            Some("This is the plain text body of the email.")
        );
        assert_eq!(message.html, None);
        assert!(message.attachments.is_empty());
    }

    #[test]
    fn test_read_missing_date() {
        let eml = "From: sender@example.com\r\nSubject: No Date\r\nContent-Type: text/plain\r\n\r\nbody\r\n";
        let err = read(eml, &ReadOptions::default()).unwrap_err();
        assert!(err.is_missing_header());
        assert_eq!(err.to_string(), "Required Date header is missing");
    }

    #[test]
    fn test_read_no_headers() {
        let err = read_parsed(&ParsedPart::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_read_encoded_subject() {
        let eml = "Date: Mon, 23 Sep 2024 10:00:00 +0000\r\n\
                   Subject: =?UTF-8?B?SMOpbGxv?= world\r\n\
                   From: =?iso-8859-1?Q?J=F6rg?= <jorg@example.com>\r\n\
                   Content-Type: text/plain\r\n\
                   \r\n\
                   x";
        let (message, _) = read_collect(eml);
        assert_eq!(message.subject.as_deref(), Some("Héllo world"));
        assert_eq!(
            message.from,
            Some(vec![EmailAddress::new("Jörg", "jorg@example.com")])
        );
    }

    #[test]
    fn test_read_html_body() {
        let eml = "From: sender@example.com\r\n\
                   Date: Mon, 23 Sep 2024 10:00:00 +0000\r\n\
                   Content-Type: text/html; charset=utf-8\r\n\
                   \r\n\
                   <html><body><p>This is an <b>HTML</b> body.</p></body></html>\r\n";
        let (message, _) = read_collect(eml);
        assert_eq!(
            message.html.as_deref(),
            Some("<html><body><p>This is an <b>HTML</b> body.</p></body></html>")
        );
        assert_eq!(message.text, None);
        let headers = message.html_headers.unwrap();
        assert_eq!(headers.get("Content-Type"), Some("text/html; charset=utf-8"));
        assert_eq!(headers.get("Content-Transfer-Encoding"), Some(""));
    }

    #[test]
    fn test_read_html_strips_quot_entities() {
        let eml = "Date: Mon, 23 Sep 2024 10:00:00 +0000\r\n\
                   Content-Type: text/html\r\n\
                   \r\n\
                   <p>&quot;quoted&quot;</p>\r\n\
                   <p>two</p>";
        let (message, _) = read_collect(eml);
        assert_eq!(message.html.as_deref(), Some("<p>quoted</p><p>two</p>"));
    }

    #[test]
    fn test_read_html_unlabelled_base64() {
        // "<p>hi</p>"
        let eml = "Date: Mon, 23 Sep 2024 10:00:00 +0000\r\n\
                   Content-Type: text/html\r\n\
                   \r\n\
                   PHA+aGk8L3A+";
        let (message, _) = read_collect(eml);
        assert_eq!(message.html.as_deref(), Some("<p>hi</p>"));
    }

    #[test]
    fn test_read_html_unlabelled_base64_multiline() {
        // "<html>hello world</html>"
        let eml = "Date: Mon, 23 Sep 2024 10:00:00 +0000\r\n\
                   Content-Type: text/html\r\n\
                   \r\n\
                   PGh0bWw+aGVsbG8g\r\n\
                   d29ybGQ8L2h0bWw+\r\n";
        let (message, _) = read_collect(eml);
        assert_eq!(message.html.as_deref(), Some("<html>hello world</html>"));
    }

    #[test]
    fn test_read_quoted_printable() {
        let eml = "Date: Tue, 24 Sep 2024 10:00:00 +0000\r\n\
                   Content-Type: text/plain; charset=utf-8\r\n\
                   Content-Transfer-Encoding: quoted-printable\r\n\
                   \r\n\
                   This is a line with soft line break.=\r\n\
                   This is an encoded =C3=A9 char.\r\n";
        let (message, _) = read_collect(eml);
        assert_eq!(
            message.text.as_deref(),
            Some("This is a line with soft line break.This is an encoded é char.")
        );
        assert_eq!(
            message.text_headers.unwrap().get("Content-Transfer-Encoding"),
            Some("quoted-printable")
        );
    }

    #[test]
    fn test_read_base64_text() {
        let eml = "Date: Wed, 25 Sep 2024 11:00:00 +0000  \r\n\
                   Content-Type: text/plain; charset=utf-8\r\n\
                   Content-Transfer-Encoding: BASE64\r\n\
                   \r\n\
                   SGVsbG8sIFdvcmxkIQ==\r\n";
        let (message, _) = read_collect(eml);
        assert_eq!(message.text.as_deref(), Some("Hello, World!"));
        assert!(message.date_time().is_some());
    }

    #[test]
    fn test_read_base64_gbk() {
        // "你好" in GBK is C4 E3 BA C3
        let eml = "Date: Wed, 25 Sep 2024 11:00:00 +0000\r\n\
                   Content-Type: text/plain; charset=gbk\r\n\
                   Content-Transfer-Encoding: base64\r\n\
                   \r\n\
                   xOO6ww==\r\n";
        let (message, _) = read_collect(eml);
        assert_eq!(message.text.as_deref(), Some("你好"));
    }

    #[test]
    fn test_read_undecodable_base64_keeps_text() {
        let eml = "Date: Wed, 25 Sep 2024 11:00:00 +0000\r\n\
                   Content-Type: text/plain\r\n\
                   Content-Transfer-Encoding: base64\r\n\
                   \r\n\
                   not base64 at all!";
        let (message, diagnostics) = read_collect(eml);
        assert_eq!(message.text.as_deref(), Some("not base64 at all!"));
        assert!(matches!(
            diagnostics.as_slice(),
            [Diagnostic::UndecodableBody { .. }]
        ));
    }

    #[test]
    fn test_read_eight_bit_legacy_charset() {
        let eml = "Date: Wed, 25 Sep 2024 11:00:00 +0000\r\n\
                   Content-Type: text/plain; charset=windows-1252\r\n\
                   Content-Transfer-Encoding: 8bit\r\n\
                   \r\n\
                   price: 5\u{80}";
        let (message, _) = read_collect(eml);
        assert_eq!(message.text.as_deref(), Some("price: 5€"));
    }

    #[test]
    fn test_read_attachment() {
        let eml = "Date: Sat, 28 Sep 2024 14:00:00 +0000\r\n\
                   Subject: Email with Attachment\r\n\
                   Content-Type: multipart/mixed; boundary=\"boundary123\"\r\n\
                   \r\n\
                   --boundary123\r\n\
                   Content-Type: text/plain; charset=utf-8\r\n\
                   \r\n\
                   This is the main body of the email.\r\n\
                   --boundary123\r\n\
                   Content-Type: text/plain; name=\"testfile.txt\"\r\n\
                   Content-Transfer-Encoding: base64\r\n\
                   Content-Disposition: attachment; filename=\"testfile.txt\"\r\n\
                   Content-ID: <file1@example.com>\r\n\
                   \r\n\
                   SGVsbG8gdGhpcyBpcyBhIHRlc3QgZmlsZQ==\r\n\
                   --boundary123--\r\n";
        let (message, _) = read_collect(eml);
        assert_eq!(
            message.text.as_deref(),
            Some("This is the main body of the email.")
        );
        assert_eq!(message.attachments.len(), 1);

        let attachment = &message.attachments[0];
        assert_eq!(attachment.name.as_deref(), Some("testfile.txt"));
        assert_eq!(
            attachment.content_type.as_deref(),
            Some("text/plain; name=\"testfile.txt\"")
        );
        assert_eq!(attachment.id.as_deref(), Some("<file1@example.com>"));
        assert!(!attachment.inline);
        assert_eq!(attachment.data, b"Hello this is a test file");
        assert_eq!(attachment.data64, "Hello this is a test file");
    }

    #[test]
    fn test_read_multipart_alternative() {
        let eml = "Date: Sun, 29 Sep 2024 10:00:00 +0000\r\n\
                   Content-Type: multipart/alternative; boundary=\"alt\"\r\n\
                   \r\n\
                   --alt\r\n\
                   Content-Type: text/plain; charset=utf-8\r\n\
                   Content-Transfer-Encoding: 7bit\r\n\
                   \r\n\
                   This is the plain text version.\r\n\
                   --alt\r\n\
                   Content-Type: text/html; charset=utf-8\r\n\
                   Content-Transfer-Encoding: 7bit\r\n\
                   \r\n\
                   <p>This is the <b>HTML</b> version.</p>\r\n\
                   --alt--\r\n";
        let (message, _) = read_collect(eml);
        assert_eq!(message.text.as_deref(), Some("This is the plain text version."));
        assert_eq!(
            message.html.as_deref(),
            Some("<p>This is the <b>HTML</b> version.</p>")
        );
        assert_eq!(message.multipart_alternative, None);
    }

    #[test]
    fn test_read_nested_alternative_is_recorded() {
        let eml = "Date: Sun, 29 Sep 2024 10:00:00 +0000\r\n\
                   Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
                   \r\n\
                   --outer\r\n\
                   Content-Type: multipart/alternative; boundary=\"inner\"\r\n\
                   \r\n\
                   --inner\r\n\
                   Content-Type: text/plain\r\n\
                   \r\n\
                   plain\r\n\
                   --inner\r\n\
                   Content-Type: text/html\r\n\
                   \r\n\
                   <b>html</b>\r\n\
                   --inner--\r\n\
                   --outer\r\n\
                   Content-Type: image/png; name=\"dot.png\"\r\n\
                   Content-Disposition: inline; filename=\"dot.png\"\r\n\
                   Content-Transfer-Encoding: base64\r\n\
                   \r\n\
                   iVBORw==\r\n\
                   --outer--\r\n";
        let (message, _) = read_collect(eml);
        assert_eq!(
            message.multipart_alternative.as_deref(),
            Some("multipart/alternative; boundary=\"inner\"")
        );
        assert_eq!(message.text.as_deref(), Some("plain"));
        assert_eq!(message.html.as_deref(), Some("<b>html</b>"));
        assert_eq!(message.attachments.len(), 1);
        assert!(message.attachments[0].inline);
        assert_eq!(message.attachments[0].data, [0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_read_duplicate_text_parts_accumulate() {
        let eml = "Date: Sun, 29 Sep 2024 10:00:00 +0000\r\n\
                   Content-Type: multipart/mixed; boundary=b\r\n\
                   \r\n\
                   --b\r\n\
                   Content-Type: text/plain\r\n\
                   \r\n\
                   one\r\n\
                   --b\r\n\
                   Content-Type: text/plain\r\n\
                   \r\n\
                   two\r\n\
                   --b--\r\n";
        let (message, _) = read_collect(eml);
        assert_eq!(message.text.as_deref(), Some("onetwo"));
    }

    #[test]
    fn test_read_part_without_body_is_reported() {
        let eml = "Date: Sun, 29 Sep 2024 10:00:00 +0000\r\n\
                   Content-Type: multipart/mixed; boundary=b\r\n\
                   \r\n\
                   --b\r\n\
                   Content-Type: text/plain\r\n\
                   --b\r\n\
                   Content-Type: text/plain\r\n\
                   \r\n\
                   kept\r\n";
        let (message, diagnostics) = read_collect(eml);
        assert_eq!(message.text.as_deref(), Some("kept"));
        assert_eq!(
            diagnostics,
            vec![Diagnostic::MissingPartBody {
                boundary: "b".into()
            }]
        );
    }

    #[test]
    fn test_read_headerless_block_is_attachment() {
        let eml = "Date: Sun, 29 Sep 2024 10:00:00 +0000\r\n\
                   Content-Type: multipart/mixed; boundary=b\r\n\
                   \r\n\
                   --b\r\n\
                   \r\n\
                   loose text\r\n";
        let (message, _) = read_collect(eml);
        assert_eq!(message.raw_data, None);
        assert_eq!(message.text, None);
        assert_eq!(message.attachments.len(), 1);
        assert_eq!(message.attachments[0].content_type, None);
        assert_eq!(message.attachments[0].data, b"loose text");
    }

    #[test]
    fn test_read_body_without_content_type_is_attachment() {
        let eml = "Date: Sun, 29 Sep 2024 10:00:00 +0000\r\n\
                   Subject: x\r\n\
                   \r\n\
                   hello";
        let (message, diagnostics) = read_collect(eml);
        assert_eq!(message.text, None);
        assert_eq!(message.attachments.len(), 1);
        let attachment = &message.attachments[0];
        assert_eq!(attachment.content_type, None);
        assert_eq!(attachment.name, None);
        assert!(!attachment.inline);
        assert_eq!(attachment.data, b"hello");
        assert_eq!(attachment.data64, "hello");
        assert_eq!(diagnostics, vec![Diagnostic::MissingContentType]);
    }

    #[test]
    fn test_read_pre_parsed() {
        let headers: HeaderMap = [
            ("Date", "Fri, 27 Sep 2024 13:00:00 +0000"),
            ("From", "sender@example.com"),
            ("Content-Type", "text/plain; charset=utf-8"),
        ]
        .into_iter()
        .collect();
        let part = ParsedPart::new(
            headers,
            Some(Body::Text("This is from a pre-parsed object.".into())),
        );
        let message = read_parsed(&part).unwrap();
        assert_eq!(
            message.from,
            Some(vec![EmailAddress::new("", "sender@example.com")])
        );
        assert_eq!(
            message.text.as_deref(),
            Some("This is from a pre-parsed object.")
        );
    }

    #[test]
    fn test_read_headers_only() {
        let eml = "Date: Sun, 29 Sep 2024 10:00:00 +0000\r\nContent-Type: text/plain\r\n\r\nbody";
        let options = ReadOptions::new().parse(ParseOptions::new().headers_only(true));
        let message = read(eml, &options).unwrap();
        assert_eq!(message.text, None);
        assert_eq!(message.headers.get("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn test_attachment_name_rfc2231() {
        let part = parse(
            "Content-Type: application/pdf\r\n\
             Content-Disposition: attachment;\r\n filename*0*=utf-8''r%C3%A9sum;\r\n filename*1*=%C3%A9.pdf\r\n\r\n",
            &ParseOptions::default(),
        );
        assert_eq!(attachment_name(&part.headers).as_deref(), Some("résumé.pdf"));
    }

    #[test]
    fn test_attachment_name_from_content_type() {
        let headers: HeaderMap = [("Content-type", "application/zip; name=\"archive.zip\"")]
            .into_iter()
            .collect();
        assert_eq!(attachment_name(&headers).as_deref(), Some("archive.zip"));
    }

    #[test]
    fn test_decode_if_base64() {
        assert_eq!(decode_if_base64("SGVsbG8=").as_deref(), Some("Hello"));
        assert_eq!(decode_if_base64("<p>Hello</p>"), None);
        assert_eq!(decode_if_base64("SGVsbG8"), None);
    }
}
