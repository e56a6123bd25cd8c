//! Recursive-descent MIME parser.
//!
//! The message is split into lines once. Each nesting level runs the same
//! small state machine over a slice of those lines:
//!
//! ```text
//! Headers ──blank line──→ Body       (single part, rest of input is the body)
//!    │     └──────────────→ Multipart (boundary known, blocks are collected)
//!    └─ blank line followed by a Content-Type line: stay in Headers
//! ```
//!
//! Every multipart block is parsed by recursing into its own line slice, so
//! recursion depth equals multipart nesting depth.

use crate::content_type::{get_boundary, is_multipart};
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::header::{CONTENT_TYPE, HeaderMap};

/// Parser options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseOptions {
    /// Stop at the end of the top-level header block; the body is left absent.
    pub headers_only: bool,
}

impl ParseOptions {
    /// Creates the default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            headers_only: false,
        }
    }

    /// Sets [`ParseOptions::headers_only`].
    #[must_use]
    pub const fn headers_only(mut self, headers_only: bool) -> Self {
        self.headers_only = headers_only;
        self
    }
}

/// Body of a parsed part.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Body {
    /// Single-part body, lines joined with CRLF.
    Text(String),
    /// Multipart body, one block per boundary delimiter.
    Parts(Vec<BoundaryBlock>),
}

/// One child of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundaryBlock {
    /// Delimiter text that opened the block, without the leading `--`.
    pub boundary: String,
    /// The block, parsed recursively.
    pub part: ParsedPart,
}

/// Headers and body of a message or of one of its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedPart {
    /// Headers in document order.
    pub headers: HeaderMap,
    /// Body; absent in headers-only mode or when no body follows the headers.
    pub body: Option<Body>,
}

impl ParsedPart {
    /// Creates a part.
    #[must_use]
    pub const fn new(headers: HeaderMap, body: Option<Body>) -> Self {
        Self { headers, body }
    }

    /// Gets the Content-Type, probing both common spellings.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.probe(&CONTENT_TYPE)
    }

    /// Gets the body text of a single-part body.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            Some(Body::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Gets the blocks of a multipart body; empty for anything else.
    #[must_use]
    pub fn parts(&self) -> &[BoundaryBlock] {
        match &self.body {
            Some(Body::Parts(blocks)) => blocks,
            _ => &[],
        }
    }

    /// Checks whether the body was split into boundary blocks.
    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        matches!(self.body, Some(Body::Parts(_)))
    }
}

/// Parses a message, reporting anomalies through `tracing`.
#[must_use]
pub fn parse(text: &str, options: &ParseOptions) -> ParsedPart {
    parse_with(text, options, &mut TracingSink)
}

/// Parses a message, reporting anomalies to `sink`.
///
/// Lines may end in CRLF or LF. A final line terminator does not produce an
/// extra empty line.
pub fn parse_with(
    text: &str,
    options: &ParseOptions,
    sink: &mut dyn DiagnosticSink,
) -> ParsedPart {
    let lines: Vec<&str> = text.lines().collect();
    parse_lines(&lines, options, sink)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Headers,
    Body,
    Multipart,
}

/// Delimiter lines of one multipart level.
struct Delimiters {
    open: String,
    close: String,
}

impl Delimiters {
    fn new(boundary: &str) -> Self {
        Self {
            open: format!("--{boundary}"),
            close: format!("--{boundary}--"),
        }
    }
}

/// A block whose lines are still being collected.
struct OpenBlock<'a> {
    boundary: String,
    lines: Vec<&'a str>,
}

impl OpenBlock<'_> {
    fn complete(self, options: &ParseOptions, sink: &mut dyn DiagnosticSink) -> BoundaryBlock {
        tracing::debug!(boundary = %self.boundary, lines = self.lines.len(), "completing block");
        BoundaryBlock {
            part: parse_lines(&self.lines, options, sink),
            boundary: self.boundary,
        }
    }
}

/// Splits `Name: value`. Names are ASCII letters, digits, `_` and `-`.
fn split_header(line: &str) -> Option<(&str, &str)> {
    let name_len = line
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'-')
        .count();
    if name_len == 0 || line.as_bytes().get(name_len) != Some(&b':') {
        return None;
    }
    Some((&line[..name_len], line[name_len + 1..].trim_start()))
}

/// Checks whether the first non-blank line from `lines` is a Content-Type header.
fn content_type_follows(lines: &[&str]) -> bool {
    lines
        .iter()
        .map(|line| line.trim_start())
        .find(|line| !line.is_empty())
        .is_some_and(|line| CONTENT_TYPE.iter().any(|name| line.starts_with(name)))
}

fn parse_lines(lines: &[&str], options: &ParseOptions, sink: &mut dyn DiagnosticSink) -> ParsedPart {
    let mut headers = HeaderMap::new();
    let mut body = None;
    let mut state = State::Headers;
    let mut last_header: Option<&str> = None;
    let mut checked_for_content_type = false;
    let mut content_type_in_body = false;
    let mut delimiters: Option<Delimiters> = None;
    let mut blocks: Vec<BoundaryBlock> = Vec::new();
    let mut open: Option<OpenBlock<'_>> = None;

    for (index, &line) in lines.iter().enumerate() {
        match state {
            State::Headers => {
                if line.is_empty() {
                    if options.headers_only {
                        break;
                    }

                    state = match headers.probe(&CONTENT_TYPE) {
                        None => {
                            if !checked_for_content_type {
                                checked_for_content_type = true;
                                content_type_in_body = content_type_follows(&lines[index..]);
                                if !content_type_in_body {
                                    sink.report(Diagnostic::MissingContentType);
                                }
                            }
                            // Headers continue until the announced Content-Type shows up.
                            if content_type_in_body {
                                State::Headers
                            } else {
                                State::Body
                            }
                        }
                        Some(content_type) if is_multipart(content_type) => {
                            match get_boundary(content_type).filter(|b| !b.is_empty()) {
                                Some(boundary) => {
                                    delimiters = Some(Delimiters::new(&boundary));
                                    State::Multipart
                                }
                                None => {
                                    sink.report(Diagnostic::MultipartWithoutBoundary {
                                        content_type: content_type.replace("\r\n", " "),
                                    });
                                    State::Body
                                }
                            }
                        }
                        _ => State::Body,
                    };
                    continue;
                }

                if line.starts_with(char::is_whitespace) {
                    let continuation = line.trim_start();
                    if continuation.is_empty() {
                        continue;
                    }
                    match last_header {
                        Some(name) => {
                            headers.continue_last(name, continuation);
                        }
                        None => sink.report(Diagnostic::OrphanContinuation {
                            line: line.to_string(),
                        }),
                    }
                    continue;
                }

                if let Some((name, value)) = split_header(line) {
                    headers.append(name, value);
                    last_header = Some(name);
                }
            }
            State::Body => {
                body = Some(Body::Text(lines[index..].join("\r\n")));
                break;
            }
            State::Multipart => {
                let Some(delimiters) = delimiters.as_ref() else {
                    break;
                };

                if line.starts_with(&delimiters.open) && !line.starts_with(&delimiters.close) {
                    if let Some(block) = open.take() {
                        blocks.push(block.complete(options, sink));
                    }
                    open = Some(OpenBlock {
                        boundary: line[2..].to_string(),
                        lines: Vec::new(),
                    });
                    continue;
                }

                if line.starts_with(&delimiters.close) {
                    // Only a terminator after an empty line closes the block;
                    // a bare one is skipped and the block stays open.
                    if index > 0 && lines[index - 1].is_empty() {
                        if let Some(block) = open.take() {
                            blocks.push(block.complete(options, sink));
                        }
                    }
                    continue;
                }

                if let Some(block) = open.as_mut() {
                    block.lines.push(line);
                }
            }
        }
    }

    if state == State::Multipart {
        if let Some(block) = open.take() {
            blocks.push(block.complete(options, sink));
        }
        body = Some(Body::Parts(blocks));
    }

    ParsedPart { headers, body }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::needless_collect,
    clippy::similar_names
)]
mod tests {
    use super::*;
    use crate::header::HeaderValue;

    fn parse_collect(text: &str) -> (ParsedPart, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let part = parse_with(text, &ParseOptions::default(), &mut diagnostics);
        (part, diagnostics)
    }

    #[test]
    fn test_simple_message() {
        let eml = "Date: Mon, 23 Sep 2024 10:00:00 +0000\r\n\
                   From: \"Sender\" <sender@example.com>\r\n\
                   Subject: Test Email\r\n\
                   Content-Type: text/plain; charset=utf-8\r\n\
                   \r\n\
                   This is the body of the email.\r\n";
        let (part, diagnostics) = parse_collect(eml);
        assert_eq!(part.headers.get("From"), Some("\"Sender\" <sender@example.com>"));
        assert_eq!(part.headers.get("Subject"), Some("Test Email"));
        assert_eq!(part.text(), Some("This is the body of the email."));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_headers_only() {
        let eml = "From: sender@example.com\r\nSubject: Test\r\n\r\nBody content";
        let part = parse(eml, &ParseOptions::new().headers_only(true));
        assert_eq!(part.headers.get("Subject"), Some("Test"));
        assert_eq!(part.body, None);
    }

    #[test]
    fn test_folded_header() {
        let eml = "Subject: This is a very long subject\r\n   that continues\r\n\tand ends\r\nFrom: test@example.com\r\n\r\nBody";
        let (part, _) = parse_collect(eml);
        assert_eq!(
            part.headers.get("Subject"),
            Some("This is a very long subject\r\nthat continues\r\nand ends")
        );
        assert_eq!(part.headers.get("From"), Some("test@example.com"));
        assert_eq!(part.text(), Some("Body"));
    }

    #[test]
    fn test_repeated_headers() {
        let eml = "Received: from mailserver1\r\nReceived: from mailserver2\r\n folded\r\nFrom: test@example.com\r\n\r\nBody";
        let (part, _) = parse_collect(eml);
        assert_eq!(
            part.headers.value("Received"),
            Some(&HeaderValue::Multi(vec![
                "from mailserver1".into(),
                "from mailserver2\r\nfolded".into(),
            ]))
        );
    }

    #[test]
    fn test_lf_only_line_endings() {
        let eml = "Subject: LF\nContent-Type: text/plain\n\nline one\nline two\n";
        let (part, _) = parse_collect(eml);
        assert_eq!(part.text(), Some("line one\r\nline two"));
    }

    #[test]
    fn test_multipart_alternative() {
        let eml = "From: sender@example.com\r\n\
                   Content-Type: multipart/alternative; boundary=\"boundary_string\"\r\n\
                   \r\n\
                   --boundary_string\r\n\
                   Content-Type: text/plain; charset=utf-8\r\n\
                   \r\n\
                   This is the plain text part.\r\n\
                   --boundary_string\r\n\
                   Content-Type: text/html; charset=utf-8\r\n\
                   \r\n\
                   <p>This is the HTML part.</p>\r\n\
                   --boundary_string--\r\n";
        let (part, _) = parse_collect(eml);
        let blocks = part.parts();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].boundary, "boundary_string");
        assert_eq!(
            blocks[0].part.content_type(),
            Some("text/plain; charset=utf-8")
        );
        assert_eq!(blocks[0].part.text(), Some("This is the plain text part."));
        assert_eq!(blocks[1].boundary, "boundary_string");
        assert_eq!(blocks[1].part.text(), Some("<p>This is the HTML part.</p>"));
    }

    #[test]
    fn test_terminator_after_blank_line_closes_block() {
        let eml = "Content-Type: multipart/mixed; boundary=b\r\n\
                   \r\n\
                   preamble is ignored\r\n\
                   --b\r\n\
                   Content-Type: text/plain\r\n\
                   \r\n\
                   body\r\n\
                   \r\n\
                   --b--\r\n\
                   epilogue is ignored\r\n";
        let (part, _) = parse_collect(eml);
        let blocks = part.parts();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].part.text(), Some("body\r\n"));
    }

    #[test]
    fn test_bare_terminator_is_skipped() {
        let eml = "Content-Type: multipart/mixed; boundary=b\r\n\
                   \r\n\
                   --b\r\n\
                   Content-Type: text/plain\r\n\
                   \r\n\
                   body\r\n\
                   --b--\r\n\
                   trailing\r\n";
        let (part, _) = parse_collect(eml);
        let blocks = part.parts();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].part.text(), Some("body\r\ntrailing"));
    }

    #[test]
    fn test_nested_multipart() {
        let eml = "Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
                   \r\n\
                   --outer\r\n\
                   Content-Type: multipart/alternative; boundary=\"inner\"\r\n\
                   \r\n\
                   --inner\r\n\
                   Content-Type: text/plain; charset=utf-8\r\n\
                   \r\n\
                   Plain text part.\r\n\
                   --inner\r\n\
                   Content-Type: text/html; charset=utf-8\r\n\
                   \r\n\
                   <p>HTML part.</p>\r\n\
                   --inner--\r\n\
                   --outer\r\n\
                   Content-Type: application/octet-stream\r\n\
                   Content-Disposition: attachment; filename=\"dummy.pdf\"\r\n\
                   \r\n\
                   [Fake PDF Content]\r\n\
                   --outer--\r\n";
        let (part, _) = parse_collect(eml);
        let outer = part.parts();
        assert_eq!(outer.len(), 2);

        let inner = outer[0].part.parts();
        assert_eq!(inner.len(), 2);
        assert_eq!(inner[0].boundary, "inner");
        assert_eq!(inner[0].part.text(), Some("Plain text part."));
        assert_eq!(inner[1].part.text(), Some("<p>HTML part.</p>"));

        assert_eq!(outer[1].part.content_type(), Some("application/octet-stream"));
        assert_eq!(outer[1].part.text(), Some("[Fake PDF Content]"));
    }

    #[test]
    fn test_content_type_after_blank_line() {
        let eml = "From: sender@example.com\r\n\
                   Subject: Content-Type in Body Test\r\n\
                   \r\n\
                   Content-Type: text/plain; charset=utf-8\r\n\
                   \r\n\
                   This is the actual body content.\r\n";
        let (part, diagnostics) = parse_collect(eml);
        assert_eq!(part.content_type(), Some("text/plain; charset=utf-8"));
        assert_eq!(part.text(), Some("This is the actual body content."));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_content_type_after_several_blank_lines() {
        let eml = "Subject: x\r\n\
                   \r\n\
                   \r\n\
                   Content-Type: text/plain\r\n\
                   \r\n\
                   body";
        let (part, diagnostics) = parse_collect(eml);
        assert_eq!(part.content_type(), Some("text/plain"));
        assert_eq!(part.text(), Some("body"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_missing_content_type_is_reported() {
        let (part, diagnostics) = parse_collect("Subject: x\r\n\r\nhello\r\n");
        assert_eq!(part.text(), Some("hello"));
        assert_eq!(diagnostics, vec![Diagnostic::MissingContentType]);
    }

    #[test]
    fn test_multipart_without_boundary_degrades_to_text() {
        let (part, diagnostics) =
            parse_collect("Content-Type: multipart/mixed\r\n\r\n--x\r\nbody\r\n");
        assert_eq!(part.text(), Some("--x\r\nbody"));
        assert!(matches!(
            diagnostics.as_slice(),
            [Diagnostic::MultipartWithoutBoundary { .. }]
        ));
    }

    #[test]
    fn test_unterminated_block_is_completed() {
        let eml = "Content-Type: multipart/mixed; boundary=abc\r\n\r\n--abc\r\nContent-Type: text/plain\r\n\r\nlast";
        let (part, _) = parse_collect(eml);
        assert_eq!(part.parts().len(), 1);
        assert_eq!(part.parts()[0].part.text(), Some("last"));
    }

    #[test]
    fn test_invalid_header_lines_are_ignored() {
        let (part, _) = parse_collect("From: test@example.com\r\nThis is not a valid header line here");
        assert_eq!(part.headers.len(), 1);
        assert_eq!(part.body, None);
    }

    #[test]
    fn test_empty_input() {
        let (part, _) = parse_collect("");
        assert!(part.headers.is_empty());
        assert_eq!(part.body, None);
        assert!(!part.is_multipart());
    }

    #[test]
    fn test_split_header() {
        assert_eq!(split_header("X-Test_1: value"), Some(("X-Test_1", "value")));
        assert_eq!(split_header("Subject:nospace"), Some(("Subject", "nospace")));
        assert_eq!(split_header("Bad Name: value"), None);
        assert_eq!(split_header(": value"), None);
    }
}
