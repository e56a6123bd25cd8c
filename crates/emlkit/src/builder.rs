//! Serializes a [`SemanticMessage`] back into RFC 5322 text.

use crate::address::format_address_list;
use crate::boundary::{BoundaryGenerator, UuidBoundary};
use crate::content_type::get_boundary;
use crate::encoding::{PAYLOAD_LINE_WIDTH, encode_base64, wrap};
use crate::error::{Error, Result};
use crate::header::{CONTENT_TYPE, HeaderMap, fold};
use crate::message::SemanticMessage;
use crate::reader::{ReadOptions, read};

const EOL: &str = "\r\n";

/// Builder options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildOptions {
    /// Replay the saved text/HTML section headers instead of synthesizing
    /// a UTF-8 Content-Type line.
    pub encode: bool,
}

impl BuildOptions {
    /// Creates the default options.
    #[must_use]
    pub const fn new() -> Self {
        Self { encode: false }
    }

    /// Sets [`BuildOptions::encode`].
    #[must_use]
    pub const fn encode(mut self, encode: bool) -> Self {
        self.encode = encode;
        self
    }
}

/// Builds a message using random boundaries.
///
/// # Errors
///
/// Returns [`Error::Build`] if a header name is empty or contains whitespace
/// or a colon.
pub fn build(message: &SemanticMessage, options: &BuildOptions) -> Result<String> {
    build_with(message, options, &UuidBoundary)
}

/// Reads raw message text and builds it again.
///
/// # Errors
///
/// Fails if reading fails (see [`read`]) or building fails (see [`build`]).
pub fn rebuild(text: &str, read_options: &ReadOptions, options: &BuildOptions) -> Result<String> {
    let message = read(text, read_options)?;
    build(&message, options)
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push_str(EOL);
}

fn validate_header_names(headers: &HeaderMap) -> Result<()> {
    for (name, _) in headers.iter() {
        if name.is_empty() {
            return Err(Error::Build("header name is empty".into()));
        }
        if name.contains(|c: char| c.is_whitespace() || c == ':') {
            return Err(Error::Build(format!("invalid header name {name:?}")));
        }
    }
    Ok(())
}

/// Builds a message, drawing a boundary from `generator` when the headers
/// do not already carry one.
///
/// When the message has neither a boundary in its Content-Type nor a nested
/// alternative container, a `multipart/mixed` Content-Type with a fresh
/// boundary is written but the body sections are emitted without
/// delimiters.
///
/// The nested alternative container opens with the resolved outer boundary,
/// which may be the generated one.
///
/// # Errors
///
/// See [`build`].
pub fn build_with(
    message: &SemanticMessage,
    options: &BuildOptions,
    generator: &dyn BoundaryGenerator,
) -> Result<String> {
    let mut headers = message.headers.clone();
    if let Some(subject) = &message.subject {
        headers.set("Subject", subject.as_str());
    }
    for (name, addresses) in [("From", &message.from), ("To", &message.to), ("Cc", &message.cc)] {
        if let Some(addresses) = addresses {
            headers.set(name, format_address_list(addresses));
        }
    }

    let mut has_boundary = message.multipart_alternative.is_some();
    let multipart_boundary = message
        .multipart_alternative
        .as_deref()
        .and_then(get_boundary)
        .filter(|b| !b.is_empty());

    let existing = headers
        .probe(&CONTENT_TYPE)
        .and_then(get_boundary)
        .filter(|b| !b.is_empty());
    let boundary = if let Some(boundary) = existing {
        has_boundary = true;
        boundary
    } else {
        let generated = generator.next_boundary();
        let content_type = headers.get("Content-type").map_or_else(
            || format!("multipart/mixed;{EOL}boundary=\"{generated}\""),
            str::to_string,
        );
        headers.set("Content-Type", content_type);
        generated
    };

    validate_header_names(&headers)?;
    tracing::debug!(
        boundary = %boundary,
        has_boundary,
        attachments = message.attachments.len(),
        "building message"
    );

    let mut out = headers.to_string();

    if let Some(alternative) = &message.multipart_alternative {
        out.push_str(EOL);
        push_line(&mut out, &format!("--{boundary}"));
        push_line(&mut out, &format!("Content-Type: {}", fold(alternative)));
    }

    out.push_str(EOL);

    let sections = [
        (&message.text, &message.text_headers, "text/plain"),
        (&message.html, &message.html_headers, "text/html"),
    ];
    for (content, saved_headers, media_type) in sections {
        let Some(content) = content.as_deref().filter(|c| !c.is_empty()) else {
            continue;
        };
        match saved_headers.as_ref().filter(|_| options.encode) {
            Some(saved_headers) => {
                push_line(&mut out, &format!("--{boundary}"));
                out.push_str(&saved_headers.to_string());
            }
            None if has_boundary => {
                let delimiter = multipart_boundary.as_deref().unwrap_or(&boundary);
                push_line(&mut out, &format!("--{delimiter}"));
                push_line(&mut out, &format!("Content-Type: {media_type}; charset=\"utf-8\""));
            }
            None => {}
        }
        out.push_str(EOL);
        push_line(&mut out, content);
    }

    for (index, attachment) in message.attachments.iter().enumerate() {
        let content_type = attachment
            .content_type
            .as_deref()
            .filter(|ct| !ct.is_empty())
            .map_or_else(|| "application/octet-stream".to_string(), fold);
        let disposition = if attachment.inline { "inline" } else { "attachment" };
        let name = attachment
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("attachment_{}", index + 1));

        push_line(&mut out, &format!("--{boundary}"));
        push_line(&mut out, &format!("Content-Type: {content_type}"));
        push_line(&mut out, "Content-Transfer-Encoding: base64");
        push_line(
            &mut out,
            &format!("Content-Disposition: {disposition}; filename=\"{name}\""),
        );
        if let Some(id) = attachment
            .id
            .as_deref()
            .map(|id| id.trim().trim_start_matches('<').trim_end_matches('>'))
            .filter(|id| !id.is_empty())
        {
            push_line(&mut out, &format!("Content-ID: <{id}>"));
        }
        out.push_str(EOL);
        push_line(&mut out, &wrap(&encode_base64(&attachment.data), PAYLOAD_LINE_WIDTH));
        out.push_str(EOL);
    }

    if has_boundary {
        push_line(&mut out, &format!("--{boundary}--"));
    }

    Ok(out)
}
