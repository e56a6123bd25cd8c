//! Semantic message model produced by the reader and consumed by the builder.

use crate::address::EmailAddress;
use crate::header::HeaderMap;
use chrono::{DateTime, FixedOffset};
use std::fmt;

/// Content-Transfer-Encoding of a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferEncoding {
    /// 7-bit ASCII, also assumed when the header is absent.
    #[default]
    SevenBit,
    /// 8-bit text (`8bit` and anything starting with it).
    EightBit,
    /// Binary (`binary` and anything starting with it).
    Binary,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Unrecognized token.
    Other,
}

impl TransferEncoding {
    /// Parses a Content-Transfer-Encoding value, ignoring case.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let token = s.trim().to_ascii_lowercase();
        match token.as_str() {
            "" | "7bit" => Self::SevenBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            t if t.starts_with("8bit") => Self::EightBit,
            t if t.starts_with("binary") => Self::Binary,
            _ => Self::Other,
        }
    }

    /// Checks whether the body carries raw bytes that need charset decoding.
    #[must_use]
    pub const fn is_eight_bit(self) -> bool {
        matches!(self, Self::EightBit | Self::Binary)
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SevenBit => write!(f, "7bit"),
            Self::EightBit => write!(f, "8bit"),
            Self::Binary => write!(f, "binary"),
            Self::Base64 => write!(f, "base64"),
            Self::QuotedPrintable => write!(f, "quoted-printable"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A non-body part of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Attachment {
    /// Content-ID, as written in the header.
    pub id: Option<String>,
    /// File name from the `name`/`filename` parameters.
    pub name: Option<String>,
    /// Content-Type, verbatim.
    pub content_type: Option<String>,
    /// Disposition is `inline`.
    pub inline: bool,
    /// Transfer-decoded bytes.
    pub data: Vec<u8>,
    /// `data` decoded as text under the part's charset.
    pub data64: String,
}

impl Attachment {
    /// Creates an attachment from raw bytes.
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    /// Sets the file name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// A message reduced to what mail clients display.
///
/// Text and HTML from several parts accumulate in document order instead of
/// overwriting each other.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SemanticMessage {
    /// Raw `Date` header value.
    pub date: String,
    /// Decoded subject.
    #[cfg_attr(feature = "serde", serde(default))]
    pub subject: Option<String>,
    /// Decoded `From` mailboxes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub from: Option<Vec<EmailAddress>>,
    /// Decoded `To` mailboxes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub to: Option<Vec<EmailAddress>>,
    /// Decoded `Cc` mailboxes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cc: Option<Vec<EmailAddress>>,
    /// Top-level headers.
    #[cfg_attr(feature = "serde", serde(default))]
    pub headers: HeaderMap,
    /// Plain-text body.
    #[cfg_attr(feature = "serde", serde(default))]
    pub text: Option<String>,
    /// HTML body.
    #[cfg_attr(feature = "serde", serde(default))]
    pub html: Option<String>,
    /// Content-Type and Content-Transfer-Encoding of the text part.
    #[cfg_attr(feature = "serde", serde(default))]
    pub text_headers: Option<HeaderMap>,
    /// Content-Type and Content-Transfer-Encoding of the HTML part.
    #[cfg_attr(feature = "serde", serde(default))]
    pub html_headers: Option<HeaderMap>,
    /// Content-Type of the first nested multipart container.
    #[cfg_attr(feature = "serde", serde(default))]
    pub multipart_alternative: Option<String>,
    /// Attachments in document order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attachments: Vec<Attachment>,
    /// Loose data that belongs to no part. The reader never fills it: every
    /// block, with or without headers, is classified as a part.
    #[cfg_attr(feature = "serde", serde(default))]
    pub raw_data: Option<String>,
}

impl SemanticMessage {
    /// Creates an empty message with the given `Date` value.
    #[must_use]
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            subject: None,
            from: None,
            to: None,
            cc: None,
            headers: HeaderMap::new(),
            text: None,
            html: None,
            text_headers: None,
            html_headers: None,
            multipart_alternative: None,
            attachments: Vec::new(),
            raw_data: None,
        }
    }

    /// Parses [`SemanticMessage::date`] as RFC 2822, then RFC 3339.
    #[must_use]
    pub fn date_time(&self) -> Option<DateTime<FixedOffset>> {
        let date = self.date.trim();
        DateTime::parse_from_rfc2822(date)
            .or_else(|_| DateTime::parse_from_rfc3339(date))
            .ok()
    }

    pub(crate) fn append_text(&mut self, text: &str) {
        self.text.get_or_insert_with(String::new).push_str(text);
    }

    pub(crate) fn append_html(&mut self, html: &str) {
        self.html.get_or_insert_with(String::new).push_str(html);
    }
}
