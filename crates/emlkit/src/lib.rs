//! # emlkit
//!
//! Parse, read and build RFC 5322 / MIME email messages.
//!
//! ## Features
//!
//! - **Parsing**: headers and arbitrarily nested multipart bodies into a
//!   [`ParsedPart`] tree, tolerant of the malformations common in real mail
//! - **Reading**: reduce a message to a [`SemanticMessage`] with decoded
//!   subject, addresses, text, HTML and attachments
//! - **Building**: serialize a [`SemanticMessage`] back into message text
//! - **Encodings**: RFC 2047 encoded-words, quoted-printable, Base64 and
//!   legacy charsets
//!
//! Anomalies that do not stop processing are reported as [`Diagnostic`]s.
//! The plain entry points log them with `tracing`; the `_with` variants take
//! any [`DiagnosticSink`].
//!
//! ## Quick Start
//!
//! ### Reading a message
//!
//! ```
//! use emlkit::{ReadOptions, read};
//!
//! let eml = "Date: Mon, 23 Sep 2024 10:00:00 +0000\r\n\
//!            From: \"Sender\" <sender@example.com>\r\n\
//!            Subject: =?UTF-8?Q?Caf=C3=A9?=\r\n\
//!            Content-Type: text/plain; charset=utf-8\r\n\
//!            \r\n\
//!            Hello, World!\r\n";
//!
//! let message = read(eml, &ReadOptions::default())?;
//! assert_eq!(message.subject.as_deref(), Some("Café"));
//! assert_eq!(message.text.as_deref(), Some("Hello, World!"));
//! # Ok::<(), emlkit::Error>(())
//! ```
//!
//! ### Parsing structure only
//!
//! ```
//! use emlkit::{ParseOptions, parse};
//!
//! let eml = "Content-Type: multipart/mixed; boundary=\"b\"\r\n\
//!            \r\n\
//!            --b\r\n\
//!            Content-Type: text/plain\r\n\
//!            \r\n\
//!            one\r\n\
//!            --b\r\n\
//!            Content-Type: text/plain\r\n\
//!            \r\n\
//!            two\r\n\
//!            --b--\r\n";
//!
//! let part = parse(eml, &ParseOptions::default());
//! assert_eq!(part.parts().len(), 2);
//! ```
//!
//! ### Building a message
//!
//! ```
//! use emlkit::{Attachment, BuildOptions, SemanticMessage, build};
//!
//! let mut message = SemanticMessage::new("Mon, 23 Sep 2024 10:00:00 +0000");
//! message.headers.append("Content-Type", "multipart/mixed; boundary=\"mixed\"");
//! message.subject = Some("Report".into());
//! message.text = Some("See attached.".into());
//! message.attachments.push(Attachment::new(b"a,b\n1,2\n".to_vec()).with_name("report.csv"));
//!
//! let eml = build(&message, &BuildOptions::default())?;
//! assert!(eml.contains("Content-Disposition: attachment; filename=\"report.csv\""));
//! assert!(eml.ends_with("--mixed--\r\n"));
//! # Ok::<(), emlkit::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod builder;
mod content_type;
mod diagnostics;
mod error;
mod header;
mod message;
mod parser;
mod reader;

pub mod boundary;
pub mod charset;
pub mod decoder;
pub mod encoding;

pub use address::{EmailAddress, format_address_list, parse_address_list};
pub use builder::{BuildOptions, build, build_with, rebuild};
pub use content_type::{get_boundary, get_charset, get_charset_name, is_multipart};
pub use diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
pub use error::{Error, Result};
pub use header::{HeaderMap, HeaderValue};
pub use message::{Attachment, SemanticMessage, TransferEncoding};
pub use parser::{Body, BoundaryBlock, ParseOptions, ParsedPart, parse, parse_with};
pub use reader::{ReadOptions, read, read_parsed, read_parsed_with, read_with};
