//! Non-fatal anomalies found while parsing or reading a message.
//!
//! Real-world mail is frequently malformed. Instead of failing, the parser
//! and reader degrade to a best-effort interpretation and report what they
//! tolerated through a [`DiagnosticSink`]. The convenience entry points use
//! [`TracingSink`]; tests usually collect into a `Vec<Diagnostic>`.

use std::fmt;

/// A recoverable anomaly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A part has no `Content-Type` header.
    MissingContentType,
    /// A `multipart/*` content type without a usable boundary parameter.
    MultipartWithoutBoundary {
        /// The offending Content-Type value (line breaks flattened).
        content_type: String,
    },
    /// A boundary block whose part has no body.
    MissingPartBody {
        /// Marker text of the block.
        boundary: String,
    },
    /// A body that could not be transfer-decoded; the raw content was kept.
    UndecodableBody {
        /// Content-Transfer-Encoding of the body.
        encoding: String,
        /// Decoder error message.
        reason: String,
    },
    /// A folded header line that appeared before any header.
    OrphanContinuation {
        /// The ignored line.
        line: String,
    },
}

impl Diagnostic {
    /// Short machine-readable name of the anomaly.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingContentType => "missing_content_type",
            Self::MultipartWithoutBoundary { .. } => "multipart_without_boundary",
            Self::MissingPartBody { .. } => "missing_part_body",
            Self::UndecodableBody { .. } => "undecodable_body",
            Self::OrphanContinuation { .. } => "orphan_continuation",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingContentType => write!(f, "undefined Content-Type"),
            Self::MultipartWithoutBoundary { content_type } => {
                write!(f, "multipart without boundary: {content_type}")
            }
            Self::MissingPartBody { boundary } => {
                write!(f, "boundary block {boundary} has no body")
            }
            Self::UndecodableBody { encoding, reason } => {
                write!(f, "could not decode {encoding} body: {reason}")
            }
            Self::OrphanContinuation { line } => {
                write!(f, "continuation line without header: {line}")
            }
        }
    }
}

/// Receiver of [`Diagnostic`]s.
pub trait DiagnosticSink {
    /// Records one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Sink that forwards every diagnostic to `tracing` at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(kind = diagnostic.kind(), "{diagnostic}");
    }
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<F> DiagnosticSink for F
where
    F: FnMut(Diagnostic),
{
    fn report(&mut self, diagnostic: Diagnostic) {
        self(diagnostic);
    }
}
