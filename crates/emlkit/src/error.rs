//! Error types for message parsing, reading and building.

/// Result type alias for emlkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors surfaced by the read and build entry points.
///
/// Recoverable anomalies (missing boundaries, undecodable bodies) are not
/// errors; they are reported as [`Diagnostic`](crate::Diagnostic)s.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input does not have the shape the entry point expects.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A header required to interpret the message is absent.
    #[error("Required {0} header is missing")]
    MissingHeader(&'static str),

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// The message cannot be serialized.
    #[error("Build error: {0}")]
    Build(String),
}

impl Error {
    /// Returns true if the error was caused by a missing required header.
    #[must_use]
    pub const fn is_missing_header(&self) -> bool {
        matches!(self, Self::MissingHeader(_))
    }
}
