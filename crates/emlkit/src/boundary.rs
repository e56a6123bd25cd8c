//! MIME boundary generation.
//!
//! The builder asks a [`BoundaryGenerator`] for fresh boundaries so tests can
//! substitute a deterministic source.
//!
//! # Example
//!
//! ```
//! use emlkit::boundary::{BoundaryGenerator, SequentialBoundary};
//!
//! let generator = SequentialBoundary::new("test");
//! assert_eq!(generator.next_boundary(), "----=test0001");
//! assert_eq!(generator.next_boundary(), "----=test0002");
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use uuid::Uuid;

/// Prefix of every generated boundary.
pub const BOUNDARY_PREFIX: &str = "----=";

/// Source of boundary strings.
///
/// Implementations must not repeat a value within one build and must only
/// produce characters that are legal in a quoted boundary parameter.
pub trait BoundaryGenerator {
    /// Returns a new boundary.
    fn next_boundary(&self) -> String;
}

/// Random boundaries backed by v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidBoundary;

impl BoundaryGenerator for UuidBoundary {
    fn next_boundary(&self) -> String {
        format!("{BOUNDARY_PREFIX}{}", Uuid::new_v4().simple())
    }
}

/// Predictable boundaries in the format `----=<prefix>0001`, `----=<prefix>0002`, ...
#[derive(Debug)]
pub struct SequentialBoundary {
    counter: AtomicU32,
    prefix: String,
}

impl SequentialBoundary {
    /// Creates a generator with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            counter: AtomicU32::new(0),
            prefix: prefix.into(),
        }
    }
}

impl BoundaryGenerator for SequentialBoundary {
    fn next_boundary(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        format!("{BOUNDARY_PREFIX}{}{n:04}", self.prefix)
    }
}

/// Creates a random boundary.
#[must_use]
pub fn create_boundary() -> String {
    UuidBoundary.next_boundary()
}
