//! Ordered header storage.
//!
//! Header names keep the spelling they were first seen with and lookups are
//! exact. Mail in the wild spells the same header several ways
//! (`Content-Type`, `Content-type`), so callers that care use
//! [`HeaderMap::probe`] with every casing they accept.

use std::fmt;

/// Content-Type spellings probed by the parser, reader and builder.
pub const CONTENT_TYPE: [&str; 2] = ["Content-Type", "Content-type"];

/// Content-Transfer-Encoding spellings.
pub const CONTENT_TRANSFER_ENCODING: [&str; 2] =
    ["Content-Transfer-Encoding", "Content-transfer-encoding"];

/// Content-Disposition spellings.
pub const CONTENT_DISPOSITION: [&str; 2] = ["Content-Disposition", "Content-disposition"];

/// Content-ID spellings.
pub const CONTENT_ID: [&str; 2] = ["Content-ID", "Content-Id"];

/// Value of a header that may occur more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum HeaderValue {
    /// The header occurred once.
    Single(String),
    /// The header occurred several times, in document order.
    Multi(Vec<String>),
}

impl HeaderValue {
    /// Returns the first value.
    #[must_use]
    pub fn first(&self) -> &str {
        match self {
            Self::Single(value) => value,
            Self::Multi(values) => values.first().map_or("", String::as_str),
        }
    }

    /// Returns every value in document order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            Self::Single(first) => {
                let first = std::mem::take(first);
                *self = Self::Multi(vec![first, value]);
            }
            Self::Multi(values) => values.push(value),
        }
    }

    fn last_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multi(values) => values.last_mut(),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

/// Ordered mapping from header name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct HeaderMap {
    entries: Vec<(String, HeaderValue)>,
}

impl HeaderMap {
    /// Creates a new empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key == name)
    }

    /// Adds a value. A repeated name turns the entry into a multi-value.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(index) => self.entries[index].1.push(value),
            None => self.entries.push((name, HeaderValue::Single(value))),
        }
    }

    /// Sets a header, replacing an existing entry in place or appending a
    /// new one at the end.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<HeaderValue>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(index) => self.entries[index].1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Appends a folded continuation to the most recent value of `name`.
    ///
    /// Returns false if the header does not exist.
    pub fn continue_last(&mut self, name: &str, continuation: &str) -> bool {
        let Some(index) = self.position(name) else {
            return false;
        };
        let Some(last) = self.entries[index].1.last_mut() else {
            return false;
        };
        last.push_str("\r\n");
        last.push_str(continuation);
        true
    }

    /// Gets the raw value of a header.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&HeaderValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Gets the first value of a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.value(name).map(HeaderValue::first)
    }

    /// Gets all values of a header.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.value(name).map(HeaderValue::values).unwrap_or_default()
    }

    /// Gets the first value of the first spelling that is present.
    #[must_use]
    pub fn probe(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.get(name))
    }

    /// Removes a header, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<HeaderValue> {
        self.position(name).map(|index| self.entries.remove(index).1)
    }

    /// Checks whether a header is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns the number of distinct header names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<N, V> FromIterator<(N, V)> for HeaderMap
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

/// Folds embedded line breaks into CRLF followed by two spaces.
#[must_use]
pub fn fold(value: &str) -> String {
    value.replace("\r\n", "\n").replace('\n', "\r\n  ")
}

impl fmt::Display for HeaderMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            for value in value.values() {
                write!(f, "{name}: {}\r\n", fold(value))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect
)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_new() {
        let headers = HeaderMap::new();
        assert!(headers.is_empty());
        assert_eq!(headers.len(), 0);
    }

    #[test]
    fn test_lookup_is_exact() {
        let mut headers = HeaderMap::new();
        headers.append("Content-type", "text/plain");
        assert_eq!(headers.get("Content-type"), Some("text/plain"));
        assert_eq!(headers.get("Content-Type"), None);
        assert_eq!(headers.probe(&CONTENT_TYPE), Some("text/plain"));
    }

    #[test]
    fn test_probe_prefers_first_spelling() {
        let headers: HeaderMap = [("Content-type", "b"), ("Content-Type", "a")]
            .into_iter()
            .collect();
        assert_eq!(headers.probe(&CONTENT_TYPE), Some("a"));
    }

    #[test]
    fn test_append_promotes_to_multi() {
        let mut headers = HeaderMap::new();
        headers.append("Received", "from one");
        assert_eq!(
            headers.value("Received"),
            Some(&HeaderValue::Single("from one".into()))
        );

        headers.append("Received", "from two");
        assert_eq!(headers.get_all("Received"), vec!["from one", "from two"]);
        assert_eq!(headers.get("Received"), Some("from one"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut headers = HeaderMap::new();
        headers.append("To", "alice@example.com");
        headers.append("Subject", "Hi");
        headers.set("To", "bob@example.com");
        headers.set("Cc", "carol@example.com");

        let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["To", "Subject", "Cc"]);
        assert_eq!(headers.get("To"), Some("bob@example.com"));
    }

    #[test]
    fn test_continue_last() {
        let mut headers = HeaderMap::new();
        headers.append("X-Trace", "first");
        headers.append("X-Trace", "second");
        assert!(headers.continue_last("X-Trace", "more"));
        assert_eq!(headers.get_all("X-Trace"), vec!["first", "second\r\nmore"]);
        assert!(!headers.continue_last("Missing", "more"));
    }

    #[test]
    fn test_remove() {
        let mut headers = HeaderMap::new();
        headers.append("Subject", "Test");
        assert!(headers.contains("Subject"));
        assert!(headers.remove("Subject").is_some());
        assert!(!headers.contains("Subject"));
    }

    #[test]
    fn test_display_folds_lines() {
        let mut headers = HeaderMap::new();
        headers.append("Subject", "first\r\nsecond");
        headers.append("Received", "a");
        headers.append("Received", "b");
        assert_eq!(
            headers.to_string(),
            "Subject: first\r\n  second\r\nReceived: a\r\nReceived: b\r\n"
        );
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold("a\nb"), "a\r\n  b");
        assert_eq!(fold("a\r\nb"), "a\r\n  b");
        assert_eq!(fold("plain"), "plain");
    }
}
