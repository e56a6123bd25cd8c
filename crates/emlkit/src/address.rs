//! Mailbox list parsing and formatting (RFC 5322 §3.4).

/// A mailbox: display name plus address.
///
/// # Examples
/// - `"Sender" <sender@example.com>` → name `Sender`, email `sender@example.com`
/// - `sender@example.com` → name empty, email `sender@example.com`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmailAddress {
    /// Display name (may be empty).
    pub name: String,
    /// Bare address (`user@domain`).
    pub email: String,
}

impl EmailAddress {
    /// Creates a mailbox.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Parses a single mailbox.
    ///
    /// Supported forms: `user@domain`, `<user@domain>`,
    /// `Name <user@domain>`, `"Last, First" <user@domain>` and
    /// `user@domain (Name)`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if let Some(open) = find_unquoted(trimmed, '<') {
            if let Some(close) = trimmed[open..].find('>') {
                let email = trimmed[open + 1..open + close].trim().to_string();
                let name = strip_quotes(&trimmed[..open]);
                return Self { name, email };
            }
        }

        if let Some(open) = find_unquoted(trimmed, '(') {
            if let Some(close) = trimmed.rfind(')').filter(|&close| close > open) {
                let email = trimmed[..open].trim().to_string();
                let name = strip_quotes(&trimmed[open + 1..close]);
                return Self { name, email };
            }
        }

        Self {
            name: String::new(),
            email: strip_quotes(trimmed),
        }
    }

    /// Formats as `"Name" <email>`, `<email>` or `"Name" `.
    ///
    /// Returns an empty string when both parts are empty.
    #[must_use]
    pub fn to_header(&self) -> String {
        let mut out = String::new();
        if !self.name.is_empty() {
            out.push('"');
            out.push_str(self.name.trim_start_matches('"').trim_end().trim_end_matches('"'));
            out.push_str("\" ");
        }
        if !self.email.is_empty() {
            out.push('<');
            out.push_str(&self.email);
            out.push('>');
        }
        out
    }
}

/// Byte offset of the first `needle` outside a quoted string.
fn find_unquoted(s: &str, needle: char) -> Option<usize> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (index, ch) in s.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            c if c == needle && !in_quotes => return Some(index),
            _ => {}
        }
    }
    None
}

/// Strips surrounding double quotes, unescapes quoted pairs and trims.
fn strip_quotes(s: &str) -> String {
    let trimmed = s.trim();
    let inner = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed);
    inner.replace("\\\"", "\"").trim().to_string()
}

/// Splits a header value into mailbox strings.
///
/// Commas inside quotes, angle brackets or comments do not split. Group
/// syntax (`Team: a@x, b@y;`) yields the group members.
fn split_mailboxes(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut angle_depth = 0usize;
    let mut comment_depth = 0usize;

    for ch in raw.chars() {
        if escaped {
            escaped = false;
            current.push(ch);
            continue;
        }
        match ch {
            '\\' if in_quotes => {
                escaped = true;
                current.push(ch);
            }
            '"' if comment_depth == 0 => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            '(' if !in_quotes => {
                comment_depth += 1;
                current.push(ch);
            }
            ')' if !in_quotes => {
                comment_depth = comment_depth.saturating_sub(1);
                current.push(ch);
            }
            '<' if !in_quotes && comment_depth == 0 => {
                angle_depth += 1;
                current.push(ch);
            }
            '>' if !in_quotes && comment_depth == 0 => {
                angle_depth = angle_depth.saturating_sub(1);
                current.push(ch);
            }
            ':' if !in_quotes && comment_depth == 0 && angle_depth == 0 => {
                // Group display name; its members follow.
                current.clear();
            }
            ',' | ';' if !in_quotes && comment_depth == 0 && angle_depth == 0 => {
                items.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    items.push(current);

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Parses a comma-separated mailbox list.
///
/// Entries without an address are dropped.
#[must_use]
pub fn parse_address_list(raw: &str) -> Vec<EmailAddress> {
    split_mailboxes(raw)
        .iter()
        .map(|item| EmailAddress::parse(item))
        .filter(|address| !address.email.is_empty())
        .collect()
}

/// Formats mailboxes as a header value, skipping empty entries.
#[must_use]
pub fn format_address_list(addresses: &[EmailAddress]) -> String {
    addresses
        .iter()
        .map(EmailAddress::to_header)
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
