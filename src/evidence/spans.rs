//! Quote location within utterance text.
//!
//! # Matching rules
//!
//! - **Exact match only**: parts are located by plain substring search
//! - **Ordered parts**: a quote split on `...` must match part by part,
//!   each part searched only after the end of the previous match
//! - **Trailing whitespace**: a match followed by one whitespace character
//!   absorbs it, so chunk boundaries fall after the separating space
//! - Offsets are UTF-8 byte indices into the collapsed utterance text

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static ELLIPSIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\.\.\.\s*").expect("ellipsis pattern is valid"));

/// Half-open `[start, end)` range into an utterance's text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Whether `[start, end)` lies entirely inside this span
    pub fn contains(&self, start: usize, end: usize) -> bool {
        start >= self.start && end <= self.end
    }
}

/// Collapse every run of whitespace into a single space.
///
/// Leading and trailing runs are kept (as one space each).
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").into_owned()
}

/// Split a quote argument on `...` into its ordered, non-empty parts
pub fn split_quote(argument: &str) -> Vec<&str> {
    ELLIPSIS_RE
        .split(argument)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Locate all `parts`, in order, within `text`.
///
/// Returns `None` unless every part matches.
pub fn find_parts(text: &str, parts: &[&str]) -> Option<Vec<Span>> {
    let mut spans = Vec::with_capacity(parts.len());
    let mut cursor = 0;

    for part in parts {
        let start = cursor + text[cursor..].find(part)?;
        let mut end = start + part.len();
        cursor = end;

        if let Some(next) = text[end..].chars().next() {
            if next.is_whitespace() {
                end += next.len_utf8();
            }
        }

        spans.push(Span::new(start, end));
    }

    Some(spans)
}
