//! Line classification and command-token extraction.
//!
//! All functions here expect input that has already been case-folded.
//! Lines may still carry their trailing line terminator.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::TranscriptError;

/// `- <commands>` with optional leading whitespace
static FACT_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*-\s*(.*)$").expect("fact marker pattern is valid"));

/// `predicate [id]? (argument)?`, repeated along a line
static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<predicate>[^(\[]+)(?:\[(?P<id>[^\]]*)\])?\s*(?:\((?P<argument>[^)]*)\))?")
        .expect("command pattern is valid")
});

/// Shape of a single input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Only whitespace
    Blank,
    /// Starts a new fact; holds the text after the dash
    FactMarker(&'a str),
    /// Anything else (header, utterance text or continuation)
    Text(&'a str),
}

/// Classify a line by its shape
pub fn classify(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }

    match FACT_MARKER_RE.captures(line).and_then(|caps| caps.get(1)) {
        Some(rest) => LineKind::FactMarker(rest.as_str()),
        None => LineKind::Text(line),
    }
}

/// A parsed speaker header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Trimmed label before the colon
    pub speaker: String,
    /// Raw text after the colon (may be empty)
    pub text: String,
}

/// Parse a `<speaker>:<text>` header line.
///
/// The speaker prefix is greedy, so the split happens at the last colon.
pub fn parse_header(line: &str, line_no: usize) -> Result<Header, TranscriptError> {
    let colon = line
        .rfind(':')
        .ok_or_else(|| TranscriptError::MissingColon {
            line: line_no,
            text: line.trim_end().to_string(),
        })?;

    Ok(Header {
        speaker: line[..colon].trim().to_string(),
        text: line[colon + 1..].to_string(),
    })
}

/// One `predicate[id](argument)` token from a fact line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandToken {
    /// Predicate name, trimmed
    pub predicate: String,
    /// Bracketed id, trimmed
    pub id: Option<String>,
    /// Parenthesized argument, verbatim
    pub argument: Option<String>,
    /// 1-based input line the token came from
    pub line: usize,
}

/// Extract every command token from a fact or continuation line.
///
/// A line may carry zero, one or several tokens. Whitespace-only
/// predicate text (e.g. the trailing newline) yields nothing.
pub fn parse_commands(text: &str, line_no: usize) -> Vec<CommandToken> {
    COMMAND_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let predicate = caps.name("predicate")?.as_str().trim();
            if predicate.is_empty() {
                return None;
            }

            Some(CommandToken {
                predicate: predicate.to_string(),
                id: caps.name("id").map(|m| m.as_str().trim().to_string()),
                argument: caps.name("argument").map(|m| m.as_str().to_string()),
                line: line_no,
            })
        })
        .collect()
}
