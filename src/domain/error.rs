//! Failure taxonomy for transcript conversion.
//!
//! Every error is fatal: a run either yields a complete document or one of
//! these values.

use serde::Serialize;
use thiserror::Error;

/// Broad class of a conversion failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The line structure of the transcript is malformed
    Structure,
    /// A command is unknown or misuses ids/arguments
    Validation,
    /// A quote or id could not be found in earlier content
    Lookup,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Structure => "structure",
            ErrorKind::Validation => "validation",
            ErrorKind::Lookup => "lookup",
        }
    }
}

/// Errors produced while parsing, interpreting or resolving a transcript
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptError {
    #[error("line {line}: expected a speaker header ending in ':', got {text:?}")]
    MissingColon { line: usize, text: String },

    #[error("line {line}: unknown predicate {predicate:?}")]
    UnknownPredicate { line: usize, predicate: String },

    #[error("line {line}: predicate {predicate:?} does not take an id (got [{id}])")]
    IdNotAllowed {
        line: usize,
        predicate: String,
        id: String,
    },

    #[error("line {line}: predicate {predicate:?} requires an id")]
    IdRequired { line: usize, predicate: String },

    #[error("line {line}: predicate {predicate:?} does not take an argument (got ({argument}))")]
    ArgumentNotAllowed {
        line: usize,
        predicate: String,
        argument: String,
    },

    #[error("line {line}: predicate {predicate:?} requires an argument")]
    ArgumentRequired { line: usize, predicate: String },

    #[error("line {line}: quote has no text to search for")]
    EmptyQuote { line: usize },

    #[error("utterance {utterance}, fact {fact}: no quote supplies a proof")]
    MissingProof { utterance: usize, fact: usize },

    #[error("line {line}: quote not found in any earlier utterance: {quote:?}")]
    QuoteNotFound { line: usize, quote: String },

    #[error("line {line}: no earlier fact declares id {id:?}")]
    ReferenceNotFound { line: usize, id: String },
}

impl TranscriptError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranscriptError::MissingColon { .. } => ErrorKind::Structure,
            TranscriptError::UnknownPredicate { .. }
            | TranscriptError::IdNotAllowed { .. }
            | TranscriptError::IdRequired { .. }
            | TranscriptError::ArgumentNotAllowed { .. }
            | TranscriptError::ArgumentRequired { .. }
            | TranscriptError::EmptyQuote { .. }
            | TranscriptError::MissingProof { .. } => ErrorKind::Validation,
            TranscriptError::QuoteNotFound { .. } | TranscriptError::ReferenceNotFound { .. } => {
                ErrorKind::Lookup
            }
        }
    }
}
