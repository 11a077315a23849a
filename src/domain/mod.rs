//! Domain types for factspan.
//!
//! This module contains:
//! - Document: resolved utterances, facts and fact references
//! - Error: the failure taxonomy shared by every stage

pub mod document;
pub mod error;

// Re-export commonly used types
pub use document::{Document, Fact, FactRef, Utterance};
pub use error::{ErrorKind, TranscriptError};
