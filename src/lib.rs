//! factspan - Evidence-anchored fact documents from annotated transcripts
//!
//! A transcript is a sequence of speaker turns. Under each turn, dash-prefixed
//! lines attach facts using small commands:
//!
//! ```text
//! alice: the sky is blue today
//! - claim[sky](the sky's color)
//!   quote(sky is blue)
//!
//! bob: no, it looks grey to me
//! - claim(disagreement) quote(grey) redacts[sky]
//! ```
//!
//! Every fact's `quote` is located in the text, all located spans of an
//! utterance are cut into a chunk partition, and each fact's proof becomes
//! the list of chunk indices it covers.
//!
//! # Modules
//!
//! - `transcript`: Line classification and the line-at-a-time scanner
//! - `core`: Command interpretation, span resolution, pipeline, limits
//! - `evidence`: Quote location and chunk partitioning
//! - `domain`: Document types and errors
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Convert stdin to JSON on stdout
//! factspan < talk.txt
//!
//! # Validate and summarize
//! factspan check -i talk.txt
//!
//! # Show facts with their proof text
//! factspan show -i talk.txt
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod evidence;
pub mod transcript;

// Re-export main types at crate root for convenience
pub use crate::core::{convert, InputLimits, LimitViolation, Pipeline, PipelineError};
pub use domain::{Document, ErrorKind, Fact, FactRef, TranscriptError, Utterance};
pub use evidence::{Partition, Span};
