//! Core conversion logic.
//!
//! This module contains:
//! - Interpreter: dispatches fact commands and performs backward lookups
//! - Resolver: turns pooled evidence into chunks and proofs
//! - Pipeline: end-to-end conversion
//! - Safety: input limits

pub mod interpreter;
pub mod pipeline;
pub(crate) mod resolver;
pub mod safety;

// Re-export commonly used types
pub use interpreter::{Interpreter, Predicate};
pub use pipeline::{convert, hash_input, Pipeline, PipelineError};
pub use safety::{InputLimits, LimitViolation};
