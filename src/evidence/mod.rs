//! Evidence spans and the chunk partition they induce
//!
//! Quotes are located in utterance text as exact, ordered parts. Every
//! located span is pooled on the utterance it was found in; once the whole
//! transcript is interpreted, the pool is cut into chunks and each fact's
//! spans become chunk indices.
//!
//! # Design Principles
//!
//! - **Exact only**: a quote either matches verbatim or the run fails.
//! - **Full containment**: a chunk counts as proof only if a span covers it
//!   entirely. Partial overlap never rounds up.
//! - **Lossless partition**: chunk bounds always concatenate back to the
//!   original text.
//!
//! # Example
//!
//! ```
//! use factspan::evidence::{find_parts, split_quote, Partition};
//!
//! let text = " the sky is blue today ";
//! let spans = find_parts(text, &split_quote("sky is blue")).unwrap();
//! let partition = Partition::new(text.len(), &spans);
//!
//! assert_eq!(partition.chunks(text), vec!["the", "sky is blue", "today"]);
//! assert_eq!(partition.proof_indices(&spans), vec![1]);
//! ```

pub mod partition;
pub mod spans;

pub use partition::Partition;
pub use spans::{collapse_whitespace, find_parts, split_quote, Span};
