//! Transcript parsing.
//!
//! Turns raw, case-folded transcript text into `RawUtterance` records:
//! a speaker, the collapsed utterance text and the command tokens of each
//! fact, in document order.

pub mod lines;
pub mod machine;

pub use lines::{classify, parse_commands, parse_header, CommandToken, Header, LineKind};
pub use machine::{parse_transcript, scan_transcript, RawFact, RawUtterance, TranscriptMachine};
