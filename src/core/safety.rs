//! Input limits for transcript conversion.
//!
//! Bounds the work a single run may do:
//! - Input size, checked before parsing
//! - Utterance count, checked as utterances are emitted

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Limits applied to one conversion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLimits {
    /// Maximum input size in bytes (default: 10MB)
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: u64,

    /// Maximum number of utterances (default: 100000)
    #[serde(default = "default_max_utterances")]
    pub max_utterances: usize,
}

fn default_max_input_bytes() -> u64 {
    10 * 1024 * 1024
} // 10MB
fn default_max_utterances() -> usize {
    100_000
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
            max_utterances: default_max_utterances(),
        }
    }
}

impl InputLimits {
    /// Limits that never trigger
    pub fn unlimited() -> Self {
        Self {
            max_input_bytes: u64::MAX,
            max_utterances: usize::MAX,
        }
    }

    /// Validate input size
    pub fn validate_input(&self, input: &str) -> Result<(), LimitViolation> {
        let size = input.len() as u64;
        if size > self.max_input_bytes {
            return Err(LimitViolation::MaxInputBytes {
                actual: size,
                limit: self.max_input_bytes,
            });
        }
        Ok(())
    }

    /// Check that `count` utterances are still within bounds
    pub fn check_utterances(&self, count: usize) -> Result<(), LimitViolation> {
        if count > self.max_utterances {
            return Err(LimitViolation::MaxUtterances {
                actual: count,
                limit: self.max_utterances,
            });
        }
        Ok(())
    }
}

/// Types of limit violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitViolation {
    #[error("Maximum input bytes exceeded: {actual} > {limit}")]
    MaxInputBytes { actual: u64, limit: u64 },

    #[error("Maximum utterances exceeded: {actual} > {limit}")]
    MaxUtterances { actual: usize, limit: usize },
}
