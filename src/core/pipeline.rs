//! End-to-end conversion.
//!
//! Raw text is case-folded, scanned line by line, interpreted utterance by
//! utterance and finally resolved. Any failure aborts the whole run.

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, instrument};

use super::interpreter::Interpreter;
use super::safety::{InputLimits, LimitViolation};
use crate::domain::{Document, TranscriptError};
use crate::transcript::scan_transcript;

/// Failure of a limited pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    #[error(transparent)]
    Limit(#[from] LimitViolation),
}

/// Conversion with input limits
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    limits: InputLimits,
}

impl Pipeline {
    pub fn new(limits: InputLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &InputLimits {
        &self.limits
    }

    /// Convert `input`, enforcing the configured limits
    #[instrument(skip_all, fields(bytes = input.len()))]
    pub fn run(&self, input: &str) -> Result<Document, PipelineError> {
        self.limits.validate_input(input)?;
        run_stages(input, |count| {
            self.limits
                .check_utterances(count)
                .map_err(PipelineError::from)
        })
    }
}

/// Convert a transcript into a resolved document
#[instrument(skip_all, fields(bytes = input.len()))]
pub fn convert(input: &str) -> Result<Document, TranscriptError> {
    run_stages(input, |_| Ok(()))
}

/// Scan, interpret and resolve. `admit` sees the utterance count before each
/// new utterance is interpreted.
fn run_stages<E>(input: &str, mut admit: impl FnMut(usize) -> Result<(), E>) -> Result<Document, E>
where
    E: From<TranscriptError>,
{
    let text = input.to_lowercase();
    let mut interpreter = Interpreter::new();

    let lines = scan_transcript(&text, |utterance| -> Result<(), E> {
        admit(interpreter.len() + 1)?;
        interpreter.interpret(utterance)?;
        Ok(())
    })?;

    let document = interpreter.finish()?;
    info!(
        lines,
        utterances = document.len(),
        facts = document.fact_count(),
        chunks = document.chunk_count(),
        "Transcript converted"
    );
    Ok(document)
}

/// SHA256 digest of the raw input, as "sha256:<hex>"
pub fn hash_input(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_case_folds() {
        let doc = convert("ALICE: The Sky\n- Claim(Blue) QUOTE(sky)\n").unwrap();
        let u = &doc.utterances[0];
        assert_eq!(u.speaker, "alice");
        assert_eq!(u.facts[0].claim.as_deref(), Some("blue"));
        assert_eq!(u.chunks, vec!["the", "sky"]);
    }

    #[test]
    fn test_convert_empty_input() {
        assert!(convert("").unwrap().is_empty());
    }

    #[test]
    fn test_pipeline_input_limit() {
        let pipeline = Pipeline::new(InputLimits {
            max_input_bytes: 4,
            ..Default::default()
        });
        let err = pipeline.run("alice: hello").unwrap_err();
        assert_eq!(
            err,
            PipelineError::Limit(LimitViolation::MaxInputBytes {
                actual: 12,
                limit: 4
            })
        );
    }

    #[test]
    fn test_pipeline_utterance_limit() {
        let pipeline = Pipeline::new(InputLimits {
            max_utterances: 1,
            ..Default::default()
        });
        let input = "a: one\n- quote(one)\n\nb: two\n- quote(two)\n";
        let err = pipeline.run(input).unwrap_err();
        assert_eq!(
            err,
            PipelineError::Limit(LimitViolation::MaxUtterances {
                actual: 2,
                limit: 1
            })
        );
    }

    #[test]
    fn test_pipeline_passes_transcript_errors() {
        let err = Pipeline::default().run("no colon").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Transcript(TranscriptError::MissingColon { .. })
        ));
    }

    #[test]
    fn test_hash_input() {
        let hash = hash_input("hello");
        assert!(hash.starts_with("sha256:"));
        assert_eq!(hash.len(), 7 + 64);
        assert_eq!(hash, hash_input("hello"));
    }
}
