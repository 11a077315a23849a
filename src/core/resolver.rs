//! Span resolution.
//!
//! Runs once after interpretation: every utterance's pooled evidence is cut
//! into chunks, then every fact's quote spans are mapped to chunk indices of
//! the utterance owning the fact.

use tracing::debug;

use super::interpreter::{FactBuilder, UtteranceBuilder};
use crate::domain::{Document, Fact, TranscriptError, Utterance};
use crate::evidence::Partition;

/// Finalize chunks and proofs for the whole document
pub(crate) fn resolve(utterances: Vec<UtteranceBuilder>) -> Result<Document, TranscriptError> {
    // Partitions first: a later quote may still add boundaries to an earlier utterance
    let partitions: Vec<Partition> = utterances
        .iter()
        .map(|u| Partition::new(u.text.len(), &u.evidence))
        .collect();

    let mut resolved = Vec::with_capacity(utterances.len());
    for (index, utterance) in utterances.into_iter().enumerate() {
        let facts = utterance
            .facts
            .into_iter()
            .enumerate()
            .map(|(f, fact)| resolve_fact(&partitions, index, f, fact))
            .collect::<Result<Vec<_>, _>>()?;

        let partition = &partitions[index];
        debug!(
            utterance = index,
            chunks = partition.len(),
            evidence = utterance.evidence.len(),
            "Utterance resolved"
        );

        resolved.push(Utterance {
            speaker: utterance.speaker,
            chunks: partition.chunks(&utterance.text),
            chunk_bounds: partition.bounds().to_vec(),
            original_text: utterance.text,
            facts,
        });
    }

    Ok(Document::new(resolved))
}

fn resolve_fact(
    partitions: &[Partition],
    owner: usize,
    index: usize,
    fact: FactBuilder,
) -> Result<Fact, TranscriptError> {
    let missing = || TranscriptError::MissingProof {
        utterance: owner,
        fact: index,
    };
    let quote = fact.proof.ok_or_else(missing)?;
    let partition = partitions.get(owner).ok_or_else(missing)?;
    if quote.utterance != owner {
        debug!(owner, quoted = quote.utterance, fact = index, "Cross-utterance quote");
    }

    Ok(Fact {
        internal_id: fact.internal_id,
        claim: fact.claim,
        summary: fact.summary,
        proof: partition.proof_indices(&quote.spans),
        redacts: fact.redacts,
        inspiration: fact.inspiration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interpreter::QuoteProof;
    use crate::evidence::Span;

    fn utterance(text: &str, evidence: Vec<Span>, facts: Vec<FactBuilder>) -> UtteranceBuilder {
        UtteranceBuilder {
            speaker: "alice".to_string(),
            text: text.to_string(),
            facts,
            evidence,
        }
    }

    fn quoted(utterance: usize, spans: Vec<Span>) -> FactBuilder {
        FactBuilder {
            proof: Some(QuoteProof { utterance, spans }),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_single_fact() {
        let span = Span::new(5, 17);
        let doc = resolve(vec![utterance(
            " the sky is blue today ",
            vec![span],
            vec![quoted(0, vec![span])],
        )])
        .unwrap();

        let u = &doc.utterances[0];
        assert_eq!(u.chunks, vec!["the", "sky is blue", "today"]);
        assert_eq!(u.facts[0].proof, vec![1]);
    }

    #[test]
    fn test_resolve_multi_part_proof() {
        let text = " a b c d e ";
        let spans = vec![Span::new(1, 3), Span::new(5, 7)];
        let doc = resolve(vec![utterance(
            text,
            spans.clone(),
            vec![quoted(0, spans)],
        )])
        .unwrap();

        let u = &doc.utterances[0];
        assert_eq!(u.chunks, vec!["", "a", "b", "c", "d e"]);
        assert_eq!(u.facts[0].proof, vec![1, 3]);
    }

    #[test]
    fn test_resolve_cross_utterance_proof_indexes_owner() {
        // "d" quoted from "a b c d" by the second utterance
        let span = Span::new(6, 7);
        let doc = resolve(vec![
            utterance("a b c d", vec![span], Vec::new()),
            utterance("x", Vec::new(), vec![quoted(0, vec![span])]),
        ])
        .unwrap();

        assert_eq!(doc.utterances[0].chunks, vec!["a b c", "d"]);
        assert_eq!(doc.utterances[1].chunks, vec!["x"]);

        let proof = &doc.utterances[1].facts[0].proof;
        assert!(proof.iter().all(|&i| i < doc.utterances[1].chunks.len()));
        assert!(proof.is_empty());
    }

    #[test]
    fn test_resolve_cross_utterance_proof_within_owner_bounds() {
        let span = Span::new(0, 4);
        let doc = resolve(vec![
            utterance("old news", vec![span], Vec::new()),
            utterance("ok", Vec::new(), vec![quoted(0, vec![span])]),
        ])
        .unwrap();

        assert_eq!(doc.utterances[0].chunks, vec!["old", "news"]);
        assert_eq!(doc.utterances[1].chunks, vec!["ok"]);
        assert_eq!(doc.utterances[1].facts[0].proof, vec![0]);
    }

    #[test]
    fn test_missing_proof_is_validation_error() {
        let err = resolve(vec![utterance(
            "text",
            Vec::new(),
            vec![FactBuilder::default()],
        )])
        .unwrap_err();

        assert_eq!(
            err,
            TranscriptError::MissingProof {
                utterance: 0,
                fact: 0
            }
        );
    }
}
