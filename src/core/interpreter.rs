//! Command interpretation.
//!
//! Utterances are interpreted in document order. Each one is appended to the
//! document-so-far before its own facts are interpreted, so lookups from
//! fact `k` see every earlier utterance plus facts `0..k` of the current one.
//! A fact only becomes visible to lookups once all of its commands ran.

use tracing::debug;

use super::resolver;
use crate::domain::{Document, FactRef, TranscriptError};
use crate::evidence::{find_parts, split_quote, Span};
use crate::transcript::{CommandToken, RawUtterance};

/// Predicates understood in fact lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Claim,
    Quote,
    Summary,
    Redacts,
    Inspiration,
}

impl Predicate {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "claim" => Some(Predicate::Claim),
            "quote" => Some(Predicate::Quote),
            "summary" => Some(Predicate::Summary),
            "redacts" => Some(Predicate::Redacts),
            "inspiration" => Some(Predicate::Inspiration),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Predicate::Claim => "claim",
            Predicate::Quote => "quote",
            Predicate::Summary => "summary",
            Predicate::Redacts => "redacts",
            Predicate::Inspiration => "inspiration",
        }
    }
}

/// Raw proof of a fact: the utterance its quote matched and the spans there
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QuoteProof {
    pub(crate) utterance: usize,
    pub(crate) spans: Vec<Span>,
}

/// Fact under construction
#[derive(Debug, Clone, Default)]
pub(crate) struct FactBuilder {
    pub(crate) internal_id: Option<String>,
    pub(crate) claim: Option<String>,
    pub(crate) summary: Option<String>,
    pub(crate) proof: Option<QuoteProof>,
    pub(crate) redacts: Vec<FactRef>,
    pub(crate) inspiration: Vec<FactRef>,
}

/// Utterance under construction, with its pooled evidence spans
#[derive(Debug, Clone, Default)]
pub(crate) struct UtteranceBuilder {
    pub(crate) speaker: String,
    pub(crate) text: String,
    pub(crate) facts: Vec<FactBuilder>,
    /// Spans located in this utterance by any fact's quote
    pub(crate) evidence: Vec<Span>,
}

/// Interprets parsed utterances into an unresolved document
#[derive(Debug, Default)]
pub struct Interpreter {
    utterances: Vec<UtteranceBuilder>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of utterances interpreted so far
    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    /// Append an utterance and interpret its facts in order
    pub fn interpret(&mut self, raw: RawUtterance) -> Result<(), TranscriptError> {
        self.utterances.push(UtteranceBuilder {
            speaker: raw.speaker,
            text: raw.text,
            facts: Vec::new(),
            evidence: Vec::new(),
        });
        let current = self.utterances.len() - 1;

        for raw_fact in &raw.facts {
            let mut fact = FactBuilder::default();
            for command in &raw_fact.commands {
                self.apply(&mut fact, command)?;
            }
            self.utterances[current].facts.push(fact);
        }

        Ok(())
    }

    /// Resolve spans into chunks and produce the final document
    pub fn finish(self) -> Result<Document, TranscriptError> {
        resolver::resolve(self.utterances)
    }

    fn apply(&mut self, fact: &mut FactBuilder, command: &CommandToken) -> Result<(), TranscriptError> {
        let predicate =
            Predicate::parse(&command.predicate).ok_or_else(|| TranscriptError::UnknownPredicate {
                line: command.line,
                predicate: command.predicate.clone(),
            })?;

        match predicate {
            Predicate::Claim => {
                let argument = require_argument(predicate, command)?;
                if let Some(id) = &command.id {
                    fact.internal_id = Some(id.clone());
                }
                fact.claim = Some(argument.to_string());
            }
            Predicate::Quote => {
                forbid_id(predicate, command)?;
                let argument = require_argument(predicate, command)?;
                fact.proof = Some(self.resolve_quote(argument, command.line)?);
            }
            Predicate::Summary => {
                forbid_id(predicate, command)?;
                let argument = require_argument(predicate, command)?;
                fact.summary = Some(argument.to_string());
            }
            Predicate::Redacts => {
                let id = require_id(predicate, command)?;
                forbid_argument(predicate, command)?;
                fact.redacts.push(self.lookup_reference(id, command.line)?);
            }
            Predicate::Inspiration => {
                let id = require_id(predicate, command)?;
                forbid_argument(predicate, command)?;
                fact.inspiration.push(self.lookup_reference(id, command.line)?);
            }
        }

        Ok(())
    }

    /// Find the latest utterance containing every quote part, in order, and
    /// pool the located spans on it
    fn resolve_quote(&mut self, quote: &str, line: usize) -> Result<QuoteProof, TranscriptError> {
        let parts = split_quote(quote);
        if parts.is_empty() {
            return Err(TranscriptError::EmptyQuote { line });
        }

        for (index, utterance) in self.utterances.iter_mut().enumerate().rev() {
            if let Some(spans) = find_parts(&utterance.text, &parts) {
                debug!(utterance = index, parts = parts.len(), "Quote resolved");
                utterance.evidence.extend(spans.iter().copied());
                return Ok(QuoteProof {
                    utterance: index,
                    spans,
                });
            }
        }

        Err(TranscriptError::QuoteNotFound {
            line,
            quote: quote.to_string(),
        })
    }

    /// Find the most recent fact declaring `id`
    fn lookup_reference(&self, id: &str, line: usize) -> Result<FactRef, TranscriptError> {
        for (u, utterance) in self.utterances.iter().enumerate().rev() {
            for (f, fact) in utterance.facts.iter().enumerate().rev() {
                if fact.internal_id.as_deref() == Some(id) {
                    debug!(id, utterance = u, fact = f, "Reference resolved");
                    return Ok(FactRef::new(u, f));
                }
            }
        }

        Err(TranscriptError::ReferenceNotFound {
            line,
            id: id.to_string(),
        })
    }
}

fn require_argument(predicate: Predicate, command: &CommandToken) -> Result<&str, TranscriptError> {
    command
        .argument
        .as_deref()
        .ok_or_else(|| TranscriptError::ArgumentRequired {
            line: command.line,
            predicate: predicate.as_str().to_string(),
        })
}

fn forbid_argument(predicate: Predicate, command: &CommandToken) -> Result<(), TranscriptError> {
    match &command.argument {
        Some(argument) => Err(TranscriptError::ArgumentNotAllowed {
            line: command.line,
            predicate: predicate.as_str().to_string(),
            argument: argument.clone(),
        }),
        None => Ok(()),
    }
}

fn require_id(predicate: Predicate, command: &CommandToken) -> Result<&str, TranscriptError> {
    command
        .id
        .as_deref()
        .ok_or_else(|| TranscriptError::IdRequired {
            line: command.line,
            predicate: predicate.as_str().to_string(),
        })
}

fn forbid_id(predicate: Predicate, command: &CommandToken) -> Result<(), TranscriptError> {
    match &command.id {
        Some(id) => Err(TranscriptError::IdNotAllowed {
            line: command.line,
            predicate: predicate.as_str().to_string(),
            id: id.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::parse_transcript;

    fn interpret(input: &str) -> Result<Interpreter, TranscriptError> {
        let mut interpreter = Interpreter::new();
        for raw in parse_transcript(input)? {
            interpreter.interpret(raw)?;
        }
        Ok(interpreter)
    }

    #[test]
    fn test_claim_quote_summary() {
        let interpreter =
            interpret("alice: the sky is blue\n- claim[c](sky) quote(sky) summary(short)\n").unwrap();

        let fact = &interpreter.utterances[0].facts[0];
        assert_eq!(fact.internal_id.as_deref(), Some("c"));
        assert_eq!(fact.claim.as_deref(), Some("sky"));
        assert_eq!(fact.summary.as_deref(), Some("short"));
        let proof = fact.proof.as_ref().unwrap();
        assert_eq!(proof.utterance, 0);
        assert_eq!(proof.spans, vec![Span::new(5, 9)]);
        assert_eq!(interpreter.utterances[0].evidence, vec![Span::new(5, 9)]);
    }

    #[test]
    fn test_second_quote_overwrites_but_both_pool() {
        let interpreter = interpret("alice: red green blue\n- quote(red) quote(blue)\n").unwrap();

        let proof = interpreter.utterances[0].facts[0].proof.as_ref().unwrap();
        assert_eq!(proof.spans, vec![Span::new(11, 16)]);
        assert_eq!(interpreter.utterances[0].evidence.len(), 2);
    }

    #[test]
    fn test_quote_prefers_latest_utterance() {
        let input = "alice: same words\n- quote(same)\n\nbob: same words\n- quote(same)\n";
        let interpreter = interpret(input).unwrap();

        assert_eq!(interpreter.utterances[1].facts[0].proof.as_ref().unwrap().utterance, 1);
        assert_eq!(interpreter.utterances[0].evidence.len(), 1);
        assert_eq!(interpreter.utterances[1].evidence.len(), 1);
    }

    #[test]
    fn test_quote_falls_back_to_earlier_utterance() {
        let input = "alice: only here\n- quote(only)\n\nbob: elsewhere\n- quote(only here)\n";
        let interpreter = interpret(input).unwrap();

        let proof = interpreter.utterances[1].facts[0].proof.as_ref().unwrap();
        assert_eq!(proof.utterance, 0);
        assert_eq!(interpreter.utterances[0].evidence.len(), 2);
        assert!(interpreter.utterances[1].evidence.is_empty());
    }

    #[test]
    fn test_quote_not_found() {
        let err = interpret("alice: hello\n- quote(goodbye)\n").unwrap_err();
        assert_eq!(
            err,
            TranscriptError::QuoteNotFound {
                line: 2,
                quote: "goodbye".to_string()
            }
        );
    }

    #[test]
    fn test_reference_within_same_utterance() {
        let input = "alice: a b\n- claim[x](a) quote(a)\n- redacts[x] quote(b)\n";
        let interpreter = interpret(input).unwrap();
        assert_eq!(interpreter.utterances[0].facts[1].redacts, vec![FactRef::new(0, 0)]);
    }

    #[test]
    fn test_reference_shadowing() {
        let input = "alice: a b\n- claim[x](a) quote(a)\n- claim[x](b) quote(b)\n- inspiration[x] quote(a)\n";
        let interpreter = interpret(input).unwrap();
        assert_eq!(
            interpreter.utterances[0].facts[2].inspiration,
            vec![FactRef::new(0, 1)]
        );
    }

    #[test]
    fn test_no_self_reference() {
        let err = interpret("alice: a\n- claim[x](a) redacts[x] quote(a)\n").unwrap_err();
        assert_eq!(
            err,
            TranscriptError::ReferenceNotFound {
                line: 2,
                id: "x".to_string()
            }
        );
    }

    #[test]
    fn test_validation_errors() {
        let err = interpret("a: t\n- frobnicate(t)\n").unwrap_err();
        assert!(matches!(err, TranscriptError::UnknownPredicate { .. }));

        let err = interpret("a: t\n- quote[q](t)\n").unwrap_err();
        assert!(matches!(err, TranscriptError::IdNotAllowed { .. }));

        let err = interpret("a: t\n- summary[s](t)\n").unwrap_err();
        assert!(matches!(err, TranscriptError::IdNotAllowed { .. }));

        let err = interpret("a: t\n- claim[c](t) quote(t)\n- redacts(c)\n").unwrap_err();
        assert!(matches!(err, TranscriptError::IdRequired { .. }));

        let err = interpret("a: t\n- claim[c](t) quote(t)\n- inspiration[c](extra)\n").unwrap_err();
        assert!(matches!(err, TranscriptError::ArgumentNotAllowed { .. }));

        let err = interpret("a: t\n- claim\n").unwrap_err();
        assert!(matches!(err, TranscriptError::ArgumentRequired { .. }));

        let err = interpret("a: t\n- quote( ... )\n").unwrap_err();
        assert_eq!(err, TranscriptError::EmptyQuote { line: 2 });
    }

    #[test]
    fn test_predicate_parse() {
        assert_eq!(Predicate::parse("claim"), Some(Predicate::Claim));
        assert_eq!(Predicate::parse("inspiration"), Some(Predicate::Inspiration));
        assert_eq!(Predicate::parse("quotes"), None);
        assert_eq!(Predicate::Redacts.as_str(), "redacts");
    }
}
