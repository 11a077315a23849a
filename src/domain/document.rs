//! Resolved document types.
//!
//! These are the values handed to the serializer. After resolution a
//! `Document` is immutable.

use serde::{Deserialize, Serialize};

use crate::evidence::Span;

/// Backward pointer to a fact: utterance index, then fact index within it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FactRef {
    pub utterance: usize,
    pub fact: usize,
}

impl FactRef {
    pub fn new(utterance: usize, fact: usize) -> Self {
        Self { utterance, fact }
    }
}

/// One evidence-backed claim attached to an utterance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    /// Id declared with `claim[id]`, used only for lookups
    #[serde(skip)]
    pub internal_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Ascending indices into the owning utterance's chunks
    pub proof: Vec<usize>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redacts: Vec<FactRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inspiration: Vec<FactRef>,
}

/// One speaker turn: its chunked text and its facts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: String,

    /// Whitespace-collapsed text the chunks partition
    #[serde(skip)]
    pub original_text: String,

    /// Untrimmed `[start, end)` of each chunk in `original_text`
    #[serde(skip)]
    pub chunk_bounds: Vec<Span>,

    pub chunks: Vec<String>,

    #[serde(default)]
    pub facts: Vec<Fact>,
}

impl Utterance {
    /// Untrimmed source text of chunk `index`
    pub fn chunk_source(&self, index: usize) -> Option<&str> {
        let bound = self.chunk_bounds.get(index)?;
        self.original_text.get(bound.start..bound.end)
    }
}

/// A fully resolved transcript
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub utterances: Vec<Utterance>,
}

impl Document {
    pub fn new(utterances: Vec<Utterance>) -> Self {
        Self { utterances }
    }

    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    pub fn fact_count(&self) -> usize {
        self.utterances.iter().map(|u| u.facts.len()).sum()
    }

    pub fn chunk_count(&self) -> usize {
        self.utterances.iter().map(|u| u.chunks.len()).sum()
    }

    /// Follow a `FactRef`
    pub fn fact(&self, at: FactRef) -> Option<&Fact> {
        self.utterances.get(at.utterance)?.facts.get(at.fact)
    }

    /// Encode as JSON
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Encode as YAML
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::new(vec![Utterance {
            speaker: "alice".to_string(),
            original_text: " the sky is blue today ".to_string(),
            chunk_bounds: vec![Span::new(0, 5), Span::new(5, 17), Span::new(17, 23)],
            chunks: vec!["the".into(), "sky is blue".into(), "today".into()],
            facts: vec![Fact {
                internal_id: Some("c1".to_string()),
                claim: Some("the sky's color".to_string()),
                proof: vec![1],
                ..Default::default()
            }],
        }])
    }

    #[test]
    fn test_json_omits_absent_fields() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json(false).unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!([{
                "speaker": "alice",
                "chunks": ["the", "sky is blue", "today"],
                "facts": [{"claim": "the sky's color", "proof": [1]}]
            }])
        );
    }

    #[test]
    fn test_json_fact_refs() {
        let fact = Fact {
            proof: vec![0],
            redacts: vec![FactRef::new(0, 1)],
            ..Default::default()
        };
        let json = serde_json::to_value(&fact).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"proof": [0], "redacts": [{"utterance": 0, "fact": 1}]})
        );
    }

    #[test]
    fn test_yaml_encoding() {
        let yaml = sample().to_yaml().unwrap();
        assert!(yaml.contains("speaker: alice"));
        assert!(yaml.contains("- sky is blue"));
    }

    #[test]
    fn test_lookup_helpers() {
        let doc = sample();
        assert_eq!(doc.fact_count(), 1);
        assert_eq!(doc.chunk_count(), 3);
        assert_eq!(doc.utterances[0].chunk_source(1), Some("sky is blue "));
        assert!(doc.fact(FactRef::new(0, 0)).is_some());
        assert!(doc.fact(FactRef::new(0, 1)).is_none());
    }
}
