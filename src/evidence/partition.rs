//! Chunk partition of an utterance's text.
//!
//! All evidence spans pooled for an utterance are cut into a contiguous,
//! non-overlapping sequence of chunks covering `[0, len)`. Proof spans are
//! then expressed as the indices of the chunks they fully contain.

use std::collections::BTreeSet;

use super::spans::Span;

/// Ordered, gap-free chunk boundaries for one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    bounds: Vec<Span>,
}

impl Partition {
    /// Build the partition of a text of length `len` from its evidence spans
    pub fn new(len: usize, evidence: &[Span]) -> Self {
        let mut points = BTreeSet::from([0, len]);
        for span in evidence {
            points.insert(span.start.min(len));
            points.insert(span.end.min(len));
        }
        let points: Vec<usize> = points.into_iter().collect();

        if points.len() < 2 {
            return Self {
                bounds: vec![Span::new(0, 0)],
            };
        }

        let mut bounds: Vec<Span> = Vec::with_capacity(points.len() - 1);
        for pair in points.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            if let Some(last) = bounds.last() {
                if last.end < start {
                    bounds.push(Span::new(last.end, start));
                }
            }
            bounds.push(Span::new(start, end));
        }

        Self { bounds }
    }

    /// Untrimmed `[start, end)` bounds of each chunk
    pub fn bounds(&self) -> &[Span] {
        &self.bounds
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Chunk values: each bounded substring with outer whitespace trimmed
    pub fn chunks(&self, text: &str) -> Vec<String> {
        self.bounds
            .iter()
            .map(|b| text.get(b.start..b.end).unwrap_or_default().trim().to_string())
            .collect()
    }

    /// Indices of chunks fully contained in any of `spans`, ascending and unique
    pub fn proof_indices(&self, spans: &[Span]) -> Vec<usize> {
        let mut indices = BTreeSet::new();
        for span in spans {
            for (index, bound) in self.bounds.iter().enumerate() {
                if span.contains(bound.start, bound.end) {
                    indices.insert(index);
                }
            }
        }
        indices.into_iter().collect()
    }
}
