//! Human-readable views of a converted document.
//!
//! Provides:
//! - `render_summary`: counts and input digest (for `check`)
//! - `render_document`: each fact with the chunk text that proves it (for `show`)

use crate::domain::{Document, Fact, FactRef, Utterance};

/// Summary of a successful conversion
pub fn render_summary(document: &Document, digest: &str) -> String {
    format!(
        "OK\n  Utterances: {}\n  Facts:      {}\n  Chunks:     {}\n  Input:      {}\n",
        document.len(),
        document.fact_count(),
        document.chunk_count(),
        digest
    )
}

/// Full listing of utterances, chunks and facts
pub fn render_document(document: &Document) -> String {
    let mut lines = Vec::new();

    for (u, utterance) in document.utterances.iter().enumerate() {
        lines.push(format!("[{}] {}", u, utterance.speaker));
        for (c, chunk) in utterance.chunks.iter().enumerate() {
            lines.push(format!("  #{} {:?}", c, chunk));
        }

        for (f, fact) in utterance.facts.iter().enumerate() {
            lines.push(String::new());
            lines.push(format!("  Fact {}.{}", u, f));
            if let Some(claim) = &fact.claim {
                lines.push(format!("    Claim:   {}", claim));
            }
            if let Some(summary) = &fact.summary {
                lines.push(format!("    Summary: {}", summary));
            }
            lines.push(format!("    Proof:   {}", proof_text(utterance, fact)));
            lines.extend(ref_lines(document, "Redacts", &fact.redacts));
            lines.extend(ref_lines(document, "Inspired", &fact.inspiration));
        }
        lines.push(String::new());
    }

    lines.iter().map(|line| format!("{}\n", line)).collect()
}

/// Proof chunk text of a fact, joined with ellipses
fn proof_text(utterance: &Utterance, fact: &Fact) -> String {
    let pieces: Vec<String> = fact
        .proof
        .iter()
        .filter_map(|&i| utterance.chunks.get(i))
        .map(|chunk| format!("\"{}\"", chunk))
        .collect();

    if pieces.is_empty() {
        "(none)".to_string()
    } else {
        pieces.join(" ... ")
    }
}

fn ref_lines<'a>(
    document: &'a Document,
    label: &'a str,
    refs: &'a [FactRef],
) -> impl Iterator<Item = String> + 'a {
    refs.iter().map(move |r| {
        let claim = document
            .fact(*r)
            .and_then(|f| f.claim.as_deref())
            .unwrap_or("(no claim)");
        format!("    {}: {}.{} {}", label, r.utterance, r.fact, claim)
    })
}
