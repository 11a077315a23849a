//! Line-at-a-time transcript scanner.
//!
//! `TranscriptMachine::feed` takes one line and yields at most one completed
//! utterance. `finish` flushes whatever is still open at end of input.

use tracing::debug;

use super::lines::{classify, parse_commands, parse_header, CommandToken, LineKind};
use crate::domain::TranscriptError;
use crate::evidence::collapse_whitespace;

/// Predicates a fact holds at most one of
const SINGLE_VALUED: [&str; 3] = ["claim", "summary", "quote"];

/// A fact as written: the command tokens gathered from its lines.
///
/// A marker line extends the previous fact while that fact has no `quote`
/// and the line sets no claim or summary the fact already has. Otherwise
/// it starts a new fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFact {
    /// Line of the first fact marker
    pub line: usize,
    pub commands: Vec<CommandToken>,
}

impl RawFact {
    /// Whether any command of this fact is a quote
    pub fn has_quote(&self) -> bool {
        self.sets("quote")
    }

    /// Whether a following marker line's commands can extend this fact
    pub fn accepts(&self, commands: &[CommandToken]) -> bool {
        !self.has_quote()
            && commands.iter().all(|c| {
                !SINGLE_VALUED.contains(&c.predicate.as_str()) || !self.sets(&c.predicate)
            })
    }

    fn sets(&self, predicate: &str) -> bool {
        self.commands.iter().any(|c| c.predicate == predicate)
    }
}

/// A completed speaker turn before interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUtterance {
    pub speaker: String,
    /// Utterance text, whitespace-collapsed
    pub text: String,
    /// Line of the speaker header
    pub line: usize,
    pub facts: Vec<RawFact>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingPlayer,
    AccumulatingUtterance,
    AccumulatingFacts,
}

/// Finite-state scanner over transcript lines
#[derive(Debug)]
pub struct TranscriptMachine {
    state: State,
    line_no: usize,
    current: Option<RawUtterance>,
}

impl Default for TranscriptMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptMachine {
    pub fn new() -> Self {
        Self {
            state: State::AwaitingPlayer,
            line_no: 0,
            current: None,
        }
    }

    /// Number of lines consumed so far
    pub fn lines_read(&self) -> usize {
        self.line_no
    }

    /// Consume one line, returning an utterance if this line completed one
    pub fn feed(&mut self, line: &str) -> Result<Option<RawUtterance>, TranscriptError> {
        self.line_no += 1;
        let line_no = self.line_no;

        match self.state {
            State::AwaitingPlayer => {
                if classify(line) == LineKind::Blank {
                    return Ok(None);
                }

                let header = parse_header(line, line_no)?;
                self.current = Some(RawUtterance {
                    speaker: header.speaker,
                    text: header.text,
                    line: line_no,
                    facts: Vec::new(),
                });
                self.state = State::AccumulatingUtterance;
                Ok(None)
            }
            State::AccumulatingUtterance => {
                let Some(current) = self.current.as_mut() else {
                    self.state = State::AwaitingPlayer;
                    return Ok(None);
                };

                match classify(line) {
                    LineKind::FactMarker(rest) => {
                        current.text = collapse_whitespace(&current.text);
                        current.facts.push(RawFact {
                            line: line_no,
                            commands: parse_commands(rest, line_no),
                        });
                        self.state = State::AccumulatingFacts;
                    }
                    LineKind::Blank | LineKind::Text(_) => current.text.push_str(line),
                }
                Ok(None)
            }
            State::AccumulatingFacts => {
                let Some(current) = self.current.as_mut() else {
                    self.state = State::AwaitingPlayer;
                    return Ok(None);
                };

                match classify(line) {
                    LineKind::Blank => {
                        self.state = State::AwaitingPlayer;
                        Ok(self.emit())
                    }
                    LineKind::FactMarker(rest) => {
                        let commands = parse_commands(rest, line_no);
                        match current.facts.last_mut().filter(|fact| fact.accepts(&commands)) {
                            Some(open) => open.commands.extend(commands),
                            None => current.facts.push(RawFact {
                                line: line_no,
                                commands,
                            }),
                        }
                        Ok(None)
                    }
                    LineKind::Text(text) => {
                        let commands = parse_commands(text, line_no);
                        if let Some(fact) = current.facts.last_mut() {
                            fact.commands.extend(commands);
                        }
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Flush the utterance still open at end of input, if it has text
    pub fn finish(mut self) -> Option<RawUtterance> {
        match self.state {
            State::AwaitingPlayer => None,
            State::AccumulatingUtterance => {
                let current = self.current.as_mut()?;
                if current.text.is_empty() {
                    return None;
                }
                current.text = collapse_whitespace(&current.text);
                self.emit()
            }
            State::AccumulatingFacts => {
                if self.current.as_ref()?.text.is_empty() {
                    return None;
                }
                self.emit()
            }
        }
    }

    fn emit(&mut self) -> Option<RawUtterance> {
        let utterance = self.current.take()?;
        debug!(
            speaker = %utterance.speaker,
            line = utterance.line,
            facts = utterance.facts.len(),
            "Utterance parsed"
        );
        Some(utterance)
    }
}

/// Scan a whole (already case-folded) transcript, handing each completed
/// utterance to `sink` in document order. Returns the number of lines read.
pub fn scan_transcript<E, F>(text: &str, mut sink: F) -> Result<usize, E>
where
    E: From<TranscriptError>,
    F: FnMut(RawUtterance) -> Result<(), E>,
{
    let mut machine = TranscriptMachine::new();

    for line in text.split_inclusive('\n') {
        if let Some(utterance) = machine.feed(line)? {
            sink(utterance)?;
        }
    }

    let lines = machine.lines_read();
    if let Some(utterance) = machine.finish() {
        sink(utterance)?;
    }

    Ok(lines)
}

/// Scan a whole (already case-folded) transcript into utterances
pub fn parse_transcript(text: &str) -> Result<Vec<RawUtterance>, TranscriptError> {
    let mut utterances = Vec::new();
    scan_transcript(text, |utterance| -> Result<(), TranscriptError> {
        utterances.push(utterance);
        Ok(())
    })?;
    Ok(utterances)
}
