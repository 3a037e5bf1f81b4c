//! In-memory conversation transcript.

use std::fmt;

/// One recorded utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    Human(String),
    Assistant(String),
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Turn::Human(text) => write!(f, "Human: {}", text),
            Turn::Assistant(text) => write!(f, "Assistant: {}", text),
        }
    }
}

/// Ordered transcript, oldest turn first.
///
/// Turns are only ever added as a human/assistant pair. With a limit set,
/// the oldest pairs are dropped once more than `limit` pairs are stored.
#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    turns: Vec<Turn>,
    limit: Option<usize>,
}

impl ChatHistory {
    /// Empty, unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty history keeping at most `limit` exchanges (None = unbounded).
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            turns: Vec::new(),
            limit,
        }
    }

    /// Append one exchange.
    pub fn record_exchange(&mut self, human: impl Into<String>, assistant: impl Into<String>) {
        self.turns.push(Turn::Human(human.into()));
        self.turns.push(Turn::Assistant(assistant.into()));

        if let Some(limit) = self.limit {
            let max_turns = limit.saturating_mul(2);
            if self.turns.len() > max_turns {
                let excess = self.turns.len() - max_turns;
                self.turns.drain(..excess);
            }
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
