//! Pending-input stack.
//!
//! Multi-step effects park their next decision here as a continuation
//! template. Entries resolve in LIFO order: only the top entry can be
//! answered. Pushes and pops happen inside `GameState::next`; outside code
//! can only read.

use serde::{Deserialize, Serialize};

use crate::core::GameInput;
use crate::error::{GameError, GameResult};

/// Engine-owned stack of continuation templates (last = top).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingInputStack {
    entries: Vec<GameInput>,
}

impl PendingInputStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The decision that must be answered next.
    #[must_use]
    pub fn top(&self) -> Option<&GameInput> {
        self.entries.last()
    }

    /// Entries bottom first.
    pub fn iter(&self) -> impl Iterator<Item = &GameInput> {
        self.entries.iter()
    }

    /// Park a decision. Only continuation templates are accepted, and their
    /// selection is cleared.
    pub(crate) fn push(&mut self, input: GameInput) -> GameResult<()> {
        if !input.is_continuation() {
            return Err(GameError::invariant(format!(
                "Only continuations can be pending, got {:?}",
                input.kind()
            )));
        }
        self.entries.push(input.without_selection());
        Ok(())
    }

    /// Pop the top entry if `answer` resolves it.
    ///
    /// The answer must be a continuation equal to the top template once its
    /// selection is cleared.
    pub(crate) fn pop_matching(&mut self, answer: &GameInput) -> GameResult<GameInput> {
        let top = self
            .entries
            .last()
            .ok_or_else(|| GameError::validation("No pending input to resolve"))?;
        if !answer.is_continuation() {
            return Err(GameError::validation(format!(
                "Must resolve pending input first: {}",
                top.prompt().map(|p| p.label.as_str()).unwrap_or_default()
            )));
        }
        if answer.context() != top.context() || answer.kind() != top.kind() {
            return Err(GameError::validation("Input does not match the pending decision"));
        }
        if &answer.without_selection() != top {
            return Err(GameError::validation("Input options do not match the pending decision"));
        }
        self.entries
            .pop()
            .ok_or_else(|| GameError::invariant("pending stack emptied while resolving"))
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
