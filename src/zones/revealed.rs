//! Revealed-window stack.
//!
//! A fixed number of entries are face up; the rest pile is private.
//! `replace_at` never discards: the outgoing entry goes to the tail of the
//! rest pile and the head of the rest pile takes its place.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::GameRng;
use crate::error::{GameError, GameResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedStack<T: Clone> {
    revealed: Vec<Option<T>>,
    rest: Vector<T>,
}

impl<T: Clone + PartialEq> RevealedStack<T> {
    /// Shuffle `copies` of each definition and reveal `window` of them.
    pub fn build(definitions: &[T], copies: usize, window: usize, rng: &mut GameRng) -> Self {
        let mut all: Vec<T> = definitions
            .iter()
            .flat_map(|d| std::iter::repeat(d.clone()).take(copies))
            .collect();
        rng.shuffle(&mut all);
        let mut rest: Vector<T> = all.into_iter().collect();
        let revealed = (0..window).map(|_| rest.pop_front()).collect();
        Self { revealed, rest }
    }

    /// Build from explicit contents.
    #[must_use]
    pub fn from_parts(revealed: Vec<Option<T>>, rest: Vec<T>) -> Self {
        Self { revealed, rest: rest.into_iter().collect() }
    }

    #[must_use]
    pub fn revealed(&self) -> &[Option<T>] {
        &self.revealed
    }

    #[must_use]
    pub fn rest_len(&self) -> usize {
        self.rest.len()
    }

    /// The private rest pile, head first.
    pub fn rest(&self) -> impl Iterator<Item = &T> {
        self.rest.iter()
    }

    /// Pure read of a revealed slot.
    pub fn peek_at(&self, position: usize) -> GameResult<Option<&T>> {
        self.revealed
            .get(position)
            .map(Option::as_ref)
            .ok_or_else(|| GameError::invariant(format!("Invalid revealed position {position}")))
    }

    /// Rotate the entry at `position` out and the head of the rest pile in.
    ///
    /// Returns the entry that was replaced.
    pub fn replace_at(&mut self, position: usize) -> GameResult<Option<T>> {
        let slot = self
            .revealed
            .get_mut(position)
            .ok_or_else(|| GameError::invariant(format!("Invalid revealed position {position}")))?;
        let incoming = self.rest.pop_front();
        let outgoing = std::mem::replace(slot, incoming);
        if let Some(old) = &outgoing {
            self.rest.push_back(old.clone());
        }
        Ok(outgoing)
    }

    /// Take a revealed entry for good and refill the slot.
    pub fn take_at(&mut self, position: usize) -> GameResult<Option<T>> {
        let slot = self
            .revealed
            .get_mut(position)
            .ok_or_else(|| GameError::invariant(format!("Invalid revealed position {position}")))?;
        let incoming = self.rest.pop_front();
        Ok(std::mem::replace(slot, incoming))
    }

    /// Position of the first revealed entry equal to `item`.
    #[must_use]
    pub fn position_of(&self, item: &T) -> Option<usize> {
        self.revealed.iter().position(|r| r.as_ref() == Some(item))
    }
}
