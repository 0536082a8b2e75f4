//! Face-down pile with draw-from-top semantics.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::GameRng;

/// A pile whose top is the back of the vector.
///
/// Backed by `im::Vector` so cloning a game state shares the pile.
///
/// ```
/// use everdell_engine::zones::CardStack;
///
/// let mut pile = CardStack::from_items("Discard", vec![1, 2, 3]);
/// assert_eq!(pile.draw(), Some(3));
/// pile.add_to_top(9);
/// assert_eq!(pile.draw(), Some(9));
/// assert_eq!(pile.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStack<T: Clone> {
    name: String,
    cards: Vector<T>,
}

impl<T: Clone> CardStack<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), cards: Vector::new() }
    }

    pub fn from_items(name: impl Into<String>, items: Vec<T>) -> Self {
        Self { name: name.into(), cards: items.into_iter().collect() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn draw(&mut self) -> Option<T> {
        self.cards.pop_back()
    }

    pub fn add_to_top(&mut self, card: T) {
        self.cards.push_back(card);
    }

    pub fn add_to_bottom(&mut self, card: T) {
        self.cards.push_front(card);
    }

    /// Remove and return everything, top last.
    pub fn take_all(&mut self) -> Vec<T> {
        std::mem::take(&mut self.cards).into_iter().collect()
    }

    pub fn shuffle(&mut self, rng: &mut GameRng) {
        let mut items: Vec<T> = std::mem::take(&mut self.cards).into_iter().collect();
        rng.shuffle(&mut items);
        self.cards = items.into_iter().collect();
    }

    /// Read-only view, bottom first. Engine-private information.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cards.iter()
    }
}
