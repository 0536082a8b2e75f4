//! City occupancy.
//!
//! A city holds at most `CITY_CAPACITY` occupied spaces. Space rules:
//! - Wanderer and Pirate take no space.
//! - Husband/Wife and Farm/Greenhouse are pairs: each pair shares one
//!   space, so a category costs `max(left, right)` spaces.
//! - A Messenger shares the space of the construction it is paired with and
//!   takes a full space once that construction is gone.
//!
//! Eligibility rules on top of the space count:
//! - Unique cards allow one copy.
//! - The Ruins needs a construction to replace.
//! - A Messenger needs a construction that has no Messenger yet.
//! - When full, the missing half of a pair, or a construction that can join
//!   an unpaired Messenger, still fits.
//! - In lenient mode a Crane lets a construction through and an Innkeeper a
//!   critter, since either will be discarded to make room.

use rustc_hash::FxHashMap;

use super::Player;
use crate::cards::{CardName, PlayedCard};
use crate::core::config::CITY_CAPACITY;
use crate::core::PlayedCardId;

impl Player {
    fn card_counts(&self) -> FxHashMap<CardName, usize> {
        let mut counts = FxHashMap::default();
        for card in &self.played_cards {
            *counts.entry(card.card_name).or_insert(0) += 1;
        }
        counts
    }

    fn messenger_is_paired(&self, messenger: &PlayedCard) -> bool {
        messenger
            .shares_space_with
            .and_then(|id| self.find_played_card(id))
            .is_some_and(|c| c.card_name.is_construction())
    }

    /// Occupied city spaces.
    #[must_use]
    pub fn occupied_spaces(&self) -> usize {
        self.city_spaces(false)
    }

    /// City size for scoring: every card counts, capped at the capacity.
    #[must_use]
    pub fn occupied_spaces_for_scoring(&self) -> usize {
        self.city_spaces(true)
    }

    fn city_spaces(&self, for_scoring: bool) -> usize {
        let counts = self.card_counts();
        let count = |c: CardName| counts.get(&c).copied().unwrap_or(0);
        let pair = |a: usize, b: usize| if for_scoring { a + b } else { a.max(b) };

        let mut spaces = pair(count(CardName::Husband), count(CardName::Wife))
            + pair(count(CardName::Farm), count(CardName::Greenhouse));

        for card in &self.played_cards {
            spaces += match card.card_name {
                CardName::Husband | CardName::Wife | CardName::Farm | CardName::Greenhouse => 0,
                c if c.is_spaceless() => 0,
                CardName::Messenger if self.messenger_is_paired(card) => 0,
                _ => 1,
            };
        }

        if for_scoring {
            spaces.min(CITY_CAPACITY)
        } else {
            spaces
        }
    }

    /// Constructions no Messenger is paired with.
    #[must_use]
    pub fn constructions_without_messenger(&self) -> Vec<PlayedCardId> {
        self.played_cards
            .iter()
            .filter(|c| c.card_name.is_construction())
            .filter(|c| {
                !self
                    .played_cards
                    .iter()
                    .any(|m| m.card_name == CardName::Messenger && m.shares_space_with == Some(c.id))
            })
            .map(|c| c.id)
            .collect()
    }

    #[must_use]
    pub fn has_unpaired_messenger(&self) -> bool {
        self.played_cards
            .iter()
            .any(|c| c.card_name == CardName::Messenger && !self.messenger_is_paired(c))
    }

    /// Whether `card` may join this city.
    ///
    /// `strict` applies the rule as it stands at the moment of placement;
    /// lenient mode also admits cards that a delegate discard will make room
    /// for.
    #[must_use]
    pub fn can_add_to_city(&self, card: CardName, strict: bool) -> bool {
        let def = card.definition();
        if def.is_unique && self.has_card_in_city(card) {
            return false;
        }

        match card {
            c if c.is_spaceless() => return true,
            CardName::Ruins => {
                return self.played_cards.iter().any(|c| c.card_name.is_construction());
            }
            CardName::Messenger => return !self.constructions_without_messenger().is_empty(),
            _ => {}
        }

        if self.occupied_spaces() < CITY_CAPACITY {
            return true;
        }

        let counts = self.card_counts();
        let count = |c: CardName| counts.get(&c).copied().unwrap_or(0);
        let completes_pair = match card {
            CardName::Husband => count(CardName::Wife) > count(CardName::Husband),
            CardName::Wife => count(CardName::Husband) > count(CardName::Wife),
            CardName::Farm => count(CardName::Greenhouse) > count(CardName::Farm),
            CardName::Greenhouse => count(CardName::Farm) > count(CardName::Greenhouse),
            _ => false,
        };
        if completes_pair {
            return true;
        }

        if def.is_construction() && self.has_unpaired_messenger() {
            return true;
        }

        if !strict {
            if def.is_construction() && self.has_card_in_city(CardName::Crane) {
                return true;
            }
            if def.is_critter && self.has_card_in_city(CardName::Innkeeper) {
                return true;
            }
        }

        false
    }

    /// Insert a record, pairing Messengers with constructions.
    pub(crate) fn insert_played_card(&mut self, mut card: PlayedCard) {
        if card.card_name == CardName::Messenger {
            card.shares_space_with = self.constructions_without_messenger().first().copied();
        } else if card.card_name.is_construction() {
            let lonely = self
                .played_cards
                .iter()
                .position(|c| c.card_name == CardName::Messenger && !self.messenger_is_paired(c));
            if let Some(idx) = lonely {
                self.played_cards[idx].shares_space_with = Some(card.id);
            }
        }
        self.played_cards.push(card);
    }

    /// Remove a record from the city. A Messenger left behind moves to
    /// another free construction if there is one.
    pub(crate) fn take_played_card(&mut self, id: PlayedCardId) -> Option<PlayedCard> {
        let idx = self.played_cards.iter().position(|c| c.id == id)?;
        let removed = self.played_cards.remove(idx);

        if removed.card_name.is_construction() {
            let free = self.constructions_without_messenger();
            let mut free = free.into_iter();
            for card in self.played_cards.iter_mut() {
                if card.card_name == CardName::Messenger && card.shares_space_with == Some(id) {
                    card.shares_space_with = free.next();
                }
            }
        }
        Some(removed)
    }
}
