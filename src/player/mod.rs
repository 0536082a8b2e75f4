//! Per-seat state.
//!
//! ## Layout
//!
//! - `mod.rs`: the `Player` record, hand and resource bookkeeping
//! - `city.rs`: city occupancy and `can_add_to_city`
//! - `payment.rs`: affordability and payment validation
//! - `workers.rs`: worker counts and card capacity
//!
//! A `Player` owns its played cards. Changes that need ids or other seats
//! (adding a card to a city, placing a worker on an opponent's card) go
//! through `GameState`.

pub mod city;
pub mod payment;
pub mod workers;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::board::{EventName, LocationName};
use crate::cards::{CardName, CardType, PlayedCard};
use crate::core::config::{HAND_LIMIT, STARTING_WORKERS};
use crate::core::{PlayedCardId, PlayerId, ResourceMap, ResourceType, Season, WorkerPlacement};
use crate::error::{GameError, GameResult};
use crate::expansions::{AdornmentName, VisitorName};

pub use payment::{is_paid_resources_valid, Discount};
pub(crate) use payment::any3_payment;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerStatus {
    #[default]
    DuringSeason,
    GameEnded,
}

/// Newleaf reservation token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservedCard {
    #[default]
    Unused,
    Reserved(CardName),
    Used,
}

/// A claimed event and whatever was placed on it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedEvent {
    pub stored_resources: ResourceMap,
    pub stored_cards: Vec<CardName>,
}

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub player_id: PlayerId,
    pub player_secret: String,

    pub cards_in_hand: Vec<CardName>,
    pub(crate) played_cards: Vec<PlayedCard>,
    pub resources: ResourceMap,

    pub current_season: Season,
    pub num_workers: u32,
    pub placed_workers: Vec<WorkerPlacement>,
    pub status: PlayerStatus,

    pub claimed_events: BTreeMap<EventName, ClaimedEvent>,
    pub adornments_in_hand: Vec<AdornmentName>,
    pub played_adornments: Vec<AdornmentName>,
    pub reserved_card: ReservedCard,
    pub num_golden_leaf: u32,
    pub claimed_visitors: Vec<VisitorName>,
}

impl Player {
    #[must_use]
    pub fn new(name: impl Into<String>, player_id: PlayerId, player_secret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            player_id,
            player_secret: player_secret.into(),
            cards_in_hand: Vec::new(),
            played_cards: Vec::new(),
            resources: ResourceMap::NONE,
            current_season: Season::Winter,
            num_workers: STARTING_WORKERS,
            placed_workers: Vec::new(),
            status: PlayerStatus::DuringSeason,
            claimed_events: BTreeMap::new(),
            adornments_in_hand: Vec::new(),
            played_adornments: Vec::new(),
            reserved_card: ReservedCard::Unused,
            num_golden_leaf: 0,
            claimed_visitors: Vec::new(),
        }
    }

    // === City lookup ===

    /// Cards in the city, in the order they were played.
    #[must_use]
    pub fn played_cards(&self) -> &[PlayedCard] {
        &self.played_cards
    }

    #[must_use]
    pub fn has_card_in_city(&self, card: CardName) -> bool {
        self.played_cards.iter().any(|c| c.card_name == card)
    }

    pub fn played_cards_named(&self, card: CardName) -> impl Iterator<Item = &PlayedCard> {
        self.played_cards.iter().filter(move |c| c.card_name == card)
    }

    #[must_use]
    pub fn find_played_card(&self, id: PlayedCardId) -> Option<&PlayedCard> {
        self.played_cards.iter().find(|c| c.id == id)
    }

    pub fn find_played_card_mut(&mut self, id: PlayedCardId) -> Option<&mut PlayedCard> {
        self.played_cards.iter_mut().find(|c| c.id == id)
    }

    /// First played copy of a card.
    #[must_use]
    pub fn first_played(&self, card: CardName) -> Option<&PlayedCard> {
        self.played_cards.iter().find(|c| c.card_name == card)
    }

    #[must_use]
    pub fn count_card(&self, card: CardName) -> usize {
        self.played_cards_named(card).count()
    }

    #[must_use]
    pub fn count_cards_by_type(&self, card_type: CardType) -> usize {
        self.played_cards
            .iter()
            .filter(|c| c.card_name.card_type() == card_type)
            .count()
    }

    /// Count played cards matching a predicate on the card name.
    pub fn count_where(&self, pred: impl Fn(CardName) -> bool) -> usize {
        self.played_cards.iter().filter(|c| pred(c.card_name)).count()
    }

    // === Hand ===

    #[must_use]
    pub fn num_cards_in_hand(&self) -> usize {
        self.cards_in_hand.len()
    }

    /// Room left under the hand limit.
    #[must_use]
    pub fn hand_space(&self) -> usize {
        HAND_LIMIT.saturating_sub(self.cards_in_hand.len())
    }

    pub fn add_card_to_hand(&mut self, card: CardName) {
        self.cards_in_hand.push(card);
    }

    pub fn remove_card_from_hand(&mut self, card: CardName) -> GameResult<()> {
        let idx = self
            .cards_in_hand
            .iter()
            .position(|&c| c == card)
            .ok_or_else(|| GameError::validation(format!("Unable to find {card} in hand")))?;
        self.cards_in_hand.remove(idx);
        Ok(())
    }

    // === Resources ===

    pub fn gain_resources(&mut self, resources: ResourceMap) {
        self.resources += resources;
    }

    pub fn spend_resources(&mut self, resources: ResourceMap) -> GameResult<()> {
        self.resources = self
            .resources
            .checked_sub(&resources)
            .ok_or_else(|| GameError::validation("Insufficient resources"))?;
        Ok(())
    }

    /// Count of a resource, optionally including resources stored on played
    /// cards and claimed events.
    #[must_use]
    pub fn get_num_resources_by_type(&self, resource: ResourceType, include_stored: bool) -> u32 {
        let mut total = self.resources.get(resource);
        if include_stored {
            total += self.played_cards.iter().map(|c| c.resources.get(resource)).sum::<u32>();
            total += self
                .claimed_events
                .values()
                .map(|e| e.stored_resources.get(resource))
                .sum::<u32>();
        }
        total
    }

    // === Progress ===

    #[must_use]
    pub fn has_ended(&self) -> bool {
        self.status == PlayerStatus::GameEnded
    }

    #[must_use]
    pub fn is_on_journey(&self, location: LocationName) -> bool {
        self.placed_workers.contains(&WorkerPlacement::Location(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new("Ada", PlayerId::new(0), "secret")
    }

    #[test]
    fn test_new_player_defaults() {
        let p = player();
        assert_eq!(p.num_workers, 2);
        assert_eq!(p.current_season, Season::Winter);
        assert_eq!(p.reserved_card, ReservedCard::Unused);
        assert!(p.played_cards().is_empty());
    }

    #[test]
    fn test_spend_resources() {
        let mut p = player();
        p.gain_resources(ResourceMap::new(2, 1, 0, 0));
        assert!(p.spend_resources(ResourceMap::new(1, 1, 0, 0)).is_ok());
        assert_eq!(p.resources, ResourceMap::new(1, 0, 0, 0));

        let err = p.spend_resources(ResourceMap::new(0, 0, 0, 1)).unwrap_err();
        assert!(err.reason().contains("Insufficient"));
        assert_eq!(p.resources, ResourceMap::new(1, 0, 0, 0));
    }

    #[test]
    fn test_hand() {
        let mut p = player();
        p.add_card_to_hand(CardName::Farm);
        p.add_card_to_hand(CardName::Farm);
        assert_eq!(p.hand_space(), 6);
        assert!(p.remove_card_from_hand(CardName::Farm).is_ok());
        assert_eq!(p.num_cards_in_hand(), 1);
        assert!(p.remove_card_from_hand(CardName::Mine).is_err());
    }
}
