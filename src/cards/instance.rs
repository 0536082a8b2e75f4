//! Played-card records - runtime card state in a city.
//!
//! A `PlayedCard` is owned by the player whose city holds it. Effects that
//! need to change one locate it by `PlayedCardRef` through the player or
//! game state; they never keep a borrowed record across steps.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::{CardDefinition, CardName};
use crate::core::{PlayedCardId, PlayedCardRef, PlayerId, ResourceMap};

/// A card in a city.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedCard {
    pub id: PlayedCardId,
    pub card_name: CardName,
    pub card_owner: PlayerId,

    /// Workers on this card (destinations and the Storehouse).
    pub workers: SmallVec<[PlayerId; 2]>,

    /// A critter has been admitted through this construction.
    pub used_for_critter: bool,

    /// Resources or VP stored on the card (Storehouse, Clock Tower, Chapel).
    pub resources: ResourceMap,

    /// Cards held underneath (Dungeon prisoners).
    pub paired_cards: Vec<CardName>,

    /// Messenger only: the construction it shares a space with.
    pub shares_space_with: Option<PlayedCardId>,
}

impl PlayedCard {
    #[must_use]
    pub fn new(id: PlayedCardId, card_name: CardName, card_owner: PlayerId) -> Self {
        let mut card = Self {
            id,
            card_name,
            card_owner,
            workers: SmallVec::new(),
            used_for_critter: false,
            resources: ResourceMap::NONE,
            paired_cards: Vec::new(),
            shares_space_with: None,
        };
        if card_name == CardName::ClockTower {
            card.resources.vp = 3;
        }
        card
    }

    #[must_use]
    pub fn definition(&self) -> CardDefinition {
        self.card_name.definition()
    }

    #[must_use]
    pub fn card_ref(&self) -> PlayedCardRef {
        PlayedCardRef::new(self.card_owner, self.id)
    }

    /// Construction that has not yet admitted a critter.
    #[must_use]
    pub fn is_unoccupied_construction(&self) -> bool {
        self.card_name.is_construction() && !self.used_for_critter
    }
}
