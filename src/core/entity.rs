//! Entity references.
//!
//! Catalog entries are identified by their name enums. `EntityRef` wraps any
//! of them so log lines and pending decisions can point at their source.
//!
//! Played cards are different: two Farms in one city are distinct records,
//! so each gets a `PlayedCardId` from a per-game counter and is located by
//! `PlayedCardRef` (owner + id).
//!
//! ```
//! use everdell_engine::core::{EntityRef, PlayedCardId, PlayedCardRef, PlayerId};
//! use everdell_engine::cards::CardName;
//!
//! let farm = PlayedCardRef::new(PlayerId::new(1), PlayedCardId(4));
//! assert_eq!(farm.owner, PlayerId::new(1));
//! assert_eq!(EntityRef::from(CardName::Farm).to_string(), "Farm");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::player::PlayerId;
use super::season::Season;
use crate::board::{EventName, LocationName};
use crate::cards::CardName;
use crate::expansions::{AdornmentName, TrainCarTileName, VisitorName};

/// Reference to any catalog entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    Card(CardName),
    Location(LocationName),
    Event(EventName),
    Adornment(AdornmentName),
    Visitor(VisitorName),
    TrainCarTile(TrainCarTileName),
    /// Decisions owned by the season change itself.
    Season(Season),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Card(c) => write!(f, "{c}"),
            EntityRef::Location(l) => write!(f, "{l}"),
            EntityRef::Event(e) => write!(f, "{e}"),
            EntityRef::Adornment(a) => write!(f, "{a}"),
            EntityRef::Visitor(v) => write!(f, "{v}"),
            EntityRef::TrainCarTile(t) => write!(f, "{t}"),
            EntityRef::Season(s) => write!(f, "{s}"),
        }
    }
}

impl From<CardName> for EntityRef {
    fn from(card: CardName) -> Self {
        EntityRef::Card(card)
    }
}

impl From<LocationName> for EntityRef {
    fn from(location: LocationName) -> Self {
        EntityRef::Location(location)
    }
}

impl From<EventName> for EntityRef {
    fn from(event: EventName) -> Self {
        EntityRef::Event(event)
    }
}

impl From<AdornmentName> for EntityRef {
    fn from(adornment: AdornmentName) -> Self {
        EntityRef::Adornment(adornment)
    }
}

impl From<VisitorName> for EntityRef {
    fn from(visitor: VisitorName) -> Self {
        EntityRef::Visitor(visitor)
    }
}

impl From<TrainCarTileName> for EntityRef {
    fn from(tile: TrainCarTileName) -> Self {
        EntityRef::TrainCarTile(tile)
    }
}

/// Unique id of a played-card record within one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayedCardId(pub u32);

/// Locate-by-identity handle for a played card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayedCardRef {
    pub owner: PlayerId,
    pub id: PlayedCardId,
}

impl PlayedCardRef {
    #[must_use]
    pub const fn new(owner: PlayerId, id: PlayedCardId) -> Self {
        Self { owner, id }
    }
}

/// Where a placed worker sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkerPlacement {
    Location(LocationName),
    Event(EventName),
    Card { card: CardName, target: PlayedCardRef },
}

impl fmt::Display for WorkerPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerPlacement::Location(l) => write!(f, "{l}"),
            WorkerPlacement::Event(e) => write!(f, "{e}"),
            WorkerPlacement::Card { card, target } => write!(f, "{card} ({})", target.owner),
        }
    }
}
