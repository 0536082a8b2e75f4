//! Human-readable game log.
//!
//! Entries are lists of parts so a renderer can link player and entity
//! references. `GameState::render_log_entry` flattens them to text.

use serde::{Deserialize, Serialize};

use super::entity::EntityRef;
use super::player::PlayerId;
use super::resources::ResourceMap;
use crate::board::{EventName, LocationName};
use crate::cards::CardName;
use crate::expansions::{AdornmentName, TrainCarTileName, VisitorName};

/// One piece of a log line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogPart {
    Text(String),
    Player(PlayerId),
    Entity(EntityRef),
    Resources(ResourceMap),
}

/// A log line, optionally attributed to the entity that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLogEntry {
    pub source: Option<EntityRef>,
    pub parts: Vec<LogPart>,
}

impl GameLogEntry {
    #[must_use]
    pub fn new(source: Option<EntityRef>, parts: Vec<LogPart>) -> Self {
        Self { source, parts }
    }

    /// True if any part mentions the given text.
    #[must_use]
    pub fn contains_text(&self, needle: &str) -> bool {
        self.parts.iter().any(|p| matches!(p, LogPart::Text(t) if t.contains(needle)))
    }
}

impl From<&str> for LogPart {
    fn from(text: &str) -> Self {
        LogPart::Text(text.to_string())
    }
}

impl From<String> for LogPart {
    fn from(text: String) -> Self {
        LogPart::Text(text)
    }
}

impl From<PlayerId> for LogPart {
    fn from(player: PlayerId) -> Self {
        LogPart::Player(player)
    }
}

impl From<ResourceMap> for LogPart {
    fn from(resources: ResourceMap) -> Self {
        LogPart::Resources(resources)
    }
}

impl From<EntityRef> for LogPart {
    fn from(entity: EntityRef) -> Self {
        LogPart::Entity(entity)
    }
}

macro_rules! entity_log_part {
    ($($ty:ty),*) => {
        $(impl From<$ty> for LogPart {
            fn from(name: $ty) -> Self {
                LogPart::Entity(EntityRef::from(name))
            }
        })*
    };
}

entity_log_part!(CardName, LocationName, EventName, AdornmentName, VisitorName, TrainCarTileName);

/// Build a `Vec<LogPart>` from anything convertible.
///
/// ```ignore
/// state.log(CardName::Farm, log_parts![player, " gained ", ResourceMap::of(Berry, 1), "."]);
/// ```
macro_rules! log_parts {
    ($($part:expr),* $(,)?) => {
        vec![$($crate::core::LogPart::from($part)),*]
    };
}

pub(crate) use log_parts;
