//! Game configuration.
//!
//! A match is configured once at creation with `GameOptions`:
//! - the base game is always on
//! - `pearlbrook` adds adornments, wonders and pearls
//! - `newleaf` toggles individual Newleaf modules
//!
//! Fixed rule constants live alongside as `pub const`s.

use serde::{Deserialize, Serialize};

/// Maximum occupied spaces in a city.
pub const CITY_CAPACITY: usize = 15;
/// Maximum cards in hand.
pub const HAND_LIMIT: usize = 8;
/// Cards face-up in the Meadow.
pub const MEADOW_SIZE: usize = 8;
/// Station card slots (Newleaf).
pub const STATION_SLOTS: usize = 3;
/// Revealed train car tiles, one under each station slot.
pub const TRAIN_CAR_WINDOW: usize = 3;
/// Revealed visitors.
pub const VISITOR_WINDOW: usize = 2;
/// Copies of each train car tile and visitor in their stacks.
pub const COPIES_PER_REVEALED_ENTRY: usize = 3;
/// Workers each player begins Winter with.
pub const STARTING_WORKERS: u32 = 2;
/// Golden leaf tokens per player when the module is on.
pub const GOLDEN_LEAVES: u32 = 3;
/// Adornments dealt to each player with Pearlbrook.
pub const ADORNMENTS_PER_PLAYER: usize = 2;
/// Cards in the first player's opening hand; each later seat draws one more.
pub const BASE_HAND_SIZE: usize = 5;
/// Snapshots retained by a match for rewinding.
pub const HISTORY_LIMIT: usize = 200;
/// Allowed seat counts.
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Newleaf module toggles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewleafOptions {
    /// Add the Newleaf cards to the deck.
    pub cards: bool,
    /// Allow reserving a Meadow card once per game.
    pub reserving: bool,
    /// Station location, station cards and train car tiles.
    pub station: bool,
    /// Visitor stack.
    pub visitors: bool,
    /// Golden leaf tokens.
    pub golden_leaf: bool,
}

impl NewleafOptions {
    /// All modules on.
    #[must_use]
    pub fn all() -> Self {
        Self {
            cards: true,
            reserving: true,
            station: true,
            visitors: true,
            golden_leaf: true,
        }
    }

    #[must_use]
    pub fn any(&self) -> bool {
        self.cards || self.reserving || self.station || self.visitors || self.golden_leaf
    }
}

/// Options fixed at match creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameOptions {
    pub pearlbrook: bool,
    pub newleaf: NewleafOptions,
}

impl GameOptions {
    /// Base game only.
    #[must_use]
    pub fn base() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_pearlbrook(mut self) -> Self {
        self.pearlbrook = true;
        self
    }

    #[must_use]
    pub fn with_newleaf(mut self, newleaf: NewleafOptions) -> Self {
        self.newleaf = newleaf;
        self
    }
}
