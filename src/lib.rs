//! # everdell-engine
//!
//! Authoritative rules engine for a turn-based worker-placement card game.
//!
//! ## Design Principles
//!
//! 1. **Immutable Transform**: `GameState::next` never mutates the state it
//!    is called on. Checks read the committed state, effects run on a clone
//!    and the clone is returned only if the whole chain succeeded.
//!
//! 2. **Explicit Continuations**: effects that need a decision push a
//!    tagged template onto the pending stack. The caller answers it with a
//!    new `next` call; the tag routes the answer back to the effect.
//!
//! 3. **Closed Catalogs**: cards, locations, events, adornments, visitors
//!    and train car tiles are enums. Their effects are `match` arms keyed by
//!    the same name, so a new variant is a compile error until handled.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: logs use `im::Vector` so the working
//!   copy is cheap to clone.
//!
//! - **Two Error Kinds**: `GameError::Validation` for rejected inputs,
//!   `GameError::Invariant` for programmer errors and corrupted snapshots.
//!
//! - **Deterministic Replay**: the seeded RNG is part of the private
//!   snapshot, so a restored state shuffles exactly like the original.
//!
//! ## Modules
//!
//! - `core`: seats, resources, inputs, log, RNG, options, `GameState`
//! - `zones`: deck, discard and revealed-window stacks
//! - `cards`: card catalog, played-card records and card effects
//! - `board`: locations and events
//! - `expansions`: adornments, train car tiles and visitors
//! - `player`: per-seat state, city rules and payment validation
//! - `effects`: the `Playable` trait and shared decision helpers
//! - `stack`: the pending-decision stack
//! - `rules`: the `next` pipeline, seasons and scoring
//! - `game`: match wrapper, snapshot store and id generation
//!
//! ## Example
//!
//! ```
//! use everdell_engine::{GameInput, GameOptions, Match, SequentialIds};
//! use everdell_engine::board::LocationName;
//!
//! let mut game = Match::create(&["Ana", "Bo"], GameOptions::base(), 7, &mut SequentialIds::new()).unwrap();
//! let first = game.active_player();
//! game.apply_input(first, GameInput::PlaceWorker { location: LocationName::BasicThreeTwig }).unwrap();
//! assert_eq!(game.state().player(first).resources.twig, 3);
//! assert_ne!(game.active_player(), first);
//! ```

pub mod board;
pub mod cards;
pub mod core;
pub mod effects;
pub mod error;
pub mod expansions;
pub mod game;
pub mod player;
pub mod rules;
pub mod stack;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    CardSource, ContextTag, EntityRef, GameInput, GameOptions, GameRng, GameRngState, GameState,
    GameStateSnapshot, NewleafOptions, PaymentOptions, PlayCardInput, PlayedCardRef, PlayerId, PlayerMap,
    Purpose, ResourceMap, ResourceType, Season, WorkerPlacement,
};

pub use crate::error::{GameError, GameResult};

pub use crate::cards::{CardName, CardType, PlayedCard};

pub use crate::player::{Discount, Player, PlayerStatus};

pub use crate::effects::Playable;

pub use crate::rules::{AllPlayersFinished, EndCondition, GameOutcome};

pub use crate::game::{IdGenerator, Match, MemoryStore, SequentialIds, SnapshotStore, UuidGenerator};
