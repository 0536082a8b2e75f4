//! Core engine types: seats, resources, inputs, log, RNG, configuration and
//! the `GameState` itself.

pub mod config;
pub mod entity;
pub mod input;
pub mod log;
pub mod player;
pub mod resources;
pub mod rng;
pub mod season;
pub mod snapshot;
pub mod state;

pub use config::{GameOptions, NewleafOptions};
pub use entity::{EntityRef, PlayedCardId, PlayedCardRef, WorkerPlacement};
pub use input::{
    CardSource, ContextTag, GameInput, InputKind, InputRecord, PaymentOptions, PlayCardInput, Prompt,
    Purpose, SelectCards, SelectLocation, SelectOptionGeneric, SelectPlayedAdornment, SelectPlayedCards,
    SelectPlayer, SelectResources, SelectWorkerPlacement,
};
pub use log::{GameLogEntry, LogPart};
pub use player::{PlayerId, PlayerMap};
pub use resources::{ResourceMap, ResourceType};
pub use rng::{GameRng, GameRngState};
pub use season::Season;
pub use snapshot::{GameStateSnapshot, PileSnapshot, PlayerSnapshot, RevealedSnapshot};
pub use state::{GameState, UndoSnapshot};
