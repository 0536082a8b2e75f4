//! Turn resolution.
//!
//! - `engine.rs`: the `next` pipeline, undo, legal inputs and the end
//!   condition
//! - `play_card.rs`: card plays, payment side effects and reserving
//! - `turn.rs`: seasons, turn rotation and ending a player's game
//! - `scoring.rs`: `Player::get_points`

pub mod engine;
mod play_card;
mod scoring;
mod turn;

pub use engine::{AllPlayersFinished, EndCondition, GameOutcome};
pub(crate) use play_card::{can_play_card_check, play_card_for_free};
