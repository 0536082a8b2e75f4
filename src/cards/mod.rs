//! The card catalog.
//!
//! ## Key Types
//!
//! - `CardName`: card identity, one variant per card
//! - `CardDefinition`: static attributes (cost, type, base VP, uniqueness)
//! - `PlayedCard`: a card in a city, with workers and stored resources
//!
//! Card effects live in `abilities`, keyed by `CardName`.

pub mod abilities;
pub mod definition;
pub mod instance;

pub(crate) use abilities::{activate_all_production, activate_production, can_reactivate, enter_city, reactivate};
pub use definition::{CardDefinition, CardName, CardType, Expansion};
pub use instance::PlayedCard;
