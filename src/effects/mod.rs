//! Shared effect machinery.
//!
//! Every catalog entity (card, location, event, adornment, visitor, train car
//! tile) implements [`Playable`]. The engine calls `play` for the entity's
//! base input and again for every continuation whose context names it.
//!
//! The helpers here are the sub-protocols reused across the catalog:
//! - `GainAnyResource`: pick one basic resource
//! - `GainManyResources`: distribute N basic resources
//! - `validate_selection` / `validate_choice`: option-set membership and
//!   bounds for every select-style continuation

mod gain;
mod playable;
mod selection;

pub use gain::{GainAnyResource, GainManyResources};
pub use playable::Playable;
pub use selection::{validate_choice, validate_selection};
