//! The shared board: worker locations and events.
//!
//! - `location.rs`: basic, forest, Haven, Journey and Station locations
//! - `event.rs`: basic events, special events and Pearlbrook wonders

pub mod event;
pub mod location;

pub use event::{EventName, EventType};
pub use location::{LocationName, LocationOccupancy, LocationType};
