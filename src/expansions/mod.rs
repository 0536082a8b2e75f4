//! Expansion content.
//!
//! - `adornment.rs`: Pearlbrook adornments, played for 1 PEARL
//! - `train_car.rs`: Newleaf train-car tiles under the station slots
//! - `visitor.rs`: Newleaf visitors invited at the start of a season

pub mod adornment;
pub mod train_car;
pub mod visitor;

pub use adornment::AdornmentName;
pub use train_car::TrainCarTileName;
pub use visitor::{VisitorBonus, VisitorDefinition, VisitorName};
