//! Pending-decision stack.
//!
//! Effects that need a player decision push a continuation template onto
//! the `PendingInputStack`. The engine resolves the top entry before any
//! other input is legal, which lets one effect chain into another to any
//! depth.

mod pending;

pub use pending::PendingInputStack;
