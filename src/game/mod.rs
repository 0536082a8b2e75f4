//! Match wrapper and its collaborators.
//!
//! - `session.rs`: `Match`, history and rewind
//! - `store.rs`: `SnapshotStore` and the in-memory `MemoryStore`
//! - `ids.rs`: match ids and player secrets

mod ids;
mod session;
mod store;

pub use ids::{IdGenerator, SequentialIds, UuidGenerator, MATCH_ID_PREFIX};
pub use session::Match;
pub use store::{MatchRecord, MemoryStore, SnapshotStore};
