//! Snapshot persistence.
//!
//! The engine only needs `load` and `save` by match id. `MemoryStore` keeps
//! bincode bytes in a hash map, which is what a key-value backend would hold.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::GameStateSnapshot;
use crate::error::{GameError, GameResult};

/// What is saved for one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_secret: String,
    pub snapshot: GameStateSnapshot,
}

/// Key-value store for match records.
pub trait SnapshotStore {
    /// `Ok(None)` when the match is unknown.
    fn load(&self, match_id: &str) -> GameResult<Option<MatchRecord>>;

    fn save(&mut self, match_id: &str, record: &MatchRecord) -> GameResult<()>;
}

/// In-process store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: FxHashMap<String, Vec<u8>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, match_id: &str) -> GameResult<Option<MatchRecord>> {
        self.records
            .get(match_id)
            .map(|bytes| bincode::deserialize(bytes).map_err(GameError::from))
            .transpose()
    }

    fn save(&mut self, match_id: &str, record: &MatchRecord) -> GameResult<()> {
        let bytes = bincode::serialize(record)?;
        self.records.insert(match_id.to_string(), bytes);
        log::debug!("saved {match_id} (state {})", record.snapshot.game_state_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameOptions, GameState, PlayerId};
    use crate::player::Player;

    fn record() -> MatchRecord {
        let players = vec![Player::new("A", PlayerId::new(0), "a"), Player::new("B", PlayerId::new(1), "b")];
        let state = GameState::initial(players, GameOptions::base(), 1).unwrap();
        MatchRecord { match_secret: "s".into(), snapshot: state.to_snapshot(true) }
    }

    #[test]
    fn test_missing_match() {
        let store = MemoryStore::new();
        assert_eq!(store.load("v3:nope"), Ok(None));
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let record = record();
        store.save("v3:1", &record).unwrap();
        assert_eq!(store.load("v3:1").unwrap(), Some(record));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_corrupted_record_is_invariant() {
        let mut store = MemoryStore::new();
        store.records.insert("v3:bad".into(), vec![0xff, 0x00]);
        assert!(store.load("v3:bad").unwrap_err().is_invariant());
    }
}
