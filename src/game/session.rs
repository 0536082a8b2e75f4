//! A live match: ids, the committed state and a bounded history.
//!
//! All rules go through `GameState::next_for`. The match only remembers
//! committed states so it can rewind, and moves them in and out of a
//! `SnapshotStore`.

use std::collections::VecDeque;

use super::ids::IdGenerator;
use super::store::{MatchRecord, SnapshotStore};
use crate::core::config::{HISTORY_LIMIT, MAX_PLAYERS, MIN_PLAYERS};
use crate::core::{GameInput, GameOptions, GameState, PlayerId};
use crate::error::{ensure, GameError, GameResult};
use crate::player::Player;

/// One match and the states it went through.
#[derive(Clone, Debug)]
pub struct Match {
    match_id: String,
    match_secret: String,
    state: GameState,
    /// Committed states, oldest first. The last entry is `state`.
    history: VecDeque<GameState>,
}

impl Match {
    /// Start a match for 2 to 4 named players in seat order.
    pub fn create<S: AsRef<str>>(
        names: &[S],
        options: GameOptions,
        seed: u64,
        ids: &mut dyn IdGenerator,
    ) -> GameResult<Match> {
        ensure!(
            (MIN_PLAYERS..=MAX_PLAYERS).contains(&names.len()),
            "Unable to create a game with {} players",
            names.len()
        );
        let match_id = ids.match_id();
        let match_secret = ids.secret();
        let players = names
            .iter()
            .enumerate()
            .map(|(i, name)| Player::new(name.as_ref(), PlayerId::new(i as u8), ids.secret()))
            .collect();
        let state = GameState::initial(players, options, seed)?;
        log::info!("created match {match_id} for {} players", names.len());
        Ok(Match::from_state(match_id, match_secret, state))
    }

    fn from_state(match_id: String, match_secret: String, state: GameState) -> Match {
        let mut history = VecDeque::new();
        history.push_back(state.clone());
        Match { match_id, match_secret, state, history }
    }

    #[must_use]
    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    #[must_use]
    pub fn match_secret(&self) -> &str {
        &self.match_secret
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.state.active_player_id()
    }

    #[must_use]
    pub fn get_possible_inputs(&self) -> Vec<GameInput> {
        self.state.get_possible_game_inputs()
    }

    /// Seat of the player holding `secret`.
    #[must_use]
    pub fn player_for_secret(&self, secret: &str) -> Option<PlayerId> {
        self.state
            .players()
            .values()
            .find(|p| p.player_secret == secret)
            .map(|p| p.player_id)
    }

    /// Apply one input from `player` and keep the result.
    pub fn apply_input(&mut self, player: PlayerId, input: GameInput) -> GameResult<()> {
        let next = self.state.next_for(player, input)?;
        self.history.push_back(next.clone());
        while self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.state = next;
        Ok(())
    }

    /// Sequence ids that `rewind_to` can still reach, oldest first.
    pub fn history_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.history.iter().map(GameState::game_state_id)
    }

    /// Go back to a retained state and forget everything after it.
    pub fn rewind_to(&mut self, game_state_id: u64) -> GameResult<()> {
        let pos = self
            .history
            .iter()
            .position(|s| s.game_state_id() == game_state_id)
            .ok_or_else(|| GameError::validation(format!("Game state {game_state_id} is no longer available")))?;
        self.history.truncate(pos + 1);
        self.state = self.history[pos].clone();
        log::info!("rewound {} to state {game_state_id}", self.match_id);
        Ok(())
    }

    // === Persistence ===

    pub fn save(&self, store: &mut dyn SnapshotStore) -> GameResult<()> {
        let record = MatchRecord {
            match_secret: self.match_secret.clone(),
            snapshot: self.state.to_snapshot(true),
        };
        store.save(&self.match_id, &record)
    }

    /// Restore a saved match. History starts at the loaded state.
    pub fn load(match_id: &str, store: &dyn SnapshotStore) -> GameResult<Match> {
        let record = store
            .load(match_id)?
            .ok_or_else(|| GameError::validation(format!("Match {match_id} not found")))?;
        let state = GameState::from_snapshot(record.snapshot)?;
        Ok(Match::from_state(match_id.to_string(), record.match_secret, state))
    }
}
