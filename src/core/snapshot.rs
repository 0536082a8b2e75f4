//! Serializable snapshots of a `GameState`.
//!
//! ## Redaction
//!
//! `to_snapshot(true)` carries everything, including the RNG, and
//! `GameState::from_snapshot` restores an equal state from it.
//!
//! Public snapshots hide:
//! - hands and adornments in hand (counts stay)
//! - player secrets
//! - deck, discard, adornment pile and the rest piles (counts stay)
//! - the applied-input log, the undo slot and the RNG
//!
//! `to_snapshot_for_viewer` is a public snapshot plus the viewer's own hand
//! and, on the viewer's turn, the pending decisions.
//!
//! Snapshots are plain serde records, encoded with `bincode` for storage.

use serde::{Deserialize, Serialize};

use super::config::GameOptions;
use super::input::{GameInput, InputRecord};
use super::log::GameLogEntry;
use super::player::{PlayerId, PlayerMap};
use super::rng::{GameRng, GameRngState};
use super::season::Season;
use super::state::{GameState, UndoSnapshot};
use super::{ResourceMap, WorkerPlacement};
use crate::board::{EventName, LocationName};
use crate::cards::{CardName, PlayedCard};
use crate::error::{GameError, GameResult};
use crate::expansions::{AdornmentName, TrainCarTileName, VisitorName};
use crate::player::{ClaimedEvent, Player, PlayerStatus, ReservedCard};
use crate::stack::PendingInputStack;
use crate::zones::{CardStack, RevealedStack};

/// A face-down pile: the count is public, the contents are not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PileSnapshot<T> {
    pub count: usize,
    /// Bottom first.
    pub cards: Option<Vec<T>>,
}

/// A revealed window and its private rest pile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedSnapshot<T> {
    pub revealed: Vec<Option<T>>,
    pub rest_count: usize,
    /// Head first.
    pub rest: Option<Vec<T>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub name: String,
    pub player_id: PlayerId,
    pub player_secret: Option<String>,

    pub num_cards_in_hand: usize,
    pub cards_in_hand: Option<Vec<CardName>>,
    pub played_cards: Vec<PlayedCard>,
    pub resources: ResourceMap,

    pub current_season: Season,
    pub num_workers: u32,
    pub placed_workers: Vec<WorkerPlacement>,
    pub status: PlayerStatus,

    pub claimed_events: Vec<(EventName, ClaimedEvent)>,
    pub num_adornments_in_hand: usize,
    pub adornments_in_hand: Option<Vec<AdornmentName>>,
    pub played_adornments: Vec<AdornmentName>,
    pub reserved_card: ReservedCard,
    pub num_golden_leaf: u32,
    pub claimed_visitors: Vec<VisitorName>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub game_state_id: u64,
    pub options: GameOptions,
    pub active_player: PlayerId,
    pub players: Vec<PlayerSnapshot>,

    pub deck: PileSnapshot<CardName>,
    pub discard: PileSnapshot<CardName>,
    pub meadow: Vec<CardName>,

    pub locations: Vec<(LocationName, Vec<PlayerId>)>,
    pub events: Vec<(EventName, Option<PlayerId>)>,

    pub num_pending: usize,
    /// Bottom first.
    pub pending: Option<Vec<GameInput>>,
    pub played_inputs: Option<Vec<InputRecord>>,
    pub game_log: Vec<GameLogEntry>,

    pub adornments_pile: Option<PileSnapshot<AdornmentName>>,
    pub station_cards: Option<Vec<Option<CardName>>>,
    pub train_car_tiles: Option<RevealedSnapshot<TrainCarTileName>>,
    pub visitors: Option<RevealedSnapshot<VisitorName>>,

    pub undo_owner: Option<PlayerId>,
    pub undo: Option<Box<GameStateSnapshot>>,
    pub game_over: bool,
    pub rng: Option<GameRngState>,
    pub next_played_card_id: u32,
}

fn missing(what: &str) -> GameError {
    GameError::invariant(format!("corrupted snapshot: missing {what}"))
}

fn pile_snapshot<T: Clone>(pile: &CardStack<T>, private: bool) -> PileSnapshot<T> {
    PileSnapshot {
        count: pile.len(),
        cards: private.then(|| pile.iter().cloned().collect()),
    }
}

fn pile_from_snapshot<T: Clone>(name: &str, pile: PileSnapshot<T>) -> GameResult<CardStack<T>> {
    let cards = pile.cards.ok_or_else(|| missing(name))?;
    Ok(CardStack::from_items(name, cards))
}

fn revealed_snapshot<T: Clone + PartialEq>(stack: &RevealedStack<T>, private: bool) -> RevealedSnapshot<T> {
    RevealedSnapshot {
        revealed: stack.revealed().to_vec(),
        rest_count: stack.rest_len(),
        rest: private.then(|| stack.rest().cloned().collect()),
    }
}

fn revealed_from_snapshot<T: Clone + PartialEq>(what: &str, stack: RevealedSnapshot<T>) -> GameResult<RevealedStack<T>> {
    let rest = stack.rest.ok_or_else(|| missing(what))?;
    Ok(RevealedStack::from_parts(stack.revealed, rest))
}

impl PlayerSnapshot {
    fn new(player: &Player, private: bool) -> Self {
        Self {
            name: player.name.clone(),
            player_id: player.player_id,
            player_secret: private.then(|| player.player_secret.clone()),
            num_cards_in_hand: player.cards_in_hand.len(),
            cards_in_hand: private.then(|| player.cards_in_hand.clone()),
            played_cards: player.played_cards.clone(),
            resources: player.resources,
            current_season: player.current_season,
            num_workers: player.num_workers,
            placed_workers: player.placed_workers.clone(),
            status: player.status,
            claimed_events: player.claimed_events.iter().map(|(e, c)| (*e, c.clone())).collect(),
            num_adornments_in_hand: player.adornments_in_hand.len(),
            adornments_in_hand: private.then(|| player.adornments_in_hand.clone()),
            played_adornments: player.played_adornments.clone(),
            reserved_card: player.reserved_card,
            num_golden_leaf: player.num_golden_leaf,
            claimed_visitors: player.claimed_visitors.clone(),
        }
    }

    fn into_player(self) -> GameResult<Player> {
        Ok(Player {
            name: self.name,
            player_id: self.player_id,
            player_secret: self.player_secret.ok_or_else(|| missing("player secret"))?,
            cards_in_hand: self.cards_in_hand.ok_or_else(|| missing("hand"))?,
            played_cards: self.played_cards,
            resources: self.resources,
            current_season: self.current_season,
            num_workers: self.num_workers,
            placed_workers: self.placed_workers,
            status: self.status,
            claimed_events: self.claimed_events.into_iter().collect(),
            adornments_in_hand: self.adornments_in_hand.ok_or_else(|| missing("adornments"))?,
            played_adornments: self.played_adornments,
            reserved_card: self.reserved_card,
            num_golden_leaf: self.num_golden_leaf,
            claimed_visitors: self.claimed_visitors,
        })
    }
}

impl GameState {
    /// Serializable record of this state.
    ///
    /// With `include_private` the record restores an identical state;
    /// without it every hand and hidden pile is redacted.
    #[must_use]
    pub fn to_snapshot(&self, include_private: bool) -> GameStateSnapshot {
        self.build_snapshot(include_private, None)
    }

    /// Public record plus what `viewer` is allowed to see.
    #[must_use]
    pub fn to_snapshot_for_viewer(&self, viewer: PlayerId) -> GameStateSnapshot {
        self.build_snapshot(false, Some(viewer))
    }

    fn build_snapshot(&self, private: bool, viewer: Option<PlayerId>) -> GameStateSnapshot {
        let sees_hand = |p: PlayerId| private || viewer == Some(p);
        let sees_pending = private || viewer == Some(self.active_player);

        GameStateSnapshot {
            game_state_id: self.game_state_id,
            options: self.options,
            active_player: self.active_player,
            players: self
                .players
                .values()
                .map(|p| {
                    let mut snapshot = PlayerSnapshot::new(p, sees_hand(p.player_id));
                    if !private {
                        snapshot.player_secret = None;
                    }
                    snapshot
                })
                .collect(),
            deck: pile_snapshot(&self.deck, private),
            discard: pile_snapshot(&self.discard, private),
            meadow: self.meadow.clone(),
            locations: self.locations.iter().map(|(l, o)| (*l, o.clone())).collect(),
            events: self.events.iter().map(|(e, o)| (*e, *o)).collect(),
            num_pending: self.pending.len(),
            pending: sees_pending.then(|| self.pending.iter().cloned().collect()),
            played_inputs: private.then(|| self.played_inputs.iter().cloned().collect()),
            game_log: self.game_log.iter().cloned().collect(),
            adornments_pile: self.adornments_pile.as_ref().map(|p| pile_snapshot(p, private)),
            station_cards: self.station_cards.clone(),
            train_car_tiles: self.train_car_tiles.as_ref().map(|t| revealed_snapshot(t, private)),
            visitors: self.visitors.as_ref().map(|v| revealed_snapshot(v, private)),
            undo_owner: self.undo.as_ref().map(|u| u.owner),
            undo: self
                .undo
                .as_ref()
                .filter(|_| private)
                .map(|u| Box::new(u.state.build_snapshot(true, None))),
            game_over: self.game_over,
            rng: private.then(|| self.rng.state()),
            next_played_card_id: self.next_played_card_id,
        }
    }

    /// Restore a state from a private snapshot.
    ///
    /// Public snapshots are rejected: they lack hands and piles.
    pub fn from_snapshot(snapshot: GameStateSnapshot) -> GameResult<GameState> {
        let players = snapshot
            .players
            .into_iter()
            .map(PlayerSnapshot::into_player)
            .collect::<GameResult<Vec<_>>>()?;
        for (i, player) in players.iter().enumerate() {
            if player.player_id.index() != i {
                return Err(GameError::invariant("corrupted snapshot: players out of seat order"));
            }
        }

        let mut pending = PendingInputStack::new();
        for input in snapshot.pending.ok_or_else(|| missing("pending inputs"))? {
            pending.push(input)?;
        }

        let undo = match (snapshot.undo_owner, snapshot.undo) {
            (Some(owner), Some(state)) => Some(UndoSnapshot { owner, state: Box::new(GameState::from_snapshot(*state)?) }),
            (None, None) => None,
            _ => return Err(missing("undo state")),
        };

        Ok(GameState {
            game_state_id: snapshot.game_state_id,
            options: snapshot.options,
            players: PlayerMap::from_vec(players),
            active_player: snapshot.active_player,
            deck: pile_from_snapshot("Deck", snapshot.deck)?,
            discard: pile_from_snapshot("Discard", snapshot.discard)?,
            meadow: snapshot.meadow,
            locations: snapshot.locations.into_iter().collect(),
            events: snapshot.events.into_iter().collect(),
            pending,
            played_inputs: snapshot
                .played_inputs
                .ok_or_else(|| missing("applied inputs"))?
                .into_iter()
                .collect(),
            game_log: snapshot.game_log.into_iter().collect(),
            adornments_pile: snapshot
                .adornments_pile
                .map(|p| pile_from_snapshot("Adornments", p))
                .transpose()?,
            station_cards: snapshot.station_cards,
            train_car_tiles: snapshot
                .train_car_tiles
                .map(|t| revealed_from_snapshot("train car tiles", t))
                .transpose()?,
            visitors: snapshot
                .visitors
                .map(|v| revealed_from_snapshot("visitors", v))
                .transpose()?,
            undo,
            game_over: snapshot.game_over,
            rng: GameRng::from_state(&snapshot.rng.ok_or_else(|| missing("rng"))?),
            next_played_card_id: snapshot.next_played_card_id,
        })
    }
}

impl GameStateSnapshot {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> GameResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> GameResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NewleafOptions;

    fn players() -> Vec<Player> {
        (0..3)
            .map(|i| Player::new(format!("P{i}"), PlayerId::new(i), format!("secret-{i}")))
            .collect()
    }

    fn full_options() -> GameOptions {
        GameOptions::base().with_pearlbrook().with_newleaf(NewleafOptions::all())
    }

    #[test]
    fn test_private_round_trip() {
        let state = GameState::initial(players(), full_options(), 17).unwrap();
        let restored = GameState::from_snapshot(state.to_snapshot(true)).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_bytes_round_trip() {
        let state = GameState::initial(players(), full_options(), 4).unwrap();
        let bytes = state.to_snapshot(true).to_bytes().unwrap();
        let decoded = GameStateSnapshot::from_bytes(&bytes).unwrap();
        assert_eq!(GameState::from_snapshot(decoded).unwrap(), state);
    }

    #[test]
    fn test_public_snapshot_is_redacted() {
        let state = GameState::initial(players(), full_options(), 4).unwrap();
        let public = state.to_snapshot(false);
        assert!(public.players.iter().all(|p| p.cards_in_hand.is_none() && p.player_secret.is_none()));
        assert_eq!(public.players[1].num_cards_in_hand, 6);
        assert!(public.deck.cards.is_none());
        assert_eq!(public.deck.count, state.deck_len());
        assert!(public.rng.is_none());
        assert!(GameState::from_snapshot(public).unwrap_err().is_invariant());
    }

    #[test]
    fn test_viewer_sees_own_hand() {
        let state = GameState::initial(players(), full_options(), 4).unwrap();
        let view = state.to_snapshot_for_viewer(PlayerId::new(1));
        assert!(view.players[0].cards_in_hand.is_none());
        assert_eq!(view.players[1].cards_in_hand.as_ref(), Some(&state.player(PlayerId::new(1)).cards_in_hand));
        assert!(view.players[1].player_secret.is_none());
        assert!(view.pending.is_none());
    }

    #[test]
    fn test_corrupted_bytes() {
        let err = GameStateSnapshot::from_bytes(&[1, 2, 3]).unwrap_err();
        assert!(err.is_invariant());
        assert!(err.reason().starts_with("corrupted snapshot"));
    }
}
