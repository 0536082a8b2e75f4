//! The transform at the heart of the engine.
//!
//! `GameState::next` takes one input and returns a new state. The committed
//! state is never touched: checks run against `&self`, effects run against a
//! clone, and the clone is returned only if every step succeeded.
//!
//! ## Pipeline
//!
//! 1. Locate the entity the input addresses (a base target, or the
//!    context source of the top pending decision).
//! 2. Check legality against the committed state.
//! 3. Run the effect on the working copy. Effects may push decisions.
//! 4. Commit: bump the sequence id, record the input, rotate the turn once
//!    the pending stack is empty, then ask the end condition.
//!
//! ## Undo
//!
//! Every base input stores the state it started from, tagged with the
//! acting player. Only that player may go back, and only until someone
//! else starts a turn.

use log::{debug, error, info, warn};

use super::{play_card, turn};
use crate::cards::CardName;
use crate::core::log::log_parts;
use crate::core::{
    CardSource, EntityRef, GameInput, GameState, InputRecord, PaymentOptions, PlayCardInput, PlayerId,
    ResourceMap, ResourceType, UndoSnapshot, WorkerPlacement,
};
use crate::effects::Playable;
use crate::error::{ensure, GameError, GameResult};
use crate::player::{any3_payment, ReservedCard};

/// Result of a finished game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    /// Single winner.
    Winner(PlayerId),
    /// Tied on points.
    Winners(Vec<PlayerId>),
}

impl GameOutcome {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameOutcome::Winner(p) => *p == player,
            GameOutcome::Winners(ps) => ps.contains(&player),
        }
    }
}

/// Decides when the match is over. Asked after every committed input.
pub trait EndCondition {
    fn is_game_over(&self, state: &GameState) -> bool;
}

/// Default rule: the game ends once every player has ended theirs.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllPlayersFinished;

impl EndCondition for AllPlayersFinished {
    fn is_game_over(&self, state: &GameState) -> bool {
        state.players().values().all(|p| p.has_ended())
    }
}

impl GameState {
    /// Apply `input` for the active player.
    pub fn next(&self, input: GameInput) -> GameResult<GameState> {
        self.next_for(self.active_player, input)
    }

    /// Apply `input` on behalf of `player`.
    ///
    /// Anyone but the active player is rejected, except an `Undo` sent by
    /// the owner of the undo slot.
    pub fn next_for(&self, player: PlayerId, input: GameInput) -> GameResult<GameState> {
        self.next_with_end_condition(player, input, &AllPlayersFinished)
    }

    pub fn next_with_end_condition(
        &self,
        player: PlayerId,
        input: GameInput,
        end: &dyn EndCondition,
    ) -> GameResult<GameState> {
        match self.apply(player, &input, end) {
            Ok(next) => {
                debug!("state {}: {player} applied {input}", next.game_state_id);
                Ok(next)
            }
            Err(err) => {
                if err.is_invariant() {
                    error!("state {}: {player} sent {input}: {err}", self.game_state_id);
                } else {
                    warn!("state {}: rejected {input} from {player}: {err}", self.game_state_id);
                }
                Err(err)
            }
        }
    }

    fn apply(&self, player: PlayerId, input: &GameInput, end: &dyn EndCondition) -> GameResult<GameState> {
        ensure!(!self.game_over, "Game is over");
        ensure!(self.players.get(player).is_some(), "Unknown player {player}");

        if *input == GameInput::Undo {
            return self.apply_undo(player);
        }
        ensure!(player == self.active_player, "Not your turn");

        let mut next = self.clone();
        if !self.pending.is_empty() || input.is_continuation() {
            next.pending.pop_matching(input)?;
            dispatch_continuation(&mut next, input)?;
        } else {
            let mut start = self.clone();
            start.undo = None;
            next.undo = Some(UndoSnapshot { owner: player, state: Box::new(start) });
            self.dispatch_base(&mut next, player, input)?;
        }

        // === Commit ===
        next.game_state_id += 1;
        next.played_inputs.push_back(InputRecord {
            player,
            input: input.clone(),
            game_state_id: next.game_state_id,
        });
        if next.pending.is_empty() && !input.retains_turn() {
            turn::advance_turn(&mut next);
        }
        if end.is_game_over(&next) {
            next.game_over = true;
            next.pending.clear();
            next.log_plain(log_parts!["The game has ended."]);
            info!("game over at state {}", next.game_state_id);
        }
        Ok(next)
    }

    fn apply_undo(&self, player: PlayerId) -> GameResult<GameState> {
        let snapshot = self
            .undo
            .as_ref()
            .filter(|u| u.owner == player)
            .ok_or_else(|| GameError::validation("Nothing to undo"))?;
        let mut next = (*snapshot.state).clone();
        next.undo = None;
        next.game_state_id = self.game_state_id + 1;
        next.played_inputs.push_back(InputRecord {
            player,
            input: GameInput::Undo,
            game_state_id: next.game_state_id,
        });
        next.log_plain(log_parts![player, " undid their last action."]);
        Ok(next)
    }

    fn dispatch_base(&self, next: &mut GameState, player: PlayerId, input: &GameInput) -> GameResult<()> {
        match input {
            GameInput::PlaceWorker { location } => {
                location.can_play_check(self, input)?;
                next.place_worker(player, WorkerPlacement::Location(*location))?;
                next.log(*location, log_parts![player, " placed a worker on ", *location, "."]);
                location.play(next, input)
            }
            GameInput::VisitDestinationCard { card } => {
                let name = self
                    .find_played(*card)
                    .map(|c| c.card_name)
                    .ok_or_else(|| GameError::validation("Unable to find the selected card"))?;
                name.can_play_check(self, input)?;
                next.place_worker(player, WorkerPlacement::Card { card: name, target: *card })?;
                next.log(name, log_parts![player, " placed a worker on ", name, "."]);
                if card.owner != player {
                    next.player_mut(card.owner).gain_resources(ResourceMap::of(ResourceType::Vp, 1));
                    next.log(name, log_parts![card.owner, " gained 1 VP from the visit."]);
                }
                name.play(next, input)
            }
            GameInput::PlayCard(play) => {
                play.card.can_play_check(self, input)?;
                play_card::play_card(next, input, play)
            }
            GameInput::ClaimEvent { event } => {
                event.can_play_check(self, input)?;
                next.place_worker(player, WorkerPlacement::Event(*event))?;
                next.player_mut(player).claimed_events.entry(*event).or_default();
                next.log(*event, log_parts![player, " claimed ", *event, "."]);
                event.play(next, input)
            }
            GameInput::PlayAdornment { adornment } => {
                ensure!(self.options.pearlbrook, "Adornments are not part of this game");
                adornment.can_play_check(self, input)?;
                adornment.play(next, input)
            }
            GameInput::ReserveCard { card } => {
                play_card::can_reserve_check(self, *card)?;
                play_card::reserve_card(next, *card)
            }
            GameInput::PrepareForSeason => {
                turn::can_prepare_for_season_check(self)?;
                turn::prepare_for_season(next)
            }
            GameInput::GameEnd => {
                turn::can_end_check(self)?;
                turn::end_game_for_player(next)
            }
            other => Err(GameError::invariant(format!("{:?} is not a base input", other.kind()))),
        }
    }

    // === Legal inputs ===

    /// Every input the active player may submit now.
    ///
    /// With a pending decision this is the decision's template (selection
    /// empty). Card plays list one payment per payment method.
    #[must_use]
    pub fn get_possible_game_inputs(&self) -> Vec<GameInput> {
        if self.game_over {
            return Vec::new();
        }
        if let Some(top) = self.pending.top() {
            return vec![top.clone()];
        }
        let mut inputs = self.base_inputs();
        if turn::can_end_check(self).is_ok() {
            inputs.push(GameInput::GameEnd);
        }
        if self.can_undo(self.active_player) {
            inputs.push(GameInput::Undo);
        }
        inputs
    }

    /// Legal base inputs other than `GameEnd` and `Undo`.
    pub(crate) fn base_inputs(&self) -> Vec<GameInput> {
        let player = self.active();
        let mut inputs = Vec::new();
        if player.has_ended() {
            return inputs;
        }

        for location in self.locations_in_game() {
            let input = GameInput::PlaceWorker { location };
            if location.can_play(self, &input) {
                inputs.push(input);
            }
        }

        for owner in self.players.values() {
            for card in owner.played_cards().iter().filter(|c| c.definition().hosts_workers()) {
                let input = GameInput::VisitDestinationCard { card: card.card_ref() };
                if card.card_name.can_play(self, &input) {
                    inputs.push(input);
                }
            }
        }

        for &event in self.events.keys() {
            let input = GameInput::ClaimEvent { event };
            if event.can_play(self, &input) {
                inputs.push(input);
            }
        }

        for (card, source) in self.playable_sources() {
            for payment in self.payment_candidates(card, source) {
                let input = GameInput::PlayCard(PlayCardInput::new(card, source, payment));
                if card.can_play(self, &input) && !inputs.contains(&input) {
                    inputs.push(input);
                }
            }
        }

        if self.options.pearlbrook {
            for &adornment in &player.adornments_in_hand {
                let input = GameInput::PlayAdornment { adornment };
                if adornment.can_play(self, &input) {
                    inputs.push(input);
                }
            }
        }

        for &card in &self.meadow {
            let input = GameInput::ReserveCard { card };
            if play_card::can_reserve_check(self, card).is_ok() && !inputs.contains(&input) {
                inputs.push(input);
            }
        }

        if turn::can_prepare_for_season_check(self).is_ok() {
            inputs.push(GameInput::PrepareForSeason);
        }
        inputs
    }

    fn playable_sources(&self) -> Vec<(CardName, CardSource)> {
        let player = self.active();
        let mut sources: Vec<(CardName, CardSource)> = Vec::new();
        let mut add = |card: CardName, source: CardSource| {
            if !sources.contains(&(card, source)) {
                sources.push((card, source));
            }
        };
        for &card in &player.cards_in_hand {
            add(card, CardSource::Hand);
        }
        for &card in &self.meadow {
            add(card, CardSource::Meadow);
        }
        if let Some(slots) = &self.station_cards {
            for (slot, card) in slots.iter().enumerate() {
                if let Some(card) = card {
                    add(*card, CardSource::Station(slot));
                }
            }
        }
        if let ReservedCard::Reserved(card) = player.reserved_card {
            add(card, CardSource::Reserved);
        }
        sources
    }

    /// One representative payment per method the active player has.
    fn payment_candidates(&self, card: CardName, source: CardSource) -> Vec<PaymentOptions> {
        let player = self.active();
        let def = card.definition();
        let cost = def.base_cost;
        let have = player.resources;
        let mut out = Vec::new();

        if have.contains(&cost) {
            out.push(PaymentOptions::resources(cost));
        }

        if def.is_critter {
            if player.has_unoccupied_associated_construction(card) {
                out.push(PaymentOptions::associated_card());
            }
            if player.num_golden_leaf > 0 {
                let mut targets: Vec<CardName> = player
                    .played_cards()
                    .iter()
                    .filter(|c| c.is_unoccupied_construction() && c.card_name.card_type() == def.card_type)
                    .map(|c| c.card_name)
                    .collect();
                targets.sort();
                targets.dedup();
                out.extend(targets.into_iter().map(PaymentOptions::golden_leaf));
            }
            if player.has_card_in_city(CardName::Innkeeper) {
                let mut discounted = cost;
                discounted.berry = cost.berry.saturating_sub(3);
                if have.contains(&discounted) {
                    out.push(PaymentOptions::using_card(CardName::Innkeeper, discounted));
                }
            }
        }

        if player.has_card_in_city(CardName::Queen) {
            out.push(PaymentOptions::using_card(CardName::Queen, ResourceMap::NONE));
        }

        if let Some(paid) = any3_payment(&have, &cost) {
            for delegate in [CardName::Crane, CardName::Inventor] {
                if player.has_card_in_city(delegate) {
                    out.push(PaymentOptions::using_card(delegate, paid));
                }
            }
            if source == CardSource::Meadow && player.has_card_in_city(CardName::Inn) {
                out.push(PaymentOptions::using_card(CardName::Inn, paid));
            }
            if player.can_invoke_dungeon() {
                let mut prisoners: Vec<CardName> = player
                    .played_cards()
                    .iter()
                    .map(|c| c.card_name)
                    .filter(|c| c.is_critter())
                    .collect();
                prisoners.sort();
                prisoners.dedup();
                out.extend(prisoners.into_iter().map(|p| PaymentOptions::dungeon(p, paid)));
            }
        }
        out
    }

    // === Scoring ===

    /// Points per seat, in seat order.
    #[must_use]
    pub fn final_scores(&self) -> Vec<(PlayerId, i32)> {
        self.players
            .values()
            .map(|p| (p.player_id, p.get_points(self)))
            .collect()
    }

    /// Winner(s) once the game is over.
    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        if !self.game_over {
            return None;
        }
        let scores = self.final_scores();
        let best = scores.iter().map(|(_, s)| *s).max()?;
        let mut winners: Vec<PlayerId> = scores.iter().filter(|(_, s)| *s == best).map(|(p, _)| *p).collect();
        Some(if winners.len() == 1 {
            GameOutcome::Winner(winners.remove(0))
        } else {
            GameOutcome::Winners(winners)
        })
    }
}

/// Route a continuation to the entity named by its context.
fn dispatch_continuation(state: &mut GameState, input: &GameInput) -> GameResult<()> {
    let context = input
        .context()
        .ok_or_else(|| GameError::invariant("continuation without a prompt"))?;
    match context.source {
        EntityRef::Card(card) => card.play(state, input),
        EntityRef::Location(location) => location.play(state, input),
        EntityRef::Event(event) => event.play(state, input),
        EntityRef::Adornment(adornment) => adornment.play(state, input),
        EntityRef::Visitor(visitor) => visitor.play(state, input),
        EntityRef::TrainCarTile(tile) => tile.play(state, input),
        EntityRef::Season(season) => turn::resolve_season(state, season, input, context.purpose),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameOptions;
    use crate::player::Player;

    fn two_players(seed: u64) -> GameState {
        let players = vec![Player::new("A", PlayerId::new(0), "a"), Player::new("B", PlayerId::new(1), "b")];
        GameState::initial(players, GameOptions::base(), seed).unwrap()
    }

    #[test]
    fn test_game_outcome_is_winner() {
        let result = GameOutcome::Winner(PlayerId::new(1));
        assert!(!result.is_winner(PlayerId::new(0)));
        assert!(result.is_winner(PlayerId::new(1)));

        let tie = GameOutcome::Winners(vec![PlayerId::new(0), PlayerId::new(2)]);
        assert!(tie.is_winner(PlayerId::new(0)));
        assert!(!tie.is_winner(PlayerId::new(1)));
    }

    #[test]
    fn test_place_worker_passes_turn() {
        let state = two_players(3);
        let next = state
            .next(GameInput::PlaceWorker { location: crate::board::LocationName::BasicOneBerry })
            .unwrap();
        assert_eq!(next.game_state_id(), state.game_state_id() + 1);
        assert_eq!(next.active_player_id(), PlayerId::new(1));
        assert_eq!(next.player(PlayerId::new(0)).resources.berry, 1);
        assert_eq!(next.played_inputs().count(), 1);
    }

    #[test]
    fn test_wrong_player_rejected() {
        let state = two_players(3);
        let err = state
            .next_for(PlayerId::new(1), GameInput::PlaceWorker { location: crate::board::LocationName::BasicOneBerry })
            .unwrap_err();
        assert_eq!(err.reason(), "Not your turn");
    }

    #[test]
    fn test_undo_owner_only() {
        let state = two_players(5);
        let next = state
            .next(GameInput::PlaceWorker { location: crate::board::LocationName::BasicOnePebble })
            .unwrap();
        assert!(next.can_undo(PlayerId::new(0)));
        assert!(!next.can_undo(PlayerId::new(1)));
        assert!(next.next_for(PlayerId::new(1), GameInput::Undo).is_err());

        let undone = next.next_for(PlayerId::new(0), GameInput::Undo).unwrap();
        assert_eq!(undone.active_player_id(), PlayerId::new(0));
        assert_eq!(undone.player(PlayerId::new(0)).resources.pebble, 0);
        assert!(!undone.can_undo(PlayerId::new(0)));
        assert!(undone.game_state_id() > next.game_state_id());
    }

    #[test]
    fn test_possible_inputs_include_basic_locations() {
        let state = two_players(9);
        let inputs = state.get_possible_game_inputs();
        assert!(inputs.contains(&GameInput::PlaceWorker { location: crate::board::LocationName::BasicOneBerry }));
        assert!(!inputs.contains(&GameInput::PrepareForSeason));
        assert!(!inputs.contains(&GameInput::GameEnd));
        assert!(!inputs.contains(&GameInput::Undo));
        for input in &inputs {
            assert!(state.next(input.clone()).is_ok(), "{input}");
        }
    }
}
