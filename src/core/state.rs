//! Game state.
//!
//! ## GameState
//!
//! Everything a match needs to continue:
//! - Players, the active seat and the sequence id
//! - Deck, discard pile and Meadow
//! - Location and event occupancy
//! - The pending-input stack
//! - The applied-input log and the human-readable game log
//! - Expansion state (adornment pile, station, train car tiles, visitors)
//! - The single undo slot
//! - RNG
//!
//! Instances are produced by `initial` or by `next` (see `rules::engine`).
//! The mutating helpers here are crate-private so effect code can change the
//! working copy while outside callers only ever see committed states.
//!
//! Piles and logs use `im` persistent structures, so the working copy that
//! `next` clones is cheap.

use im::Vector;
use std::collections::BTreeMap;

use super::config::{
    GameOptions, ADORNMENTS_PER_PLAYER, BASE_HAND_SIZE, COPIES_PER_REVEALED_ENTRY, GOLDEN_LEAVES, MAX_PLAYERS,
    MEADOW_SIZE, MIN_PLAYERS, STATION_SLOTS, TRAIN_CAR_WINDOW, VISITOR_WINDOW,
};
use super::entity::{EntityRef, PlayedCardId, PlayedCardRef, WorkerPlacement};
use super::input::{GameInput, InputRecord};
use super::log::{GameLogEntry, LogPart};
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::board::{EventName, LocationName};
use crate::cards::{CardName, PlayedCard};
use crate::error::{ensure, GameError, GameResult};
use crate::expansions::{AdornmentName, TrainCarTileName, VisitorName};
use crate::player::Player;
use crate::stack::PendingInputStack;
use crate::zones::{CardStack, RevealedStack};

/// The state a player can return to with `Undo`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndoSnapshot {
    /// Player whose base input created the snapshot.
    pub owner: PlayerId,
    pub state: Box<GameState>,
}

/// Full game state including private information.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub(crate) game_state_id: u64,
    pub(crate) options: GameOptions,
    pub(crate) players: PlayerMap<Player>,
    pub(crate) active_player: PlayerId,

    // === Cards ===
    pub(crate) deck: CardStack<CardName>,
    pub(crate) discard: CardStack<CardName>,
    pub(crate) meadow: Vec<CardName>,

    // === Board ===
    pub(crate) locations: BTreeMap<LocationName, Vec<PlayerId>>,
    /// Every event in the game and who claimed it.
    pub(crate) events: BTreeMap<EventName, Option<PlayerId>>,

    // === Resolution ===
    pub(crate) pending: PendingInputStack,
    pub(crate) played_inputs: Vector<InputRecord>,
    pub(crate) game_log: Vector<GameLogEntry>,

    // === Expansions ===
    pub(crate) adornments_pile: Option<CardStack<AdornmentName>>,
    pub(crate) station_cards: Option<Vec<Option<CardName>>>,
    pub(crate) train_car_tiles: Option<RevealedStack<TrainCarTileName>>,
    pub(crate) visitors: Option<RevealedStack<VisitorName>>,

    pub(crate) undo: Option<UndoSnapshot>,
    pub(crate) game_over: bool,
    pub(crate) rng: GameRng,
    pub(crate) next_played_card_id: u32,
}

impl GameState {
    /// Set up a new match.
    ///
    /// Players must be listed in seat order. The deck is shuffled with
    /// `seed`, the Meadow is dealt, each seat draws `5 + seat` cards and the
    /// forest and special events are picked at random.
    pub fn initial(players: Vec<Player>, options: GameOptions, seed: u64) -> GameResult<GameState> {
        let count = players.len();
        ensure!(
            (MIN_PLAYERS..=MAX_PLAYERS).contains(&count),
            "Unable to create a game with {count} players"
        );
        for (i, player) in players.iter().enumerate() {
            ensure!(
                player.player_id.index() == i,
                "{} is seated out of order",
                player.player_id
            );
        }

        let mut rng = GameRng::new(seed);

        let mut cards: Vec<CardName> = CardName::deck_cards(options.pearlbrook, options.newleaf.cards).collect();
        rng.shuffle(&mut cards);
        let deck = CardStack::from_items("Deck", cards);

        let forest_count = if count == 2 { 3 } else { 4 };
        let mut locations = BTreeMap::new();
        let forest = rng.choose_multiple(&LocationName::FOREST, forest_count);
        for location in LocationName::BASIC
            .into_iter()
            .chain(forest)
            .chain([LocationName::Haven])
            .chain(LocationName::JOURNEY)
        {
            locations.insert(location, Vec::new());
        }
        if options.newleaf.station {
            locations.insert(LocationName::Station, Vec::new());
        }

        let mut events = BTreeMap::new();
        let special = rng.choose_multiple(&EventName::SPECIAL, 4);
        for event in EventName::BASIC.into_iter().chain(special) {
            events.insert(event, None);
        }
        if options.pearlbrook {
            for wonder in EventName::WONDERS {
                events.insert(wonder, None);
            }
        }

        let train_car_tiles = options.newleaf.station.then(|| {
            RevealedStack::build(&TrainCarTileName::ALL, COPIES_PER_REVEALED_ENTRY, TRAIN_CAR_WINDOW, &mut rng)
        });
        let visitors = options
            .newleaf
            .visitors
            .then(|| RevealedStack::build(&VisitorName::ALL, COPIES_PER_REVEALED_ENTRY, VISITOR_WINDOW, &mut rng));

        let mut state = GameState {
            game_state_id: 0,
            options,
            players: PlayerMap::from_vec(players),
            active_player: PlayerId::new(0),
            deck,
            discard: CardStack::new("Discard"),
            meadow: Vec::with_capacity(MEADOW_SIZE),
            locations,
            events,
            pending: PendingInputStack::new(),
            played_inputs: Vector::new(),
            game_log: Vector::new(),
            adornments_pile: None,
            station_cards: None,
            train_car_tiles,
            visitors,
            undo: None,
            game_over: false,
            rng,
            next_played_card_id: 0,
        };

        state.replenish_meadow();
        if options.newleaf.station {
            let slots = (0..STATION_SLOTS).map(|_| state.draw_from_deck()).collect();
            state.station_cards = Some(slots);
        }

        let ids: Vec<PlayerId> = state.players.player_ids().collect();
        for pid in &ids {
            state.draw_cards(*pid, BASE_HAND_SIZE + pid.index());
        }

        if options.pearlbrook {
            let mut adornments = AdornmentName::ALL.to_vec();
            state.rng.shuffle(&mut adornments);
            let mut pile = CardStack::from_items("Adornments", adornments);
            for pid in &ids {
                for _ in 0..ADORNMENTS_PER_PLAYER {
                    if let Some(adornment) = pile.draw() {
                        state.players[*pid].adornments_in_hand.push(adornment);
                    }
                }
            }
            state.adornments_pile = Some(pile);
        }
        if options.newleaf.golden_leaf {
            for player in state.players.values_mut() {
                player.num_golden_leaf = GOLDEN_LEAVES;
            }
        }

        state.log_plain(vec![LogPart::from(format!("Game created with {count} players."))]);
        log::info!("created game with {count} players (seed {seed})");
        Ok(state)
    }

    // === Accessors ===

    /// Sequence id, bumped by every committed input.
    #[must_use]
    pub fn game_state_id(&self) -> u64 {
        self.game_state_id
    }

    #[must_use]
    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    #[must_use]
    pub fn active_player_id(&self) -> PlayerId {
        self.active_player
    }

    #[must_use]
    pub fn active(&self) -> &Player {
        &self.players[self.active_player]
    }

    /// A seat's player. Panics on an unknown seat; use `get_player` for
    /// ids from outside the engine.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> &Player {
        &self.players[player]
    }

    #[must_use]
    pub fn get_player(&self, player: PlayerId) -> Option<&Player> {
        self.players.get(player)
    }

    pub(crate) fn player_mut(&mut self, player: PlayerId) -> &mut Player {
        &mut self.players[player]
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Every other seat, in seat order.
    #[must_use]
    pub fn opponents_of(&self, player: PlayerId) -> Vec<PlayerId> {
        self.players.player_ids().filter(|&p| p != player).collect()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[must_use]
    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    #[must_use]
    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    #[must_use]
    pub fn meadow(&self) -> &[CardName] {
        &self.meadow
    }

    /// Workers on a location, or `None` if it is not in this game.
    #[must_use]
    pub fn location_occupants(&self, location: LocationName) -> Option<&Vec<PlayerId>> {
        self.locations.get(&location)
    }

    pub fn locations_in_game(&self) -> impl Iterator<Item = LocationName> + '_ {
        self.locations.keys().copied()
    }

    #[must_use]
    pub fn events(&self) -> &BTreeMap<EventName, Option<PlayerId>> {
        &self.events
    }

    #[must_use]
    pub fn station_cards(&self) -> Option<&[Option<CardName>]> {
        self.station_cards.as_deref()
    }

    #[must_use]
    pub fn train_car_tiles(&self) -> Option<&RevealedStack<TrainCarTileName>> {
        self.train_car_tiles.as_ref()
    }

    #[must_use]
    pub fn visitors(&self) -> Option<&RevealedStack<VisitorName>> {
        self.visitors.as_ref()
    }

    #[must_use]
    pub fn pending(&self) -> &PendingInputStack {
        &self.pending
    }

    /// The decision that must be answered next, if any.
    #[must_use]
    pub fn pending_input(&self) -> Option<&GameInput> {
        self.pending.top()
    }

    pub fn played_inputs(&self) -> impl Iterator<Item = &InputRecord> {
        self.played_inputs.iter()
    }

    pub fn game_log(&self) -> impl Iterator<Item = &GameLogEntry> {
        self.game_log.iter()
    }

    /// Whether `player` owns the undo slot.
    #[must_use]
    pub fn can_undo(&self, player: PlayerId) -> bool {
        self.undo.as_ref().is_some_and(|u| u.owner == player)
    }

    // === Game log ===

    /// Append a log line attributed to `source`.
    pub(crate) fn log(&mut self, source: impl Into<EntityRef>, parts: Vec<LogPart>) {
        self.game_log.push_back(GameLogEntry::new(Some(source.into()), parts));
    }

    pub(crate) fn log_plain(&mut self, parts: Vec<LogPart>) {
        self.game_log.push_back(GameLogEntry::new(None, parts));
    }

    /// Flatten a log line to text, naming players.
    #[must_use]
    pub fn render_log_entry(&self, entry: &GameLogEntry) -> String {
        entry
            .parts
            .iter()
            .map(|part| match part {
                LogPart::Text(t) => t.clone(),
                LogPart::Player(p) => self.players.get(*p).map_or_else(|| p.to_string(), |pl| pl.name.clone()),
                LogPart::Entity(e) => e.to_string(),
                LogPart::Resources(r) => r.to_string(),
            })
            .collect()
    }

    // === Pending ===

    pub(crate) fn push_pending(&mut self, input: GameInput) -> GameResult<()> {
        self.pending.push(input)
    }

    // === Deck and discard ===

    /// Top card of the deck, shuffling the discard pile in when it runs out.
    fn draw_from_deck(&mut self) -> Option<CardName> {
        if self.deck.is_empty() && !self.discard.is_empty() {
            let cards = self.discard.take_all();
            for card in cards {
                self.deck.add_to_top(card);
            }
            self.deck.shuffle(&mut self.rng);
            self.log_plain(vec![LogPart::from("The discard pile was shuffled into the deck.")]);
            log::debug!("reshuffled discard into deck ({} cards)", self.deck.len());
        }
        self.deck.draw()
    }

    /// Draw up to `n` cards into a hand, stopping at the hand limit.
    ///
    /// Returns the number drawn.
    pub(crate) fn draw_cards(&mut self, player: PlayerId, n: usize) -> usize {
        let wanted = n.min(self.players[player].hand_space());
        let mut drawn = 0;
        while drawn < wanted {
            let Some(card) = self.draw_from_deck() else { break };
            self.players[player].add_card_to_hand(card);
            drawn += 1;
        }
        drawn
    }

    /// Take up to `n` cards off the deck face up.
    pub(crate) fn reveal_cards(&mut self, n: usize) -> Vec<CardName> {
        (0..n).map_while(|_| self.draw_from_deck()).collect()
    }

    /// Take up to `n` cards off the top of the discard pile.
    pub(crate) fn reveal_from_discard(&mut self, n: usize) -> Vec<CardName> {
        (0..n).map_while(|_| self.discard.draw()).collect()
    }

    pub(crate) fn discard_cards(&mut self, cards: impl IntoIterator<Item = CardName>) {
        for card in cards {
            self.discard.add_to_top(card);
        }
    }

    /// Give cards to a player; whatever does not fit in hand is discarded.
    ///
    /// Returns the number kept.
    pub(crate) fn add_or_discard(&mut self, player: PlayerId, cards: Vec<CardName>) -> usize {
        let space = self.players[player].hand_space();
        let mut kept = 0;
        for card in cards {
            if kept < space {
                self.players[player].add_card_to_hand(card);
                kept += 1;
            } else {
                self.discard.add_to_top(card);
            }
        }
        kept
    }

    // === Meadow ===

    pub(crate) fn take_from_meadow(&mut self, card: CardName) -> GameResult<()> {
        let idx = self
            .meadow
            .iter()
            .position(|&c| c == card)
            .ok_or_else(|| GameError::validation(format!("{card} is not in the Meadow")))?;
        self.meadow.remove(idx);
        Ok(())
    }

    /// Refill the Meadow to its full size.
    pub(crate) fn replenish_meadow(&mut self) {
        while self.meadow.len() < MEADOW_SIZE {
            let Some(card) = self.draw_from_deck() else { break };
            self.meadow.push(card);
        }
    }

    // === Station and visitors ===

    #[must_use]
    pub fn station_slot_of(&self, card: CardName) -> Option<usize> {
        self.station_cards.as_ref()?.iter().position(|&c| c == Some(card))
    }

    /// Take the card in a station slot and collect the train car tile under
    /// it. The slot is refilled from the deck and the tile rotates to the
    /// bottom of its stack.
    pub(crate) fn take_station_card(&mut self, slot: usize) -> GameResult<CardName> {
        let card = self
            .station_cards
            .as_mut()
            .and_then(|slots| slots.get_mut(slot))
            .and_then(Option::take)
            .ok_or_else(|| GameError::validation(format!("No card in station slot {}", slot + 1)))?;
        let refill = self.draw_from_deck();
        if let Some(slots) = self.station_cards.as_mut() {
            slots[slot] = refill;
        }

        let tile = match self.train_car_tiles.as_ref() {
            Some(tiles) => tiles.peek_at(slot)?.copied(),
            None => None,
        };
        if let Some(tile) = tile {
            tile.apply(self)?;
            if let Some(tiles) = self.train_car_tiles.as_mut() {
                tiles.replace_at(slot)?;
            }
        }
        Ok(card)
    }

    /// Remove a revealed visitor for good.
    pub(crate) fn take_visitor(&mut self, visitor: VisitorName) -> GameResult<()> {
        let stack = self
            .visitors
            .as_mut()
            .ok_or_else(|| GameError::validation("Visitors are not part of this game"))?;
        let position = stack
            .position_of(&visitor)
            .ok_or_else(|| GameError::validation(format!("{visitor} is not available")))?;
        stack.take_at(position)?;
        Ok(())
    }

    // === Cities ===

    /// Put a new record for `card` into a city.
    pub(crate) fn add_to_city(&mut self, player: PlayerId, card: CardName) -> GameResult<PlayedCardRef> {
        ensure!(self.players[player].can_add_to_city(card, true), "Unable to add {card} to city");
        let id = PlayedCardId(self.next_played_card_id);
        self.next_played_card_id += 1;
        self.players[player].insert_played_card(PlayedCard::new(id, card, player));
        Ok(PlayedCardRef::new(player, id))
    }

    /// Take a record out of its city. Workers on it go back to their owners.
    pub(crate) fn remove_from_city(&mut self, card: PlayedCardRef) -> GameResult<PlayedCard> {
        let removed = self
            .players
            .get_mut(card.owner)
            .and_then(|p| p.take_played_card(card.id))
            .ok_or_else(|| GameError::validation(format!("Unable to find {:?} in the city of {}", card.id, card.owner)))?;
        for worker in &removed.workers {
            let placed = &mut self.players[*worker].placed_workers;
            if let Some(idx) = placed
                .iter()
                .position(|p| matches!(p, WorkerPlacement::Card { target, .. } if *target == card))
            {
                placed.remove(idx);
            }
        }
        Ok(removed)
    }

    #[must_use]
    pub fn find_played(&self, card: PlayedCardRef) -> Option<&PlayedCard> {
        self.players.get(card.owner)?.find_played_card(card.id)
    }

    pub(crate) fn find_played_mut(&mut self, card: PlayedCardRef) -> Option<&mut PlayedCard> {
        self.players.get_mut(card.owner)?.find_played_card_mut(card.id)
    }

    // === Workers ===

    /// Record a worker of `player` at `placement`.
    pub(crate) fn place_worker(&mut self, player: PlayerId, placement: WorkerPlacement) -> GameResult<()> {
        ensure!(self.players[player].num_available_workers() > 0, "No more workers to place");
        match placement {
            WorkerPlacement::Location(location) => self
                .locations
                .get_mut(&location)
                .ok_or_else(|| GameError::validation(format!("{location} is not part of this game")))?
                .push(player),
            WorkerPlacement::Event(event) => {
                let slot = self
                    .events
                    .get_mut(&event)
                    .ok_or_else(|| GameError::validation(format!("{event} is not part of this game")))?;
                ensure!(slot.is_none(), "{event} has already been claimed");
                *slot = Some(player);
            }
            WorkerPlacement::Card { card, target } => {
                let played = self
                    .find_played_mut(target)
                    .ok_or_else(|| GameError::validation(format!("Unable to find {card}")))?;
                played.workers.push(player);
            }
        }
        self.players[player].placed_workers.push(placement);
        Ok(())
    }

    /// Take one worker back. Claimed events stay claimed.
    pub(crate) fn recall_worker(&mut self, player: PlayerId, placement: WorkerPlacement) -> GameResult<()> {
        let placed = &mut self.players[player].placed_workers;
        let idx = placed
            .iter()
            .position(|p| *p == placement)
            .ok_or_else(|| GameError::validation(format!("No worker on {placement}")))?;
        placed.remove(idx);

        match placement {
            WorkerPlacement::Location(location) => {
                if let Some(occupants) = self.locations.get_mut(&location) {
                    if let Some(i) = occupants.iter().position(|&p| p == player) {
                        occupants.remove(i);
                    }
                }
            }
            WorkerPlacement::Event(_) => {}
            WorkerPlacement::Card { target, .. } => {
                if let Some(card) = self.find_played_mut(target) {
                    if let Some(i) = card.workers.iter().position(|&p| p == player) {
                        card.workers.remove(i);
                    }
                }
            }
        }
        Ok(())
    }

    /// End-of-season recall. Fails while the player still has a worker to
    /// place. Workers on the Monastery and the Cemetery stay.
    pub(crate) fn recall_workers(&mut self, player: PlayerId) -> GameResult<()> {
        ensure!(
            self.players[player].num_available_workers() == 0,
            "Still have workers available to place"
        );
        let recalled: Vec<WorkerPlacement> = self.players[player]
            .placed_workers
            .iter()
            .copied()
            .filter(|p| !Player::is_permanent_placement(p))
            .collect();
        for placement in recalled {
            self.recall_worker(player, placement)?;
        }
        Ok(())
    }
}
