//! Turn pipeline integration tests.
//!
//! These tests drive `GameState::next` and `next_for` the way a server
//! would: one input at a time, always from a committed state.

use everdell_engine::board::LocationName;
use everdell_engine::core::PlayedCardId;
use everdell_engine::{
    CardName, GameInput, GameOptions, GameOutcome, GameState, PlayedCard, Player, PlayerId, PlayerStatus,
    ResourceMap, Season,
};

fn new_game(seed: u64) -> GameState {
    let players = vec![Player::new("Ana", PlayerId::new(0), "a"), Player::new("Bo", PlayerId::new(1), "b")];
    GameState::initial(players, GameOptions::base(), seed).unwrap()
}

fn p0() -> PlayerId {
    PlayerId::new(0)
}

fn p1() -> PlayerId {
    PlayerId::new(1)
}

fn place(location: LocationName) -> GameInput {
    GameInput::PlaceWorker { location }
}

/// Put both seats in the same season with the given worker count.
fn in_season(state: &GameState, season: Season, workers: u32) -> GameState {
    let mut snap = state.to_snapshot(true);
    for player in &mut snap.players {
        player.current_season = season;
        player.num_workers = workers;
    }
    GameState::from_snapshot(snap).unwrap()
}

fn with_city(state: &GameState, seat: usize, cards: &[CardName]) -> GameState {
    let mut snap = state.to_snapshot(true);
    let owner = PlayerId::new(seat as u8);
    for &card in cards {
        let id = PlayedCardId(snap.next_played_card_id);
        snap.next_played_card_id += 1;
        snap.players[seat].played_cards.push(PlayedCard::new(id, card, owner));
    }
    GameState::from_snapshot(snap).unwrap()
}

fn with_location(state: &GameState, location: LocationName) -> GameState {
    let mut snap = state.to_snapshot(true);
    if !snap.locations.iter().any(|(l, _)| *l == location) {
        snap.locations.push((location, Vec::new()));
    }
    GameState::from_snapshot(snap).unwrap()
}

// =============================================================================
// Pipeline
// =============================================================================

/// Test that a committed input bumps the id, records the input and passes the turn.
#[test]
fn test_place_worker_commits() {
    let state = new_game(1);
    let next = state.next(place(LocationName::BasicThreeTwig)).unwrap();

    assert_eq!(next.game_state_id(), state.game_state_id() + 1);
    assert_eq!(next.player(p0()).resources, ResourceMap::new(3, 0, 0, 0));
    assert_eq!(next.player(p0()).num_available_workers(), 1);
    assert_eq!(next.active_player_id(), p1());
    assert_eq!(next.played_inputs().count(), 1);
    assert!(next.game_log().count() > state.game_log().count());
}

/// Test that an exclusive location only takes one worker.
#[test]
fn test_exclusive_location_blocks_second_worker() {
    let state = new_game(1).next(place(LocationName::BasicThreeTwig)).unwrap();
    let err = state.next(place(LocationName::BasicThreeTwig)).unwrap_err();
    assert!(err.is_validation());
    assert!(err.reason().contains("already occupied"));
}

/// Test that every listed input is accepted.
#[test]
fn test_possible_inputs_are_legal() {
    let state = new_game(9);
    let inputs = state.get_possible_game_inputs();
    assert!(!inputs.is_empty());
    for input in inputs {
        assert!(state.next(input.clone()).is_ok(), "rejected {input:?}");
    }
}

// =============================================================================
// Atomicity
// =============================================================================

/// Test that rejected inputs leave the state untouched.
#[test]
fn test_rejected_input_changes_nothing() {
    let state = new_game(2);
    let before = state.clone();

    let err = state.next_for(p1(), place(LocationName::BasicOneBerry)).unwrap_err();
    assert_eq!(err.reason(), "Not your turn");
    assert!(state.next(GameInput::PrepareForSeason).is_err());
    assert!(state.next(place(LocationName::JourneyTwo)).is_err());

    assert_eq!(state, before);
}

/// Test that an unknown seat is rejected.
#[test]
fn test_unknown_player_rejected() {
    let state = new_game(2);
    assert!(state.next_for(PlayerId::new(3), place(LocationName::BasicOneBerry)).is_err());
}

// =============================================================================
// Pending Decisions
// =============================================================================

/// Test that a pending decision keeps the turn and blocks other inputs.
#[test]
fn test_pending_decision_discipline() {
    let state = with_location(&new_game(4), LocationName::ForestTwoWild);
    let asked = state.next(place(LocationName::ForestTwoWild)).unwrap();

    assert_eq!(asked.active_player_id(), p0());
    let template = asked.pending_input().cloned().unwrap();
    assert_eq!(asked.get_possible_game_inputs(), vec![template.clone()]);

    // Base inputs and other seats are refused.
    let err = asked.next(place(LocationName::BasicOneBerry)).unwrap_err();
    assert!(err.reason().starts_with("Must resolve pending input first"));
    let answer = template.clone().with_resources(ResourceMap::new(1, 0, 0, 1));
    assert!(asked.next_for(p1(), answer.clone()).is_err());

    // Wrong amount is a validation error that leaves the prompt in place.
    assert!(asked.next(template.clone().with_resources(ResourceMap::new(3, 0, 0, 0))).is_err());
    assert!(asked.pending_input().is_some());

    let done = asked.next(answer).unwrap();
    assert!(done.pending_input().is_none());
    assert_eq!(done.player(p0()).resources, ResourceMap::new(1, 0, 0, 1));
    assert_eq!(done.active_player_id(), p1());
}

/// Test that a continuation with no pending decision is rejected.
#[test]
fn test_continuation_without_pending() {
    let state = with_location(&new_game(4), LocationName::ForestTwoWild);
    let template = state.next(place(LocationName::ForestTwoWild)).unwrap().pending_input().cloned().unwrap();
    let err = state.next(template.with_resources(ResourceMap::new(2, 0, 0, 0))).unwrap_err();
    assert_eq!(err.reason(), "No pending input to resolve");
}

// =============================================================================
// Undo
// =============================================================================

/// Test that only the player who made the last move can undo it.
#[test]
fn test_undo_last_move() {
    let state = new_game(5);
    let moved = state.next(place(LocationName::BasicOneBerry)).unwrap();

    assert!(moved.can_undo(p0()));
    assert!(!moved.can_undo(p1()));
    assert_eq!(moved.next_for(p1(), GameInput::Undo).unwrap_err().reason(), "Nothing to undo");

    let undone = moved.next_for(p0(), GameInput::Undo).unwrap();
    assert_eq!(undone.player(p0()).resources, ResourceMap::NONE);
    assert_eq!(undone.active_player_id(), p0());
    assert_eq!(undone.game_state_id(), moved.game_state_id() + 1);
    assert!(!undone.can_undo(p0()));
}

/// Test that the next player's move replaces the undo snapshot.
#[test]
fn test_undo_window_closes() {
    let state = new_game(5)
        .next(place(LocationName::BasicOneBerry))
        .unwrap()
        .next(place(LocationName::BasicOneBerry))
        .unwrap();

    assert!(!state.can_undo(p0()));
    assert!(state.can_undo(p1()));
    assert!(state.get_possible_game_inputs().iter().all(|i| *i != GameInput::Undo));
}

// =============================================================================
// Seasons
// =============================================================================

/// Test that preparing for a season recalls workers and adds new ones.
#[test]
fn test_prepare_for_spring() {
    let state = new_game(6);
    assert_eq!(
        state.next(GameInput::PrepareForSeason).unwrap_err().reason(),
        "Still have workers available to place"
    );

    let state = state
        .next(place(LocationName::BasicOneBerry))
        .unwrap()
        .next(place(LocationName::BasicOneBerry))
        .unwrap()
        .next(place(LocationName::BasicOneBerry))
        .unwrap()
        .next(place(LocationName::BasicOneBerry))
        .unwrap();
    assert_eq!(state.player(p0()).num_available_workers(), 0);

    let spring = state.next(GameInput::PrepareForSeason).unwrap();
    let player = spring.player(p0());
    assert_eq!(player.current_season, Season::Spring);
    assert_eq!(player.num_workers, 3);
    assert!(player.placed_workers.is_empty());
    assert_eq!(spring.active_player_id(), p1());
}

/// Test that Spring runs production for the player's city.
#[test]
fn test_spring_production() {
    let state = with_city(&in_season(&new_game(7), Season::Winter, 0), 0, &[CardName::Mine, CardName::Farm]);
    let spring = state.next(GameInput::PrepareForSeason).unwrap();
    assert_eq!(spring.player(p0()).resources, ResourceMap::new(0, 0, 1, 1));
}

/// Test that Summer offers Meadow cards before the turn passes.
#[test]
fn test_summer_meadow_pick() {
    let state = in_season(&new_game(8), Season::Spring, 0);
    let hand_before = state.player(p0()).num_cards_in_hand();

    let summer = state.next(GameInput::PrepareForSeason).unwrap();
    assert_eq!(summer.active_player_id(), p0());
    let GameInput::SelectCards(prompt) = summer.pending_input().cloned().unwrap() else {
        panic!("expected a card selection");
    };
    assert_eq!(prompt.max_to_select, 2);

    let pick = prompt.card_options[0];
    let answer = summer.pending_input().cloned().unwrap().with_selected_cards(vec![pick]);
    let done = summer.next(answer).unwrap();

    assert_eq!(done.player(p0()).num_cards_in_hand(), hand_before + 1);
    assert!(done.player(p0()).cards_in_hand.contains(&pick));
    assert_eq!(done.meadow().len(), 8);
    assert_eq!(done.active_player_id(), p1());
}

/// Test that Autumn is the last season.
#[test]
fn test_no_season_after_autumn() {
    let state = in_season(&new_game(8), Season::Autumn, 0);
    assert_eq!(
        state.next(GameInput::PrepareForSeason).unwrap_err().reason(),
        "Cannot prepare for season in Autumn"
    );
}

// =============================================================================
// Game End
// =============================================================================

/// Test that ending is refused while the player still has moves.
#[test]
fn test_game_end_requires_no_moves() {
    let state = new_game(10);
    assert!(state.get_possible_game_inputs().iter().all(|i| *i != GameInput::GameEnd));
    assert_eq!(
        state.next(GameInput::GameEnd).unwrap_err().reason(),
        "Cannot end your game while you still have moves"
    );
}

/// Test that the game is over once every player has ended.
#[test]
fn test_all_players_end() {
    let state = with_city(&in_season(&new_game(11), Season::Autumn, 0), 0, &[CardName::Mine]);
    assert!(state.get_possible_game_inputs().contains(&GameInput::GameEnd));

    let one = state.next(GameInput::GameEnd).unwrap();
    assert_eq!(one.player(p0()).status, PlayerStatus::GameEnded);
    assert_eq!(one.active_player_id(), p1());
    assert!(!one.is_game_over());
    assert_eq!(one.outcome(), None);

    let over = one.next(GameInput::GameEnd).unwrap();
    assert!(over.is_game_over());
    assert!(over.get_possible_game_inputs().is_empty());
    assert_eq!(over.next(GameInput::GameEnd).unwrap_err().reason(), "Game is over");

    assert_eq!(over.final_scores(), vec![(p0(), 2), (p1(), 0)]);
    assert_eq!(over.outcome(), Some(GameOutcome::Winner(p0())));
}

/// Test that equal scores share the win.
#[test]
fn test_tie_shares_win() {
    let over = in_season(&new_game(12), Season::Autumn, 0)
        .next(GameInput::GameEnd)
        .unwrap()
        .next(GameInput::GameEnd)
        .unwrap();
    let outcome = over.outcome().unwrap();
    assert_eq!(outcome, GameOutcome::Winners(vec![p0(), p1()]));
    assert!(outcome.is_winner(p1()));
}
