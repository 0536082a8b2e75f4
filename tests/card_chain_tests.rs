//! Multi-step card and expansion effects driven through `GameState::next`.
//!
//! Every decision is answered from the pending template, the way a client
//! would. Each effect is also checked on a table where there is nothing to
//! choose from.

use everdell_engine::board::LocationName;
use everdell_engine::core::PlayedCardId;
use everdell_engine::expansions::{AdornmentName, TrainCarTileName, VisitorName};
use everdell_engine::{
    CardName, CardSource, GameInput, GameOptions, GameState, GameStateSnapshot, NewleafOptions, PaymentOptions,
    PlayCardInput, PlayedCard, PlayedCardRef, Player, PlayerId, ResourceMap, ResourceType, Season,
};

fn new_game(options: GameOptions, seed: u64) -> GameState {
    let players = vec![Player::new("Ana", PlayerId::new(0), "a"), Player::new("Bo", PlayerId::new(1), "b")];
    GameState::initial(players, options, seed).unwrap()
}

fn p0() -> PlayerId {
    PlayerId::new(0)
}

fn p1() -> PlayerId {
    PlayerId::new(1)
}

/// Rebuild `state` after editing its private snapshot.
fn edit(state: &GameState, change: impl FnOnce(&mut GameStateSnapshot)) -> GameState {
    let mut snap = state.to_snapshot(true);
    change(&mut snap);
    GameState::from_snapshot(snap).unwrap()
}

fn add_to_city(snap: &mut GameStateSnapshot, seat: usize, cards: &[CardName]) {
    let owner = PlayerId::new(seat as u8);
    for &card in cards {
        let id = PlayedCardId(snap.next_played_card_id);
        snap.next_played_card_id += 1;
        snap.players[seat].played_cards.push(PlayedCard::new(id, card, owner));
    }
}

fn set_hand(snap: &mut GameStateSnapshot, seat: usize, hand: &[CardName]) {
    snap.players[seat].cards_in_hand = Some(hand.to_vec());
    snap.players[seat].num_cards_in_hand = hand.len();
}

fn card_ref(state: &GameState, seat: PlayerId, card: CardName) -> PlayedCardRef {
    state.player(seat).first_played(card).unwrap().card_ref()
}

fn visit(card: PlayedCardRef) -> GameInput {
    GameInput::VisitDestinationCard { card }
}

fn play_from_hand(card: CardName, resources: ResourceMap) -> GameInput {
    GameInput::PlayCard(PlayCardInput::new(card, CardSource::Hand, PaymentOptions::resources(resources)))
}

fn template(state: &GameState) -> GameInput {
    state.pending_input().cloned().unwrap()
}

fn card_options(input: &GameInput) -> Vec<CardName> {
    match input {
        GameInput::SelectCards(select) => select.card_options.clone(),
        other => panic!("expected a card choice, got {other:?}"),
    }
}

fn option_strings(input: &GameInput) -> Vec<String> {
    match input {
        GameInput::SelectOptionGeneric(select) => select.options.clone(),
        other => panic!("expected an option choice, got {other:?}"),
    }
}

fn logged(state: &GameState, text: &str) -> bool {
    state.game_log().any(|entry| entry.contains_text(text))
}

// =============================================================================
// Destination Cards
// =============================================================================

/// Test that the Inn plays a Meadow card and asks for the rest of the price.
#[test]
fn test_inn_plays_meadow_card_at_discount() {
    let state = edit(&new_game(GameOptions::base(), 21), |snap| {
        add_to_city(snap, 0, &[CardName::Inn]);
        snap.meadow = vec![CardName::School];
        snap.players[0].resources = ResourceMap::new(1, 0, 0, 0);
    });
    let inn = visit(card_ref(&state, p0(), CardName::Inn));
    assert!(state.get_possible_game_inputs().contains(&inn));

    let asked = state.next(inn).unwrap();
    let pick = template(&asked);
    assert_eq!(card_options(&pick), vec![CardName::School]);

    // School costs 2 TWIG and 2 RESIN, so one unit is still owed.
    let paying = asked.next(pick.with_selected_cards(vec![CardName::School])).unwrap();
    assert_eq!(paying.pending().len(), 1);
    assert_eq!(paying.active_player_id(), p0());

    let pay = template(&paying);
    assert!(paying.next(pay.clone().with_resources(ResourceMap::new(2, 0, 0, 0))).is_err());
    let after = paying.next(pay.with_resources(ResourceMap::new(1, 0, 0, 0))).unwrap();

    let player = after.player(p0());
    assert!(player.has_card_in_city(CardName::School));
    assert_eq!(player.resources, ResourceMap::NONE);
    assert!(after.pending().is_empty());
    assert_eq!(after.active_player_id(), p1());
}

/// Test that the Inn skips a card the supply covers by count but not by kind.
#[test]
fn test_inn_skips_cards_short_by_kind() {
    let state = edit(&new_game(GameOptions::base(), 21), |snap| {
        add_to_city(snap, 0, &[CardName::Inn]);
        snap.meadow = vec![CardName::School];
        snap.players[0].resources = ResourceMap::new(0, 0, 0, 1);
    });
    let inn = visit(card_ref(&state, p0(), CardName::Inn));

    assert!(!state.get_possible_game_inputs().contains(&inn));
    let err = state.next(inn).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.reason(), "No Meadow card can be afforded with the Inn");
}

/// Test that the Post Office gives two cards, then offers a discard and refills the hand.
#[test]
fn test_post_office_gives_discards_and_refills() {
    let state = edit(&new_game(GameOptions::base(), 22), |snap| {
        add_to_city(snap, 0, &[CardName::PostOffice]);
        set_hand(snap, 0, &[CardName::Farm, CardName::Mine, CardName::Wanderer]);
        set_hand(snap, 1, &[]);
    });

    let choose = state.next(visit(card_ref(&state, p0(), CardName::PostOffice))).unwrap();
    let give = choose.next(template(&choose).with_player(Some(p1()))).unwrap();
    assert_eq!(card_options(&template(&give)), vec![CardName::Farm, CardName::Mine, CardName::Wanderer]);

    let discard = give
        .next(template(&give).with_selected_cards(vec![CardName::Farm, CardName::Mine]))
        .unwrap();
    assert_eq!(discard.player(p1()).cards_in_hand, vec![CardName::Farm, CardName::Mine]);
    assert_eq!(card_options(&template(&discard)), vec![CardName::Wanderer]);

    let after = discard
        .next(template(&discard).with_selected_cards(vec![CardName::Wanderer]))
        .unwrap();
    assert_eq!(after.player(p0()).num_cards_in_hand(), 8);
    assert!(after.pending().is_empty());
    assert_eq!(after.active_player_id(), p1());
}

/// Test that the Post Office skips the discard when the hand is empty after giving.
#[test]
fn test_post_office_empty_hand_skips_discard() {
    let state = edit(&new_game(GameOptions::base(), 22), |snap| {
        add_to_city(snap, 0, &[CardName::PostOffice]);
        set_hand(snap, 0, &[CardName::Farm, CardName::Mine]);
        set_hand(snap, 1, &[]);
    });

    let choose = state.next(visit(card_ref(&state, p0(), CardName::PostOffice))).unwrap();
    let give = choose.next(template(&choose).with_player(Some(p1()))).unwrap();
    let after = give
        .next(template(&give).with_selected_cards(vec![CardName::Farm, CardName::Mine]))
        .unwrap();

    assert!(after.pending().is_empty());
    assert_eq!(after.player(p0()).num_cards_in_hand(), 8);
    assert_eq!(after.active_player_id(), p1());
    assert!(logged(&after, "had no CARD to discard"));
}

/// Test that the Lookout copies a basic location.
#[test]
fn test_lookout_copies_location() {
    let state = edit(&new_game(GameOptions::base(), 23), |snap| {
        add_to_city(snap, 0, &[CardName::Lookout]);
        snap.players[0].resources = ResourceMap::NONE;
    });

    let asked = state.next(visit(card_ref(&state, p0(), CardName::Lookout))).unwrap();
    let GameInput::SelectLocation(select) = template(&asked) else {
        panic!("expected a location choice");
    };
    assert!(select.location_options.contains(&LocationName::BasicThreeTwig));
    assert!(select
        .location_options
        .iter()
        .all(|l| LocationName::BASIC.contains(l) || LocationName::FOREST.contains(l)));

    let after = asked
        .next(template(&asked).with_location(LocationName::BasicThreeTwig))
        .unwrap();
    assert_eq!(after.player(p0()).resources, ResourceMap::new(3, 0, 0, 0));
    assert_eq!(after.active_player_id(), p1());
}

/// Test that the Queen plays a cheap card for free.
#[test]
fn test_queen_plays_card_for_free() {
    let state = edit(&new_game(GameOptions::base(), 24), |snap| {
        add_to_city(snap, 0, &[CardName::Queen]);
        set_hand(snap, 0, &[CardName::Farm]);
        snap.players[0].resources = ResourceMap::NONE;
    });

    let asked = state.next(visit(card_ref(&state, p0(), CardName::Queen))).unwrap();
    assert!(card_options(&template(&asked)).contains(&CardName::Farm));

    let after = asked.next(template(&asked).with_selected_cards(vec![CardName::Farm])).unwrap();
    let player = after.player(p0());
    assert!(player.has_card_in_city(CardName::Farm));
    assert!(player.cards_in_hand.is_empty());
    // The Farm produces on entering the city.
    assert_eq!(player.resources, ResourceMap::new(0, 0, 0, 1));
}

/// Test that the Queen cannot be visited with nothing worth up to 3 VP to play.
#[test]
fn test_queen_needs_a_cheap_card() {
    let state = edit(&new_game(GameOptions::base(), 24), |snap| {
        add_to_city(snap, 0, &[CardName::Queen]);
        set_hand(snap, 0, &[]);
        snap.meadow = vec![CardName::Castle, CardName::Palace];
    });
    let queen = visit(card_ref(&state, p0(), CardName::Queen));

    assert!(!state.get_possible_game_inputs().contains(&queen));
    assert_eq!(state.next(queen).unwrap_err().reason(), "No card worth up to 3 VP can be played");
}

/// Test that the University refunds a card, then asks for a resource on top.
#[test]
fn test_university_stacks_resource_choice() {
    let state = edit(&new_game(GameOptions::base(), 25), |snap| {
        add_to_city(snap, 0, &[CardName::University, CardName::Farm]);
        snap.players[0].resources = ResourceMap::NONE;
    });
    let farm = card_ref(&state, p0(), CardName::Farm);

    let asked = state.next(visit(card_ref(&state, p0(), CardName::University))).unwrap();
    let gain = asked.next(template(&asked).with_selected_played_cards(vec![farm])).unwrap();
    assert_eq!(gain.active_player_id(), p0());
    assert_eq!(option_strings(&template(&gain)).len(), 4);

    let after = gain.next(template(&gain).with_option(ResourceType::Pebble.to_string())).unwrap();
    let player = after.player(p0());
    assert!(!player.has_card_in_city(CardName::Farm));
    assert_eq!(player.resources, ResourceMap::new(2, 1, 1, 0).with_vp(1));
    assert!(after.pending().is_empty());
}

// =============================================================================
// Travelers
// =============================================================================

/// Test that the Ruins can replace the only construction in the city.
#[test]
fn test_ruins_replaces_only_construction() {
    let state = edit(&new_game(GameOptions::base(), 26), |snap| {
        add_to_city(snap, 0, &[CardName::Farm]);
        set_hand(snap, 0, &[CardName::Ruins]);
        snap.players[0].resources = ResourceMap::NONE;
    });
    let farm = card_ref(&state, p0(), CardName::Farm);
    let discarded = state.discard_len();

    let asked = state.next(play_from_hand(CardName::Ruins, ResourceMap::NONE)).unwrap();
    let after = asked.next(template(&asked).with_selected_played_cards(vec![farm])).unwrap();

    let player = after.player(p0());
    assert!(player.has_card_in_city(CardName::Ruins));
    assert!(!player.has_card_in_city(CardName::Farm));
    assert_eq!(player.resources, CardName::Farm.base_cost());
    assert_eq!(player.num_cards_in_hand(), 2);
    assert_eq!(after.discard_len(), discarded + 1);
    assert!(after.pending().is_empty());
    assert_eq!(after.active_player_id(), p1());
}

/// Test that the Ruins needs a construction to replace.
#[test]
fn test_ruins_needs_a_construction() {
    let state = edit(&new_game(GameOptions::base(), 26), |snap| {
        set_hand(snap, 0, &[CardName::Ruins]);
    });
    let err = state.next(play_from_hand(CardName::Ruins, ResourceMap::NONE)).unwrap_err();
    assert_eq!(err.reason(), "Unable to add Ruins to city");
}

/// Test that the Fool is paid for by its player and lands in an opponent's city.
#[test]
fn test_fool_goes_to_opponent() {
    let state = edit(&new_game(GameOptions::base(), 27), |snap| {
        set_hand(snap, 0, &[CardName::Fool]);
        snap.players[0].resources = ResourceMap::new(0, 0, 0, 3);
    });

    let asked = state.next(play_from_hand(CardName::Fool, ResourceMap::new(0, 0, 0, 3))).unwrap();
    assert!(asked.next(template(&asked)).is_err());
    let after = asked.next(template(&asked).with_player(Some(p1()))).unwrap();

    assert!(after.player(p1()).has_card_in_city(CardName::Fool));
    assert!(!after.player(p0()).has_card_in_city(CardName::Fool));
    assert_eq!(after.player(p0()).resources, ResourceMap::NONE);
    assert_eq!(after.active_player_id(), p1());
}

/// Test that the Fool is refused when no opponent can take it.
#[test]
fn test_fool_needs_an_open_city() {
    let state = edit(&new_game(GameOptions::base(), 27), |snap| {
        add_to_city(snap, 1, &[CardName::Fool]);
        set_hand(snap, 0, &[CardName::Fool]);
        snap.players[0].resources = ResourceMap::new(0, 0, 0, 3);
    });
    let err = state.next(play_from_hand(CardName::Fool, ResourceMap::new(0, 0, 0, 3))).unwrap_err();
    assert_eq!(err.reason(), "No opponent can take the Fool");
}

/// Test that the Undertaker discards three Meadow cards, then keeps one.
#[test]
fn test_undertaker_discards_then_keeps() {
    let state = edit(&new_game(GameOptions::base(), 28), |snap| {
        set_hand(snap, 0, &[CardName::Undertaker]);
        snap.players[0].resources = ResourceMap::new(0, 0, 0, 2);
    });
    let discarded = state.discard_len();

    let asked = state.next(play_from_hand(CardName::Undertaker, ResourceMap::new(0, 0, 0, 2))).unwrap();
    let meadow = card_options(&template(&asked));
    assert_eq!(meadow.len(), 8);

    let keep = asked.next(template(&asked).with_selected_cards(meadow[..3].to_vec())).unwrap();
    assert_eq!(keep.discard_len(), discarded + 3);
    let kept = card_options(&template(&keep))[0];

    let after = keep.next(template(&keep).with_selected_cards(vec![kept])).unwrap();
    assert_eq!(after.player(p0()).cards_in_hand, vec![kept]);
    assert_eq!(after.meadow().len(), 8);
    assert!(after.pending().is_empty());
}

/// Test that the Undertaker skips its prompts when the Meadow is empty.
#[test]
fn test_undertaker_empty_meadow() {
    let state = edit(&new_game(GameOptions::base(), 28), |snap| {
        set_hand(snap, 0, &[CardName::Undertaker]);
        snap.players[0].resources = ResourceMap::new(0, 0, 0, 2);
        snap.meadow = Vec::new();
    });

    let after = state.next(play_from_hand(CardName::Undertaker, ResourceMap::new(0, 0, 0, 2))).unwrap();
    assert!(after.player(p0()).has_card_in_city(CardName::Undertaker));
    assert!(after.pending().is_empty());
    assert_eq!(after.active_player_id(), p1());
    assert!(logged(&after, "found no CARD in the Meadow"));
}

// =============================================================================
// Adornments
// =============================================================================

fn with_adornment(state: &GameState, adornment: AdornmentName) -> GameState {
    edit(state, |snap| {
        snap.players[0].adornments_in_hand = Some(vec![adornment]);
        snap.players[0].num_adornments_in_hand = 1;
        snap.players[0].resources = ResourceMap::NONE.with_pearl(1);
        if !snap.locations.iter().any(|(l, _)| *l == LocationName::ForestThreeBerry) {
            snap.locations.push((LocationName::ForestThreeBerry, Vec::new()));
        }
    })
}

/// Test that the Hourglass stacks a resource choice above the forest copy.
#[test]
fn test_hourglass_resolves_stacked_decisions() {
    let state = with_adornment(&new_game(GameOptions::base().with_pearlbrook(), 29), AdornmentName::Hourglass);

    let asked = state.next(GameInput::PlayAdornment { adornment: AdornmentName::Hourglass }).unwrap();
    assert_eq!(asked.pending().len(), 2);
    assert!(matches!(template(&asked), GameInput::SelectOptionGeneric(_)));

    let copy = asked.next(template(&asked).with_option(ResourceType::Pebble.to_string())).unwrap();
    assert_eq!(copy.pending().len(), 1);
    assert_eq!(copy.active_player_id(), p0());
    // Basic locations cannot be copied by the Hourglass.
    assert!(copy.next(template(&copy).with_location(LocationName::BasicThreeTwig)).is_err());

    let after = copy
        .next(template(&copy).with_location(LocationName::ForestThreeBerry))
        .unwrap();
    let player = after.player(p0());
    assert_eq!(player.resources, ResourceMap::new(0, 0, 1, 3));
    assert_eq!(player.played_adornments, vec![AdornmentName::Hourglass]);
    assert!(after.pending().is_empty());
    assert_eq!(after.active_player_id(), p1());
}

/// Test that the Gilded Book is spent without a prompt when the city has no GOVERNANCE.
#[test]
fn test_gilded_book_without_governance() {
    let state = with_adornment(&new_game(GameOptions::base().with_pearlbrook(), 29), AdornmentName::GildedBook);

    let after = state.next(GameInput::PlayAdornment { adornment: AdornmentName::GildedBook }).unwrap();
    assert!(after.pending().is_empty());
    assert_eq!(after.player(p0()).resources, ResourceMap::NONE);
    assert_eq!(after.active_player_id(), p1());
    assert!(logged(&after, "has no GOVERNANCE"));
}

// =============================================================================
// Visitors and Train Cars
// =============================================================================

fn newleaf_game(seed: u64) -> GameState {
    new_game(GameOptions::base().with_newleaf(NewleafOptions::all()), seed)
}

fn ready_for(state: &GameState, season: Season) -> GameState {
    edit(state, |snap| {
        for player in &mut snap.players {
            player.current_season = season;
            player.num_workers = 0;
        }
    })
}

/// Test that Summer asks for Meadow cards above the visitor invite.
#[test]
fn test_summer_stacks_meadow_pick_over_invite() {
    let state = ready_for(&newleaf_game(30), Season::Spring);

    let summer = state.next(GameInput::PrepareForSeason).unwrap();
    assert_eq!(summer.pending().len(), 2);
    assert!(matches!(template(&summer), GameInput::SelectCards(_)));

    let invite = summer.next(template(&summer).with_selected_cards(Vec::new())).unwrap();
    let options = option_strings(&template(&invite));
    let visitor = VisitorName::ALL
        .into_iter()
        .find(|v| v.to_string() == options[0])
        .unwrap();

    let after = invite.next(template(&invite).with_option(options[0].clone())).unwrap();
    assert_eq!(after.player(p0()).claimed_visitors, vec![visitor]);
    assert!(after.pending().is_empty());
    assert_eq!(after.active_player_id(), p1());
}

/// Test that a visitor invite can be declined.
#[test]
fn test_invite_declined() {
    let state = ready_for(&newleaf_game(31), Season::Winter);

    let invite = state.next(GameInput::PrepareForSeason).unwrap();
    let options = option_strings(&template(&invite));
    assert_eq!(options.last().map(String::as_str), Some("Decline"));

    let after = invite.next(template(&invite).with_option("Decline")).unwrap();
    assert!(after.player(p0()).claimed_visitors.is_empty());
    assert_eq!(after.player(p0()).current_season, Season::Spring);
    assert!(after.pending().is_empty());
}

/// Test that taking a station card pays out the train car tile under it.
#[test]
fn test_station_card_pays_train_car_tile() {
    let state = edit(&newleaf_game(32), |snap| {
        snap.station_cards = Some(vec![Some(CardName::Farm), Some(CardName::Mine), Some(CardName::Inn)]);
        snap.train_car_tiles.as_mut().unwrap().revealed[0] = Some(TrainCarTileName::OneAny);
        set_hand(snap, 0, &[]);
        snap.players[0].resources = ResourceMap::NONE;
    });

    let asked = state.next(GameInput::PlaceWorker { location: LocationName::Station }).unwrap();
    assert_eq!(card_options(&template(&asked)), vec![CardName::Farm, CardName::Mine, CardName::Inn]);

    let gain = asked.next(template(&asked).with_selected_cards(vec![CardName::Farm])).unwrap();
    assert_eq!(gain.pending().len(), 1);
    assert!(matches!(template(&gain), GameInput::SelectOptionGeneric(_)));

    let after = gain.next(template(&gain).with_option(ResourceType::Resin.to_string())).unwrap();
    let player = after.player(p0());
    assert_eq!(player.cards_in_hand, vec![CardName::Farm]);
    assert_eq!(player.resources, ResourceMap::new(0, 1, 0, 0));
    assert!(after.pending().is_empty());
    assert_eq!(after.active_player_id(), p1());
}
