//! Property-based tests for the rules engine.
//!
//! These tests use proptest to check that commit discipline, payment
//! validation and city limits hold across random games and inputs.

use everdell_engine::board::LocationName;
use everdell_engine::core::config::{CITY_CAPACITY, HAND_LIMIT};
use everdell_engine::core::PlayedCardId;
use everdell_engine::player::is_paid_resources_valid;
use everdell_engine::{
    CardName, Discount, GameInput, GameOptions, GameState, PlayedCard, Player, PlayerId, ResourceMap, ResourceType,
};
use proptest::prelude::*;

fn new_game(seed: u64) -> GameState {
    let players = vec![Player::new("Ana", PlayerId::new(0), "a"), Player::new("Bo", PlayerId::new(1), "b")];
    GameState::initial(players, GameOptions::base(), seed).unwrap()
}

fn check_invariants(state: &GameState) -> Result<(), TestCaseError> {
    for player in state.players().values() {
        prop_assert!(player.occupied_spaces() <= CITY_CAPACITY);
        prop_assert!(player.num_cards_in_hand() <= HAND_LIMIT);
        prop_assert!(player.num_available_workers() <= player.num_workers);
    }
    if state.pending_input().is_some() {
        prop_assert_eq!(state.get_possible_game_inputs().len(), 1);
    }
    if state.is_game_over() {
        prop_assert!(state.pending_input().is_none());
        prop_assert!(state.get_possible_game_inputs().is_empty());
    }
    Ok(())
}

/// Largest option list whose every subset is tried.
const EXHAUSTIVE_OPTIONS: usize = 6;

/// Index sets of `len` options with between `min` and `max` picks.
///
/// Short lists are enumerated in full. Longer ones get the leading and
/// trailing runs of each size and every single pick.
fn selections(len: usize, min: usize, max: usize) -> Vec<Vec<usize>> {
    let max = max.min(len);
    let mut out: Vec<Vec<usize>> = Vec::new();
    if len <= EXHAUSTIVE_OPTIONS {
        for mask in 0u32..(1 << len) {
            let picked: Vec<usize> = (0..len).filter(|i| mask & (1 << i) != 0).collect();
            if (min..=max).contains(&picked.len()) {
                out.push(picked);
            }
        }
        return out;
    }
    for k in min..=max {
        out.push((0..k).collect());
        out.push((len - k..len).collect());
    }
    if min <= 1 && max >= 1 {
        out.extend((0..len).map(|i| vec![i]));
    }
    out.sort();
    out.dedup();
    out
}

/// Every split of `n` units over `kinds`; large amounts go to one kind.
fn distributions(n: u32, kinds: &[ResourceType]) -> Vec<ResourceMap> {
    if n as usize > EXHAUSTIVE_OPTIONS {
        return kinds.iter().map(|&r| ResourceMap::of(r, n)).collect();
    }
    let mut out = Vec::new();
    spread(n, kinds, ResourceMap::NONE, &mut out);
    out
}

fn spread(left: u32, kinds: &[ResourceType], acc: ResourceMap, out: &mut Vec<ResourceMap>) {
    match kinds {
        [] => {}
        [last] => {
            let mut done = acc;
            done.set(*last, left);
            out.push(done);
        }
        [first, rest @ ..] => {
            for take in 0..=left {
                let mut next = acc;
                next.set(*first, take);
                spread(left - take, rest, next, out);
            }
        }
    }
}

/// Answers to a pending template built only from its own options.
fn candidate_answers(state: &GameState, template: &GameInput) -> Vec<GameInput> {
    let supply = state.active().resources;
    match template {
        GameInput::SelectCards(select) => {
            selections(select.card_options.len(), select.min_to_select, select.max_to_select)
                .into_iter()
                .map(|picked| {
                    let cards = picked.into_iter().map(|i| select.card_options[i]).collect();
                    template.clone().with_selected_cards(cards)
                })
                .collect()
        }
        GameInput::SelectPlayedCards(select) => {
            selections(select.card_options.len(), select.min_to_select, select.max_to_select)
                .into_iter()
                .map(|picked| {
                    let cards = picked.into_iter().map(|i| select.card_options[i]).collect();
                    template.clone().with_selected_played_cards(cards)
                })
                .collect()
        }
        GameInput::SelectResources(select) => {
            let kinds: Vec<ResourceType> = match select.specific_resource {
                Some(only) => vec![only],
                None => ResourceType::BASIC.to_vec(),
            };
            (select.min_resources..=select.max_resources)
                .flat_map(|n| distributions(n, &kinds))
                .filter(|amounts| !select.to_spend || supply.contains(amounts))
                .map(|amounts| template.clone().with_resources(amounts))
                .collect()
        }
        GameInput::SelectLocation(select) => select
            .location_options
            .iter()
            .map(|&location| template.clone().with_location(location))
            .collect(),
        GameInput::SelectOptionGeneric(select) => select
            .options
            .iter()
            .map(|option| template.clone().with_option(option.clone()))
            .collect(),
        GameInput::SelectPlayer(select) => select
            .player_options
            .iter()
            .map(|&player| Some(player))
            .chain([None])
            .map(|player| template.clone().with_player(player))
            .collect(),
        GameInput::SelectWorkerPlacement(select) => select
            .options
            .iter()
            .map(|&placement| Some(placement))
            .chain([None])
            .map(|placement| template.clone().with_worker(placement))
            .collect(),
        GameInput::SelectPlayedAdornment(select) => select
            .adornment_options
            .iter()
            .map(|&adornment| template.clone().with_adornment(adornment))
            .chain([template.clone()])
            .collect(),
        _ => Vec::new(),
    }
}

prop_compose! {
    fn arbitrary_cost()(twig in 0..5u32, resin in 0..4u32, pebble in 0..3u32, berry in 0..5u32) -> ResourceMap {
        ResourceMap::new(twig, resin, pebble, berry)
    }
}

prop_compose! {
    fn arbitrary_basic()(index in 0..4usize) -> ResourceType {
        ResourceType::BASIC[index]
    }
}

fn arbitrary_city_card() -> impl Strategy<Value = CardName> {
    prop::sample::select(vec![
        CardName::Mine,
        CardName::Farm,
        CardName::Greenhouse,
        CardName::Husband,
        CardName::Wife,
        CardName::Wanderer,
        CardName::TwigBarge,
        CardName::ResinRefinery,
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Random playouts: every listed input is accepted, every pending
    /// decision has an answer among its own options, and each commit bumps
    /// the id by one and leaves the table in a consistent shape.
    #[test]
    fn random_playout_keeps_invariants(seed in any::<u64>(), picks in prop::collection::vec(any::<usize>(), 40)) {
        let mut state = new_game(seed);
        for pick in picks {
            let before = state.clone();
            let accepted: Vec<GameState> = match state.pending_input().cloned() {
                Some(template) => {
                    let accepted: Vec<_> = candidate_answers(&state, &template)
                        .into_iter()
                        .filter_map(|answer| state.next(answer).ok())
                        .collect();
                    prop_assert!(!accepted.is_empty(), "seed {}: no answer accepted for {}", seed, template);
                    accepted
                }
                None => {
                    let inputs = state.get_possible_game_inputs();
                    if inputs.is_empty() {
                        break;
                    }
                    let mut accepted = Vec::with_capacity(inputs.len());
                    for input in inputs {
                        let next = state.next(input.clone()).map_err(|err| {
                            TestCaseError::fail(format!("seed {seed}: listed input {input} rejected: {err}"))
                        })?;
                        accepted.push(next);
                    }
                    accepted
                }
            };
            prop_assert_eq!(&state, &before);

            let next = accepted[pick % accepted.len()].clone();
            prop_assert_eq!(next.game_state_id(), state.game_state_id() + 1);
            check_invariants(&next)?;
            state = next;
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// A rejected input never changes the state it was applied to.
    #[test]
    fn rejected_input_is_atomic(seed in any::<u64>(), seat in 0..4u8) {
        let state = new_game(seed);
        let before = state.clone();
        let _ = state.next_for(PlayerId::new(seat), GameInput::PrepareForSeason);
        let _ = state.next_for(PlayerId::new(seat), GameInput::GameEnd);
        let _ = state.next_for(PlayerId::new(seat), GameInput::Undo);
        prop_assert_eq!(state, before);
    }

    /// While a decision is pending nothing but its answer is accepted.
    #[test]
    fn pending_decision_blocks_base_inputs(seed in any::<u64>(), first in 0..3u32) {
        let mut snap = new_game(seed).to_snapshot(true);
        if !snap.locations.iter().any(|(l, _)| *l == LocationName::ForestTwoWild) {
            snap.locations.push((LocationName::ForestTwoWild, Vec::new()));
        }
        let state = GameState::from_snapshot(snap).unwrap();
        let base_inputs = state.get_possible_game_inputs();
        let asked = state.next(GameInput::PlaceWorker { location: LocationName::ForestTwoWild }).unwrap();

        for input in base_inputs {
            prop_assert!(asked.next(input).is_err());
        }

        let template = asked.pending_input().cloned().unwrap();
        let gained = ResourceMap::new(first, 2 - first, 0, 0);
        let done = asked.next(template.with_resources(gained)).unwrap();
        prop_assert!(done.pending_input().is_none());
        prop_assert_eq!(done.player(PlayerId::new(0)).resources, gained);
    }

    /// Exact payment is always valid and short payment never is.
    #[test]
    fn exact_payment_is_valid(cost in arbitrary_cost(), short in arbitrary_basic()) {
        prop_assert!(is_paid_resources_valid(&cost, &cost, None, true));

        if cost.get(short) > 0 {
            let mut paid = cost;
            paid.set(short, cost.get(short) - 1);
            prop_assert!(!is_paid_resources_valid(&paid, &cost, None, true));
        }
    }

    /// Validation is a pure function of its arguments.
    #[test]
    fn payment_check_is_deterministic(paid in arbitrary_cost(), cost in arbitrary_cost(), r in arbitrary_basic()) {
        for discount in [None, Some(Discount::Any3), Some(Discount::Resource(r))] {
            for overpay in [true, false] {
                let first = is_paid_resources_valid(&paid, &cost, discount, overpay);
                prop_assert_eq!(first, is_paid_resources_valid(&paid, &cost, discount, overpay));
            }
        }
    }

    /// A discount never turns an acceptable payment into a rejected one.
    #[test]
    fn discount_never_hurts(paid in arbitrary_cost(), cost in arbitrary_cost(), r in arbitrary_basic()) {
        if is_paid_resources_valid(&paid, &cost, None, false) {
            prop_assert!(is_paid_resources_valid(&paid, &cost, Some(Discount::Any3), false));
            prop_assert!(is_paid_resources_valid(&paid, &cost, Some(Discount::Resource(r)), false));
        }
    }

    /// Any3 settles a cost with three units removed.
    #[test]
    fn any3_covers_three_units(cost in arbitrary_cost()) {
        let mut paid = cost;
        let mut waived = 0;
        for r in ResourceType::BASIC {
            while waived < 3 && paid.get(r) > 0 {
                paid.set(r, paid.get(r) - 1);
                waived += 1;
            }
        }
        prop_assert!(is_paid_resources_valid(&paid, &cost, Some(Discount::Any3), true));
    }

    /// Cards admitted one by one never push a city past its capacity.
    #[test]
    fn city_never_exceeds_capacity(cards in prop::collection::vec(arbitrary_city_card(), 0..30)) {
        let mut state = new_game(1);
        let owner = PlayerId::new(0);
        for card in cards {
            if !state.player(owner).can_add_to_city(card, true) {
                continue;
            }
            let mut snap = state.to_snapshot(true);
            let id = PlayedCardId(snap.next_played_card_id);
            snap.next_played_card_id += 1;
            snap.players[0].played_cards.push(PlayedCard::new(id, card, owner));
            state = GameState::from_snapshot(snap).unwrap();
            prop_assert!(state.player(owner).occupied_spaces() <= CITY_CAPACITY);
        }
    }
}
