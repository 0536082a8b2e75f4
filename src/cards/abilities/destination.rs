//! Cards that host workers.
//!
//! The engine places the visiting worker before `visit` runs. Inn and Post
//! Office accept opponents' workers; the owner gains 1 VP when an opponent
//! visits.

use super::selected_payment;
use crate::board::LocationType;
use crate::cards::CardName;
use crate::core::config::HAND_LIMIT;
use crate::core::log::log_parts;
use crate::core::{
    CardSource, ContextTag, GameInput, GameState, PlayedCardRef, Prompt, Purpose, ResourceMap, SelectCards,
    SelectLocation, SelectOptionGeneric, SelectPlayedCards, SelectPlayer, SelectResources,
};
use crate::effects::{validate_choice, validate_selection, GainAnyResource};
use crate::error::{ensure, GameError, GameResult};
use crate::player::{any3_payment, is_paid_resources_valid, Discount};

const FROM_DECK: &str = "Deck";
const FROM_DISCARD: &str = "Discard pile";

fn prompt(card: CardName, purpose: Purpose, label: &str, target: PlayedCardRef) -> Prompt {
    Prompt::new(ContextTag::new(card, purpose), label).on_card(target)
}

/// Cards worth at most 3 VP that the active player could place for free.
fn free_play_options(state: &GameState) -> Vec<CardName> {
    let player = state.active();
    player
        .cards_in_hand
        .iter()
        .chain(state.meadow())
        .copied()
        .filter(|&c| c.base_vp() <= 3 && player.can_add_to_city(c, true))
        .collect()
}

/// Resources still owed for `card` after the Inn's 3-unit discount.
fn inn_owed(card: CardName) -> u32 {
    card.base_cost().total_basic().saturating_sub(3)
}

/// Meadow cards the active player could fit in their city and pay for,
/// kind by kind, after the Inn's discount.
fn inn_options(state: &GameState) -> Vec<CardName> {
    let player = state.active();
    state
        .meadow()
        .iter()
        .copied()
        .filter(|&c| player.can_add_to_city(c, true) && any3_payment(&player.resources, &c.base_cost()).is_some())
        .collect()
}

pub(super) fn can_visit_check(card: CardName, state: &GameState, target: PlayedCardRef) -> GameResult<()> {
    let visitor = state.active();
    let owner = state
        .get_player(target.owner)
        .ok_or_else(|| GameError::validation(format!("Unknown player {}", target.owner)))?;
    let played = owner
        .find_played_card(target.id)
        .ok_or_else(|| GameError::validation(format!("Unable to find {card} in the city of {}", target.owner)))?;
    ensure!(played.card_name == card, "Selected card is not {card}");
    ensure!(visitor.num_available_workers() > 0, "No more workers to place");
    ensure!(owner.card_accepts_worker(played, visitor.player_id), "Cannot place worker on {card}");

    match card {
        CardName::Storehouse => ensure!(!played.resources.is_empty(), "Nothing is stored on {card}"),
        CardName::Monastery => ensure!(visitor.resources.total_basic() >= 2, "Need 2 resources to give away"),
        CardName::PostOffice => ensure!(visitor.num_cards_in_hand() >= 2, "Need 2 CARD to give away"),
        CardName::University => ensure!(visitor.played_cards().len() > 1, "No other card in your city to discard"),
        CardName::Cemetery => ensure!(
            !(state.deck_len() == 0 && state.discard_len() == 0),
            "No cards to reveal"
        ),
        CardName::Inn => ensure!(!inn_options(state).is_empty(), "No Meadow card can be afforded with the Inn"),
        CardName::Queen => ensure!(!free_play_options(state).is_empty(), "No card worth up to 3 VP can be played"),
        _ => {}
    }
    Ok(())
}

pub(super) fn visit(card: CardName, state: &mut GameState, target: PlayedCardRef) -> GameResult<()> {
    use CardName::*;
    let player_id = state.active_player_id();

    match card {
        Storehouse => {
            let stored = state
                .find_played_mut(target)
                .map(|c| std::mem::take(&mut c.resources))
                .ok_or_else(|| GameError::invariant("Storehouse left the city"))?;
            state.player_mut(player_id).gain_resources(stored);
            state.log(card, log_parts![player_id, " took ", stored, " from ", card, "."]);
        }
        Chapel => {
            let vp = {
                let chapel = state
                    .find_played_mut(target)
                    .ok_or_else(|| GameError::invariant("Chapel left the city"))?;
                chapel.resources.vp += 1;
                chapel.resources.vp
            };
            let drawn = state.draw_cards(player_id, 2 * vp as usize);
            state.log(card, log_parts![player_id, format!(" placed 1 VP on Chapel and drew {drawn} CARD.")]);
        }
        Lookout => {
            let options: Vec<_> = state
                .locations_in_game()
                .filter(|l| matches!(l.location_type(), LocationType::Basic | LocationType::Forest))
                .collect();
            state.push_pending(GameInput::SelectLocation(SelectLocation {
                prompt: prompt(card, Purpose::Copy, "Select a location to copy", target),
                location_options: options,
                selected_location: None,
            }))?;
        }
        Inn => {
            let options = inn_options(state);
            ensure!(!options.is_empty(), "No Meadow card can be afforded with the Inn");
            state.push_pending(GameInput::SelectCards(SelectCards {
                prompt: prompt(card, Purpose::Main, "Select a Meadow CARD to play for 3 fewer resources", target),
                card_options: options,
                min_to_select: 1,
                max_to_select: 1,
                selected_cards: vec![],
            }))?;
        }
        Queen => {
            state.push_pending(GameInput::SelectCards(SelectCards {
                prompt: prompt(card, Purpose::PlayForFree, "Select a CARD worth up to 3 VP to play for free", target),
                card_options: free_play_options(state),
                min_to_select: 1,
                max_to_select: 1,
                selected_cards: vec![],
            }))?;
        }
        PostOffice | Monastery => {
            let opponents = state.opponents_of(player_id);
            let label = if card == PostOffice {
                "Select a player to give 2 CARD to"
            } else {
                "Select a player to give 2 resources to"
            };
            state.push_pending(GameInput::SelectPlayer(SelectPlayer {
                prompt: prompt(card, Purpose::ChoosePlayer, label, target),
                player_options: opponents,
                mandatory: true,
                selected_player: None,
            }))?;
        }
        Cemetery => {
            let mut options = Vec::new();
            if state.deck_len() > 0 {
                options.push(FROM_DECK.to_string());
            }
            if state.discard_len() > 0 {
                options.push(FROM_DISCARD.to_string());
            }
            state.push_pending(GameInput::SelectOptionGeneric(SelectOptionGeneric {
                prompt: prompt(card, Purpose::ChooseSource, "Reveal 4 CARD from", target),
                options,
                selected_option: None,
            }))?;
        }
        University => {
            let options: Vec<_> = state
                .active()
                .played_cards()
                .iter()
                .filter(|c| c.card_ref() != target)
                .map(|c| c.card_ref())
                .collect();
            state.push_pending(GameInput::SelectPlayedCards(SelectPlayedCards {
                prompt: prompt(card, Purpose::Discard, "Select a card from your city to discard", target),
                card_options: options,
                min_to_select: 1,
                max_to_select: 1,
                selected_cards: vec![],
            }))?;
        }
        other => return Err(GameError::invariant(format!("{other} cannot be visited"))),
    }
    Ok(())
}

pub(super) fn resolve(card: CardName, state: &mut GameState, input: &GameInput, purpose: Purpose) -> GameResult<()> {
    use CardName::*;
    let player_id = state.active_player_id();
    let target = input
        .played_card()
        .ok_or_else(|| GameError::invariant(format!("{card} prompt without its card")))?;

    match (card, purpose, input) {
        (Lookout, Purpose::Copy, GameInput::SelectLocation(select)) => {
            let location = validate_choice(&select.location_options, select.selected_location.as_ref(), true)?
                .ok_or_else(|| GameError::validation("Please select a location"))?;
            location.can_trigger_check(state)?;
            state.log(card, log_parts![player_id, " copied ", location, "."]);
            location.trigger(state)
        }
        (Inn, Purpose::Main, GameInput::SelectCards(select)) => {
            validate_selection(&select.card_options, &select.selected_cards, 1, 1)?;
            let chosen = select.selected_cards[0];
            let owed = inn_owed(chosen);
            if owed == 0 {
                return play_from_meadow(card, state, chosen, ResourceMap::NONE);
            }
            state.push_pending(GameInput::SelectResources(SelectResources {
                prompt: prompt(card, Purpose::Spend, &format!("Pay for {chosen}"), target).after(input),
                min_resources: owed,
                max_resources: owed,
                specific_resource: None,
                to_spend: true,
                resources: ResourceMap::NONE,
            }))
        }
        (Inn, Purpose::Spend, GameInput::SelectResources(select)) => {
            let paid = selected_payment(select)?;
            let Some(GameInput::SelectCards(prev)) = input.prev_input() else {
                return Err(GameError::invariant("Inn prompt lost its card"));
            };
            let chosen = prev.selected_cards[0];
            ensure!(
                is_paid_resources_valid(&paid, &chosen.base_cost(), Some(Discount::Any3), true),
                "Insufficient resources"
            );
            play_from_meadow(card, state, chosen, paid)
        }
        (Queen, Purpose::PlayForFree, GameInput::SelectCards(select)) => {
            validate_selection(&select.card_options, &select.selected_cards, 1, 1)?;
            let chosen = select.selected_cards[0];
            let source = if state.active().cards_in_hand.contains(&chosen) {
                CardSource::Hand
            } else {
                CardSource::Meadow
            };
            state.log(card, log_parts![player_id, " played ", chosen, " for free."]);
            crate::rules::play_card_for_free(state, chosen, source)
        }
        (PostOffice | Monastery, Purpose::ChoosePlayer, GameInput::SelectPlayer(_)) => {
            validate_choice(&selected_player_options(input), input_player(input).as_ref(), true)?;
            if card == PostOffice {
                let hand = state.active().cards_in_hand.clone();
                state.push_pending(GameInput::SelectCards(SelectCards {
                    prompt: prompt(card, Purpose::Give, "Select 2 CARD to give", target).after(input),
                    card_options: hand,
                    min_to_select: 2,
                    max_to_select: 2,
                    selected_cards: vec![],
                }))
            } else {
                state.push_pending(GameInput::SelectResources(SelectResources {
                    prompt: prompt(card, Purpose::Give, "Select 2 resources to give", target).after(input),
                    min_resources: 2,
                    max_resources: 2,
                    specific_resource: None,
                    to_spend: true,
                    resources: ResourceMap::NONE,
                }))
            }
        }
        (PostOffice, Purpose::Give, GameInput::SelectCards(select)) => {
            validate_selection(&select.card_options, &select.selected_cards, 2, 2)?;
            let recipient = input
                .prev_input()
                .and_then(input_player)
                .ok_or_else(|| GameError::invariant("Post Office prompt lost its player"))?;
            for &c in &select.selected_cards {
                state.player_mut(player_id).remove_card_from_hand(c)?;
            }
            state.add_or_discard(recipient, select.selected_cards.clone());
            state.log(card, log_parts![player_id, " gave 2 CARD to ", recipient, "."]);
            let hand = state.active().cards_in_hand.clone();
            if hand.is_empty() {
                let drawn = state.draw_cards(player_id, HAND_LIMIT);
                state.log(card, log_parts![player_id, format!(" had no CARD to discard and drew {drawn} CARD.")]);
                return Ok(());
            }
            state.push_pending(GameInput::SelectCards(SelectCards {
                prompt: prompt(card, Purpose::Discard, "Discard any number of CARD, then draw up to 8", target),
                max_to_select: hand.len(),
                card_options: hand,
                min_to_select: 0,
                selected_cards: vec![],
            }))
        }
        (PostOffice, Purpose::Discard, GameInput::SelectCards(select)) => {
            validate_selection(&select.card_options, &select.selected_cards, 0, select.max_to_select)?;
            for &c in &select.selected_cards {
                state.player_mut(player_id).remove_card_from_hand(c)?;
            }
            state.discard_cards(select.selected_cards.iter().copied());
            let missing = HAND_LIMIT.saturating_sub(state.active().num_cards_in_hand());
            let drawn = state.draw_cards(player_id, missing);
            state.log(
                card,
                log_parts![player_id, format!(" discarded {} CARD and drew {drawn} CARD.", select.selected_cards.len())],
            );
            Ok(())
        }
        (Monastery, Purpose::Give, GameInput::SelectResources(select)) => {
            let given = selected_payment(select)?;
            let recipient = input
                .prev_input()
                .and_then(input_player)
                .ok_or_else(|| GameError::invariant("Monastery prompt lost its player"))?;
            state.player_mut(player_id).spend_resources(given)?;
            state.player_mut(recipient).gain_resources(given);
            state.player_mut(player_id).gain_resources(ResourceMap::NONE.with_vp(4));
            state.log(card, log_parts![player_id, " gave ", given, " to ", recipient, " and gained 4 VP."]);
            Ok(())
        }
        (Cemetery, Purpose::ChooseSource, GameInput::SelectOptionGeneric(select)) => {
            let source = validate_choice(&select.options, select.selected_option.as_ref(), true)?
                .ok_or_else(|| GameError::validation("Please make a selection"))?;
            let revealed = if source == FROM_DECK {
                state.reveal_cards(4)
            } else {
                state.reveal_from_discard(4)
            };
            state.log(card, log_parts![player_id, format!(" revealed {} CARD from the {}.", revealed.len(), source.to_lowercase())]);
            state.push_pending(GameInput::SelectCards(SelectCards {
                prompt: prompt(card, Purpose::PlayForFree, "Select a CARD to play for free", target),
                card_options: revealed,
                min_to_select: 0,
                max_to_select: 1,
                selected_cards: vec![],
            }))
        }
        (Cemetery, Purpose::PlayForFree, GameInput::SelectCards(select)) => {
            validate_selection(&select.card_options, &select.selected_cards, 0, 1)?;
            let mut rest = select.card_options.clone();
            let chosen = select.selected_cards.first().copied();
            if let Some(chosen) = chosen {
                ensure!(state.active().can_add_to_city(chosen, true), "Unable to add {chosen} to city");
                if let Some(idx) = rest.iter().position(|&c| c == chosen) {
                    rest.remove(idx);
                }
            }
            state.discard_cards(rest);
            match chosen {
                Some(chosen) => {
                    state.log(card, log_parts![player_id, " played ", chosen, " for free."]);
                    super::enter_city(chosen, state)
                }
                None => Ok(()),
            }
        }
        (University, Purpose::Discard, GameInput::SelectPlayedCards(select)) => {
            validate_selection(&select.card_options, &select.selected_cards, 1, 1)?;
            let removed = state.remove_from_city(select.selected_cards[0])?;
            let refund = removed.card_name.base_cost().with_vp(1);
            state.discard_cards([removed.card_name]);
            state.player_mut(player_id).gain_resources(refund);
            state.log(card, log_parts![player_id, " discarded ", removed.card_name, " and gained ", refund, "."]);
            state.push_pending(GainAnyResource::new(card).input())
        }
        (University, Purpose::GainAny, _) => GainAnyResource::new(card).resolve(state, input).map(|_| ()),
        _ => Err(GameError::invariant(format!("{card} cannot handle {:?}", input.kind()))),
    }
}

fn selected_player_options(input: &GameInput) -> Vec<crate::core::PlayerId> {
    match input {
        GameInput::SelectPlayer(select) => select.player_options.clone(),
        _ => Vec::new(),
    }
}

fn input_player(input: &GameInput) -> Option<crate::core::PlayerId> {
    match input {
        GameInput::SelectPlayer(select) => select.selected_player,
        _ => None,
    }
}

fn play_from_meadow(inn: CardName, state: &mut GameState, card: CardName, paid: ResourceMap) -> GameResult<()> {
    let player_id = state.active_player_id();
    state.player_mut(player_id).spend_resources(paid)?;
    state.take_from_meadow(card)?;
    state.replenish_meadow();
    state.log(inn, log_parts![player_id, " played ", card, " from the Meadow for ", paid, "."]);
    super::enter_city(card, state)
}
