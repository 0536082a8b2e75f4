//! Traveler cards: one-shot effects on play.
//!
//! The Ruins and the Fool decide where they go before entering a city;
//! `before_placement` asks, and the answer places them.

use super::governance;
use crate::cards::CardName;
use crate::core::log::log_parts;
use crate::core::{
    ContextTag, GameInput, GameState, PlayedCardRef, PlayerId, Prompt, Purpose, ResourceMap, SelectCards,
    SelectPlayedCards, SelectPlayer, SelectWorkerPlacement,
};
use crate::effects::{validate_choice, validate_selection};
use crate::error::{ensure, GameError, GameResult};
use crate::player::Player;

/// Most VP a card played for free by the Postal Pigeon may be worth.
const FREE_PLAY_MAX_VP: i32 = 3;

fn select_cards(card: CardName, purpose: Purpose, label: &str, options: Vec<CardName>, min: usize, max: usize) -> GameInput {
    GameInput::SelectCards(SelectCards {
        prompt: Prompt::new(ContextTag::new(card, purpose), label),
        card_options: options,
        min_to_select: min,
        max_to_select: max,
        selected_cards: vec![],
    })
}

pub(super) fn activate(card: CardName, state: &mut GameState, _played: PlayedCardRef) -> GameResult<()> {
    use CardName::*;
    let player_id = state.active_player_id();

    match card {
        Wanderer | AirBalloon => {
            let n = if card == Wanderer { 3 } else { 2 };
            let drawn = state.draw_cards(player_id, n);
            state.log(card, log_parts![player_id, format!(" drew {drawn} CARD.")]);
        }
        Messenger => {
            state.player_mut(player_id).gain_resources(ResourceMap::NONE.with_vp(1));
            state.log(card, log_parts![player_id, " gained 1 VP."]);
        }
        Shepherd => {
            let chapel_vp: u32 = state
                .active()
                .played_cards_named(Chapel)
                .map(|c| c.resources.vp)
                .sum();
            let gain = ResourceMap::new(0, 0, 0, 3).with_vp(chapel_vp);
            state.player_mut(player_id).gain_resources(gain);
            state.log(card, log_parts![player_id, " gained ", gain, "."]);
        }
        Ranger => {
            let options: Vec<_> = state
                .active()
                .placed_workers
                .iter()
                .copied()
                .filter(|p| !Player::is_permanent_placement(p))
                .collect();
            if options.is_empty() {
                state.log(card, log_parts![player_id, " has no worker to move."]);
            } else {
                state.push_pending(GameInput::SelectWorkerPlacement(SelectWorkerPlacement {
                    prompt: Prompt::new(ContextTag::new(card, Purpose::Main), "Select a deployed worker to take back"),
                    options,
                    mandatory: false,
                    selected: None,
                }))?;
            }
        }
        Bard => {
            let hand = state.active().cards_in_hand.clone();
            if hand.is_empty() {
                state.log(card, log_parts![player_id, " has no CARD to discard."]);
            } else {
                let max = hand.len().min(5);
                let prompt = select_cards(card, Purpose::Discard, "Discard up to 5 CARD to gain 1 VP each", hand, 0, max);
                state.push_pending(prompt)?;
            }
        }
        PostalPigeon => {
            let revealed = state.reveal_cards(2);
            if revealed.is_empty() {
                state.log(card, log_parts![player_id, " revealed no CARD."]);
            } else {
                let prompt = select_cards(
                    card,
                    Purpose::PlayForFree,
                    "Select a CARD worth up to 3 VP to play for free",
                    revealed,
                    0,
                    1,
                );
                state.push_pending(prompt)?;
            }
        }
        Undertaker => {
            let meadow = state.meadow().to_vec();
            if meadow.is_empty() {
                state.log(card, log_parts![player_id, " found no CARD in the Meadow to discard."]);
            } else {
                let n = meadow.len().min(3);
                let prompt =
                    select_cards(card, Purpose::Discard, "Select 3 CARD from the Meadow to discard", meadow, n, n);
                state.push_pending(prompt)?;
            }
        }
        Pirate => {
            let revealed = state.reveal_cards(4);
            let total: i32 = revealed.iter().map(|c| c.base_vp()).sum();
            let pearls = if total >= 7 { 2 } else { 1 };
            let n = revealed.len();
            state.discard_cards(revealed);
            state.player_mut(player_id).gain_resources(ResourceMap::NONE.with_pearl(pearls));
            state.log(
                card,
                log_parts![player_id, format!(" revealed {n} CARD worth {total} VP and gained {pearls} PEARL.")],
            );
        }
        other => return Err(GameError::invariant(format!("{other} has no traveler effect"))),
    }
    Ok(())
}

/// Ask where a Ruins or Fool goes.
pub(super) fn before_placement(card: CardName, state: &mut GameState) -> GameResult<()> {
    let player_id = state.active_player_id();
    match card {
        CardName::Ruins => {
            let options: Vec<_> = state
                .active()
                .played_cards()
                .iter()
                .filter(|c| c.card_name.is_construction())
                .map(|c| c.card_ref())
                .collect();
            ensure!(!options.is_empty(), "No construction to ruin");
            state.push_pending(GameInput::SelectPlayedCards(SelectPlayedCards {
                prompt: Prompt::new(ContextTag::new(card, Purpose::Discard), "Select a construction to discard"),
                card_options: options,
                min_to_select: 1,
                max_to_select: 1,
                selected_cards: vec![],
            }))
        }
        CardName::Fool => {
            let options: Vec<PlayerId> = state
                .players()
                .values()
                .filter(|p| p.player_id != player_id && p.can_add_to_city(CardName::Fool, true))
                .map(|p| p.player_id)
                .collect();
            ensure!(!options.is_empty(), "No opponent can take the Fool");
            state.push_pending(GameInput::SelectPlayer(SelectPlayer {
                prompt: Prompt::new(ContextTag::new(card, Purpose::ChoosePlayer), "Select a player to play the Fool on"),
                player_options: options,
                mandatory: true,
                selected_player: None,
            }))
        }
        other => Err(GameError::invariant(format!("{other} has no placement decision"))),
    }
}

pub(super) fn resolve(card: CardName, state: &mut GameState, input: &GameInput, purpose: Purpose) -> GameResult<()> {
    use CardName::*;
    let player_id = state.active_player_id();

    match (card, purpose, input) {
        (Ruins, Purpose::Discard, GameInput::SelectPlayedCards(select)) => {
            validate_selection(&select.card_options, &select.selected_cards, 1, 1)?;
            let target = select.selected_cards[0];
            ensure!(target.owner == player_id, "Can only ruin your own construction");
            let target_name = state
                .find_played(target)
                .map(|c| c.card_name)
                .ok_or_else(|| GameError::validation("Unable to find the selected card"))?;
            ensure!(target_name.is_construction(), "{target_name} is not a construction");
            // The Ruins needs a construction in the city, so it goes in before the target leaves.
            state.add_to_city(player_id, Ruins)?;
            let ruined = state.remove_from_city(target)?;
            let refund = ruined.card_name.base_cost();
            state.player_mut(player_id).gain_resources(refund);
            state.discard_cards([ruined.card_name]);
            let drawn = state.draw_cards(player_id, 2);
            state.log(
                card,
                log_parts![player_id, " ruined ", ruined.card_name, ", gained ", refund, format!(" and drew {drawn} CARD.")],
            );
            governance::after_card_played(state, Ruins)
        }
        (Fool, Purpose::ChoosePlayer, GameInput::SelectPlayer(select)) => {
            let target = validate_choice(&select.player_options, select.selected_player.as_ref(), true)?
                .ok_or_else(|| GameError::validation("Please select a player"))?;
            state.add_to_city(target, Fool)?;
            state.log(card, log_parts![player_id, " played ", Fool, " in the city of ", target, "."]);
            governance::after_card_played(state, Fool)
        }
        (Ranger, Purpose::Main, GameInput::SelectWorkerPlacement(select)) => {
            let Some(placement) = validate_choice(&select.options, select.selected.as_ref(), select.mandatory)? else {
                state.log(card, log_parts![player_id, " declined to move a worker."]);
                return Ok(());
            };
            state.recall_worker(player_id, placement)?;
            state.log(card, log_parts![player_id, format!(" took back their worker from {placement}.")]);
            Ok(())
        }
        (Bard, Purpose::Discard, GameInput::SelectCards(select)) => {
            validate_selection(&select.card_options, &select.selected_cards, select.min_to_select, select.max_to_select)?;
            let n = select.selected_cards.len() as u32;
            for &c in &select.selected_cards {
                state.player_mut(player_id).remove_card_from_hand(c)?;
            }
            state.discard_cards(select.selected_cards.iter().copied());
            state.player_mut(player_id).gain_resources(ResourceMap::NONE.with_vp(n));
            state.log(card, log_parts![player_id, format!(" discarded {n} CARD to gain {n} VP.")]);
            Ok(())
        }
        (PostalPigeon, Purpose::PlayForFree, GameInput::SelectCards(select)) => {
            validate_selection(&select.card_options, &select.selected_cards, 0, 1)?;
            let mut rest = select.card_options.clone();
            let chosen = select.selected_cards.first().copied();
            if let Some(chosen) = chosen {
                ensure!(chosen.base_vp() <= FREE_PLAY_MAX_VP, "{chosen} is worth more than 3 VP");
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
                None => {
                    state.log(card, log_parts![player_id, " declined to play a revealed CARD."]);
                    Ok(())
                }
            }
        }
        (Undertaker, Purpose::Discard, GameInput::SelectCards(select)) => {
            validate_selection(&select.card_options, &select.selected_cards, select.min_to_select, select.max_to_select)?;
            for &c in &select.selected_cards {
                state.take_from_meadow(c)?;
            }
            state.discard_cards(select.selected_cards.iter().copied());
            state.replenish_meadow();
            state.log(card, log_parts![player_id, format!(" discarded {} CARD from the Meadow.", select.selected_cards.len())]);
            let meadow = state.meadow().to_vec();
            if state.active().hand_space() == 0 || meadow.is_empty() {
                return Ok(());
            }
            let prompt = select_cards(card, Purpose::Keep, "Select a CARD from the Meadow to keep", meadow, 1, 1);
            state.push_pending(prompt)
        }
        (Undertaker, Purpose::Keep, GameInput::SelectCards(select)) => {
            validate_selection(&select.card_options, &select.selected_cards, 1, 1)?;
            let chosen = select.selected_cards[0];
            state.take_from_meadow(chosen)?;
            state.player_mut(player_id).add_card_to_hand(chosen);
            state.replenish_meadow();
            state.log(card, log_parts![player_id, " took ", chosen, " from the Meadow."]);
            Ok(())
        }
        _ => Err(GameError::invariant(format!("{card} cannot handle {:?}", input.kind()))),
    }
}
