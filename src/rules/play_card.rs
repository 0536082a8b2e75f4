//! Playing and reserving cards.
//!
//! A play is checked in full against the committed state, then the card
//! leaves its zone, the payment is applied and the card's own effect runs.
//!
//! ## Payment side effects
//!
//! - Associated card and golden leaf: the construction is marked occupied.
//! - Dungeon: the critter leaves the city and sits under the Dungeon.
//! - Crane, Innkeeper, Inventor: discarded from the city.
//! - Queen, Inn: a worker is placed on the card.

use crate::cards::CardName;
use crate::core::log::log_parts;
use crate::core::{CardSource, GameInput, GameState, PlayCardInput, WorkerPlacement};
use crate::effects::Playable;
use crate::error::{ensure, GameError, GameResult};
use crate::player::ReservedCard;

/// Every reason `input` cannot be played by the active player right now.
pub(crate) fn can_play_card_check(state: &GameState, input: &PlayCardInput) -> GameResult<()> {
    let player = state.active();
    let card = input.card;

    match input.source {
        CardSource::Hand => ensure!(player.cards_in_hand.contains(&card), "Selected card is not in your hand"),
        CardSource::Meadow => ensure!(state.meadow().contains(&card), "Selected card is not in the Meadow"),
        CardSource::Station(slot) => {
            let in_slot = state.station_cards().and_then(|s| s.get(slot)).copied().flatten();
            ensure!(in_slot == Some(card), "{card} is not in station slot {}", slot + 1);
        }
        CardSource::Reserved => ensure!(
            player.reserved_card == ReservedCard::Reserved(card),
            "{card} is not your reserved card"
        ),
    }

    if card == CardName::Fool {
        ensure!(
            state
                .opponents_of(player.player_id)
                .into_iter()
                .any(|p| state.player(p).can_add_to_city(card, true)),
            "No opponent can take the Fool"
        );
    } else {
        ensure!(player.can_add_to_city(card, false), "Unable to add {card} to city");
    }

    player.validate_payment_options(input)?;

    let payment = input.payment_options.as_ref();
    let frees_space = payment.is_some_and(|p| {
        p.card_to_dungeon.is_some()
            || (p.card_to_use == Some(CardName::Crane) && card.is_construction())
            || (p.card_to_use == Some(CardName::Innkeeper) && card.is_critter())
    });
    if card != CardName::Fool && !frees_space {
        ensure!(player.can_add_to_city(card, true), "Unable to add {card} to city");
    }
    Ok(())
}

/// Apply a checked `PlayCard` input to the working state.
pub(crate) fn play_card(state: &mut GameState, input: &GameInput, play: &PlayCardInput) -> GameResult<()> {
    let player = state.active_player_id();
    let card = play.card;

    take_from_source(state, card, play.source)?;
    state.log(card, log_parts![player, " played ", card, format!(" from {}.", play.source)]);
    apply_payment(state, play)?;
    card.play(state, input)
}

/// Play `card` without paying for it.
pub(crate) fn play_card_for_free(state: &mut GameState, card: CardName, source: CardSource) -> GameResult<()> {
    if card != CardName::Fool {
        ensure!(state.active().can_add_to_city(card, true), "Unable to add {card} to city");
    }
    take_from_source(state, card, source)?;
    crate::cards::enter_city(card, state)
}

fn take_from_source(state: &mut GameState, card: CardName, source: CardSource) -> GameResult<()> {
    let player = state.active_player_id();
    match source {
        CardSource::Hand => state.player_mut(player).remove_card_from_hand(card),
        CardSource::Meadow => {
            state.take_from_meadow(card)?;
            state.replenish_meadow();
            Ok(())
        }
        CardSource::Station(slot) => {
            let taken = state.take_station_card(slot)?;
            ensure!(taken == card, "{card} is not in station slot {}", slot + 1);
            Ok(())
        }
        CardSource::Reserved => {
            let reserved = &mut state.player_mut(player).reserved_card;
            ensure!(*reserved == ReservedCard::Reserved(card), "{card} is not your reserved card");
            *reserved = ReservedCard::Used;
            Ok(())
        }
    }
}

fn apply_payment(state: &mut GameState, play: &PlayCardInput) -> GameResult<()> {
    let player_id = state.active_player_id();
    let card = play.card;
    let payment = play
        .payment_options
        .as_ref()
        .ok_or_else(|| GameError::validation("Invalid input: missing payment options"))?;

    if payment.use_associated_card {
        let target = state
            .active()
            .unoccupied_associated_construction(card)
            .map(|c| c.card_ref())
            .ok_or_else(|| GameError::validation(format!("Cannot find associated card to play {card}")))?;
        return occupy(state, target, card);
    }

    if let Some(target_name) = payment.occupy_card_with_golden_leaf {
        let target = state
            .active()
            .played_cards_named(target_name)
            .find(|c| c.is_unoccupied_construction())
            .map(|c| c.card_ref())
            .ok_or_else(|| GameError::validation(format!("Cannot find unoccupied {target_name}")))?;
        let player = state.player_mut(player_id);
        player.num_golden_leaf = player
            .num_golden_leaf
            .checked_sub(1)
            .ok_or_else(|| GameError::validation("No more golden leaf to use"))?;
        return occupy(state, target, card);
    }

    state.player_mut(player_id).spend_resources(payment.resources)?;
    if !payment.resources.is_empty() {
        state.log(card, log_parts![player_id, " paid ", payment.resources, "."]);
    }

    if let Some(prisoner) = payment.card_to_dungeon {
        let (prisoner_ref, dungeon_ref) = {
            let player = state.active();
            let prisoner_ref = player.played_cards_named(prisoner).next().map(|c| c.card_ref());
            let dungeon_ref = player.first_played(CardName::Dungeon).map(|c| c.card_ref());
            (prisoner_ref, dungeon_ref)
        };
        let (Some(prisoner_ref), Some(dungeon_ref)) = (prisoner_ref, dungeon_ref) else {
            return Err(GameError::validation("Unable to invoke Dungeon"));
        };
        state.remove_from_city(prisoner_ref)?;
        state
            .find_played_mut(dungeon_ref)
            .ok_or_else(|| GameError::invariant("Dungeon left the city"))?
            .paired_cards
            .push(prisoner);
        state.log(CardName::Dungeon, log_parts![player_id, " placed ", prisoner, " in the Dungeon."]);
    }

    if let Some(delegate) = payment.card_to_use {
        match delegate {
            CardName::Crane | CardName::Innkeeper | CardName::Inventor => {
                let target = state
                    .active()
                    .first_played(delegate)
                    .map(|c| c.card_ref())
                    .ok_or_else(|| GameError::validation(format!("Unable to find {delegate} in your city")))?;
                state.remove_from_city(target)?;
                state.discard_cards([delegate]);
                state.log(delegate, log_parts![player_id, " discarded ", delegate, " from their city."]);
            }
            CardName::Queen | CardName::Inn => {
                let target = {
                    let player = state.active();
                    player
                        .played_cards_named(delegate)
                        .find(|c| player.can_place_own_worker_on(c))
                        .map(|c| c.card_ref())
                };
                let target =
                    target.ok_or_else(|| GameError::validation(format!("Cannot place worker on card {delegate}")))?;
                state.place_worker(player_id, WorkerPlacement::Card { card: delegate, target })?;
                state.log(delegate, log_parts![player_id, " placed a worker on ", delegate, "."]);
            }
            other => return Err(GameError::invariant(format!("{other} passed payment checks as a delegate"))),
        }
    }
    Ok(())
}

fn occupy(state: &mut GameState, target: crate::core::PlayedCardRef, critter: CardName) -> GameResult<()> {
    let player_id = state.active_player_id();
    let construction = state
        .find_played_mut(target)
        .ok_or_else(|| GameError::invariant("Construction left the city"))?;
    construction.used_for_critter = true;
    let name = construction.card_name;
    state.log(critter, log_parts![player_id, " occupied ", name, " to play ", critter, "."]);
    Ok(())
}

// === Reserving ===

pub(crate) fn can_reserve_check(state: &GameState, card: CardName) -> GameResult<()> {
    ensure!(state.options().newleaf.reserving, "Reserving is not part of this game");
    ensure!(
        state.active().reserved_card == ReservedCard::Unused,
        "You have already reserved a card this game"
    );
    ensure!(state.meadow().contains(&card), "Selected card is not in the Meadow");
    Ok(())
}

/// Set a Meadow card aside for the active player. The turn continues.
pub(crate) fn reserve_card(state: &mut GameState, card: CardName) -> GameResult<()> {
    let player = state.active_player_id();
    state.take_from_meadow(card)?;
    state.replenish_meadow();
    state.player_mut(player).reserved_card = ReservedCard::Reserved(card);
    state.log(card, log_parts![player, " reserved ", card, "."]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameOptions, NewleafOptions, PaymentOptions, PlayerId, ResourceMap};
    use crate::player::Player;

    fn state(options: GameOptions) -> GameState {
        let players = vec![Player::new("A", PlayerId::new(0), "a"), Player::new("B", PlayerId::new(1), "b")];
        GameState::initial(players, options, 21).unwrap()
    }

    fn give_hand(state: &mut GameState, card: CardName) {
        state.player_mut(PlayerId::new(0)).cards_in_hand = vec![card];
    }

    #[test]
    fn test_card_must_be_in_source() {
        let mut state = state(GameOptions::base());
        give_hand(&mut state, CardName::Farm);
        state.player_mut(PlayerId::new(0)).resources = ResourceMap::new(2, 1, 0, 0);

        let ok = PlayCardInput::new(CardName::Farm, CardSource::Hand, PaymentOptions::resources(ResourceMap::new(2, 1, 0, 0)));
        assert!(can_play_card_check(&state, &ok).is_ok());

        let wrong = PlayCardInput::new(CardName::Mine, CardSource::Hand, PaymentOptions::resources(ResourceMap::new(1, 1, 1, 0)));
        assert_eq!(can_play_card_check(&state, &wrong).unwrap_err().reason(), "Selected card is not in your hand");
    }

    #[test]
    fn test_missing_payment_rejected() {
        let mut state = state(GameOptions::base());
        give_hand(&mut state, CardName::Farm);
        let input = PlayCardInput { card: CardName::Farm, source: CardSource::Hand, payment_options: None };
        assert!(can_play_card_check(&state, &input).unwrap_err().reason().contains("missing payment"));
    }

    #[test]
    fn test_associated_card_occupies_construction() {
        let mut state = state(GameOptions::base());
        let pid = PlayerId::new(0);
        let farm = state.add_to_city(pid, CardName::Farm).unwrap();
        give_hand(&mut state, CardName::Husband);
        let play = PlayCardInput::new(CardName::Husband, CardSource::Hand, PaymentOptions::associated_card());
        can_play_card_check(&state, &play).unwrap();
        apply_payment(&mut state, &play).unwrap();
        assert!(state.find_played(farm).unwrap().used_for_critter);
        assert!(!state.active().has_unoccupied_associated_construction(CardName::Husband));
    }

    #[test]
    fn test_crane_is_discarded() {
        let mut state = state(GameOptions::base());
        let pid = PlayerId::new(0);
        state.add_to_city(pid, CardName::Crane).unwrap();
        give_hand(&mut state, CardName::Mine);
        let play = PlayCardInput::new(CardName::Mine, CardSource::Hand, PaymentOptions::using_card(CardName::Crane, ResourceMap::NONE));
        can_play_card_check(&state, &play).unwrap();
        let discard_before = state.discard_len();
        apply_payment(&mut state, &play).unwrap();
        assert!(!state.active().has_card_in_city(CardName::Crane));
        assert_eq!(state.discard_len(), discard_before + 1);
    }

    #[test]
    fn test_reserve_once() {
        let mut state = state(GameOptions::base().with_newleaf(NewleafOptions { reserving: true, ..Default::default() }));
        let card = state.meadow()[0];
        can_reserve_check(&state, card).unwrap();
        reserve_card(&mut state, card).unwrap();
        assert_eq!(state.active().reserved_card, ReservedCard::Reserved(card));
        assert_eq!(state.meadow().len(), 8);

        let next = state.meadow()[0];
        assert!(can_reserve_check(&state, next).unwrap_err().reason().contains("already reserved"));
    }

    #[test]
    fn test_reserving_disabled() {
        let state = state(GameOptions::base());
        let card = state.meadow()[0];
        assert!(can_reserve_check(&state, card).is_err());
    }
}
