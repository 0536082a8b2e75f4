//! Adornments.
//!
//! Each player is dealt two adornments. Playing one costs 1 PEARL and a
//! turn; the effect fires once and the adornment scores at game end.
//!
//! The Mirror copies the effect of an adornment another player has played.
//! A copied effect runs under the copied adornment's name, so its
//! follow-up decisions route back to it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::board::{EventType, LocationName, LocationType};
use crate::cards::{CardName, CardType};
use crate::core::log::log_parts;
use crate::core::{
    CardSource, ContextTag, GameInput, GameState, Prompt, Purpose, ResourceMap, SelectCards,
    SelectLocation, SelectPlayedAdornment, SelectPlayedCards,
};
use crate::effects::{validate_choice, validate_selection, GainAnyResource, GainManyResources, Playable};
use crate::error::{ensure, GameError, GameResult};
use crate::player::Player;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AdornmentName {
    Bell,
    Compass,
    GildedBook,
    Hourglass,
    KeyToTheCity,
    Masque,
    Mirror,
    Scales,
    SeaglassAmulet,
    Spyglass,
    Sundial,
    Tiara,
}

impl AdornmentName {
    pub const ALL: [AdornmentName; 12] = [
        AdornmentName::Bell,
        AdornmentName::Compass,
        AdornmentName::GildedBook,
        AdornmentName::Hourglass,
        AdornmentName::KeyToTheCity,
        AdornmentName::Masque,
        AdornmentName::Mirror,
        AdornmentName::Scales,
        AdornmentName::SeaglassAmulet,
        AdornmentName::Spyglass,
        AdornmentName::Sundial,
        AdornmentName::Tiara,
    ];

    #[must_use]
    pub fn base_vp(self) -> i32 {
        match self {
            AdornmentName::SeaglassAmulet => 3,
            _ => 0,
        }
    }

    fn context(self, purpose: Purpose) -> ContextTag {
        ContextTag::new(self, purpose)
    }

    /// Run the effect for the active player.
    pub(crate) fn activate(self, state: &mut GameState) -> GameResult<()> {
        use AdornmentName::*;
        let player_id = state.active_player_id();
        let player = state.active();

        match self {
            Bell => {
                let critters = player.count_where(|c| c.is_critter());
                state.player_mut(player_id).gain_resources(ResourceMap::new(0, 0, 0, 3));
                let drawn = state.draw_cards(player_id, critters);
                state.log(
                    self,
                    log_parts![player_id, " gained ", ResourceMap::new(0, 0, 0, 3), format!(" and drew {drawn} CARD.")],
                );
            }
            Compass => {
                let options: Vec<_> = player
                    .played_cards()
                    .iter()
                    .filter(|c| c.card_name.card_type() == CardType::Traveler && crate::cards::can_reactivate(c.card_name))
                    .map(|c| c.card_ref())
                    .collect();
                if options.is_empty() {
                    state.log(self, log_parts![player_id, " has no TRAVELER to reactivate."]);
                } else {
                    state.push_pending(GameInput::SelectPlayedCards(SelectPlayedCards {
                        prompt: Prompt::new(self.context(Purpose::Reactivate), "Select up to 2 TRAVELER to reactivate"),
                        card_options: options,
                        min_to_select: 0,
                        max_to_select: 2,
                        selected_cards: vec![],
                    }))?;
                }
            }
            GildedBook => {
                let governance: Vec<_> = player
                    .played_cards()
                    .iter()
                    .filter(|c| c.card_name.card_type() == CardType::Governance)
                    .map(|c| c.card_name)
                    .collect();
                if governance.is_empty() {
                    state.log(self, log_parts![player_id, " has no GOVERNANCE cards in city."]);
                } else {
                    state.push_pending(GameInput::SelectCards(SelectCards {
                        prompt: Prompt::new(
                            self.context(Purpose::Main),
                            "Select a GOVERNANCE to gain resources equal to its cost",
                        ),
                        card_options: governance,
                        min_to_select: 1,
                        max_to_select: 1,
                        selected_cards: vec![],
                    }))?;
                }
            }
            Hourglass => {
                let forest: Vec<LocationName> = state
                    .locations_in_game()
                    .filter(|l| l.location_type() == LocationType::Forest)
                    .collect();
                ensure!(!forest.is_empty(), "No eligible forest location available to copy");
                state.push_pending(GameInput::SelectLocation(SelectLocation {
                    prompt: Prompt::new(self.context(Purpose::Copy), "Select forest location to copy"),
                    location_options: forest,
                    selected_location: None,
                }))?;
                state.push_pending(GainAnyResource::new(self).input())?;
            }
            KeyToTheCity => {
                state.push_pending(GainManyResources::new(self).skip_log().input(2))?;
            }
            Masque => {
                let options: Vec<CardName> = player
                    .cards_in_hand
                    .iter()
                    .chain(state.meadow())
                    .copied()
                    .filter(|&c| c.base_vp() <= 3 && player.can_add_to_city(c, true))
                    .collect();
                if options.is_empty() {
                    state.log(self, log_parts![player_id, " has no CARD to play for free."]);
                } else {
                    state.push_pending(GameInput::SelectCards(SelectCards {
                        prompt: Prompt::new(self.context(Purpose::PlayForFree), "Select CARD to play for free"),
                        card_options: options,
                        min_to_select: 1,
                        max_to_select: 1,
                        selected_cards: vec![],
                    }))?;
                }
            }
            Mirror => {
                let options: BTreeSet<AdornmentName> = state
                    .players()
                    .values()
                    .filter(|p| p.player_id != player_id)
                    .flat_map(|p| p.played_adornments.iter().copied())
                    .filter(|&a| a != Mirror)
                    .collect();
                if options.is_empty() {
                    state.log(self, log_parts![player_id, " has no adornment to copy."]);
                } else {
                    state.push_pending(GameInput::SelectPlayedAdornment(SelectPlayedAdornment {
                        prompt: Prompt::new(self.context(Purpose::Copy), "Select an adornment to copy"),
                        adornment_options: options.into_iter().collect(),
                        selected_adornment: None,
                    }))?;
                }
            }
            Scales => {
                let hand = player.cards_in_hand.clone();
                state.push_pending(GameInput::SelectCards(SelectCards {
                    prompt: Prompt::new(self.context(Purpose::Discard), "Discard up to 4 CARD to gain 1 ANY each"),
                    max_to_select: hand.len().min(4),
                    card_options: hand,
                    min_to_select: 0,
                    selected_cards: vec![],
                }))?;
            }
            SeaglassAmulet => {
                state.player_mut(player_id).gain_resources(ResourceMap::NONE.with_vp(1));
                let drawn = state.draw_cards(player_id, 2);
                state.log(self, log_parts![player_id, format!(" drew {drawn} CARD and gained 1 VP.")]);
                state.push_pending(GainManyResources::new(self).input(3))?;
            }
            Spyglass => {
                state.player_mut(player_id).gain_resources(ResourceMap::NONE.with_pearl(1));
                let drawn = state.draw_cards(player_id, 1);
                state.log(self, log_parts![player_id, format!(" drew {drawn} CARD and gained 1 PEARL.")]);
                state.push_pending(GainAnyResource::new(self).input())?;
            }
            Sundial => {
                let production: Vec<_> = player
                    .played_cards()
                    .iter()
                    .filter(|c| c.card_name.card_type() == CardType::Production)
                    .map(|c| c.card_ref())
                    .collect();
                if production.len() <= 3 {
                    state.log(self, log_parts![player_id, " activated PRODUCTION."]);
                    for card in production {
                        crate::cards::activate_production(state, card)?;
                    }
                } else {
                    state.push_pending(GameInput::SelectPlayedCards(SelectPlayedCards {
                        prompt: Prompt::new(self.context(Purpose::Main), "Select 3 PRODUCTION to activate"),
                        card_options: production,
                        min_to_select: 3,
                        max_to_select: 3,
                        selected_cards: vec![],
                    }))?;
                }
            }
            Tiara => {
                let prosperity = player.count_cards_by_type(CardType::Prosperity) as u32;
                if prosperity == 0 {
                    state.log(self, log_parts![player_id, " has no PROSPERITY cards in city."]);
                } else {
                    state.push_pending(GainManyResources::new(self).input(prosperity))?;
                }
            }
        }
        Ok(())
    }

    fn resolve(self, state: &mut GameState, input: &GameInput, purpose: Purpose) -> GameResult<()> {
        use AdornmentName::*;
        let player_id = state.active_player_id();

        let gain_any = GainAnyResource::new(self);
        if gain_any.matches(input) {
            return gain_any.resolve(state, input).map(|_| ());
        }
        if purpose == Purpose::GainMany {
            if self == KeyToTheCity {
                let gained = GainManyResources::new(self).skip_log().resolve(state, input)?;
                let constructions = state.active().count_where(|c| c.is_construction());
                let drawn = state.draw_cards(player_id, constructions);
                state.log(self, log_parts![player_id, " gained ", gained, format!(" and drew {drawn} CARD.")]);
                return Ok(());
            }
            return GainManyResources::new(self).resolve(state, input).map(|_| ());
        }

        match (self, purpose, input) {
            (Compass, Purpose::Reactivate, GameInput::SelectPlayedCards(select)) => {
                validate_selection(&select.card_options, &select.selected_cards, select.min_to_select, select.max_to_select)?;
                if select.selected_cards.is_empty() {
                    state.log(self, log_parts![player_id, " declined to reactivate any TRAVELER."]);
                    return Ok(());
                }
                for &card in &select.selected_cards {
                    crate::cards::reactivate(state, card)?;
                }
                Ok(())
            }
            (GildedBook, Purpose::Main, GameInput::SelectCards(select)) => {
                validate_selection(&select.card_options, &select.selected_cards, 1, 1)?;
                let card = select.selected_cards[0];
                ensure!(card.card_type() == CardType::Governance, "Must select GOVERNANCE card");
                let gain = card.base_cost();
                state.player_mut(player_id).gain_resources(gain);
                state.log(self, log_parts![player_id, " gained ", gain, "."]);
                Ok(())
            }
            (Hourglass, Purpose::Copy, GameInput::SelectLocation(select)) => {
                let location = validate_choice(&select.location_options, select.selected_location.as_ref(), true)?
                    .ok_or_else(|| GameError::validation("Invalid location selected"))?;
                ensure!(
                    location.location_type() == LocationType::Forest,
                    "Cannot copy {location}. Only forest locations are allowed."
                );
                location.can_trigger_check(state)?;
                state.log(self, log_parts![player_id, " copied ", location, "."]);
                location.trigger(state)
            }
            (Masque, Purpose::PlayForFree, GameInput::SelectCards(select)) => {
                validate_selection(&select.card_options, &select.selected_cards, 1, 1)?;
                let card = select.selected_cards[0];
                let source = if state.active().cards_in_hand.contains(&card) {
                    CardSource::Hand
                } else {
                    CardSource::Meadow
                };
                state.log(self, log_parts![player_id, " played ", card, " for free."]);
                crate::rules::play_card_for_free(state, card, source)
            }
            (Mirror, Purpose::Copy, GameInput::SelectPlayedAdornment(select)) => {
                let Some(copied) =
                    validate_choice(&select.adornment_options, select.selected_adornment.as_ref(), false)?
                else {
                    state.log(self, log_parts![player_id, " declined to copy an adornment."]);
                    return Ok(());
                };
                state.log(self, log_parts![player_id, " copied ", copied, "."]);
                copied.activate(state)
            }
            (Scales, Purpose::Discard, GameInput::SelectCards(select)) => {
                validate_selection(&select.card_options, &select.selected_cards, select.min_to_select, select.max_to_select)?;
                let n = select.selected_cards.len();
                if n == 0 {
                    state.log(self, log_parts![player_id, " declined to discard any CARD."]);
                    return Ok(());
                }
                for &card in &select.selected_cards {
                    state.player_mut(player_id).remove_card_from_hand(card)?;
                }
                state.discard_cards(select.selected_cards.iter().copied());
                state.log(self, log_parts![player_id, format!(" discarded {n} CARD.")]);
                state.push_pending(GainManyResources::new(self).input(n as u32))
            }
            (Sundial, Purpose::Main, GameInput::SelectPlayedCards(select)) => {
                validate_selection(&select.card_options, &select.selected_cards, 3, 3)?;
                state.log(self, log_parts![player_id, " activated 3 PRODUCTION."]);
                for &card in &select.selected_cards {
                    crate::cards::activate_production(state, card)?;
                }
                Ok(())
            }
            _ => Err(GameError::invariant(format!("{self} cannot handle {:?}", input.kind()))),
        }
    }
}

impl Playable for AdornmentName {
    fn can_play_check(self, state: &GameState, input: &GameInput) -> GameResult<()> {
        if input.purpose_for(self.into()).is_some() {
            return Ok(());
        }
        let player = state.active();
        ensure!(player.adornments_in_hand.contains(&self), "Selected adornment {self} not in hand");
        ensure!(!player.played_adornments.contains(&self), "Adornment {self} already played");
        ensure!(player.resources.pearl >= 1, "Must be able to pay 1 PEARL to play an adornment");
        Ok(())
    }

    fn play(self, state: &mut GameState, input: &GameInput) -> GameResult<()> {
        if let Some(purpose) = input.purpose_for(self.into()) {
            return self.resolve(state, input, purpose);
        }
        let player_id = state.active_player_id();
        let player = state.player_mut(player_id);
        player.spend_resources(ResourceMap::NONE.with_pearl(1))?;
        player.adornments_in_hand.retain(|&a| a != self);
        player.played_adornments.push(self);
        state.log(self, log_parts![player_id, " played ", self, "."]);
        self.activate(state)
    }

    fn points(self, player: &Player, _state: &GameState) -> i32 {
        use AdornmentName::*;
        let count = |t: CardType| player.count_cards_by_type(t) as i32;
        let bonus = match self {
            Bell => player.count_where(|c| c.is_critter()) as i32 / 2,
            Compass => count(CardType::Traveler),
            GildedBook => count(CardType::Governance),
            Hourglass => count(CardType::Destination),
            KeyToTheCity => player.count_where(|c| c.is_construction()) as i32 / 2,
            Masque => {
                let stored: u32 = player.played_cards().iter().map(|c| c.resources.vp).sum();
                (player.resources.vp + stored) as i32 / 3
            }
            Mirror => {
                let colors: BTreeSet<CardType> = player.played_cards().iter().map(|c| c.card_name.card_type()).collect();
                colors.len() as i32
            }
            Scales => player.num_cards_in_hand().min(5) as i32,
            SeaglassAmulet => 0,
            Spyglass => {
                let wonders = player.claimed_events.keys().filter(|e| e.event_type() == EventType::Wonder).count();
                3 * wonders as i32
            }
            Sundial => count(CardType::Production) / 2,
            Tiara => count(CardType::Prosperity),
        };
        self.base_vp() + bonus
    }
}

impl fmt::Display for AdornmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AdornmentName::Bell => "Bell",
            AdornmentName::Compass => "Compass",
            AdornmentName::GildedBook => "Gilded Book",
            AdornmentName::Hourglass => "Hourglass",
            AdornmentName::KeyToTheCity => "Key to the City",
            AdornmentName::Masque => "Masque",
            AdornmentName::Mirror => "Mirror",
            AdornmentName::Scales => "Scales",
            AdornmentName::SeaglassAmulet => "Seaglass Amulet",
            AdornmentName::Spyglass => "Spyglass",
            AdornmentName::Sundial => "Sundial",
            AdornmentName::Tiara => "Tiara",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameOptions, PlayerId};

    fn state_with(cards: &[CardName]) -> GameState {
        let players = vec![Player::new("a", PlayerId::new(0), "s0"), Player::new("b", PlayerId::new(1), "s1")];
        let mut state = GameState::initial(players, GameOptions::base().with_pearlbrook(), 11).unwrap();
        for &card in cards {
            state.add_to_city(PlayerId::new(0), card).unwrap();
        }
        state
    }

    #[test]
    fn test_points_by_city() {
        let state = state_with(&[CardName::Farm, CardName::Mine, CardName::Wife, CardName::Wanderer]);
        let player = state.player(PlayerId::new(0));
        assert_eq!(AdornmentName::Bell.points(player, &state), 1);
        assert_eq!(AdornmentName::Sundial.points(player, &state), 1);
        assert_eq!(AdornmentName::Compass.points(player, &state), 1);
        assert_eq!(AdornmentName::Mirror.points(player, &state), 3);
        assert_eq!(AdornmentName::SeaglassAmulet.points(player, &state), 3);
    }

    #[test]
    fn test_scales_caps_at_five() {
        let mut state = state_with(&[]);
        state.player_mut(PlayerId::new(0)).cards_in_hand = vec![CardName::Farm; 7];
        let player = state.player(PlayerId::new(0));
        assert_eq!(AdornmentName::Scales.points(player, &state), 5);
    }

    #[test]
    fn test_playing_needs_a_pearl() {
        let mut state = state_with(&[]);
        let adornment = state.active().adornments_in_hand[0];
        let input = GameInput::PlayAdornment { adornment };
        let err = adornment.can_play_check(&state, &input).unwrap_err();
        assert!(err.reason().contains("PEARL"));

        state.player_mut(PlayerId::new(0)).gain_resources(ResourceMap::NONE.with_pearl(1));
        assert!(adornment.can_play(&state, &input));
    }
}
