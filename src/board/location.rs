//! Worker-placement locations.
//!
//! ## Occupancy
//!
//! - `Exclusive`: one worker in total.
//! - `Shared`: forest spots. One worker, or two workers from different
//!   players in a four-player game.
//! - `Unlimited`: any number of workers.
//!
//! A location's effect is separate from placing the worker so the Lookout
//! and the Hourglass can trigger it without a worker.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::log::log_parts;
use crate::core::{
    ContextTag, GameInput, GameState, Prompt, Purpose, ResourceMap, SelectCards, SelectLocation, Season,
};
use crate::effects::{validate_choice, validate_selection, GainAnyResource, GainManyResources, Playable};
use crate::error::{ensure, GameError, GameResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationType {
    Basic,
    Forest,
    Haven,
    Journey,
    Station,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationOccupancy {
    Exclusive,
    Shared,
    Unlimited,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LocationName {
    BasicOneBerry,
    BasicOneBerryAndOneCard,
    BasicOneResinAndOneCard,
    BasicOnePebble,
    BasicThreeTwig,
    BasicTwoResin,
    BasicTwoTwigAndOneCard,
    BasicTwoCardsAndOnePoint,
    ForestThreeBerry,
    ForestTwoBerryOneCard,
    ForestTwoWild,
    ForestOneTwigResinBerry,
    ForestOnePebbleThreeCard,
    ForestTwoCardsOneWild,
    ForestDiscardUpToThreeThenDrawTwoPerCard,
    ForestCopyBasicOneCard,
    ForestDiscardUpToThreeToGainWildPerCard,
    Haven,
    JourneyTwo,
    JourneyThree,
    JourneyFour,
    JourneyFive,
    Station,
}

impl LocationName {
    pub const BASIC: [LocationName; 8] = [
        LocationName::BasicOneBerry,
        LocationName::BasicOneBerryAndOneCard,
        LocationName::BasicOneResinAndOneCard,
        LocationName::BasicOnePebble,
        LocationName::BasicThreeTwig,
        LocationName::BasicTwoResin,
        LocationName::BasicTwoTwigAndOneCard,
        LocationName::BasicTwoCardsAndOnePoint,
    ];

    pub const FOREST: [LocationName; 9] = [
        LocationName::ForestThreeBerry,
        LocationName::ForestTwoBerryOneCard,
        LocationName::ForestTwoWild,
        LocationName::ForestOneTwigResinBerry,
        LocationName::ForestOnePebbleThreeCard,
        LocationName::ForestTwoCardsOneWild,
        LocationName::ForestDiscardUpToThreeThenDrawTwoPerCard,
        LocationName::ForestCopyBasicOneCard,
        LocationName::ForestDiscardUpToThreeToGainWildPerCard,
    ];

    pub const JOURNEY: [LocationName; 4] = [
        LocationName::JourneyTwo,
        LocationName::JourneyThree,
        LocationName::JourneyFour,
        LocationName::JourneyFive,
    ];

    #[must_use]
    pub fn location_type(self) -> LocationType {
        use LocationName::*;
        match self {
            Haven => LocationType::Haven,
            JourneyTwo | JourneyThree | JourneyFour | JourneyFive => LocationType::Journey,
            Station => LocationType::Station,
            l if LocationName::FOREST.contains(&l) => LocationType::Forest,
            _ => LocationType::Basic,
        }
    }

    #[must_use]
    pub fn occupancy(self) -> LocationOccupancy {
        use LocationName::*;
        match self {
            BasicOneBerryAndOneCard | BasicOnePebble | BasicThreeTwig | BasicTwoResin => LocationOccupancy::Exclusive,
            JourneyThree | JourneyFour | JourneyFive => LocationOccupancy::Exclusive,
            l if l.location_type() == LocationType::Forest => LocationOccupancy::Shared,
            _ => LocationOccupancy::Unlimited,
        }
    }

    /// Resources and cards granted outright.
    fn simple_gain(self) -> Option<(ResourceMap, usize)> {
        use LocationName::*;
        let gain = match self {
            BasicOneBerry => (ResourceMap::new(0, 0, 0, 1), 0),
            BasicOneBerryAndOneCard => (ResourceMap::new(0, 0, 0, 1), 1),
            BasicOneResinAndOneCard => (ResourceMap::new(0, 1, 0, 0), 1),
            BasicOnePebble => (ResourceMap::new(0, 0, 1, 0), 0),
            BasicThreeTwig => (ResourceMap::new(3, 0, 0, 0), 0),
            BasicTwoResin => (ResourceMap::new(0, 2, 0, 0), 0),
            BasicTwoTwigAndOneCard => (ResourceMap::new(2, 0, 0, 0), 1),
            BasicTwoCardsAndOnePoint => (ResourceMap::NONE.with_vp(1), 2),
            ForestThreeBerry => (ResourceMap::new(0, 0, 0, 3), 0),
            ForestTwoBerryOneCard => (ResourceMap::new(0, 0, 0, 2), 1),
            ForestOneTwigResinBerry => (ResourceMap::new(1, 1, 0, 1), 0),
            ForestOnePebbleThreeCard => (ResourceMap::new(0, 0, 1, 0), 3),
            _ => return None,
        };
        Some(gain)
    }

    /// Cards discarded and points scored on a Journey.
    #[must_use]
    pub fn journey_points(self) -> Option<usize> {
        match self {
            LocationName::JourneyTwo => Some(2),
            LocationName::JourneyThree => Some(3),
            LocationName::JourneyFour => Some(4),
            LocationName::JourneyFive => Some(5),
            _ => None,
        }
    }

    /// Whether `player` may put a worker here right now.
    pub fn can_place_worker_check(self, state: &GameState) -> GameResult<()> {
        let player = state.active();
        let occupants = state
            .location_occupants(self)
            .ok_or_else(|| GameError::validation(format!("{self} is not part of this game")))?;
        ensure!(player.num_available_workers() > 0, "No more workers to place");
        match self.occupancy() {
            LocationOccupancy::Exclusive => ensure!(occupants.is_empty(), "{self} is already occupied"),
            LocationOccupancy::Shared => {
                if state.player_count() == 4 {
                    ensure!(occupants.len() < 2, "{self} is already occupied");
                    ensure!(
                        !occupants.contains(&player.player_id),
                        "You already have a worker on {self}"
                    );
                } else {
                    ensure!(occupants.is_empty(), "{self} is already occupied");
                }
            }
            LocationOccupancy::Unlimited => {}
        }
        if self.location_type() == LocationType::Journey {
            ensure!(player.current_season == Season::Autumn, "Cannot go on a Journey before Autumn");
        }
        Ok(())
    }

    /// Checks on the effect itself, shared by placement and copying.
    pub fn can_trigger_check(self, state: &GameState) -> GameResult<()> {
        let player = state.active();
        if let Some(n) = self.journey_points() {
            ensure!(player.num_cards_in_hand() >= n, "Need at least {n} cards in hand to go on this Journey");
        }
        if self == LocationName::Station {
            ensure!(
                state.station_cards().is_some_and(|s| s.iter().any(Option::is_some)),
                "No station cards to take"
            );
            ensure!(player.hand_space() > 0, "Hand is full");
        }
        Ok(())
    }

    fn discard_prompt(self, state: &GameState, label: String, min: usize, max: usize) -> GameInput {
        let hand = state.active().cards_in_hand.clone();
        let max = max.min(hand.len());
        GameInput::SelectCards(SelectCards {
            prompt: Prompt::new(ContextTag::new(self, Purpose::Discard), label),
            card_options: hand,
            min_to_select: min.min(max),
            max_to_select: max,
            selected_cards: vec![],
        })
    }

    /// Run the effect for the active player without placing a worker.
    pub(crate) fn trigger(self, state: &mut GameState) -> GameResult<()> {
        use LocationName::*;
        let player = state.active_player_id();

        if let Some((resources, cards)) = self.simple_gain() {
            state.player_mut(player).gain_resources(resources);
            let drawn = state.draw_cards(player, cards);
            if drawn > 0 {
                state.log(self, log_parts![player, " gained ", resources, format!(" and drew {drawn} CARD.")]);
            } else {
                state.log(self, log_parts![player, " gained ", resources, "."]);
            }
            return Ok(());
        }

        match self {
            ForestTwoWild => state.push_pending(GainManyResources::new(self).input(2)),
            ForestTwoCardsOneWild => {
                let drawn = state.draw_cards(player, 2);
                state.log(self, log_parts![player, format!(" drew {drawn} CARD.")]);
                state.push_pending(GainAnyResource::new(self).input())
            }
            ForestDiscardUpToThreeThenDrawTwoPerCard => {
                let prompt = self.discard_prompt(state, "Discard up to 3 CARD to draw 2 CARD for each".into(), 0, 3);
                state.push_pending(prompt)
            }
            ForestDiscardUpToThreeToGainWildPerCard => {
                let prompt = self.discard_prompt(state, "Discard up to 3 CARD to gain 1 ANY for each".into(), 0, 3);
                state.push_pending(prompt)
            }
            ForestCopyBasicOneCard => {
                let drawn = state.draw_cards(player, 1);
                state.log(self, log_parts![player, format!(" drew {drawn} CARD.")]);
                state.push_pending(GameInput::SelectLocation(SelectLocation {
                    prompt: Prompt::new(ContextTag::new(self, Purpose::Copy), "Select a basic location to copy"),
                    location_options: LocationName::BASIC.to_vec(),
                    selected_location: None,
                }))
            }
            Haven => {
                let max = state.active().num_cards_in_hand();
                let prompt = self.discard_prompt(state, "Discard CARD to gain 1 ANY for every 2".into(), 0, max);
                state.push_pending(prompt)
            }
            JourneyTwo | JourneyThree | JourneyFour | JourneyFive => {
                let n = self.journey_points().unwrap_or_default();
                let prompt = self.discard_prompt(state, format!("Discard {n} CARD"), n, n);
                state.push_pending(prompt)
            }
            Station => {
                let options: Vec<_> = state.station_cards().into_iter().flatten().flatten().copied().collect();
                state.push_pending(GameInput::SelectCards(SelectCards {
                    prompt: Prompt::new(ContextTag::new(self, Purpose::TakeCards), "Select a station card"),
                    card_options: options,
                    min_to_select: 1,
                    max_to_select: 1,
                    selected_cards: vec![],
                }))
            }
            other => Err(GameError::invariant(format!("No effect for {other}"))),
        }
    }

    fn resolve(self, state: &mut GameState, input: &GameInput, purpose: Purpose) -> GameResult<()> {
        use LocationName::*;
        let player = state.active_player_id();

        match (purpose, input) {
            (Purpose::GainAny, _) => GainAnyResource::new(self).resolve(state, input).map(|_| ()),
            (Purpose::GainMany, _) => GainManyResources::new(self).resolve(state, input).map(|_| ()),
            (Purpose::Discard, GameInput::SelectCards(select)) => {
                validate_selection(&select.card_options, &select.selected_cards, select.min_to_select, select.max_to_select)?;
                let selected = select.selected_cards.clone();
                for &card in &selected {
                    state.player_mut(player).remove_card_from_hand(card)?;
                }
                let n = selected.len();
                state.discard_cards(selected);
                match self {
                    ForestDiscardUpToThreeThenDrawTwoPerCard => {
                        let drawn = state.draw_cards(player, n * 2);
                        state.log(self, log_parts![player, format!(" discarded {n} CARD and drew {drawn} CARD.")]);
                        Ok(())
                    }
                    ForestDiscardUpToThreeToGainWildPerCard => {
                        state.log(self, log_parts![player, format!(" discarded {n} CARD.")]);
                        if n > 0 {
                            state.push_pending(GainManyResources::new(self).input(n as u32))?;
                        }
                        Ok(())
                    }
                    Haven => {
                        state.log(self, log_parts![player, format!(" discarded {n} CARD.")]);
                        if n >= 2 {
                            state.push_pending(GainManyResources::new(self).input((n / 2) as u32))?;
                        }
                        Ok(())
                    }
                    JourneyTwo | JourneyThree | JourneyFour | JourneyFive => {
                        state.log(self, log_parts![player, format!(" discarded {n} CARD to go on a Journey.")]);
                        Ok(())
                    }
                    other => Err(GameError::invariant(format!("{other} does not discard"))),
                }
            }
            (Purpose::Copy, GameInput::SelectLocation(select)) => {
                let chosen = validate_choice(&select.location_options, select.selected_location.as_ref(), true)?
                    .ok_or_else(|| GameError::validation("Please select a location"))?;
                ensure!(chosen.location_type() == LocationType::Basic, "Can only copy a basic location");
                state.log(self, log_parts![player, " copied ", chosen, "."]);
                chosen.trigger(state)
            }
            (Purpose::TakeCards, GameInput::SelectCards(select)) => {
                validate_selection(&select.card_options, &select.selected_cards, 1, 1)?;
                let card = select.selected_cards[0];
                let slot = state
                    .station_slot_of(card)
                    .ok_or_else(|| GameError::validation(format!("{card} is not at the station")))?;
                state.take_station_card(slot)?;
                state.player_mut(player).add_card_to_hand(card);
                state.log(self, log_parts![player, " took ", card, " from the station."]);
                Ok(())
            }
            _ => Err(GameError::invariant(format!("{self} cannot handle {:?}", input.kind()))),
        }
    }
}

impl Playable for LocationName {
    fn can_play_check(self, state: &GameState, input: &GameInput) -> GameResult<()> {
        match input {
            GameInput::PlaceWorker { location } if *location == self => {
                self.can_place_worker_check(state)?;
                self.can_trigger_check(state)
            }
            _ => self.can_trigger_check(state),
        }
    }

    fn play(self, state: &mut GameState, input: &GameInput) -> GameResult<()> {
        match input.purpose_for(self.into()) {
            None => self.trigger(state),
            Some(purpose) => self.resolve(state, input, purpose),
        }
    }
}

impl fmt::Display for LocationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use LocationName::*;
        let s = match self {
            BasicOneBerry => "1 BERRY",
            BasicOneBerryAndOneCard => "1 BERRY & 1 CARD",
            BasicOneResinAndOneCard => "1 RESIN & 1 CARD",
            BasicOnePebble => "1 PEBBLE",
            BasicThreeTwig => "3 TWIG",
            BasicTwoResin => "2 RESIN",
            BasicTwoTwigAndOneCard => "2 TWIG & 1 CARD",
            BasicTwoCardsAndOnePoint => "2 CARD & 1 VP",
            ForestThreeBerry => "3 BERRY",
            ForestTwoBerryOneCard => "2 BERRY & 1 CARD",
            ForestTwoWild => "2 ANY",
            ForestOneTwigResinBerry => "1 TWIG, 1 RESIN & 1 BERRY",
            ForestOnePebbleThreeCard => "1 PEBBLE & 3 CARD",
            ForestTwoCardsOneWild => "2 CARD & 1 ANY",
            ForestDiscardUpToThreeThenDrawTwoPerCard => "Discard up to 3 CARD, draw 2 for each",
            ForestCopyBasicOneCard => "Copy a basic location & draw 1 CARD",
            ForestDiscardUpToThreeToGainWildPerCard => "Discard up to 3 CARD, gain 1 ANY for each",
            Haven => "Haven",
            JourneyTwo => "Journey (2)",
            JourneyThree => "Journey (3)",
            JourneyFour => "Journey (4)",
            JourneyFive => "Journey (5)",
            Station => "Station",
        };
        f.write_str(s)
    }
}
