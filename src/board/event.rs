//! Events.
//!
//! Claiming an event costs a worker. Basic events ask for a number of cards
//! of one type. Special events ask for two named cards and usually let the
//! player store cards or resources on them for points. Pearlbrook wonders
//! cost resources, pearls and discarded cards.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cards::{CardName, CardType};
use crate::core::log::log_parts;
use crate::core::{
    ContextTag, GameInput, GameState, Prompt, Purpose, ResourceMap, ResourceType, SelectCards, SelectPlayedCards,
    SelectResources,
};
use crate::effects::{validate_selection, Playable};
use crate::error::{ensure, GameError, GameResult};
use crate::player::Player;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Basic,
    Special,
    Wonder,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventName {
    BasicFourProduction,
    BasicThreeDestination,
    BasicThreeGovernance,
    BasicThreeTraveler,
    AnEveningOfFireworks,
    CaptureOfTheAcornThieves,
    CroakWartCure,
    FlyingDoctorService,
    GraduationOfScholars,
    PerformerInResidence,
    TaxRelief,
    UnderNewManagement,
    HopewatchGate,
    MistriseFountain,
    SunblazeBridge,
    StarfallsFlame,
}

/// What a player needs in order to claim an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventRequirement {
    CardTypeCount(CardType, usize),
    Cards(CardName, CardName),
    /// Resources (pearls included) paid and cards discarded on claiming.
    Wonder { cost: ResourceMap, discard: usize },
}

impl EventName {
    pub const BASIC: [EventName; 4] = [
        EventName::BasicFourProduction,
        EventName::BasicThreeDestination,
        EventName::BasicThreeGovernance,
        EventName::BasicThreeTraveler,
    ];

    pub const SPECIAL: [EventName; 8] = [
        EventName::AnEveningOfFireworks,
        EventName::CaptureOfTheAcornThieves,
        EventName::CroakWartCure,
        EventName::FlyingDoctorService,
        EventName::GraduationOfScholars,
        EventName::PerformerInResidence,
        EventName::TaxRelief,
        EventName::UnderNewManagement,
    ];

    pub const WONDERS: [EventName; 4] = [
        EventName::HopewatchGate,
        EventName::MistriseFountain,
        EventName::SunblazeBridge,
        EventName::StarfallsFlame,
    ];

    #[must_use]
    pub fn event_type(self) -> EventType {
        if EventName::BASIC.contains(&self) {
            EventType::Basic
        } else if EventName::WONDERS.contains(&self) {
            EventType::Wonder
        } else {
            EventType::Special
        }
    }

    #[must_use]
    pub fn requirement(self) -> EventRequirement {
        use EventName::*;
        let wonder = |n: u32, pearls: u32, discard: usize| EventRequirement::Wonder {
            cost: ResourceMap::new(n, n, n, 0).with_pearl(pearls),
            discard,
        };
        match self {
            BasicFourProduction => EventRequirement::CardTypeCount(CardType::Production, 4),
            BasicThreeDestination => EventRequirement::CardTypeCount(CardType::Destination, 3),
            BasicThreeGovernance => EventRequirement::CardTypeCount(CardType::Governance, 3),
            BasicThreeTraveler => EventRequirement::CardTypeCount(CardType::Traveler, 3),
            AnEveningOfFireworks => EventRequirement::Cards(CardName::Lookout, CardName::MinerMole),
            CaptureOfTheAcornThieves => EventRequirement::Cards(CardName::Courthouse, CardName::Ranger),
            CroakWartCure => EventRequirement::Cards(CardName::Undertaker, CardName::BargeToad),
            FlyingDoctorService => EventRequirement::Cards(CardName::Doctor, CardName::PostalPigeon),
            GraduationOfScholars => EventRequirement::Cards(CardName::Teacher, CardName::University),
            PerformerInResidence => EventRequirement::Cards(CardName::Inn, CardName::Bard),
            TaxRelief => EventRequirement::Cards(CardName::Judge, CardName::Queen),
            UnderNewManagement => EventRequirement::Cards(CardName::Peddler, CardName::GeneralStore),
            HopewatchGate => wonder(1, 2, 2),
            MistriseFountain => wonder(2, 3, 3),
            SunblazeBridge => wonder(3, 4, 4),
            StarfallsFlame => wonder(4, 5, 5),
        }
    }

    #[must_use]
    pub fn base_vp(self) -> i32 {
        use EventName::*;
        match self {
            BasicFourProduction | BasicThreeDestination | BasicThreeGovernance | BasicThreeTraveler => 3,
            TaxRelief => 3,
            CroakWartCure => 6,
            HopewatchGate => 10,
            MistriseFountain => 15,
            SunblazeBridge => 20,
            StarfallsFlame => 25,
            _ => 0,
        }
    }

    fn requirement_met(self, player: &Player) -> bool {
        match self.requirement() {
            EventRequirement::CardTypeCount(card_type, n) => player.count_cards_by_type(card_type) >= n,
            EventRequirement::Cards(a, b) => player.has_card_in_city(a) && player.has_card_in_city(b),
            EventRequirement::Wonder { cost, discard } => {
                player.resources.contains(&cost) && player.num_cards_in_hand() >= discard
            }
        }
    }

    fn store_resources_prompt(self, label: &str, specific: Option<ResourceType>, available: u32) -> GameInput {
        GameInput::SelectResources(SelectResources {
            prompt: Prompt::new(ContextTag::new(self, Purpose::Store), label),
            min_resources: 0,
            max_resources: available.min(3),
            specific_resource: specific,
            to_spend: true,
            resources: ResourceMap::NONE,
        })
    }

    fn trigger(self, state: &mut GameState) -> GameResult<()> {
        use EventName::*;
        let player_id = state.active_player_id();
        let player = state.active();

        match self {
            AnEveningOfFireworks => {
                let twigs = player.resources.twig;
                if twigs > 0 {
                    let prompt = self.store_resources_prompt("Place up to 3 TWIG on this event", Some(ResourceType::Twig), twigs);
                    state.push_pending(prompt)?;
                }
            }
            PerformerInResidence => {
                let berries = player.resources.berry;
                if berries > 0 {
                    let prompt =
                        self.store_resources_prompt("Place up to 3 BERRY on this event", Some(ResourceType::Berry), berries);
                    state.push_pending(prompt)?;
                }
            }
            UnderNewManagement => {
                let total = player.resources.total_basic();
                if total > 0 {
                    let prompt = self.store_resources_prompt("Place up to 3 resources on this event", None, total);
                    state.push_pending(prompt)?;
                }
            }
            CaptureOfTheAcornThieves | CroakWartCure => {
                let wanted = |c: CardName| match self {
                    CroakWartCure => c == CardName::Farm,
                    _ => c.is_critter(),
                };
                let options: Vec<_> = player
                    .played_cards()
                    .iter()
                    .filter(|c| wanted(c.card_name))
                    .map(|c| c.card_ref())
                    .collect();
                let (min, label) = match self {
                    CroakWartCure => (options.len().min(2), "Discard 2 Farm from your city"),
                    _ => (0, "Place up to 2 critters from your city on this event"),
                };
                if !options.is_empty() {
                    state.push_pending(GameInput::SelectPlayedCards(SelectPlayedCards {
                        prompt: Prompt::new(ContextTag::new(self, Purpose::Store), label),
                        card_options: options,
                        min_to_select: min,
                        max_to_select: 2,
                        selected_cards: vec![],
                    }))?;
                }
            }
            GraduationOfScholars => {
                let critters: Vec<_> = player.cards_in_hand.iter().copied().filter(|c| c.is_critter()).collect();
                if !critters.is_empty() {
                    state.push_pending(GameInput::SelectCards(SelectCards {
                        prompt: Prompt::new(ContextTag::new(self, Purpose::Store), "Place up to 3 critters from your hand on this event"),
                        max_to_select: critters.len().min(3),
                        card_options: critters,
                        min_to_select: 0,
                        selected_cards: vec![],
                    }))?;
                }
            }
            TaxRelief => {
                state.log(self, log_parts![player_id, " activated PRODUCTION."]);
                crate::cards::activate_all_production(state, player_id)?;
            }
            HopewatchGate | MistriseFountain | SunblazeBridge | StarfallsFlame => {
                if let EventRequirement::Wonder { cost, discard } = self.requirement() {
                    state.player_mut(player_id).spend_resources(cost)?;
                    state.log(self, log_parts![player_id, " paid ", cost, "."]);
                    let hand = state.active().cards_in_hand.clone();
                    state.push_pending(GameInput::SelectCards(SelectCards {
                        prompt: Prompt::new(ContextTag::new(self, Purpose::Discard), format!("Discard {discard} CARD")),
                        card_options: hand,
                        min_to_select: discard,
                        max_to_select: discard,
                        selected_cards: vec![],
                    }))?;
                }
            }
            BasicFourProduction | BasicThreeDestination | BasicThreeGovernance | BasicThreeTraveler
            | FlyingDoctorService => {}
        }
        Ok(())
    }

    fn resolve(self, state: &mut GameState, input: &GameInput, purpose: Purpose) -> GameResult<()> {
        let player = state.active_player_id();
        match (purpose, input) {
            (Purpose::Store, GameInput::SelectResources(select)) => {
                let stored = select.resources;
                ensure!(stored.vp == 0 && stored.pearl == 0, "Can only place basic resources");
                ensure!(stored.total_basic() <= select.max_resources, "Please select up to {} resources", select.max_resources);
                if let Some(only) = select.specific_resource {
                    ensure!(stored.total_basic() == stored.get(only), "Can only place {only} on {self}");
                }
                state.player_mut(player).spend_resources(stored)?;
                let claimed = state.player_mut(player).claimed_events.entry(self).or_default();
                claimed.stored_resources += stored;
                state.log(self, log_parts![player, " placed ", stored, " on ", self, "."]);
                Ok(())
            }
            (Purpose::Store, GameInput::SelectPlayedCards(select)) => {
                validate_selection(&select.card_options, &select.selected_cards, select.min_to_select, select.max_to_select)?;
                let mut removed = Vec::new();
                for card_ref in &select.selected_cards {
                    ensure!(card_ref.owner == player, "Can only select cards from your city");
                    let card = state.remove_from_city(*card_ref)?;
                    removed.push(card.card_name);
                }
                let names = removed.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
                if self == EventName::CroakWartCure {
                    state.discard_cards(removed);
                    state.log(self, log_parts![player, format!(" discarded {names} from their city.")]);
                } else {
                    state.player_mut(player).claimed_events.entry(self).or_default().stored_cards.extend(removed);
                    state.log(self, log_parts![player, format!(" placed {names} on "), self, "."]);
                }
                Ok(())
            }
            (Purpose::Store, GameInput::SelectCards(select)) => {
                validate_selection(&select.card_options, &select.selected_cards, select.min_to_select, select.max_to_select)?;
                for &card in &select.selected_cards {
                    state.player_mut(player).remove_card_from_hand(card)?;
                }
                let n = select.selected_cards.len();
                state
                    .player_mut(player)
                    .claimed_events
                    .entry(self)
                    .or_default()
                    .stored_cards
                    .extend(select.selected_cards.iter().copied());
                state.log(self, log_parts![player, format!(" placed {n} CARD on "), self, "."]);
                Ok(())
            }
            (Purpose::Discard, GameInput::SelectCards(select)) => {
                validate_selection(&select.card_options, &select.selected_cards, select.min_to_select, select.max_to_select)?;
                for &card in &select.selected_cards {
                    state.player_mut(player).remove_card_from_hand(card)?;
                }
                let n = select.selected_cards.len();
                state.discard_cards(select.selected_cards.clone());
                state.log(self, log_parts![player, format!(" discarded {n} CARD to build "), self, "."]);
                Ok(())
            }
            _ => Err(GameError::invariant(format!("{self} cannot handle {:?}", input.kind()))),
        }
    }
}

impl Playable for EventName {
    fn can_play_check(self, state: &GameState, _input: &GameInput) -> GameResult<()> {
        let claimed = state
            .events()
            .get(&self)
            .ok_or_else(|| GameError::validation(format!("{self} is not part of this game")))?;
        ensure!(claimed.is_none(), "{self} has already been claimed");
        let player = state.active();
        ensure!(player.num_available_workers() > 0, "No more workers to place");
        ensure!(self.requirement_met(player), "Requirements for {self} are not met");
        Ok(())
    }

    fn play(self, state: &mut GameState, input: &GameInput) -> GameResult<()> {
        match input.purpose_for(self.into()) {
            None => self.trigger(state),
            Some(purpose) => self.resolve(state, input, purpose),
        }
    }

    fn points(self, player: &Player, state: &GameState) -> i32 {
        use EventName::*;
        let Some(claimed) = player.claimed_events.get(&self) else {
            return 0;
        };
        let stored = claimed.stored_resources;
        let bonus = match self {
            AnEveningOfFireworks => 2 * stored.twig as i32,
            PerformerInResidence => 2 * stored.berry as i32,
            UnderNewManagement => (stored.twig + stored.berry + 2 * (stored.resin + stored.pebble)) as i32,
            CaptureOfTheAcornThieves => 3 * claimed.stored_cards.len() as i32,
            GraduationOfScholars => 2 * claimed.stored_cards.len() as i32,
            FlyingDoctorService => {
                let pairs: usize = state
                    .players()
                    .values()
                    .map(|p| p.count_card(CardName::Husband).min(p.count_card(CardName::Wife)))
                    .sum();
                3 * pairs as i32
            }
            _ => 0,
        };
        self.base_vp() + bonus
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use EventName::*;
        let s = match self {
            BasicFourProduction => "4 PRODUCTION",
            BasicThreeDestination => "3 DESTINATION",
            BasicThreeGovernance => "3 GOVERNANCE",
            BasicThreeTraveler => "3 TRAVELER",
            AnEveningOfFireworks => "An Evening of Fireworks",
            CaptureOfTheAcornThieves => "Capture of the Acorn Thieves",
            CroakWartCure => "Croak Wart Cure",
            FlyingDoctorService => "Flying Doctor Service",
            GraduationOfScholars => "Graduation of Scholars",
            PerformerInResidence => "Performer in Residence",
            TaxRelief => "Tax Relief",
            UnderNewManagement => "Under New Management",
            HopewatchGate => "Hopewatch Gate",
            MistriseFountain => "Mistrise Fountain",
            SunblazeBridge => "Sunblaze Bridge",
            StarfallsFlame => "Starfalls Flame",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::PlayedCard;
    use crate::core::{PlayedCardId, PlayerId};

    #[test]
    fn test_event_types() {
        assert_eq!(EventName::BasicThreeTraveler.event_type(), EventType::Basic);
        assert_eq!(EventName::TaxRelief.event_type(), EventType::Special);
        assert_eq!(EventName::SunblazeBridge.event_type(), EventType::Wonder);
    }

    #[test]
    fn test_basic_requirement() {
        let mut player = Player::new("p", PlayerId::new(0), "s");
        for i in 0..3 {
            player.insert_played_card(PlayedCard::new(PlayedCardId(i), CardName::Wanderer, PlayerId::new(0)));
        }
        assert!(EventName::BasicThreeTraveler.requirement_met(&player));
        assert!(!EventName::BasicThreeGovernance.requirement_met(&player));
    }

    #[test]
    fn test_wonder_requirement_needs_pearls_and_cards() {
        let mut player = Player::new("p", PlayerId::new(0), "s");
        player.gain_resources(ResourceMap::new(1, 1, 1, 0));
        player.cards_in_hand = vec![CardName::Farm, CardName::Mine];
        assert!(!EventName::HopewatchGate.requirement_met(&player));
        player.gain_resources(ResourceMap::NONE.with_pearl(2));
        assert!(EventName::HopewatchGate.requirement_met(&player));
    }
}
