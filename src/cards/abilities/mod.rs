//! Card effects.
//!
//! `CardName` implements `Playable`. Two base inputs reach a card:
//! `PlayCard`, after payment, to put it in a city, and
//! `VisitDestinationCard`, after the worker is placed. Follow-up decisions
//! come back with the card as their context source.
//!
//! ## Layout
//!
//! - `production.rs`: green cards, run on play and at every production
//! - `traveler.rs`: tan cards, run once on play
//! - `destination.rs`: cards that host workers
//! - `governance.rs`: blue cards reacting to the cards played after them
//! - `prosperity.rs`: end-of-game bonuses

mod destination;
mod governance;
mod production;
mod prosperity;
mod traveler;

use super::{CardName, CardType};
use crate::core::{GameInput, GameState, PlayedCardRef, PlayerId, Purpose, ResourceMap, SelectResources};
use crate::effects::Playable;
use crate::error::{ensure, GameError, GameResult};
use crate::player::Player;

impl Playable for CardName {
    fn can_play_check(self, state: &GameState, input: &GameInput) -> GameResult<()> {
        match input {
            GameInput::PlayCard(play) => {
                ensure!(play.card == self, "Input is for {}, not {self}", play.card);
                crate::rules::can_play_card_check(state, play)
            }
            GameInput::VisitDestinationCard { card } => destination::can_visit_check(self, state, *card),
            _ if input.purpose_for(self.into()).is_some() => Ok(()),
            _ => Err(GameError::invariant(format!("{self} cannot handle {:?}", input.kind()))),
        }
    }

    fn play(self, state: &mut GameState, input: &GameInput) -> GameResult<()> {
        if let Some(purpose) = input.purpose_for(self.into()) {
            return resolve(self, state, input, purpose);
        }
        match input {
            GameInput::PlayCard(_) => enter_city(self, state),
            GameInput::VisitDestinationCard { card } => destination::visit(self, state, *card),
            _ => Err(GameError::invariant(format!("{self} cannot handle {:?}", input.kind()))),
        }
    }

    fn points(self, player: &Player, state: &GameState) -> i32 {
        prosperity::bonus_points(self, player, state)
    }
}

fn resolve(card: CardName, state: &mut GameState, input: &GameInput, purpose: Purpose) -> GameResult<()> {
    match card.card_type() {
        CardType::Production => production::resolve(card, state, input, purpose),
        CardType::Traveler => traveler::resolve(card, state, input, purpose),
        CardType::Destination => destination::resolve(card, state, input, purpose),
        CardType::Governance => governance::resolve(card, state, input),
        CardType::Prosperity => Err(GameError::invariant(format!("{card} cannot handle {:?}", input.kind()))),
    }
}

/// Put a paid-for card into the active player's city and run its effect.
pub(crate) fn enter_city(card: CardName, state: &mut GameState) -> GameResult<()> {
    if card.places_after_decision() {
        return traveler::before_placement(card, state);
    }
    let player = state.active_player_id();
    let played = state.add_to_city(player, card)?;
    match card.card_type() {
        CardType::Production => production::activate(card, state, played)?,
        CardType::Traveler => traveler::activate(card, state, played)?,
        _ => {}
    }
    governance::after_card_played(state, card)
}

/// Run the production effect of one played card for the active player.
pub(crate) fn activate_production(state: &mut GameState, card: PlayedCardRef) -> GameResult<()> {
    let name = state
        .find_played(card)
        .map(|c| c.card_name)
        .ok_or_else(|| GameError::invariant(format!("Played card {card:?} not found")))?;
    ensure!(name.card_type() == CardType::Production, "{name} is not a PRODUCTION card");
    production::activate(name, state, card)
}

/// Production for every green card in a city.
pub(crate) fn activate_all_production(state: &mut GameState, player: PlayerId) -> GameResult<()> {
    let cards: Vec<_> = state
        .player(player)
        .played_cards()
        .iter()
        .filter(|c| c.card_name.card_type() == CardType::Production)
        .map(|c| c.card_ref())
        .collect();
    for card in cards {
        activate_production(state, card)?;
    }
    Ok(())
}

/// Travelers whose effect can run again without re-entering the city.
#[must_use]
pub(crate) fn can_reactivate(card: CardName) -> bool {
    card.card_type() == CardType::Traveler && !card.places_after_decision()
}

pub(crate) fn reactivate(state: &mut GameState, card: PlayedCardRef) -> GameResult<()> {
    let name = state
        .find_played(card)
        .map(|c| c.card_name)
        .ok_or_else(|| GameError::invariant(format!("Played card {card:?} not found")))?;
    ensure!(can_reactivate(name), "Cannot reactivate {name}");
    traveler::activate(name, state, card)
}

/// Check a `SelectResources` answer that pays from the player's supply.
fn selected_payment(select: &SelectResources) -> GameResult<ResourceMap> {
    let paid = select.resources;
    ensure!(paid.vp == 0 && paid.pearl == 0, "Can only select basic resources");
    let total = paid.total_basic();
    ensure!(total >= select.min_resources, "Please select at least {} resources", select.min_resources);
    ensure!(total <= select.max_resources, "Please select up to {} resources", select.max_resources);
    if let Some(only) = select.specific_resource {
        ensure!(paid.get(only) == total, "Can only select {only}");
    }
    Ok(paid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reactivation_excludes_placement_cards() {
        assert!(can_reactivate(CardName::Wanderer));
        assert!(can_reactivate(CardName::Bard));
        assert!(!can_reactivate(CardName::Ruins));
        assert!(!can_reactivate(CardName::Fool));
        assert!(!can_reactivate(CardName::Farm));
    }

    #[test]
    fn test_selected_payment_bounds() {
        use crate::core::{ContextTag, Prompt, ResourceType};
        let select = SelectResources {
            prompt: Prompt::new(ContextTag::new(CardName::Woodcarver, Purpose::Spend), "Pay"),
            min_resources: 0,
            max_resources: 3,
            specific_resource: Some(ResourceType::Twig),
            to_spend: true,
            resources: ResourceMap::new(2, 0, 0, 0),
        };
        assert_eq!(selected_payment(&select), Ok(ResourceMap::new(2, 0, 0, 0)));

        let wrong_kind = SelectResources { resources: ResourceMap::new(1, 1, 0, 0), ..select.clone() };
        assert!(selected_payment(&wrong_kind).is_err());

        let too_many = SelectResources { resources: ResourceMap::new(4, 0, 0, 0), ..select };
        assert!(selected_payment(&too_many).unwrap_err().reason().contains("up to 3"));
    }
}
