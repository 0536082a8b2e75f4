//! Governance cards that react to later plays.

use crate::cards::CardName;
use crate::core::log::log_parts;
use crate::core::{ContextTag, GameInput, GameState, Prompt, Purpose, ResourceMap, ResourceType, SelectOptionGeneric};
use crate::effects::validate_choice;
use crate::error::{GameError, GameResult};

const COURTHOUSE_OPTIONS: [ResourceType; 3] = [ResourceType::Twig, ResourceType::Resin, ResourceType::Pebble];

/// Run the reactions of the active player's city to `card` entering it.
pub(crate) fn after_card_played(state: &mut GameState, card: CardName) -> GameResult<()> {
    let player_id = state.active_player_id();
    let player = state.active();
    let historians = if card == CardName::Historian { 0 } else { player.count_card(CardName::Historian) };
    let shopkeeper = card.is_critter() && card != CardName::Shopkeeper && player.has_card_in_city(CardName::Shopkeeper);
    let courthouse =
        card.is_construction() && card != CardName::Courthouse && player.has_card_in_city(CardName::Courthouse);

    if historians > 0 {
        let drawn = state.draw_cards(player_id, historians);
        state.log(CardName::Historian, log_parts![player_id, format!(" drew {drawn} CARD.")]);
    }
    if shopkeeper {
        let berry = ResourceMap::new(0, 0, 0, 1);
        state.player_mut(player_id).gain_resources(berry);
        state.log(CardName::Shopkeeper, log_parts![player_id, " gained ", berry, "."]);
    }
    if courthouse {
        state.push_pending(GameInput::SelectOptionGeneric(SelectOptionGeneric {
            prompt: Prompt::new(ContextTag::new(CardName::Courthouse, Purpose::Main), "Select a resource to gain"),
            options: COURTHOUSE_OPTIONS.iter().map(ToString::to_string).collect(),
            selected_option: None,
        }))?;
    }
    Ok(())
}

pub(super) fn resolve(card: CardName, state: &mut GameState, input: &GameInput) -> GameResult<()> {
    match (card, input) {
        (CardName::Courthouse, GameInput::SelectOptionGeneric(select)) => {
            let chosen = validate_choice(&select.options, select.selected_option.as_ref(), true)?
                .ok_or_else(|| GameError::validation("Please select a resource"))?;
            let resource: ResourceType = chosen.parse()?;
            let player_id = state.active_player_id();
            let gain = ResourceMap::of(resource, 1);
            state.player_mut(player_id).gain_resources(gain);
            state.log(card, log_parts![player_id, " gained ", gain, "."]);
            Ok(())
        }
        _ => Err(GameError::invariant(format!("{card} cannot handle {:?}", input.kind()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameOptions, PlayerId};
    use crate::player::Player;

    fn state() -> GameState {
        let players = vec![Player::new("A", PlayerId::new(0), "a"), Player::new("B", PlayerId::new(1), "b")];
        GameState::initial(players, GameOptions::base(), 3).unwrap()
    }

    #[test]
    fn test_shopkeeper_pays_for_critters_only() {
        let mut state = state();
        let pid = state.active_player_id();
        state.add_to_city(pid, CardName::Shopkeeper).unwrap();
        let before = state.active().resources.berry;

        after_card_played(&mut state, CardName::Farm).unwrap();
        assert_eq!(state.active().resources.berry, before);

        after_card_played(&mut state, CardName::Wanderer).unwrap();
        assert_eq!(state.active().resources.berry, before + 1);
    }

    #[test]
    fn test_courthouse_prompt() {
        let mut state = state();
        let pid = state.active_player_id();
        state.add_to_city(pid, CardName::Courthouse).unwrap();
        after_card_played(&mut state, CardName::Mine).unwrap();
        let Some(GameInput::SelectOptionGeneric(select)) = state.pending_input() else {
            panic!("expected a Courthouse prompt");
        };
        assert_eq!(select.options, vec!["TWIG", "RESIN", "PEBBLE"]);

        let answer = GameInput::SelectOptionGeneric(select.clone()).with_option("RESIN");
        resolve(CardName::Courthouse, &mut state, &answer).unwrap();
        assert_eq!(state.active().resources.resin, 1);
    }
}
