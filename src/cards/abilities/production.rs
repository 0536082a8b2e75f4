//! Production cards.
//!
//! Activated when played and again at Spring and Autumn production.
//! Cards that copy other production cards skip the copiers and the
//! Storehouse, which stores on itself.

use log::debug;

use super::selected_payment;
use crate::cards::{CardName, CardType};
use crate::core::log::log_parts;
use crate::core::{
    ContextTag, GameInput, GameState, PlayedCardRef, Prompt, Purpose, ResourceMap, ResourceType, SelectCards,
    SelectOptionGeneric, SelectPlayedCards, SelectPlayer, SelectResources,
};
use crate::effects::{validate_choice, validate_selection, GainAnyResource, GainManyResources};
use crate::error::{ensure, GameError, GameResult};

/// Storehouse bundles, in the order they are offered.
const STOREHOUSE_OPTIONS: [(&str, ResourceMap); 4] = [
    ("3 TWIG", ResourceMap::new(3, 0, 0, 0)),
    ("2 RESIN", ResourceMap::new(0, 2, 0, 0)),
    ("1 PEBBLE", ResourceMap::new(0, 0, 1, 0)),
    ("2 BERRY", ResourceMap::new(0, 0, 0, 2)),
];

fn gain(state: &mut GameState, card: CardName, resources: ResourceMap) {
    let player = state.active_player_id();
    state.player_mut(player).gain_resources(resources);
    state.log(card, log_parts![player, " gained ", resources, "."]);
}

fn is_copyable(card: CardName) -> bool {
    card.card_type() == CardType::Production
        && !matches!(card, CardName::MinerMole | CardName::ChipSweep | CardName::Storehouse)
}

fn spend_prompt(card: CardName, played: PlayedCardRef, label: &str, specific: Option<ResourceType>, max: u32) -> GameInput {
    GameInput::SelectResources(SelectResources {
        prompt: Prompt::new(ContextTag::new(card, Purpose::Spend), label).on_card(played),
        min_resources: 0,
        max_resources: max,
        specific_resource: specific,
        to_spend: true,
        resources: ResourceMap::NONE,
    })
}

pub(super) fn activate(card: CardName, state: &mut GameState, played: PlayedCardRef) -> GameResult<()> {
    use CardName::*;
    let player_id = state.active_player_id();
    let player = state.active();
    debug!("{player_id} activates {card}");

    match card {
        Farm => gain(state, card, ResourceMap::new(0, 0, 0, 1)),
        Mine => gain(state, card, ResourceMap::new(0, 0, 1, 0)),
        TwigBarge => gain(state, card, ResourceMap::new(2, 0, 0, 0)),
        ResinRefinery => gain(state, card, ResourceMap::new(0, 1, 0, 0)),
        Greenhouse => gain(state, card, ResourceMap::new(1, 0, 0, 1)),
        GeneralStore => {
            let berries = if player.has_card_in_city(Farm) { 2 } else { 1 };
            gain(state, card, ResourceMap::new(0, 0, 0, berries));
        }
        BargeToad => {
            let farms = player.count_card(Farm) as u32;
            if farms == 0 {
                state.log(card, log_parts![player_id, " has no Farm in their city."]);
            } else {
                gain(state, card, ResourceMap::new(2 * farms, 0, 0, 0));
            }
        }
        Fairgrounds => {
            let drawn = state.draw_cards(player_id, 2);
            state.log(card, log_parts![player_id, format!(" drew {drawn} CARD.")]);
        }
        Lamplighter => {
            state.player_mut(player_id).gain_resources(ResourceMap::new(0, 0, 0, 1));
            let drawn = state.draw_cards(player_id, 1);
            state.log(card, log_parts![player_id, " gained ", ResourceMap::new(0, 0, 0, 1), format!(" and drew {drawn} CARD.")]);
        }
        Storehouse => {
            state.push_pending(GameInput::SelectOptionGeneric(SelectOptionGeneric {
                prompt: Prompt::new(ContextTag::new(card, Purpose::Store), "Select resources to place on Storehouse")
                    .on_card(played),
                options: STOREHOUSE_OPTIONS.iter().map(|(label, _)| label.to_string()).collect(),
                selected_option: None,
            }))?;
        }
        Woodcarver | Doctor => {
            let (resource, label) = match card {
                Woodcarver => (ResourceType::Twig, "Pay up to 3 TWIG to gain 1 VP each"),
                _ => (ResourceType::Berry, "Pay up to 3 BERRY to gain 1 VP each"),
            };
            let have = player.resources.get(resource);
            if have == 0 {
                state.log(card, log_parts![player_id, format!(" has no {resource} to pay.")]);
            } else {
                state.push_pending(spend_prompt(card, played, label, Some(resource), have.min(3)))?;
            }
        }
        Peddler => {
            let have = player.resources.total_basic();
            if have == 0 {
                state.log(card, log_parts![player_id, " has no resources to trade."]);
            } else {
                let prompt = spend_prompt(card, played, "Pay up to 2 resources to gain as many ANY", None, have.min(2));
                state.push_pending(prompt)?;
            }
        }
        Husband => {
            if player.has_card_in_city(Wife) && player.has_card_in_city(Farm) {
                state.push_pending(GainAnyResource::new(card).input())?;
            } else {
                state.log(card, log_parts![player_id, " needs a Wife and a Farm to gain resources."]);
            }
        }
        Monk => {
            let berries = player.resources.berry;
            if berries == 0 {
                state.log(card, log_parts![player_id, " has no BERRY to give."]);
            } else {
                let prompt = GameInput::SelectResources(SelectResources {
                    prompt: Prompt::new(ContextTag::new(card, Purpose::Give), "Give up to 2 BERRY to gain 2 VP each")
                        .on_card(played),
                    min_resources: 0,
                    max_resources: berries.min(2),
                    specific_resource: Some(ResourceType::Berry),
                    to_spend: true,
                    resources: ResourceMap::NONE,
                });
                state.push_pending(prompt)?;
            }
        }
        Teacher => {
            let revealed = state.reveal_cards(2);
            match revealed.len() {
                0 => state.log(card, log_parts![player_id, " found no CARD to draw."]),
                1 => {
                    let drawn = state.add_or_discard(player_id, revealed);
                    state.log(card, log_parts![player_id, format!(" drew {drawn} CARD.")]);
                }
                _ => {
                    state.push_pending(GameInput::SelectCards(SelectCards {
                        prompt: Prompt::new(ContextTag::new(card, Purpose::Keep), "Select a CARD to keep").on_card(played),
                        card_options: revealed,
                        min_to_select: 1,
                        max_to_select: 1,
                        selected_cards: vec![],
                    }))?;
                }
            }
        }
        MinerMole | ChipSweep => {
            let options: Vec<PlayedCardRef> = state
                .players()
                .values()
                .filter(|p| (card == MinerMole) != (p.player_id == player_id))
                .flat_map(|p| p.played_cards().iter())
                .filter(|c| is_copyable(c.card_name))
                .map(|c| c.card_ref())
                .collect();
            if options.is_empty() {
                state.log(card, log_parts![player_id, " has no PRODUCTION card to copy."]);
            } else {
                state.push_pending(GameInput::SelectPlayedCards(SelectPlayedCards {
                    prompt: Prompt::new(ContextTag::new(card, Purpose::Copy), "Select a PRODUCTION card to copy")
                        .on_card(played),
                    card_options: options,
                    min_to_select: 1,
                    max_to_select: 1,
                    selected_cards: vec![],
                }))?;
            }
        }
        other => return Err(GameError::invariant(format!("{other} has no production effect"))),
    }
    Ok(())
}

pub(super) fn resolve(card: CardName, state: &mut GameState, input: &GameInput, purpose: Purpose) -> GameResult<()> {
    use CardName::*;
    let player_id = state.active_player_id();

    match (card, purpose, input) {
        (Husband, Purpose::GainAny, _) => GainAnyResource::new(card).resolve(state, input).map(|_| ()),
        (Peddler, Purpose::GainMany, _) => GainManyResources::new(card).resolve(state, input).map(|_| ()),
        (Storehouse, Purpose::Store, GameInput::SelectOptionGeneric(select)) => {
            let choice = validate_choice(&select.options, select.selected_option.as_ref(), true)?
                .ok_or_else(|| GameError::validation("Please make a selection"))?;
            let (_, bundle) = STOREHOUSE_OPTIONS
                .iter()
                .find(|(label, _)| *label == choice)
                .ok_or_else(|| GameError::validation(format!("Unknown option {choice}")))?;
            let target = input
                .played_card()
                .ok_or_else(|| GameError::invariant("Storehouse prompt without its card"))?;
            let storehouse = state
                .find_played_mut(target)
                .ok_or_else(|| GameError::invariant("Storehouse left the city"))?;
            storehouse.resources += *bundle;
            state.log(card, log_parts![player_id, " placed ", *bundle, " on ", card, "."]);
            Ok(())
        }
        (Woodcarver | Doctor, Purpose::Spend, GameInput::SelectResources(select)) => {
            let paid = selected_payment(select)?;
            let n = paid.total_basic();
            if n == 0 {
                state.log(card, log_parts![player_id, " declined to pay."]);
                return Ok(());
            }
            let player = state.player_mut(player_id);
            player.spend_resources(paid)?;
            player.gain_resources(ResourceMap::NONE.with_vp(n));
            state.log(card, log_parts![player_id, " paid ", paid, format!(" to gain {n} VP.")]);
            Ok(())
        }
        (Peddler, Purpose::Spend, GameInput::SelectResources(select)) => {
            let paid = selected_payment(select)?;
            let n = paid.total_basic();
            if n == 0 {
                state.log(card, log_parts![player_id, " declined to trade."]);
                return Ok(());
            }
            state.player_mut(player_id).spend_resources(paid)?;
            state.log(card, log_parts![player_id, " paid ", paid, "."]);
            state.push_pending(GainManyResources::new(card).input(n))
        }
        (Monk, Purpose::Give, GameInput::SelectResources(select)) => {
            let given = selected_payment(select)?;
            if given.total_basic() == 0 {
                state.log(card, log_parts![player_id, " declined to give BERRY."]);
                return Ok(());
            }
            let opponents = state.opponents_of(player_id);
            state.push_pending(GameInput::SelectPlayer(SelectPlayer {
                prompt: Prompt::new(ContextTag::new(card, Purpose::ChoosePlayer), "Select a player to give BERRY to")
                    .after(input),
                player_options: opponents,
                mandatory: true,
                selected_player: None,
            }))
        }
        (Monk, Purpose::ChoosePlayer, GameInput::SelectPlayer(select)) => {
            let target = validate_choice(&select.player_options, select.selected_player.as_ref(), true)?
                .ok_or_else(|| GameError::validation("Please select a player"))?;
            let Some(GameInput::SelectResources(prev)) = input.prev_input() else {
                return Err(GameError::invariant("Monk prompt lost its berries"));
            };
            let given = prev.resources;
            state.player_mut(player_id).spend_resources(given)?;
            state.player_mut(player_id).gain_resources(ResourceMap::NONE.with_vp(2 * given.berry));
            state.player_mut(target).gain_resources(given);
            state.log(card, log_parts![player_id, " gave ", given, " to ", target, format!(" and gained {} VP.", 2 * given.berry)]);
            Ok(())
        }
        (Teacher, Purpose::Keep, GameInput::SelectCards(select)) => {
            validate_selection(&select.card_options, &select.selected_cards, 1, 1)?;
            let opponents = state.opponents_of(player_id);
            state.push_pending(GameInput::SelectPlayer(SelectPlayer {
                prompt: Prompt::new(ContextTag::new(card, Purpose::Give), "Select a player to give the other CARD to")
                    .after(input),
                player_options: opponents,
                mandatory: true,
                selected_player: None,
            }))
        }
        (Teacher, Purpose::Give, GameInput::SelectPlayer(select)) => {
            let target = validate_choice(&select.player_options, select.selected_player.as_ref(), true)?
                .ok_or_else(|| GameError::validation("Please select a player"))?;
            let Some(GameInput::SelectCards(prev)) = input.prev_input() else {
                return Err(GameError::invariant("Teacher prompt lost its cards"));
            };
            let kept = prev.selected_cards[0];
            let mut rest = prev.card_options.clone();
            if let Some(idx) = rest.iter().position(|&c| c == kept) {
                rest.remove(idx);
            }
            state.add_or_discard(player_id, vec![kept]);
            state.add_or_discard(target, rest);
            state.log(card, log_parts![player_id, " kept a CARD and gave a CARD to ", target, "."]);
            Ok(())
        }
        (MinerMole | ChipSweep, Purpose::Copy, GameInput::SelectPlayedCards(select)) => {
            validate_selection(&select.card_options, &select.selected_cards, 1, 1)?;
            let chosen = select.selected_cards[0];
            let name = state
                .find_played(chosen)
                .map(|c| c.card_name)
                .ok_or_else(|| GameError::validation("Selected card is no longer in play"))?;
            ensure!(is_copyable(name), "Cannot copy {name}");
            let played = input
                .played_card()
                .ok_or_else(|| GameError::invariant(format!("{card} prompt without its card")))?;
            state.log(card, log_parts![player_id, " copied ", name, "."]);
            activate(name, state, played)
        }
        _ => Err(GameError::invariant(format!("{card} cannot handle {:?}", input.kind()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_targets() {
        assert!(is_copyable(CardName::Farm));
        assert!(is_copyable(CardName::Doctor));
        assert!(!is_copyable(CardName::MinerMole));
        assert!(!is_copyable(CardName::Storehouse));
        assert!(!is_copyable(CardName::Inn));
    }

    #[test]
    fn test_storehouse_options_are_single_kind() {
        for (label, bundle) in STOREHOUSE_OPTIONS {
            assert_eq!(bundle.iter().count(), 1, "{label}");
        }
    }
}
