//! End-of-game bonuses.
//!
//! The bonus covers every copy of a card in the city; scoring asks once per
//! card name.

use std::collections::BTreeSet;

use crate::board::EventType;
use crate::cards::{CardName, CardType};
use crate::core::GameState;
use crate::player::Player;

/// Most VP the Architect can score.
const ARCHITECT_CAP: u32 = 6;

pub(super) fn bonus_points(card: CardName, player: &Player, _state: &GameState) -> i32 {
    use CardName::*;
    let constructions = |unique: bool| player.count_where(|c| c.is_construction() && c.is_unique() == unique);
    let critters = |unique: bool| player.count_where(|c| c.is_critter() && c.is_unique() == unique);

    let points = match card {
        Castle => constructions(false),
        Palace => constructions(true),
        School => critters(false),
        Theatre => critters(true),
        Evertree => player.count_cards_by_type(CardType::Prosperity),
        Architect => (player.resources.resin + player.resources.pebble).min(ARCHITECT_CAP) as usize,
        King => player
            .claimed_events
            .keys()
            .map(|e| match e.event_type() {
                EventType::Basic => 1,
                EventType::Special => 2,
                EventType::Wonder => 0,
            })
            .sum(),
        Wife => 3 * player.count_card(Wife).min(player.count_card(Husband)),
        Library => player
            .played_cards()
            .iter()
            .map(|c| c.card_name.card_type())
            .collect::<BTreeSet<_>>()
            .len(),
        _ => 0,
    };
    points as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameOptions, PlayerId};

    fn state_with(cards: &[CardName]) -> GameState {
        let players = vec![Player::new("A", PlayerId::new(0), "a"), Player::new("B", PlayerId::new(1), "b")];
        let mut state = GameState::initial(players, GameOptions::base(), 9).unwrap();
        for &card in cards {
            state.add_to_city(PlayerId::new(0), card).unwrap();
        }
        state
    }

    #[test]
    fn test_castle_and_palace() {
        let state = state_with(&[CardName::Castle, CardName::Palace, CardName::Farm, CardName::Mine]);
        let player = state.player(PlayerId::new(0));
        assert_eq!(bonus_points(CardName::Castle, player, &state), 2);
        assert_eq!(bonus_points(CardName::Palace, player, &state), 2);
        assert_eq!(bonus_points(CardName::Evertree, player, &state), 2);
    }

    #[test]
    fn test_wife_pairs_with_husband() {
        let state = state_with(&[CardName::Wife, CardName::Wife, CardName::Husband]);
        let player = state.player(PlayerId::new(0));
        assert_eq!(bonus_points(CardName::Wife, player, &state), 3);
    }

    #[test]
    fn test_architect_is_capped() {
        let mut state = state_with(&[CardName::Architect]);
        state.player_mut(PlayerId::new(0)).resources = crate::core::ResourceMap::new(0, 5, 4, 0);
        let player = state.player(PlayerId::new(0));
        assert_eq!(bonus_points(CardName::Architect, player, &state), 6);
    }
}
