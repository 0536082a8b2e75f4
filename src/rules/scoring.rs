//! End-of-game points.

use rustc_hash::FxHashSet;

use crate::core::{GameState, WorkerPlacement};
use crate::effects::Playable;
use crate::player::Player;

/// Each Pearl left over is worth this much with Pearlbrook.
const POINTS_PER_PEARL: i32 = 2;

impl Player {
    /// Current score.
    ///
    /// Printed VP and VP stored on cards, VP tokens, card bonuses, events,
    /// Journey workers, adornments, visitors and, with Pearlbrook, pearls.
    #[must_use]
    pub fn get_points(&self, state: &GameState) -> i32 {
        let mut points = 0;

        // Bonuses already count every copy of a card.
        let mut bonus_counted = FxHashSet::default();
        for card in self.played_cards() {
            points += card.card_name.base_vp() + card.resources.vp as i32;
            if bonus_counted.insert(card.card_name) {
                points += card.card_name.points(self, state);
            }
        }

        points += self.resources.vp as i32;
        if state.options().pearlbrook {
            points += POINTS_PER_PEARL * self.resources.pearl as i32;
        }

        points += self.claimed_events.keys().map(|e| e.points(self, state)).sum::<i32>();

        points += self
            .placed_workers
            .iter()
            .filter_map(|p| match p {
                WorkerPlacement::Location(l) => l.journey_points(),
                _ => None,
            })
            .map(|n| n as i32)
            .sum::<i32>();

        points += self.played_adornments.iter().map(|a| a.points(self, state)).sum::<i32>();
        points += self.claimed_visitors.iter().map(|v| v.points(self, state)).sum::<i32>();
        points
    }
}

#[cfg(test)]
mod tests {
    use crate::board::LocationName;
    use crate::cards::CardName;
    use crate::core::{GameOptions, GameState, PlayerId, ResourceMap, WorkerPlacement};
    use crate::player::Player;

    fn state() -> GameState {
        let players = vec![Player::new("A", PlayerId::new(0), "a"), Player::new("B", PlayerId::new(1), "b")];
        GameState::initial(players, GameOptions::base(), 2).unwrap()
    }

    #[test]
    fn test_empty_city_scores_zero() {
        let state = state();
        assert_eq!(state.player(PlayerId::new(0)).get_points(&state), 0);
    }

    #[test]
    fn test_base_vp_and_tokens() {
        let mut state = state();
        let pid = PlayerId::new(0);
        state.add_to_city(pid, CardName::Farm).unwrap();
        state.add_to_city(pid, CardName::Mine).unwrap();
        state.player_mut(pid).gain_resources(ResourceMap::NONE.with_vp(4));
        assert_eq!(state.player(pid).get_points(&state), 1 + 2 + 4);
    }

    #[test]
    fn test_pearls_only_count_with_pearlbrook() {
        let mut state = state();
        let pid = PlayerId::new(0);
        state.player_mut(pid).gain_resources(ResourceMap::NONE.with_pearl(2));
        assert_eq!(state.player(pid).get_points(&state), 0);
    }

    #[test]
    fn test_journey_points() {
        let mut state = state();
        let pid = PlayerId::new(0);
        state.player_mut(pid).placed_workers.push(WorkerPlacement::Location(LocationName::JourneyThree));
        assert_eq!(state.player(pid).get_points(&state), 3);
    }

    #[test]
    fn test_wife_bonus_counted_once() {
        let mut state = state();
        let pid = PlayerId::new(0);
        for card in [CardName::Husband, CardName::Wife, CardName::Husband, CardName::Wife] {
            state.add_to_city(pid, card).unwrap();
        }
        let base: i32 = [CardName::Husband, CardName::Wife]
            .iter()
            .map(|c| 2 * c.base_vp())
            .sum();
        assert_eq!(state.player(pid).get_points(&state), base + 2 * 3);
    }
}
