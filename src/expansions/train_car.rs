//! Train-car tiles.
//!
//! Three tiles are revealed, one under each station slot. Taking the
//! station card above a tile grants the tile's reward, then the tile is
//! rotated out with `RevealedStack::replace_at`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::log::log_parts;
use crate::core::{GameInput, GameState, ResourceMap};
use crate::effects::{GainAnyResource, Playable};
use crate::error::{GameError, GameResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrainCarTileName {
    OneBerry,
    OneResin,
    OnePebble,
    OneAny,
    TwoTwig,
    OneVp,
}

impl TrainCarTileName {
    pub const ALL: [TrainCarTileName; 6] = [
        TrainCarTileName::OneBerry,
        TrainCarTileName::OneResin,
        TrainCarTileName::OnePebble,
        TrainCarTileName::OneAny,
        TrainCarTileName::TwoTwig,
        TrainCarTileName::OneVp,
    ];

    /// Fixed reward, or `None` for the tile that asks for a choice.
    #[must_use]
    pub fn reward(self) -> Option<ResourceMap> {
        match self {
            TrainCarTileName::OneBerry => Some(ResourceMap::new(0, 0, 0, 1)),
            TrainCarTileName::OneResin => Some(ResourceMap::new(0, 1, 0, 0)),
            TrainCarTileName::OnePebble => Some(ResourceMap::new(0, 0, 1, 0)),
            TrainCarTileName::TwoTwig => Some(ResourceMap::new(2, 0, 0, 0)),
            TrainCarTileName::OneVp => Some(ResourceMap::NONE.with_vp(1)),
            TrainCarTileName::OneAny => None,
        }
    }

    /// Grant the tile to the active player.
    pub(crate) fn apply(self, state: &mut GameState) -> GameResult<()> {
        let player = state.active_player_id();
        match self.reward() {
            Some(gain) => {
                state.player_mut(player).gain_resources(gain);
                state.log(self, log_parts![player, " gained ", gain, "."]);
                Ok(())
            }
            None => state.push_pending(GainAnyResource::new(self).input()),
        }
    }
}

impl Playable for TrainCarTileName {
    fn can_play_check(self, _state: &GameState, _input: &GameInput) -> GameResult<()> {
        Ok(())
    }

    fn play(self, state: &mut GameState, input: &GameInput) -> GameResult<()> {
        let helper = GainAnyResource::new(self);
        if helper.matches(input) {
            helper.resolve(state, input).map(|_| ())
        } else if input.is_continuation() {
            Err(GameError::invariant(format!("{self} cannot handle {:?}", input.kind())))
        } else {
            self.apply(state)
        }
    }
}

impl fmt::Display for TrainCarTileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrainCarTileName::OneBerry => "Train Car (1 BERRY)",
            TrainCarTileName::OneResin => "Train Car (1 RESIN)",
            TrainCarTileName::OnePebble => "Train Car (1 PEBBLE)",
            TrainCarTileName::OneAny => "Train Car (1 ANY)",
            TrainCarTileName::TwoTwig => "Train Car (2 TWIG)",
            TrainCarTileName::OneVp => "Train Car (1 VP)",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_one_any_asks_for_a_choice() {
        let choices: Vec<_> = TrainCarTileName::ALL.iter().filter(|t| t.reward().is_none()).collect();
        assert_eq!(choices, vec![&TrainCarTileName::OneAny]);
        assert_eq!(TrainCarTileName::OneVp.reward().map(|r| r.vp), Some(1));
    }
}
