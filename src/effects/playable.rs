//! The capability shared by every catalog entity.

use crate::core::{EntityRef, GameInput, GameState};
use crate::error::GameResult;
use crate::player::Player;

/// A name-keyed catalog entry with an effect.
///
/// `play` is entered twice in a multi-step effect: first with the base input
/// (`PlayCard`, `PlaceWorker`, ...), then with each continuation whose
/// context source is this entity. `GameInput::purpose_for` tells the two
/// apart.
pub trait Playable: Copy + Into<EntityRef> {
    /// First reason `input` is not legal for this entity.
    fn can_play_check(self, state: &GameState, input: &GameInput) -> GameResult<()>;

    fn can_play(self, state: &GameState, input: &GameInput) -> bool {
        self.can_play_check(state, input).is_ok()
    }

    /// Apply the effect to the working state.
    fn play(self, state: &mut GameState, input: &GameInput) -> GameResult<()>;

    /// End-of-game points this entity is worth to `player`.
    fn points(self, _player: &Player, _state: &GameState) -> i32 {
        0
    }
}
