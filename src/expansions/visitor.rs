//! Visitors.
//!
//! Two visitors are revealed at a time. When a player prepares for a
//! season they may invite one of them; the visitor joins the player for
//! good and scores at game end. The slot is refilled from the rest pile.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cards::CardType;
use crate::core::log::log_parts;
use crate::core::{GameInput, GameState, ResourceType};
use crate::effects::Playable;
use crate::error::{GameError, GameResult};
use crate::player::Player;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VisitorName {
    BimLittle,
    Bosley,
    Butterbell,
    DiggsDeepwell,
    DipWillowdew,
    DuneTall,
    Eloise,
    FrinStickly,
    Mossie,
    Pipsy,
}

/// Condition a visitor rewards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitorBonus {
    /// 1 point per card of the type.
    PerCardType(CardType),
    /// 1 point per `per` critters.
    PerCritter { per: usize },
    /// 1 point per `per` constructions.
    PerConstruction { per: usize },
    /// 1 point per unit left over.
    PerResource(ResourceType),
    /// Points per claimed event.
    PerClaimedEvent(i32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisitorDefinition {
    pub name: VisitorName,
    pub base_vp: i32,
    pub bonus: VisitorBonus,
}

impl VisitorName {
    pub const ALL: [VisitorName; 10] = [
        VisitorName::BimLittle,
        VisitorName::Bosley,
        VisitorName::Butterbell,
        VisitorName::DiggsDeepwell,
        VisitorName::DipWillowdew,
        VisitorName::DuneTall,
        VisitorName::Eloise,
        VisitorName::FrinStickly,
        VisitorName::Mossie,
        VisitorName::Pipsy,
    ];

    #[must_use]
    pub fn definition(self) -> VisitorDefinition {
        use VisitorBonus::*;
        use VisitorName::*;
        let (base_vp, bonus) = match self {
            BimLittle => (2, PerCardType(CardType::Traveler)),
            Bosley => (1, PerCardType(CardType::Destination)),
            Butterbell => (2, PerCardType(CardType::Governance)),
            DiggsDeepwell => (1, PerCardType(CardType::Production)),
            DipWillowdew => (3, PerCardType(CardType::Prosperity)),
            DuneTall => (1, PerCritter { per: 2 }),
            Eloise => (1, PerConstruction { per: 2 }),
            FrinStickly => (2, PerResource(ResourceType::Twig)),
            Mossie => (2, PerResource(ResourceType::Pebble)),
            Pipsy => (0, PerClaimedEvent(2)),
        };
        VisitorDefinition { name: self, base_vp, bonus }
    }

    fn bonus_points(self, player: &Player) -> i32 {
        match self.definition().bonus {
            VisitorBonus::PerCardType(card_type) => player.count_cards_by_type(card_type) as i32,
            VisitorBonus::PerCritter { per } => (player.count_where(|c| c.is_critter()) / per) as i32,
            VisitorBonus::PerConstruction { per } => (player.count_where(|c| c.is_construction()) / per) as i32,
            VisitorBonus::PerResource(resource) => player.resources.get(resource) as i32,
            VisitorBonus::PerClaimedEvent(each) => each * player.claimed_events.len() as i32,
        }
    }
}

impl Playable for VisitorName {
    fn can_play_check(self, state: &GameState, _input: &GameInput) -> GameResult<()> {
        let revealed = state
            .visitors()
            .ok_or_else(|| GameError::validation("Visitors are not part of this game"))?;
        if revealed.position_of(&self).is_none() {
            return Err(GameError::validation(format!("{self} is not available")));
        }
        Ok(())
    }

    /// Invite the visitor for the active player.
    fn play(self, state: &mut GameState, input: &GameInput) -> GameResult<()> {
        self.can_play_check(state, input)?;
        let player = state.active_player_id();
        state.take_visitor(self)?;
        state.player_mut(player).claimed_visitors.push(self);
        state.log(self, log_parts![player, " invited ", self, "."]);
        Ok(())
    }

    fn points(self, player: &Player, _state: &GameState) -> i32 {
        self.definition().base_vp + self.bonus_points(player)
    }
}

impl fmt::Display for VisitorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VisitorName::BimLittle => "Bim Little",
            VisitorName::Bosley => "Bosley",
            VisitorName::Butterbell => "Butterbell",
            VisitorName::DiggsDeepwell => "Diggs Deepwell",
            VisitorName::DipWillowdew => "Dip Willowdew",
            VisitorName::DuneTall => "Dune Tall",
            VisitorName::Eloise => "Eloise",
            VisitorName::FrinStickly => "Frin Stickly",
            VisitorName::Mossie => "Mossie",
            VisitorName::Pipsy => "Pipsy",
        };
        f.write_str(s)
    }
}
