//! Resource-gain decisions.
//!
//! Both helpers build a continuation tagged with the source entity and a
//! gain purpose, and resolve the matching answer. A caller that logs the
//! grant itself sets `skip_log` so the line is not written twice.

use log::debug;

use crate::core::log::log_parts;
use crate::core::{
    ContextTag, EntityRef, GameInput, GameState, Prompt, Purpose, ResourceMap, ResourceType,
    SelectOptionGeneric, SelectResources,
};
use crate::error::{ensure, GameError, GameResult};

/// Gain one basic resource of the player's choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GainAnyResource {
    source: EntityRef,
    skip_log: bool,
}

impl GainAnyResource {
    pub fn new(source: impl Into<EntityRef>) -> Self {
        Self { source: source.into(), skip_log: false }
    }

    #[must_use]
    pub fn skip_log(mut self) -> Self {
        self.skip_log = true;
        self
    }

    #[must_use]
    pub fn context(&self) -> ContextTag {
        ContextTag::new(self.source, Purpose::GainAny)
    }

    /// The pending decision.
    #[must_use]
    pub fn input(&self) -> GameInput {
        GameInput::SelectOptionGeneric(SelectOptionGeneric {
            prompt: Prompt::new(self.context(), "Select resource to gain"),
            options: ResourceType::BASIC.iter().map(ToString::to_string).collect(),
            selected_option: None,
        })
    }

    #[must_use]
    pub fn matches(&self, input: &GameInput) -> bool {
        matches!(input, GameInput::SelectOptionGeneric(_)) && input.context() == Some(self.context())
    }

    /// Apply the answer and return the resource gained.
    pub fn resolve(&self, state: &mut GameState, input: &GameInput) -> GameResult<ResourceType> {
        let GameInput::SelectOptionGeneric(select) = input else {
            return Err(GameError::invariant(format!("GainAnyResource cannot resolve {:?}", input.kind())));
        };
        let choice = select
            .selected_option
            .as_deref()
            .ok_or_else(|| GameError::validation("Please select a resource"))?;
        let resource: ResourceType = choice.parse()?;
        ensure!(resource.is_basic(), "Cannot gain {resource} this way");

        let player = state.active_player_id();
        state.player_mut(player).gain_resources(ResourceMap::of(resource, 1));
        debug!("{player} gained 1 {resource} from {}", self.source);
        if !self.skip_log {
            state.log(self.source, log_parts![player, " gained ", ResourceMap::of(resource, 1), "."]);
        }
        Ok(resource)
    }
}

/// Gain several basic resources, distributed as the player likes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GainManyResources {
    source: EntityRef,
    skip_log: bool,
}

impl GainManyResources {
    pub fn new(source: impl Into<EntityRef>) -> Self {
        Self { source: source.into(), skip_log: false }
    }

    #[must_use]
    pub fn skip_log(mut self) -> Self {
        self.skip_log = true;
        self
    }

    #[must_use]
    pub fn context(&self) -> ContextTag {
        ContextTag::new(self.source, Purpose::GainMany)
    }

    /// The pending decision for exactly `amount` units.
    #[must_use]
    pub fn input(&self, amount: u32) -> GameInput {
        GameInput::SelectResources(SelectResources {
            prompt: Prompt::new(self.context(), format!("Select {amount} resources to gain")),
            min_resources: amount,
            max_resources: amount,
            specific_resource: None,
            to_spend: false,
            resources: ResourceMap::NONE,
        })
    }

    #[must_use]
    pub fn matches(&self, input: &GameInput) -> bool {
        matches!(input, GameInput::SelectResources(_)) && input.context() == Some(self.context())
    }

    pub fn resolve(&self, state: &mut GameState, input: &GameInput) -> GameResult<ResourceMap> {
        let GameInput::SelectResources(select) = input else {
            return Err(GameError::invariant(format!("GainManyResources cannot resolve {:?}", input.kind())));
        };
        let chosen = select.resources;
        ensure!(chosen.vp == 0 && chosen.pearl == 0, "Can only gain basic resources");
        let total = chosen.total_basic();
        ensure!(
            total >= select.min_resources && total <= select.max_resources,
            "Please select {} resources",
            select.max_resources
        );

        let player = state.active_player_id();
        state.player_mut(player).gain_resources(chosen);
        if !self.skip_log {
            state.log(self.source, log_parts![player, " gained ", chosen, "."]);
        }
        Ok(chosen)
    }
}
