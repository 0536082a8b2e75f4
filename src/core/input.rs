//! Game inputs: the closed set of things a player can submit.
//!
//! Inputs come in two families:
//! - **Base** inputs start a turn action (`PlaceWorker`, `PlayCard`, ...).
//! - **Continuation** inputs resolve a pending decision. Each carries a
//!   `Prompt` whose `ContextTag` names the in-flight effect, plus the offered
//!   option set, bounds, and the player's selection.
//!
//! The engine stores continuation templates with an empty selection on its
//! pending stack. A submitted continuation is accepted only if it equals the
//! top template once its selection is cleared, so a client cannot alter the
//! offered options or reroute the answer to another effect.
//!
//! ## Example
//!
//! ```
//! use everdell_engine::core::{ContextTag, EntityRef, GameInput, Prompt, Purpose};
//! use everdell_engine::cards::CardName;
//!
//! let template = GameInput::SelectCards(everdell_engine::core::SelectCards {
//!     prompt: Prompt::new(ContextTag::new(EntityRef::Card(CardName::Bard), Purpose::Discard), "Discard up to 5"),
//!     card_options: vec![CardName::Farm, CardName::Mine],
//!     min_to_select: 0,
//!     max_to_select: 5,
//!     selected_cards: vec![],
//! });
//! let answer = template.clone().with_selected_cards(vec![CardName::Mine]);
//! assert!(answer.is_continuation());
//! assert_eq!(answer.without_selection(), template);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity::{EntityRef, PlayedCardRef, WorkerPlacement};
use super::player::PlayerId;
use super::resources::{ResourceMap, ResourceType};
use crate::board::{EventName, LocationName};
use crate::cards::CardName;
use crate::expansions::AdornmentName;

/// Discriminant of a `GameInput`, used for continuation routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKind {
    PlaceWorker,
    VisitDestinationCard,
    PlayCard,
    ClaimEvent,
    PlayAdornment,
    ReserveCard,
    PrepareForSeason,
    GameEnd,
    Undo,
    SelectCards,
    SelectPlayedCards,
    SelectResources,
    SelectLocation,
    SelectOptionGeneric,
    SelectPlayedAdornment,
    SelectPlayer,
    SelectWorkerPlacement,
}

/// Zone a card is played from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardSource {
    Hand,
    Meadow,
    /// Newleaf station slot.
    Station(usize),
    /// The player's reserved card.
    Reserved,
}

impl fmt::Display for CardSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardSource::Hand => f.write_str("hand"),
            CardSource::Meadow => f.write_str("the Meadow"),
            CardSource::Station(i) => write!(f, "station slot {}", i + 1),
            CardSource::Reserved => f.write_str("reserved card"),
        }
    }
}

/// How the player pays for a card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentOptions {
    /// Resources handed over.
    pub resources: ResourceMap,
    /// A played card that modifies the cost (Crane, Innkeeper, Queen, Inn, Inventor).
    pub card_to_use: Option<CardName>,
    /// A critter sent to the Dungeon for a 3-resource discount.
    pub card_to_dungeon: Option<CardName>,
    /// Occupy the critter's unoccupied associated construction.
    pub use_associated_card: bool,
    /// Spend a golden leaf to occupy this construction.
    pub occupy_card_with_golden_leaf: Option<CardName>,
}

impl PaymentOptions {
    /// Plain resource payment.
    #[must_use]
    pub fn resources(resources: ResourceMap) -> Self {
        Self { resources, ..Default::default() }
    }

    #[must_use]
    pub fn associated_card() -> Self {
        Self { use_associated_card: true, ..Default::default() }
    }

    #[must_use]
    pub fn using_card(card: CardName, resources: ResourceMap) -> Self {
        Self { resources, card_to_use: Some(card), ..Default::default() }
    }

    #[must_use]
    pub fn dungeon(critter: CardName, resources: ResourceMap) -> Self {
        Self { resources, card_to_dungeon: Some(critter), ..Default::default() }
    }

    #[must_use]
    pub fn golden_leaf(target: CardName) -> Self {
        Self { occupy_card_with_golden_leaf: Some(target), ..Default::default() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayCardInput {
    pub card: CardName,
    pub source: CardSource,
    /// Required; `None` is rejected.
    pub payment_options: Option<PaymentOptions>,
}

impl PlayCardInput {
    #[must_use]
    pub fn new(card: CardName, source: CardSource, payment: PaymentOptions) -> Self {
        Self { card, source, payment_options: Some(payment) }
    }
}

/// What step of an effect a pending decision belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purpose {
    /// The entity's primary choice.
    Main,
    /// Pick one resource kind to gain.
    GainAny,
    /// Distribute several resource units.
    GainMany,
    Discard,
    Keep,
    Give,
    ChoosePlayer,
    /// Pick which zone a card comes from.
    ChooseSource,
    PlayForFree,
    Spend,
    Store,
    Reactivate,
    Copy,
    Invite,
    TakeCards,
}

/// Identifies which in-flight effect a continuation resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextTag {
    pub source: EntityRef,
    pub purpose: Purpose,
}

impl ContextTag {
    #[must_use]
    pub fn new(source: impl Into<EntityRef>, purpose: Purpose) -> Self {
        Self { source: source.into(), purpose }
    }
}

/// Header shared by every continuation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Prompt {
    pub context: ContextTag,
    /// Input this decision continues from, when it is part of a chain.
    pub prev_input_type: Option<InputKind>,
    pub label: String,
    /// Data carried from the previous step.
    pub prev_input: Option<Box<GameInput>>,
    /// The played card the effect belongs to, if any.
    pub played_card: Option<PlayedCardRef>,
}

impl Prompt {
    pub fn new(context: ContextTag, label: impl Into<String>) -> Self {
        Self {
            context,
            prev_input_type: None,
            label: label.into(),
            prev_input: None,
            played_card: None,
        }
    }

    #[must_use]
    pub fn on_card(mut self, card: PlayedCardRef) -> Self {
        self.played_card = Some(card);
        self
    }

    /// Record only the kind of the previous input.
    #[must_use]
    pub fn after_kind(mut self, kind: InputKind) -> Self {
        self.prev_input_type = Some(kind);
        self
    }

    /// Record the previous input of the chain.
    #[must_use]
    pub fn after(mut self, prev: &GameInput) -> Self {
        self.prev_input_type = Some(prev.kind());
        self.prev_input = Some(Box::new(prev.clone()));
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectCards {
    pub prompt: Prompt,
    pub card_options: Vec<CardName>,
    pub min_to_select: usize,
    pub max_to_select: usize,
    pub selected_cards: Vec<CardName>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectPlayedCards {
    pub prompt: Prompt,
    pub card_options: Vec<PlayedCardRef>,
    pub min_to_select: usize,
    pub max_to_select: usize,
    pub selected_cards: Vec<PlayedCardRef>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectResources {
    pub prompt: Prompt,
    pub min_resources: u32,
    pub max_resources: u32,
    /// Restrict the selection to a single kind.
    pub specific_resource: Option<ResourceType>,
    /// The selection is paid from the player's supply.
    pub to_spend: bool,
    pub resources: ResourceMap,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectLocation {
    pub prompt: Prompt,
    pub location_options: Vec<LocationName>,
    pub selected_location: Option<LocationName>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectOptionGeneric {
    pub prompt: Prompt,
    pub options: Vec<String>,
    pub selected_option: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectPlayedAdornment {
    pub prompt: Prompt,
    pub adornment_options: Vec<AdornmentName>,
    pub selected_adornment: Option<AdornmentName>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectPlayer {
    pub prompt: Prompt,
    pub player_options: Vec<PlayerId>,
    /// If false the player may decline by selecting nobody.
    pub mandatory: bool,
    pub selected_player: Option<PlayerId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectWorkerPlacement {
    pub prompt: Prompt,
    pub options: Vec<WorkerPlacement>,
    pub mandatory: bool,
    pub selected: Option<WorkerPlacement>,
}

/// Every input the engine accepts.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameInput {
    // === Base ===
    PlaceWorker { location: LocationName },
    VisitDestinationCard { card: PlayedCardRef },
    PlayCard(PlayCardInput),
    ClaimEvent { event: EventName },
    PlayAdornment { adornment: AdornmentName },
    /// Reserve a Meadow card; the player keeps the turn.
    ReserveCard { card: CardName },
    PrepareForSeason,
    GameEnd,
    Undo,

    // === Continuations ===
    SelectCards(SelectCards),
    SelectPlayedCards(SelectPlayedCards),
    SelectResources(SelectResources),
    SelectLocation(SelectLocation),
    SelectOptionGeneric(SelectOptionGeneric),
    SelectPlayedAdornment(SelectPlayedAdornment),
    SelectPlayer(SelectPlayer),
    SelectWorkerPlacement(SelectWorkerPlacement),
}

impl GameInput {
    #[must_use]
    pub fn kind(&self) -> InputKind {
        match self {
            GameInput::PlaceWorker { .. } => InputKind::PlaceWorker,
            GameInput::VisitDestinationCard { .. } => InputKind::VisitDestinationCard,
            GameInput::PlayCard(_) => InputKind::PlayCard,
            GameInput::ClaimEvent { .. } => InputKind::ClaimEvent,
            GameInput::PlayAdornment { .. } => InputKind::PlayAdornment,
            GameInput::ReserveCard { .. } => InputKind::ReserveCard,
            GameInput::PrepareForSeason => InputKind::PrepareForSeason,
            GameInput::GameEnd => InputKind::GameEnd,
            GameInput::Undo => InputKind::Undo,
            GameInput::SelectCards(_) => InputKind::SelectCards,
            GameInput::SelectPlayedCards(_) => InputKind::SelectPlayedCards,
            GameInput::SelectResources(_) => InputKind::SelectResources,
            GameInput::SelectLocation(_) => InputKind::SelectLocation,
            GameInput::SelectOptionGeneric(_) => InputKind::SelectOptionGeneric,
            GameInput::SelectPlayedAdornment(_) => InputKind::SelectPlayedAdornment,
            GameInput::SelectPlayer(_) => InputKind::SelectPlayer,
            GameInput::SelectWorkerPlacement(_) => InputKind::SelectWorkerPlacement,
        }
    }

    #[must_use]
    pub fn is_continuation(&self) -> bool {
        self.prompt().is_some()
    }

    /// Base inputs after which the player keeps the turn.
    #[must_use]
    pub fn retains_turn(&self) -> bool {
        matches!(self, GameInput::ReserveCard { .. })
    }

    #[must_use]
    pub fn prompt(&self) -> Option<&Prompt> {
        match self {
            GameInput::SelectCards(s) => Some(&s.prompt),
            GameInput::SelectPlayedCards(s) => Some(&s.prompt),
            GameInput::SelectResources(s) => Some(&s.prompt),
            GameInput::SelectLocation(s) => Some(&s.prompt),
            GameInput::SelectOptionGeneric(s) => Some(&s.prompt),
            GameInput::SelectPlayedAdornment(s) => Some(&s.prompt),
            GameInput::SelectPlayer(s) => Some(&s.prompt),
            GameInput::SelectWorkerPlacement(s) => Some(&s.prompt),
            _ => None,
        }
    }

    #[must_use]
    pub fn context(&self) -> Option<ContextTag> {
        self.prompt().map(|p| p.context)
    }

    /// Purpose of this input if it continues an effect of `source`.
    #[must_use]
    pub fn purpose_for(&self, source: EntityRef) -> Option<Purpose> {
        self.context().filter(|c| c.source == source).map(|c| c.purpose)
    }

    /// Played card carried by the prompt.
    #[must_use]
    pub fn played_card(&self) -> Option<PlayedCardRef> {
        self.prompt().and_then(|p| p.played_card)
    }

    /// Previous input carried by the prompt.
    #[must_use]
    pub fn prev_input(&self) -> Option<&GameInput> {
        self.prompt().and_then(|p| p.prev_input.as_deref())
    }

    /// Copy with the player's selection cleared; base inputs are returned unchanged.
    #[must_use]
    pub fn without_selection(&self) -> GameInput {
        let mut out = self.clone();
        match &mut out {
            GameInput::SelectCards(s) => s.selected_cards.clear(),
            GameInput::SelectPlayedCards(s) => s.selected_cards.clear(),
            GameInput::SelectResources(s) => s.resources = ResourceMap::NONE,
            GameInput::SelectLocation(s) => s.selected_location = None,
            GameInput::SelectOptionGeneric(s) => s.selected_option = None,
            GameInput::SelectPlayedAdornment(s) => s.selected_adornment = None,
            GameInput::SelectPlayer(s) => s.selected_player = None,
            GameInput::SelectWorkerPlacement(s) => s.selected = None,
            _ => {}
        }
        out
    }

    // === Selection builders ===

    #[must_use]
    pub fn with_selected_cards(mut self, cards: Vec<CardName>) -> Self {
        if let GameInput::SelectCards(s) = &mut self {
            s.selected_cards = cards;
        }
        self
    }

    #[must_use]
    pub fn with_selected_played_cards(mut self, cards: Vec<PlayedCardRef>) -> Self {
        if let GameInput::SelectPlayedCards(s) = &mut self {
            s.selected_cards = cards;
        }
        self
    }

    #[must_use]
    pub fn with_resources(mut self, resources: ResourceMap) -> Self {
        if let GameInput::SelectResources(s) = &mut self {
            s.resources = resources;
        }
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: LocationName) -> Self {
        if let GameInput::SelectLocation(s) = &mut self {
            s.selected_location = Some(location);
        }
        self
    }

    #[must_use]
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        if let GameInput::SelectOptionGeneric(s) = &mut self {
            s.selected_option = Some(option.into());
        }
        self
    }

    #[must_use]
    pub fn with_adornment(mut self, adornment: AdornmentName) -> Self {
        if let GameInput::SelectPlayedAdornment(s) = &mut self {
            s.selected_adornment = Some(adornment);
        }
        self
    }

    #[must_use]
    pub fn with_player(mut self, player: Option<PlayerId>) -> Self {
        if let GameInput::SelectPlayer(s) = &mut self {
            s.selected_player = player;
        }
        self
    }

    #[must_use]
    pub fn with_worker(mut self, placement: Option<WorkerPlacement>) -> Self {
        if let GameInput::SelectWorkerPlacement(s) = &mut self {
            s.selected = placement;
        }
        self
    }
}

impl fmt::Display for GameInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameInput::PlaceWorker { location } => write!(f, "place worker on {location}"),
            GameInput::VisitDestinationCard { card } => write!(f, "visit {:?} of {}", card.id, card.owner),
            GameInput::PlayCard(p) => write!(f, "play {} from {}", p.card, p.source),
            GameInput::ClaimEvent { event } => write!(f, "claim {event}"),
            GameInput::PlayAdornment { adornment } => write!(f, "play {adornment}"),
            GameInput::ReserveCard { card } => write!(f, "reserve {card}"),
            GameInput::PrepareForSeason => f.write_str("prepare for season"),
            GameInput::GameEnd => f.write_str("end game"),
            GameInput::Undo => f.write_str("undo"),
            other => match other.prompt() {
                Some(p) => write!(f, "{:?} for {} ({})", other.kind(), p.context.source, p.label),
                None => write!(f, "{:?}", other.kind()),
            },
        }
    }
}

/// An applied input with metadata for the applied-input log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub player: PlayerId,
    pub input: GameInput,
    /// Sequence id of the state the input produced.
    pub game_state_id: u64,
}
