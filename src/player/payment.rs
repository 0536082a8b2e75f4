//! Affordability and payment validation.
//!
//! ## Discounts
//!
//! - `Discount::Resource(r)` waives up to 3 units of `r` (the Innkeeper's
//!   berry discount).
//! - `Discount::Any3` waives up to 3 units in total across the basic
//!   resources (Crane, Inventor, Inn, Dungeon). The player pays exactly the
//!   remaining amount: paying more than the cost minus 3 is an overpay.
//!
//! ## Alternatives to resources
//!
//! - Occupy the critter's unoccupied associated construction (or an
//!   Evertree).
//! - Spend a golden leaf to occupy an unoccupied construction of the
//!   critter's card type.
//! - Send a critter from the city to the Dungeon (`Any3`).
//! - Delegate to a played card via `card_to_use`.
//!
//! The Judge passively lets a player swap one resource of the cost for one
//! of another kind.

use serde::{Deserialize, Serialize};

use super::Player;
use crate::cards::CardName;
use crate::core::{CardSource, PlayCardInput, ResourceMap, ResourceType};
use crate::error::{ensure, GameError, GameResult};

/// Units waived by a discount.
const DISCOUNT_AMOUNT: u32 = 3;

/// Played cards that may stand in for part of a payment.
const PAYMENT_DELEGATES: [CardName; 5] =
    [CardName::Crane, CardName::Innkeeper, CardName::Inventor, CardName::Queen, CardName::Inn];

/// Payment-time waiver of part of a cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Discount {
    /// Waive up to 3 of one resource.
    Resource(ResourceType),
    /// Waive up to 3 units in total.
    Any3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PaymentCheck {
    Ok,
    Insufficient,
    Overpay,
}

fn check_paid_resources(
    paid: &ResourceMap,
    cost: &ResourceMap,
    discount: Option<Discount>,
    error_if_overpay: bool,
) -> PaymentCheck {
    // Tokens are never part of a cost.
    if paid.vp > 0 || paid.pearl > 0 {
        return PaymentCheck::Overpay;
    }

    match discount {
        None | Some(Discount::Resource(_)) => {
            let mut needed = *cost;
            if let Some(Discount::Resource(r)) = discount {
                needed.set(r, cost.get(r).saturating_sub(DISCOUNT_AMOUNT));
            }
            for r in ResourceType::BASIC {
                if paid.get(r) < needed.get(r) {
                    return PaymentCheck::Insufficient;
                }
            }
            if error_if_overpay && ResourceType::BASIC.iter().any(|&r| paid.get(r) > needed.get(r)) {
                return PaymentCheck::Overpay;
            }
            PaymentCheck::Ok
        }
        Some(Discount::Any3) => {
            if error_if_overpay && ResourceType::BASIC.iter().any(|&r| paid.get(r) > cost.get(r)) {
                return PaymentCheck::Overpay;
            }
            let owed = cost.total_basic().saturating_sub(DISCOUNT_AMOUNT);
            let covered: u32 = ResourceType::BASIC
                .iter()
                .map(|&r| paid.get(r).min(cost.get(r)))
                .sum();
            let total = paid.total_basic();
            if covered < owed {
                PaymentCheck::Insufficient
            } else if error_if_overpay && total > owed {
                PaymentCheck::Overpay
            } else {
                PaymentCheck::Ok
            }
        }
    }
}

/// Whether `paid` settles `cost` under `discount`.
///
/// Pure: the result depends only on the arguments.
#[must_use]
pub fn is_paid_resources_valid(
    paid: &ResourceMap,
    cost: &ResourceMap,
    discount: Option<Discount>,
    error_if_overpay: bool,
) -> bool {
    check_paid_resources(paid, cost, discount, error_if_overpay) == PaymentCheck::Ok
}

fn paid_resources_result(paid: &ResourceMap, cost: &ResourceMap, discount: Option<Discount>) -> GameResult<()> {
    match check_paid_resources(paid, cost, discount, true) {
        PaymentCheck::Ok => Ok(()),
        PaymentCheck::Insufficient => Err(GameError::validation("Insufficient resources")),
        PaymentCheck::Overpay => Err(GameError::validation("Cannot overpay for cards")),
    }
}

/// Judge swap: exactly one unit of the cost replaced by one unit of another
/// basic resource.
fn is_judge_swap(paid: &ResourceMap, cost: &ResourceMap) -> bool {
    let mut short = 0;
    let mut extra = 0;
    for r in ResourceType::BASIC {
        let (p, c) = (paid.get(r), cost.get(r));
        if p < c {
            short += c - p;
        } else {
            extra += p - c;
        }
    }
    short == 1 && extra == 1
}

/// Missing units when covering `cost` from `have`.
fn shortfall(have: &ResourceMap, cost: &ResourceMap) -> u32 {
    ResourceType::BASIC
        .iter()
        .map(|&r| cost.get(r).saturating_sub(have.get(r)))
        .sum()
}

/// Cheapest payment under a 3-unit discount, taken from the cost in
/// resource order. `None` when no split of `have` settles it.
pub(crate) fn any3_payment(have: &ResourceMap, cost: &ResourceMap) -> Option<ResourceMap> {
    let mut owed = cost.total_basic().saturating_sub(DISCOUNT_AMOUNT);
    let mut paid = ResourceMap::NONE;
    for r in ResourceType::BASIC {
        let take = cost.get(r).min(have.get(r)).min(owed);
        paid.set(r, take);
        owed -= take;
    }
    (owed == 0).then_some(paid)
}

impl Player {
    /// A construction in the city that can admit `critter` for free.
    ///
    /// Prefers the critter's own associated card over an Evertree.
    #[must_use]
    pub fn unoccupied_associated_construction(&self, critter: CardName) -> Option<&crate::cards::PlayedCard> {
        let def = critter.definition();
        if !def.is_critter {
            return None;
        }
        let specific = def.associated.and_then(|assoc| {
            self.played_cards_named(assoc).find(|c| c.is_unoccupied_construction())
        });
        specific.or_else(|| {
            self.played_cards_named(CardName::Evertree)
                .find(|c| c.is_unoccupied_construction())
        })
    }

    #[must_use]
    pub fn has_unoccupied_associated_construction(&self, critter: CardName) -> bool {
        self.unoccupied_associated_construction(critter).is_some()
    }

    /// An unoccupied construction of the critter's card type for a golden leaf.
    #[must_use]
    pub fn golden_leaf_target_exists(&self, critter: CardName) -> bool {
        let card_type = critter.card_type();
        self.played_cards
            .iter()
            .any(|c| c.is_unoccupied_construction() && c.card_name.card_type() == card_type)
    }

    /// Dungeon has a free cell: one without a Ranger, two with.
    #[must_use]
    pub fn can_invoke_dungeon(&self) -> bool {
        let Some(dungeon) = self.first_played(CardName::Dungeon) else {
            return false;
        };
        let cells = if self.has_card_in_city(CardName::Ranger) { 2 } else { 1 };
        dungeon.paired_cards.len() < cells
    }

    fn queen_available(&self) -> bool {
        self.num_available_workers() > 0
            && self
                .first_played(CardName::Queen)
                .is_some_and(|q| self.can_place_own_worker_on(q))
    }

    fn inn_available(&self) -> bool {
        self.num_available_workers() > 0
            && self.played_cards_named(CardName::Inn).any(|inn| self.can_place_own_worker_on(inn))
    }

    /// Whether the player could pay for `card` from `source` by any means.
    #[must_use]
    pub fn can_afford_card(&self, card: CardName, source: CardSource) -> bool {
        let def = card.definition();
        let cost = def.base_cost;
        let have = self.resources;

        if have.contains(&cost) {
            return true;
        }

        if def.is_critter {
            if self.has_unoccupied_associated_construction(card) {
                return true;
            }
            if self.num_golden_leaf > 0 && self.golden_leaf_target_exists(card) {
                return true;
            }
            if self.has_card_in_city(CardName::Innkeeper)
                && cost.berry.saturating_sub(DISCOUNT_AMOUNT) <= have.berry
            {
                return true;
            }
        }

        let any3 = shortfall(&have, &cost) <= DISCOUNT_AMOUNT;
        if any3 {
            if def.is_construction() && self.has_card_in_city(CardName::Crane) {
                return true;
            }
            if self.has_card_in_city(CardName::Inventor) {
                return true;
            }
            if source == CardSource::Meadow && self.inn_available() {
                return true;
            }
            if self.can_invoke_dungeon() && self.played_cards.iter().any(|c| c.card_name.is_critter()) {
                return true;
            }
        }

        if def.base_vp <= 3 && self.queen_available() {
            return true;
        }

        if self.has_card_in_city(CardName::Judge) {
            let short = shortfall(&have, &cost);
            let spare: u32 = ResourceType::BASIC
                .iter()
                .map(|&r| have.get(r).saturating_sub(cost.get(r)))
                .sum();
            if short <= 1 && spare >= short {
                return true;
            }
        }

        false
    }

    /// Central payment check for a play-card input.
    ///
    /// Returns the first reason the payment is not acceptable.
    pub fn validate_payment_options(&self, input: &PlayCardInput) -> GameResult<()> {
        let payment = input
            .payment_options
            .as_ref()
            .ok_or_else(|| GameError::validation("Invalid input: missing payment options"))?;
        let card = input.card;
        let def = card.definition();

        ensure!(
            self.resources.contains(&payment.resources),
            "Can't spend resources you don't have"
        );

        if payment.use_associated_card {
            ensure!(def.is_critter, "Cannot use associated card to play {card}");
            ensure!(
                self.has_unoccupied_associated_construction(card),
                "Cannot find associated card to play {card}"
            );
            return Ok(());
        }

        if let Some(target) = payment.occupy_card_with_golden_leaf {
            ensure!(def.is_critter, "Cannot use associated card to play {card} with a golden leaf");
            ensure!(self.num_golden_leaf > 0, "No more golden leaf to use");
            ensure!(
                self.played_cards_named(target).any(|c| c.is_unoccupied_construction()),
                "Cannot find unoccupied {target}"
            );
            ensure!(
                target.card_type() == def.card_type,
                "{target} is not the same card type as {card}"
            );
            return Ok(());
        }

        if let Some(prisoner) = payment.card_to_dungeon {
            ensure!(
                self.can_invoke_dungeon() && prisoner.is_critter() && self.has_card_in_city(prisoner),
                "Unable to invoke Dungeon"
            );
            return paid_resources_result(&payment.resources, &def.base_cost, Some(Discount::Any3));
        }

        if let Some(delegate) = payment.card_to_use {
            ensure!(PAYMENT_DELEGATES.contains(&delegate), "Unable to use {delegate} to pay for {card}");
            ensure!(self.has_card_in_city(delegate), "Unable to find {delegate} in your city");
            return match delegate {
                CardName::Innkeeper => {
                    ensure!(def.is_critter, "Unable to use Innkeeper to play {card}");
                    paid_resources_result(
                        &payment.resources,
                        &def.base_cost,
                        Some(Discount::Resource(ResourceType::Berry)),
                    )
                }
                CardName::Crane => {
                    ensure!(def.is_construction(), "Unable to use Crane to play {card}");
                    paid_resources_result(&payment.resources, &def.base_cost, Some(Discount::Any3))
                }
                CardName::Inventor => {
                    paid_resources_result(&payment.resources, &def.base_cost, Some(Discount::Any3))
                }
                CardName::Queen => {
                    ensure!(def.base_vp <= 3, "Cannot use Queen to play {card}");
                    ensure!(self.queen_available(), "Cannot place worker on card Queen");
                    paid_resources_result(&payment.resources, &ResourceMap::NONE, None)
                }
                CardName::Inn => {
                    ensure!(input.source == CardSource::Meadow, "Cannot use Inn to play a non-Meadow card");
                    ensure!(self.inn_available(), "Cannot place worker on card Inn");
                    paid_resources_result(&payment.resources, &def.base_cost, Some(Discount::Any3))
                }
                other => Err(GameError::invariant(format!("{other} is not a payment delegate"))),
            };
        }

        match check_paid_resources(&payment.resources, &def.base_cost, None, true) {
            PaymentCheck::Ok => Ok(()),
            _ if self.has_card_in_city(CardName::Judge)
                && is_judge_swap(&payment.resources, &def.base_cost) =>
            {
                Ok(())
            }
            PaymentCheck::Insufficient => Err(GameError::validation("Insufficient resources")),
            PaymentCheck::Overpay => Err(GameError::validation("Cannot overpay for cards")),
        }
    }
}
