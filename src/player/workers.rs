//! Worker bookkeeping.

use super::Player;
use crate::cards::{CardName, PlayedCard};
use crate::core::{PlayerId, WorkerPlacement};

impl Player {
    #[must_use]
    pub fn num_available_workers(&self) -> u32 {
        self.num_workers.saturating_sub(self.placed_workers.len() as u32)
    }

    /// Workers a played card of this city can hold.
    ///
    /// The Monastery holds a second worker with a Monk in the city, the
    /// Cemetery with an Undertaker.
    #[must_use]
    pub fn worker_capacity(&self, card: &PlayedCard) -> usize {
        if !card.definition().hosts_workers() {
            return 0;
        }
        match card.card_name {
            CardName::Monastery if self.has_card_in_city(CardName::Monk) => 2,
            CardName::Cemetery if self.has_card_in_city(CardName::Undertaker) => 2,
            _ => 1,
        }
    }

    /// Whether `visitor` may put a worker on `card`, which must belong to
    /// this city. Workers available to `visitor` are checked by the caller.
    #[must_use]
    pub fn card_accepts_worker(&self, card: &PlayedCard, visitor: PlayerId) -> bool {
        let def = card.definition();
        if !def.hosts_workers() {
            return false;
        }
        if visitor != self.player_id && !def.is_open_destination() {
            return false;
        }
        card.workers.len() < self.worker_capacity(card)
    }

    pub(crate) fn can_place_own_worker_on(&self, card: &PlayedCard) -> bool {
        self.card_accepts_worker(card, self.player_id)
    }

    /// Workers that stay put through a recall.
    #[must_use]
    pub fn is_permanent_placement(placement: &WorkerPlacement) -> bool {
        matches!(
            placement,
            WorkerPlacement::Card { card: CardName::Monastery | CardName::Cemetery, .. }
        )
    }

    /// Destination cards in this city, open to opponents or not.
    pub fn destination_cards(&self, open: bool) -> impl Iterator<Item = &PlayedCard> {
        self.played_cards
            .iter()
            .filter(move |c| c.definition().hosts_workers() && c.definition().is_open_destination() == open)
    }
}
