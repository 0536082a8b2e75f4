//! Card definitions - static card data.
//!
//! `CardName` is the card identity; `CardName::definition()` returns the
//! immutable `CardDefinition` (cost, type, base VP, uniqueness, associated
//! card, deck copies). Per-game state of a card in a city lives in
//! `PlayedCard`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::ResourceMap;

/// Which box a catalog entry ships in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expansion {
    Base,
    Pearlbrook,
    Newleaf,
}

const fn cost(twig: u32, resin: u32, pebble: u32, berry: u32) -> ResourceMap {
    ResourceMap::new(twig, resin, pebble, berry)
}

/// Card color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardType {
    /// Green. Activated on play and during Spring/Autumn production.
    Production,
    /// Tan. One-time effect on play.
    Traveler,
    /// Red. Hosts workers.
    Destination,
    /// Blue. Ongoing effects and discounts.
    Governance,
    /// Purple. End-of-game points.
    Prosperity,
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CardType::Production => "Production",
            CardType::Traveler => "Traveler",
            CardType::Destination => "Destination",
            CardType::Governance => "Governance",
            CardType::Prosperity => "Prosperity",
        };
        f.write_str(s)
    }
}

/// Card identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardName {
    // Constructions
    Farm,
    Mine,
    TwigBarge,
    ResinRefinery,
    GeneralStore,
    Storehouse,
    Fairgrounds,
    Ruins,
    Crane,
    Courthouse,
    Dungeon,
    ClockTower,
    Inn,
    PostOffice,
    Lookout,
    Chapel,
    Monastery,
    Cemetery,
    University,
    Castle,
    Palace,
    School,
    Theatre,
    Evertree,
    // Critters
    Husband,
    Wife,
    MinerMole,
    BargeToad,
    ChipSweep,
    Shopkeeper,
    Woodcarver,
    Fool,
    Peddler,
    Architect,
    Judge,
    Ranger,
    Historian,
    Innkeeper,
    PostalPigeon,
    Wanderer,
    Shepherd,
    Monk,
    Undertaker,
    Doctor,
    King,
    Queen,
    Teacher,
    Bard,
    // Pearlbrook
    Messenger,
    Pirate,
    // Newleaf
    Greenhouse,
    Library,
    AirBalloon,
    Inventor,
    Lamplighter,
}

/// Immutable card attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardDefinition {
    pub name: CardName,
    pub card_type: CardType,
    pub is_critter: bool,
    pub is_unique: bool,
    pub base_cost: ResourceMap,
    pub base_vp: i32,
    /// For critters, the construction that admits them for free.
    /// For constructions, the critter they admit.
    pub associated: Option<CardName>,
    /// Copies shuffled into the deck.
    pub copies: u8,
    pub expansion: Expansion,
}

impl CardDefinition {
    const fn construction(name: CardName, card_type: CardType, cost: ResourceMap, vp: i32) -> Self {
        Self {
            name,
            card_type,
            is_critter: false,
            is_unique: false,
            base_cost: cost,
            base_vp: vp,
            associated: None,
            copies: 3,
            expansion: Expansion::Base,
        }
    }

    const fn critter(name: CardName, card_type: CardType, berries: u32, vp: i32) -> Self {
        Self {
            name,
            card_type,
            is_critter: true,
            is_unique: false,
            base_cost: ResourceMap::new(0, 0, 0, berries),
            base_vp: vp,
            associated: None,
            copies: 3,
            expansion: Expansion::Base,
        }
    }

    /// Unique cards have two copies in the deck.
    const fn unique(mut self) -> Self {
        self.is_unique = true;
        self.copies = 2;
        self
    }

    const fn with(mut self, associated: CardName) -> Self {
        self.associated = Some(associated);
        self
    }

    const fn copies(mut self, copies: u8) -> Self {
        self.copies = copies;
        self
    }

    const fn in_expansion(mut self, expansion: Expansion) -> Self {
        self.expansion = expansion;
        self
    }

    #[must_use]
    pub const fn is_construction(&self) -> bool {
        !self.is_critter
    }

    /// Red destination cards plus the Storehouse accept workers.
    #[must_use]
    pub fn hosts_workers(&self) -> bool {
        matches!(self.card_type, CardType::Destination) || self.name == CardName::Storehouse
    }

    /// Destinations an opponent may visit.
    #[must_use]
    pub fn is_open_destination(&self) -> bool {
        matches!(self.name, CardName::Inn | CardName::PostOffice)
    }
}

impl CardName {
    /// Every card in the catalog.
    pub const ALL: [CardName; 55] = [
        CardName::Farm,
        CardName::Mine,
        CardName::TwigBarge,
        CardName::ResinRefinery,
        CardName::GeneralStore,
        CardName::Storehouse,
        CardName::Fairgrounds,
        CardName::Ruins,
        CardName::Crane,
        CardName::Courthouse,
        CardName::Dungeon,
        CardName::ClockTower,
        CardName::Inn,
        CardName::PostOffice,
        CardName::Lookout,
        CardName::Chapel,
        CardName::Monastery,
        CardName::Cemetery,
        CardName::University,
        CardName::Castle,
        CardName::Palace,
        CardName::School,
        CardName::Theatre,
        CardName::Evertree,
        CardName::Husband,
        CardName::Wife,
        CardName::MinerMole,
        CardName::BargeToad,
        CardName::ChipSweep,
        CardName::Shopkeeper,
        CardName::Woodcarver,
        CardName::Fool,
        CardName::Peddler,
        CardName::Architect,
        CardName::Judge,
        CardName::Ranger,
        CardName::Historian,
        CardName::Innkeeper,
        CardName::PostalPigeon,
        CardName::Wanderer,
        CardName::Shepherd,
        CardName::Monk,
        CardName::Undertaker,
        CardName::Doctor,
        CardName::King,
        CardName::Queen,
        CardName::Teacher,
        CardName::Bard,
        CardName::Messenger,
        CardName::Pirate,
        CardName::Greenhouse,
        CardName::Library,
        CardName::AirBalloon,
        CardName::Inventor,
        CardName::Lamplighter,
    ];

    /// Static attributes for this card.
    #[must_use]
    pub const fn definition(self) -> CardDefinition {
        use CardName::*;
        use CardType::*;
        match self {
            Farm => CardDefinition::construction(Farm, Production, cost(2, 1, 0, 0), 1).with(Husband).copies(8),
            Mine => CardDefinition::construction(Mine, Production, cost(1, 1, 1, 0), 2).with(MinerMole),
            TwigBarge => CardDefinition::construction(TwigBarge, Production, cost(1, 0, 1, 0), 1).with(BargeToad),
            ResinRefinery => CardDefinition::construction(ResinRefinery, Production, cost(0, 1, 1, 0), 1).with(ChipSweep),
            GeneralStore => CardDefinition::construction(GeneralStore, Production, cost(0, 1, 1, 0), 1).with(Shopkeeper),
            Storehouse => CardDefinition::construction(Storehouse, Production, cost(1, 1, 1, 0), 2).with(Woodcarver),
            Fairgrounds => CardDefinition::construction(Fairgrounds, Production, cost(1, 2, 1, 0), 3).with(Fool).unique(),
            Ruins => CardDefinition::construction(Ruins, Traveler, cost(0, 0, 0, 0), 0).with(Peddler),
            Crane => CardDefinition::construction(Crane, Governance, cost(0, 0, 1, 0), 1).with(Architect).unique(),
            Courthouse => CardDefinition::construction(Courthouse, Governance, cost(1, 1, 2, 0), 2).with(Judge).unique(),
            Dungeon => CardDefinition::construction(Dungeon, Governance, cost(0, 1, 2, 0), 0).with(Ranger).unique(),
            ClockTower => CardDefinition::construction(ClockTower, Governance, cost(3, 0, 1, 0), 0).with(Historian).unique(),
            Inn => CardDefinition::construction(Inn, Destination, cost(2, 1, 0, 0), 2).with(Innkeeper),
            PostOffice => CardDefinition::construction(PostOffice, Destination, cost(1, 2, 0, 0), 2).with(PostalPigeon),
            Lookout => CardDefinition::construction(Lookout, Destination, cost(1, 1, 1, 0), 2).with(Wanderer).unique(),
            Chapel => CardDefinition::construction(Chapel, Destination, cost(2, 1, 1, 0), 2).with(Shepherd).unique(),
            Monastery => CardDefinition::construction(Monastery, Destination, cost(1, 1, 1, 0), 1).with(Monk).unique(),
            Cemetery => CardDefinition::construction(Cemetery, Destination, cost(0, 0, 2, 0), 0).with(Undertaker).unique(),
            University => CardDefinition::construction(University, Destination, cost(0, 1, 2, 0), 3).with(Doctor).unique(),
            Castle => CardDefinition::construction(Castle, Prosperity, cost(2, 3, 3, 0), 4).with(King).unique(),
            Palace => CardDefinition::construction(Palace, Prosperity, cost(2, 3, 3, 0), 4).with(Queen).unique(),
            School => CardDefinition::construction(School, Prosperity, cost(2, 2, 0, 0), 2).with(Teacher).unique(),
            Theatre => CardDefinition::construction(Theatre, Prosperity, cost(3, 1, 1, 0), 3).with(Bard).unique(),
            Evertree => CardDefinition::construction(Evertree, Prosperity, cost(3, 3, 3, 0), 5).unique(),
            Husband => CardDefinition::critter(Husband, Production, 2, 2).with(Farm).copies(4),
            Wife => CardDefinition::critter(Wife, Prosperity, 2, 2).with(Farm).copies(4),
            MinerMole => CardDefinition::critter(MinerMole, Production, 3, 1).with(Mine),
            BargeToad => CardDefinition::critter(BargeToad, Production, 2, 1).with(TwigBarge),
            ChipSweep => CardDefinition::critter(ChipSweep, Production, 3, 2).with(ResinRefinery),
            Shopkeeper => CardDefinition::critter(Shopkeeper, Governance, 2, 1).with(GeneralStore).unique(),
            Woodcarver => CardDefinition::critter(Woodcarver, Production, 2, 2).with(Storehouse),
            Fool => CardDefinition::critter(Fool, Traveler, 3, -2).with(Fairgrounds).unique(),
            Peddler => CardDefinition::critter(Peddler, Production, 2, 1).with(Ruins),
            Architect => CardDefinition::critter(Architect, Prosperity, 4, 2).with(Crane).unique(),
            Judge => CardDefinition::critter(Judge, Governance, 3, 2).with(Courthouse).unique(),
            Ranger => CardDefinition::critter(Ranger, Traveler, 2, 1).with(Dungeon).unique(),
            Historian => CardDefinition::critter(Historian, Governance, 2, 1).with(ClockTower).unique(),
            Innkeeper => CardDefinition::critter(Innkeeper, Governance, 1, 1).with(Inn).unique(),
            PostalPigeon => CardDefinition::critter(PostalPigeon, Traveler, 2, 0).with(PostOffice),
            Wanderer => CardDefinition::critter(Wanderer, Traveler, 2, 1).with(Lookout).copies(3),
            Shepherd => CardDefinition::critter(Shepherd, Traveler, 3, 1).with(Chapel).unique(),
            Monk => CardDefinition::critter(Monk, Production, 1, 0).with(Monastery).unique(),
            Undertaker => CardDefinition::critter(Undertaker, Traveler, 2, 1).with(Cemetery).unique(),
            Doctor => CardDefinition::critter(Doctor, Production, 4, 4).with(University).unique(),
            King => CardDefinition::critter(King, Prosperity, 6, 4).with(Castle).unique(),
            Queen => CardDefinition::critter(Queen, Destination, 5, 4).with(Palace).unique(),
            Teacher => CardDefinition::critter(Teacher, Production, 2, 2).with(School),
            Bard => CardDefinition::critter(Bard, Traveler, 3, 0).with(Theatre).unique(),
            Messenger => CardDefinition::critter(Messenger, Traveler, 2, 0).in_expansion(Expansion::Pearlbrook),
            Pirate => CardDefinition::critter(Pirate, Traveler, 1, 0).in_expansion(Expansion::Pearlbrook),
            Greenhouse => CardDefinition::construction(Greenhouse, Production, cost(0, 1, 1, 0), 1)
                .with(Lamplighter)
                .in_expansion(Expansion::Newleaf),
            Library => CardDefinition::construction(Library, Governance, cost(1, 1, 1, 0), 0)
                .with(Inventor)
                .unique()
                .in_expansion(Expansion::Newleaf),
            AirBalloon => CardDefinition::construction(AirBalloon, Traveler, cost(1, 1, 0, 0), 1).in_expansion(Expansion::Newleaf),
            Inventor => CardDefinition::critter(Inventor, Governance, 3, 2)
                .with(Library)
                .unique()
                .in_expansion(Expansion::Newleaf),
            Lamplighter => CardDefinition::critter(Lamplighter, Production, 3, 2)
                .with(Greenhouse)
                .in_expansion(Expansion::Newleaf),
        }
    }

    #[must_use]
    pub const fn card_type(self) -> CardType {
        self.definition().card_type
    }

    #[must_use]
    pub const fn is_critter(self) -> bool {
        self.definition().is_critter
    }

    #[must_use]
    pub const fn is_construction(self) -> bool {
        !self.definition().is_critter
    }

    #[must_use]
    pub const fn is_unique(self) -> bool {
        self.definition().is_unique
    }

    #[must_use]
    pub const fn base_vp(self) -> i32 {
        self.definition().base_vp
    }

    #[must_use]
    pub const fn base_cost(self) -> ResourceMap {
        self.definition().base_cost
    }

    /// Cards whose city placement waits on a follow-up decision.
    ///
    /// The Ruins waits for the construction it replaces, the Fool for the
    /// opponent whose city it joins.
    #[must_use]
    pub fn places_after_decision(self) -> bool {
        matches!(self, CardName::Ruins | CardName::Fool)
    }

    /// Cards that take no city space.
    #[must_use]
    pub fn is_spaceless(self) -> bool {
        matches!(self, CardName::Wanderer | CardName::Pirate)
    }

    /// Cards shuffled into the deck for the given expansions.
    pub fn deck_cards(pearlbrook: bool, newleaf: bool) -> impl Iterator<Item = CardName> {
        CardName::ALL.into_iter().filter(move |c| match c.definition().expansion {
            Expansion::Base => true,
            Expansion::Pearlbrook => pearlbrook,
            Expansion::Newleaf => newleaf,
        })
    }
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CardName::*;
        let s = match self {
            Farm => "Farm",
            Mine => "Mine",
            TwigBarge => "Twig Barge",
            ResinRefinery => "Resin Refinery",
            GeneralStore => "General Store",
            Storehouse => "Storehouse",
            Fairgrounds => "Fairgrounds",
            Ruins => "Ruins",
            Crane => "Crane",
            Courthouse => "Courthouse",
            Dungeon => "Dungeon",
            ClockTower => "Clock Tower",
            Inn => "Inn",
            PostOffice => "Post Office",
            Lookout => "Lookout",
            Chapel => "Chapel",
            Monastery => "Monastery",
            Cemetery => "Cemetery",
            University => "University",
            Castle => "Castle",
            Palace => "Palace",
            School => "School",
            Theatre => "Theatre",
            Evertree => "Evertree",
            Husband => "Husband",
            Wife => "Wife",
            MinerMole => "Miner Mole",
            BargeToad => "Barge Toad",
            ChipSweep => "Chip Sweep",
            Shopkeeper => "Shopkeeper",
            Woodcarver => "Woodcarver",
            Fool => "Fool",
            Peddler => "Peddler",
            Architect => "Architect",
            Judge => "Judge",
            Ranger => "Ranger",
            Historian => "Historian",
            Innkeeper => "Innkeeper",
            PostalPigeon => "Postal Pigeon",
            Wanderer => "Wanderer",
            Shepherd => "Shepherd",
            Monk => "Monk",
            Undertaker => "Undertaker",
            Doctor => "Doctor",
            King => "King",
            Queen => "Queen",
            Teacher => "Teacher",
            Bard => "Bard",
            Messenger => "Messenger",
            Pirate => "Pirate",
            Greenhouse => "Greenhouse",
            Library => "Library",
            AirBalloon => "Air Balloon",
            Inventor => "Inventor",
            Lamplighter => "Lamplighter",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definitions_are_self_consistent() {
        for card in CardName::ALL {
            let def = card.definition();
            assert_eq!(def.name, card);
            if def.is_critter {
                assert_eq!(def.base_cost.total_basic(), def.base_cost.berry, "{card} costs only berries");
            }
            if def.is_unique {
                assert_eq!(def.copies, 2, "{card}");
            }
        }
    }

    #[test]
    fn test_associations_point_back() {
        assert_eq!(CardName::Husband.definition().associated, Some(CardName::Farm));
        assert_eq!(CardName::Farm.definition().associated, Some(CardName::Husband));
        assert_eq!(CardName::Evertree.definition().associated, None);
    }

    #[test]
    fn test_open_destinations() {
        assert!(CardName::Inn.definition().is_open_destination());
        assert!(CardName::PostOffice.definition().is_open_destination());
        assert!(!CardName::Lookout.definition().is_open_destination());
        assert!(CardName::Storehouse.definition().hosts_workers());
        assert!(!CardName::Farm.definition().hosts_workers());
    }

    #[test]
    fn test_deck_cards_respect_expansions() {
        let base: Vec<_> = CardName::deck_cards(false, false).collect();
        assert!(!base.contains(&CardName::Messenger));
        assert!(!base.contains(&CardName::Library));
        let all: Vec<_> = CardName::deck_cards(true, true).collect();
        assert_eq!(all.len(), CardName::ALL.len());
    }
}
