//! Resource kinds and resource-map arithmetic.
//!
//! `ResourceMap` holds a non-negative count per kind. VP tokens and pearls
//! travel in the same map as the four basic resources.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use crate::error::GameError;

/// A kind of resource or token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Twig,
    Resin,
    Pebble,
    Berry,
    Vp,
    Pearl,
}

impl ResourceType {
    /// The four basic resources, in display order.
    pub const BASIC: [ResourceType; 4] = [
        ResourceType::Twig,
        ResourceType::Resin,
        ResourceType::Pebble,
        ResourceType::Berry,
    ];

    pub const ALL: [ResourceType; 6] = [
        ResourceType::Twig,
        ResourceType::Resin,
        ResourceType::Pebble,
        ResourceType::Berry,
        ResourceType::Vp,
        ResourceType::Pearl,
    ];

    #[must_use]
    pub fn is_basic(self) -> bool {
        !matches!(self, ResourceType::Vp | ResourceType::Pearl)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceType::Twig => "TWIG",
            ResourceType::Resin => "RESIN",
            ResourceType::Pebble => "PEBBLE",
            ResourceType::Berry => "BERRY",
            ResourceType::Vp => "VP",
            ResourceType::Pearl => "PEARL",
        };
        f.write_str(s)
    }
}

impl FromStr for ResourceType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|r| r.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| GameError::validation(format!("Unknown resource: {s}")))
    }
}

/// Count per resource kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceMap {
    pub twig: u32,
    pub resin: u32,
    pub pebble: u32,
    pub berry: u32,
    pub vp: u32,
    pub pearl: u32,
}

impl ResourceMap {
    /// Empty map.
    pub const NONE: ResourceMap = ResourceMap::new(0, 0, 0, 0);

    /// Basic-resource bundle, usually a card cost.
    #[must_use]
    pub const fn new(twig: u32, resin: u32, pebble: u32, berry: u32) -> Self {
        Self { twig, resin, pebble, berry, vp: 0, pearl: 0 }
    }

    /// A single kind.
    #[must_use]
    pub fn of(resource: ResourceType, amount: u32) -> Self {
        let mut map = Self::default();
        map.set(resource, amount);
        map
    }

    #[must_use]
    pub const fn with_vp(mut self, vp: u32) -> Self {
        self.vp = vp;
        self
    }

    #[must_use]
    pub const fn with_pearl(mut self, pearl: u32) -> Self {
        self.pearl = pearl;
        self
    }

    #[must_use]
    pub fn get(&self, resource: ResourceType) -> u32 {
        match resource {
            ResourceType::Twig => self.twig,
            ResourceType::Resin => self.resin,
            ResourceType::Pebble => self.pebble,
            ResourceType::Berry => self.berry,
            ResourceType::Vp => self.vp,
            ResourceType::Pearl => self.pearl,
        }
    }

    pub fn set(&mut self, resource: ResourceType, amount: u32) {
        let slot = match resource {
            ResourceType::Twig => &mut self.twig,
            ResourceType::Resin => &mut self.resin,
            ResourceType::Pebble => &mut self.pebble,
            ResourceType::Berry => &mut self.berry,
            ResourceType::Vp => &mut self.vp,
            ResourceType::Pearl => &mut self.pearl,
        };
        *slot = amount;
    }

    /// Sum of the four basic resources.
    #[must_use]
    pub fn total_basic(&self) -> u32 {
        self.twig + self.resin + self.pebble + self.berry
    }

    /// Sum over every kind.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total_basic() + self.vp + self.pearl
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// True if every count in `other` is available here.
    #[must_use]
    pub fn contains(&self, other: &ResourceMap) -> bool {
        ResourceType::ALL.iter().all(|&r| self.get(r) >= other.get(r))
    }

    /// Subtract `other`, or `None` if any count would go negative.
    #[must_use]
    pub fn checked_sub(&self, other: &ResourceMap) -> Option<ResourceMap> {
        let mut out = *self;
        for r in ResourceType::ALL {
            out.set(r, self.get(r).checked_sub(other.get(r))?);
        }
        Some(out)
    }

    /// Iterate over non-zero entries.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceType, u32)> + '_ {
        ResourceType::ALL
            .into_iter()
            .map(|r| (r, self.get(r)))
            .filter(|(_, n)| *n > 0)
    }
}

impl Add for ResourceMap {
    type Output = ResourceMap;

    fn add(mut self, rhs: ResourceMap) -> ResourceMap {
        self += rhs;
        self
    }
}

impl AddAssign for ResourceMap {
    fn add_assign(&mut self, rhs: ResourceMap) {
        for r in ResourceType::ALL {
            self.set(r, self.get(r) + rhs.get(r));
        }
    }
}

impl fmt::Display for ResourceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(r, n)| format!("{n} {r}")).collect();
        if parts.is_empty() {
            f.write_str("nothing")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_sub() {
        let have = ResourceMap::new(2, 1, 0, 3);
        assert_eq!(have.checked_sub(&ResourceMap::new(1, 1, 0, 0)), Some(ResourceMap::new(1, 0, 0, 3)));
        assert_eq!(have.checked_sub(&ResourceMap::new(0, 0, 1, 0)), None);
    }

    #[test]
    fn test_contains_includes_tokens() {
        let have = ResourceMap::new(1, 0, 0, 0).with_vp(2);
        assert!(have.contains(&ResourceMap::NONE.with_vp(2)));
        assert!(!have.contains(&ResourceMap::NONE.with_pearl(1)));
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(ResourceMap::new(2, 0, 0, 1).to_string(), "2 TWIG, 1 BERRY");
        assert_eq!(ResourceMap::NONE.to_string(), "nothing");
        assert_eq!("berry".parse::<ResourceType>(), Ok(ResourceType::Berry));
        assert!("wood".parse::<ResourceType>().is_err());
    }

    #[test]
    fn test_add() {
        let sum = ResourceMap::new(1, 0, 0, 0) + ResourceMap::of(ResourceType::Pearl, 2);
        assert_eq!(sum.twig, 1);
        assert_eq!(sum.pearl, 2);
        assert_eq!(sum.total_basic(), 1);
    }
}
