use serde::{Deserialize, Serialize};
use std::fmt;

/// Player season. Each player advances independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    #[default]
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// The following season, or `None` after Autumn.
    #[must_use]
    pub fn next(self) -> Option<Season> {
        match self {
            Season::Winter => Some(Season::Spring),
            Season::Spring => Some(Season::Summer),
            Season::Summer => Some(Season::Autumn),
            Season::Autumn => None,
        }
    }

    /// Workers gained when entering this season.
    #[must_use]
    pub fn workers_gained(self) -> u32 {
        match self {
            Season::Winter => 0,
            Season::Spring | Season::Summer => 1,
            Season::Autumn => 2,
        }
    }

    /// Spring and Autumn trigger production.
    #[must_use]
    pub fn has_production(self) -> bool {
        matches!(self, Season::Spring | Season::Autumn)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
        };
        f.write_str(s)
    }
}
