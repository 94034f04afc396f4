//! The season ring and the Illimat rotation.
//!
//! Seasons are not stored per field. The Illimat's rotation is a single
//! offset; each field's season derives from it around the fixed ring
//! Spring → Summer → Autumn → Winter. Luminary effects may pin a field's
//! season through an explicit override layer that sits on top of the
//! rotation and is never touched by realignment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::cards::Suit;
use crate::domain::state::FieldId;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const RING: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    fn ring_offset(self) -> u8 {
        match self {
            Season::Spring => 0,
            Season::Summer => 1,
            Season::Autumn => 2,
            Season::Winter => 3,
        }
    }

    /// Season a seasonal suit realigns the Illimat toward. Stars has no
    /// season and never rotates the Illimat.
    pub fn for_suit(suit: Suit) -> Option<Season> {
        match suit {
            Suit::Spring => Some(Season::Spring),
            Suit::Summer => Some(Season::Summer),
            Suit::Autumn => Some(Season::Autumn),
            Suit::Winter => Some(Season::Winter),
            Suit::Stars => None,
        }
    }

    /// Winter blocks harvesting.
    pub fn allows_harvest(self) -> bool {
        self != Season::Winter
    }

    /// Autumn blocks sowing.
    pub fn allows_sow(self) -> bool {
        self != Season::Autumn
    }

    /// Spring blocks stockpiling.
    pub fn allows_stockpile(self) -> bool {
        self != Season::Spring
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Spring => write!(f, "Spring"),
            Season::Summer => write!(f, "Summer"),
            Season::Autumn => write!(f, "Autumn"),
            Season::Winter => write!(f, "Winter"),
        }
    }
}

/// Season the rotation shows for `field`, before overrides.
pub fn rotation_season(field: FieldId, rotation: u8) -> Season {
    let offset = (field + 4 - (rotation % 4)) % 4;
    Season::RING[offset as usize]
}

/// Rotation value that puts `field` into `season`.
pub fn rotation_for(field: FieldId, season: Season) -> u8 {
    (field + 4 - season.ring_offset()) % 4
}
