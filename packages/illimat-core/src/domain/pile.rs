//! Piles and the achievable-total algebra.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, Rank};

/// Stable handle for a pile within its field. Handles are never reused
/// while a field lives, so identity lookups survive removals.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct PileId(pub u32);

impl fmt::Display for PileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum PileKind {
    /// Free cards; Fools keep their dual value.
    Loose,
    /// Built deliberately for a declared total. The total is pinned at
    /// creation and the pile may not be harvested on the turn it was built.
    Stockpile { value: u8, created_turn: u16 },
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pile {
    pub id: PileId,
    pub cards: Vec<Card>,
    pub kind: PileKind,
}

impl Pile {
    /// Achievable totals, ascending, never empty.
    ///
    /// With `k` Fools and non-Fool sum `s`, the totals are the `k + 1`
    /// evenly spaced sums `{s+k, s+k+13, …, s+14k}` — one per choice of how
    /// many Fools count as 14. An empty pile sums to 0 (degenerate case,
    /// kept deliberately). A stockpile answers only its pinned value.
    pub fn values(&self) -> Vec<u16> {
        if let PileKind::Stockpile { value, .. } = self.kind {
            return vec![u16::from(value)];
        }
        let fools = self.cards.iter().filter(|c| c.rank == Rank::Fool).count() as u16;
        let sum: u16 = self
            .cards
            .iter()
            .filter(|c| c.rank != Rank::Fool)
            .map(|c| u16::from(c.rank.values()[0]))
            .sum();
        (0..=fools).map(|fourteens| sum + fools + 13 * fourteens).collect()
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn is_same_turn_stockpile(&self, turn: u16) -> bool {
        matches!(self.kind, PileKind::Stockpile { created_turn, .. } if created_turn == turn)
    }
}
