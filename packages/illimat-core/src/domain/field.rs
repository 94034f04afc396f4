//! Field state and the combinatorial harvest index.
//!
//! A field answers "which groups of piles can together sum to value V" — the
//! legality test for harvesting with a card played at value V. The answer is
//! kept as an incrementally maintained index from total to pile-handle
//! subsets rather than recomputed per lookup. Complexity is exponential in
//! pile count, which stays small during normal play.

use std::collections::BTreeMap;

use crate::domain::cards::Card;
use crate::domain::combinatorics::{index_subsets, value_sums};
use crate::domain::luminary::LuminarySlot;
use crate::domain::pile::{Pile, PileId, PileKind};
use crate::errors::domain::{DomainError, StructuralKind};

/// Map from achievable total to every pile subset that can reach it.
///
/// A subset appears once per distinct Fool-choice combination that reaches
/// the key, so duplicate entries under one key are permitted. An absent key
/// means no legal harvest at that value.
#[derive(Debug, Clone, Default)]
pub struct PileSetsByValue {
    by_value: BTreeMap<u16, Vec<Vec<PileId>>>,
}

// The index is a multiset per key; entry order within a key is an artifact
// of maintenance order and must not affect equality.
impl PartialEq for PileSetsByValue {
    fn eq(&self, other: &Self) -> bool {
        self.same_entries(other)
    }
}

impl Eq for PileSetsByValue {}

impl PileSetsByValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new pile: every recorded (key, subset) pair gains an
    /// extended entry at `key + v` for each value `v` of the pile, and the
    /// pile seeds a singleton entry under each of its own values so it is
    /// harvestable alone.
    pub fn add_pile(&mut self, id: PileId, values: &[u16]) {
        let mut additions: Vec<(u16, Vec<PileId>)> = Vec::new();
        for (&key, subsets) in &self.by_value {
            for subset in subsets {
                for &value in values {
                    let mut extended = subset.clone();
                    extended.push(id);
                    extended.sort_unstable();
                    additions.push((key + value, extended));
                }
            }
        }
        for &value in values {
            additions.push((value, vec![id]));
        }
        for (key, subset) in additions {
            self.by_value.entry(key).or_default().push(subset);
        }
    }

    /// Purges every recorded subset containing `id`.
    pub fn remove_pile(&mut self, id: PileId) {
        self.by_value.retain(|_, subsets| {
            subsets.retain(|subset| !subset.contains(&id));
            !subsets.is_empty()
        });
    }

    /// Every legal harvest target-set for a card played at `value`.
    pub fn sets_for(&self, value: u16) -> &[Vec<PileId>] {
        self.by_value.get(&value).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `subset` (ascending ids) is recorded under `value`.
    pub fn contains_set(&self, value: u16, subset: &[PileId]) -> bool {
        self.sets_for(value).iter().any(|s| s == subset)
    }

    pub fn keys(&self) -> impl Iterator<Item = u16> + '_ {
        self.by_value.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.by_value.is_empty()
    }

    /// Ground-truth construction by full enumeration: every non-empty
    /// subset of `piles`, every Fool-choice combination of its members.
    /// Semantically equal to the incrementally maintained index; tests
    /// cross-check the two.
    pub fn rebuild(piles: &[Pile]) -> Self {
        let mut index = Self::new();
        let value_lists: Vec<Vec<u16>> = piles.iter().map(Pile::values).collect();
        for subset in index_subsets(piles.len()) {
            if subset.is_empty() {
                continue;
            }
            let ids: Vec<PileId> = {
                let mut ids: Vec<PileId> = subset.iter().map(|&i| piles[i].id).collect();
                ids.sort_unstable();
                ids
            };
            let member_values: Vec<Vec<u16>> =
                subset.iter().map(|&i| value_lists[i].clone()).collect();
            for sum in value_sums(&member_values) {
                index.by_value.entry(sum).or_default().push(ids.clone());
            }
        }
        index
    }

    /// Order-insensitive comparison: same keys, same multiset of subsets
    /// under each key.
    pub fn same_entries(&self, other: &Self) -> bool {
        let normalize = |index: &Self| -> BTreeMap<u16, Vec<Vec<PileId>>> {
            index
                .by_value
                .iter()
                .map(|(&k, subsets)| {
                    let mut sorted = subsets.clone();
                    sorted.sort();
                    (k, sorted)
                })
                .collect()
        };
        normalize(self) == normalize(other)
    }
}

/// One of the four board quadrants.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    piles: Vec<Pile>,
    pub luminary: LuminarySlot,
    /// Season restrictions do not apply here (e.g. The Maiden's field).
    pub ignore_season: bool,
    /// Cap on how many cards a single harvest may collect, when a luminary
    /// imposes one.
    pub harvest_card_max: Option<u8>,
    index: PileSetsByValue,
    next_pile_id: u32,
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}

impl Field {
    pub fn new() -> Self {
        Self {
            piles: Vec::new(),
            luminary: LuminarySlot::Empty,
            ignore_season: false,
            harvest_card_max: None,
            index: PileSetsByValue::new(),
            next_pile_id: 0,
        }
    }

    pub fn piles(&self) -> &[Pile] {
        &self.piles
    }

    pub fn pile(&self, id: PileId) -> Option<&Pile> {
        self.piles.iter().find(|p| p.id == id)
    }

    pub fn position_of(&self, id: PileId) -> Option<usize> {
        self.piles.iter().position(|p| p.id == id)
    }

    pub fn sets_for_value(&self, value: u16) -> &[Vec<PileId>] {
        self.index.sets_for(value)
    }

    pub fn index(&self) -> &PileSetsByValue {
        &self.index
    }

    /// No piles left; clearing a field is what earns okus and luminaries.
    pub fn is_cleared(&self) -> bool {
        self.piles.is_empty()
    }

    pub fn add_loose_pile(&mut self, cards: Vec<Card>) -> PileId {
        self.add_pile_at(self.piles.len(), cards, PileKind::Loose)
    }

    pub fn add_loose_pile_at(&mut self, position: usize, cards: Vec<Card>) -> PileId {
        self.add_pile_at(position, cards, PileKind::Loose)
    }

    pub fn add_stockpile(&mut self, cards: Vec<Card>, value: u8, created_turn: u16) -> PileId {
        self.add_pile_at(
            self.piles.len(),
            cards,
            PileKind::Stockpile {
                value,
                created_turn,
            },
        )
    }

    fn add_pile_at(&mut self, position: usize, cards: Vec<Card>, kind: PileKind) -> PileId {
        let id = PileId(self.next_pile_id);
        self.next_pile_id += 1;
        let pile = Pile { id, cards, kind };
        self.index.add_pile(id, &pile.values());
        let position = position.min(self.piles.len());
        self.piles.insert(position, pile);
        id
    }

    /// Removes a pile, returning its position for exact restoration.
    pub fn remove_pile(&mut self, id: PileId) -> Result<(usize, Pile), DomainError> {
        let position = self.position_of(id).ok_or_else(|| {
            DomainError::structural(StructuralKind::PileNotFound, format!("{id} is not on the field"))
        })?;
        let pile = self.piles.remove(position);
        self.index.remove_pile(id);
        Ok((position, pile))
    }

    /// Inverse of `remove_pile`: reinstates the pile under its original
    /// handle and position. Handles are monotonic, so the id stays unique.
    pub fn restore_pile(&mut self, position: usize, pile: Pile) {
        self.index.add_pile(pile.id, &pile.values());
        let position = position.min(self.piles.len());
        self.piles.insert(position, pile);
    }

    /// Inverse of pile creation: removes the pile and, when it was the most
    /// recently created one, rolls the handle counter back so a perform/
    /// unwind round trip leaves the field bit-for-bit unchanged.
    pub fn unadd_pile(&mut self, id: PileId) -> Result<(usize, Pile), DomainError> {
        let removed = self.remove_pile(id)?;
        if id.0 + 1 == self.next_pile_id {
            self.next_pile_id = id.0;
        }
        Ok(removed)
    }
}
