//! Property tests for the harvest index.
//!
//! Properties tested:
//! - Incremental maintenance (add_pile with singleton seeding) matches the
//!   ground-truth full enumeration for every key
//! - Every recorded subset really can sum to its key under some per-pile
//!   Fool assignment
//! - Removing a pile returns the index to its prior entries

use proptest::prelude::*;

use crate::domain::combinatorics::value_sums;
use crate::domain::field::PileSetsByValue;
use crate::domain::pile::{Pile, PileId, PileKind};
use crate::domain::{test_gens, test_prelude};

fn piles_strategy(max_piles: usize) -> impl Strategy<Value = Vec<Pile>> {
    prop::collection::vec(test_gens::pile_cards(3, 2), 1..=max_piles).prop_map(|piles| {
        piles
            .into_iter()
            .enumerate()
            .map(|(i, cards)| Pile {
                id: PileId(i as u32),
                cards,
                kind: PileKind::Loose,
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn prop_incremental_matches_rebuild(piles in piles_strategy(4)) {
        let mut incremental = PileSetsByValue::new();
        for pile in &piles {
            incremental.add_pile(pile.id, &pile.values());
        }
        let rebuilt = PileSetsByValue::rebuild(&piles);
        prop_assert!(incremental.same_entries(&rebuilt));
    }

    #[test]
    fn prop_every_recorded_subset_achieves_its_key(piles in piles_strategy(4)) {
        let mut index = PileSetsByValue::new();
        for pile in &piles {
            index.add_pile(pile.id, &pile.values());
        }
        let keys: Vec<u16> = index.keys().collect();
        for key in keys {
            for subset in index.sets_for(key) {
                let member_values: Vec<Vec<u16>> = subset
                    .iter()
                    .map(|id| {
                        piles
                            .iter()
                            .find(|p| p.id == *id)
                            .expect("recorded pile exists")
                            .values()
                    })
                    .collect();
                let achievable = value_sums(&member_values).any(|sum| sum == key);
                prop_assert!(achievable, "subset {:?} cannot reach {}", subset, key);
            }
        }
    }

    #[test]
    fn prop_every_achieving_subset_is_recorded(piles in piles_strategy(4)) {
        // rebuild() enumerates every subset and Fool choice by construction;
        // equality with the incremental index transfers completeness to it.
        let mut incremental = PileSetsByValue::new();
        for pile in &piles {
            incremental.add_pile(pile.id, &pile.values());
        }
        let rebuilt = PileSetsByValue::rebuild(&piles);
        let keys: Vec<u16> = rebuilt.keys().collect();
        for key in keys {
            for subset in rebuilt.sets_for(key) {
                prop_assert!(
                    incremental.contains_set(key, subset),
                    "subset {:?} for {} missing from the incremental index",
                    subset,
                    key
                );
            }
        }
    }

    #[test]
    fn prop_remove_restores_prior_entries(piles in piles_strategy(3)) {
        let mut index = PileSetsByValue::new();
        for pile in &piles {
            index.add_pile(pile.id, &pile.values());
        }
        let before = index.clone();

        let extra = Pile {
            id: PileId(99),
            cards: vec![],
            kind: PileKind::Stockpile { value: 6, created_turn: 0 },
        };
        index.add_pile(extra.id, &extra.values());
        index.remove_pile(extra.id);

        prop_assert!(index.same_entries(&before));
    }
}
