//! Property tests for the pile value algebra.
//!
//! Properties tested:
//! - A pile with k Fools and non-Fool sum s has exactly k+1 values
//! - The values are the evenly spaced sums {s+k, s+k+13, …, s+14k}
//! - The list is ascending and never empty

use proptest::prelude::*;

use crate::domain::cards::Rank;
use crate::domain::pile::{Pile, PileId, PileKind};
use crate::domain::{test_gens, test_prelude};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn prop_values_match_the_fool_formula(
        cards in test_gens::pile_cards(5, 3),
    ) {
        let fools = cards.iter().filter(|c| c.rank == Rank::Fool).count() as u16;
        let sum: u16 = cards
            .iter()
            .filter(|c| c.rank != Rank::Fool)
            .map(|c| u16::from(c.rank.values()[0]))
            .sum();

        let pile = Pile { id: PileId(0), cards, kind: PileKind::Loose };
        let values = pile.values();

        prop_assert_eq!(values.len() as u16, fools + 1);
        for (i, &value) in values.iter().enumerate() {
            prop_assert_eq!(value, sum + fools + 13 * i as u16);
        }
    }

    #[test]
    fn prop_values_are_strictly_ascending_and_nonempty(
        cards in test_gens::pile_cards(5, 3),
    ) {
        let pile = Pile { id: PileId(0), cards, kind: PileKind::Loose };
        let values = pile.values();
        prop_assert!(!values.is_empty());
        for pair in values.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn prop_every_value_is_reachable_by_some_fool_assignment(
        cards in test_gens::pile_cards(4, 2),
    ) {
        let pile = Pile { id: PileId(0), cards: cards.clone(), kind: PileKind::Loose };
        for &value in &pile.values() {
            // Choose i Fools to count as 14; some i must reach the value.
            let fools = cards.iter().filter(|c| c.rank == Rank::Fool).count() as u16;
            let sum: u16 = cards
                .iter()
                .filter(|c| c.rank != Rank::Fool)
                .map(|c| u16::from(c.rank.values()[0]))
                .sum();
            let reachable = (0..=fools).any(|fourteens| sum + fools + 13 * fourteens == value);
            prop_assert!(reachable, "value {} unreachable", value);
        }
    }
}
