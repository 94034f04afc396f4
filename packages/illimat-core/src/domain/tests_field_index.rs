//! Tests for the field-level harvest index.
//!
//! Covers the singleton-seeding rule for newly added piles, subset purging
//! on removal, and the worked two-pile example: with P1 = [2] and
//! P2 = [Fool], key 2 lists only [P1], keys 1 and 14 list [P2], and keys 3
//! and 16 list {P1, P2}.

use crate::domain::cards::{Card, Rank, Suit};
use crate::domain::field::{Field, PileSetsByValue};
use crate::domain::pile::{Pile, PileId, PileKind};

fn loose(id: u32, cards: Vec<Card>) -> Pile {
    Pile {
        id: PileId(id),
        cards,
        kind: PileKind::Loose,
    }
}

fn two() -> Card {
    Card::new(Rank::Two, Suit::Spring)
}

fn fool() -> Card {
    Card::new(Rank::Fool, Suit::Spring)
}

#[test]
fn singleton_is_seeded_for_a_new_pile() {
    let mut index = PileSetsByValue::new();
    index.add_pile(PileId(0), &[5]);
    assert_eq!(index.sets_for(5), &[vec![PileId(0)]]);
}

#[test]
fn singleton_seeded_even_when_index_is_nonempty() {
    let mut index = PileSetsByValue::new();
    index.add_pile(PileId(0), &[5]);
    index.add_pile(PileId(1), &[7]);
    assert!(index.contains_set(7, &[PileId(1)]), "second pile must be harvestable alone");
    assert!(index.contains_set(12, &[PileId(0), PileId(1)]));
}

#[test]
fn two_pile_example_from_the_rules() {
    let mut field = Field::new();
    let p1 = field.add_loose_pile(vec![two()]);
    let p2 = field.add_loose_pile(vec![fool()]);

    // P1 alone under its single value.
    assert_eq!(field.sets_for_value(2), &[vec![p1]]);

    // P2 alone under both Fool values, never under 3.
    assert!(field.index().contains_set(1, &[p2]));
    assert!(field.index().contains_set(14, &[p2]));
    assert!(!field.index().contains_set(3, &[p2]));

    // The pair under 3 (2 + Fool-as-1) and 16 (2 + Fool-as-14).
    assert!(field.index().contains_set(3, &[p1, p2]));
    assert!(field.index().contains_set(16, &[p1, p2]));

    // Key 2 lists P1 alone and nothing else.
    assert_eq!(field.sets_for_value(2).len(), 1);
}

#[test]
fn absent_key_means_no_legal_harvest() {
    let mut field = Field::new();
    field.add_loose_pile(vec![two()]);
    assert!(field.sets_for_value(9).is_empty());
}

#[test]
fn remove_purges_every_subset_containing_the_pile() {
    let mut field = Field::new();
    let p1 = field.add_loose_pile(vec![two()]);
    let p2 = field.add_loose_pile(vec![fool()]);
    field.remove_pile(p2).unwrap();

    assert!(field.sets_for_value(1).is_empty());
    assert!(field.sets_for_value(14).is_empty());
    assert!(field.sets_for_value(3).is_empty());
    assert!(field.sets_for_value(16).is_empty());
    assert_eq!(field.sets_for_value(2), &[vec![p1]]);
}

#[test]
fn duplicate_entries_under_one_key_are_permitted() {
    // Two Fools: the pair reaches 15 twice (1+14 and 14+1) via the same
    // subset with different per-Fool choices.
    let mut index = PileSetsByValue::new();
    index.add_pile(PileId(0), &[1, 14]);
    index.add_pile(PileId(1), &[1, 14]);
    let pair: Vec<_> = index
        .sets_for(15)
        .iter()
        .filter(|s| s.as_slice() == [PileId(0), PileId(1)])
        .collect();
    assert_eq!(pair.len(), 2);
}

#[test]
fn incremental_index_matches_full_rebuild() {
    let piles = vec![
        loose(0, vec![two(), fool()]),
        loose(1, vec![Card::new(Rank::Seven, Suit::Winter)]),
        loose(2, vec![fool()]),
        Pile {
            id: PileId(3),
            cards: vec![two(), Card::new(Rank::Nine, Suit::Autumn)],
            kind: PileKind::Stockpile {
                value: 11,
                created_turn: 1,
            },
        },
    ];
    let mut incremental = PileSetsByValue::new();
    for pile in &piles {
        incremental.add_pile(pile.id, &pile.values());
    }
    let rebuilt = PileSetsByValue::rebuild(&piles);
    assert!(incremental.same_entries(&rebuilt));
}

#[test]
fn add_then_remove_restores_prior_entries() {
    let mut field = Field::new();
    field.add_loose_pile(vec![two()]);
    field.add_loose_pile(vec![Card::new(Rank::Nine, Suit::Winter)]);
    let before = field.index().clone();

    let transient = field.add_loose_pile(vec![fool()]);
    field.remove_pile(transient).unwrap();

    assert!(field.index().same_entries(&before));
}

#[test]
fn restored_pile_reindexes_under_its_original_handle() {
    let mut field = Field::new();
    let p1 = field.add_loose_pile(vec![two()]);
    let p2 = field.add_loose_pile(vec![fool()]);
    let before = field.index().clone();

    let (position, pile) = field.remove_pile(p2).unwrap();
    field.restore_pile(position, pile);

    assert!(field.index().same_entries(&before));
    assert!(field.index().contains_set(3, &[p1, p2]));
}

#[test]
fn stockpile_indexes_only_its_pinned_value() {
    let mut field = Field::new();
    let sp = field.add_stockpile(vec![fool(), Card::new(Rank::Ten, Suit::Winter)], 11, 0);
    assert_eq!(field.sets_for_value(11), &[vec![sp]]);
    assert!(field.sets_for_value(24).is_empty(), "Fool duality must be pinned away");
}
