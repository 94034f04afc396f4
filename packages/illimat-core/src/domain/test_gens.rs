// Proptest generators for domain types.

use proptest::prelude::*;

use crate::domain::cards::{Card, Rank, Suit};

/// Generate a random Suit
pub fn suit() -> impl Strategy<Value = Suit> {
    prop_oneof![
        Just(Suit::Spring),
        Just(Suit::Summer),
        Just(Suit::Autumn),
        Just(Suit::Winter),
        Just(Suit::Stars),
    ]
}

/// Generate a random Rank
pub fn rank() -> impl Strategy<Value = Rank> {
    prop::sample::select(Rank::ALL.to_vec())
}

/// Generate a random non-Fool Rank
pub fn plain_rank() -> impl Strategy<Value = Rank> {
    prop::sample::select(
        Rank::ALL
            .iter()
            .copied()
            .filter(|r| *r != Rank::Fool)
            .collect::<Vec<_>>(),
    )
}

/// Generate a single Card
pub fn card() -> impl Strategy<Value = Card> {
    (rank(), suit()).prop_map(|(rank, suit)| Card::new(rank, suit))
}

/// Generate a pile's worth of cards: up to `max_plain` non-Fool cards plus
/// up to `max_fools` Fools, at least one card total.
pub fn pile_cards(max_plain: usize, max_fools: usize) -> impl Strategy<Value = Vec<Card>> {
    let plain = prop::collection::vec((plain_rank(), suit()), 0..=max_plain);
    let fools = prop::collection::vec(suit(), 0..=max_fools);
    (plain, fools)
        .prop_filter("pile must not be empty", |(plain, fools)| {
            !plain.is_empty() || !fools.is_empty()
        })
        .prop_map(|(plain, fools)| {
            let mut cards: Vec<Card> = plain
                .into_iter()
                .map(|(rank, suit)| Card::new(rank, suit))
                .collect();
            cards.extend(fools.into_iter().map(|suit| Card::new(Rank::Fool, suit)));
            cards
        })
}
