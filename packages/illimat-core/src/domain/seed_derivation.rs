//! RNG seed derivation for deterministic shuffles.
//!
//! The two decks draw from independent-but-deterministic streams derived
//! from the single game seed, so shuffling one never perturbs the other.

/// Seed for the main card deck shuffle.
pub fn derive_card_deck_seed(game_seed: u64) -> u64 {
    game_seed.wrapping_mul(1_000_003).wrapping_add(1)
}

/// Seed for the luminary deck shuffle.
pub fn derive_luminary_deck_seed(game_seed: u64) -> u64 {
    game_seed.wrapping_mul(1_000_033).wrapping_add(2)
}
