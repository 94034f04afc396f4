//! Domain layer: pure game rules types and helpers.

pub mod actions;
pub mod cards;
pub mod combinatorics;
pub mod deck;
pub mod field;
pub mod game;
pub mod luminary;
pub mod okus;
pub mod pile;
pub mod player;
pub mod scoring;
pub mod season;
pub mod seed_derivation;
pub mod state;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_field_index;
#[cfg(test)]
mod tests_orchestration;
#[cfg(test)]
mod tests_props_index;
#[cfg(test)]
mod tests_props_pile_values;

// Re-exports for ergonomics
pub use actions::Action;
pub use cards::{Card, Rank, Suit};
pub use deck::Deck;
pub use field::{Field, PileSetsByValue};
pub use game::{Game, GameConfig};
pub use luminary::{LuminaryCard, LuminarySlot};
pub use okus::{OkusId, OkusPosition};
pub use pile::{Pile, PileId, PileKind};
pub use player::Player;
pub use season::Season;
pub use state::{FieldId, GameState, PlayerId};
