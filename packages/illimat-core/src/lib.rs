#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

//! Authoritative rules engine for the card game Illimat.
//!
//! The engine tracks game state, enforces legal transitions between states,
//! and maintains the combinatorial index answering which groups of cards on
//! the board a played card may collect. Drivers (UI, bots, replay tooling)
//! submit [`Action`] values to a [`Game`]'s pending queue and step the
//! interpreter; every performed action is reversible from the completed
//! stack. The core is a pure, deterministic simulation: no I/O, no clocks,
//! no persistence.

pub mod domain;
pub mod errors;

// Re-exports for public API
pub use domain::actions::Action;
pub use domain::cards::{Card, Rank, Suit};
pub use domain::deck::Deck;
pub use domain::field::{Field, PileSetsByValue};
pub use domain::game::{Game, GameConfig};
pub use domain::pile::{Pile, PileId, PileKind};
pub use domain::season::Season;
pub use domain::state::{FieldId, GameState, PlayerId};
pub use errors::domain::DomainError;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}
