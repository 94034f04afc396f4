//! Okus tokens: neutral markers claimed by clearing a field.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::state::PlayerId;

/// Okus token identifier (A-D). One token per player enters play.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum OkusId {
    A,
    B,
    C,
    D,
}

impl OkusId {
    pub const ALL: [OkusId; 4] = [OkusId::A, OkusId::B, OkusId::C, OkusId::D];
}

impl fmt::Display for OkusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OkusId::A => write!(f, "A"),
            OkusId::B => write!(f, "B"),
            OkusId::C => write!(f, "C"),
            OkusId::D => write!(f, "D"),
        }
    }
}

/// Where a token currently sits. Tokens start out of play and are placed
/// onto the Illimat during the initial deal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum OkusPosition {
    Unplaced,
    OnIllimat,
    WithPlayer(PlayerId),
}
