//! Per-player state: hand, harvest pile, claimed luminaries, running score.
//!
//! Okus positions live centrally on `GameState`; a player's holdings derive
//! from them so there is a single source of truth for token location.

use serde::{Deserialize, Serialize};

use crate::domain::cards::Card;
use crate::domain::luminary::LuminaryCard;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub hand: Vec<Card>,
    pub harvest: Vec<Card>,
    pub luminaries: Vec<LuminaryCard>,
    pub score: u8,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }
}
