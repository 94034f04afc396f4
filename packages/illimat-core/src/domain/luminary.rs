//! Luminaries: special non-suited cards dealt face-down, one per field.
//!
//! Only the core set is in play. A slot walks FaceDown → FaceUp → Claimed;
//! reveal effects with structural consequences (season pinning, season
//! exemption, extra sowing) are applied by the reveal action.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::state::PlayerId;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum LuminaryCard {
    TheMaiden,
    TheChangeling,
    TheRiver,
    TheChildren,
    TheForestQueen,
    TheRake,
    TheUnion,
    TheNewborn,
}

impl LuminaryCard {
    pub const CORE: [LuminaryCard; 8] = [
        LuminaryCard::TheMaiden,
        LuminaryCard::TheChangeling,
        LuminaryCard::TheRiver,
        LuminaryCard::TheChildren,
        LuminaryCard::TheForestQueen,
        LuminaryCard::TheRake,
        LuminaryCard::TheUnion,
        LuminaryCard::TheNewborn,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            LuminaryCard::TheMaiden => "The Maiden",
            LuminaryCard::TheChangeling => "The Changeling",
            LuminaryCard::TheRiver => "The River",
            LuminaryCard::TheChildren => "The Children",
            LuminaryCard::TheForestQueen => "The Forest Queen",
            LuminaryCard::TheRake => "The Rake",
            LuminaryCard::TheUnion => "The Union",
            LuminaryCard::TheNewborn => "The Newborn",
        }
    }
}

impl fmt::Display for LuminaryCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Lifecycle of a field's luminary slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum LuminarySlot {
    Empty,
    FaceDown(LuminaryCard),
    FaceUp(LuminaryCard),
    Claimed(LuminaryCard, PlayerId),
}

impl LuminarySlot {
    pub fn card(self) -> Option<LuminaryCard> {
        match self {
            LuminarySlot::Empty => None,
            LuminarySlot::FaceDown(card)
            | LuminarySlot::FaceUp(card)
            | LuminarySlot::Claimed(card, _) => Some(card),
        }
    }

    pub fn is_face_down(self) -> bool {
        matches!(self, LuminarySlot::FaceDown(_))
    }

    pub fn can_be_claimed(self) -> bool {
        matches!(self, LuminarySlot::FaceUp(_))
    }
}
