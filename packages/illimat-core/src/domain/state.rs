//! The aggregate game state and its seat/index helpers.

use std::collections::BTreeSet;

use crate::domain::cards::Card;
use crate::domain::deck::Deck;
use crate::domain::field::Field;
use crate::domain::luminary::LuminaryCard;
use crate::domain::okus::{OkusId, OkusPosition};
use crate::domain::player::Player;
use crate::domain::season::{rotation_season, Season};
use crate::errors::domain::{DomainError, InvariantKind};

pub type PlayerId = u8; // 0..player_count
pub type FieldId = u8; // 0..=3

pub const FIELDS: usize = 4;

/// Entire board container, sufficient for pure rules operations. One
/// `GameState` is mutated by exactly one action at a time; effects of action
/// N are fully visible before action N+1 starts.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Ordered players; seat order is turn order.
    pub players: Vec<Player>,
    pub card_deck: Deck<Card>,
    pub luminary_deck: Deck<LuminaryCard>,
    pub fields: [Field; FIELDS],
    /// Okus token positions, indexed by `OkusId`.
    pub okus: [OkusPosition; 4],
    /// Actors currently holding the Illimat still. While non-empty, no
    /// realignment may occur. A set, not a flag: several actors may hold a
    /// lock simultaneously.
    pub illimat_lockers: BTreeSet<PlayerId>,
    /// Illimat rotation offset; each field's season derives from it.
    pub rotation: u8,
    /// Luminary-driven season pins, consulted before the rotation.
    pub season_overrides: [Option<Season>; FIELDS],
    pub dealer_index: usize,
    /// Invariant: always within `0..players.len()`.
    pub active_player_index: usize,
    /// Advances when a turn begins; stockpiles remember it to enforce the
    /// same-turn harvest ban.
    pub turn_number: u16,
}

impl GameState {
    pub fn new(
        players: usize,
        card_deck: Deck<Card>,
        luminary_deck: Deck<LuminaryCard>,
        dealer_index: usize,
    ) -> Self {
        Self {
            players: (0..players).map(|_| Player::new()).collect(),
            card_deck,
            luminary_deck,
            fields: [Field::new(), Field::new(), Field::new(), Field::new()],
            okus: [OkusPosition::Unplaced; 4],
            illimat_lockers: BTreeSet::new(),
            rotation: 0,
            season_overrides: [None; FIELDS],
            dealer_index,
            active_player_index: dealer_index,
            turn_number: 0,
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Effective season for a field: a luminary override wins over the
    /// rotation-derived season.
    pub fn season_of(&self, field: FieldId) -> Season {
        self.season_overrides[field as usize].unwrap_or_else(|| rotation_season(field, self.rotation))
    }

    pub fn require_player(&self, player: PlayerId, ctx: &'static str) -> Result<(), DomainError> {
        if (player as usize) < self.players.len() {
            Ok(())
        } else {
            Err(DomainError::invariant(
                InvariantKind::IndexOutOfRange,
                format!("player {player} out of range ({ctx})"),
            ))
        }
    }

    pub fn require_field(field: FieldId, ctx: &'static str) -> Result<(), DomainError> {
        if (field as usize) < FIELDS {
            Ok(())
        } else {
            Err(DomainError::invariant(
                InvariantKind::IndexOutOfRange,
                format!("field {field} out of range ({ctx})"),
            ))
        }
    }

    /// First okus still sitting on the Illimat, if any.
    pub fn okus_on_illimat(&self) -> Option<OkusId> {
        OkusId::ALL
            .into_iter()
            .find(|&okus| self.okus[okus as usize] == OkusPosition::OnIllimat)
    }

    pub fn okus_held_by(&self, player: PlayerId) -> Vec<OkusId> {
        OkusId::ALL
            .into_iter()
            .filter(|&okus| self.okus[okus as usize] == OkusPosition::WithPlayer(player))
            .collect()
    }
}

/// Seat math: clockwise is positive. Every layer shares these so there is a
/// single source of truth for rotation and "who acts next".
#[inline]
pub fn seat_offset(seat: PlayerId, delta: i8, player_count: usize) -> PlayerId {
    let count = player_count as i16;
    ((seat as i16 + delta as i16).rem_euclid(count)) as PlayerId
}

/// Next player clockwise.
#[inline]
pub fn next_player(player: PlayerId, player_count: usize) -> PlayerId {
    seat_offset(player, 1, player_count)
}

/// Seat to the dealer's left: receives the short hand and acts first.
#[inline]
pub fn left_of_dealer(dealer: PlayerId, player_count: usize) -> PlayerId {
    next_player(dealer, player_count)
}
