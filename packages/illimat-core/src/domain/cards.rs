//! Core card types: Card, Rank, Suit.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spring,
    Summer,
    Autumn,
    Winter,
    Stars,
}

impl Suit {
    /// Full five-suit set (4-player games).
    pub const ALL: [Suit; 5] = [
        Suit::Spring,
        Suit::Summer,
        Suit::Autumn,
        Suit::Winter,
        Suit::Stars,
    ];

    /// Stars removed (2- and 3-player games).
    pub const NO_STARS: [Suit; 4] = [Suit::Spring, Suit::Summer, Suit::Autumn, Suit::Winter];

    /// Suit set used at deck construction for the given player count.
    pub fn for_player_count(player_count: u8) -> &'static [Suit] {
        if player_count >= 4 {
            &Self::ALL
        } else {
            &Self::NO_STARS
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abbrev = match self {
            Suit::Spring => "Sp",
            Suit::Summer => "Su",
            Suit::Autumn => "Au",
            Suit::Winter => "Wi",
            Suit::Stars => "St",
        };
        write!(f, "{abbrev}")
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Rank {
    Fool,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Knight,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Fool,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Knight,
        Rank::Queen,
        Rank::King,
    ];

    /// Achievable numeric values, ascending. Exactly one element for every
    /// rank except the Fool, which may be played as 1 or 14.
    pub fn values(self) -> &'static [u8] {
        match self {
            Rank::Fool => &[1, 14],
            Rank::Two => &[2],
            Rank::Three => &[3],
            Rank::Four => &[4],
            Rank::Five => &[5],
            Rank::Six => &[6],
            Rank::Seven => &[7],
            Rank::Eight => &[8],
            Rank::Nine => &[9],
            Rank::Ten => &[10],
            Rank::Knight => &[11],
            Rank::Queen => &[12],
            Rank::King => &[13],
        }
    }

    /// Face cards (Fool, Knight, Queen, King) rotate the Illimat when played.
    pub fn is_face(self) -> bool {
        matches!(self, Rank::Fool | Rank::Knight | Rank::Queen | Rank::King)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rank::Fool => "F",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "T",
            Rank::Knight => "N",
            Rank::Queen => "Q",
            Rank::King => "K",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    /// Face-up on the board vs face-down in a deck or hand. Presentation
    /// state only; excluded from identity.
    pub revealed: bool,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self {
            rank,
            suit,
            revealed: false,
        }
    }

    pub fn revealed(self) -> Self {
        Self {
            revealed: true,
            ..self
        }
    }

    pub fn concealed(self) -> Self {
        Self {
            revealed: false,
            ..self
        }
    }
}

// Note: identity is (rank, suit) — the deck holds exactly one card per pair,
// so equality doubles as identity and the revealed flag must not affect it.
impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank && self.suit == other.suit
    }
}

impl Eq for Card {}

impl std::hash::Hash for Card {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.rank.hash(state);
        self.suit.hash(state);
    }
}

// Ord on Card is only for stable sorting: suit order then rank order.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.suit.cmp(&other.suit) {
            std::cmp::Ordering::Equal => self.rank.cmp(&other.rank),
            ord => ord,
        }
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.rank, self.suit)
    }
}
