//! End-of-round scoring.
//!
//! Competitive awards: Bumper Crop (+4, most Spring cards), Sunkissed
//! (+2, most Summer cards), Frostbit (−2, most Winter cards — every tied
//! player is hit, and a score never drops below 0). Individual points:
//! one per harvested Fool, per okus held, per luminary claimed.

use crate::domain::cards::{Card, Rank, Suit};
use crate::domain::state::{GameState, PlayerId};

pub const WINNING_SCORE: u8 = 17;

pub const BUMPER_CROP_POINTS: u8 = 4;
pub const SUNKISSED_POINTS: u8 = 2;
pub const FROSTBIT_PENALTY: u8 = 2;

/// Per-round scoring breakdown, computed before it is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundScoring {
    pub bumper_crop_winner: Option<PlayerId>,
    pub sunkissed_winner: Option<PlayerId>,
    pub frostbit_players: Vec<PlayerId>,
    /// Fools + okus + luminaries for each player.
    pub individual_scores: Vec<u8>,
}

/// Compute the round's scoring from harvests, tokens, and luminaries.
pub fn score_round(state: &GameState) -> RoundScoring {
    let harvests: Vec<&[Card]> = state.players.iter().map(|p| p.harvest.as_slice()).collect();

    let individual_scores = state
        .players
        .iter()
        .enumerate()
        .map(|(i, player)| {
            let fools = count_rank(player.harvest.as_slice(), Rank::Fool);
            let okus = state.okus_held_by(i as PlayerId).len() as u8;
            let luminaries = player.luminaries.len() as u8;
            fools + okus + luminaries
        })
        .collect();

    RoundScoring {
        bumper_crop_winner: sole_leader(&harvests, Suit::Spring),
        sunkissed_winner: sole_leader(&harvests, Suit::Summer),
        frostbit_players: all_leaders(&harvests, Suit::Winter),
        individual_scores,
    }
}

/// Fold the breakdown into the players' running scores.
pub fn apply_round_scoring(state: &mut GameState, scoring: &RoundScoring) {
    if let Some(winner) = scoring.bumper_crop_winner {
        state.players[winner as usize].score += BUMPER_CROP_POINTS;
    }
    if let Some(winner) = scoring.sunkissed_winner {
        state.players[winner as usize].score += SUNKISSED_POINTS;
    }
    for &player in &scoring.frostbit_players {
        let score = &mut state.players[player as usize].score;
        *score = score.saturating_sub(FROSTBIT_PENALTY);
    }
    for (player, &points) in scoring.individual_scores.iter().enumerate() {
        state.players[player].score += points;
    }
}

/// First player at or past the winning score, if any.
pub fn check_victory(state: &GameState) -> Option<PlayerId> {
    state
        .players
        .iter()
        .position(|p| p.score >= WINNING_SCORE)
        .map(|i| i as PlayerId)
}

/// Player with strictly the most cards of `suit`; ties award nobody.
fn sole_leader(harvests: &[&[Card]], suit: Suit) -> Option<PlayerId> {
    let leaders = all_leaders(harvests, suit);
    match leaders.as_slice() {
        [single] => Some(*single),
        _ => None,
    }
}

/// Every player tied for the most cards of `suit`; empty when nobody
/// harvested any.
fn all_leaders(harvests: &[&[Card]], suit: Suit) -> Vec<PlayerId> {
    let counts: Vec<u8> = harvests.iter().map(|h| count_suit(h, suit)).collect();
    let max = counts.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return Vec::new();
    }
    counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count == max)
        .map(|(player, _)| player as PlayerId)
        .collect()
}

fn count_suit(harvest: &[Card], suit: Suit) -> u8 {
    harvest.iter().filter(|c| c.suit == suit).count() as u8
}

fn count_rank(harvest: &[Card], rank: Rank) -> u8 {
    harvest.iter().filter(|c| c.rank == rank).count() as u8
}
