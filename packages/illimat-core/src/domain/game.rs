//! Game orchestration: configuration, RNG, and the action queues.
//!
//! The driver loop is an explicit interpreter over a pending FIFO and a
//! completed LIFO: dequeue, perform, push the children back to the front of
//! the queue, push the performed action onto the stack. Composite actions
//! never execute their children synchronously; reversal pops the stack in
//! strict order.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::domain::actions::Action;
use crate::domain::cards::{Card, Rank, Suit};
use crate::domain::deck::Deck;
use crate::domain::luminary::LuminaryCard;
use crate::domain::seed_derivation::{derive_card_deck_seed, derive_luminary_deck_seed};
use crate::domain::state::{left_of_dealer, GameState, PlayerId};
use crate::errors::domain::{DomainError, InvariantKind, ValidationKind};

/// Player-count configuration. The Stars suit enters the deck only with a
/// full table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GameConfig {
    player_count: u8,
}

impl GameConfig {
    pub fn new(player_count: u8) -> Result<Self, DomainError> {
        if !(2..=4).contains(&player_count) {
            return Err(DomainError::validation(
                ValidationKind::InvalidPlayerCount,
                "player count must be 2..=4",
            ));
        }
        Ok(Self { player_count })
    }

    pub fn player_count(&self) -> u8 {
        self.player_count
    }

    pub fn use_stars_suit(&self) -> bool {
        self.player_count >= 4
    }

    pub fn expected_deck_size(&self) -> usize {
        Suit::for_player_count(self.player_count).len() * Rank::ALL.len()
    }
}

/// Owns the state, the RNG, and the two action collections that sequence
/// actions into turns.
#[derive(Debug)]
pub struct Game {
    pub state: GameState,
    config: GameConfig,
    seed: u64,
    rng: ChaCha8Rng,
    pending: VecDeque<Action>,
    completed: Vec<Action>,
}

impl Game {
    /// A game with a wall-clock-derived seed.
    pub fn new(config: GameConfig) -> Self {
        Self::with_seed(config, seed_from_wall_clock())
    }

    /// A fully reproducible game: same seed, same shuffles, same dealer.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let card_deck = Deck::new(full_deck(config.player_count));
        card_deck.shuffle(&mut ChaCha8Rng::seed_from_u64(derive_card_deck_seed(seed)));

        let luminary_deck = Deck::new(LuminaryCard::CORE.to_vec());
        luminary_deck.shuffle(&mut ChaCha8Rng::seed_from_u64(derive_luminary_deck_seed(
            seed,
        )));

        let dealer = rng.random_range(0..config.player_count);
        let state = GameState::new(
            config.player_count as usize,
            card_deck,
            luminary_deck,
            dealer as usize,
        );

        let mut pending = VecDeque::new();
        pending.push_back(Action::InitialDeal {
            dealer,
            undo: None,
        });
        pending.push_back(Action::BeginTurn {
            player: left_of_dealer(dealer, config.player_count as usize),
            undo: None,
        });

        Self {
            state,
            config,
            seed,
            rng,
            pending,
            completed: Vec::new(),
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn dealer(&self) -> PlayerId {
        self.state.dealer_index as PlayerId
    }

    /// Submit an action to the back of the pending queue.
    pub fn enqueue(&mut self, action: Action) {
        self.pending.push_back(action);
    }

    pub fn pending(&self) -> &VecDeque<Action> {
        &self.pending
    }

    pub fn completed(&self) -> &[Action] {
        &self.completed
    }

    /// Perform the next pending action. Children it returns are enqueued at
    /// the front, in order, so a composite's sequence runs before anything
    /// submitted later. Returns `Ok(false)` when the queue is empty.
    ///
    /// Errors other than `Validation` leave the instance unusable; the
    /// driver must stop dequeuing.
    pub fn step(&mut self) -> Result<bool, DomainError> {
        let Some(mut action) = self.pending.pop_front() else {
            return Ok(false);
        };
        debug!(kind = action.kind(), actor = action.actor(), "performing");
        match action.perform(&mut self.state) {
            Ok(children) => {
                for child in children.into_iter().rev() {
                    self.pending.push_front(child);
                }
                self.completed.push(action);
                Ok(true)
            }
            Err(err) => {
                warn!(kind = action.kind(), %err, "action failed");
                Err(err)
            }
        }
    }

    /// Drain the pending queue. Returns how many actions were performed.
    pub fn run_pending(&mut self) -> Result<usize, DomainError> {
        let mut performed = 0;
        while self.step()? {
            performed += 1;
        }
        Ok(performed)
    }

    /// Pop and invert the most recently performed action. Unwinding is only
    /// defined for the top of the completed stack.
    pub fn unwind_last(&mut self) -> Result<(), DomainError> {
        let Some(mut action) = self.completed.pop() else {
            return Err(DomainError::invariant(
                InvariantKind::UnwindOutOfOrder,
                "completed stack is empty",
            ));
        };
        debug!(kind = action.kind(), actor = action.actor(), "unwinding");
        action.unwind(&mut self.state)
    }

    /// RNG access for driver-side uses that must share the game's stream.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}

/// Full deck in canonical order: 13 ranks per suit, Stars last and only at
/// a full table.
fn full_deck(player_count: u8) -> Vec<Card> {
    let suits = Suit::for_player_count(player_count);
    let mut deck = Vec::with_capacity(suits.len() * Rank::ALL.len());
    for &suit in suits {
        for rank in Rank::ALL {
            deck.push(Card::new(rank, suit));
        }
    }
    deck
}

fn seed_from_wall_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
