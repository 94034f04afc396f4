//! Generic shuffle/draw container shared by the card deck and the luminary
//! deck.
//!
//! Draw and shuffle operations are mutually exclusive via an interior lock,
//! tolerating concurrent external readers of remaining-card counts. No other
//! concurrency guarantee is provided; the engine itself is single-writer.

use std::collections::VecDeque;
use std::fmt;

use parking_lot::Mutex;
use rand::Rng;

use crate::errors::domain::{DomainError, StructuralKind};

pub struct Deck<T> {
    items: Mutex<VecDeque<T>>,
}

impl<T> Deck<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Mutex::new(items.into()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Uniform in-place permutation (Fisher–Yates). The multiset of items is
    /// unchanged for any RNG.
    pub fn shuffle<R: Rng>(&self, rng: &mut R) {
        let mut items = self.items.lock();
        let slice = items.make_contiguous();
        for i in (1..slice.len()).rev() {
            let j = rng.random_range(0..=i);
            slice.swap(i, j);
        }
    }

    /// Removes and returns up to `n` items from the front. Returns fewer
    /// than `n` only if the deck holds fewer; never errors; `n = 0` is a
    /// no-op.
    pub fn draw_up_to(&self, n: usize) -> Vec<T> {
        let mut items = self.items.lock();
        let take = n.min(items.len());
        items.drain(..take).collect()
    }

    /// Re-inserts previously drawn items at the front so the deck reads
    /// exactly as it did before the draw. `drawn` must be in draw order.
    pub fn put_back_front(&self, drawn: Vec<T>) {
        let mut items = self.items.lock();
        for item in drawn.into_iter().rev() {
            items.push_front(item);
        }
    }

    /// Re-inserts a single item at an explicit position (inverse of
    /// `draw_specific`).
    pub fn insert_at(&self, position: usize, item: T) {
        let mut items = self.items.lock();
        let position = position.min(items.len());
        items.insert(position, item);
    }
}

impl<T: PartialEq + fmt::Debug> Deck<T> {
    /// Removes and returns the first item equal to `target`, with its
    /// position for exact reinsertion on unwind. A miss is state corruption,
    /// not a rules violation.
    pub fn draw_specific(&self, target: &T) -> Result<(usize, T), DomainError> {
        let mut items = self.items.lock();
        let position = items.iter().position(|item| item == target).ok_or_else(|| {
            DomainError::structural(
                StructuralKind::CardNotFound,
                format!("{target:?} is not in the deck"),
            )
        })?;
        let item = items.remove(position).expect("position is in range");
        Ok((position, item))
    }
}

impl<T: Clone> Deck<T> {
    /// Copy of the backing list, front first.
    pub fn snapshot(&self) -> Vec<T> {
        self.items.lock().iter().cloned().collect()
    }
}

impl<T: Clone> Clone for Deck<T> {
    fn clone(&self) -> Self {
        Self {
            items: Mutex::new(self.items.lock().clone()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Deck<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self.items.lock();
        f.debug_struct("Deck").field("items", &*items).finish()
    }
}

impl<T: PartialEq> PartialEq for Deck<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.items.lock() == *other.items.lock()
    }
}
