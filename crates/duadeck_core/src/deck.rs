//! Card deck navigation.
//!
//! The deck keeps the loaded entries in three places:
//! - `source`: the list exactly as loaded, never mutated
//! - `active`: a shuffled working list of cards not yet swiped away
//! - `history`: swiped cards with the position they were removed from
//!
//! Swiping removes the card under the cursor from `active`; going back puts
//! the most recently swiped card back where it came from. The two are exact
//! inverses, so every entry of `source` lives in exactly one of `active` or
//! `history` at all times.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::entry::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckStatus {
    /// A card is under the cursor.
    LoadedWithCards,
    /// Every card has been swiped away.
    Exhausted,
    /// The loaded list itself was empty. Reset cannot leave this state.
    EmptySource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwipedEntry {
    pub entry: Entry,
    pub position: usize,
}

/// The navigable part of a deck, for comparing states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckSnapshot {
    pub active: Vec<Entry>,
    pub history: Vec<SwipedEntry>,
    pub cursor: usize,
}

#[derive(Debug, Clone)]
pub struct Deck<R = StdRng> {
    source: Vec<Entry>,
    active: Vec<Entry>,
    history: Vec<SwipedEntry>,
    cursor: usize,
    rng: R,
}

impl Deck<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Deck<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Deck<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            source: Vec::new(),
            active: Vec::new(),
            history: Vec::new(),
            cursor: 0,
            rng,
        }
    }

    /// Replace the deck contents with a fresh shuffle of `entries`.
    pub fn load(&mut self, entries: Vec<Entry>) {
        self.source = entries;
        self.reset();
    }

    /// Reshuffle the loaded entries and start over. Nothing is refetched.
    pub fn reset(&mut self) {
        let mut active = self.source.clone();
        shuffle(&mut active, &mut self.rng);
        self.active = active;
        self.history.clear();
        self.cursor = 0;
    }

    pub fn current(&self) -> Option<&Entry> {
        self.active.get(self.cursor)
    }

    /// Swipe the current card away. Returns `false` (and changes nothing)
    /// when there is no current card.
    pub fn advance(&mut self) -> bool {
        if self.cursor >= self.active.len() {
            return false;
        }
        let entry = self.active.remove(self.cursor);
        self.history.push(SwipedEntry {
            entry,
            position: self.cursor,
        });
        self.cursor = if self.active.is_empty() {
            0
        } else {
            self.cursor.min(self.active.len() - 1)
        };
        true
    }

    /// Undo the most recent swipe. Returns `false` when there is nothing to undo.
    pub fn retreat(&mut self) -> bool {
        let Some(SwipedEntry { entry, position }) = self.history.pop() else {
            return false;
        };
        let position = position.min(self.active.len());
        self.active.insert(position, entry);
        self.cursor = position;
        true
    }

    pub fn status(&self) -> DeckStatus {
        if self.source.is_empty() {
            DeckStatus::EmptySource
        } else if self.cursor < self.active.len() {
            DeckStatus::LoadedWithCards
        } else {
            DeckStatus::Exhausted
        }
    }

    pub fn can_advance(&self) -> bool {
        self.cursor < self.active.len()
    }

    pub fn can_retreat(&self) -> bool {
        !self.history.is_empty()
    }

    /// 1-based position of the current card among all loaded entries.
    pub fn position(&self) -> usize {
        let total = self.total();
        if self.active.is_empty() {
            return total;
        }
        ((total - self.active.len()) + self.cursor + 1).min(total)
    }

    pub fn total(&self) -> usize {
        self.source.len()
    }

    pub fn source(&self) -> &[Entry] {
        &self.source
    }

    pub fn active(&self) -> &[Entry] {
        &self.active
    }

    pub fn history(&self) -> &[SwipedEntry] {
        &self.history
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn snapshot(&self) -> DeckSnapshot {
        DeckSnapshot {
            active: self.active.clone(),
            history: self.history.clone(),
            cursor: self.cursor,
        }
    }
}

/// Unbiased in-place Fisher–Yates shuffle.
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
