//! In-memory stores for usage statistics and game state
//!
//! Both live for the lifetime of the process. Each store guards a single map
//! with a mutex, which makes every per-user read-modify-write atomic.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::entities::{GuessOutcome, UserStats};
use crate::domain::traits::{GameStore, StatsStore};

/// A panic while holding the lock can't leave a map half-updated, so a
/// poisoned lock is still safe to use.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-wide statistics store
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    stats: Mutex<HashMap<String, UserStats>>,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with at least one recorded message
    pub fn user_count(&self) -> usize {
        lock(&self.stats).len()
    }
}

impl StatsStore for MemoryStatsStore {
    fn record_message(&self, user_id: &str, text: &str) -> UserStats {
        let mut stats = lock(&self.stats);
        let entry = stats.entry(user_id.to_string()).or_default();
        entry.record(text);
        *entry
    }

    fn get_stats(&self, user_id: &str) -> Option<UserStats> {
        lock(&self.stats).get(user_id).copied()
    }
}

/// Process-wide game store
#[derive(Debug, Default)]
pub struct MemoryGameStore {
    words: Mutex<HashMap<String, String>>,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryGameStore {
    fn start_game(&self, user_id: &str, word: &str) {
        lock(&self.words).insert(user_id.to_string(), word.to_string());
    }

    fn submit_guess(&self, user_id: &str, guess: &str) -> GuessOutcome {
        let mut words = lock(&self.words);
        let outcome = match words.get(user_id) {
            None => GuessOutcome::NoActiveGame,
            Some(word) if word == guess => GuessOutcome::Correct,
            Some(_) => GuessOutcome::Incorrect,
        };
        if outcome == GuessOutcome::Correct {
            words.remove(user_id);
        }
        outcome
    }

    fn has_active_game(&self, user_id: &str) -> bool {
        lock(&self.words).contains_key(user_id)
    }
}
