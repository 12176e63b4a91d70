//! Random sources for trivia and game word selection

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

use crate::domain::traits::RandomSource;

/// Uniform choice from the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Deterministic source that replays a fixed list of indices in a cycle.
/// Each value is reduced modulo the requested length.
#[derive(Debug)]
pub struct SequenceRandom {
    picks: Vec<usize>,
    cursor: AtomicUsize,
}

impl SequenceRandom {
    pub fn new(picks: Vec<usize>) -> Self {
        Self {
            picks,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_index(&self, len: usize) -> usize {
        if self.picks.is_empty() || len == 0 {
            return 0;
        }
        let at = self.cursor.fetch_add(1, Ordering::Relaxed) % self.picks.len();
        self.picks[at] % len
    }
}
