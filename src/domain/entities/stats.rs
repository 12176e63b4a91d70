/// Per-user usage counters. Only ever incremented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserStats {
    pub message_count: u64,
    pub character_count: u64,
}

impl UserStats {
    /// Count one message of `text`, measured in characters rather than bytes.
    pub fn record(&mut self, text: &str) {
        self.message_count += 1;
        self.character_count += text.chars().count() as u64;
    }
}

/// Result of a guess in the word game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    Incorrect,
    NoActiveGame,
}
