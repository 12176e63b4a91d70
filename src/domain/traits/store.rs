use crate::domain::entities::{GuessOutcome, UserStats};

/// Per-user usage statistics.
///
/// Implementations must make each per-user read-modify-write atomic; the
/// dispatcher may be called from several tasks at once.
pub trait StatsStore: Send + Sync {
    /// Count one message for `user_id`, creating a zeroed record first if needed.
    /// Returns the record after the update.
    fn record_message(&self, user_id: &str, text: &str) -> UserStats;

    /// Current record, or `None` if the user never sent a message.
    fn get_stats(&self, user_id: &str) -> Option<UserStats>;
}

/// Active secret words for the guessing game.
pub trait GameStore: Send + Sync {
    /// Store `word` as the user's secret, replacing any previous one.
    fn start_game(&self, user_id: &str, word: &str);

    /// Compare `guess` with the secret. A correct guess clears the game.
    fn submit_guess(&self, user_id: &str, guess: &str) -> GuessOutcome;

    fn has_active_game(&self, user_id: &str) -> bool;
}
