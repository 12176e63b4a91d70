//! Message dispatcher - Routes inbound events to handlers

use std::sync::Arc;

use crate::application::content;
use crate::domain::cipher::{fold_final_letters, transform, CipherTable};
use crate::domain::entities::{Action, GuessOutcome, InboundEvent, OutboundReply};
use crate::domain::traits::{choose, GameStore, RandomSource, StatsStore};

/// Produces the text used for the date line of the stats reply
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

/// Stateless router: all state lives in the stores it is handed.
pub struct Dispatcher {
    table: CipherTable,
    fold_final_letters: bool,
    stats: Arc<dyn StatsStore>,
    games: Arc<dyn GameStore>,
    random: Arc<dyn RandomSource>,
    clock: Clock,
}

impl Dispatcher {
    pub fn new(
        table: CipherTable,
        stats: Arc<dyn StatsStore>,
        games: Arc<dyn GameStore>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            table,
            fold_final_letters: false,
            stats,
            games,
            random,
            clock: Arc::new(|| chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()),
        }
    }

    /// Fold Hebrew final letters to regular forms before converting
    pub fn with_final_letter_folding(mut self, enabled: bool) -> Self {
        self.fold_final_letters = enabled;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn table(&self) -> &CipherTable {
        &self.table
    }

    /// Apply the cipher the way replies do, honoring final-letter folding
    pub fn convert(&self, text: &str) -> String {
        if self.fold_final_letters {
            transform(&self.table, &fold_final_letters(text))
        } else {
            transform(&self.table, text)
        }
    }

    /// Single entry point for transport adapters
    pub fn handle_event(&self, event: &InboundEvent) -> OutboundReply {
        tracing::debug!(user_id = %event.user_id(), kind = event.kind(), "Dispatching event");

        match event {
            InboundEvent::TextMessage { user_id, text } => self.handle_text(user_id, text),
            InboundEvent::ButtonClick { user_id, action } => self.handle_action(user_id, *action),
            InboundEvent::Command { user_id, name } => self.handle_command(user_id, name),
        }
    }

    fn handle_text(&self, user_id: &str, text: &str) -> OutboundReply {
        // An active game takes precedence over conversion. The store compares
        // and clears atomically, so there's no separate "is active" check.
        match self.games.submit_guess(user_id, text) {
            GuessOutcome::Correct => {
                tracing::info!(user_id = %user_id, "Game won");
                OutboundReply::new(content::GUESS_CORRECT).with_menu(content::main_menu())
            }
            GuessOutcome::Incorrect => {
                tracing::debug!(user_id = %user_id, "Wrong guess");
                OutboundReply::new(content::GUESS_INCORRECT).with_menu(content::main_menu())
            }
            GuessOutcome::NoActiveGame => {
                let stats = self.stats.record_message(user_id, text);
                tracing::debug!(
                    user_id = %user_id,
                    messages = stats.message_count,
                    chars = stats.character_count,
                    "Converting text"
                );
                let converted = self.convert(text);
                OutboundReply::new(content::conversion(&converted))
                    .with_menu(content::conversion_menu())
            }
        }
    }

    fn handle_action(&self, user_id: &str, action: Action) -> OutboundReply {
        match action {
            Action::Fact => {
                let fact = choose(self.random.as_ref(), &content::FUN_FACTS)
                    .copied()
                    .unwrap_or_default();
                OutboundReply::new(content::fact(fact)).with_menu(content::main_menu())
            }
            Action::Game => {
                let word = choose(self.random.as_ref(), &content::GAME_WORDS)
                    .copied()
                    .unwrap_or_default();
                self.games.start_game(user_id, word);
                tracing::info!(user_id = %user_id, "Game started");
                OutboundReply::new(content::puzzle(&self.convert(word)))
                    .with_menu(content::main_menu())
            }
            Action::Stats => match self.stats.get_stats(user_id) {
                Some(stats) => OutboundReply::new(content::stats(&stats, &(self.clock)()))
                    .with_menu(content::main_menu()),
                None => OutboundReply::new(content::NO_STATS).with_menu(content::main_menu()),
            },
            Action::Explain => OutboundReply::new(content::EXPLAIN).with_menu(content::main_menu()),
            Action::Convert => OutboundReply::new(content::CONVERT_PROMPT),
        }
    }

    fn handle_command(&self, user_id: &str, name: &str) -> OutboundReply {
        match name {
            "start" => OutboundReply::new(content::WELCOME).with_menu(content::main_menu()),
            "help" => OutboundReply::new(content::HELP).with_menu(content::main_menu()),
            other => {
                tracing::debug!(user_id = %user_id, command = %other, "Unknown command");
                OutboundReply::new(content::unknown_command(other)).with_menu(content::main_menu())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cipher::build_table;
    use crate::infrastructure::random::SequenceRandom;
    use crate::infrastructure::storage::{MemoryGameStore, MemoryStatsStore};

    fn dispatcher(picks: Vec<usize>) -> (Dispatcher, Arc<MemoryStatsStore>, Arc<MemoryGameStore>) {
        let stats = Arc::new(MemoryStatsStore::new());
        let games = Arc::new(MemoryGameStore::new());
        let dispatcher = Dispatcher::new(
            CipherTable::hebrew(),
            stats.clone(),
            games.clone(),
            Arc::new(SequenceRandom::new(picks)),
        )
        .with_clock(Arc::new(|| "2024-05-01 12:00".to_string()));
        (dispatcher, stats, games)
    }

    #[test]
    fn test_text_is_converted_and_counted() {
        let (d, stats, _) = dispatcher(vec![0]);
        let reply = d.handle_event(&InboundEvent::text("u1", "אבג!"));

        assert!(reply.text.contains("תשר!"));
        assert_eq!(reply.menu_options, content::conversion_menu());
        let recorded = stats.get_stats("u1").unwrap();
        assert_eq!(recorded.message_count, 1);
        assert_eq!(recorded.character_count, 4);
    }

    #[test]
    fn test_game_flow() {
        // index 0 -> "שלום"
        let (d, stats, games) = dispatcher(vec![0]);

        let puzzle = d.handle_event(&InboundEvent::click("u1", Action::Game));
        assert!(puzzle.text.contains(&transform(&CipherTable::hebrew(), "שלום")));
        assert!(games.has_active_game("u1"));

        let wrong = d.handle_event(&InboundEvent::text("u1", "תודה"));
        assert_eq!(wrong.text, content::GUESS_INCORRECT);
        assert!(games.has_active_game("u1"));

        let right = d.handle_event(&InboundEvent::text("u1", "שלום"));
        assert_eq!(right.text, content::GUESS_CORRECT);
        assert!(!games.has_active_game("u1"));

        // Guesses are not counted as conversions
        assert_eq!(stats.get_stats("u1"), None);

        // Game over, text converts again
        let converted = d.handle_event(&InboundEvent::text("u1", "שלום"));
        assert!(converted.text.starts_with("הטקסט באתבש"));
    }

    #[test]
    fn test_games_are_per_user() {
        let (d, _, games) = dispatcher(vec![1]);
        d.handle_event(&InboundEvent::click("u1", Action::Game));
        assert!(games.has_active_game("u1"));

        let reply = d.handle_event(&InboundEvent::text("u2", "תודה"));
        assert!(reply.text.starts_with("הטקסט באתבש"));
    }

    #[test]
    fn test_fact_uses_random_source() {
        let (d, _, _) = dispatcher(vec![2]);
        let reply = d.handle_event(&InboundEvent::click("u1", Action::Fact));
        assert_eq!(reply.text, content::fact(content::FUN_FACTS[2]));
    }

    #[test]
    fn test_stats_reply() {
        let (d, _, _) = dispatcher(vec![0]);
        let empty = d.handle_event(&InboundEvent::click("u1", Action::Stats));
        assert_eq!(empty.text, content::NO_STATS);

        d.handle_event(&InboundEvent::text("u1", "abc"));
        d.handle_event(&InboundEvent::text("u1", "שלום"));
        let reply = d.handle_event(&InboundEvent::click("u1", Action::Stats));
        assert!(reply.text.contains("מספר הודעות: 2"));
        assert!(reply.text.contains("מספר תווים: 7"));
        assert!(reply.text.contains("2024-05-01 12:00"));
    }

    #[test]
    fn test_static_actions() {
        let (d, _, _) = dispatcher(vec![0]);
        let explain = d.handle_event(&InboundEvent::click("u1", Action::Explain));
        assert_eq!(explain.text, content::EXPLAIN);

        let convert = d.handle_event(&InboundEvent::click("u1", Action::Convert));
        assert_eq!(convert.text, content::CONVERT_PROMPT);
        assert!(!convert.has_menu());
    }

    #[test]
    fn test_commands_do_not_touch_state() {
        let (d, stats, games) = dispatcher(vec![0]);
        let start = d.handle_event(&InboundEvent::command("u1", "start"));
        assert_eq!(start.text, content::WELCOME);
        assert_eq!(start.menu_options, content::main_menu());

        let unknown = d.handle_event(&InboundEvent::command("u1", "nope"));
        assert!(unknown.text.contains("/nope"));

        assert_eq!(stats.get_stats("u1"), None);
        assert!(!games.has_active_game("u1"));
    }

    #[test]
    fn test_final_letter_folding() {
        let (d, _, _) = dispatcher(vec![0]);
        let plain = d.with_final_letter_folding(true);
        assert_eq!(plain.convert("ששך"), "בבל");

        let table = build_table("ABCD".chars()).unwrap();
        let abcd = Dispatcher::new(
            table,
            Arc::new(MemoryStatsStore::new()),
            Arc::new(MemoryGameStore::new()),
            Arc::new(SequenceRandom::new(vec![0])),
        );
        assert_eq!(abcd.convert("ABCD!"), "DCBA!");
    }
}
