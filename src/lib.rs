//! # Atbash Telegram Bot
//!
//! Converts text with the reversed-alphabet (Atbash) cipher and offers a few
//! extras through inline menus: trivia, a guessing game and usage statistics.

pub mod application;
pub mod domain;
pub mod infrastructure;
