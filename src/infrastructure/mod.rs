//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: In-memory stats and game state
//! - Random: Random sources for facts and game words
//! - Adapters: Platform integrations (Telegram, console)

pub mod adapters;
pub mod config;
pub mod random;
pub mod storage;
