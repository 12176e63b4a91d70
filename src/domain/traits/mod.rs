//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod random;
pub mod store;

pub use bot::{Bot, BotInfo};
pub use random::{choose, RandomSource};
pub use store::{GameStore, StatsStore};
