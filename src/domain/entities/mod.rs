//! Domain entities - Core business objects with no external dependencies

pub mod event;
pub mod reply;
pub mod stats;

pub use event::{Action, InboundEvent};
pub use reply::{MenuOption, OutboundReply};
pub use stats::{GuessOutcome, UserStats};
