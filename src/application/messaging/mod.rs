//! Message handling - decoding and routing inbound events

pub mod dispatcher;
pub mod parser;

pub use dispatcher::Dispatcher;
pub use parser::MessageParser;
