//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Cipher error: {0}")]
    Cipher(#[from] CipherError),

    #[error("Telegram API error: {0}")]
    Api(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Cipher table construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("Invalid alphabet: symbol '{symbol}' appears at positions {first} and {second}")]
    InvalidAlphabet {
        symbol: char,
        first: usize,
        second: usize,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
