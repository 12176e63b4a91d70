//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;
use crate::domain::cipher::{build_table, CipherTable, HEBREW_ALPHABET};

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub cipher: CipherConfig,
    pub telegram: TelegramConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CipherConfig {
    /// Ordered symbols; position i maps to position N-1-i
    pub alphabet: String,
    pub fold_final_letters: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    /// Public base URL; webhook mode when set, long polling otherwise
    pub webhook_url: Option<String>,
    pub secret_token: Option<String>,
    pub poll_timeout_seconds: u64,
    pub drop_pending_updates: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub webhook_path: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "atbash-bot".to_string(),
            prefix: "/".to_string(),
        }
    }
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            alphabet: HEBREW_ALPHABET.to_string(),
            fold_final_letters: false,
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            webhook_url: None,
            secret_token: None,
            poll_timeout_seconds: 30,
            drop_pending_updates: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            webhook_path: "/telegram".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty("TELEGRAM_BOT_TOKEN") {
            self.telegram.token = Some(token);
        }

        if let Some(url) = non_empty("WEBHOOK_URL") {
            self.telegram.webhook_url = Some(url);
        }

        if let Some(secret) = non_empty("WEBHOOK_SECRET") {
            self.telegram.secret_token = Some(secret);
        }

        if let Some(port) = non_empty("PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
            }
        }

        if let Some(prefix) = non_empty("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }
    }

    /// Build the cipher table from the configured alphabet
    pub fn cipher_table(&self) -> Result<CipherTable, ConfigError> {
        build_table(self.cipher.alphabet.chars())
            .map_err(|e| ConfigError::InvalidValue(format!("cipher.alphabet: {}", e)))
    }

    /// Token for Telegram modes
    pub fn token(&self) -> Result<&str, ConfigError> {
        self.telegram
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingField("telegram.token (or TELEGRAM_BOT_TOKEN)".to_string()))
    }

    /// Full webhook URL registered with Telegram
    pub fn webhook_endpoint(&self) -> Option<String> {
        self.telegram.webhook_url.as_ref().map(|base| {
            format!(
                "{}{}",
                base.trim_end_matches('/'),
                self.normalized_webhook_path()
            )
        })
    }

    /// Webhook route with exactly one leading slash
    pub fn normalized_webhook_path(&self) -> String {
        format!("/{}", self.server.webhook_path.trim_start_matches('/'))
    }

    /// Check everything a Telegram run depends on
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.token()?;
        self.cipher_table()?;
        if self.normalized_webhook_path() == "/health" {
            return Err(ConfigError::InvalidValue(
                "server.webhook-path can't be /health".to_string(),
            ));
        }
        Ok(())
    }
}
