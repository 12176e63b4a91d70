//! Telegram adapter

pub mod polling;
pub mod updates;
pub mod webhook;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::domain::entities::OutboundReply;
use crate::domain::traits::{Bot, BotInfo};

pub use updates::{decode_update, process_update, Incoming};

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Telegram rejects longer message texts
const MAX_MESSAGE_CHARS: usize = 4096;

/// Update kinds the bot subscribes to
pub const ALLOWED_UPDATES: [&str; 2] = ["message", "callback_query"];

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

/// Subset of `getWebhookInfo`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookInfo {
    pub url: String,
    #[serde(default)]
    pub pending_update_count: i64,
    pub last_error_date: Option<i64>,
    pub last_error_message: Option<String>,
    pub allowed_updates: Option<Vec<String>>,
}

/// Envelope every Bot API method answers with
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct InlineKeyboardButton {
    text: String,
    callback_data: String,
}

#[derive(Debug, Serialize)]
struct InlineKeyboardMarkup {
    inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// One button per row, in menu order
fn inline_keyboard(reply: &OutboundReply) -> Option<InlineKeyboardMarkup> {
    if !reply.has_menu() {
        return None;
    }
    let inline_keyboard = reply
        .menu_options
        .iter()
        .map(|option| {
            vec![InlineKeyboardButton {
                text: option.label.clone(),
                callback_data: option.action_tag().to_string(),
            }]
        })
        .collect();
    Some(InlineKeyboardMarkup { inline_keyboard })
}

/// Cut text to Telegram's limit on a character boundary
fn fit_message_text(text: &str) -> String {
    if text.chars().count() <= MAX_MESSAGE_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_MESSAGE_CHARS - 1).collect();
    cut.push('…');
    cut
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "atbash-bot".to_string(),
                username: "atbash_bot".to_string(),
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    /// POST a JSON body to a Bot API method and unwrap the result envelope
    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, BotError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.api_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let status = response.status();
        let data: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(format!("{} ({}): {}", method, status, e)))?;

        if !data.ok {
            return Err(BotError::Api(format!(
                "{} failed: {}",
                method,
                data.description.unwrap_or_else(|| status.to_string())
            )));
        }

        data.result
            .ok_or_else(|| BotError::Parse(format!("{}: missing result", method)))
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: Option<String>,
        }

        let data: BotInfoResponse = self.call("getMe", &serde_json::json!({})).await?;

        self.info = BotInfo {
            id: data.id.to_string(),
            username: data.username.unwrap_or_else(|| data.first_name.clone()),
            name: data.first_name,
        };

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: u64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest<'a> {
            offset: i64,
            timeout: u64,
            allowed_updates: &'a [&'a str],
        }

        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: &ALLOWED_UPDATES,
        };

        self.call("getUpdates", &request).await
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update]) -> Option<i64> {
        updates.iter().map(|u| u.update_id + 1).max()
    }

    /// Register `url` as the webhook for this bot
    pub async fn set_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
        drop_pending_updates: bool,
    ) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct SetWebhookRequest<'a> {
            url: &'a str,
            allowed_updates: &'a [&'a str],
            drop_pending_updates: bool,
            #[serde(skip_serializing_if = "Option::is_none")]
            secret_token: Option<&'a str>,
        }

        let request = SetWebhookRequest {
            url,
            allowed_updates: &ALLOWED_UPDATES,
            drop_pending_updates,
            secret_token,
        };

        let _: bool = self.call("setWebhook", &request).await?;
        tracing::info!("Webhook set to {}", url);
        Ok(())
    }

    /// Remove the webhook so getUpdates can be used
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<(), BotError> {
        let request = serde_json::json!({ "drop_pending_updates": drop_pending_updates });
        let _: bool = self.call("deleteWebhook", &request).await?;
        tracing::info!("Webhook deleted");
        Ok(())
    }

    pub async fn get_webhook_info(&self) -> Result<WebhookInfo, BotError> {
        self.call("getWebhookInfo", &serde_json::json!({})).await
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        let visible: String = self.token.chars().take(8).collect();
        tracing::info!("Starting Telegram bot (token: {}...)", visible);
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        self.send_reply(chat_id, &OutboundReply::new(text)).await
    }

    async fn send_reply(&self, chat_id: &str, reply: &OutboundReply) -> Result<String, BotError> {
        tracing::debug!("Sending to {}: {} ({} buttons)", chat_id, reply.text, reply.menu_options.len());

        #[derive(Serialize)]
        struct SendMessageRequest {
            chat_id: String,
            text: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            reply_markup: Option<InlineKeyboardMarkup>,
        }

        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        let request = SendMessageRequest {
            chat_id: chat_id.to_string(),
            text: fit_message_text(&reply.text),
            reply_markup: inline_keyboard(reply),
        };

        let result: MessageResult = self.call("sendMessage", &request).await?;
        Ok(result.message_id.to_string())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct AnswerRequest<'a> {
            callback_query_id: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            text: Option<&'a str>,
        }

        let request = AnswerRequest {
            callback_query_id: callback_id,
            text,
        };

        let _: bool = self.call("answerCallbackQuery", &request).await?;
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Action, MenuOption};

    #[test]
    fn test_inline_keyboard_one_button_per_row() {
        let reply = OutboundReply::new("hi").with_menu(vec![
            MenuOption::new("Fact", Action::Fact),
            MenuOption::new("Game", Action::Game),
        ]);
        let markup = inline_keyboard(&reply).unwrap();
        let json = serde_json::to_value(&markup).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "inline_keyboard": [
                    [{"text": "Fact", "callback_data": "fact"}],
                    [{"text": "Game", "callback_data": "game"}]
                ]
            })
        );
        assert!(inline_keyboard(&OutboundReply::new("plain")).is_none());
    }

    #[test]
    fn test_fit_message_text() {
        assert_eq!(fit_message_text("קצר"), "קצר");
        let long = "א".repeat(MAX_MESSAGE_CHARS + 10);
        let fitted = fit_message_text(&long);
        assert_eq!(fitted.chars().count(), MAX_MESSAGE_CHARS);
        assert!(fitted.ends_with('…'));
    }

    #[test]
    fn test_next_offset() {
        let updates: Vec<Update> = serde_json::from_value(serde_json::json!([
            {"update_id": 10},
            {"update_id": 12}
        ]))
        .unwrap();
        assert_eq!(TelegramAdapter::get_next_offset(&updates), Some(13));
        assert_eq!(TelegramAdapter::get_next_offset(&[]), None);
    }

    #[test]
    fn test_api_error_envelope() {
        let data: ApiResponse<bool> = serde_json::from_str(
            r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#,
        )
        .unwrap();
        assert!(!data.ok);
        assert_eq!(data.description.as_deref(), Some("Unauthorized"));
        assert!(data.result.is_none());
    }
}
