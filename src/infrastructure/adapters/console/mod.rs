//! Console adapter for development/testing
//!
//! Each stdin line becomes one event: `:tag` presses a menu button, a prefixed
//! line is a command, anything else is a text message.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::errors::BotError;
use crate::application::messaging::{Dispatcher, MessageParser};
use crate::domain::entities::{InboundEvent, OutboundReply};
use crate::domain::traits::{Bot, BotInfo};

/// User id of the single console user
pub const CONSOLE_USER: &str = "console";

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "atbash-bot".to_string(),
                username: "console".to_string(),
            },
        }
    }

    /// Decode one input line; `Err` carries a hint for an unknown button tag
    pub fn parse_line(parser: &MessageParser, line: &str) -> Result<InboundEvent, String> {
        match line.strip_prefix(':') {
            Some(tag) => parser
                .parse_callback(CONSOLE_USER, tag)
                .ok_or_else(|| format!("Unknown button: {}", tag.trim())),
            None => Ok(parser.parse(CONSOLE_USER, line)),
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain-text rendering of a reply with its menu as `:tag` hints
pub fn render_reply(reply: &OutboundReply) -> String {
    let mut out = format!("[BOT] {}", reply.text);
    for option in &reply.menu_options {
        out.push_str(&format!("\n  [:{}] {}", option.action_tag(), option.label));
    }
    out
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok("console_msg".to_string())
    }

    async fn send_reply(&self, _chat_id: &str, reply: &OutboundReply) -> Result<String, BotError> {
        println!("{}", render_reply(reply));
        Ok("console_msg".to_string())
    }

    async fn answer_callback(&self, _callback_id: &str, _text: Option<&str>) -> Result<(), BotError> {
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

/// Read stdin until EOF, replying to each line
pub async fn run_console(
    bot: &ConsoleAdapter,
    dispatcher: &Dispatcher,
    parser: &MessageParser,
) -> Result<(), BotError> {
    bot.start().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| BotError::Internal(format!("Failed to read stdin: {}", e)))?
    {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }

        match ConsoleAdapter::parse_line(parser, line) {
            Ok(event) => {
                let reply = dispatcher.handle_event(&event);
                bot.send_reply(CONSOLE_USER, &reply).await?;
            }
            Err(hint) => {
                bot.send_message(CONSOLE_USER, &hint).await?;
            }
        }
    }

    tracing::info!("Console input closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Action, MenuOption};

    #[test]
    fn test_parse_line() {
        let parser = MessageParser::default();
        assert_eq!(
            ConsoleAdapter::parse_line(&parser, ":fact"),
            Ok(InboundEvent::click(CONSOLE_USER, Action::Fact))
        );
        assert_eq!(
            ConsoleAdapter::parse_line(&parser, "/start"),
            Ok(InboundEvent::command(CONSOLE_USER, "start"))
        );
        assert_eq!(
            ConsoleAdapter::parse_line(&parser, "אבג"),
            Ok(InboundEvent::text(CONSOLE_USER, "אבג"))
        );
        assert!(ConsoleAdapter::parse_line(&parser, ":bogus").is_err());
    }

    #[test]
    fn test_render_reply() {
        let reply = OutboundReply::new("hello").with_menu(vec![MenuOption::new("Stats", Action::Stats)]);
        assert_eq!(render_reply(&reply), "[BOT] hello\n  [:stats] Stats");
    }
}
