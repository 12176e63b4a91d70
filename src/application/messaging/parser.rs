//! Message parser - Decodes raw platform input into inbound events

use crate::domain::entities::{Action, InboundEvent};

/// Turns message text and callback data into [`InboundEvent`]s
#[derive(Debug, Clone)]
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.command_prefix
    }

    /// Parse a text message
    pub fn parse(&self, user_id: impl Into<String>, text: impl Into<String>) -> InboundEvent {
        let text = text.into();

        if let Some(rest) = self.strip_prefix(&text) {
            return InboundEvent::command(user_id, Self::command_name(rest));
        }

        InboundEvent::text(user_id, text)
    }

    /// Parse a callback query (inline button press).
    ///
    /// Unknown tags yield `None`; they come from stale keyboards or other clients.
    pub fn parse_callback(&self, user_id: impl Into<String>, data: &str) -> Option<InboundEvent> {
        Action::from_tag(data.trim()).map(|action| InboundEvent::click(user_id, action))
    }

    fn strip_prefix<'a>(&self, text: &'a str) -> Option<&'a str> {
        if let Some(rest) = text.strip_prefix('/') {
            return Some(rest);
        }
        if self.command_prefix.is_empty() {
            return None;
        }
        text.strip_prefix(self.command_prefix.as_str())
    }

    /// First word, without a `@botname` suffix, lowercased
    fn command_name(rest: &str) -> String {
        let word = rest.split_whitespace().next().unwrap_or("");
        let name = word.split('@').next().unwrap_or(word);
        name.to_lowercase()
    }
}

impl Default for MessageParser {
    fn default() -> Self {
        Self::new("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_text_message() {
        let parser = MessageParser::default();
        assert_eq!(parser.parse("1", "שלום"), InboundEvent::text("1", "שלום"));
    }

    #[test]
    fn test_commands() {
        let parser = MessageParser::new("!");
        assert_eq!(parser.parse("1", "/start"), InboundEvent::command("1", "start"));
        assert_eq!(parser.parse("1", "/Start@atbash_bot now"), InboundEvent::command("1", "start"));
        assert_eq!(parser.parse("1", "!help"), InboundEvent::command("1", "help"));
        assert_eq!(parser.parse("1", "/"), InboundEvent::command("1", ""));
    }

    #[test]
    fn test_empty_prefix_only_slash_commands() {
        let parser = MessageParser::new("");
        assert_eq!(parser.parse("1", "hello"), InboundEvent::text("1", "hello"));
        assert_eq!(parser.parse("1", "/help"), InboundEvent::command("1", "help"));
    }

    #[test]
    fn test_callbacks() {
        let parser = MessageParser::default();
        assert_eq!(
            parser.parse_callback("5", "stats"),
            Some(InboundEvent::click("5", Action::Stats))
        );
        assert_eq!(parser.parse_callback("5", "edit_3"), None);
    }
}
