use std::fmt;
use std::str::FromStr;

/// Button actions offered in the bot's menus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Fact,
    Game,
    Stats,
    Explain,
    Convert,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Fact,
        Action::Game,
        Action::Stats,
        Action::Explain,
        Action::Convert,
    ];

    /// Wire tag used as inline-button callback data
    pub fn tag(&self) -> &'static str {
        match self {
            Action::Fact => "fact",
            Action::Game => "game",
            Action::Stats => "stats",
            Action::Explain => "explain",
            Action::Convert => "convert",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.tag() == tag)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unknown action tag: {}", s))
    }
}

/// A decoded, platform-independent user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    TextMessage { user_id: String, text: String },
    ButtonClick { user_id: String, action: Action },
    Command { user_id: String, name: String },
}

impl InboundEvent {
    pub fn text(user_id: impl Into<String>, text: impl Into<String>) -> Self {
        InboundEvent::TextMessage {
            user_id: user_id.into(),
            text: text.into(),
        }
    }

    pub fn click(user_id: impl Into<String>, action: Action) -> Self {
        InboundEvent::ButtonClick {
            user_id: user_id.into(),
            action,
        }
    }

    pub fn command(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        InboundEvent::Command {
            user_id: user_id.into(),
            name: name.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            InboundEvent::TextMessage { user_id, .. }
            | InboundEvent::ButtonClick { user_id, .. }
            | InboundEvent::Command { user_id, .. } => user_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::TextMessage { .. } => "text",
            InboundEvent::ButtonClick { .. } => "callback",
            InboundEvent::Command { .. } => "command",
        }
    }
}
