use super::Action;

/// One inline button: a label and the action it triggers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub label: String,
    pub action: Action,
}

impl MenuOption {
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }

    pub fn action_tag(&self) -> &'static str {
        self.action.tag()
    }
}

/// Platform-independent bot response. Rendering is left to the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutboundReply {
    pub text: String,
    pub menu_options: Vec<MenuOption>,
}

impl OutboundReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            menu_options: Vec::new(),
        }
    }

    pub fn with_menu(mut self, options: Vec<MenuOption>) -> Self {
        self.menu_options = options;
        self
    }

    pub fn has_menu(&self) -> bool {
        !self.menu_options.is_empty()
    }
}
