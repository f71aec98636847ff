//! Abstract render requests produced by the engine.

use dispatch::NotificationEvent;
use serde::Serialize;

use crate::action::Action;

/// How a reply is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    /// A chat message, optionally with an inline keyboard.
    Message,
    /// A short popup acknowledging a button press.
    Alert,
}

/// What pressing a button does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ButtonTarget {
    /// Sends the encoded action back as a button event.
    Action(String),
    /// Opens a link.
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub label: String,
    pub target: ButtonTarget,
}

impl Button {
    pub fn action(label: impl Into<String>, action: &Action) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::Action(action.encode()),
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::Url(url.into()),
        }
    }

    /// The decoded action, for action buttons.
    pub fn decoded_action(&self) -> Option<Action> {
        match &self.target {
            ButtonTarget::Action(payload) => Some(Action::decode(payload)),
            ButtonTarget::Url(_) => None,
        }
    }
}

/// One message to show to the user who sent the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub kind: ReplyKind,
    pub text: String,
    /// Ordered rows of buttons.
    pub buttons: Vec<Vec<Button>>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Message,
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn alert(text: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Alert,
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: Vec<Button>) -> Self {
        if !row.is_empty() {
            self.buttons.push(row);
        }
        self
    }

    pub fn with_button(self, button: Button) -> Self {
        self.with_row(vec![button])
    }

    /// All action buttons in display order.
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.buttons
            .iter()
            .flatten()
            .filter_map(Button::decoded_action)
    }
}

/// Result of handling one event: what to show the actor and whom else to
/// notify.
///
/// Notifications are delivered by the caller after the engine returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub replies: Vec<Reply>,
    pub notifications: Vec<NotificationEvent>,
}

impl Outcome {
    pub fn reply(reply: Reply) -> Self {
        Self {
            replies: vec![reply],
            notifications: Vec::new(),
        }
    }

    pub fn push(&mut self, reply: Reply) {
        self.replies.push(reply);
    }

    pub fn notify(&mut self, event: NotificationEvent) {
        self.notifications.push(event);
    }

    /// Text of the last reply, if any.
    pub fn last_text(&self) -> Option<&str> {
        self.replies.last().map(|reply| reply.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rows_are_skipped() {
        let reply = Reply::text("hi")
            .with_row(Vec::new())
            .with_button(Button::action("Back", &Action::Back));
        assert_eq!(reply.buttons.len(), 1);
        assert_eq!(reply.actions().collect::<Vec<_>>(), vec![Action::Back]);
    }

    #[test]
    fn url_buttons_have_no_action() {
        let reply = Reply::text("hi").with_button(Button::url("FAQ", "https://example.org"));
        assert_eq!(reply.actions().count(), 0);
    }

    #[test]
    fn serializes_with_kind_and_target() {
        let reply = Reply::alert("ok").with_button(Button::action("Menu", &Action::BackToMainMenu));
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["kind"], "alert");
        assert_eq!(json["buttons"][0][0]["target"]["type"], "action");
        assert_eq!(json["buttons"][0][0]["target"]["value"], "backToMainMenu");
    }
}
