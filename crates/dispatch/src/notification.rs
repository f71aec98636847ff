//! Notification events produced by the conversation engine.

use common::{OrderId, UserId};
use domain::Answer;
use serde::Serialize;

/// A user as named in a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Party {
    pub id: UserId,
    pub display_name: Option<String>,
}

impl Party {
    pub fn mention(&self) -> String {
        match &self.display_name {
            Some(name) => format!("@{name} (ID: {})", self.id),
            None => format!("ID: {}", self.id),
        }
    }
}

/// Something that happened and that someone other than the actor should
/// learn about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// A client submitted a new order.
    OrderCreated {
        order_id: OrderId,
        client: Party,
        service_label: String,
        sub_service_label: Option<String>,
        answers: Vec<Answer>,
    },

    /// An admin changed the status of an order.
    StatusChanged {
        order_id: OrderId,
        client_id: UserId,
        status_label: String,
    },

    /// An admin renamed an order.
    NameChanged {
        order_id: OrderId,
        client_id: UserId,
        name: String,
    },

    /// A user registered through someone's referral link.
    NewReferral { referrer_id: UserId, referral: Party },
}

impl NotificationEvent {
    /// Returns the event kind as a string.
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationEvent::OrderCreated { .. } => "order_created",
            NotificationEvent::StatusChanged { .. } => "status_changed",
            NotificationEvent::NameChanged { .. } => "name_changed",
            NotificationEvent::NewReferral { .. } => "new_referral",
        }
    }
}

/// Who receives a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Recipient {
    Owner(UserId),
    Group(i64),
    Client(UserId),
    Referrer(UserId),
}

impl Recipient {
    /// Chat the message is delivered to.
    ///
    /// Private chats share their id with the user.
    pub fn chat_id(&self) -> i64 {
        match self {
            Recipient::Owner(id) | Recipient::Client(id) | Recipient::Referrer(id) => id.get(),
            Recipient::Group(chat) => *chat,
        }
    }
}
