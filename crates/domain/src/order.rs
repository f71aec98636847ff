//! Orders submitted through the intake dialogue.

use chrono::{DateTime, Utc};
use common::{OrderId, UserId};
use serde::{Deserialize, Serialize};

use crate::status::OrderStatus;

/// One answered question, kept in the order the questions were asked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Stable key of the question, e.g. `objective`.
    pub key: String,

    /// Prompt text as shown when the answer was given.
    pub question: String,

    pub text: String,
}

/// Everything the client told us while filling in the order.
///
/// Written once when the dialogue completes and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub service_key: String,
    pub service_label: String,
    pub sub_service_key: Option<String>,
    pub sub_service_label: Option<String>,
    pub answers: Vec<Answer>,
}

impl OrderDetails {
    /// Detail key under which the chosen service label is exposed.
    pub const SERVICE_CATEGORY: &'static str = "service_category";

    /// Detail key under which the chosen sub-service label is exposed.
    pub const SUB_SERVICE_CATEGORY: &'static str = "sub_service_category";

    /// Looks up a detail by key: either an answer key or one of the
    /// category keys.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            Self::SERVICE_CATEGORY => Some(self.service_label.as_str()),
            Self::SUB_SERVICE_CATEGORY => self.sub_service_label.as_deref(),
            _ => self
                .answers
                .iter()
                .find(|answer| answer.key == key)
                .map(|answer| answer.text.as_str()),
        }
    }

    /// Answer keys in the order they were asked.
    pub fn answer_keys(&self) -> impl Iterator<Item = &str> {
        self.answers.iter().map(|answer| answer.key.as_str())
    }
}

/// A client's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,

    /// Owning client. Never changes.
    pub user_id: UserId,

    pub status: OrderStatus,

    /// Optional label given by an admin.
    pub name: Option<String>,

    pub details: OrderDetails,

    pub created_at: DateTime<Utc>,

    /// Position in creation order; listings sort on this.
    pub sequence: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> OrderDetails {
        OrderDetails {
            service_key: "private_investigation".to_string(),
            service_label: "Private investigation".to_string(),
            sub_service_key: None,
            sub_service_label: None,
            answers: vec![
                Answer {
                    key: "situation".to_string(),
                    question: "Describe the situation".to_string(),
                    text: "x".to_string(),
                },
                Answer {
                    key: "goal".to_string(),
                    question: "What is the goal?".to_string(),
                    text: "y".to_string(),
                },
            ],
        }
    }

    #[test]
    fn get_resolves_answers_and_categories() {
        let details = details();
        assert_eq!(details.get("situation"), Some("x"));
        assert_eq!(details.get("goal"), Some("y"));
        assert_eq!(
            details.get(OrderDetails::SERVICE_CATEGORY),
            Some("Private investigation")
        );
        assert_eq!(details.get(OrderDetails::SUB_SERVICE_CATEGORY), None);
        assert_eq!(details.get("missing"), None);
    }

    #[test]
    fn answer_keys_keep_question_order() {
        let keys: Vec<_> = details().answer_keys().map(str::to_string).collect();
        assert_eq!(keys, vec!["situation", "goal"]);
    }
}
