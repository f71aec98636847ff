//! Per-user dialogue state.

use common::OrderId;
use domain::{Answer, BranchKey, OrderStatus};

/// Where a user is in a dialogue.
///
/// Intake flow:
/// ```text
/// Idle ──► ChoosingService ──┬──► ChoosingSubService ──┐
///                            └─────────────────────────┴──► AnsweringQuestions(i) ──► Idle
/// ```
/// Admin flow:
/// ```text
/// SelectingOrder ──► ViewingOrder ──┬──► ChangingStatus ──► ViewingOrder
///                                   └──► SettingName ────► ViewingOrder
/// ```
/// Cancelling from any state returns to `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogueState {
    #[default]
    Idle,
    ChoosingService,
    ChoosingSubService {
        service: String,
    },
    AnsweringQuestions {
        branch: BranchKey,
        index: usize,
    },
    /// Owner is asked for the id of the user to promote.
    AwaitingGrantTarget,
    /// An admin order list is shown; typed text selects from it.
    SelectingOrder,
    ViewingOrder {
        order_id: OrderId,
    },
    ChangingStatus {
        order_id: OrderId,
    },
    SettingName {
        order_id: OrderId,
    },
}

impl DialogueState {
    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogueState::Idle => "Idle",
            DialogueState::ChoosingService => "ChoosingService",
            DialogueState::ChoosingSubService { .. } => "ChoosingSubService",
            DialogueState::AnsweringQuestions { .. } => "AnsweringQuestions",
            DialogueState::AwaitingGrantTarget => "AwaitingGrantTarget",
            DialogueState::SelectingOrder => "SelectingOrder",
            DialogueState::ViewingOrder { .. } => "ViewingOrder",
            DialogueState::ChangingStatus { .. } => "ChangingStatus",
            DialogueState::SettingName { .. } => "SettingName",
        }
    }

    /// The order an admin dialogue is focused on, if any.
    pub fn focused_order(&self) -> Option<&OrderId> {
        match self {
            DialogueState::ViewingOrder { order_id }
            | DialogueState::ChangingStatus { order_id }
            | DialogueState::SettingName { order_id } => Some(order_id),
            _ => None,
        }
    }
}

impl std::fmt::Display for DialogueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Filter and page of the admin order list last shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderListing {
    pub filter: Option<OrderStatus>,
    pub page: usize,
}

impl Default for OrderListing {
    fn default() -> Self {
        Self {
            filter: None,
            page: 1,
        }
    }
}

/// Ephemeral per-user session, owned by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationSession {
    pub state: DialogueState,

    /// Answers collected so far in the current intake, in question order.
    pub answers: Vec<Answer>,

    pub listing: OrderListing,
}

impl ConversationSession {
    pub fn is_idle(&self) -> bool {
        self.state == DialogueState::Idle
    }

    /// Drops all dialogue data and returns to `Idle`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Moves to `state`, keeping collected data.
    pub fn transition(&mut self, state: DialogueState) {
        tracing::debug!(from = %self.state, to = %state, "dialogue transition");
        self.state = state;
    }
}
