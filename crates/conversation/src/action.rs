//! Decoding of inbound events into typed inputs.
//!
//! Raw button payloads and command texts are converted here, once, into
//! closed enums. Anything that does not decode becomes
//! [`Action::Unrecognized`] or [`Command::Unknown`], which the engine
//! answers with a harmless acknowledgement.

use common::{OrderId, UserId};
use domain::OrderStatus;
use serde::{Deserialize, Serialize};

/// Kind of an inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A typed message.
    Text,
    /// A press on an inline button; the payload is the button's action.
    Button,
}

/// An event as delivered by the chat transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub source_user_id: UserId,
    pub kind: EventKind,
    pub payload: String,
    #[serde(default)]
    pub sender_display_name: Option<String>,
}

impl InboundEvent {
    pub fn text(user: UserId, text: impl Into<String>) -> Self {
        Self {
            source_user_id: user,
            kind: EventKind::Text,
            payload: text.into(),
            sender_display_name: None,
        }
    }

    pub fn button(user: UserId, action: &Action) -> Self {
        Self {
            source_user_id: user,
            kind: EventKind::Button,
            payload: action.encode(),
            sender_display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.sender_display_name = Some(name.into());
        self
    }

    /// Decodes the payload.
    pub fn input(&self) -> Input {
        match self.kind {
            EventKind::Button => Input::Button(Action::decode(&self.payload)),
            EventKind::Text => match Command::parse(&self.payload) {
                Some(command) => Input::Command(command),
                None => Input::Text(self.payload.trim().to_string()),
            },
        }
    }
}

/// A decoded inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Text(String),
    Button(Action),
}

/// Slash commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start [deep-link token]`
    Start(Option<String>),
    Menu,
    Task,
    Cases,
    Referral,
    Admin,
    Cancel,
    /// `/grant_admin [user id]`
    GrantAdmin(Option<String>),
    Unknown(String),
}

impl Command {
    /// Parses `/name[@bot] [args]`; returns `None` for ordinary text.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let rest = text.strip_prefix('/')?;
        let (head, args) = match rest.split_once(char::is_whitespace) {
            Some((head, args)) => (head, Some(args.trim()).filter(|a| !a.is_empty())),
            None => (rest, None),
        };
        let name = head.split('@').next().unwrap_or(head);
        let arg = || args.map(str::to_string);

        Some(match name {
            "start" => Command::Start(arg()),
            "menu" => Command::Menu,
            "task" => Command::Task,
            "cases" => Command::Cases,
            "referral" => Command::Referral,
            "admin" => Command::Admin,
            "cancel" => Command::Cancel,
            "grant_admin" => Command::GrantAdmin(arg()),
            other => Command::Unknown(other.to_string()),
        })
    }
}

/// Button actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectService(String),
    SelectSubService(String),
    /// `None` shows all statuses.
    AdminFilter(Option<OrderStatus>),
    AdminOrdersPage(usize),
    ViewOrderAdmin(OrderId),
    ManageStatus(OrderId),
    SetStatus(OrderId, OrderStatus),
    ManageName(OrderId),
    OrdersPage(usize),
    ReferralPage(usize),
    Back,
    BackToMainMenu,
    MenuAdmin,
    MenuCreateTask,
    MenuMyCases,
    MenuReferral,
    AdminListUsers,
    AdminAllOrders,
    AdminGrant,
    FsmCancel,
    Unrecognized(String),
}

const FILTER_ALL: &str = "all";

fn parse_page(s: &str) -> Option<usize> {
    s.parse::<usize>().ok().filter(|n| *n >= 1)
}

impl Action {
    /// Encodes the action as a button payload.
    pub fn encode(&self) -> String {
        match self {
            Action::SelectService(key) => format!("svc_{key}"),
            Action::SelectSubService(key) => format!("sub_{key}"),
            Action::AdminFilter(None) => format!("adminFilter_{FILTER_ALL}"),
            Action::AdminFilter(Some(status)) => format!("adminFilter_{status}"),
            Action::AdminOrdersPage(n) => format!("adminOrdersPage_{n}"),
            Action::ViewOrderAdmin(id) => format!("viewOrderAdmin_{id}"),
            Action::ManageStatus(id) => format!("manageStatus_{id}"),
            Action::SetStatus(id, status) => format!("setStatus_{id}_{status}"),
            Action::ManageName(id) => format!("manageName_{id}"),
            Action::OrdersPage(n) => format!("ordersPage_{n}"),
            Action::ReferralPage(n) => format!("refPage_{n}"),
            Action::Back => "back".to_string(),
            Action::BackToMainMenu => "backToMainMenu".to_string(),
            Action::MenuAdmin => "menuAdmin".to_string(),
            Action::MenuCreateTask => "menuCreateTask".to_string(),
            Action::MenuMyCases => "menuMyCases".to_string(),
            Action::MenuReferral => "menuReferral".to_string(),
            Action::AdminListUsers => "adminListUsers".to_string(),
            Action::AdminAllOrders => "adminAllOrders".to_string(),
            Action::AdminGrant => "adminGrant".to_string(),
            Action::FsmCancel => "fsmCancel".to_string(),
            Action::Unrecognized(raw) => raw.clone(),
        }
    }

    /// Decodes a button payload. Never fails.
    pub fn decode(payload: &str) -> Self {
        Self::try_decode(payload).unwrap_or_else(|| Action::Unrecognized(payload.to_string()))
    }

    fn try_decode(payload: &str) -> Option<Self> {
        let fixed = match payload {
            "back" => Some(Action::Back),
            "backToMainMenu" => Some(Action::BackToMainMenu),
            "menuAdmin" => Some(Action::MenuAdmin),
            "menuCreateTask" => Some(Action::MenuCreateTask),
            "menuMyCases" => Some(Action::MenuMyCases),
            "menuReferral" => Some(Action::MenuReferral),
            "adminListUsers" => Some(Action::AdminListUsers),
            "adminAllOrders" => Some(Action::AdminAllOrders),
            "adminGrant" => Some(Action::AdminGrant),
            "fsmCancel" => Some(Action::FsmCancel),
            _ => None,
        };
        if fixed.is_some() {
            return fixed;
        }

        let (prefix, rest) = payload.split_once('_')?;
        if rest.is_empty() {
            return None;
        }
        match prefix {
            "svc" => Some(Action::SelectService(rest.to_string())),
            "sub" => Some(Action::SelectSubService(rest.to_string())),
            "adminFilter" if rest == FILTER_ALL => Some(Action::AdminFilter(None)),
            "adminFilter" => Some(Action::AdminFilter(Some(OrderStatus::new(rest)))),
            "adminOrdersPage" => parse_page(rest).map(Action::AdminOrdersPage),
            "viewOrderAdmin" => OrderId::parse(rest).ok().map(Action::ViewOrderAdmin),
            "manageStatus" => OrderId::parse(rest).ok().map(Action::ManageStatus),
            "manageName" => OrderId::parse(rest).ok().map(Action::ManageName),
            "setStatus" => {
                // Order codes never contain '_', status keys may.
                let (id, status) = rest.split_once('_')?;
                let id = OrderId::parse(id).ok()?;
                (!status.is_empty()).then(|| Action::SetStatus(id, OrderStatus::new(status)))
            }
            "ordersPage" => parse_page(rest).map(Action::OrdersPage),
            "refPage" => parse_page(rest).map(Action::ReferralPage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> OrderId {
        OrderId::parse("A4T7B1").unwrap()
    }

    #[test]
    fn fixed_tokens_decode() {
        assert_eq!(Action::decode("back"), Action::Back);
        assert_eq!(Action::decode("fsmCancel"), Action::FsmCancel);
        assert_eq!(Action::decode("adminGrant"), Action::AdminGrant);
    }

    #[test]
    fn structured_payloads_decode() {
        assert_eq!(
            Action::decode("svc_due_diligence"),
            Action::SelectService("due_diligence".to_string())
        );
        assert_eq!(
            Action::decode("sub_basic_dossier"),
            Action::SelectSubService("basic_dossier".to_string())
        );
        assert_eq!(Action::decode("adminFilter_all"), Action::AdminFilter(None));
        assert_eq!(
            Action::decode("adminFilter_in_progress"),
            Action::AdminFilter(Some(OrderStatus::new("in_progress")))
        );
        assert_eq!(Action::decode("adminOrdersPage_3"), Action::AdminOrdersPage(3));
        assert_eq!(Action::decode("viewOrderAdmin_A4T7B1"), Action::ViewOrderAdmin(id()));
        assert_eq!(
            Action::decode("setStatus_A4T7B1_in_progress"),
            Action::SetStatus(id(), OrderStatus::new("in_progress"))
        );
        assert_eq!(Action::decode("refPage_2"), Action::ReferralPage(2));
    }

    #[test]
    fn malformed_payloads_are_unrecognized() {
        for raw in [
            "",
            "svc_",
            "ordersPage_0",
            "ordersPage_x",
            "viewOrderAdmin_TOOLONG1",
            "setStatus_A4T7B1",
            "setStatus_A4T7B1_",
            "service_person_check",
            "whatever",
        ] {
            assert_eq!(
                Action::decode(raw),
                Action::Unrecognized(raw.to_string()),
                "{raw}"
            );
        }
    }

    #[test]
    fn encode_is_decodable() {
        let actions = [
            Action::SelectService("other".to_string()),
            Action::AdminFilter(None),
            Action::SetStatus(id(), OrderStatus::new("completed")),
            Action::ManageName(id()),
            Action::OrdersPage(4),
            Action::MenuReferral,
        ];
        for action in actions {
            assert_eq!(Action::decode(&action.encode()), action);
        }
    }

    #[test]
    fn commands_parse_with_arguments() {
        assert_eq!(Command::parse("/start"), Some(Command::Start(None)));
        assert_eq!(
            Command::parse("/start cmVmXzE"),
            Some(Command::Start(Some("cmVmXzE".to_string())))
        );
        assert_eq!(
            Command::parse("/grant_admin@order_bot  42 "),
            Some(Command::GrantAdmin(Some("42".to_string())))
        );
        assert_eq!(Command::parse("/cancel"), Some(Command::Cancel));
        assert_eq!(Command::parse("/nope"), Some(Command::Unknown("nope".to_string())));
        assert_eq!(Command::parse("hello /start"), None);
    }

    #[test]
    fn text_event_input() {
        let event = InboundEvent::text(UserId::new(1), "  my answer ");
        assert_eq!(event.input(), Input::Text("my answer".to_string()));
        let event = InboundEvent::text(UserId::new(1), "/menu");
        assert_eq!(event.input(), Input::Command(Command::Menu));
    }
}
