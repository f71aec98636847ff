//! Per-user dialogue state machine.
//!
//! Inbound events are decoded once into typed [`Input`]s, routed by the
//! [`ConversationEngine`] according to the sender's [`DialogueState`], and
//! answered with an [`Outcome`]: replies for the sender plus notification
//! events for everyone else.

mod admin;
pub mod action;
pub mod engine;
pub mod error;
pub mod gate;
mod intake;
pub mod lexicon;
pub mod referral;
pub mod reply;
pub mod screens;
pub mod session;

pub use action::{Action, Command, EventKind, InboundEvent, Input};
pub use engine::{
    CLIENT_ORDERS_PAGE_SIZE, ConversationEngine, DEFAULT_ADMIN_PAGE_SIZE, DEFAULT_BOT_USERNAME,
    EngineSettings, REFERRALS_PAGE_SIZE,
};
pub use error::{AccessError, EngineError};
pub use gate::RoleGate;
pub use reply::{Button, ButtonTarget, Outcome, Reply, ReplyKind};
pub use screens::MenuLinks;
pub use session::{ConversationSession, DialogueState, OrderListing};
