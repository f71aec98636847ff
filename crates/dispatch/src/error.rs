//! Transport error types.

use thiserror::Error;

/// Errors a transport may report for a single delivery.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The recipient blocked the bot or never started a chat with it.
    #[error("Recipient {chat_id} is unreachable")]
    Unreachable { chat_id: i64 },

    /// The platform rejected the request.
    #[error("Transport rejected message: {0}")]
    Rejected(String),
}
