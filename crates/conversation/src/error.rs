//! Conversation error types.

use store::StoreError;
use thiserror::Error;

/// Failures that abort the current dialogue.
///
/// The engine turns these into an apology for the user and a reset of the
/// session; they never escape [`crate::ConversationEngine::handle`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// The catalog cannot drive the branch the user picked.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The store refused an operation.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// An action was attempted without the required role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The actor is a client.
    #[error("Administrator rights required")]
    NotAdmin,

    /// The actor is an admin but the action is reserved for the owner.
    #[error("Only the owner may do this")]
    NotOwner,
}
