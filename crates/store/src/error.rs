use common::{OrderId, UserId};
use thiserror::Error;

/// Errors that can occur when interacting with the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An order was submitted for a user the store has never seen.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// The status is not part of the configured status set.
    #[error("Unknown order status: {0}")]
    InvalidStatus(String),

    /// An order name was empty after trimming.
    #[error("Order name must not be empty")]
    EmptyName,

    /// No free order code was found within the retry budget.
    #[error("No unused order code after {attempts} attempts (last tried {last})")]
    CodeSpaceExhausted { attempts: usize, last: OrderId },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
