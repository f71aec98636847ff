//! Domain error types.

use thiserror::Error;

/// A service or status catalog that cannot drive a dialogue.
///
/// These are detected once at start-up; a running bot only sees them if it
/// was handed an unvalidated catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog defines no services at all.
    #[error("Catalog defines no services")]
    NoServices,

    /// A key is empty, too long, or contains characters outside `[A-Za-z0-9_]`.
    #[error("Invalid catalog key: {0:?}")]
    InvalidKey(String),

    /// The same key is declared twice.
    #[error("Duplicate catalog key: {0}")]
    DuplicateKey(String),

    /// A key names both a service and a sub-service.
    #[error("Key {0} names both a service and a sub-service")]
    AmbiguousKey(String),

    /// A question list is keyed by something that is not a leaf branch.
    #[error("Question list for unknown or non-leaf branch: {0}")]
    UnknownBranch(String),

    /// A leaf branch has no questions.
    #[error("Branch {0} has no questions")]
    MissingQuestions(String),

    /// The status set does not contain the initial status.
    #[error("Status catalog must contain the initial status '{0}'")]
    MissingInitialStatus(&'static str),

    /// The catalog file could not be parsed.
    #[error("Catalog file error: {0}")]
    Parse(#[from] serde_json::Error),
}
