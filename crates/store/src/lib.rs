//! Repository of users, orders and referral edges.
//!
//! [`Store`] is the only way the rest of the system touches this data;
//! [`InMemoryStore`] is the process-local implementation.

pub mod codes;
pub mod error;
pub mod memory;
pub mod store;

pub use codes::{CodeSource, RandomCodes, ScriptedCodes};
pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use store::Store;
