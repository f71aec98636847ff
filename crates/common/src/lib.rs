//! Shared types for the order-intake bot.

mod page;
mod types;

pub use page::{Page, paginate};
pub use types::{OrderId, ParseOrderIdError, UserId};
