//! Domain layer for the order-intake bot.
//!
//! This crate provides the plain data the rest of the system works on:
//! - [`User`] and [`Role`], with the owner/admin/client hierarchy
//! - [`Order`] and its immutable [`OrderDetails`]
//! - [`StatusCatalog`], the configured set of order statuses
//! - [`ServiceCatalog`], services, sub-services and their question lists

pub mod catalog;
pub mod error;
pub mod order;
pub mod status;
pub mod user;

pub use catalog::{BranchKey, CatalogFile, Question, ServiceCatalog, ServiceDef, SubServiceDef};
pub use error::CatalogError;
pub use order::{Answer, Order, OrderDetails};
pub use status::{OrderStatus, StatusCatalog, StatusDef};
pub use user::{Role, User};
