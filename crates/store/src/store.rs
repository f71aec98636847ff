use async_trait::async_trait;
use common::{OrderId, Page, UserId};
use domain::{Order, OrderDetails, OrderStatus, Role, StatusCatalog, User};

use crate::Result;

/// Core trait for repositories of users and orders.
///
/// Every operation appears atomic to callers. Mutations of the same user or
/// order never interleave; implementations must be thread-safe.
#[async_trait]
pub trait Store: Send + Sync {
    /// Registers `id` or refreshes its display name.
    ///
    /// A new user becomes owner if `id` is the configured owner id and
    /// client otherwise. The referrer is recorded only on first
    /// registration, and only if it differs from `id`. For an existing
    /// user only the display name changes, and the owner role is restored
    /// if it drifted.
    ///
    /// Returns the referrer id exactly when a referral edge was created by
    /// this call.
    async fn register_user(
        &self,
        id: UserId,
        display_name: Option<String>,
        referrer_id: Option<UserId>,
    ) -> Option<UserId>;

    async fn get_user(&self, id: UserId) -> Option<User>;

    /// Role of `id`; unknown users are clients.
    async fn get_role(&self, id: UserId) -> Role;

    /// Promotes an existing non-owner user to admin.
    ///
    /// Returns false for unknown users and for the owner.
    async fn grant_admin(&self, id: UserId) -> bool;

    async fn count_orders(&self, user_id: UserId) -> usize;

    /// Stores a new order in the initial status under a fresh unique code.
    async fn add_order(&self, user_id: UserId, details: OrderDetails) -> Result<OrderId>;

    async fn get_order(&self, order_id: &OrderId) -> Option<Order>;

    /// Sets the status of an order. `Ok(false)` if the order does not exist.
    async fn update_status(&self, order_id: &OrderId, status: &OrderStatus) -> Result<bool>;

    /// Sets the name of an order. `Ok(false)` if the order does not exist.
    async fn update_name(&self, order_id: &OrderId, name: &str) -> Result<bool>;

    /// Orders in creation order, optionally restricted to one status.
    async fn list_orders(
        &self,
        status: Option<&OrderStatus>,
        page: usize,
        page_size: usize,
    ) -> Page<Order>;

    async fn list_user_orders(&self, user_id: UserId, page: usize, page_size: usize)
    -> Page<Order>;

    /// Users whose referrer is `user_id`, in registration order.
    async fn list_referrals(&self, user_id: UserId, page: usize, page_size: usize) -> Page<User>;

    /// Every user in registration order.
    async fn list_all_users(&self) -> Vec<User>;

    /// The status set orders are validated against.
    fn statuses(&self) -> &StatusCatalog;
}
