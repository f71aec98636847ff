use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{OrderId, Page, UserId, paginate};
use domain::{Order, OrderDetails, OrderStatus, Role, StatusCatalog, User};
use tokio::sync::RwLock;

use crate::codes::{CodeSource, RandomCodes};
use crate::{Result, Store, StoreError};

/// Attempts at finding an unused order code before giving up.
const MAX_CODE_ATTEMPTS: usize = 64;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    /// Registration order.
    user_seq: Vec<UserId>,
    orders: HashMap<OrderId, Order>,
    /// Creation order.
    order_seq: Vec<OrderId>,
}

impl Tables {
    fn orders_where(&self, mut keep: impl FnMut(&Order) -> bool) -> Vec<Order> {
        self.order_seq
            .iter()
            .filter_map(|id| self.orders.get(id))
            .filter(|order| keep(order))
            .cloned()
            .collect()
    }
}

/// In-memory store.
///
/// All tables sit behind one lock, so every mutation is serialized and a
/// code is checked for uniqueness and inserted under the same write guard.
/// Nothing survives a restart.
#[derive(Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    owner_id: UserId,
    statuses: Arc<StatusCatalog>,
    codes: Arc<dyn CodeSource>,
}

impl InMemoryStore {
    /// Creates an empty store with the default status set.
    pub fn new(owner_id: UserId) -> Self {
        Self::with_statuses(owner_id, StatusCatalog::default())
    }

    pub fn with_statuses(owner_id: UserId, statuses: StatusCatalog) -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            owner_id,
            statuses: Arc::new(statuses),
            codes: Arc::new(RandomCodes),
        }
    }

    /// Replaces the order-code source.
    pub fn with_code_source(mut self, codes: impl CodeSource + 'static) -> Self {
        self.codes = Arc::new(codes);
        self
    }

    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns the total number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.tables.read().await.orders.len()
    }

    /// Returns the total number of users stored.
    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    #[tracing::instrument(skip(self, display_name))]
    async fn register_user(
        &self,
        id: UserId,
        display_name: Option<String>,
        referrer_id: Option<UserId>,
    ) -> Option<UserId> {
        let mut tables = self.tables.write().await;

        if let Some(user) = tables.users.get_mut(&id) {
            user.display_name = display_name;
            if id == self.owner_id && user.role != Role::Owner {
                tracing::warn!(user_id = %id, role = %user.role, "restoring owner role");
                user.role = Role::Owner;
            }
            return None;
        }

        let role = if id == self.owner_id {
            Role::Owner
        } else {
            Role::Client
        };
        let referrer_id = referrer_id.filter(|referrer| *referrer != id);

        tables.users.insert(
            id,
            User {
                id,
                display_name,
                role,
                referrer_id,
                registered_at: Utc::now(),
            },
        );
        tables.user_seq.push(id);
        tracing::info!(user_id = %id, %role, referrer = ?referrer_id, "user registered");

        referrer_id
    }

    async fn get_user(&self, id: UserId) -> Option<User> {
        self.tables.read().await.users.get(&id).cloned()
    }

    async fn get_role(&self, id: UserId) -> Role {
        self.tables
            .read()
            .await
            .users
            .get(&id)
            .map(|user| user.role)
            .unwrap_or_default()
    }

    #[tracing::instrument(skip(self))]
    async fn grant_admin(&self, id: UserId) -> bool {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&id) {
            Some(user) if user.role != Role::Owner => {
                user.role = Role::Admin;
                tracing::info!(user_id = %id, "admin role granted");
                true
            }
            _ => false,
        }
    }

    async fn count_orders(&self, user_id: UserId) -> usize {
        self.tables
            .read()
            .await
            .orders
            .values()
            .filter(|order| order.user_id == user_id)
            .count()
    }

    #[tracing::instrument(skip(self, details), fields(service = %details.service_key))]
    async fn add_order(&self, user_id: UserId, details: OrderDetails) -> Result<OrderId> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::UserNotFound(user_id));
        }

        let mut candidate = self.codes.next_code();
        let mut attempts = 1;
        while tables.orders.contains_key(&candidate) {
            if attempts == MAX_CODE_ATTEMPTS {
                return Err(StoreError::CodeSpaceExhausted {
                    attempts,
                    last: candidate,
                });
            }
            tracing::debug!(code = %candidate, "order code collision, retrying");
            candidate = self.codes.next_code();
            attempts += 1;
        }

        let order = Order {
            id: candidate.clone(),
            user_id,
            status: self.statuses.initial(),
            name: None,
            details,
            created_at: Utc::now(),
            sequence: tables.order_seq.len() as u64,
        };
        tables.orders.insert(candidate.clone(), order);
        tables.order_seq.push(candidate.clone());
        tracing::info!(order_id = %candidate, "order stored");

        Ok(candidate)
    }

    async fn get_order(&self, order_id: &OrderId) -> Option<Order> {
        self.tables.read().await.orders.get(order_id).cloned()
    }

    #[tracing::instrument(skip(self))]
    async fn update_status(&self, order_id: &OrderId, status: &OrderStatus) -> Result<bool> {
        if !self.statuses.contains(status.as_str()) {
            return Err(StoreError::InvalidStatus(status.to_string()));
        }
        let mut tables = self.tables.write().await;
        let Some(order) = tables.orders.get_mut(order_id) else {
            return Ok(false);
        };
        order.status = status.clone();
        Ok(true)
    }

    #[tracing::instrument(skip(self))]
    async fn update_name(&self, order_id: &OrderId, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        let mut tables = self.tables.write().await;
        let Some(order) = tables.orders.get_mut(order_id) else {
            return Ok(false);
        };
        order.name = Some(name.to_string());
        Ok(true)
    }

    async fn list_orders(
        &self,
        status: Option<&OrderStatus>,
        page: usize,
        page_size: usize,
    ) -> Page<Order> {
        let tables = self.tables.read().await;
        let matching = tables.orders_where(|order| status.is_none_or(|s| &order.status == s));
        paginate(matching, page, page_size)
    }

    async fn list_user_orders(
        &self,
        user_id: UserId,
        page: usize,
        page_size: usize,
    ) -> Page<Order> {
        let tables = self.tables.read().await;
        let matching = tables.orders_where(|order| order.user_id == user_id);
        paginate(matching, page, page_size)
    }

    async fn list_referrals(&self, user_id: UserId, page: usize, page_size: usize) -> Page<User> {
        let tables = self.tables.read().await;
        let referred = tables
            .user_seq
            .iter()
            .filter_map(|id| tables.users.get(id))
            .filter(|user| user.referrer_id == Some(user_id))
            .cloned()
            .collect();
        paginate(referred, page, page_size)
    }

    async fn list_all_users(&self) -> Vec<User> {
        let tables = self.tables.read().await;
        tables
            .user_seq
            .iter()
            .filter_map(|id| tables.users.get(id))
            .cloned()
            .collect()
    }

    fn statuses(&self) -> &StatusCatalog {
        &self.statuses
    }
}
