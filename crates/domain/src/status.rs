//! Configurable set of order statuses.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Key of an order status, e.g. `in_progress`.
///
/// Only meaningful relative to a [`StatusCatalog`]; the store refuses keys
/// the catalog does not contain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderStatus(String);

impl OrderStatus {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderStatus {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A status key together with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDef {
    pub key: OrderStatus,
    pub label: String,
}

/// Ordered set of statuses an order may be in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCatalog {
    statuses: Vec<StatusDef>,
}

impl StatusCatalog {
    /// Status every new order starts in.
    pub const INITIAL: &'static str = "new";

    /// Builds a catalog, checking keys and the presence of [`Self::INITIAL`].
    pub fn new(statuses: Vec<StatusDef>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for def in &statuses {
            crate::catalog::check_key(def.key.as_str())?;
            if !seen.insert(def.key.as_str()) {
                return Err(CatalogError::DuplicateKey(def.key.to_string()));
            }
        }
        if !seen.contains(Self::INITIAL) {
            return Err(CatalogError::MissingInitialStatus(Self::INITIAL));
        }
        Ok(Self { statuses })
    }

    /// The status assigned to freshly created orders.
    pub fn initial(&self) -> OrderStatus {
        OrderStatus::new(Self::INITIAL)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&StatusDef> {
        self.statuses.iter().find(|def| def.key.as_str() == key)
    }

    /// Display label for `status`, falling back to the raw key.
    pub fn label<'a>(&'a self, status: &'a OrderStatus) -> &'a str {
        self.get(status.as_str())
            .map(|def| def.label.as_str())
            .unwrap_or(status.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusDef> {
        self.statuses.iter()
    }
}

impl Default for StatusCatalog {
    fn default() -> Self {
        let def = |key: &str, label: &str| StatusDef {
            key: OrderStatus::new(key),
            label: label.to_string(),
        };
        Self {
            statuses: vec![
                def("new", "New 🔵"),
                def("in_progress", "In progress 🔄"),
                def("completed", "Completed ✅"),
                def("cancelled", "Cancelled ❌"),
            ],
        }
    }
}
