//! Users and roles.

use chrono::{DateTime, Utc};
use common::UserId;
use serde::{Deserialize, Serialize};

/// Privilege level of a user.
///
/// ```text
/// Client ──(owner grant)──► Admin
/// Owner  (bound to the configured id, never granted or revoked)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Client,
    Admin,
    Owner,
}

impl Role {
    /// Returns true for roles allowed into the admin screens.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::Owner)
    }

    /// Returns true only for the configured top-level administrator.
    pub fn is_owner(&self) -> bool {
        matches!(self, Role::Owner)
    }

    /// Returns the role key as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Admin => "admin",
            Role::Owner => "owner",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered chat user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    /// Platform handle without the leading `@`, if the user has one.
    pub display_name: Option<String>,

    pub role: Role,

    /// Who referred this user. Set once at first registration, never self.
    pub referrer_id: Option<UserId>,

    pub registered_at: DateTime<Utc>,
}

impl User {
    /// `@handle` when known, otherwise `ID: <id>`.
    pub fn mention(&self) -> String {
        match &self.display_name {
            Some(name) => format!("@{name}"),
            None => format!("ID: {}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_capability_covers_owner() {
        assert!(!Role::Client.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(Role::Owner.is_admin());
    }

    #[test]
    fn only_owner_is_owner() {
        assert!(!Role::Client.is_owner());
        assert!(!Role::Admin.is_owner());
        assert!(Role::Owner.is_owner());
    }

    #[test]
    fn mention_prefers_handle() {
        let mut user = User {
            id: UserId::new(7),
            display_name: Some("alice".to_string()),
            role: Role::Client,
            referrer_id: None,
            registered_at: Utc::now(),
        };
        assert_eq!(user.mention(), "@alice");
        user.display_name = None;
        assert_eq!(user.mention(), "ID: 7");
    }

    #[test]
    fn role_serializes_as_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Owner).unwrap(), "\"owner\"");
    }
}
