//! Role checks for admin-only transitions.
//!
//! Roles are read from the store on every call, never cached, so a grant
//! takes effect on the very next event.

use common::UserId;
use domain::Role;
use store::Store;

use crate::error::AccessError;

pub struct RoleGate;

impl RoleGate {
    pub fn is_admin(role: Role) -> bool {
        role.is_admin()
    }

    pub fn is_owner(role: Role) -> bool {
        role.is_owner()
    }

    /// Succeeds for admins and the owner.
    pub async fn require_admin<S: Store>(store: &S, user: UserId) -> Result<Role, AccessError> {
        let role = store.get_role(user).await;
        if Self::is_admin(role) {
            Ok(role)
        } else {
            Err(AccessError::NotAdmin)
        }
    }

    /// Succeeds only for the owner; admins get [`AccessError::NotOwner`].
    pub async fn require_owner<S: Store>(store: &S, user: UserId) -> Result<Role, AccessError> {
        match store.get_role(user).await {
            Role::Owner => Ok(Role::Owner),
            Role::Admin => Err(AccessError::NotOwner),
            Role::Client => Err(AccessError::NotAdmin),
        }
    }
}

#[cfg(test)]
mod tests {
    use store::InMemoryStore;

    use super::*;

    const OWNER: UserId = UserId::new(999);

    async fn store() -> InMemoryStore {
        let store = InMemoryStore::new(OWNER);
        store.register_user(OWNER, None, None).await;
        store.register_user(UserId::new(1), None, None).await;
        store.register_user(UserId::new(2), None, None).await;
        store.grant_admin(UserId::new(2)).await;
        store
    }

    #[tokio::test]
    async fn admin_check() {
        let store = store().await;
        assert_eq!(RoleGate::require_admin(&store, OWNER).await, Ok(Role::Owner));
        assert_eq!(
            RoleGate::require_admin(&store, UserId::new(2)).await,
            Ok(Role::Admin)
        );
        assert_eq!(
            RoleGate::require_admin(&store, UserId::new(1)).await,
            Err(AccessError::NotAdmin)
        );
        assert_eq!(
            RoleGate::require_admin(&store, UserId::new(77)).await,
            Err(AccessError::NotAdmin)
        );
    }

    #[tokio::test]
    async fn owner_check_distinguishes_admins() {
        let store = store().await;
        assert!(RoleGate::require_owner(&store, OWNER).await.is_ok());
        assert_eq!(
            RoleGate::require_owner(&store, UserId::new(2)).await,
            Err(AccessError::NotOwner)
        );
        assert_eq!(
            RoleGate::require_owner(&store, UserId::new(1)).await,
            Err(AccessError::NotAdmin)
        );
    }

    #[tokio::test]
    async fn grant_is_visible_on_next_check() {
        let store = store().await;
        assert!(RoleGate::require_admin(&store, UserId::new(1)).await.is_err());
        store.grant_admin(UserId::new(1)).await;
        assert!(RoleGate::require_admin(&store, UserId::new(1)).await.is_ok());
    }
}
