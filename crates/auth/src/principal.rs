use std::collections::HashSet;

use stockdesk_core::UserId;

use crate::Permission;

/// The current user: identity plus the capabilities granted to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: UserId,
    permissions: HashSet<Permission>,
}

impl Principal {
    pub fn new(user_id: UserId, permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            user_id,
            permissions: permissions.into_iter().collect(),
        }
    }

    /// A user with no capabilities at all.
    pub fn anonymous(user_id: UserId) -> Self {
        Self::new(user_id, [])
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn permissions(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    /// Whether the user holds `permission`, directly or through the wildcard.
    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.permissions.contains(&Permission::WILDCARD) || self.permissions.contains(permission)
    }

    pub fn is_stock_admin(&self) -> bool {
        self.has_permission(&Permission::ADMINISTER_STOCK)
    }
}
