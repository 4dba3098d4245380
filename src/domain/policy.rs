//! Resource × action access matrix.
//!
//! Routes declare their own role allow-list; `AccessPolicy` is the second,
//! data-driven gate. Both must admit a role.

use std::collections::{HashMap, HashSet};

use super::user::UserRole;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    Products,
    Stock,
    Orders,
    ScanOrders,
    Salaries,
    Charges,
    AdCosts,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

/// Role sets per (resource, action). Pairs that are absent admit nobody.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: HashMap<(Resource, Action), HashSet<UserRole>>,
}

impl AccessPolicy {
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Admit `roles` to `action` on `resource`.
    pub fn grant(mut self, resource: Resource, action: Action, roles: &[UserRole]) -> Self {
        self.rules
            .entry((resource, action))
            .or_default()
            .extend(roles.iter().copied());
        self
    }

    pub fn allows(&self, role: UserRole, resource: Resource, action: Action) -> bool {
        self.rules
            .get(&(resource, action))
            .is_some_and(|roles| roles.contains(&role))
    }

    /// Route allow-list first, then the matrix.
    pub fn authorize(
        &self,
        role: UserRole,
        route_roles: &[UserRole],
        resource: Resource,
        action: Action,
    ) -> AppResult<()> {
        if !route_roles.contains(&role) {
            tracing::debug!(%role, ?resource, ?action, "Role not in route allow-list");
            return Err(AppError::Forbidden);
        }
        if !self.allows(role, resource, action) {
            tracing::debug!(%role, ?resource, ?action, "Role denied by access policy");
            return Err(AppError::Forbidden);
        }
        Ok(())
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        use Action::*;
        use Resource::*;
        use UserRole::*;

        const ADMINS: &[UserRole] = &[SuperAdmin, Admin];
        const EVERYONE: &[UserRole] = &UserRole::ALL;

        let mut policy = AccessPolicy::empty();
        for resource in [Users, Salaries, Charges, AdCosts] {
            for action in [Create, Read, Update, Delete] {
                policy = policy.grant(resource, action, ADMINS);
            }
        }

        policy
            .grant(Products, Create, ADMINS)
            .grant(Products, Read, EVERYONE)
            .grant(Products, Update, ADMINS)
            .grant(Products, Delete, ADMINS)
            .grant(Stock, Create, &[SuperAdmin, Admin, WarehouseAgent])
            .grant(Stock, Read, &[SuperAdmin, Admin, WarehouseAgent, ShopAgent])
            .grant(Stock, Update, &[SuperAdmin, Admin, WarehouseAgent])
            .grant(Orders, Create, &[SuperAdmin, Admin, ShopAgent, Confirmer])
            .grant(Orders, Read, EVERYONE)
            .grant(Orders, Update, &[SuperAdmin, Admin, Confirmer, WarehouseAgent])
            .grant(ScanOrders, Create, &[SuperAdmin, Admin, WarehouseAgent])
            .grant(ScanOrders, Read, &[SuperAdmin, Admin, WarehouseAgent])
            .grant(Dashboard, Read, ADMINS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matrix() {
        let policy = AccessPolicy::default();

        assert!(policy.allows(UserRole::ShopAgent, Resource::Orders, Action::Create));
        assert!(!policy.allows(UserRole::ShopAgent, Resource::Orders, Action::Update));
        assert!(policy.allows(UserRole::WarehouseAgent, Resource::ScanOrders, Action::Create));
        assert!(!policy.allows(UserRole::Confirmer, Resource::Stock, Action::Read));
        assert!(!policy.allows(UserRole::SuperAdmin, Resource::Orders, Action::Delete));
        assert!(policy.allows(UserRole::Admin, Resource::Salaries, Action::Delete));
        assert!(!policy.allows(UserRole::WarehouseAgent, Resource::Dashboard, Action::Read));
    }

    #[test]
    fn test_route_list_checked_before_matrix() {
        let policy = AccessPolicy::default();
        let admins_only = [UserRole::SuperAdmin, UserRole::Admin];

        // Matrix would admit a shop agent reading products, the route does not.
        let err = policy
            .authorize(UserRole::ShopAgent, &admins_only, Resource::Products, Action::Read)
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));

        assert!(policy
            .authorize(UserRole::Admin, &admins_only, Resource::Products, Action::Read)
            .is_ok());
    }

    #[test]
    fn test_custom_policy_overrides_default() {
        let policy = AccessPolicy::empty().grant(Resource::Dashboard, Action::Read, &[UserRole::Confirmer]);
        assert!(policy.allows(UserRole::Confirmer, Resource::Dashboard, Action::Read));
        assert!(!policy.allows(UserRole::Admin, Resource::Dashboard, Action::Read));
    }
}
