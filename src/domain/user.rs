//! User domain entity, roles and the login identity setting.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    ROLE_ADMIN, ROLE_CONFIRMER, ROLE_SHOP_AGENT, ROLE_SUPER_ADMIN, ROLE_WAREHOUSE_AGENT,
};
use crate::errors::AppError;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    ShopAgent,
    WarehouseAgent,
    Confirmer,
}

impl UserRole {
    pub const ALL: [UserRole; 5] = [
        UserRole::SuperAdmin,
        UserRole::Admin,
        UserRole::ShopAgent,
        UserRole::WarehouseAgent,
        UserRole::Confirmer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => ROLE_SUPER_ADMIN,
            UserRole::Admin => ROLE_ADMIN,
            UserRole::ShopAgent => ROLE_SHOP_AGENT,
            UserRole::WarehouseAgent => ROLE_WAREHOUSE_AGENT,
            UserRole::Confirmer => ROLE_CONFIRMER,
        }
    }

    /// Position in the role hierarchy (higher = more privileged)
    pub fn level(&self) -> u8 {
        match self {
            UserRole::SuperAdmin => 3,
            UserRole::Admin => 2,
            UserRole::ShopAgent | UserRole::WarehouseAgent | UserRole::Confirmer => 1,
        }
    }

    /// Strictly higher in the hierarchy than `other`
    pub fn outranks(&self, other: &UserRole) -> bool {
        self.level() > other.level()
    }

    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::SuperAdmin | UserRole::Admin)
    }

    /// Whether an actor with this role may create or edit a user holding `target`.
    pub fn can_manage(&self, target: &UserRole) -> bool {
        match self {
            UserRole::SuperAdmin => true,
            _ => self.outranks(target),
        }
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown role: {}", s)))
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User attribute used as the login identity for a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IdentityField {
    #[default]
    Email,
    Phone,
}

impl FromStr for IdentityField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(IdentityField::Email),
            "phone" => Ok(IdentityField::Phone),
            other => Err(AppError::validation(format!("Unknown identity field: {}", other))),
        }
    }
}

impl std::fmt::Display for IdentityField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityField::Email => f.write_str("email"),
            IdentityField::Phone => f.write_str("phone"),
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Value of the configured login identity, if the user has one
    pub fn identity(&self, field: IdentityField) -> Option<&str> {
        match field {
            IdentityField::Email => self.email.as_deref(),
            IdentityField::Phone => self.phone.as_deref(),
        }
    }

    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Authenticated caller of a service operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: Uuid, role: UserRole) -> Self {
        Self { id, role }
    }
}

/// Data for a new user row (password already hashed)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
}

/// Partial user update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

/// Filters for the user listing
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub include_inactive: bool,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Amina Benali")]
    pub name: String,
    #[schema(example = "amina@example.com")]
    pub email: Option<String>,
    #[schema(example = "+213555000111")]
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in UserRole::ALL {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert!("MANAGER".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_hierarchy() {
        assert!(UserRole::SuperAdmin.outranks(&UserRole::Admin));
        assert!(UserRole::Admin.outranks(&UserRole::Confirmer));
        assert!(!UserRole::ShopAgent.outranks(&UserRole::WarehouseAgent));
        assert!(!UserRole::Admin.outranks(&UserRole::Admin));
    }

    #[test]
    fn test_can_manage() {
        assert!(UserRole::SuperAdmin.can_manage(&UserRole::SuperAdmin));
        assert!(UserRole::Admin.can_manage(&UserRole::ShopAgent));
        assert!(!UserRole::Admin.can_manage(&UserRole::Admin));
        assert!(!UserRole::Admin.can_manage(&UserRole::SuperAdmin));
        assert!(!UserRole::Confirmer.can_manage(&UserRole::ShopAgent));
    }

    #[test]
    fn test_role_serializes_screaming_snake() {
        let json = serde_json::to_string(&UserRole::WarehouseAgent).unwrap();
        assert_eq!(json, "\"WAREHOUSE_AGENT\"");
    }

    #[test]
    fn test_identity_field_selects_attribute() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Test".into(),
            email: Some("t@example.com".into()),
            phone: None,
            password_hash: "hash".into(),
            role: UserRole::Confirmer,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(user.identity(IdentityField::Email), Some("t@example.com"));
        assert_eq!(user.identity(IdentityField::Phone), None);
        assert_eq!("PHONE".parse::<IdentityField>().unwrap(), IdentityField::Phone);
    }
}
