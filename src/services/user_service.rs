//! User service - account administration under the role hierarchy.
//!
//! An actor may only create or change accounts whose role ranks strictly
//! below its own; SUPER_ADMIN may manage anyone. Deletion is a soft delete
//! and never applies to the caller's own account.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::ROLE_SUPER_ADMIN;
use crate::domain::{
    Actor, IdentityField, NewUser, Password, User, UserChanges, UserFilter, UserResponse,
    UserRole,
};
use crate::dto::user::{CreateUserRequest, UpdateUserRequest};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait UserService: Send + Sync {
    async fn list_users(
        &self,
        filter: UserFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<UserResponse>>;

    /// Get a user by ID, active or not
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    async fn create_user(&self, actor: Actor, request: CreateUserRequest) -> AppResult<User>;

    async fn update_user(
        &self,
        actor: Actor,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> AppResult<User>;

    /// Soft delete (sets is_active = false)
    async fn delete_user(&self, actor: Actor, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    identity_field: IdentityField,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>, identity_field: IdentityField) -> Self {
        Self {
            uow,
            identity_field,
        }
    }

    fn ensure_can_manage(actor: &Actor, role: &UserRole) -> AppResult<()> {
        if actor.role.can_manage(role) {
            Ok(())
        } else {
            tracing::debug!(actor = %actor.id, actor_role = %actor.role, target_role = %role, "Role hierarchy denies user management");
            Err(AppError::Forbidden)
        }
    }

    /// Refuse to leave the system without an active SUPER_ADMIN.
    async fn ensure_not_last_super_admin(&self, target: &User) -> AppResult<()> {
        if target.role != UserRole::SuperAdmin || !target.is_active {
            return Ok(());
        }
        if self.uow.users().count_by_role(ROLE_SUPER_ADMIN).await? <= 1 {
            return Err(AppError::bad_request("The last super admin cannot be removed"));
        }
        Ok(())
    }
}

/// Normalize an optional contact value from an update: blank clears it.
fn contact(value: Option<String>, lowercase: bool) -> Option<String> {
    value.map(|v| {
        let v = v.trim();
        if lowercase {
            v.to_lowercase()
        } else {
            v.to_string()
        }
    })
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn list_users(
        &self,
        filter: UserFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<UserResponse>> {
        let (users, total) = self.uow.users().list(filter, params).await?;
        Ok(Paginated::new(users, &params, total).map(UserResponse::from))
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found("User")
    }

    async fn create_user(&self, actor: Actor, request: CreateUserRequest) -> AppResult<User> {
        let request = request.normalized();
        Self::ensure_can_manage(&actor, &request.role)?;

        let identity = match self.identity_field {
            IdentityField::Email => request.email.as_ref(),
            IdentityField::Phone => request.phone.as_ref(),
        };
        if identity.is_none() {
            return Err(AppError::validation(format!(
                "{} is required",
                self.identity_field
            )));
        }

        let password_hash = Password::new(&request.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                name: request.name,
                email: request.email,
                phone: request.phone,
                password_hash,
                role: request.role,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, created_by = %actor.id, "User created");
        Ok(user)
    }

    async fn update_user(
        &self,
        actor: Actor,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> AppResult<User> {
        let target = self.get_user(id).await?;
        let is_self = actor.id == id;

        if is_self {
            if request.role.is_some_and(|role| role != target.role)
                || request.is_active == Some(false)
            {
                return Err(AppError::bad_request(
                    "You cannot change your own role or deactivate yourself",
                ));
            }
        } else {
            Self::ensure_can_manage(&actor, &target.role)?;
            if let Some(role) = &request.role {
                Self::ensure_can_manage(&actor, role)?;
            }
            if request.is_active == Some(false)
                || request.role.is_some_and(|role| role != UserRole::SuperAdmin)
            {
                self.ensure_not_last_super_admin(&target).await?;
            }
        }

        let email = contact(request.email, true);
        let phone = contact(request.phone, false);
        let clears_identity = match self.identity_field {
            IdentityField::Email => email.as_deref() == Some(""),
            IdentityField::Phone => phone.as_deref() == Some(""),
        };
        if clears_identity {
            return Err(AppError::validation(format!(
                "{} cannot be removed",
                self.identity_field
            )));
        }

        let password_hash = match request.password {
            Some(plain) => Some(Password::new(&plain)?.into_string()),
            None => None,
        };

        let user = self
            .uow
            .users()
            .update(
                id,
                UserChanges {
                    name: request.name.map(|n| n.trim().to_string()),
                    email,
                    phone,
                    password_hash,
                    role: request.role,
                    is_active: request.is_active,
                },
            )
            .await?;

        tracing::info!(user_id = %user.id, updated_by = %actor.id, "User updated");
        Ok(user)
    }

    async fn delete_user(&self, actor: Actor, id: Uuid) -> AppResult<()> {
        if actor.id == id {
            return Err(AppError::bad_request("You cannot delete your own account"));
        }

        let target = self.get_user(id).await?;
        Self::ensure_can_manage(&actor, &target.role)?;
        self.ensure_not_last_super_admin(&target).await?;

        self.uow.users().deactivate(id).await?;
        tracing::info!(user_id = %id, deleted_by = %actor.id, "User deactivated");
        Ok(())
    }
}
