//! User repository. Deletion is a soft delete through `is_active`.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::base::search_any;
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{IdentityField, NewUser, User, UserChanges, UserFilter};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID, active or not
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by the configured login identity (email or phone)
    async fn find_by_identity(&self, field: IdentityField, value: &str) -> AppResult<Option<User>>;

    /// Filtered, paginated listing ordered by creation date
    async fn list(&self, filter: UserFilter, params: PaginationParams) -> AppResult<(Vec<User>, u64)>;

    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Apply a partial update. An empty email or phone clears the column.
    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User>;

    /// Soft delete (sets is_active = false)
    async fn deactivate(&self, id: Uuid) -> AppResult<()>;

    /// Count active users holding `role`
    async fn count_by_role(&self, role: &str) -> AppResult<u64>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn blank_to_none(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_identity(&self, field: IdentityField, value: &str) -> AppResult<Option<User>> {
        let column = match field {
            IdentityField::Email => user::Column::Email,
            IdentityField::Phone => user::Column::Phone,
        };

        UserEntity::find()
            .filter(column.eq(value))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn list(&self, filter: UserFilter, params: PaginationParams) -> AppResult<(Vec<User>, u64)> {
        let mut query = UserEntity::find();

        if !filter.include_inactive {
            query = query.filter(user::Column::IsActive.eq(true));
        }
        if let Some(role) = filter.role {
            query = query.filter(user::Column::Role.eq(role.as_str()));
        }
        if let Some(term) = filter.search.as_deref() {
            query = query.filter(search_any(
                &[user::Column::Name, user::Column::Email, user::Column::Phone],
                term,
            ));
        }

        let paginator = query
            .order_by_desc(user::Column::CreatedAt)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let users = paginator
            .fetch_page(params.index())
            .await?
            .into_iter()
            .map(User::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((users, total))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_user.name),
            email: Set(new_user.email),
            phone: Set(new_user.phone),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role.as_str().to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        User::try_from(model)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        let existing = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("User")?;

        let mut active: ActiveModel = existing.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(blank_to_none(email));
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(blank_to_none(phone));
        }
        if let Some(hash) = changes.password_hash {
            active.password_hash = Set(hash);
        }
        if let Some(role) = changes.role {
            active.role = Set(role.as_str().to_string());
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        User::try_from(model)
    }

    async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        let existing = UserEntity::find_by_id(id)
            .filter(user::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .ok_or_not_found("User")?;

        let mut active: ActiveModel = existing.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn count_by_role(&self, role: &str) -> AppResult<u64> {
        UserEntity::find()
            .filter(user::Column::Role.eq(role))
            .filter(user::Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}
