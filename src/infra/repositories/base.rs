//! Generic SeaORM store halves and the search helpers shared by every store.
//!
//! The finance stores implement all three halves; the other stores only use
//! `search_any`. Listing goes through `paginate`, which takes an
//! already-filtered `Select`.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection,
    EntityTrait, FromQueryResult, IntoActiveModel, PaginatorTrait, PrimaryKeyTrait, Select,
};
use std::fmt::Debug;

use crate::errors::AppResult;
use crate::types::PaginationParams;

/// Lookups and paged listing
#[async_trait]
pub trait ReadRepository<E, M>: Send + Sync
where
    E: EntityTrait<Model = M>,
    M: Send + Sync + FromQueryResult,
{
    /// Get database connection reference
    fn db(&self) -> &DatabaseConnection;

    /// Find entity by primary key
    async fn find_by_id(&self, id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType) -> AppResult<Option<M>>
    where
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: Clone + Send,
    {
        E::find_by_id(id)
            .one(self.db())
            .await
            .map_err(Into::into)
    }

    /// Run a filtered query one page at a time, returning the page and the total
    async fn paginate(&self, query: Select<E>, params: &PaginationParams) -> AppResult<(Vec<M>, u64)> {
        let paginator = query.paginate(self.db(), params.limit());
        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(params.index()).await?;
        Ok((data, total))
    }
}

/// Insert and update of whole active models
#[async_trait]
pub trait WriteRepository<E, M, A>: Send + Sync
where
    E: EntityTrait<Model = M>,
    M: Send + Sync + IntoActiveModel<A>,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
{
    /// Get database connection reference
    fn db(&self) -> &DatabaseConnection;

    /// Insert new entity
    async fn insert(&self, model: A) -> AppResult<M>
    where
        <<A as ActiveModelTrait>::Entity as EntityTrait>::Model: Send,
    {
        model
            .insert(self.db())
            .await
            .map_err(Into::into)
    }

    /// Update existing entity
    async fn update(&self, model: A) -> AppResult<M>
    where
        <<A as ActiveModelTrait>::Entity as EntityTrait>::Model: Send,
    {
        model
            .update(self.db())
            .await
            .map_err(Into::into)
    }
}

/// Hard delete by primary key
#[async_trait]
pub trait DeleteRepository<E>: Send + Sync
where
    E: EntityTrait,
{
    /// Get database connection reference
    fn db(&self) -> &DatabaseConnection;

    /// Delete entity by primary key, returning whether a row went away
    async fn delete_by_id(&self, id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType) -> AppResult<bool>
    where
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: Clone + Send + Debug,
    {
        let result = E::delete_by_id(id).exec(self.db()).await?;
        Ok(result.rows_affected > 0)
    }
}

/// Case-insensitive substring match on a table-qualified column
pub(crate) fn contains_ci<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", term.to_lowercase().replace('%', "\\%").replace('_', "\\_"));
    Expr::expr(Func::lower(Expr::col((column.entity_name(), column)))).like(pattern)
}

/// Match `term` against any of `columns`
pub(crate) fn search_any<C: ColumnTrait>(columns: &[C], term: &str) -> Condition {
    columns
        .iter()
        .fold(Condition::any(), |cond, column| cond.add(contains_ci(*column, term)))
}
