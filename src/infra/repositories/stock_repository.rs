//! Stock levels and ledger reads, plus stock metadata updates.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::base::search_any;
use super::entities::{product, stock, stock_history};
use crate::domain::{StockHistoryEntry, StockLevel, StockOverview};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StockRepository: Send + Sync {
    /// Stock of active products, ordered by product name
    async fn list(
        &self,
        search: Option<String>,
        low_stock: bool,
        params: PaginationParams,
    ) -> AppResult<(Vec<StockOverview>, u64)>;

    async fn find_level(&self, product_id: Uuid) -> AppResult<Option<StockLevel>>;

    /// Ledger rows of a product, newest first
    async fn history(
        &self,
        product_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<StockHistoryEntry>, u64)>;

    /// Update threshold and location. Quantity is never touched here.
    async fn update_settings(
        &self,
        product_id: Uuid,
        min_level: Option<i32>,
        location: Option<String>,
    ) -> AppResult<StockLevel>;
}

pub struct StockStore {
    db: DatabaseConnection,
}

impl StockStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn overview(stock: stock::Model, product: product::Model) -> StockOverview {
    let level = StockLevel::from(stock);
    StockOverview {
        product_id: level.product_id,
        product_name: product.name,
        sku: product.sku,
        low_stock: level.is_low(),
        quantity: level.quantity,
        min_level: level.min_level,
        location: level.location,
        last_updated: level.last_updated,
    }
}

#[async_trait]
impl StockRepository for StockStore {
    async fn list(
        &self,
        search: Option<String>,
        low_stock: bool,
        params: PaginationParams,
    ) -> AppResult<(Vec<StockOverview>, u64)> {
        let mut query = stock::Entity::find()
            .find_also_related(product::Entity)
            .filter(product::Column::IsActive.eq(true));

        if let Some(term) = search.as_deref() {
            query = query.filter(search_any(&[product::Column::Name, product::Column::Sku], term));
        }
        if low_stock {
            query = query.filter(
                Expr::col((stock::Entity, stock::Column::Quantity))
                    .lte(Expr::col((stock::Entity, stock::Column::MinLevel))),
            );
        }

        let paginator = query
            .order_by_asc(product::Column::Name)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let rows = paginator
            .fetch_page(params.index())
            .await?
            .into_iter()
            .filter_map(|(stock, product)| product.map(|p| overview(stock, p)))
            .collect();

        Ok((rows, total))
    }

    async fn find_level(&self, product_id: Uuid) -> AppResult<Option<StockLevel>> {
        let row = stock::Entity::find_by_id(product_id).one(&self.db).await?;
        Ok(row.map(StockLevel::from))
    }

    async fn history(
        &self,
        product_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<StockHistoryEntry>, u64)> {
        let paginator = stock_history::Entity::find()
            .filter(stock_history::Column::ProductId.eq(product_id))
            .order_by_desc(stock_history::Column::CreatedAt)
            .order_by_desc(stock_history::Column::Id)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let entries = paginator
            .fetch_page(params.index())
            .await?
            .into_iter()
            .map(StockHistoryEntry::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((entries, total))
    }

    async fn update_settings(
        &self,
        product_id: Uuid,
        min_level: Option<i32>,
        location: Option<String>,
    ) -> AppResult<StockLevel> {
        let existing = stock::Entity::find_by_id(product_id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Stock")?;

        let mut active: stock::ActiveModel = existing.into();
        if let Some(min_level) = min_level {
            active.min_level = Set(min_level);
        }
        if let Some(location) = location {
            let location = location.trim().to_string();
            active.location = Set(Some(location).filter(|l| !l.is_empty()));
        }
        active.last_updated = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(StockLevel::from(model))
    }
}
