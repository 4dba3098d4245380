//! Product catalogue reads and updates.
//!
//! Products are always returned joined with their stock row. Creation is
//! transactional and lives on `TxProductRepository`.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, SelectTwo, Set,
};
use uuid::Uuid;

use super::base::search_any;
use super::entities::{delivery_stats, product, stock};
use crate::domain::{
    ProductChanges, ProductDeliveryStats, ProductFilter, ProductSort, ProductView, SortOrder,
    StockLevel,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find a product with its stock, active or not
    async fn find_view(&self, id: Uuid) -> AppResult<Option<ProductView>>;

    /// Find an active product by exact barcode or SKU
    async fn find_by_code(&self, code: &str) -> AppResult<Option<ProductView>>;

    async fn list(
        &self,
        filter: ProductFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<ProductView>, u64)>;

    /// Apply a partial update. An empty barcode or description clears it.
    async fn update(&self, id: Uuid, changes: ProductChanges) -> AppResult<ProductView>;

    /// Soft delete (sets is_active = false)
    async fn deactivate(&self, id: Uuid) -> AppResult<()>;

    async fn delivery_stats(&self, id: Uuid) -> AppResult<Option<ProductDeliveryStats>>;
}

pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn view(row: (product::Model, Option<stock::Model>)) -> ProductView {
    let (product, stock) = row;
    ProductView::new(product.into(), stock.map(StockLevel::from))
}

type ProductRows = SelectTwo<product::Entity, stock::Entity>;

/// By id, deactivated products included
fn by_id(id: Uuid) -> ProductRows {
    product::Entity::find_by_id(id).find_also_related(stock::Entity)
}

/// Listing query. Deactivated products only with `include_inactive`.
fn listing(filter: &ProductFilter) -> ProductRows {
    let mut query = product::Entity::find().find_also_related(stock::Entity);

    if !filter.include_inactive {
        query = query.filter(product::Column::IsActive.eq(true));
    }
    if let Some(term) = filter.search.as_deref() {
        query = query.filter(search_any(
            &[
                product::Column::Name,
                product::Column::Sku,
                product::Column::Barcode,
            ],
            term,
        ));
    }
    if filter.low_stock {
        query = query.filter(
            Expr::col((stock::Entity, stock::Column::Quantity))
                .lte(Expr::col((stock::Entity, stock::Column::MinLevel))),
        );
    }

    let order = match filter.order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    };
    query = match filter.sort {
        ProductSort::Name => query.order_by(product::Column::Name, order),
        ProductSort::Sku => query.order_by(product::Column::Sku, order),
        ProductSort::SellingPrice => query.order_by(product::Column::SellingPrice, order),
        ProductSort::CostPrice => query.order_by(product::Column::CostPrice, order),
        ProductSort::CreatedAt => query.order_by(product::Column::CreatedAt, order),
        ProductSort::Quantity => query.order_by(stock::Column::Quantity, order),
    };
    query.order_by_asc(product::Column::Id)
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_view(&self, id: Uuid) -> AppResult<Option<ProductView>> {
        let row = by_id(id).one(&self.db).await?;
        Ok(row.map(view))
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<ProductView>> {
        let row = product::Entity::find()
            .find_also_related(stock::Entity)
            .filter(product::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(product::Column::Barcode.eq(code))
                    .add(product::Column::Sku.eq(code)),
            )
            .one(&self.db)
            .await?;
        Ok(row.map(view))
    }

    async fn list(
        &self,
        filter: ProductFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<ProductView>, u64)> {
        let paginator = listing(&filter).paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(params.index()).await?;

        Ok((rows.into_iter().map(view).collect(), total))
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> AppResult<ProductView> {
        let existing = product::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Product")?;

        let mut active: product::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(sku) = changes.sku {
            active.sku = Set(sku);
        }
        if let Some(barcode) = changes.barcode {
            active.barcode = Set(Some(barcode).filter(|b| !b.is_empty()));
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description).filter(|d| !d.is_empty()));
        }
        if let Some(price) = changes.selling_price {
            active.selling_price = Set(price);
        }
        if let Some(price) = changes.cost_price {
            active.cost_price = Set(price);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(AppError::from)?;
        let stock = stock::Entity::find_by_id(id).one(&self.db).await?;
        Ok(view((updated, stock)))
    }

    async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        let existing = product::Entity::find_by_id(id)
            .filter(product::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .ok_or_not_found("Product")?;

        let mut active: product::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn delivery_stats(&self, id: Uuid) -> AppResult<Option<ProductDeliveryStats>> {
        let stats = delivery_stats::Entity::find_by_id(id).one(&self.db).await?;
        Ok(stats.map(ProductDeliveryStats::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn where_clause(query: ProductRows) -> String {
        let sql = query.build(DbBackend::Postgres).to_string();
        sql.split(" WHERE ").nth(1).unwrap_or_default().to_string()
    }

    #[test]
    fn test_listing_hides_deactivated_products() {
        let clause = where_clause(listing(&ProductFilter::default()));
        assert!(clause.contains(r#""products"."is_active" = "#), "{}", clause);
    }

    #[test]
    fn test_listing_can_include_deactivated_products() {
        let filter = ProductFilter {
            include_inactive: true,
            ..ProductFilter::default()
        };
        assert!(!where_clause(listing(&filter)).contains("is_active"));
    }

    #[test]
    fn test_lookup_by_id_ignores_active_flag() {
        let clause = where_clause(by_id(Uuid::new_v4()));
        assert!(clause.contains(r#""products"."id""#), "{}", clause);
        assert!(!clause.contains("is_active"));
    }
}
