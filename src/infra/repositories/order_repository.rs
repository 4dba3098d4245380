//! Order reads. Every write to an order goes through the ledger inside a
//! transaction.

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::base::search_any;
use super::entities::{order, order_item};
use crate::domain::{Order, OrderFilter, OrderItem, OrderWithItems};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Filtered listing, newest first
    async fn list(&self, filter: OrderFilter, params: PaginationParams) -> AppResult<(Vec<Order>, u64)>;

    /// Order with items. With `created_by` set, orders of other users are invisible.
    async fn find_with_items(&self, id: Uuid, created_by: Option<Uuid>) -> AppResult<Option<OrderWithItems>>;
}

pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Midnight UTC at the start of `day`
pub(crate) fn start_of(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Midnight UTC after `day`
pub(crate) fn end_of(day: NaiveDate) -> DateTime<Utc> {
    start_of(day.checked_add_days(Days::new(1)).unwrap_or(day))
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn list(&self, filter: OrderFilter, params: PaginationParams) -> AppResult<(Vec<Order>, u64)> {
        let mut query = order::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(order::Column::Status.eq(status.as_str()));
        }
        if let Some(payment) = filter.payment_status {
            query = query.filter(order::Column::PaymentStatus.eq(payment.as_str()));
        }
        if let Some(term) = filter.search.as_deref() {
            query = query.filter(search_any(
                &[
                    order::Column::OrderNumber,
                    order::Column::CustomerName,
                    order::Column::CustomerPhone,
                ],
                term,
            ));
        }
        if let Some(from) = filter.from {
            query = query.filter(order::Column::CreatedAt.gte(start_of(from)));
        }
        if let Some(to) = filter.to {
            query = query.filter(order::Column::CreatedAt.lt(end_of(to)));
        }
        if let Some(user_id) = filter.created_by {
            query = query.filter(order::Column::CreatedBy.eq(user_id));
        }

        let paginator = query
            .order_by_desc(order::Column::CreatedAt)
            .order_by_desc(order::Column::OrderNumber)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let orders = paginator
            .fetch_page(params.index())
            .await?
            .into_iter()
            .map(Order::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((orders, total))
    }

    async fn find_with_items(&self, id: Uuid, created_by: Option<Uuid>) -> AppResult<Option<OrderWithItems>> {
        let mut query = order::Entity::find_by_id(id);
        if let Some(user_id) = created_by {
            query = query.filter(order::Column::CreatedBy.eq(user_id));
        }

        let Some(model) = query.one(&self.db).await? else {
            return Ok(None);
        };

        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(id))
            .order_by_asc(order_item::Column::ProductId)
            .all(&self.db)
            .await?
            .into_iter()
            .map(OrderItem::from)
            .collect();

        Ok(Some(OrderWithItems {
            order: Order::try_from(model)?,
            items,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bounds_cover_whole_day() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(start_of(day).to_rfc3339(), "2024-01-31T00:00:00+00:00");
        assert_eq!(end_of(day).to_rfc3339(), "2024-02-01T00:00:00+00:00");
    }
}
