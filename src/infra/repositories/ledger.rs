//! The inventory ledger port and its transactional implementation.
//!
//! Every compound mutation (placing an order, changing its status, a pickup
//! scan, a manual stock movement) reads and writes through `InventoryLedger`
//! so that all of it happens inside one database transaction. Rows that are
//! about to change are read with `FOR UPDATE`.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, Statement,
};
use std::collections::HashMap;
use uuid::Uuid;

use super::entities::{delivery_stats, order, order_item, product, scanned_order, stock, stock_history};
use super::scan_repository::scanned;
use crate::config::ORDER_NUMBER_PREFIX;
use crate::domain::{
    NewOrder, NewScan, Order, OrderItem, OrderStatus, OrderWithItems, PaymentStatus,
    ProductDeliveryStats, ScannedOrder, StatsDelta, StockHistoryEntry, StockMovement,
    StockedProduct,
};
use crate::errors::{AppError, AppResult, OptionExt};

/// Reads and writes of the order lifecycle, scoped to one transaction.
#[async_trait]
pub trait InventoryLedger: Send + Sync {
    /// Active products among `ids` with their stock, stock rows locked in id order.
    /// Unknown or inactive ids are simply absent from the result.
    async fn lock_products(&self, ids: &[Uuid]) -> AppResult<Vec<StockedProduct>>;

    /// One product's stock row, locked, whether the product is active or not
    async fn lock_stock(&self, product_id: Uuid) -> AppResult<Option<StockedProduct>>;

    /// Persist a checked movement: new quantity on the stock row plus a ledger row
    async fn record_movement(&self, movement: StockMovement) -> AppResult<StockHistoryEntry>;

    /// Same-day sequence for the next order number, serialized per day
    async fn next_order_sequence(&self, day: NaiveDate) -> AppResult<u32>;

    /// Insert a PENDING, UNPAID order with its items
    async fn insert_order(&self, order: NewOrder) -> AppResult<OrderWithItems>;

    async fn find_order_id(&self, order_number: &str) -> AppResult<Option<Uuid>>;

    /// Order with items, the order row locked
    async fn lock_order(&self, id: Uuid) -> AppResult<Option<OrderWithItems>>;

    async fn set_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        payment_status: Option<PaymentStatus>,
    ) -> AppResult<Order>;

    /// Apply counter changes to a product's stats row, creating it when missing
    async fn adjust_delivery_stats(
        &self,
        product_id: Uuid,
        delta: StatsDelta,
    ) -> AppResult<ProductDeliveryStats>;

    async fn is_scanned(&self, order_id: Uuid) -> AppResult<bool>;

    async fn insert_scan(&self, scan: NewScan, order_number: &str) -> AppResult<ScannedOrder>;
}

/// `InventoryLedger` over a live database transaction
pub struct TxLedger<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxLedger<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }
}

/// Stock rows of `ids`, each once, locked in product-id order
fn locked_levels(ids: &[Uuid]) -> Select<stock::Entity> {
    let mut ids = ids.to_vec();
    ids.sort();
    ids.dedup();

    stock::Entity::find()
        .filter(stock::Column::ProductId.is_in(ids))
        .order_by_asc(stock::Column::ProductId)
        .lock_exclusive()
}

/// Shared prefix of every order number issued on `day`
fn order_prefix(day: NaiveDate) -> String {
    format!("{}-{}-", ORDER_NUMBER_PREFIX, day.format("%Y%m%d"))
}

fn stats_model(stats: &ProductDeliveryStats) -> delivery_stats::ActiveModel {
    delivery_stats::ActiveModel {
        product_id: Set(stats.product_id),
        total_orders: Set(stats.total_orders),
        delivered_orders: Set(stats.delivered_orders),
        cancelled_orders: Set(stats.cancelled_orders),
        returned_orders: Set(stats.returned_orders),
        in_transit_orders: Set(stats.in_transit_orders),
        updated_at: Set(stats.updated_at),
    }
}

#[async_trait]
impl InventoryLedger for TxLedger<'_> {
    async fn lock_products(&self, ids: &[Uuid]) -> AppResult<Vec<StockedProduct>> {
        let levels = locked_levels(ids).all(self.txn).await?;

        let products: HashMap<Uuid, product::Model> = product::Entity::find()
            .filter(product::Column::Id.is_in(ids.iter().copied()))
            .filter(product::Column::IsActive.eq(true))
            .all(self.txn)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(levels
            .into_iter()
            .filter_map(|level| {
                products.get(&level.product_id).map(|p| StockedProduct {
                    product_id: p.id,
                    name: p.name.clone(),
                    selling_price: p.selling_price,
                    quantity: level.quantity,
                })
            })
            .collect())
    }

    async fn lock_stock(&self, product_id: Uuid) -> AppResult<Option<StockedProduct>> {
        let Some(level) = stock::Entity::find_by_id(product_id)
            .lock_exclusive()
            .one(self.txn)
            .await?
        else {
            return Ok(None);
        };

        let product = product::Entity::find_by_id(product_id)
            .one(self.txn)
            .await?
            .ok_or_not_found("Product")?;

        Ok(Some(StockedProduct {
            product_id,
            name: product.name,
            selling_price: product.selling_price,
            quantity: level.quantity,
        }))
    }

    async fn record_movement(&self, movement: StockMovement) -> AppResult<StockHistoryEntry> {
        let now = Utc::now();

        stock::ActiveModel {
            product_id: Set(movement.product_id),
            quantity: Set(movement.new_quantity),
            last_updated: Set(now),
            ..Default::default()
        }
        .update(self.txn)
        .await?;

        let entry = stock_history::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(movement.product_id),
            quantity_change: Set(movement.quantity_change),
            movement_type: Set(movement.movement_type.as_str().to_string()),
            reason: Set(movement.reason),
            previous_quantity: Set(movement.previous_quantity),
            new_quantity: Set(movement.new_quantity),
            created_by: Set(movement.created_by),
            created_at: Set(now),
        }
        .insert(self.txn)
        .await?;

        tracing::debug!(
            product_id = %movement.product_id,
            movement = %movement.movement_type,
            change = movement.quantity_change,
            new_quantity = movement.new_quantity,
            "Stock movement recorded"
        );

        StockHistoryEntry::try_from(entry)
    }

    async fn next_order_sequence(&self, day: NaiveDate) -> AppResult<u32> {
        // Transaction-scoped lock: released on commit or rollback
        let backend = self.txn.get_database_backend();
        self.txn
            .execute(Statement::from_sql_and_values(
                backend,
                "SELECT pg_advisory_xact_lock($1)",
                [i64::from(day.num_days_from_ce()).into()],
            ))
            .await?;

        let prefix = order_prefix(day);
        let issued = order::Entity::find()
            .filter(order::Column::OrderNumber.starts_with(prefix.as_str()))
            .count(self.txn)
            .await?;

        u32::try_from(issued + 1).map_err(|_| AppError::internal("Order sequence overflow"))
    }

    async fn insert_order(&self, new_order: NewOrder) -> AppResult<OrderWithItems> {
        let now = Utc::now();
        let order_id = Uuid::new_v4();

        let model = order::ActiveModel {
            id: Set(order_id),
            order_number: Set(new_order.order_number),
            customer_name: Set(new_order.customer_name),
            customer_phone: Set(new_order.customer_phone),
            customer_address: Set(new_order.customer_address),
            customer_city: Set(new_order.customer_city),
            notes: Set(new_order.notes),
            delivery_price: Set(new_order.delivery_price),
            total_amount: Set(new_order.total_amount),
            status: Set(OrderStatus::Pending.as_str().to_string()),
            payment_status: Set(PaymentStatus::Unpaid.as_str().to_string()),
            created_by: Set(Some(new_order.created_by)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.txn)
        .await?;

        let mut items = Vec::with_capacity(new_order.items.len());
        for item in new_order.items {
            let saved = order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                product_id: Set(item.product_id),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                subtotal: Set(item.subtotal),
            }
            .insert(self.txn)
            .await?;
            items.push(OrderItem::from(saved));
        }

        Ok(OrderWithItems {
            order: Order::try_from(model)?,
            items,
        })
    }

    async fn find_order_id(&self, order_number: &str) -> AppResult<Option<Uuid>> {
        let model = order::Entity::find()
            .filter(order::Column::OrderNumber.eq(order_number))
            .one(self.txn)
            .await?;
        Ok(model.map(|m| m.id))
    }

    async fn lock_order(&self, id: Uuid) -> AppResult<Option<OrderWithItems>> {
        let Some(model) = order::Entity::find_by_id(id)
            .lock_exclusive()
            .one(self.txn)
            .await?
        else {
            return Ok(None);
        };

        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(id))
            .order_by_asc(order_item::Column::ProductId)
            .all(self.txn)
            .await?
            .into_iter()
            .map(OrderItem::from)
            .collect();

        Ok(Some(OrderWithItems {
            order: Order::try_from(model)?,
            items,
        }))
    }

    async fn set_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
        payment_status: Option<PaymentStatus>,
    ) -> AppResult<Order> {
        let mut active = order::ActiveModel {
            id: Set(id),
            status: Set(status.as_str().to_string()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(payment) = payment_status {
            active.payment_status = Set(payment.as_str().to_string());
        }

        let model = active.update(self.txn).await?;
        Order::try_from(model)
    }

    async fn adjust_delivery_stats(
        &self,
        product_id: Uuid,
        delta: StatsDelta,
    ) -> AppResult<ProductDeliveryStats> {
        let existing = delivery_stats::Entity::find_by_id(product_id)
            .lock_exclusive()
            .one(self.txn)
            .await?;

        let is_new = existing.is_none();
        let mut stats = existing
            .map(ProductDeliveryStats::from)
            .unwrap_or_else(|| ProductDeliveryStats::empty(product_id));
        delta.apply_to(&mut stats);
        stats.updated_at = Utc::now();

        let active = stats_model(&stats);
        let saved = if is_new {
            active.insert(self.txn).await?
        } else {
            active.update(self.txn).await?
        };

        Ok(ProductDeliveryStats::from(saved))
    }

    async fn is_scanned(&self, order_id: Uuid) -> AppResult<bool> {
        let count = scanned_order::Entity::find()
            .filter(scanned_order::Column::OrderId.eq(order_id))
            .count(self.txn)
            .await?;
        Ok(count > 0)
    }

    async fn insert_scan(&self, scan: NewScan, order_number: &str) -> AppResult<ScannedOrder> {
        let model = scanned_order::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(scan.order_id),
            delivery_company: Set(scan.delivery_company),
            tracking_number: Set(scan.tracking_number),
            scanned_by: Set(scan.scanned_by),
            scanned_at: Set(Utc::now()),
        }
        .insert(self.txn)
        .await?;

        Ok(scanned(model, order_number.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_stock_rows_are_locked_in_id_order() {
        let low = Uuid::from_u128(1);
        let high = Uuid::from_u128(2);

        let sql = locked_levels(&[high, low, high])
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.ends_with("FOR UPDATE"), "{}", sql);
        assert!(sql.contains(r#"ORDER BY "stock"."product_id" ASC"#), "{}", sql);
        assert_eq!(sql.matches(&high.to_string()).count(), 1);
        let (at_low, at_high) = (sql.find(&low.to_string()), sql.find(&high.to_string()));
        assert!(at_low.is_some() && at_low < at_high);
    }

    #[test]
    fn test_order_prefix() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(order_prefix(day), "ORD-20240131-");
    }
}
