//! Aggregate queries for the dashboard, written as SQL over the whole schema.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, FromQueryResult, Statement, Value,
};
use uuid::Uuid;

use super::order_repository::{end_of, start_of};
use crate::domain::{DailySales, DateRange, OrderStatus, SummaryFigures, TopProduct};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DashboardRepository: Send + Sync {
    async fn summary(&self, range: DateRange) -> AppResult<SummaryFigures>;

    /// Best sellers by quantity across orders that were not cancelled or returned
    async fn top_products(&self, limit: u64) -> AppResult<Vec<TopProduct>>;

    /// Per-day order count and revenue from `since` onwards (days without orders are absent)
    async fn daily_sales(&self, since: NaiveDate) -> AppResult<Vec<DailySales>>;
}

pub struct DashboardStore {
    db: DatabaseConnection,
}

impl DashboardStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn statement(&self, sql: &str, values: Vec<Value>) -> Statement {
        Statement::from_sql_and_values(self.db.get_database_backend(), sql, values)
    }

    async fn amount(&self, sql: &str, values: Vec<Value>) -> AppResult<Decimal> {
        let row = AmountRow::find_by_statement(self.statement(sql, values))
            .one(&self.db)
            .await?;
        Ok(row.map_or(Decimal::ZERO, |r| r.amount))
    }

    async fn count(&self, sql: &str) -> AppResult<i64> {
        let row = CountRow::find_by_statement(self.statement(sql, Vec::new()))
            .one(&self.db)
            .await?;
        Ok(row.map_or(0, |r| r.count))
    }
}

#[derive(Debug, FromQueryResult)]
struct AmountRow {
    amount: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    count: i64,
}

#[derive(Debug, FromQueryResult)]
struct StatusRow {
    status: String,
    count: i64,
}

#[derive(Debug, FromQueryResult)]
struct TopProductRow {
    product_id: Uuid,
    name: String,
    sku: String,
    quantity_sold: i64,
    revenue: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct DailyRow {
    day: NaiveDate,
    orders: i64,
    revenue: Decimal,
}

const DELIVERED_REVENUE: &str = "SELECT COALESCE(SUM(o.total_amount), 0) AS amount \
     FROM orders o \
     WHERE o.status = 'DELIVERED' \
       AND ($1::timestamptz IS NULL OR o.created_at >= $1) \
       AND ($2::timestamptz IS NULL OR o.created_at < $2)";

const DELIVERED_COST: &str = "SELECT COALESCE(SUM(oi.quantity * p.cost_price), 0) AS amount \
     FROM order_items oi \
     JOIN orders o ON o.id = oi.order_id \
     JOIN products p ON p.id = oi.product_id \
     WHERE o.status = 'DELIVERED' \
       AND ($1::timestamptz IS NULL OR o.created_at >= $1) \
       AND ($2::timestamptz IS NULL OR o.created_at < $2)";

const STATUS_COUNTS: &str = "SELECT o.status AS status, COUNT(*) AS count \
     FROM orders o \
     WHERE ($1::timestamptz IS NULL OR o.created_at >= $1) \
       AND ($2::timestamptz IS NULL OR o.created_at < $2) \
     GROUP BY o.status";

const CHARGES_TOTAL: &str = "SELECT COALESCE(SUM(amount), 0) AS amount FROM charges \
     WHERE ($1::date IS NULL OR charge_date >= $1) AND ($2::date IS NULL OR charge_date <= $2)";

const SALARIES_TOTAL: &str = "SELECT COALESCE(SUM(net_salary), 0) AS amount FROM salaries \
     WHERE ($1::date IS NULL OR period_end >= $1) AND ($2::date IS NULL OR period_end <= $2)";

const AD_SPEND_TOTAL: &str = "SELECT COALESCE(SUM(amount_spent), 0) AS amount FROM ad_costs \
     WHERE ($1::date IS NULL OR spend_date >= $1) AND ($2::date IS NULL OR spend_date <= $2)";

const ACTIVE_PRODUCTS: &str = "SELECT COUNT(*) AS count FROM products WHERE is_active";

const LOW_STOCK_PRODUCTS: &str = "SELECT COUNT(*) AS count \
     FROM stock s JOIN products p ON p.id = s.product_id \
     WHERE p.is_active AND s.quantity <= s.min_level";

const TOP_PRODUCTS: &str = "SELECT p.id AS product_id, p.name AS name, p.sku AS sku, \
            SUM(oi.quantity)::BIGINT AS quantity_sold, SUM(oi.subtotal) AS revenue \
     FROM order_items oi \
     JOIN orders o ON o.id = oi.order_id \
     JOIN products p ON p.id = oi.product_id \
     WHERE o.status NOT IN ('CANCELLED', 'RETURNED') \
     GROUP BY p.id, p.name, p.sku \
     ORDER BY quantity_sold DESC, revenue DESC \
     LIMIT $1";

const DAILY_SALES: &str = "SELECT (o.created_at AT TIME ZONE 'UTC')::date AS day, \
            COUNT(*) AS orders, COALESCE(SUM(o.total_amount), 0) AS revenue \
     FROM orders o \
     WHERE o.created_at >= $1 AND o.status NOT IN ('CANCELLED', 'RETURNED') \
     GROUP BY 1 \
     ORDER BY 1";

#[async_trait]
impl DashboardRepository for DashboardStore {
    async fn summary(&self, range: DateRange) -> AppResult<SummaryFigures> {
        let created = || -> Vec<Value> {
            vec![
                range.from.map(start_of).into(),
                range.to.map(end_of).into(),
            ]
        };
        let dated = || -> Vec<Value> { vec![range.from.into(), range.to.into()] };

        let status_rows = StatusRow::find_by_statement(self.statement(STATUS_COUNTS, created()))
            .all(&self.db)
            .await?;
        let mut status_counts = Vec::with_capacity(status_rows.len());
        for row in status_rows {
            match row.status.parse::<OrderStatus>() {
                Ok(status) => status_counts.push((status, row.count)),
                Err(_) => tracing::warn!(status = %row.status, "Skipping unknown order status"),
            }
        }

        let (revenue, cost_of_goods, charges, salaries, ad_spend) = tokio::try_join!(
            self.amount(DELIVERED_REVENUE, created()),
            self.amount(DELIVERED_COST, created()),
            self.amount(CHARGES_TOTAL, dated()),
            self.amount(SALARIES_TOTAL, dated()),
            self.amount(AD_SPEND_TOTAL, dated()),
        )?;
        let (product_count, low_stock_count) =
            tokio::try_join!(self.count(ACTIVE_PRODUCTS), self.count(LOW_STOCK_PRODUCTS))?;

        Ok(SummaryFigures {
            revenue,
            cost_of_goods,
            charges,
            salaries,
            ad_spend,
            status_counts,
            product_count,
            low_stock_count,
        })
    }

    async fn top_products(&self, limit: u64) -> AppResult<Vec<TopProduct>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = TopProductRow::find_by_statement(self.statement(TOP_PRODUCTS, vec![limit.into()]))
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| TopProduct {
                product_id: row.product_id,
                name: row.name,
                sku: row.sku,
                quantity_sold: row.quantity_sold,
                revenue: row.revenue,
            })
            .collect())
    }

    async fn daily_sales(&self, since: NaiveDate) -> AppResult<Vec<DailySales>> {
        let rows = DailyRow::find_by_statement(
            self.statement(DAILY_SALES, vec![start_of(since).into()]),
        )
        .all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| DailySales {
                date: row.day,
                orders: row.orders,
                revenue: row.revenue,
            })
            .collect())
    }
}
