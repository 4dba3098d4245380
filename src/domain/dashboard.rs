//! Dashboard aggregates.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::order::OrderStatus;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

/// Raw totals gathered by the repository for one date range
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryFigures {
    pub revenue: Decimal,
    pub cost_of_goods: Decimal,
    pub charges: Decimal,
    pub salaries: Decimal,
    pub ad_spend: Decimal,
    pub status_counts: Vec<(OrderStatus, i64)>,
    pub product_count: i64,
    pub low_stock_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Sum of delivered order totals
    #[schema(value_type = String)]
    pub revenue: Decimal,
    /// Cost price of the goods on delivered orders
    #[schema(value_type = String)]
    pub cost_of_goods: Decimal,
    #[schema(value_type = String)]
    pub total_charges: Decimal,
    #[schema(value_type = String)]
    pub total_salaries: Decimal,
    #[schema(value_type = String)]
    pub total_ad_spend: Decimal,
    #[schema(value_type = String)]
    pub total_expenses: Decimal,
    #[schema(value_type = String)]
    pub net_profit: Decimal,
    pub total_orders: i64,
    /// One entry per status, zero counts included
    pub orders_by_status: Vec<StatusCount>,
    pub product_count: i64,
    pub low_stock_count: i64,
}

impl DashboardSummary {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>, figures: SummaryFigures) -> Self {
        let orders_by_status: Vec<StatusCount> = OrderStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: figures
                    .status_counts
                    .iter()
                    .find(|(s, _)| *s == status)
                    .map_or(0, |(_, count)| *count),
            })
            .collect();
        let total_orders = orders_by_status.iter().map(|s| s.count).sum();
        let total_expenses = figures.charges + figures.salaries + figures.ad_spend;

        Self {
            from,
            to,
            net_profit: figures.revenue - figures.cost_of_goods - total_expenses,
            revenue: figures.revenue,
            cost_of_goods: figures.cost_of_goods,
            total_charges: figures.charges,
            total_salaries: figures.salaries,
            total_ad_spend: figures.ad_spend,
            total_expenses,
            total_orders,
            orders_by_status,
            product_count: figures.product_count,
            low_stock_count: figures.low_stock_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: Uuid,
    pub name: String,
    pub sku: String,
    pub quantity_sold: i64,
    #[schema(value_type = String)]
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    pub date: NaiveDate,
    pub orders: i64,
    #[schema(value_type = String)]
    pub revenue: Decimal,
}

/// One entry per day from `first` through `last`, zero where nothing sold.
pub fn fill_days(first: NaiveDate, last: NaiveDate, rows: &[DailySales]) -> Vec<DailySales> {
    let mut series = Vec::new();
    let mut day = first;
    while day <= last {
        let entry = rows.iter().find(|r| r.date == day).cloned().unwrap_or(DailySales {
            date: day,
            orders: 0,
            revenue: Decimal::ZERO,
        });
        series.push(entry);
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_summary_net_profit() {
        let summary = DashboardSummary::new(
            None,
            None,
            SummaryFigures {
                revenue: dec!(1000),
                cost_of_goods: dec!(400),
                charges: dec!(100),
                salaries: dec!(200),
                ad_spend: dec!(50),
                status_counts: vec![(OrderStatus::Delivered, 3), (OrderStatus::Pending, 2)],
                product_count: 4,
                low_stock_count: 1,
            },
        );

        assert_eq!(summary.total_expenses, dec!(350));
        assert_eq!(summary.net_profit, dec!(250));
        assert_eq!(summary.total_orders, 5);
        assert_eq!(summary.orders_by_status.len(), OrderStatus::ALL.len());
        let cancelled = summary
            .orders_by_status
            .iter()
            .find(|s| s.status == OrderStatus::Cancelled)
            .unwrap();
        assert_eq!(cancelled.count, 0);
    }

    #[test]
    fn test_fill_days_pads_missing_dates() {
        let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let rows = [DailySales {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            orders: 2,
            revenue: dec!(320),
        }];

        let series = fill_days(first, last, &rows);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].orders, 0);
        assert_eq!(series[1].revenue, dec!(320));
        assert_eq!(series[2].date, last);
    }
}
