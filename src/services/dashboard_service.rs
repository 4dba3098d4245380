//! Dashboard aggregates.

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use std::sync::Arc;

use crate::config::MAX_SALES_DAYS;
use crate::domain::dashboard::fill_days;
use crate::domain::{DailySales, DashboardSummary, DateRange, TopProduct};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

#[async_trait]
pub trait DashboardService: Send + Sync {
    async fn summary(&self, range: DateRange) -> AppResult<DashboardSummary>;

    async fn top_products(&self, limit: u64) -> AppResult<Vec<TopProduct>>;

    /// One entry per day for the last `days` days, today included
    async fn sales(&self, days: u32) -> AppResult<Vec<DailySales>>;
}

pub struct DashboardManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DashboardManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

/// First day of a `days`-long window ending on `today`.
pub fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
    let days = days.clamp(1, MAX_SALES_DAYS);
    today
        .checked_sub_days(Days::new(u64::from(days - 1)))
        .unwrap_or(today)
}

#[async_trait]
impl<U: UnitOfWork> DashboardService for DashboardManager<U> {
    async fn summary(&self, range: DateRange) -> AppResult<DashboardSummary> {
        let figures = self.uow.dashboard().summary(range).await?;
        Ok(DashboardSummary::new(range.from, range.to, figures))
    }

    async fn top_products(&self, limit: u64) -> AppResult<Vec<TopProduct>> {
        self.uow.dashboard().top_products(limit).await
    }

    async fn sales(&self, days: u32) -> AppResult<Vec<DailySales>> {
        let today = Utc::now().date_naive();
        let since = window_start(today, days);
        let rows = self.uow.dashboard().daily_sales(since).await?;
        Ok(fill_days(since, today, &rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_start() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(window_start(today, 1), today);
        assert_eq!(
            window_start(today, 7),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
        assert_eq!(window_start(today, 0), today);
        assert_eq!(
            window_start(today, 10_000),
            window_start(today, MAX_SALES_DAYS)
        );
    }
}
