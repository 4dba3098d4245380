//! Stock service: listings, ledger history and manual movements.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::lifecycle;
use crate::domain::{Actor, StockHistoryEntry, StockLevel, StockOverview};
use crate::dto::stock::{AdjustStockRequest, StockChangeRequest, UpdateStockRequest};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StockService: Send + Sync {
    async fn list_stock(
        &self,
        search: Option<String>,
        low_stock: bool,
        params: PaginationParams,
    ) -> AppResult<Paginated<StockOverview>>;

    async fn history(
        &self,
        product_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<Paginated<StockHistoryEntry>>;

    async fn update_settings(
        &self,
        product_id: Uuid,
        request: UpdateStockRequest,
    ) -> AppResult<StockLevel>;

    async fn add(&self, actor: Actor, request: StockChangeRequest) -> AppResult<StockHistoryEntry>;

    async fn remove(&self, actor: Actor, request: StockChangeRequest)
        -> AppResult<StockHistoryEntry>;

    async fn adjust(&self, actor: Actor, request: AdjustStockRequest)
        -> AppResult<StockHistoryEntry>;
}

pub struct StockManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> StockManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> StockService for StockManager<U> {
    async fn list_stock(
        &self,
        search: Option<String>,
        low_stock: bool,
        params: PaginationParams,
    ) -> AppResult<Paginated<StockOverview>> {
        let (rows, total) = self.uow.stock().list(search, low_stock, params).await?;
        Ok(Paginated::new(rows, &params, total))
    }

    async fn history(
        &self,
        product_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<Paginated<StockHistoryEntry>> {
        self.uow
            .stock()
            .find_level(product_id)
            .await?
            .ok_or_not_found("Stock")?;
        let (entries, total) = self.uow.stock().history(product_id, params).await?;
        Ok(Paginated::new(entries, &params, total))
    }

    async fn update_settings(
        &self,
        product_id: Uuid,
        request: UpdateStockRequest,
    ) -> AppResult<StockLevel> {
        self.uow
            .stock()
            .update_settings(product_id, request.min_level, request.location)
            .await
    }

    async fn add(&self, actor: Actor, request: StockChangeRequest) -> AppResult<StockHistoryEntry> {
        let reason = request.reason();
        let (product_id, quantity) = (request.product_id, request.quantity);
        let entry = with_transaction!(self.uow, |ctx| {
            lifecycle::add_stock(&ctx.ledger(), product_id, quantity, reason, actor.id).await
        })?;
        tracing::info!(product_id = %product_id, quantity, by = %actor.id, "Stock added");
        Ok(entry)
    }

    async fn remove(
        &self,
        actor: Actor,
        request: StockChangeRequest,
    ) -> AppResult<StockHistoryEntry> {
        let reason = request.reason();
        let (product_id, quantity) = (request.product_id, request.quantity);
        let entry = with_transaction!(self.uow, |ctx| {
            lifecycle::remove_stock(&ctx.ledger(), product_id, quantity, reason, actor.id).await
        })?;
        tracing::info!(product_id = %product_id, quantity, by = %actor.id, "Stock removed");
        Ok(entry)
    }

    async fn adjust(
        &self,
        actor: Actor,
        request: AdjustStockRequest,
    ) -> AppResult<StockHistoryEntry> {
        let reason = request.reason();
        let (product_id, counted) = (request.product_id, request.counted_quantity);
        let entry = with_transaction!(self.uow, |ctx| {
            lifecycle::adjust_stock(&ctx.ledger(), product_id, counted, reason, actor.id).await
        })?;
        tracing::info!(
            product_id = %product_id,
            change = entry.quantity_change,
            by = %actor.id,
            "Stock adjusted"
        );
        Ok(entry)
    }
}
