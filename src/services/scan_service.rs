//! Warehouse pickup scans.

use async_trait::async_trait;
use std::sync::Arc;

use super::lifecycle;
use crate::domain::{Actor, OrderReference, ScannedOrder};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ScanService: Send + Sync {
    async fn scan(
        &self,
        actor: Actor,
        reference: OrderReference,
        delivery_company: String,
        tracking_number: Option<String>,
    ) -> AppResult<ScannedOrder>;

    async fn list_scans(
        &self,
        delivery_company: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<ScannedOrder>>;
}

pub struct ScanManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ScanManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ScanService for ScanManager<U> {
    async fn scan(
        &self,
        actor: Actor,
        reference: OrderReference,
        delivery_company: String,
        tracking_number: Option<String>,
    ) -> AppResult<ScannedOrder> {
        with_transaction!(self.uow, |ctx| {
            lifecycle::record_scan(
                &ctx.ledger(),
                reference,
                delivery_company,
                tracking_number,
                actor.id,
            )
            .await
        })
    }

    async fn list_scans(
        &self,
        delivery_company: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<ScannedOrder>> {
        let (scans, total) = self.uow.scans().list(delivery_company, params).await?;
        Ok(Paginated::new(scans, &params, total))
    }
}
