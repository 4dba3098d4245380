use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use super::base::contains_ci;
use super::entities::{order, scanned_order};
use crate::domain::ScannedOrder;
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ScanRepository: Send + Sync {
    /// Pickup scans, newest first
    async fn list(
        &self,
        delivery_company: Option<String>,
        params: PaginationParams,
    ) -> AppResult<(Vec<ScannedOrder>, u64)>;
}

pub struct ScanStore {
    db: DatabaseConnection,
}

impl ScanStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn scanned(scan: scanned_order::Model, order_number: String) -> ScannedOrder {
    ScannedOrder {
        id: scan.id,
        order_id: scan.order_id,
        order_number,
        delivery_company: scan.delivery_company,
        tracking_number: scan.tracking_number,
        scanned_by: scan.scanned_by,
        scanned_at: scan.scanned_at,
    }
}

#[async_trait]
impl ScanRepository for ScanStore {
    async fn list(
        &self,
        delivery_company: Option<String>,
        params: PaginationParams,
    ) -> AppResult<(Vec<ScannedOrder>, u64)> {
        let mut query = scanned_order::Entity::find().find_also_related(order::Entity);
        if let Some(company) = delivery_company.as_deref() {
            query = query.filter(contains_ci(scanned_order::Column::DeliveryCompany, company));
        }

        let paginator = query
            .order_by_desc(scanned_order::Column::ScannedAt)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let scans = paginator
            .fetch_page(params.index())
            .await?
            .into_iter()
            .map(|(scan, order)| {
                let number = order.map(|o| o.order_number).unwrap_or_default();
                scanned(scan, number)
            })
            .collect();

        Ok((scans, total))
    }
}
