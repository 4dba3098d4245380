use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{default_limit, default_page, optional, trimmed};
use crate::domain::OrderReference;
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Pickup scan. Exactly one of `orderId` or `orderNumber` identifies the order.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateScanRequest {
    pub order_id: Option<Uuid>,
    #[validate(length(min = 1, max = 50, message = "Order number must be 1-50 characters"))]
    #[schema(example = "ORD-20240131-0001")]
    pub order_number: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Delivery company must be 1-100 characters"))]
    #[schema(example = "Yalidine")]
    pub delivery_company: String,
    #[validate(length(max = 100, message = "Tracking number is too long"))]
    pub tracking_number: Option<String>,
}

impl CreateScanRequest {
    pub fn reference(&self) -> AppResult<OrderReference> {
        match (self.order_id, optional(self.order_number.clone())) {
            (Some(id), None) => Ok(OrderReference::Id(id)),
            (None, Some(number)) => Ok(OrderReference::Number(number)),
            (Some(_), Some(_)) => Err(AppError::validation(
                "Provide either orderId or orderNumber, not both",
            )),
            (None, None) => Err(AppError::validation("orderId or orderNumber is required")),
        }
    }

    pub fn delivery_company(&self) -> String {
        trimmed(self.delivery_company.clone())
    }

    pub fn tracking_number(&self) -> Option<String> {
        optional(self.tracking_number.clone())
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ScanListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub delivery_company: Option<String>,
}

impl ScanListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }

    pub fn delivery_company(&self) -> Option<String> {
        optional(self.delivery_company.clone())
    }
}
