use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{default_limit, default_page, optional};
use crate::types::PaginationParams;

/// Manual stock receipt or removal
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockChangeRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[schema(example = 3)]
    pub quantity: i32,
    #[validate(length(max = 500, message = "Reason is too long"))]
    #[schema(example = "Supplier delivery")]
    pub reason: Option<String>,
}

impl StockChangeRequest {
    pub fn reason(&self) -> Option<String> {
        optional(self.reason.clone())
    }
}

/// Stock-take correction to an absolute count
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockRequest {
    pub product_id: Uuid,
    #[validate(range(min = 0, message = "Counted quantity cannot be negative"))]
    pub counted_quantity: i32,
    #[validate(length(max = 500, message = "Reason is too long"))]
    pub reason: Option<String>,
}

impl AdjustStockRequest {
    pub fn reason(&self) -> Option<String> {
        optional(self.reason.clone())
    }
}

/// Stock metadata; quantity changes go through the ledger endpoints
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockRequest {
    #[validate(range(min = 0, message = "Minimum level cannot be negative"))]
    pub min_level: Option<i32>,
    #[validate(length(max = 100, message = "Location is too long"))]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StockListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Matches product name or SKU
    pub search: Option<String>,
    pub low_stock: Option<bool>,
}

impl StockListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }

    pub fn search(&self) -> Option<String> {
        optional(self.search.clone())
    }
}
