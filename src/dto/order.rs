use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{default_limit, default_page, optional, trimmed, validate_non_negative, PHONE_REGEX};
use crate::domain::{OrderFilter, OrderLine, OrderStatus, PaymentStatus, PlaceOrder};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[schema(example = 3)]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 150, message = "Customer name must be 1-150 characters"))]
    #[schema(example = "Yacine M.")]
    pub customer_name: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    #[schema(example = "0555001122")]
    pub customer_phone: String,
    #[validate(length(min = 1, max = 500, message = "Address is required"))]
    pub customer_address: String,
    #[validate(length(max = 100, message = "City is too long"))]
    pub customer_city: Option<String>,
    #[validate(length(max = 1000, message = "Notes are too long"))]
    pub notes: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_non_negative"))]
    #[schema(value_type = String, example = "20.00")]
    pub delivery_price: Decimal,
    #[validate(length(min = 1, message = "Order must contain at least one item"), nested)]
    pub items: Vec<OrderItemRequest>,
}

impl From<CreateOrderRequest> for PlaceOrder {
    fn from(request: CreateOrderRequest) -> Self {
        PlaceOrder {
            customer_name: trimmed(request.customer_name),
            customer_phone: trimmed(request.customer_phone),
            customer_address: trimmed(request.customer_address),
            customer_city: optional(request.customer_city),
            notes: optional(request.notes),
            delivery_price: request.delivery_price,
            lines: request
                .items
                .into_iter()
                .map(|item| OrderLine {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[param(value_type = Option<String>)]
    pub status: Option<OrderStatus>,
    #[param(value_type = Option<String>)]
    pub payment_status: Option<PaymentStatus>,
    /// Matches order number, customer name or phone
    pub search: Option<String>,
    /// Created on or after this day
    pub from: Option<NaiveDate>,
    /// Created on or before this day
    pub to: Option<NaiveDate>,
}

impl OrderListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }

    pub fn filter(&self) -> AppResult<OrderFilter> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(AppError::validation("'from' must not be after 'to'"));
            }
        }
        Ok(OrderFilter {
            status: self.status,
            payment_status: self.payment_status,
            search: optional(self.search.clone()),
            from: self.from,
            to: self.to,
            created_by: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(items: &str) -> CreateOrderRequest {
        serde_json::from_str(&format!(
            r#"{{"customerName":"Yacine","customerPhone":"0555001122","customerAddress":"12 rue A","items":{}}}"#,
            items
        ))
        .unwrap()
    }

    #[test]
    fn test_delivery_price_defaults_to_zero() {
        let request = request(&format!(r#"[{{"productId":"{}","quantity":1}}]"#, Uuid::new_v4()));
        assert!(request.validate().is_ok());
        assert_eq!(request.delivery_price, dec!(0));
    }

    #[test]
    fn test_empty_items_rejected() {
        assert!(request("[]").validate().is_err());
    }

    #[test]
    fn test_nested_item_quantity_validated() {
        let request = request(&format!(r#"[{{"productId":"{}","quantity":0}}]"#, Uuid::new_v4()));
        let errors = request.validate().unwrap_err();
        assert!(errors.errors().contains_key("items"));
    }

    #[test]
    fn test_reversed_date_range_rejected() {
        let query = OrderListQuery {
            page: 1,
            limit: 20,
            status: None,
            payment_status: None,
            search: None,
            from: NaiveDate::from_ymd_opt(2024, 2, 1),
            to: NaiveDate::from_ymd_opt(2024, 1, 1),
        };
        assert!(query.filter().is_err());
    }
}
