//! Orders: status machine, pricing and order numbering.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::delivery::DeliveryCounter;
use crate::config::{ORDER_NUMBER_PREFIX, ORDER_SEQUENCE_WIDTH};
use crate::errors::{AppError, AppResult};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    PickedUp,
    InTransit,
    OutForDelivery,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::PickedUp,
        OrderStatus::InTransit,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Returned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::PickedUp => "PICKED_UP",
            OrderStatus::InTransit => "IN_TRANSIT",
            OrderStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Returned => "RETURNED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Returned
        )
    }

    /// Delivery-stats counter that tracks orders sitting in this status
    pub fn counter(&self) -> Option<DeliveryCounter> {
        match self {
            OrderStatus::InTransit => Some(DeliveryCounter::InTransit),
            OrderStatus::Delivered => Some(DeliveryCounter::Delivered),
            OrderStatus::Cancelled => Some(DeliveryCounter::Cancelled),
            OrderStatus::Returned => Some(DeliveryCounter::Returned),
            _ => None,
        }
    }

    /// Non-terminal orders may move to any other status. Terminal orders are
    /// final, except a delivered order that comes back.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if *self == next {
            return false;
        }
        match self {
            OrderStatus::Delivered => next == OrderStatus::Returned,
            OrderStatus::Cancelled | OrderStatus::Returned => false,
            _ => true,
        }
    }

    /// Compute every side effect of moving from `self` to `next`.
    pub fn plan_transition(self, next: OrderStatus) -> AppResult<TransitionPlan> {
        if !self.can_transition_to(next) {
            return Err(AppError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            });
        }

        let payment_status = match next {
            OrderStatus::Delivered => Some(PaymentStatus::Paid),
            OrderStatus::Returned => Some(PaymentStatus::Refunded),
            _ => None,
        };

        Ok(TransitionPlan {
            from: self,
            to: next,
            release: self.counter(),
            record: next.counter(),
            payment_status,
            restock: next == OrderStatus::Returned,
        })
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown order status: {}", s)))
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "UNPAID",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNPAID" => Ok(PaymentStatus::Unpaid),
            "PAID" => Ok(PaymentStatus::Paid),
            "REFUNDED" => Ok(PaymentStatus::Refunded),
            other => Err(AppError::validation(format!("Unknown payment status: {}", other))),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side effects of a status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub from: OrderStatus,
    pub to: OrderStatus,
    /// Counter to decrement for every product on the order
    pub release: Option<DeliveryCounter>,
    /// Counter to increment for every product on the order
    pub record: Option<DeliveryCounter>,
    pub payment_status: Option<PaymentStatus>,
    /// Put every item back into stock
    pub restock: bool,
}

/// Order domain entity
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    #[schema(example = "ORD-20240131-0001")]
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_city: Option<String>,
    pub notes: Option<String>,
    #[schema(value_type = String, example = "20.00")]
    pub delivery_price: Decimal,
    #[schema(value_type = String, example = "320.00")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable order line
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    #[schema(value_type = String, example = "100.00")]
    pub unit_price: Decimal,
    #[schema(value_type = String, example = "300.00")]
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Requested product and quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Customer-facing fields of an order request
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_city: Option<String>,
    pub notes: Option<String>,
    pub delivery_price: Decimal,
    pub lines: Vec<OrderLine>,
}

/// Product price and stock as seen under lock during order placement
#[derive(Debug, Clone, PartialEq)]
pub struct StockedProduct {
    pub product_id: Uuid,
    pub name: String,
    pub selling_price: Decimal,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub available: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    pub total_amount: Decimal,
}

/// Row data for a new order and its items
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_city: Option<String>,
    pub notes: Option<String>,
    pub delivery_price: Decimal,
    pub total_amount: Decimal,
    pub created_by: Uuid,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Filters for the order listing
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Restrict to orders created by this user
    pub created_by: Option<Uuid>,
}

/// Merge duplicate products by summing quantities, keeping first-seen order.
pub fn merge_lines(lines: &[OrderLine]) -> AppResult<Vec<OrderLine>> {
    let mut merged: Vec<OrderLine> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.quantity <= 0 {
            return Err(AppError::validation("Quantity must be at least 1"));
        }
        match merged.iter_mut().find(|m| m.product_id == line.product_id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(line.quantity)
                    .ok_or_else(|| AppError::validation("Quantity is too large"))?;
            }
            None => merged.push(*line),
        }
    }
    Ok(merged)
}

/// Price requested lines against locked catalogue rows.
///
/// Every missing product is reported at once; the first line that exceeds
/// available stock rejects the whole order.
pub fn price_order(
    lines: &[OrderLine],
    catalog: &[StockedProduct],
    delivery_price: Decimal,
) -> AppResult<PricedOrder> {
    let by_id: HashMap<Uuid, &StockedProduct> =
        catalog.iter().map(|p| (p.product_id, p)).collect();

    let missing: Vec<String> = lines
        .iter()
        .filter(|line| !by_id.contains_key(&line.product_id))
        .map(|line| line.product_id.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::not_found(format!(
            "Products [{}]",
            missing.join(", ")
        )));
    }

    let mut priced = Vec::with_capacity(lines.len());
    let mut total_amount = delivery_price;

    for line in lines {
        let product = by_id[&line.product_id];
        if product.quantity < line.quantity {
            return Err(AppError::InsufficientStock {
                product: product.name.clone(),
                available: product.quantity,
                requested: line.quantity,
            });
        }

        let subtotal = product.selling_price * Decimal::from(line.quantity);
        total_amount += subtotal;
        priced.push(PricedLine {
            product_id: line.product_id,
            product_name: product.name.clone(),
            quantity: line.quantity,
            available: product.quantity,
            unit_price: product.selling_price,
            subtotal,
        });
    }

    Ok(PricedOrder {
        lines: priced,
        total_amount,
    })
}

/// `ORD-YYYYMMDD-NNNN` for the `sequence`-th order of `day`.
pub fn order_number(day: NaiveDate, sequence: u32) -> String {
    format!(
        "{}-{}-{:0width$}",
        ORDER_NUMBER_PREFIX,
        day.format("%Y%m%d"),
        sequence,
        width = ORDER_SEQUENCE_WIDTH
    )
}

/// Ledger reason for stock taken by an order
pub fn sale_reason(order_number: &str) -> String {
    format!("Order {}", order_number)
}

/// Ledger reason for stock returned by an order
pub fn return_reason(order_number: &str) -> String {
    format!("Order {} returned", order_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn stocked(id: Uuid, price: Decimal, quantity: i32) -> StockedProduct {
        StockedProduct {
            product_id: id,
            name: "Mug".into(),
            selling_price: price,
            quantity,
        }
    }

    #[test]
    fn test_price_order_total_includes_delivery() {
        let id = Uuid::new_v4();
        let lines = [OrderLine {
            product_id: id,
            quantity: 3,
        }];
        let priced = price_order(&lines, &[stocked(id, dec!(100), 10)], dec!(20)).unwrap();

        assert_eq!(priced.total_amount, dec!(320));
        assert_eq!(priced.lines[0].subtotal, dec!(300));
        assert_eq!(priced.lines[0].unit_price, dec!(100));
    }

    #[test]
    fn test_price_order_rejects_insufficient_stock() {
        let id = Uuid::new_v4();
        let lines = [OrderLine {
            product_id: id,
            quantity: 999,
        }];
        let err = price_order(&lines, &[stocked(id, dec!(100), 10)], dec!(0)).unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientStock {
                available: 10,
                requested: 999,
                ..
            }
        ));
    }

    #[test]
    fn test_price_order_lists_every_missing_product() {
        let known = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let lines = [
            OrderLine { product_id: a, quantity: 1 },
            OrderLine { product_id: known, quantity: 1 },
            OrderLine { product_id: b, quantity: 1 },
        ];
        let err = price_order(&lines, &[stocked(known, dec!(1), 5)], dec!(0)).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(&a.to_string()));
        assert!(message.contains(&b.to_string()));
        assert!(!message.contains(&known.to_string()));
    }

    #[test]
    fn test_merge_lines_sums_duplicates() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let merged = merge_lines(&[
            OrderLine { product_id: a, quantity: 2 },
            OrderLine { product_id: b, quantity: 1 },
            OrderLine { product_id: a, quantity: 3 },
        ])
        .unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], OrderLine { product_id: a, quantity: 5 });
        assert_eq!(merged[1], OrderLine { product_id: b, quantity: 1 });
    }

    #[test]
    fn test_order_number_format() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(order_number(day, 1), "ORD-20240131-0001");
        assert_eq!(order_number(day, 12345), "ORD-20240131-12345");
    }

    #[test]
    fn test_plan_delivered_marks_paid() {
        let plan = OrderStatus::OutForDelivery
            .plan_transition(OrderStatus::Delivered)
            .unwrap();
        assert_eq!(plan.release, None);
        assert_eq!(plan.record, Some(DeliveryCounter::Delivered));
        assert_eq!(plan.payment_status, Some(PaymentStatus::Paid));
        assert!(!plan.restock);
    }

    #[test]
    fn test_plan_return_after_delivery() {
        let plan = OrderStatus::Delivered
            .plan_transition(OrderStatus::Returned)
            .unwrap();
        assert_eq!(plan.release, Some(DeliveryCounter::Delivered));
        assert_eq!(plan.record, Some(DeliveryCounter::Returned));
        assert_eq!(plan.payment_status, Some(PaymentStatus::Refunded));
        assert!(plan.restock);
    }

    #[test]
    fn test_plan_leaving_in_transit_releases_counter() {
        let plan = OrderStatus::InTransit
            .plan_transition(OrderStatus::Cancelled)
            .unwrap();
        assert_eq!(plan.release, Some(DeliveryCounter::InTransit));
        assert_eq!(plan.record, Some(DeliveryCounter::Cancelled));
        assert_eq!(plan.payment_status, None);
    }

    #[test]
    fn test_plan_confirm_has_no_side_effects() {
        let plan = OrderStatus::Pending
            .plan_transition(OrderStatus::Confirmed)
            .unwrap();
        assert_eq!(plan.release, None);
        assert_eq!(plan.record, None);
        assert_eq!(plan.payment_status, None);
        assert!(!plan.restock);
    }

    #[test]
    fn test_terminal_states_are_final() {
        assert!(OrderStatus::Cancelled.plan_transition(OrderStatus::Pending).is_err());
        assert!(OrderStatus::Returned.plan_transition(OrderStatus::Delivered).is_err());
        assert!(OrderStatus::Delivered.plan_transition(OrderStatus::Cancelled).is_err());
        assert!(OrderStatus::Pending.plan_transition(OrderStatus::Pending).is_err());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::OutForDelivery).unwrap(),
            "\"OUT_FOR_DELIVERY\""
        );
        assert_eq!("PICKED_UP".parse::<OrderStatus>().unwrap(), OrderStatus::PickedUp);
    }
}
