//! Per-product delivery outcome counters and warehouse pickup scans.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// One of the running counters kept per product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryCounter {
    InTransit,
    Delivered,
    Cancelled,
    Returned,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDeliveryStats {
    pub product_id: Uuid,
    pub total_orders: i32,
    pub delivered_orders: i32,
    pub cancelled_orders: i32,
    pub returned_orders: i32,
    pub in_transit_orders: i32,
    pub updated_at: DateTime<Utc>,
}

impl ProductDeliveryStats {
    pub fn empty(product_id: Uuid) -> Self {
        Self {
            product_id,
            total_orders: 0,
            delivered_orders: 0,
            cancelled_orders: 0,
            returned_orders: 0,
            in_transit_orders: 0,
            updated_at: Utc::now(),
        }
    }

    /// Add `delta` to a counter, never going below zero.
    pub fn apply(&mut self, counter: DeliveryCounter, delta: i32) {
        let slot = match counter {
            DeliveryCounter::InTransit => &mut self.in_transit_orders,
            DeliveryCounter::Delivered => &mut self.delivered_orders,
            DeliveryCounter::Cancelled => &mut self.cancelled_orders,
            DeliveryCounter::Returned => &mut self.returned_orders,
        };
        *slot = slot.saturating_add(delta).max(0);
        self.updated_at = Utc::now();
    }

    /// Share of placed orders that were delivered, in percent
    pub fn delivery_rate(&self) -> f64 {
        if self.total_orders == 0 {
            return 0.0;
        }
        f64::from(self.delivered_orders) * 100.0 / f64::from(self.total_orders)
    }
}

/// Counter changes for one product, applied as a single row update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsDelta {
    pub total_orders: i32,
    pub delivered_orders: i32,
    pub cancelled_orders: i32,
    pub returned_orders: i32,
    pub in_transit_orders: i32,
}

impl StatsDelta {
    pub fn placed() -> Self {
        Self {
            total_orders: 1,
            ..Self::default()
        }
    }

    /// Net change for leaving `release` and entering `record`.
    pub fn moved(release: Option<DeliveryCounter>, record: Option<DeliveryCounter>) -> Self {
        let mut delta = Self::default();
        if let Some(counter) = release {
            *delta.slot(counter) -= 1;
        }
        if let Some(counter) = record {
            *delta.slot(counter) += 1;
        }
        delta
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn slot(&mut self, counter: DeliveryCounter) -> &mut i32 {
        match counter {
            DeliveryCounter::InTransit => &mut self.in_transit_orders,
            DeliveryCounter::Delivered => &mut self.delivered_orders,
            DeliveryCounter::Cancelled => &mut self.cancelled_orders,
            DeliveryCounter::Returned => &mut self.returned_orders,
        }
    }

    /// Apply to a stats row with saturating decrements.
    pub fn apply_to(&self, stats: &mut ProductDeliveryStats) {
        stats.total_orders = stats.total_orders.saturating_add(self.total_orders).max(0);
        stats.apply(DeliveryCounter::Delivered, self.delivered_orders);
        stats.apply(DeliveryCounter::Cancelled, self.cancelled_orders);
        stats.apply(DeliveryCounter::Returned, self.returned_orders);
        stats.apply(DeliveryCounter::InTransit, self.in_transit_orders);
    }
}

/// Recorded warehouse pickup
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScannedOrder {
    pub id: Uuid,
    pub order_id: Uuid,
    pub order_number: String,
    #[schema(example = "Yalidine")]
    pub delivery_company: String,
    pub tracking_number: Option<String>,
    pub scanned_by: Uuid,
    pub scanned_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewScan {
    pub order_id: Uuid,
    pub delivery_company: String,
    pub tracking_number: Option<String>,
    pub scanned_by: Uuid,
}

/// How a scan names its order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderReference {
    Id(Uuid),
    Number(String),
}
