//! Stock levels and the append-only stock ledger.
//!
//! A `StockMovement` is computed before anything is written: it carries the
//! previous and new quantity, so the caller persists the stock row and the
//! history row from the same value.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Kind of ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    Add,
    Remove,
    Adjustment,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Add => "ADD",
            MovementType::Remove => "REMOVE",
            MovementType::Adjustment => "ADJUSTMENT",
        }
    }
}

impl FromStr for MovementType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADD" => Ok(MovementType::Add),
            "REMOVE" => Ok(MovementType::Remove),
            "ADJUSTMENT" => Ok(MovementType::Adjustment),
            other => Err(AppError::internal(format!("Unknown movement type: {}", other))),
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current stock of one product
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub product_id: Uuid,
    pub quantity: i32,
    pub min_level: i32,
    pub location: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl StockLevel {
    /// At or below the reorder threshold
    pub fn is_low(&self) -> bool {
        self.quantity <= self.min_level
    }
}

/// A quantity change that has been checked but not yet persisted
#[derive(Debug, Clone, PartialEq)]
pub struct StockMovement {
    pub product_id: Uuid,
    pub movement_type: MovementType,
    pub quantity_change: i32,
    pub previous_quantity: i32,
    pub new_quantity: i32,
    pub reason: Option<String>,
    pub created_by: Option<Uuid>,
}

impl StockMovement {
    /// Receive `quantity` units.
    pub fn addition(
        product_id: Uuid,
        previous: i32,
        quantity: i32,
        reason: Option<String>,
        created_by: Option<Uuid>,
    ) -> AppResult<Self> {
        if quantity <= 0 {
            return Err(AppError::validation("Quantity must be greater than 0"));
        }
        let new_quantity = previous
            .checked_add(quantity)
            .ok_or_else(|| AppError::validation("Stock quantity overflow"))?;

        Ok(Self {
            product_id,
            movement_type: MovementType::Add,
            quantity_change: quantity,
            previous_quantity: previous,
            new_quantity,
            reason,
            created_by,
        })
    }

    /// Take `quantity` units out. Stock never goes below zero.
    pub fn removal(
        product_id: Uuid,
        product_name: &str,
        previous: i32,
        quantity: i32,
        reason: Option<String>,
        created_by: Option<Uuid>,
    ) -> AppResult<Self> {
        if quantity <= 0 {
            return Err(AppError::validation("Quantity must be greater than 0"));
        }
        if quantity > previous {
            return Err(AppError::InsufficientStock {
                product: product_name.to_string(),
                available: previous,
                requested: quantity,
            });
        }

        Ok(Self {
            product_id,
            movement_type: MovementType::Remove,
            quantity_change: -quantity,
            previous_quantity: previous,
            new_quantity: previous - quantity,
            reason,
            created_by,
        })
    }

    /// Stock-take correction to an absolute counted quantity.
    pub fn adjustment(
        product_id: Uuid,
        previous: i32,
        counted: i32,
        reason: Option<String>,
        created_by: Option<Uuid>,
    ) -> AppResult<Self> {
        if counted < 0 {
            return Err(AppError::validation("Counted quantity cannot be negative"));
        }
        if counted == previous {
            return Err(AppError::validation(
                "Counted quantity matches current stock, nothing to adjust",
            ));
        }

        Ok(Self {
            product_id,
            movement_type: MovementType::Adjustment,
            quantity_change: counted - previous,
            previous_quantity: previous,
            new_quantity: counted,
            reason,
            created_by,
        })
    }
}

/// Persisted ledger row
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockHistoryEntry {
    pub id: Uuid,
    pub product_id: Uuid,
    pub movement_type: MovementType,
    pub quantity_change: i32,
    pub reason: Option<String>,
    pub previous_quantity: i32,
    pub new_quantity: i32,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Fold a product's ledger (oldest first) from zero and return the resulting quantity.
///
/// Fails if any entry breaks `new = previous + change` or does not start
/// where the previous entry ended.
pub fn replay<'a, I>(entries: I) -> AppResult<i32>
where
    I: IntoIterator<Item = &'a StockHistoryEntry>,
{
    entries.into_iter().try_fold(0i32, |running, entry| {
        if entry.previous_quantity != running
            || entry.previous_quantity + entry.quantity_change != entry.new_quantity
        {
            return Err(AppError::internal(format!(
                "Stock ledger for product {} is broken at entry {}",
                entry.product_id, entry.id
            )));
        }
        Ok(entry.new_quantity)
    })
}

/// Stock row joined with product identity for the stock listing
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockOverview {
    pub product_id: Uuid,
    pub product_name: String,
    pub sku: String,
    pub quantity: i32,
    pub min_level: i32,
    pub location: Option<String>,
    pub low_stock: bool,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(movement: &StockMovement) -> StockHistoryEntry {
        StockHistoryEntry {
            id: Uuid::new_v4(),
            product_id: movement.product_id,
            movement_type: movement.movement_type,
            quantity_change: movement.quantity_change,
            reason: movement.reason.clone(),
            previous_quantity: movement.previous_quantity,
            new_quantity: movement.new_quantity,
            created_by: movement.created_by,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_addition() {
        let id = Uuid::new_v4();
        let movement = StockMovement::addition(id, 7, 3, Some("restock".into()), None).unwrap();
        assert_eq!(movement.previous_quantity, 7);
        assert_eq!(movement.new_quantity, 10);
        assert_eq!(movement.quantity_change, 3);
        assert_eq!(movement.movement_type, MovementType::Add);
    }

    #[test]
    fn test_removal_rejects_more_than_available() {
        let err = StockMovement::removal(Uuid::new_v4(), "Mug", 10, 999, None, None).unwrap_err();
        match err {
            AppError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 10);
                assert_eq!(requested, 999);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_removal_to_zero_is_allowed() {
        let movement = StockMovement::removal(Uuid::new_v4(), "Mug", 4, 4, None, None).unwrap();
        assert_eq!(movement.new_quantity, 0);
        assert_eq!(movement.quantity_change, -4);
    }

    #[test]
    fn test_non_positive_quantities_rejected() {
        let id = Uuid::new_v4();
        assert!(StockMovement::addition(id, 1, 0, None, None).is_err());
        assert!(StockMovement::removal(id, "Mug", 5, -1, None, None).is_err());
    }

    #[test]
    fn test_adjustment_records_signed_delta() {
        let id = Uuid::new_v4();
        let down = StockMovement::adjustment(id, 10, 8, None, None).unwrap();
        assert_eq!(down.quantity_change, -2);
        let up = StockMovement::adjustment(id, 8, 12, None, None).unwrap();
        assert_eq!(up.quantity_change, 4);
        assert!(StockMovement::adjustment(id, 8, 8, None, None).is_err());
        assert!(StockMovement::adjustment(id, 8, -1, None, None).is_err());
    }

    #[test]
    fn test_replay_reproduces_quantity() {
        let id = Uuid::new_v4();
        let opening = StockMovement::addition(id, 0, 10, None, None).unwrap();
        let sold = StockMovement::removal(id, "Mug", 10, 3, None, None).unwrap();
        let returned = StockMovement::addition(id, 7, 3, None, None).unwrap();
        let counted = StockMovement::adjustment(id, 10, 9, None, None).unwrap();

        let ledger: Vec<_> = [opening, sold, returned, counted].iter().map(entry).collect();
        assert_eq!(replay(&ledger).unwrap(), 9);
    }

    #[test]
    fn test_replay_detects_gap() {
        let id = Uuid::new_v4();
        let first = StockMovement::addition(id, 0, 10, None, None).unwrap();
        let skipped = StockMovement::addition(id, 12, 1, None, None).unwrap();
        let ledger: Vec<_> = [first, skipped].iter().map(entry).collect();
        assert!(replay(&ledger).is_err());
    }

    #[test]
    fn test_low_stock_threshold_inclusive() {
        let level = StockLevel {
            product_id: Uuid::new_v4(),
            quantity: 5,
            min_level: 5,
            location: None,
            last_updated: Utc::now(),
        };
        assert!(level.is_low());
    }
}
