//! Product catalogue entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::stock::StockLevel;

/// Product domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub barcode: Option<String>,
    pub description: Option<String>,
    pub selling_price: Decimal,
    pub cost_price: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Gross margin per unit
    pub fn margin(&self) -> Decimal {
        self.selling_price - self.cost_price
    }
}

/// Data for a new product, its stock row and the opening ledger entry
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub barcode: Option<String>,
    pub description: Option<String>,
    pub selling_price: Decimal,
    pub cost_price: Decimal,
    pub initial_quantity: i32,
    pub min_level: i32,
    pub location: Option<String>,
}

/// Partial product update. An empty `barcode` or `description` clears the column.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub description: Option<String>,
    pub selling_price: Option<Decimal>,
    pub cost_price: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ProductSort {
    Name,
    Sku,
    SellingPrice,
    CostPrice,
    #[default]
    CreatedAt,
    Quantity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filters for the product listing
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub low_stock: bool,
    pub include_inactive: bool,
    pub sort: ProductSort,
    pub order: SortOrder,
}

/// Product joined with its stock row, as returned to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: Uuid,
    #[schema(example = "Ceramic mug")]
    pub name: String,
    #[schema(example = "MUG-001")]
    pub sku: String,
    pub barcode: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = String, example = "150.00")]
    pub selling_price: Decimal,
    #[schema(value_type = String, example = "90.00")]
    pub cost_price: Decimal,
    pub is_active: bool,
    pub quantity: i32,
    pub min_level: i32,
    pub location: Option<String>,
    pub low_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductView {
    /// Combine a product with its stock row. A missing row reads as zero stock.
    pub fn new(product: Product, stock: Option<StockLevel>) -> Self {
        let (quantity, min_level, location, low_stock) = match stock {
            Some(s) => {
                let low = s.is_low();
                (s.quantity, s.min_level, s.location, low)
            }
            None => (0, 0, None, true),
        };

        Self {
            id: product.id,
            name: product.name,
            sku: product.sku,
            barcode: product.barcode,
            description: product.description,
            selling_price: product.selling_price,
            cost_price: product.cost_price,
            is_active: product.is_active,
            quantity,
            min_level,
            location,
            low_stock,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn mug() -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Mug".into(),
            sku: "MUG-1".into(),
            barcode: None,
            description: None,
            selling_price: dec!(150.00),
            cost_price: dec!(90.00),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_margin() {
        assert_eq!(mug().margin(), dec!(60.00));
    }

    #[test]
    fn test_view_flags_low_stock() {
        let product = mug();
        let stock = StockLevel {
            product_id: product.id,
            quantity: 3,
            min_level: 5,
            location: Some("A1".into()),
            last_updated: Utc::now(),
        };
        let view = ProductView::new(product, Some(stock));
        assert_eq!(view.quantity, 3);
        assert!(view.low_stock);
        assert_eq!(view.location.as_deref(), Some("A1"));
    }

    #[test]
    fn test_view_without_stock_row() {
        let view = ProductView::new(mug(), None);
        assert_eq!(view.quantity, 0);
        assert!(view.low_stock);
    }
}
