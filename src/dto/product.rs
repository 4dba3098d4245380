use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    clearable, default_limit, default_page, non_negative, optional, trimmed,
    validate_non_negative,
};
use crate::config::DEFAULT_MIN_STOCK_LEVEL;
use crate::domain::{NewProduct, ProductChanges, ProductFilter, ProductSort, SortOrder};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    #[schema(example = "Ceramic mug")]
    pub name: String,
    #[validate(length(min = 1, max = 64, message = "SKU must be 1-64 characters"))]
    #[schema(example = "MUG-001")]
    pub sku: String,
    #[validate(length(max = 64, message = "Barcode must be at most 64 characters"))]
    #[schema(example = "6130000000012")]
    pub barcode: Option<String>,
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_non_negative"))]
    #[schema(value_type = String, example = "150.00")]
    pub selling_price: Decimal,
    #[validate(custom(function = "validate_non_negative"))]
    #[schema(value_type = String, example = "90.00")]
    pub cost_price: Decimal,
    #[validate(range(min = 0, message = "Initial quantity cannot be negative"))]
    pub initial_quantity: Option<i32>,
    #[validate(range(min = 0, message = "Minimum level cannot be negative"))]
    pub min_level: Option<i32>,
    #[validate(length(max = 100, message = "Location is too long"))]
    pub location: Option<String>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        NewProduct {
            name: trimmed(request.name),
            sku: trimmed(request.sku),
            barcode: optional(request.barcode),
            description: optional(request.description),
            selling_price: request.selling_price,
            cost_price: request.cost_price,
            initial_quantity: request.initial_quantity.unwrap_or(0),
            min_level: request.min_level.unwrap_or(DEFAULT_MIN_STOCK_LEVEL),
            location: optional(request.location),
        }
    }
}

/// Partial update. Send an empty barcode or description to clear it.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 64, message = "SKU must be 1-64 characters"))]
    pub sku: Option<String>,
    #[validate(length(max = 64, message = "Barcode must be at most 64 characters"))]
    pub barcode: Option<String>,
    #[validate(length(max = 2000, message = "Description is too long"))]
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub selling_price: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub cost_price: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl UpdateProductRequest {
    pub fn into_changes(self) -> AppResult<ProductChanges> {
        Ok(ProductChanges {
            name: self.name.map(trimmed),
            sku: self.sku.map(trimmed),
            barcode: clearable(self.barcode),
            description: clearable(self.description),
            selling_price: non_negative("sellingPrice", self.selling_price)?,
            cost_price: non_negative("costPrice", self.cost_price)?,
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Matches name, SKU or barcode
    pub search: Option<String>,
    #[param(value_type = Option<String>)]
    pub sort: Option<ProductSort>,
    #[param(value_type = Option<String>)]
    pub order: Option<SortOrder>,
    pub low_stock: Option<bool>,
    pub include_inactive: Option<bool>,
}

impl ProductListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.limit)
    }

    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            search: optional(self.search.clone()),
            low_stock: self.low_stock.unwrap_or(false),
            include_inactive: self.include_inactive.unwrap_or(false),
            sort: self.sort.unwrap_or_default(),
            order: self.order.unwrap_or_default(),
        }
    }
}

/// Barcode or SKU scanned at a counter
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LookupQuery {
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
}

/// Columns that every import file must carry
pub const CSV_REQUIRED_COLUMNS: [&str; 4] = ["name", "sku", "sellingPrice", "costPrice"];

/// One data row of a product import file
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CsvProductRow {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 64, message = "SKU must be 1-64 characters"))]
    pub sku: String,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(custom(function = "validate_non_negative"))]
    pub selling_price: Decimal,
    #[validate(custom(function = "validate_non_negative"))]
    pub cost_price: Decimal,
    #[serde(default)]
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Minimum level cannot be negative"))]
    pub min_level: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
}

impl From<CsvProductRow> for NewProduct {
    fn from(row: CsvProductRow) -> Self {
        NewProduct {
            name: trimmed(row.name),
            sku: trimmed(row.sku),
            barcode: optional(row.barcode),
            description: optional(row.description),
            selling_price: row.selling_price,
            cost_price: row.cost_price,
            initial_quantity: row.quantity.unwrap_or(0),
            min_level: row.min_level.unwrap_or(DEFAULT_MIN_STOCK_LEVEL),
            location: optional(row.location),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_negative_price_rejected() {
        let request: CreateProductRequest = serde_json::from_str(
            r#"{"name":"Mug","sku":"MUG-1","sellingPrice":"-1","costPrice":"0"}"#,
        )
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("selling_price"));
    }

    #[test]
    fn test_create_defaults() {
        let request: CreateProductRequest = serde_json::from_str(
            r#"{"name":" Mug ","sku":"MUG-1","barcode":"","sellingPrice":100,"costPrice":"50.00"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());

        let product = NewProduct::from(request);
        assert_eq!(product.name, "Mug");
        assert_eq!(product.barcode, None);
        assert_eq!(product.selling_price, dec!(100));
        assert_eq!(product.initial_quantity, 0);
        assert_eq!(product.min_level, DEFAULT_MIN_STOCK_LEVEL);
    }

    #[test]
    fn test_update_rejects_negative_cost() {
        let request = UpdateProductRequest {
            name: None,
            sku: None,
            barcode: None,
            description: None,
            selling_price: None,
            cost_price: Some(dec!(-5)),
            is_active: None,
        };
        assert!(request.into_changes().is_err());
    }

    #[test]
    fn test_csv_row_parses_optional_columns() {
        let data = "name,sku,sellingPrice,costPrice,quantity\nMug,MUG-1,100,50,\nCup,CUP-1,80,40,7\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let rows: Vec<CsvProductRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].quantity, None);
        assert_eq!(rows[1].quantity, Some(7));
        assert_eq!(rows[1].selling_price, dec!(80));
    }
}
