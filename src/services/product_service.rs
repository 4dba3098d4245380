//! Product catalogue service: CRUD, barcode/SKU lookup and CSV import.

use async_trait::async_trait;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::lifecycle;
use crate::domain::{
    Actor, NewProduct, Product, ProductChanges, ProductDeliveryStats, ProductFilter, ProductView,
};
use crate::dto::product::{CsvProductRow, CSV_REQUIRED_COLUMNS};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{TransactionContext, UnitOfWork};
use crate::types::{Paginated, PaginationParams};
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A rejected CSV data row
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ImportError {
    /// 1-based line in the file, header included
    pub line: u64,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ImportReport {
    pub imported: u64,
    pub errors: Vec<ImportError>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductService: Send + Sync {
    async fn list_products(
        &self,
        filter: ProductFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<ProductView>>;

    /// Get by id, inactive products included
    async fn get_product(&self, id: Uuid) -> AppResult<ProductView>;

    /// Find an active product by barcode or SKU
    async fn lookup(&self, code: &str) -> AppResult<ProductView>;

    /// Create a product with its stock row, stats row and opening stock
    async fn create_product(&self, actor: Actor, product: NewProduct) -> AppResult<ProductView>;

    async fn update_product(&self, id: Uuid, changes: ProductChanges) -> AppResult<ProductView>;

    async fn delete_product(&self, id: Uuid) -> AppResult<()>;

    async fn delivery_stats(&self, id: Uuid) -> AppResult<ProductDeliveryStats>;

    /// Create one product per CSV row, each in its own transaction
    async fn import_csv(&self, actor: Actor, data: Vec<u8>) -> AppResult<ImportReport>;
}

pub struct ProductManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProductManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn provision(&self, actor: Actor, product: NewProduct) -> AppResult<Product> {
        if product.initial_quantity < 0 {
            return Err(AppError::validation("Initial quantity cannot be negative"));
        }
        with_transaction!(self.uow, |ctx| provision_in(ctx, product, actor.id).await)
    }
}

async fn provision_in(
    ctx: TransactionContext<'_>,
    new_product: NewProduct,
    actor: Uuid,
) -> AppResult<Product> {
    let product = ctx.products().create(&new_product).await?;
    lifecycle::open_stock(&ctx.ledger(), product.id, new_product.initial_quantity, actor).await?;
    Ok(product)
}

/// Provision parsed rows one at a time. A failed row is reported and skipped.
async fn import_rows<F, Fut, T>(
    rows: Vec<(u64, NewProduct)>,
    mut errors: Vec<ImportError>,
    mut provision: F,
) -> ImportReport
where
    F: FnMut(NewProduct) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut imported = 0;
    for (line, product) in rows {
        match provision(product).await {
            Ok(_) => imported += 1,
            Err(e) => errors.push(ImportError {
                line,
                message: e.to_string(),
            }),
        }
    }
    errors.sort_by_key(|e| e.line);
    ImportReport { imported, errors }
}

/// Parse an import file into validated rows, keeping per-row failures.
pub fn parse_csv(data: &[u8]) -> AppResult<(Vec<(u64, NewProduct)>, Vec<ImportError>)> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| AppError::bad_request(format!("Unreadable CSV header: {}", e)))?
        .clone();
    let missing: Vec<&str> = CSV_REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::bad_request(format!(
            "Missing CSV column(s): {}",
            missing.join(", ")
        )));
    }

    let mut rows = Vec::new();
    let mut errors = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                errors.push(ImportError {
                    line,
                    message: e.to_string(),
                });
                continue;
            }
        };
        let line = record.position().map_or(0, |p| p.line());

        let row: CsvProductRow = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                errors.push(ImportError {
                    line,
                    message: e.to_string(),
                });
                continue;
            }
        };
        if let Err(e) = row.validate() {
            errors.push(ImportError {
                line,
                message: e.to_string(),
            });
            continue;
        }
        rows.push((line, NewProduct::from(row)));
    }

    Ok((rows, errors))
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductManager<U> {
    async fn list_products(
        &self,
        filter: ProductFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<ProductView>> {
        let (products, total) = self.uow.products().list(filter, params).await?;
        Ok(Paginated::new(products, &params, total))
    }

    async fn get_product(&self, id: Uuid) -> AppResult<ProductView> {
        self.uow
            .products()
            .find_view(id)
            .await?
            .ok_or_not_found("Product")
    }

    async fn lookup(&self, code: &str) -> AppResult<ProductView> {
        self.uow
            .products()
            .find_by_code(code.trim())
            .await?
            .ok_or_not_found("Product")
    }

    async fn create_product(&self, actor: Actor, product: NewProduct) -> AppResult<ProductView> {
        let created = self.provision(actor, product).await?;
        tracing::info!(product_id = %created.id, sku = %created.sku, "Product created");
        self.get_product(created.id).await
    }

    async fn update_product(&self, id: Uuid, changes: ProductChanges) -> AppResult<ProductView> {
        self.uow.products().update(id, changes).await
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        self.uow.products().deactivate(id).await?;
        tracing::info!(product_id = %id, "Product deactivated");
        Ok(())
    }

    async fn delivery_stats(&self, id: Uuid) -> AppResult<ProductDeliveryStats> {
        self.get_product(id).await?;
        Ok(self
            .uow
            .products()
            .delivery_stats(id)
            .await?
            .unwrap_or_else(|| ProductDeliveryStats::empty(id)))
    }

    async fn import_csv(&self, actor: Actor, data: Vec<u8>) -> AppResult<ImportReport> {
        let (rows, errors) = parse_csv(&data)?;
        let report =
            import_rows(rows, errors, move |product| self.provision(actor, product)).await;

        tracing::info!(
            imported = report.imported,
            rejected = report.errors.len(),
            "Product CSV import finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_csv_collects_row_errors() {
        let data = b"name,sku,sellingPrice,costPrice,quantity\n\
                     Mug,MUG-1,150.00,90.00,12\n\
                     ,EMPTY,1,1,\n\
                     Plate,PLT-1,abc,1,\n\
                     Bowl,BWL-1,80,40,\n";
        let (rows, errors) = parse_csv(data).unwrap();

        assert_eq!(rows.len(), 2);
        let (line, mug) = &rows[0];
        assert_eq!(*line, 2);
        assert_eq!(mug.sku, "MUG-1");
        assert_eq!(mug.selling_price, dec!(150.00));
        assert_eq!(mug.initial_quantity, 12);
        assert_eq!(rows[1].1.initial_quantity, 0);

        let lines: Vec<u64> = errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4]);
    }

    #[test]
    fn test_parse_csv_requires_columns() {
        let err = parse_csv(b"name,sku\nMug,MUG-1\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("sellingPrice"));
        assert!(message.contains("costPrice"));
    }

    #[tokio::test]
    async fn test_import_continues_past_rejected_rows() {
        let data = b"name,sku,sellingPrice,costPrice\n\
                     Mug,MUG-1,150,90\n\
                     Mug again,MUG-1,150,90\n\
                     ,NONAME,1,1\n\
                     Bowl,BWL-1,80,40\n";
        let (rows, errors) = parse_csv(data).unwrap();
        let mut skus = std::collections::HashSet::new();

        let report = import_rows(rows, errors, |product| {
            let fresh = skus.insert(product.sku.clone());
            async move {
                if fresh {
                    Ok(product.sku)
                } else {
                    Err(AppError::conflict("SKU"))
                }
            }
        })
        .await;

        assert_eq!(report.imported, 2);
        let lines: Vec<u64> = report.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4]);
        assert!(report.errors[0].message.contains("SKU"));
    }

    #[test]
    fn test_parse_csv_header_only() {
        let (rows, errors) = parse_csv(b"name,sku,sellingPrice,costPrice\n").unwrap();
        assert!(rows.is_empty());
        assert!(errors.is_empty());
    }
}
