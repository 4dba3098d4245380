//! Migration: Create products, stock, stock_history and product_delivery_stats.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Products::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Products::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Products::Sku).string_len(64).not_null().unique_key())
                    .col(ColumnDef::new(Products::Barcode).string_len(64).null().unique_key())
                    .col(ColumnDef::new(Products::Description).text().null())
                    .col(ColumnDef::new(Products::SellingPrice).decimal_len(12, 2).not_null())
                    .col(ColumnDef::new(Products::CostPrice).decimal_len(12, 2).not_null())
                    .col(
                        ColumnDef::new(Products::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Products::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Stock::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Stock::ProductId).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Stock::Quantity)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Stock::Quantity).gte(0)),
                    )
                    .col(ColumnDef::new(Stock::MinLevel).integer().not_null().default(0))
                    .col(ColumnDef::new(Stock::Location).string_len(100).null())
                    .col(
                        ColumnDef::new(Stock::LastUpdated)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_product_id")
                            .from(Stock::Table, Stock::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StockHistory::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(StockHistory::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(StockHistory::ProductId).uuid().not_null())
                    .col(ColumnDef::new(StockHistory::QuantityChange).integer().not_null())
                    .col(ColumnDef::new(StockHistory::MovementType).string_len(32).not_null())
                    .col(ColumnDef::new(StockHistory::Reason).string_len(500).null())
                    .col(ColumnDef::new(StockHistory::PreviousQuantity).integer().not_null())
                    .col(ColumnDef::new(StockHistory::NewQuantity).integer().not_null())
                    .col(ColumnDef::new(StockHistory::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(StockHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_history_product_id")
                            .from(StockHistory::Table, StockHistory::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_history_created_by")
                            .from(StockHistory::Table, StockHistory::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stock_history_product_created")
                    .table(StockHistory::Table)
                    .col(StockHistory::ProductId)
                    .col(StockHistory::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductDeliveryStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductDeliveryStats::ProductId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(counter(ProductDeliveryStats::TotalOrders))
                    .col(counter(ProductDeliveryStats::DeliveredOrders))
                    .col(counter(ProductDeliveryStats::CancelledOrders))
                    .col(counter(ProductDeliveryStats::ReturnedOrders))
                    .col(counter(ProductDeliveryStats::InTransitOrders))
                    .col(
                        ColumnDef::new(ProductDeliveryStats::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_delivery_stats_product_id")
                            .from(ProductDeliveryStats::Table, ProductDeliveryStats::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductDeliveryStats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StockHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Stock::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

/// Non-negative counter column
fn counter(column: ProductDeliveryStats) -> ColumnDef {
    ColumnDef::new(column)
        .integer()
        .not_null()
        .default(0)
        .check(Expr::col(column).gte(0))
        .to_owned()
}

#[derive(DeriveIden)]
pub enum Products {
    Table,
    Id,
    Name,
    Sku,
    Barcode,
    Description,
    SellingPrice,
    CostPrice,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Stock {
    Table,
    ProductId,
    Quantity,
    MinLevel,
    Location,
    LastUpdated,
}

#[derive(DeriveIden)]
enum StockHistory {
    Table,
    Id,
    ProductId,
    QuantityChange,
    MovementType,
    Reason,
    PreviousQuantity,
    NewQuantity,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum ProductDeliveryStats {
    Table,
    ProductId,
    TotalOrders,
    DeliveredOrders,
    CancelledOrders,
    ReturnedOrders,
    InTransitOrders,
    UpdatedAt,
}
