//! Migration: Create salaries, charges and ad_costs.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn money(column: impl IntoIden) -> ColumnDef {
    ColumnDef::new(column).decimal_len(12, 2).not_null().to_owned()
}

fn timestamp(column: impl IntoIden) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

fn created_by_fk(table: impl IntoIden + 'static, column: impl IntoIden + 'static, name: &str) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(Users::Table, Users::Id)
        .on_delete(ForeignKeyAction::SetNull)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Salaries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Salaries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Salaries::EmployeeName).string_len(150).not_null())
                    .col(ColumnDef::new(Salaries::PeriodStart).date().not_null())
                    .col(ColumnDef::new(Salaries::PeriodEnd).date().not_null())
                    .col(money(Salaries::BaseAmount))
                    .col(money(Salaries::Bonus).default(0))
                    .col(money(Salaries::Deductions).default(0))
                    .col(money(Salaries::NetSalary))
                    .col(ColumnDef::new(Salaries::Paid).boolean().not_null().default(false))
                    .col(ColumnDef::new(Salaries::Notes).text().null())
                    .col(ColumnDef::new(Salaries::CreatedBy).uuid().null())
                    .col(timestamp(Salaries::CreatedAt))
                    .col(timestamp(Salaries::UpdatedAt))
                    .foreign_key(&mut created_by_fk(
                        Salaries::Table,
                        Salaries::CreatedBy,
                        "fk_salaries_created_by",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Charges::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Charges::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Charges::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Charges::Category).string_len(100).not_null())
                    .col(money(Charges::Amount).check(Expr::col(Charges::Amount).gt(0)))
                    .col(ColumnDef::new(Charges::ChargeDate).date().not_null())
                    .col(ColumnDef::new(Charges::Notes).text().null())
                    .col(ColumnDef::new(Charges::CreatedBy).uuid().null())
                    .col(timestamp(Charges::CreatedAt))
                    .col(timestamp(Charges::UpdatedAt))
                    .foreign_key(&mut created_by_fk(
                        Charges::Table,
                        Charges::CreatedBy,
                        "fk_charges_created_by",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdCosts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AdCosts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AdCosts::CampaignName).string_len(200).not_null())
                    .col(ColumnDef::new(AdCosts::Platform).string_len(100).not_null())
                    .col(money(AdCosts::AmountSpent))
                    .col(ColumnDef::new(AdCosts::Results).integer().not_null().default(0))
                    .col(money(AdCosts::CostPerResult).default(0))
                    .col(ColumnDef::new(AdCosts::SpendDate).date().not_null())
                    .col(ColumnDef::new(AdCosts::Notes).text().null())
                    .col(ColumnDef::new(AdCosts::CreatedBy).uuid().null())
                    .col(timestamp(AdCosts::CreatedAt))
                    .col(timestamp(AdCosts::UpdatedAt))
                    .foreign_key(&mut created_by_fk(
                        AdCosts::Table,
                        AdCosts::CreatedBy,
                        "fk_ad_costs_created_by",
                    ))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdCosts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Charges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Salaries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Salaries {
    Table,
    Id,
    EmployeeName,
    PeriodStart,
    PeriodEnd,
    BaseAmount,
    Bonus,
    Deductions,
    NetSalary,
    Paid,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Charges {
    Table,
    Id,
    Title,
    Category,
    Amount,
    ChargeDate,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AdCosts {
    Table,
    Id,
    CampaignName,
    Platform,
    AmountSpent,
    Results,
    CostPerResult,
    SpendDate,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
