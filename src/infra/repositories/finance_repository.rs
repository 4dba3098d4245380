//! Salaries, charges and ad costs.
//!
//! The three ledgers share one repository trait; each store is generated by
//! `finance_store!` on top of the base CRUD traits.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::base::{search_any, DeleteRepository, ReadRepository, WriteRepository};
use super::entities::{ad_cost, charge, salary};
use crate::domain::{AdCost, Charge, DateRange, Salary};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[async_trait]
pub trait FinanceRepository<R>: Send + Sync
where
    R: Send + Sync + 'static,
{
    async fn find(&self, id: Uuid) -> AppResult<Option<R>>;

    /// Free-text search plus an inclusive date window, newest first
    async fn list(
        &self,
        search: Option<String>,
        range: DateRange,
        params: PaginationParams,
    ) -> AppResult<(Vec<R>, u64)>;

    async fn insert(&self, record: R) -> AppResult<R>;

    /// Overwrite every column of an existing record
    async fn save(&self, record: R) -> AppResult<R>;

    /// Returns false when nothing was deleted
    async fn remove(&self, id: Uuid) -> AppResult<bool>;
}

macro_rules! finance_store {
    ($store:ident, $module:ident, $record:ty, date = $date:ident, search = [$($column:ident),+]) => {
        pub struct $store {
            db: DatabaseConnection,
        }

        impl $store {
            pub fn new(db: DatabaseConnection) -> Self {
                Self { db }
            }
        }

        impl ReadRepository<$module::Entity, $module::Model> for $store {
            fn db(&self) -> &DatabaseConnection {
                &self.db
            }
        }

        impl WriteRepository<$module::Entity, $module::Model, $module::ActiveModel> for $store {
            fn db(&self) -> &DatabaseConnection {
                &self.db
            }
        }

        impl DeleteRepository<$module::Entity> for $store {
            fn db(&self) -> &DatabaseConnection {
                &self.db
            }
        }

        #[async_trait]
        impl FinanceRepository<$record> for $store {
            async fn find(&self, id: Uuid) -> AppResult<Option<$record>> {
                let model = ReadRepository::find_by_id(self, id).await?;
                Ok(model.map(<$record>::from))
            }

            async fn list(
                &self,
                search: Option<String>,
                range: DateRange,
                params: PaginationParams,
            ) -> AppResult<(Vec<$record>, u64)> {
                let mut query = $module::Entity::find();
                if let Some(term) = search.as_deref() {
                    query = query.filter(search_any(&[$($module::Column::$column),+], term));
                }
                if let Some(from) = range.from {
                    query = query.filter($module::Column::$date.gte(from));
                }
                if let Some(to) = range.to {
                    query = query.filter($module::Column::$date.lte(to));
                }
                let query = query
                    .order_by_desc($module::Column::$date)
                    .order_by_desc($module::Column::CreatedAt);

                let (models, total) = self.paginate(query, &params).await?;
                Ok((models.into_iter().map(<$record>::from).collect(), total))
            }

            async fn insert(&self, record: $record) -> AppResult<$record> {
                let model = WriteRepository::insert(self, $module::ActiveModel::from(record)).await?;
                Ok(<$record>::from(model))
            }

            async fn save(&self, record: $record) -> AppResult<$record> {
                let model = WriteRepository::update(self, $module::ActiveModel::from(record)).await?;
                Ok(<$record>::from(model))
            }

            async fn remove(&self, id: Uuid) -> AppResult<bool> {
                self.delete_by_id(id).await
            }
        }
    };
}

finance_store!(
    SalaryStore,
    salary,
    Salary,
    date = PeriodStart,
    search = [EmployeeName, Notes]
);

finance_store!(
    ChargeStore,
    charge,
    Charge,
    date = ChargeDate,
    search = [Title, Category]
);

finance_store!(
    AdCostStore,
    ad_cost,
    AdCost,
    date = SpendDate,
    search = [CampaignName, Platform]
);
