//! Salaries, charges and ad costs.
//!
//! The three ledgers share one service shape; `FinanceRecord` ties each
//! record type to its inputs and its repository.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Actor, AdCost, AdCostChanges, AdCostInput, Charge, ChargeChanges, ChargeInput, DateRange,
    Salary, SalaryChanges, SalaryInput,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{FinanceRepository, UnitOfWork};
use crate::types::{Paginated, PaginationParams};

/// A finance record with derived amounts recomputed on every write
pub trait FinanceRecord: Sized + Send + Sync + 'static {
    type Input: Send + 'static;
    type Changes: Send + 'static;

    /// Resource name used in error messages and logs
    const NAME: &'static str;

    fn create(input: Self::Input, created_by: Uuid) -> AppResult<Self>;

    fn apply(&mut self, changes: Self::Changes) -> AppResult<()>;

    fn id(&self) -> Uuid;

    fn repository<U: UnitOfWork>(uow: &U) -> Arc<dyn FinanceRepository<Self>>;
}

impl FinanceRecord for Salary {
    type Input = SalaryInput;
    type Changes = SalaryChanges;
    const NAME: &'static str = "Salary";

    fn create(input: SalaryInput, created_by: Uuid) -> AppResult<Self> {
        Salary::create(input, created_by)
    }

    fn apply(&mut self, changes: SalaryChanges) -> AppResult<()> {
        Salary::apply(self, changes)
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn repository<U: UnitOfWork>(uow: &U) -> Arc<dyn FinanceRepository<Self>> {
        uow.salaries()
    }
}

impl FinanceRecord for Charge {
    type Input = ChargeInput;
    type Changes = ChargeChanges;
    const NAME: &'static str = "Charge";

    fn create(input: ChargeInput, created_by: Uuid) -> AppResult<Self> {
        Charge::create(input, created_by)
    }

    fn apply(&mut self, changes: ChargeChanges) -> AppResult<()> {
        Charge::apply(self, changes)
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn repository<U: UnitOfWork>(uow: &U) -> Arc<dyn FinanceRepository<Self>> {
        uow.charges()
    }
}

impl FinanceRecord for AdCost {
    type Input = AdCostInput;
    type Changes = AdCostChanges;
    const NAME: &'static str = "Ad cost";

    fn create(input: AdCostInput, created_by: Uuid) -> AppResult<Self> {
        AdCost::create(input, created_by)
    }

    fn apply(&mut self, changes: AdCostChanges) -> AppResult<()> {
        AdCost::apply(self, changes)
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn repository<U: UnitOfWork>(uow: &U) -> Arc<dyn FinanceRepository<Self>> {
        uow.ad_costs()
    }
}

#[async_trait]
pub trait FinanceService<R: FinanceRecord>: Send + Sync {
    async fn list(
        &self,
        search: Option<String>,
        range: DateRange,
        params: PaginationParams,
    ) -> AppResult<Paginated<R>>;

    async fn get(&self, id: Uuid) -> AppResult<R>;

    async fn create(&self, actor: Actor, input: R::Input) -> AppResult<R>;

    async fn update(&self, id: Uuid, changes: R::Changes) -> AppResult<R>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct FinanceManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> FinanceManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork, R: FinanceRecord> FinanceService<R> for FinanceManager<U> {
    async fn list(
        &self,
        search: Option<String>,
        range: DateRange,
        params: PaginationParams,
    ) -> AppResult<Paginated<R>> {
        let (records, total) = R::repository(self.uow.as_ref())
            .list(search, range, params)
            .await?;
        Ok(Paginated::new(records, &params, total))
    }

    async fn get(&self, id: Uuid) -> AppResult<R> {
        R::repository(self.uow.as_ref())
            .find(id)
            .await?
            .ok_or_not_found(R::NAME)
    }

    async fn create(&self, actor: Actor, input: R::Input) -> AppResult<R> {
        let record = R::create(input, actor.id)?;
        let saved = R::repository(self.uow.as_ref()).insert(record).await?;
        tracing::info!(kind = R::NAME, id = %saved.id(), by = %actor.id, "Finance record created");
        Ok(saved)
    }

    async fn update(&self, id: Uuid, changes: R::Changes) -> AppResult<R> {
        let repository = R::repository(self.uow.as_ref());
        let mut record = repository.find(id).await?.ok_or_not_found(R::NAME)?;
        record.apply(changes)?;
        repository.save(record).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        if R::repository(self.uow.as_ref()).remove(id).await? {
            tracing::info!(kind = R::NAME, id = %id, "Finance record deleted");
            Ok(())
        } else {
            Err(AppError::not_found(R::NAME))
        }
    }
}
