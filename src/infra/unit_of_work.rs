//! Unit of Work pattern implementation.
//!
//! Centralizes access to every repository and runs multi-step writes inside
//! one database transaction: commit on success, rollback on any error.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    AccessMode, ActiveModelTrait, DatabaseConnection, DatabaseTransaction, IsolationLevel, Set,
    TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::entities::{delivery_stats, product, stock};
use super::repositories::{
    AdCostStore, ChargeStore, DashboardRepository, DashboardStore, FinanceRepository,
    OrderRepository, OrderStore, ProductRepository, ProductStore, SalaryStore, ScanRepository,
    ScanStore, StockRepository, StockStore, TxLedger, UserRepository, UserStore,
};
use crate::domain::{AdCost, Charge, NewProduct, Product, Salary};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to the generic
/// `transaction` method. Tests provide their own implementation.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn products(&self) -> Arc<dyn ProductRepository>;

    fn stock(&self) -> Arc<dyn StockRepository>;

    fn orders(&self) -> Arc<dyn OrderRepository>;

    fn scans(&self) -> Arc<dyn ScanRepository>;

    fn dashboard(&self) -> Arc<dyn DashboardRepository>;

    fn salaries(&self) -> Arc<dyn FinanceRepository<Salary>>;

    fn charges(&self) -> Arc<dyn FinanceRepository<Charge>>;

    fn ad_costs(&self) -> Arc<dyn FinanceRepository<AdCost>>;

    /// Execute a closure within a READ COMMITTED transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// Everything done through this context belongs to the same database
/// transaction, which the context borrows.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Stock, order and scan writes for this transaction
    pub fn ledger(&self) -> TxLedger<'a> {
        TxLedger::new(self.txn)
    }

    /// Product provisioning for this transaction
    pub fn products(&self) -> TxProductRepository<'a> {
        TxProductRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    product_repo: Arc<ProductStore>,
    stock_repo: Arc<StockStore>,
    order_repo: Arc<OrderStore>,
    scan_repo: Arc<ScanStore>,
    dashboard_repo: Arc<DashboardStore>,
    salary_repo: Arc<SalaryStore>,
    charge_repo: Arc<ChargeStore>,
    ad_cost_repo: Arc<AdCostStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            product_repo: Arc::new(ProductStore::new(db.clone())),
            stock_repo: Arc::new(StockStore::new(db.clone())),
            order_repo: Arc::new(OrderStore::new(db.clone())),
            scan_repo: Arc::new(ScanStore::new(db.clone())),
            dashboard_repo: Arc::new(DashboardStore::new(db.clone())),
            salary_repo: Arc::new(SalaryStore::new(db.clone())),
            charge_repo: Arc::new(ChargeStore::new(db.clone())),
            ad_cost_repo: Arc::new(AdCostStore::new(db.clone())),
            db,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.product_repo.clone()
    }

    fn stock(&self) -> Arc<dyn StockRepository> {
        self.stock_repo.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.order_repo.clone()
    }

    fn scans(&self) -> Arc<dyn ScanRepository> {
        self.scan_repo.clone()
    }

    fn dashboard(&self) -> Arc<dyn DashboardRepository> {
        self.dashboard_repo.clone()
    }

    fn salaries(&self) -> Arc<dyn FinanceRepository<Salary>> {
        self.salary_repo.clone()
    }

    fn charges(&self) -> Arc<dyn FinanceRepository<Charge>> {
        self.charge_repo.clone()
    }

    fn ad_costs(&self) -> Arc<dyn FinanceRepository<AdCost>> {
        self.ad_cost_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }
}

/// Transaction-aware product repository.
///
/// Creates the product together with its empty stock row and its delivery
/// stats row. Opening stock is recorded separately through the ledger.
pub struct TxProductRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxProductRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn create(&self, new_product: &NewProduct) -> AppResult<Product> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        let model = product::ActiveModel {
            id: Set(id),
            name: Set(new_product.name.clone()),
            sku: Set(new_product.sku.clone()),
            barcode: Set(new_product.barcode.clone()),
            description: Set(new_product.description.clone()),
            selling_price: Set(new_product.selling_price),
            cost_price: Set(new_product.cost_price),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.txn)
        .await?;

        stock::ActiveModel {
            product_id: Set(id),
            quantity: Set(0),
            min_level: Set(new_product.min_level),
            location: Set(new_product.location.clone()),
            last_updated: Set(now),
        }
        .insert(self.txn)
        .await?;

        delivery_stats::ActiveModel {
            product_id: Set(id),
            total_orders: Set(0),
            delivered_orders: Set(0),
            cancelled_orders: Set(0),
            returned_orders: Set(0),
            in_transit_orders: Set(0),
            updated_at: Set(now),
        }
        .insert(self.txn)
        .await?;

        Ok(Product::from(model))
    }
}

/// Simpler API for executing transactional operations.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
