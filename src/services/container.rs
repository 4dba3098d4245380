//! Service container - one place to reach every application service.
//!
//! Handlers depend on the `ServiceContainer` trait; `Services` wires the
//! managers to a shared `Persistence` unit of work.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, DashboardManager, DashboardService, FinanceManager,
    FinanceService, OrderManager, OrderService, ProductManager, ProductService, ScanManager,
    ScanService, StockManager, StockService, UserManager, UserService,
};
use crate::config::Config;
use crate::domain::{AdCost, Charge, Salary};
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn products(&self) -> Arc<dyn ProductService>;

    fn stock(&self) -> Arc<dyn StockService>;

    fn orders(&self) -> Arc<dyn OrderService>;

    fn scans(&self) -> Arc<dyn ScanService>;

    fn salaries(&self) -> Arc<dyn FinanceService<Salary>>;

    fn charges(&self) -> Arc<dyn FinanceService<Charge>>;

    fn ad_costs(&self) -> Arc<dyn FinanceService<AdCost>>;

    fn dashboard(&self) -> Arc<dyn DashboardService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth: Arc<dyn AuthService>,
    users: Arc<dyn UserService>,
    products: Arc<dyn ProductService>,
    stock: Arc<dyn StockService>,
    orders: Arc<dyn OrderService>,
    scans: Arc<dyn ScanService>,
    salaries: Arc<dyn FinanceService<Salary>>,
    charges: Arc<dyn FinanceService<Charge>>,
    ad_costs: Arc<dyn FinanceService<AdCost>>,
    dashboard: Arc<dyn DashboardService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let finance = Arc::new(FinanceManager::new(uow.clone()));

        Self {
            users: Arc::new(UserManager::new(uow.clone(), config.identity_field)),
            auth: Arc::new(Authenticator::new(uow.clone(), config)),
            products: Arc::new(ProductManager::new(uow.clone())),
            stock: Arc::new(StockManager::new(uow.clone())),
            orders: Arc::new(OrderManager::new(uow.clone())),
            scans: Arc::new(ScanManager::new(uow.clone())),
            salaries: finance.clone(),
            charges: finance.clone(),
            ad_costs: finance,
            dashboard: Arc::new(DashboardManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.products.clone()
    }

    fn stock(&self) -> Arc<dyn StockService> {
        self.stock.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.orders.clone()
    }

    fn scans(&self) -> Arc<dyn ScanService> {
        self.scans.clone()
    }

    fn salaries(&self) -> Arc<dyn FinanceService<Salary>> {
        self.salaries.clone()
    }

    fn charges(&self) -> Arc<dyn FinanceService<Charge>> {
        self.charges.clone()
    }

    fn ad_costs(&self) -> Arc<dyn FinanceService<AdCost>> {
        self.ad_costs.clone()
    }

    fn dashboard(&self) -> Arc<dyn DashboardService> {
        self.dashboard.clone()
    }
}
