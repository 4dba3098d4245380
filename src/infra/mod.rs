//! Infrastructure layer - External systems integration
//!
//! PostgreSQL through SeaORM (connections, migrations, repositories and the
//! transactional ledger) and Redis for rate limiting.

pub mod cache;
pub mod db;
pub mod health;
pub mod repositories;
pub mod unit_of_work;

pub use cache::{Cache, RateLimitStatus, RateLimiter};
pub use db::{Database, Migrator};
pub use health::HealthCheck;
pub use repositories::{
    DashboardRepository, FinanceRepository, InventoryLedger, OrderRepository, ProductRepository,
    ScanRepository, StockRepository, TxLedger, UserRepository,
};
pub use unit_of_work::{Persistence, TransactionContext, TxProductRepository, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockRateLimiter;
