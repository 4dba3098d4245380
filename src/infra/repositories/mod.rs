//! Repository layer - Data access abstraction
//!
//! Read-side stores work on the shared connection; `ledger` holds the
//! transactional port used by the order lifecycle.

mod base;
mod dashboard_repository;
pub(crate) mod entities;
mod finance_repository;
mod ledger;
mod order_repository;
mod product_repository;
mod scan_repository;
mod stock_repository;
mod user_repository;

pub use base::{DeleteRepository, ReadRepository, WriteRepository};
pub use dashboard_repository::{DashboardRepository, DashboardStore};
pub use finance_repository::{AdCostStore, ChargeStore, FinanceRepository, SalaryStore};
pub use ledger::{InventoryLedger, TxLedger};
pub use order_repository::{OrderRepository, OrderStore};
pub use product_repository::{ProductRepository, ProductStore};
pub use scan_repository::{ScanRepository, ScanStore};
pub use stock_repository::{StockRepository, StockStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use dashboard_repository::MockDashboardRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use scan_repository::MockScanRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use stock_repository::MockStockRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
