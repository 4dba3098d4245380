//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain rules and repositories through the Unit of
//! Work. Every write that touches stock, orders or delivery counters runs
//! inside one transaction via the functions in `lifecycle`.

mod auth_service;
pub mod container;
mod dashboard_service;
mod finance_service;
pub mod lifecycle;
mod order_service;
mod product_service;
mod scan_service;
mod stock_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use dashboard_service::{window_start, DashboardManager, DashboardService};
pub use finance_service::{FinanceManager, FinanceRecord, FinanceService};
pub use order_service::{OrderManager, OrderService};
pub use product_service::{parse_csv, ImportError, ImportReport, ProductManager, ProductService};
pub use scan_service::{ScanManager, ScanService};
pub use stock_service::{StockManager, StockService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use order_service::MockOrderService;
#[cfg(any(test, feature = "test-utils"))]
pub use product_service::MockProductService;
#[cfg(any(test, feature = "test-utils"))]
pub use scan_service::MockScanService;
#[cfg(any(test, feature = "test-utils"))]
pub use stock_service::MockStockService;
