//! HTTP request handlers.

pub mod auth_handler;
pub mod dashboard_handler;
pub mod finance_handler;
pub mod health_handler;
pub mod order_handler;
pub mod product_handler;
pub mod scan_handler;
pub mod stock_handler;
pub mod user_handler;

pub use auth_handler::{auth_routes, session_routes};
pub use dashboard_handler::dashboard_routes;
pub use health_handler::health;
pub use order_handler::order_routes;
pub use product_handler::product_routes;
pub use scan_handler::scan_routes;
pub use stock_handler::stock_routes;
pub use user_handler::user_routes;
