//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod ad_cost;
pub mod charge;
pub mod delivery_stats;
pub mod order;
pub mod order_item;
pub mod product;
pub mod salary;
pub mod scanned_order;
pub mod stock;
pub mod stock_history;
pub mod user;
