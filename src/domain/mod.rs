//! Domain layer - Core business entities and rules
//!
//! Entities, value objects and the pure rules of the inventory: stock
//! movements, the order status machine, pricing, delivery counters,
//! finance derivations and the access matrix. Nothing here touches the
//! database.

pub mod dashboard;
pub mod delivery;
pub mod finance;
pub mod order;
pub mod password;
pub mod policy;
pub mod product;
pub mod stock;
pub mod user;

pub use dashboard::{DailySales, DashboardSummary, StatusCount, SummaryFigures, TopProduct};
pub use delivery::{
    DeliveryCounter, NewScan, OrderReference, ProductDeliveryStats, ScannedOrder, StatsDelta,
};
pub use finance::{
    AdCost, AdCostChanges, AdCostInput, Charge, ChargeChanges, ChargeInput, DateRange, Salary,
    SalaryChanges, SalaryInput,
};
pub use order::{
    NewOrder, NewOrderItem, Order, OrderFilter, OrderItem, OrderLine, OrderStatus,
    OrderWithItems, PaymentStatus, PlaceOrder, StockedProduct, TransitionPlan,
};
pub use password::Password;
pub use policy::{AccessPolicy, Action, Resource};
pub use product::{NewProduct, Product, ProductChanges, ProductFilter, ProductSort, ProductView, SortOrder};
pub use stock::{MovementType, StockHistoryEntry, StockLevel, StockMovement, StockOverview};
pub use user::{Actor, IdentityField, NewUser, User, UserChanges, UserFilter, UserResponse, UserRole};
