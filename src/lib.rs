//! Stockroom - role-based inventory and order management API
//!
//! Products with stock levels and an append-only stock ledger, customer
//! orders with a status lifecycle, warehouse pickup scans, per-product
//! delivery statistics, salaries, charges, ad spend and dashboard
//! aggregates, served over HTTP with five user roles.
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: `serve`, `migrate`, `create-admin`
//! - **config**: Environment settings and constants
//! - **domain**: Entities and pure business rules
//! - **dto**: Request schemas and their validation
//! - **services**: Use cases; `services::lifecycle` holds the transactional
//!   order and stock flows
//! - **infra**: PostgreSQL (SeaORM) and Redis
//! - **api**: Handlers, middleware and routes
//! - **types**: Pagination and response helpers
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! cargo run -- migrate up
//! cargo run -- create-admin --email admin@example.com --password 'SecurePass123!'
//! cargo run -- serve
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod dto;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User, UserRole};
pub use errors::{AppError, AppResult};
