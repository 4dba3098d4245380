//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `create-admin` - Bootstrap the first SUPER_ADMIN

pub mod args;

pub use args::{Cli, Commands};
