//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// Stockroom - inventory and order management API
#[derive(Parser, Debug)]
#[command(name = "stockroom")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Create a SUPER_ADMIN account
    CreateAdmin(CreateAdminArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "SERVER_PORT")]
    pub port: u16,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the create-admin command
#[derive(Parser, Debug)]
pub struct CreateAdminArgs {
    /// Display name
    #[arg(long, default_value = "Administrator")]
    pub name: String,

    /// Login email (required when IDENTITY_FIELD=email)
    #[arg(long, env = "ADMIN_EMAIL")]
    pub email: Option<String>,

    /// Login phone (required when IDENTITY_FIELD=phone)
    #[arg(long, env = "ADMIN_PHONE")]
    pub phone: Option<String>,

    /// Initial password
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_admin() {
        let cli = Cli::parse_from([
            "stockroom",
            "create-admin",
            "--email",
            "root@example.com",
            "--password",
            "SecurePass123!",
        ]);
        match cli.command {
            Commands::CreateAdmin(args) => {
                assert_eq!(args.email.as_deref(), Some("root@example.com"));
                assert_eq!(args.name, "Administrator");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::parse_from(["stockroom", "migrate", "status", "--verbose"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Status
            })
        ));
    }
}
