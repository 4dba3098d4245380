//! Migrate command - Database migration management.

use sea_orm::DbErr;

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

fn migration_error(e: DbErr) -> AppError {
    AppError::internal(format!("Migration failed: {}", e))
}

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // `Database::connect` would apply pending migrations on its own
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations().await.map_err(migration_error)?;
            tracing::info!("Migrations applied");
        }
        MigrateAction::Down => {
            db.rollback_migration().await.map_err(migration_error)?;
            tracing::info!("Last migration rolled back");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await.map_err(migration_error)?;
            let pending = status.iter().filter(|(_, applied)| !applied).count();
            for (name, applied) in status {
                println!("{:<10} {}", if applied { "applied" } else { "pending" }, name);
            }
            tracing::info!(pending, "Migration status listed");
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables and re-running every migration");
            db.fresh_migrations().await.map_err(migration_error)?;
            tracing::info!("Fresh migrations completed");
        }
    }

    Ok(())
}
