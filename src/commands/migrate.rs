//! Migrate command - Database migration management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    tracing::info!(action = ?args.action, "Running migration command");

    // Connect without auto-running migrations for manual control
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let outcome = match args.action {
        MigrateAction::Up => db.run_migrations().await,
        MigrateAction::Down => db.rollback_migration().await,
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables and re-running every migration");
            db.fresh_migrations().await
        }
        MigrateAction::Status => {
            let status = db
                .migration_status()
                .await
                .map_err(|e| AppError::internal(e.to_string()))?;
            for (name, applied) in status {
                let label = if applied { "applied" } else { "pending" };
                println!("{}: {}", name, label);
            }
            return Ok(());
        }
    };

    outcome.map_err(|e| AppError::internal(format!("Migration {:?} failed: {}", args.action, e)))?;
    tracing::info!(action = ?args.action, "Migration command completed");

    Ok(())
}
