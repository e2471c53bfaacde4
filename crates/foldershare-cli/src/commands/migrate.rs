//! Database migration management commands.

use clap::{Args, Subcommand};

use foldershare_core::config::AppConfig;
use foldershare_core::error::AppError;
use foldershare_database::PostgresStore;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations against the configured database
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            let store = PostgresStore::connect(&config.store).await?;
            foldershare_database::migration::run_migrations(store.pool()).await?;
            store.close().await;
            output::print_success("All migrations applied successfully.");
        }
    }

    Ok(())
}
