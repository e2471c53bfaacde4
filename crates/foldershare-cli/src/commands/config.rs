//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use foldershare_core::config::AppConfig;
use foldershare_core::config::store::StoreProvider;
use foldershare_core::error::AppError;
use foldershare_database::store::postgres::mask_password;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the merged configuration
    Show,
    /// Check that the configured store is reachable
    Check,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            shown.store.database.url = mask_password(&shown.store.database.url);
            output::print_item(&shown, format);
        }
        ConfigCommand::Check => {
            let store = foldershare_database::store::open(&config.store).await?;
            if !store.health_check().await? {
                return Err(AppError::store(format!(
                    "Store '{}' failed its health check",
                    store.provider_type()
                )));
            }
            output::print_success(&format!("Store '{}' is reachable", store.provider_type()));
            if config.store.provider == StoreProvider::Postgres {
                output::print_kv("Database", &mask_password(&config.store.database.url));
            }
            output::print_kv("Max depth", &config.access.max_depth.to_string());
        }
    }

    Ok(())
}
