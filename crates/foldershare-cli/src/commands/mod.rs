//! CLI command definitions and dispatch.

pub mod assign;
pub mod config;
pub mod file;
pub mod folder;
pub mod migrate;
pub mod user;

use clap::{Parser, Subcommand};
use tracing::debug;

use foldershare_core::config::AppConfig;
use foldershare_core::error::AppError;
use foldershare_entity::user::UserRole;
use foldershare_service::{RequestContext, ServiceContainer};

use crate::output::OutputFormat;

/// FolderShare: folder-scoped file sharing administration
#[derive(Debug, Parser)]
#[command(name = "foldershare", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `default.toml` and environment overlays
    #[arg(short, long, default_value = "config", global = true)]
    pub config: String,

    /// Environment overlay to merge over the defaults
    #[arg(short, long, default_value = "development", global = true)]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Username to act as
    #[arg(long = "as", default_value = "admin", global = true)]
    pub username: String,

    /// Role of the acting user
    #[arg(long = "as-role", default_value = "Admin", global = true)]
    pub role: UserRole,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Folder management
    Folder(folder::FolderArgs),
    /// Folder assignments
    Assign(assign::AssignArgs),
    /// User management
    User(user::UserArgs),
    /// File metadata and search
    File(file::FileArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let ctx = RequestContext::new(&self.username, self.role);
        match &self.command {
            Commands::Folder(args) => folder::execute(args, &config, &ctx, self.format).await,
            Commands::Assign(args) => assign::execute(args, &config, &ctx, self.format).await,
            Commands::User(args) => user::execute(args, &config, &ctx, self.format).await,
            Commands::File(args) => file::execute(args, &config, &ctx, self.format).await,
            Commands::Config(args) => config::execute(args, &config, self.format).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
        }
    }
}

/// Helper: open the configured store and wire every service onto it
pub async fn open_services(config: &AppConfig) -> Result<ServiceContainer, AppError> {
    let store = foldershare_database::store::open(&config.store).await?;
    debug!(provider = store.provider_type(), "Store opened");
    Ok(ServiceContainer::new(store, config))
}

/// Helper: format a timestamp for table output
pub fn format_time(at: &chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}
