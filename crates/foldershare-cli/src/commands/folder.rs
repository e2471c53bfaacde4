//! Folder management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use foldershare_core::error::AppError;
use foldershare_core::config::AppConfig;
use foldershare_core::types::FolderId;
use foldershare_service::RequestContext;
use foldershare_service::folder::{CreateFolderRequest, RenameFolderRequest};

use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Show the folders visible to the acting user
    Tree,
    /// Show one folder and its path
    Show {
        /// Folder ID
        id: FolderId,
    },
    /// Create a new folder
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Parent folder ID (omit for top level)
        #[arg(short, long)]
        parent_id: Option<FolderId>,
    },
    /// Rename a folder
    Rename {
        /// Folder ID
        id: FolderId,
        /// New name
        #[arg(short, long)]
        name: String,
    },
    /// Delete a folder with everything beneath it
    Delete {
        /// Folder ID
        id: FolderId,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: String,
    /// Name
    name: String,
    /// Path
    path: String,
    /// Created at
    created_at: String,
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    config: &AppConfig,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let services = super::open_services(config).await?;

    match &args.command {
        FolderCommand::Tree => {
            let tree = services.folders.list_folders(ctx).await?;
            output::print_tree(&tree, format);
        }
        FolderCommand::Show { id } => {
            let folder = services.folders.get_folder(ctx, id).await?;
            let row = FolderRow {
                path: services.checker.folder_path(&folder.id).await?,
                id: folder.id.to_string(),
                name: folder.name,
                created_at: super::format_time(&folder.created_at),
            };
            output::print_list(&[row], format);
        }
        FolderCommand::Create { name, parent_id } => {
            let folder = services
                .folders
                .create_folder(
                    ctx,
                    CreateFolderRequest {
                        name: name.clone(),
                        parent_id: parent_id.clone(),
                    },
                )
                .await?;
            output::print_success(&format!("Folder '{}' created (id: {})", folder.name, folder.id));
        }
        FolderCommand::Rename { id, name } => {
            let folder = services
                .folders
                .rename_folder(ctx, id, RenameFolderRequest { name: name.clone() })
                .await?;
            output::print_success(&format!("Folder {} renamed to '{}'", folder.id, folder.name));
        }
        FolderCommand::Delete { id } => {
            let report = services.folders.delete_folder(ctx, id).await?;
            match format {
                OutputFormat::Json => output::print_item(&report, format),
                OutputFormat::Table => {
                    output::print_success(&format!("Folder {id} deleted"));
                    output::print_kv("Folders removed", &report.folders.to_string());
                    output::print_kv("Assignments removed", &report.assignments.to_string());
                    output::print_kv("Files removed", &report.files.len().to_string());
                    for file in &report.files {
                        output::print_kv("Stored object", &file.storage_locator);
                    }
                }
            }
        }
    }

    Ok(())
}
