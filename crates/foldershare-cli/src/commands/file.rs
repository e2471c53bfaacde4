//! File metadata and search CLI commands.
//!
//! Content transfer happens elsewhere; these commands only record and
//! resolve metadata and storage locators.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use foldershare_core::config::AppConfig;
use foldershare_core::error::AppError;
use foldershare_core::types::{FileId, FolderId};
use foldershare_entity::file::FileSummary;
use foldershare_service::RequestContext;
use foldershare_service::file::{ConfirmUploadRequest, UploadRequest};

use crate::output::{self, OutputFormat};

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// List the files in a folder
    List {
        /// Folder ID
        folder_id: FolderId,
    },
    /// Search file names across accessible folders
    Search {
        /// Case-insensitive substring to look for
        query: String,
    },
    /// Record an uploaded file's metadata
    Upload {
        /// Target folder ID
        folder_id: FolderId,
        /// File name
        #[arg(short, long)]
        name: String,
        /// File size in bytes
        #[arg(short, long)]
        size: u64,
    },
    /// Resolve the storage locator of a file
    Download {
        /// Folder ID
        folder_id: FolderId,
        /// File ID
        file_id: FileId,
    },
    /// Delete a file record
    Delete {
        /// Folder ID
        folder_id: FolderId,
        /// File ID
        file_id: FileId,
    },
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    /// File ID
    id: String,
    /// Name
    name: String,
    /// Size in bytes
    size: u64,
    /// Uploader
    uploaded_by: String,
    /// Uploaded at
    uploaded_at: String,
    /// Folder path
    folder: String,
}

impl FileRow {
    fn new(file: FileSummary, folder: String) -> Self {
        Self {
            id: file.id.to_string(),
            name: file.name,
            size: file.size,
            uploaded_by: file.uploaded_by,
            uploaded_at: super::format_time(&file.uploaded_at),
            folder,
        }
    }
}

/// Execute file commands
pub async fn execute(
    args: &FileArgs,
    config: &AppConfig,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let services = super::open_services(config).await?;

    match &args.command {
        FileCommand::List { folder_id } => {
            let rows: Vec<FileRow> = services
                .files
                .list_files(ctx, folder_id)
                .await?
                .into_iter()
                .map(|file| FileRow::new(file, folder_id.to_string()))
                .collect();
            output::print_list(&rows, format);
        }
        FileCommand::Search { query } => {
            let results = services.search.search(ctx, query).await?;
            match format {
                OutputFormat::Json => output::print_item(&results, format),
                OutputFormat::Table => {
                    let rows: Vec<FileRow> = results
                        .files
                        .into_iter()
                        .map(|hit| FileRow::new(hit.file, hit.folder_path))
                        .collect();
                    output::print_list(&rows, format);
                }
            }
        }
        FileCommand::Upload {
            folder_id,
            name,
            size,
        } => {
            let ticket = services
                .files
                .prepare_upload(
                    ctx,
                    UploadRequest {
                        folder_id: folder_id.clone(),
                        file_name: name.clone(),
                        file_size: *size,
                    },
                )
                .await?;
            let file = services
                .files
                .confirm_upload(
                    ctx,
                    ConfirmUploadRequest {
                        file_id: ticket.file_id,
                        folder_id: ticket.folder_id,
                        file_name: name.clone(),
                        file_size: *size,
                        storage_locator: ticket.storage_locator,
                    },
                )
                .await?;
            output::print_success(&format!("File '{}' recorded (id: {})", file.name, file.id));
            output::print_kv("Storage locator", &file.storage_locator);
        }
        FileCommand::Download { folder_id, file_id } => {
            let ticket = services
                .files
                .prepare_download(ctx, folder_id, file_id)
                .await?;
            output::print_item(&ticket, format);
        }
        FileCommand::Delete { folder_id, file_id } => {
            let file = services.files.delete_file(ctx, folder_id, file_id).await?;
            output::print_success(&format!("File '{}' deleted", file.name));
            output::print_kv("Stored object", &file.storage_locator);
        }
    }

    Ok(())
}
