//! Folder assignment CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use foldershare_core::config::AppConfig;
use foldershare_core::error::AppError;
use foldershare_core::types::FolderId;
use foldershare_service::RequestContext;
use foldershare_service::assignment::AssignUsersRequest;

use crate::output::{self, OutputFormat};

/// Arguments for assignment commands
#[derive(Debug, Args)]
pub struct AssignArgs {
    /// Assignment subcommand
    #[command(subcommand)]
    pub command: AssignCommand,
}

/// Assignment subcommands
#[derive(Debug, Subcommand)]
pub enum AssignCommand {
    /// Grant users access to a folder and everything beneath it
    Add {
        /// Folder ID
        folder_id: FolderId,
        /// Usernames to assign
        #[arg(required = true)]
        usernames: Vec<String>,
    },
    /// Revoke one user's grant on a folder
    Remove {
        /// Folder ID
        folder_id: FolderId,
        /// Username
        username: String,
    },
    /// List the users assigned to a folder
    List {
        /// Folder ID
        folder_id: FolderId,
    },
}

/// Assignment display row
#[derive(Debug, Serialize, Tabled)]
struct AssignmentRow {
    /// Username
    username: String,
    /// Assigned at
    assigned_at: String,
}

/// Execute assignment commands
pub async fn execute(
    args: &AssignArgs,
    config: &AppConfig,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let services = super::open_services(config).await?;

    match &args.command {
        AssignCommand::Add {
            folder_id,
            usernames,
        } => {
            let written = services
                .assignments
                .assign_users(
                    ctx,
                    folder_id,
                    AssignUsersRequest {
                        usernames: usernames.clone(),
                    },
                )
                .await?;
            output::print_success(&format!(
                "{} of {} user(s) assigned to folder {folder_id}",
                written.len(),
                usernames.len()
            ));
        }
        AssignCommand::Remove {
            folder_id,
            username,
        } => {
            services
                .assignments
                .unassign_user(ctx, folder_id, username)
                .await?;
            output::print_success(&format!("User '{username}' unassigned from folder {folder_id}"));
        }
        AssignCommand::List { folder_id } => {
            let listing = services.assignments.list_assignments(ctx, folder_id).await?;
            match format {
                OutputFormat::Json => output::print_item(&listing, format),
                OutputFormat::Table => {
                    output::print_kv("Folder", &format!("{} ({})", listing.folder_name, listing.folder_id));
                    let rows: Vec<AssignmentRow> = listing
                        .assignments
                        .iter()
                        .map(|a| AssignmentRow {
                            username: a.username.clone(),
                            assigned_at: super::format_time(&a.assigned_at),
                        })
                        .collect();
                    output::print_list(&rows, format);
                }
            }
        }
    }

    Ok(())
}
