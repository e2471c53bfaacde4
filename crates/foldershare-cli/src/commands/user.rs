//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use foldershare_core::config::AppConfig;
use foldershare_core::error::AppError;
use foldershare_entity::user::{User, UserRole};
use foldershare_service::RequestContext;
use foldershare_service::user::CreateUserRequest;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List user profiles
    List {
        /// Only list users with this role
        #[arg(short, long)]
        role: Option<UserRole>,
    },
    /// Show a user profile
    Show {
        /// Username
        username: String,
    },
    /// Create a user profile
    Create {
        /// Username
        username: String,
        /// Role
        #[arg(short, long)]
        role: UserRole,
    },
    /// Delete a user and all of their assignments
    Delete {
        /// Username
        username: String,
    },
}

/// User display row
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// Username
    username: String,
    /// Role
    role: String,
    /// Status
    status: String,
    /// Created at
    created_at: String,
}

impl From<User> for UserRow {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            role: user.role.to_string(),
            status: format!("{:?}", user.status),
            created_at: super::format_time(&user.created_at),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    let services = super::open_services(config).await?;

    match &args.command {
        UserCommand::List { role } => {
            let rows: Vec<UserRow> = services
                .users
                .list_users(ctx, *role)
                .await?
                .into_iter()
                .map(UserRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        UserCommand::Show { username } => {
            let user = services.users.get_user(ctx, username).await?;
            output::print_list(&[UserRow::from(user)], format);
        }
        UserCommand::Create { username, role } => {
            let user = services
                .users
                .create_user(
                    ctx,
                    CreateUserRequest {
                        username: username.clone(),
                        role: *role,
                    },
                )
                .await?;
            output::print_success(&format!("User '{}' created as {}", user.username, user.role));
        }
        UserCommand::Delete { username } => {
            let removed = services.users.delete_user(ctx, username).await?;
            output::print_success(&format!(
                "User '{username}' deleted ({removed} assignment(s) removed)"
            ));
        }
    }

    Ok(())
}
