//! User profile management (Admin only).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use foldershare_auth::rbac::{RbacEnforcer, SystemPermission};
use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_database::repositories::{AssignmentRepository, UserRepository};
use foldershare_entity::user::{User, UserRole};

use crate::context::RequestContext;

/// Request to create a user profile.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Username.
    #[validate(length(min = 1, max = 100, message = "Username is required"))]
    pub username: String,
    /// Role.
    pub role: UserRole,
}

/// Manages user profiles and their assignments.
#[derive(Debug, Clone)]
pub struct UserService {
    user_repo: Arc<UserRepository>,
    assignment_repo: Arc<AssignmentRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        assignment_repo: Arc<AssignmentRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            user_repo,
            assignment_repo,
            rbac,
        }
    }

    /// Creates a user profile.
    pub async fn create_user(&self, ctx: &RequestContext, req: CreateUserRequest) -> AppResult<User> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::UserManage)?;
        req.validate()?;

        let username = req.username.trim();
        if username.is_empty() || username.contains('#') {
            return Err(AppError::invalid_input(format!(
                "Invalid username: '{}'",
                req.username
            )));
        }

        let user = User::new(username, req.role);
        self.user_repo.create(&user).await?;
        Ok(user)
    }

    /// Gets a user profile.
    pub async fn get_user(&self, ctx: &RequestContext, username: &str) -> AppResult<User> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::UserManage)?;
        self.user_repo
            .get(username)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User '{username}' not found")))
    }

    /// Lists user profiles, optionally restricted to one role.
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        role: Option<UserRole>,
    ) -> AppResult<Vec<User>> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::UserManage)?;
        self.user_repo.list(role).await
    }

    /// Deletes a user and every assignment they hold.
    ///
    /// Callers cannot delete their own account. Returns the number of
    /// assignments removed.
    pub async fn delete_user(&self, ctx: &RequestContext, username: &str) -> AppResult<usize> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::UserManage)?;

        if username == ctx.username {
            return Err(AppError::invalid_input("Cannot delete your own account"));
        }
        if !self.user_repo.exists(username).await? {
            return Err(AppError::not_found(format!("User '{username}' not found")));
        }

        let grants = self.assignment_repo.keys_for_user(username).await?;
        let removed = grants.len();
        self.user_repo.delete_with(username, grants).await?;

        info!(
            admin = %ctx.username,
            username,
            assignments = removed,
            "User deleted"
        );
        Ok(removed)
    }
}
