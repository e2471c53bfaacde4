//! RBAC enforcement logic: checks whether a role has a required permission.

use foldershare_core::error::AppError;
use foldershare_entity::user::UserRole;

use super::policies::{RbacPolicies, SystemPermission};

/// Enforces role-based access control for folder, file, and user
/// operations.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer {
    policies: RbacPolicies,
}

impl RbacEnforcer {
    /// Creates a new enforcer with the default policy set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `Ok(())` if the role holds `permission`, `Forbidden` otherwise.
    pub fn require_permission(
        &self,
        role: UserRole,
        permission: SystemPermission,
    ) -> Result<(), AppError> {
        if self.policies.has_permission(role, permission) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Role '{role}' does not have permission '{permission:?}'"
            )))
        }
    }

    /// Checks whether the role has the permission.
    pub fn has_permission(&self, role: UserRole, permission: SystemPermission) -> bool {
        self.policies.has_permission(role, permission)
    }
}
