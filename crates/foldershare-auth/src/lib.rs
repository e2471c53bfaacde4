//! # foldershare-auth
//!
//! Authorization for FolderShare.
//!
//! ## Modules
//!
//! - `acl`: assignment-based folder access (ancestor walk) and descendant
//!   scoping
//! - `rbac`: role-to-operation policies

pub mod acl;
pub mod rbac;

pub use acl::{AccessChecker, FolderScope};
pub use rbac::{RbacEnforcer, RbacPolicies, SystemPermission};
