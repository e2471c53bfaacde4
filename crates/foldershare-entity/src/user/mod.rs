//! User domain entities.

pub mod model;
pub mod role;

pub use model::{User, UserStatus};
pub use role::UserRole;
