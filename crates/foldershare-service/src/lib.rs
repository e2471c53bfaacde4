//! # foldershare-service
//!
//! Business logic service layer for FolderShare. Each service combines
//! repositories, the access checker, and role policies to implement one
//! family of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references, starting from a single
//! store handle (see [`ServiceContainer`]).

pub mod assignment;
pub mod container;
pub mod context;
pub mod file;
pub mod folder;
pub mod user;

pub use assignment::AssignmentService;
pub use container::ServiceContainer;
pub use context::RequestContext;
pub use file::{FileService, SearchService};
pub use folder::{CascadeCoordinator, FolderService, TreeService};
pub use user::UserService;
