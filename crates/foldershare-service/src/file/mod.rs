//! File metadata operations and search.

pub mod search;
pub mod service;

pub use search::{SearchHit, SearchResults, SearchService};
pub use service::{
    ConfirmUploadRequest, DownloadTicket, FileService, UploadRequest, UploadTicket,
};
