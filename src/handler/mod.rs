//! Request handler module
//!
//! Responsible for method dispatch and serving the document root.

pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
