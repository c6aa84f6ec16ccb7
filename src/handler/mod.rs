//! Request handler module
//!
//! Responsible for request routing dispatch and the application routes.

pub mod fortune;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
