//! HTTP protocol layer module
//!
//! Response builders shared by the application routes, decoupled from
//! the routing itself.

pub mod response;

// Re-export commonly used builders
pub use response::{
    build_400_response, build_404_response, build_405_response, build_413_response,
    build_500_response, build_html_response, build_options_response, build_text_response,
};
