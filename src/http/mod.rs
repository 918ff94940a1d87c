//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from request
//! dispatch: bodies, CORS headers, MIME types, conditional requests, URL path
//! decoding and response builders.

pub mod body;
pub mod cache;
pub mod cors;
pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used types
pub use body::ResponseBody;
pub use cors::apply_cors_headers;
pub use response::{
    build_304_response, build_404_response, build_501_response, build_file_response,
    build_html_response, build_options_response, build_redirect_response,
};
