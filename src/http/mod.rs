//! HTTP protocol layer module
//!
//! Provides the response sink, content sniffing and fixed error pages,
//! decoupled from the dispatcher and the static responder.

pub mod response;
pub mod sniff;
pub mod writer;

// Re-export commonly used types
pub use response::{write_404_page, write_500_page, HTML_CONTENT_TYPE};
pub use sniff::detect_content_type;
pub use writer::ResponseWriter;
