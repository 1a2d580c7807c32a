//! Request handler module
//!
//! The two terminal request handlers: the handler-chain dispatcher and the
//! static file responder.

pub mod dispatcher;
pub mod static_files;

// Re-export main entry points
pub use dispatcher::{handler, run_chain, ChainOutcome, Dispatcher, DispatcherBuilder, HandlerFunc};
pub use static_files::{resolve_path, PathRejection, StaticResponder};
