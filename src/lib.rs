//! Minimal HTTP request-handling core
//!
//! - [`Dispatcher`]: ordered handler chains over a per-request [`RequestContext`]
//! - [`StaticResponder`]: files below a root directory, 404/500 pages otherwise
//! - [`App`]: configuration shared by both

pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use app::App;
pub use context::{RequestContext, Stash, StashError};
pub use error::{Error, HandlerResult};
pub use handler::{handler, Dispatcher, HandlerFunc, StaticResponder};
pub use logger::Logger;
