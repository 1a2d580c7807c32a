//! Error types
//!
//! A single error enum flows through handler chains. Whatever a handler
//! returns is logged by the dispatcher and never reaches the client.

use crate::context::StashError;

/// Result type returned by every handler in a chain
pub type HandlerResult = Result<(), Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// JSON encoding of a response body failed
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing to the response sink or reading a file failed
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A stash lookup failed (missing key or wrong type)
    #[error(transparent)]
    Stash(#[from] StashError),

    /// Header name or value rejected by the HTTP layer
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Failure signalled by application code
    #[error("{0}")]
    Handler(String),
}

impl Error {
    /// Build a handler failure from any displayable message
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }
}

impl From<hyper::header::InvalidHeaderValue> for Error {
    fn from(err: hyper::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}
