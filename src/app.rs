//! Application module
//!
//! `App` carries the static root and the logger, and hands out request
//! handlers bound to them. It is cheap to clone and only read after
//! construction, so one instance serves every connection.

use crate::config::Config;
use crate::handler::{Dispatcher, DispatcherBuilder, HandlerFunc, StaticResponder};
use crate::logger::Logger;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct App {
    static_dir: Arc<PathBuf>,
    logger: Logger,
}

impl App {
    pub fn new(static_dir: impl Into<PathBuf>, logger: Logger) -> Self {
        Self {
            static_dir: Arc::new(static_dir.into()),
            logger,
        }
    }

    /// Build an `App` with the logger described by `config`
    pub fn from_config(config: &Config) -> std::io::Result<Self> {
        Ok(Self::new(&config.static_dir, Logger::from_config(config)?))
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    pub const fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Handler running `handlers` in order for every request
    pub fn dispatcher(&self, handlers: Vec<HandlerFunc>) -> Dispatcher {
        Dispatcher::new(handlers, self.logger.clone())
    }

    /// Start a chain to be filled with `then`
    pub fn chain(&self) -> DispatcherBuilder {
        Dispatcher::builder(self.logger.clone())
    }

    /// Handler serving files below the static root
    pub fn static_responder(&self) -> StaticResponder {
        StaticResponder::new(self.static_dir.as_path(), self.logger.clone())
    }
}
