//! Logger module
//!
//! Provides the shared logging sink used by the dispatcher, the static
//! responder and the demo server:
//! - Request lines (`GET /path`)
//! - Error and warning lines
//! - Server lifecycle lines
//!
//! A `Logger` is cheap to clone and safe to write from many requests at once.
//! It is handed to whatever needs it; request contexts never hold one.

pub mod writer;

use crate::config::Config;
use chrono::Local;
use hyper::{Method, Uri};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use writer::{LogTarget, LogWriter};

/// Timestamp layout prepended to every line when enabled
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

#[derive(Clone)]
pub struct Logger {
    writer: Arc<LogWriter>,
    timestamps: bool,
}

impl Logger {
    pub fn new(target: LogTarget, timestamps: bool) -> Self {
        Self {
            writer: Arc::new(LogWriter::new(target)),
            timestamps,
        }
    }

    pub fn stdout() -> Self {
        Self::new(LogTarget::Stdout, true)
    }

    /// In-memory logger without timestamps, read back with [`Logger::contents`]
    pub fn buffer() -> Self {
        Self::new(LogTarget::Buffer(Vec::new()), false)
    }

    /// Build the logger described by the `[logging]` section
    pub fn from_config(config: &Config) -> io::Result<Self> {
        let writer = match config.logging.log_file.as_deref() {
            Some(path) => LogWriter::file(path)?,
            None => LogWriter::new(LogTarget::Stdout),
        };
        Ok(Self {
            writer: Arc::new(writer),
            timestamps: config.logging.timestamps,
        })
    }

    /// Write a single line
    pub fn println(&self, message: &str) {
        if self.timestamps {
            let now = Local::now().format(TIMESTAMP_FORMAT);
            self.writer.write_line(&format!("{now} {message}"));
        } else {
            self.writer.write_line(message);
        }
    }

    pub fn log_request(&self, method: &Method, uri: &Uri) {
        self.println(&format!("{method} {uri}"));
    }

    pub fn log_error(&self, message: &str) {
        self.println(&format!("[ERROR] {message}"));
    }

    pub fn log_warning(&self, message: &str) {
        self.println(&format!("[WARN] {message}"));
    }

    pub fn log_connection_error(&self, err: &impl std::fmt::Debug) {
        self.println(&format!("[ERROR] Failed to serve connection: {err:?}"));
    }

    pub fn log_server_start(&self, addr: &SocketAddr, config: &Config) {
        self.println("======================================");
        self.println(&format!("Listening on: http://{addr}"));
        self.println(&format!("Static dir: {}", config.static_dir));
        if let Some(workers) = config.server.workers {
            self.println(&format!("Worker threads: {workers}"));
        }
        if let Some(ref path) = config.logging.log_file {
            self.println(&format!("Log file: {path}"));
        }
        self.println("======================================");
    }

    /// Everything written so far, for buffer-backed loggers
    pub fn contents(&self) -> String {
        self.writer.contents()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("timestamps", &self.timestamps)
            .finish_non_exhaustive()
    }
}
