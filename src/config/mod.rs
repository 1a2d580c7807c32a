// Configuration module entry point
// Loads the immutable configuration shared by every request

mod types;

use std::net::SocketAddr;

pub use types::{Config, LoggingConfig, ServerConfig};

/// Config file looked up when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "gomint";

impl Config {
    /// Load configuration from the default file, environment and defaults
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (extension optional)
    /// A missing file is not an error; defaults and `GOMINT_*` variables still apply
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("static_dir", "/")?
            .set_default("logging.timestamps", true)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("GOMINT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
