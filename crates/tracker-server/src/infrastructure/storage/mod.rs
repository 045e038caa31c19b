//! Persistence-facing infrastructure.  Currently only TOML configuration.

pub mod config;

pub use config::{load_config, AppConfig, ConfigError, DeviceConfig, ServerConfig};
