//! TOML configuration for the server.
//!
//! Every field has a default matching the stock tracker deployment, so
//! an absent or empty configuration file still yields a runnable server.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    pub server: ServerConfig,
    pub device: DeviceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            server: ServerConfig::default(),
            device: DeviceConfig::default(),
        }
    }
}

/// TCP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 11113,
        }
    }
}

/// Tracker hardware settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceConfig {
    /// Stations the device reports and clients may subscribe to.
    pub station_count: u8,
    /// USB vendor id used to locate the serial port.
    pub vendor_id: u16,
    /// USB product id used to locate the serial port.
    pub product_id: u16,
    /// Serial read timeout; an expired timeout counts as an empty read.
    pub read_timeout_ms: u64,
    /// Explicit serial port path, bypassing USB discovery.
    pub serial_path: Option<String>,
    /// Alignment reference frame commands sent during initialization.
    pub reference_frames: Vec<String>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            station_count: 10,
            vendor_id: 0x0F44,
            product_id: 0xFF20,
            read_timeout_ms: 50,
            serial_path: None,
            reference_frames: Vec::new(),
        }
    }
}

/// Loads configuration from `path`.
///
/// A missing file is not an error: the defaults are returned so the
/// server can run without any configuration on disk.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "config file not found; using defaults");
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            })
        }
    };

    let config: AppConfig = toml::from_str(&contents)?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_deployment() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.server.port, 11113);
        assert_eq!(config.device.station_count, 10);
        assert_eq!(config.device.vendor_id, 0x0F44);
        assert_eq!(config.device.product_id, 0xFF20);
        assert_eq!(config.device.read_timeout_ms, 50);
        assert!(config.device.serial_path.is_none());
        assert!(config.device.reference_frames.is_empty());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let toml = r#"
            [server]
            port = 9000

            [device]
            station_count = 4
            serial_path = "/dev/ttyUSB0"
        "#;

        let config: AppConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.device.station_count, 4);
        assert_eq!(config.device.serial_path.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(config.device.vendor_id, 0x0F44);
    }

    #[test]
    fn test_reference_frames_parse_as_list() {
        let toml = r#"
            [device]
            reference_frames = ["A1,0,0,0,100,0,0,0,100"]
        "#;

        let config: AppConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.device.reference_frames.len(), 1);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let toml = r#"
            [server]
            prot = 9000
        "#;

        let result: Result<AppConfig, _> = toml::from_str(toml);

        assert!(result.is_err(), "typoed field must not be silently ignored");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/tracker-server.toml")).unwrap();

        assert_eq!(config.server.port, 11113);
    }
}
