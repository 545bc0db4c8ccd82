//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::store::WriteFailureMode;

/// Which store implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// JSON file under `data_dir`
    #[default]
    File,
    /// Volatile in-process map
    Memory,
}

impl StoreBackend {
    /// Parses `file` / `memory` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Some(Self::File),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Service name reported in logs
    pub service_name: String,
    /// Deployment environment reported in logs
    pub environment: String,
    /// HTTP server port
    pub http_port: u16,
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Directory holding the durable store's data file
    pub data_dir: String,
    /// Store implementation
    pub store_backend: StoreBackend,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// What durable writes do when the data file cannot be written
    pub write_failure_mode: WriteFailureMode,
    /// Seconds allowed for in-flight requests to finish on shutdown
    pub shutdown_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVICE_NAME` - Service name (default: tiny)
    /// - `SERVICE_ENV` - Environment name (default: dev)
    /// - `HTTP_PORT` - HTTP server port (default: 8080)
    /// - `LOG_LEVEL` - Fallback log level (default: info)
    /// - `DATA_DIR` - Data directory (default: /data)
    /// - `STORE_BACKEND` - `file` or `memory` (default: file)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds, at least 1 (default: 30)
    /// - `PERSIST_ERRORS` - `surface` or `discard` (default: surface)
    /// - `SHUTDOWN_TIMEOUT` - Graceful shutdown budget in seconds (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            service_name: non_empty("SERVICE_NAME").unwrap_or(defaults.service_name),
            environment: non_empty("SERVICE_ENV").unwrap_or(defaults.environment),
            http_port: env::var("HTTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_port),
            log_level: non_empty("LOG_LEVEL").unwrap_or(defaults.log_level),
            data_dir: non_empty("DATA_DIR").unwrap_or(defaults.data_dir),
            store_backend: env::var("STORE_BACKEND")
                .ok()
                .and_then(|v| StoreBackend::parse(&v))
                .unwrap_or(defaults.store_backend),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cleanup_interval),
            write_failure_mode: env::var("PERSIST_ERRORS")
                .ok()
                .and_then(|v| WriteFailureMode::parse(&v))
                .unwrap_or(defaults.write_failure_mode),
            shutdown_timeout: env::var("SHUTDOWN_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.shutdown_timeout),
        }
    }

    /// Cleanup interval as a Duration.
    pub fn cleanup_period(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }

    /// Shutdown budget as a Duration.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "tiny".to_string(),
            environment: "dev".to_string(),
            http_port: 8080,
            log_level: "info".to_string(),
            data_dir: "/data".to_string(),
            store_backend: StoreBackend::File,
            cleanup_interval: 30,
            write_failure_mode: WriteFailureMode::Surface,
            shutdown_timeout: 5,
        }
    }
}
