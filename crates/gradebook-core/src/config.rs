//! # Service Configuration
//!
//! The process-wide settings, read once at startup and passed explicitly to
//! the components that need them. Request handling never reads the
//! environment.

use crate::primitives::{
    DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PASSING_THRESHOLD, DEFAULT_PORT, PORT_ENV,
};
use crate::store::StoreBackend;
use std::path::PathBuf;

/// Immutable service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Minimum marks counted as a pass.
    pub passing_threshold: i64,
    /// Host the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Path of the redb database file.
    pub database: PathBuf,
    /// Which record store to open.
    pub backend: StoreBackend,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            passing_threshold: DEFAULT_PASSING_THRESHOLD,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: PathBuf::from(DEFAULT_DATABASE),
            backend: StoreBackend::default(),
        }
    }
}

impl ServiceConfig {
    /// Build the default configuration, taking the port from `PORT` when it
    /// holds a valid port number.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            port: port_from_value(std::env::var(PORT_ENV).ok().as_deref()),
            ..Self::default()
        }
    }

    /// Override the passing threshold.
    #[must_use]
    pub fn with_passing_threshold(mut self, threshold: i64) -> Self {
        self.passing_threshold = threshold;
        self
    }

    /// Override the bind host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Override the listening port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the database path.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<PathBuf>) -> Self {
        self.database = database.into();
        self
    }

    /// Override the storage backend.
    #[must_use]
    pub fn with_backend(mut self, backend: StoreBackend) -> Self {
        self.backend = backend;
        self
    }

    /// `host:port` string suitable for binding a listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a port value, falling back to [`DEFAULT_PORT`] when absent or invalid.
fn port_from_value(value: Option<&str>) -> u16 {
    value
        .and_then(|v| v.trim().parse::<u16>().ok())
        .filter(|port| *port != 0)
        .unwrap_or(DEFAULT_PORT)
}
