//! Configuration for playerscore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, ScoreError};
use crate::handler::ErrorPolicy;

/// Main configuration for a playerscore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Which `ScoreStore` backend to serve from
    pub backend: StoreBackend,

    /// Path of the database file (persistent backend only)
    pub db_path: PathBuf,

    /// How long to wait for another process to release the database lock
    pub open_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Handler Configuration
    // -------------------------------------------------------------------------
    /// What the handler does when a store call fails
    pub error_policy: ErrorPolicy,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Number of worker threads serving connections
    pub worker_threads: usize,

    /// Connection read timeout (milliseconds, must be > 0)
    ///
    /// Also bounds how long shutdown waits on an idle keep-alive client.
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,
}

/// Score store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-memory map, lost on exit
    Volatile,

    /// redb file at `Config::db_path`
    Persistent,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Persistent,
            db_path: PathBuf::from("./game.db"),
            open_timeout_ms: 1000,
            error_policy: ErrorPolicy::Lenient,
            listen_addr: "127.0.0.1:5000".to_string(),
            worker_threads: 8,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Open timeout as a `Duration`
    pub fn open_timeout(&self) -> Duration {
        Duration::from_millis(self.open_timeout_ms)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == 0 {
            return Err(ScoreError::Config(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        if self.read_timeout_ms == 0 {
            return Err(ScoreError::Config(
                "read_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.backend == StoreBackend::Persistent && self.open_timeout_ms == 0 {
            return Err(ScoreError::Config(
                "open_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.backend == StoreBackend::Persistent && self.db_path.as_os_str().is_empty() {
            return Err(ScoreError::Config("db_path is empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the store backend
    pub fn backend(mut self, backend: StoreBackend) -> Self {
        self.config.backend = backend;
        self
    }

    /// Set the database file path
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = path.into();
        self
    }

    /// Set the database open timeout (in milliseconds)
    pub fn open_timeout_ms(mut self, ms: u64) -> Self {
        self.config.open_timeout_ms = ms;
        self
    }

    /// Set the handler's error policy
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.config.error_policy = policy;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
