//! Layered configuration shared by the scry client binaries.
//!
//! Configuration merges built-in defaults, an optional TOML file, `SCRY_*`
//! environment variables, and CLI flags, in ascending precedence. The crate
//! also owns the socket endpoint model and the exit-status policy so the CLI
//! and tests agree on both.

mod defaults;
mod exit;
mod logging;
mod socket;

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_LOG_FILTER, DEFAULT_TCP_PORT, default_log_filter,
    default_log_filter_string, default_log_format, default_socket_endpoint,
};
pub use exit::ExitPolicy;
pub use logging::{LogFormat, LogFormatParseError};
pub use socket::{SocketEndpoint, SocketParseError};

/// Client configuration resolved from defaults, file, environment, and CLI.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, OrthoConfig)]
#[ortho_config(prefix = "SCRY")]
pub struct Config {
    /// Endpoint of the indexing daemon.
    #[serde(default = "defaults::default_socket_endpoint")]
    pub daemon_socket: SocketEndpoint,
    /// Tracing filter expression.
    #[serde(default = "defaults::default_log_filter_string")]
    pub log_filter: String,
    /// Tracing output format.
    #[serde(default = "defaults::default_log_format")]
    pub log_format: LogFormat,
    /// How the process exit status is derived from command statuses.
    #[serde(default)]
    pub exit_policy: ExitPolicy,
}

impl Config {
    /// Loads configuration from the given argument iterator plus the
    /// environment and any configured file, applying built-in defaults for
    /// everything left unset.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, Arc<OrthoError>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as OrthoConfig>::load_from_iter(args)
    }

    /// Endpoint of the indexing daemon.
    #[must_use]
    pub fn daemon_socket(&self) -> &SocketEndpoint {
        &self.daemon_socket
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Tracing output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// How the process exit status is derived from command statuses.
    #[must_use]
    pub fn exit_policy(&self) -> ExitPolicy {
        self.exit_policy
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daemon_socket: defaults::default_socket_endpoint(),
            log_filter: defaults::default_log_filter_string(),
            log_format: defaults::default_log_format(),
            exit_policy: ExitPolicy::default(),
        }
    }
}
