//! Error types for the CLI runtime.
//!
//! Variants group into the failure classes the runtime distinguishes:
//! user-input and encoding errors surface before anything is sent, connection
//! errors abort the session before the first command, and timeout or stream
//! errors abort the remaining queue.

use std::io;
use std::sync::Arc;

use thiserror::Error;

use crate::telemetry::TelemetryError;
use scry_protocol::{InvalidRange, LocationParseError};

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("no commands requested; run with --help for the command list")]
    NoCommands,
    #[error("--{first} cannot be combined with --{second}; pick one mode per invocation")]
    ExclusiveMode {
        first: &'static str,
        second: &'static str,
    },
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Location(#[from] LocationParseError),
    #[error(transparent)]
    Range(#[from] InvalidRange),
    #[error("can't parse range '{0}', must be uint-uint (e.g. 1-123)")]
    RangeSyntax(String),
    #[error("can't parse --unsaved-file '{0}', must be path:bytecount")]
    UnsavedFileSyntax(String),
    #[error("failed to read {expected} bytes from stdin for '{path}': got {actual}")]
    UnsavedFileShortRead {
        path: String,
        expected: usize,
        actual: usize,
    },
    #[error("unsaved file '{0}' is not valid UTF-8")]
    UnsavedFileEncoding(String),
    #[error("failed to read from stdin: {0}")]
    ReadStdin(io::Error),
    #[error("failed to connect to daemon at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        source: io::Error,
    },
    #[error("failed to resolve daemon address {endpoint}: {source}")]
    Resolve {
        endpoint: String,
        source: io::Error,
    },
    #[cfg(not(unix))]
    #[error("platform does not support Unix sockets: {0}")]
    UnsupportedUnixTransport(String),
    #[error("failed to serialise command message: {0}")]
    SerialiseRequest(serde_json::Error),
    #[error("failed to send command to daemon: {0}")]
    SendRequest(io::Error),
    #[error("failed to read response from daemon: {0}")]
    ReadResponse(io::Error),
    #[error("command '{command}' timed out after {timeout_ms} ms")]
    CommandTimeout { command: String, timeout_ms: u64 },
    #[error("daemon closed the connection while '{command}' was in flight")]
    ConnectionClosed { command: String },
    #[error("failed to forward daemon output: {0}")]
    ForwardResponse(io::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}
