//! Error types for leader-core

use std::path::{Path, PathBuf};

/// Result type for leader-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit statuses, one per failure class.
///
/// Downstream automation branches on these values, so they must stay
/// distinct and stable.
pub mod exit_code {
    /// Unclassified failure (local I/O, HTTP client construction)
    pub const FAILURE: i32 = 1;
    /// Invalid configuration or settings file
    pub const CONFIG: i32 = 2;
    /// The container tool or the sidecar CLI failed
    pub const COMMAND: i32 = 3;
    /// Jenkins did not come back after a restart
    pub const RESTART_TIMEOUT: i32 = 7;
    /// The management API failed or returned a non-success status
    pub const UPSTREAM_API: i32 = 17;
    /// Required plugins are missing after installation
    pub const CONVERGENCE: i32 = 24;
}

/// Errors that can occur while bootstrapping the leader
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration value is missing or malformed
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Settings file exists but could not be parsed
    #[error("Failed to parse settings at {path}: {message}")]
    SettingsParse { path: PathBuf, message: String },

    /// Local filesystem error
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Bounded availability poll ran out of attempts
    #[error("Jenkins is not up after {attempts} availability checks")]
    RestartTimedOut { attempts: u32 },

    /// Management API answered with a non-success status
    #[error("API call to {endpoint} failed with HTTP {status}")]
    UpstreamStatus { endpoint: String, status: u16 },

    /// Management API could not be reached
    #[error("API call to {endpoint} failed: {source}")]
    UpstreamUnreachable {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Management API answered with a body we cannot read
    #[error("Unexpected response from {endpoint}: {message}")]
    UpstreamPayload { endpoint: String, message: String },

    /// External command could not be started
    #[error("Failed to run `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// External command exited unsuccessfully
    #[error("Command `{command}` failed (exit code {}): {stderr}", .code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Installed plugins do not cover the desired set
    #[error("All required plugins were not installed. Missing: {}", .missing.join(", "))]
    ConvergenceFailed { missing: Vec<String> },
}

impl Error {
    /// Create an I/O error carrying the offending path
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a configuration error with the given message
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// The process exit status this error maps to
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidConfig { .. } | Error::SettingsParse { .. } => exit_code::CONFIG,
            Error::Io { .. } | Error::HttpClient(_) => exit_code::FAILURE,
            Error::RestartTimedOut { .. } => exit_code::RESTART_TIMEOUT,
            Error::UpstreamStatus { .. }
            | Error::UpstreamUnreachable { .. }
            | Error::UpstreamPayload { .. } => exit_code::UPSTREAM_API,
            Error::CommandSpawn { .. } | Error::CommandFailed { .. } => exit_code::COMMAND,
            Error::ConvergenceFailed { .. } => exit_code::CONVERGENCE,
        }
    }
}
