//! Error types for the dashboard binary.
//!
//! [`DashboardError`] is the top-level error that `run` propagates with
//! `?`; `main` turns any variant into a non-zero exit status.

use jamaah_server::{ConfigError, ServerError};

/// Top-level error for the dashboard binary.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// Binding or serving failed.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: ServerError,
    },
}

impl DashboardError {
    /// Operator-facing remediation text, if the failure has one.
    pub fn remediation(&self) -> Option<String> {
        match self {
            Self::Server { source } => source.remediation(),
            Self::Config { .. } => None,
        }
    }
}
