//! Logger error types.

use std::path::PathBuf;

use thiserror::Error;
use tracing_subscriber::reload;

/// Logger configuration error.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown logger formatter '{0}'")]
    InvalidFormatter(String),
    #[error("unable to set the logging level '{0}': not a valid level")]
    InvalidLevel(String),
    #[error("unable to open the file '{}' for writing: {source}", .path.display())]
    OpenDestination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("logger subscriber is no longer installed: {0}")]
    Reload(#[from] reload::Error),
    #[error("failed to install the logger: {0}")]
    Init(String),
    #[error("failed to register signal handler: {0}")]
    Signal(#[source] std::io::Error),
}

impl LoggerError {
    /// True for rejected formatter or level names.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            LoggerError::InvalidFormatter(_) | LoggerError::InvalidLevel(_)
        )
    }

    /// True when the destination file could not be opened.
    pub fn is_io(&self) -> bool {
        matches!(self, LoggerError::OpenDestination { .. })
    }
}
