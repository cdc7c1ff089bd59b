//! Browser driver error types.

use std::path::PathBuf;
use std::time::Duration;

/// Errors from a browser session.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// A bounded wait expired before the condition held
    #[error("timed out after {}ms waiting for {what}", .timeout.as_millis())]
    Timeout { what: String, timeout: Duration },

    /// The page could not be loaded
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// HTTP request to the automation endpoint failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The automation endpoint reported an error
    #[error("WebDriver error {status} ({error}): {message}")]
    WebDriver {
        status: u16,
        error: String,
        message: String,
    },

    /// The automation endpoint answered with something we could not understand
    #[error("unexpected WebDriver response: {0}")]
    Protocol(String),

    /// Evidence could not be written to disk
    #[error("failed to write evidence to {}: {source}", .path.display())]
    Evidence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DriverError {
    /// Whether this error is a step timeout rather than a transport failure.
    pub fn is_timeout(&self) -> bool {
        matches!(self, DriverError::Timeout { .. })
    }
}
