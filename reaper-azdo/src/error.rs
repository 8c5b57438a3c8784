//! Error types for Azure DevOps and Teams operations

use thiserror::Error;

/// Result type for Azure DevOps operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to Azure DevOps or a Teams webhook
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure (connect, timeout, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an unexpected status
    #[error("{status} {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl From<Error> for reaper_core::Error {
    fn from(err: Error) -> Self {
        reaper_core::Error::Remote(err.to_string())
    }
}
