//! Error types for Branch Reaper

use thiserror::Error;

/// Result type alias for Branch Reaper operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Branch Reaper operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The repository filter matched nothing in the project
    #[error("Repository '{repository}' not found in project '{project}'")]
    RepositoryNotFound {
        /// Requested repository name
        repository: String,
        /// Project that was searched
        project: String,
    },

    /// Remote service error (transport, unexpected status, malformed body)
    #[error("Remote error: {0}")]
    Remote(String),
}
