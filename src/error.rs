//! Module containing the error type of the crate.
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while forcing a tools version.
///
/// None of them are recovered from locally. They are handed back
/// to the host which surfaces them as a load or build failure.
#[derive(Debug, Error)]
pub enum Error {
    /// A service that the host is expected to provide could not be resolved.
    #[error("Required service is unavailable: {0}")]
    ServiceUnavailable(String),

    /// A required value was missing.
    #[error("Value cannot be null: {0}")]
    ArgumentNull(String),

    /// An internal precondition was violated.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A call into the host reported a failure.
    #[error("Host call failed: {0}")]
    Host(String),

    /// The tools version file exists but could not be read.
    #[error("Failed to read [{}]: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Locating or running msbuild failed.
    #[error("msbuild: {0}")]
    MsBuild(#[from] std::io::Error),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
