//! Error types for the ssd-test core library

use std::path::PathBuf;

use thiserror::Error;

use crate::format::format_bytes;

/// Main error type for ssd-test operations
#[derive(Error, Debug)]
pub enum Error {
    /// Free space does not cover the safety margin
    #[error("Not enough free space, need at least {}", format_bytes(*leave_space))]
    InsufficientSpace {
        /// Space that must stay free on the volume
        leave_space: u64,
    },

    /// Querying volume capacity failed
    #[error("Failed to query disk stats: {0}")]
    DiskStats(#[from] ssdtest_platform::PlatformError),

    /// Test file could not be created
    #[error("Failed to create file {}: {source}", path.display())]
    CreateFile {
        /// Path of the test file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Test file could not be pre-allocated
    #[error(
        "Error allocating file {} with size {}: {source}",
        path.display(),
        format_bytes(*size)
    )]
    Allocate {
        /// Path of the test file
        path: PathBuf,
        /// Requested size in bytes
        size: u64,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Writing a block failed for a reason other than a full volume
    #[error("Error writing to file: {0}")]
    Write(#[source] std::io::Error),

    /// Durable flush failed
    #[error("Error syncing file: {0}")]
    Sync(#[source] std::io::Error),
}

/// Result type alias using the ssd-test error type
pub type Result<T> = std::result::Result<T, Error>;
