//! # ssd-test Platform
//!
//! Platform-specific adapters for querying volume capacity.
//!
//! This crate answers one question for the write test: how large is the
//! volume holding a given path, and how many bytes may the current user still
//! write to it. Each supported platform provides a [`PlatformOps`]
//! implementation selected at compile time.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::path::Path;
use thiserror::Error;

/// Platform-specific errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Path cannot be handed to the operating system
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Operation not supported on this platform
    #[error("Not supported: {0}")]
    NotSupported(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Capacity of the volume backing a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskStats {
    /// Total size of the volume in bytes
    pub total_bytes: u64,

    /// Bytes available to the calling (unprivileged) user
    pub available_bytes: u64,
}

impl DiskStats {
    /// Create disk stats from raw byte counts
    pub fn new(total_bytes: u64, available_bytes: u64) -> Self {
        Self {
            total_bytes,
            available_bytes,
        }
    }
}

/// Platform operations interface
pub trait PlatformOps {
    /// Query total and available space of the volume containing `path`
    fn disk_stats(path: &Path) -> Result<DiskStats>;
}

// Platform-specific implementations
cfg_if::cfg_if! {
    if #[cfg(unix)] {
        mod unix;
        pub use unix::UnixPlatform as Platform;
    } else if #[cfg(windows)] {
        mod windows;
        pub use windows::WindowsPlatform as Platform;
    }
}

cfg_if::cfg_if! {
    if #[cfg(any(unix, windows))] {
        /// Query total and available space of the volume containing `path`
        pub fn disk_stats(path: impl AsRef<Path>) -> Result<DiskStats> {
            let path = path.as_ref();
            let stats = Platform::disk_stats(path)?;
            tracing::debug!(
                path = %path.display(),
                total = stats.total_bytes,
                available = stats.available_bytes,
                "queried disk stats"
            );
            Ok(stats)
        }
    } else {
        /// Query disk stats (unsupported platform)
        pub fn disk_stats(_path: impl AsRef<Path>) -> Result<DiskStats> {
            Err(PlatformError::NotSupported("Platform not supported".to_string()))
        }
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================
