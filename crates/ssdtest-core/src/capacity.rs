//! Sizing the test file against the volume's free space

use std::path::Path;

use ssdtest_platform::DiskStats;

use crate::error::{Error, Result};

/// Upper bound of the space left free on the volume (1 GiB)
pub const MAX_SAFETY_MARGIN: u64 = 1024 * 1024 * 1024;

/// The safety margin is `1 / SAFETY_MARGIN_DIVISOR` of the disk size
pub const SAFETY_MARGIN_DIVISOR: u64 = 100;

/// Space to leave free: 1% of the disk, capped at 1 GiB
pub fn safety_margin(disk_size: u64) -> u64 {
    (disk_size / SAFETY_MARGIN_DIVISOR).min(MAX_SAFETY_MARGIN)
}

/// Query the volume containing `path`
///
/// Failure here is unrecoverable for a test session.
pub fn query_disk_stats(path: impl AsRef<Path>) -> Result<DiskStats> {
    Ok(ssdtest_platform::disk_stats(path)?)
}

/// Test file size derived from one disk stats snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPlan {
    /// Total size of the volume
    pub disk_size: u64,
    /// Free space available to the caller
    pub free_space: u64,
    /// Space left untouched by the test file
    pub leave_space: u64,
    /// Size of the test file to allocate
    pub file_size: u64,
}

impl CapacityPlan {
    /// Derive the plan, or [`Error::InsufficientSpace`] when free space does
    /// not cover the safety margin
    pub fn from_stats(stats: DiskStats) -> Result<Self> {
        let leave_space = safety_margin(stats.total_bytes);
        let file_size = stats
            .available_bytes
            .checked_sub(leave_space)
            .ok_or(Error::InsufficientSpace { leave_space })?;

        tracing::debug!(
            disk_size = stats.total_bytes,
            free_space = stats.available_bytes,
            leave_space,
            file_size,
            "planned test file"
        );

        Ok(Self {
            disk_size: stats.total_bytes,
            free_space: stats.available_bytes,
            leave_space,
            file_size,
        })
    }
}
