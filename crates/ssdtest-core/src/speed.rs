//! Throughput accounting across measurement blocks

use std::time::Duration;

/// Speeds computed at one tick, in bytes per second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpeedSample {
    /// Throughput of the block that just ended
    pub block_speed_bps: u64,
    /// Throughput since the session started
    pub average_speed_bps: u64,
    /// Highest block throughput so far, this block included
    pub max_speed_bps: u64,
}

/// Tracks the peak block speed of a session
#[derive(Debug, Default)]
pub struct SpeedTracker {
    max_speed_bps: u64,
}

impl SpeedTracker {
    /// Create a tracker with no samples
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one block and return the speeds to report
    pub fn record(
        &mut self,
        block_bytes: u64,
        block_elapsed: Duration,
        total_bytes: u64,
        total_elapsed: Duration,
    ) -> SpeedSample {
        let block_speed_bps = bytes_per_second(block_bytes, block_elapsed);
        self.max_speed_bps = self.max_speed_bps.max(block_speed_bps);

        SpeedSample {
            block_speed_bps,
            average_speed_bps: bytes_per_second(total_bytes, total_elapsed),
            max_speed_bps: self.max_speed_bps,
        }
    }

    /// Peak block speed observed so far
    pub fn max_speed(&self) -> u64 {
        self.max_speed_bps
    }
}

/// Bytes per second, zero when no time has passed
pub fn bytes_per_second(bytes: u64, elapsed: Duration) -> u64 {
    if elapsed.is_zero() {
        return 0;
    }
    (bytes as f64 / elapsed.as_secs_f64()) as u64
}
