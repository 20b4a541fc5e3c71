//! Fixed parameters of a write test

use std::time::Duration;

/// Size of the filler buffer written per block (1 MiB)
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Minimum time between progress ticks
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Prefix of the temporary file name (`<prefix>-test-<hex>.tmp`)
pub const DEFAULT_FILE_PREFIX: &str = "ssd";

/// Write test configuration
///
/// The binary always uses [`WriteTestConfig::default`]; the setters exist so
/// callers embedding the engine can shrink the block or tick interval.
#[derive(Debug, Clone)]
pub struct WriteTestConfig {
    /// Bytes per write call
    pub buffer_size: usize,

    /// Minimum time between durable flushes and progress reports
    pub tick_interval: Duration,

    /// Prefix of the temporary file name
    pub file_prefix: String,
}

impl Default for WriteTestConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            tick_interval: DEFAULT_TICK_INTERVAL,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

impl WriteTestConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set buffer size (at least one byte)
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Set tick interval
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set file name prefix
    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }
}
