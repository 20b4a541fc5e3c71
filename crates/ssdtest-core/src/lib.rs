//! # ssd-test Core
//!
//! Core library for measuring sustained sequential write throughput.
//!
//! ## Modules
//!
//! - `capacity`: Sizes the test file from the volume's free space
//! - `engine`: The write-and-measure loop and session outcomes
//! - `temp_file`: The temporary test file and its guaranteed removal
//! - `progress`: In-place terminal progress reporting
//! - `speed`: Block, average and peak throughput accounting
//! - `cancel`: One-shot cancellation from a signal handler
//! - `format`: Byte, speed and duration formatting
//! - `config`: Fixed test parameters
//! - `error`: Error types and result aliases
//!
//! ## Example
//!
//! ```ignore
//! use ssdtest_core::{cancellation, query_disk_stats, CapacityPlan, ProgressReporter, WriteTest};
//!
//! let plan = CapacityPlan::from_stats(query_disk_stats(".")?)?;
//! let (handle, listener) = cancellation();
//! ctrlc::set_handler(move || handle.cancel())?;
//!
//! let mut reporter = ProgressReporter::stdout();
//! let report = WriteTest::new(listener).run(".".as_ref(), plan.file_size, &mut reporter);
//! println!("{} after {} bytes", report.outcome.label(), report.total_written);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cancel;
pub mod capacity;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod progress;
pub mod speed;
pub mod temp_file;

pub use cancel::{cancellation, CancelHandle, CancelListener};
pub use capacity::{
    query_disk_stats, safety_margin, CapacityPlan, MAX_SAFETY_MARGIN, SAFETY_MARGIN_DIVISOR,
};
pub use config::{
    WriteTestConfig, DEFAULT_BUFFER_SIZE, DEFAULT_FILE_PREFIX, DEFAULT_TICK_INTERVAL,
};
pub use engine::{is_disk_full, random_buffer, TestOutcome, TestReport, WriteTest};
pub use error::{Error, Result};
pub use format::{format_bytes, format_duration, format_speed};
pub use progress::{render_status, NoProgress, ProgressReporter, ProgressSink, ProgressSnapshot};
pub use speed::{SpeedSample, SpeedTracker};
pub use ssdtest_platform::DiskStats;
pub use temp_file::{random_file_name, DurableWrite, TempTestFile};
