//! The write-and-measure loop
//!
//! A session streams a fixed random buffer into the test file until the
//! file is full, the volume runs out of space, the operator cancels, or a
//! write fails. Every tick it forces the data to stable storage before
//! computing speeds, so the numbers reflect the device rather than the page
//! cache.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rand::RngCore;

use crate::cancel::CancelListener;
use crate::config::WriteTestConfig;
use crate::error::Error;
use crate::progress::{ProgressSink, ProgressSnapshot};
use crate::speed::{bytes_per_second, SpeedTracker};
use crate::temp_file::{DurableWrite, TempTestFile};

/// How a session ended
#[derive(Debug)]
pub enum TestOutcome {
    /// The whole target size was written
    Completed,
    /// The volume filled up before the target size was reached
    DiskFull,
    /// The operator requested termination
    Interrupted,
    /// Creating, allocating, writing or flushing the file failed
    IoError(Error),
}

impl TestOutcome {
    /// Short label for summaries
    pub fn label(&self) -> &'static str {
        match self {
            TestOutcome::Completed => "completed",
            TestOutcome::DiskFull => "disk full",
            TestOutcome::Interrupted => "interrupted",
            TestOutcome::IoError(_) => "I/O error",
        }
    }
}

/// Final statistics of a session
#[derive(Debug)]
pub struct TestReport {
    /// How the session ended
    pub outcome: TestOutcome,
    /// Test file path, if the file was allocated and the write loop ran
    pub path: Option<PathBuf>,
    /// Target file size
    pub target_size: u64,
    /// Bytes written
    pub total_written: u64,
    /// Time spent in the write loop
    pub elapsed: Duration,
    /// Average throughput over the whole loop
    pub average_speed_bps: u64,
    /// Highest block throughput seen at a tick
    pub max_speed_bps: u64,
    /// Number of ticks reported
    pub ticks: u64,
}

impl TestReport {
    fn failed_setup(error: Error, target_size: u64) -> Self {
        Self {
            outcome: TestOutcome::IoError(error),
            path: None,
            target_size,
            total_written: 0,
            elapsed: Duration::ZERO,
            average_speed_bps: 0,
            max_speed_bps: 0,
            ticks: 0,
        }
    }
}

/// Session state, mutated only by the write loop
struct Session<'a> {
    target_size: u64,
    total_written: u64,
    started: Instant,
    speed: SpeedTracker,
    cancel: &'a mut CancelListener,
    ticks: u64,
}

/// Bytes and start time of the current measurement interval
struct MeasurementBlock {
    written: u64,
    started: Instant,
}

impl MeasurementBlock {
    fn start() -> Self {
        Self {
            written: 0,
            started: Instant::now(),
        }
    }

    fn reset(&mut self) {
        *self = Self::start();
    }
}

/// Whether a write error means the volume (or the user's quota) is full
pub fn is_disk_full(err: &io::Error) -> bool {
    matches!(err.kind(), ErrorKind::StorageFull | ErrorKind::QuotaExceeded)
}

/// Fill a buffer with random filler
pub fn random_buffer(size: usize) -> Vec<u8> {
    let mut buffer = vec![0u8; size];
    rand::rng().fill_bytes(&mut buffer);
    buffer
}

/// Write test runner
pub struct WriteTest {
    config: WriteTestConfig,
    cancel: CancelListener,
}

impl WriteTest {
    /// Create a runner with the default configuration
    pub fn new(cancel: CancelListener) -> Self {
        Self::with_config(WriteTestConfig::default(), cancel)
    }

    /// Create a runner with a custom configuration
    pub fn with_config(config: WriteTestConfig, cancel: CancelListener) -> Self {
        Self { config, cancel }
    }

    /// Run a full session against a new temporary file in `dir`
    ///
    /// The file is removed before this returns, whatever the outcome.
    pub fn run<S: ProgressSink>(&mut self, dir: &Path, file_size: u64, sink: &mut S) -> TestReport {
        match TempTestFile::create(dir, &self.config.file_prefix) {
            Ok(file) => self.run_with(file, file_size, sink),
            Err(e) => {
                sink.failed(&e);
                TestReport::failed_setup(e, file_size)
            }
        }
    }

    /// Allocate, fill and clean up an already created test file
    ///
    /// `target` is the file itself in production; tests wrap it to inject
    /// write and sync failures.
    pub(crate) fn run_with<W, S>(
        &mut self,
        mut target: W,
        file_size: u64,
        sink: &mut S,
    ) -> TestReport
    where
        W: DurableWrite + AsMut<TempTestFile>,
        S: ProgressSink,
    {
        let path = target.as_mut().path().to_path_buf();
        sink.started(&path, file_size);

        // A failed allocation has already removed the file
        if let Err(e) = target.as_mut().allocate(file_size) {
            sink.failed(&e);
            return TestReport::failed_setup(e, file_size);
        }

        let mut report = self.run_on(&mut target, file_size, sink);
        report.path = Some(path);

        sink.cleanup_started();
        let file = target.as_mut();
        let removal = file.cleanup();
        sink.cleanup_finished(file.path(), removal.as_ref().err());
        if let Err(e) = removal {
            tracing::warn!(path = %file.path().display(), "failed to remove test file: {}", e);
        }

        report
    }

    /// Run the write loop against any durable writer
    ///
    /// Reports an I/O error to `sink` but leaves cleanup of `target` to the
    /// caller.
    pub fn run_on<W, S>(&mut self, target: &mut W, target_size: u64, sink: &mut S) -> TestReport
    where
        W: DurableWrite + ?Sized,
        S: ProgressSink,
    {
        let buffer = random_buffer(self.config.buffer_size);
        let tick_interval = self.config.tick_interval;

        let mut session = Session {
            target_size,
            total_written: 0,
            started: Instant::now(),
            speed: SpeedTracker::new(),
            cancel: &mut self.cancel,
            ticks: 0,
        };

        let outcome = write_loop(&mut session, target, &buffer, tick_interval, sink);
        if let TestOutcome::IoError(ref e) = outcome {
            sink.failed(e);
        }

        let elapsed = session.started.elapsed();
        tracing::debug!(
            outcome = outcome.label(),
            total_written = session.total_written,
            ticks = session.ticks,
            "write loop finished"
        );

        TestReport {
            outcome,
            path: None,
            target_size,
            total_written: session.total_written,
            elapsed,
            average_speed_bps: bytes_per_second(session.total_written, elapsed),
            max_speed_bps: session.speed.max_speed(),
            ticks: session.ticks,
        }
    }
}

fn write_loop<W, S>(
    session: &mut Session<'_>,
    target: &mut W,
    buffer: &[u8],
    tick_interval: Duration,
    sink: &mut S,
) -> TestOutcome
where
    W: DurableWrite + ?Sized,
    S: ProgressSink,
{
    let mut block = MeasurementBlock::start();

    loop {
        if session.cancel.poll() {
            return TestOutcome::Interrupted;
        }

        let remaining = session.target_size - session.total_written;
        if remaining == 0 {
            return TestOutcome::Completed;
        }

        let len = (buffer.len() as u64).min(remaining) as usize;
        match target.write(&buffer[..len]) {
            Ok(0) => {
                return TestOutcome::IoError(Error::Write(io::Error::from(ErrorKind::WriteZero)))
            }
            Ok(written) => {
                session.total_written += written as u64;
                block.written += written as u64;
            }
            // A signal arrived mid-write; the next poll decides what happens
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if is_disk_full(&e) => {
                tracing::debug!(total_written = session.total_written, "volume full");
                return TestOutcome::DiskFull;
            }
            Err(e) => return TestOutcome::IoError(Error::Write(e)),
        }

        if block.started.elapsed() > tick_interval && !session.cancel.poll() {
            if let Err(e) = target.sync_durable() {
                return TestOutcome::IoError(Error::Sync(e));
            }

            let sample = session.speed.record(
                block.written,
                block.started.elapsed(),
                session.total_written,
                session.started.elapsed(),
            );
            session.ticks += 1;

            sink.tick(&ProgressSnapshot {
                total_written: session.total_written,
                elapsed: session.started.elapsed(),
                block_speed_bps: sample.block_speed_bps,
                average_speed_bps: sample.average_speed_bps,
                max_speed_bps: sample.max_speed_bps,
            });
            block.reset();
        }
    }
}
