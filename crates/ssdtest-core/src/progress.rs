//! Progress reporting for the write test
//!
//! The engine drives a [`ProgressSink`] synchronously. [`ProgressReporter`]
//! is the terminal implementation: it prints a five-line status block and
//! redraws it in place on every tick.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crossterm::cursor::MoveUp;
use crossterm::queue;

use crate::error::Error;
use crate::format::{format_bytes, format_duration, pad_value};

/// Counters handed to the sink at each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Bytes written since the session started
    pub total_written: u64,
    /// Time since the session started
    pub elapsed: Duration,
    /// Throughput of the block that just ended
    pub block_speed_bps: u64,
    /// Throughput since the session started
    pub average_speed_bps: u64,
    /// Highest block throughput so far
    pub max_speed_bps: u64,
}

/// Receiver of write test events
pub trait ProgressSink {
    /// The test file was created and the loop is about to start
    fn started(&mut self, _path: &Path, _size: u64) {}

    /// A measurement tick completed
    fn tick(&mut self, snapshot: &ProgressSnapshot);

    /// The session is ending because of an error
    fn failed(&mut self, _error: &Error) {}

    /// Cleanup of the test file is starting
    fn cleanup_started(&mut self) {}

    /// Cleanup finished; `error` is set when the file could not be removed
    fn cleanup_finished(&mut self, _path: &Path, _error: Option<&io::Error>) {}
}

/// Sink that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn tick(&mut self, _snapshot: &ProgressSnapshot) {}
}

/// Terminal reporter that rewrites its status block in place
#[derive(Debug)]
pub struct ProgressReporter<W: Write> {
    out: W,
    in_place: bool,
    lines_printed: u16,
}

impl ProgressReporter<io::Stdout> {
    /// Report to stdout, redrawing in place only when stdout is a terminal
    pub fn stdout() -> Self {
        let in_place = console::Term::stdout().is_term();
        Self::new(io::stdout(), in_place)
    }
}

impl<W: Write> ProgressReporter<W> {
    /// Create a reporter over any writer
    pub fn new(out: W, in_place: bool) -> Self {
        Self {
            out,
            in_place,
            lines_printed: 0,
        }
    }

    /// Print one status block
    pub fn report(&mut self, snapshot: &ProgressSnapshot) -> io::Result<()> {
        let block = render_status(snapshot);

        if self.in_place && self.lines_printed > 0 {
            queue!(self.out, MoveUp(self.lines_printed))?;
        }
        self.out.write_all(block.as_bytes())?;
        self.out.flush()?;

        self.lines_printed = block.matches('\n').count() as u16;
        Ok(())
    }

    /// Consume the reporter and return the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            tracing::warn!("failed to write progress output: {}", e);
        }
    }
}

impl<W: Write> ProgressSink for ProgressReporter<W> {
    fn started(&mut self, path: &Path, size: u64) {
        let result = writeln!(
            self.out,
            "Writing {} to {}",
            format_bytes(size),
            display_name(path)
        );
        self.emit(result);
    }

    fn tick(&mut self, snapshot: &ProgressSnapshot) {
        let result = self.report(snapshot);
        self.emit(result);
    }

    fn failed(&mut self, error: &Error) {
        // Loop errors follow the status block; setup errors follow "Writing ..."
        let result = match error {
            Error::Write(_) | Error::Sync(_) => writeln!(self.out, "\n{}", error),
            _ => writeln!(self.out, "{}", error),
        };
        self.emit(result);
    }

    fn cleanup_started(&mut self) {
        let result = writeln!(self.out, "\nCleaning up...");
        self.emit(result);
    }

    fn cleanup_finished(&mut self, path: &Path, error: Option<&io::Error>) {
        let result = match error {
            None => writeln!(self.out, "Removed file {}", display_name(path)),
            Some(e) => writeln!(
                self.out,
                "Failed to remove file {}: {}",
                display_name(path),
                e
            ),
        };
        self.emit(result);
        let result = self.out.flush();
        self.emit(result);
    }
}

/// Render the status block, one line per counter
pub fn render_status(snapshot: &ProgressSnapshot) -> String {
    format!(
        "Written size  : {}\n\
         Elapsed time  : {}\n\
         Average speed : {}/s\n\
         Current speed : {}/s\n\
         Max speed     : {}/s\n",
        pad_value(&format_bytes(snapshot.total_written)),
        pad_value(&format_duration(snapshot.elapsed)),
        pad_value(&format_bytes(snapshot.average_speed_bps)),
        pad_value(&format_bytes(snapshot.block_speed_bps)),
        pad_value(&format_bytes(snapshot.max_speed_bps)),
    )
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(total: u64) -> ProgressSnapshot {
        ProgressSnapshot {
            total_written: total,
            elapsed: Duration::from_millis(1500),
            block_speed_bps: 2 * 1024 * 1024,
            average_speed_bps: 1024 * 1024,
            max_speed_bps: 3 * 1024 * 1024,
        }
    }

    fn output(reporter: ProgressReporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_render_status_layout() {
        let block = render_status(&snapshot(1024));
        let lines: Vec<&str> = block.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Written size  :     1.00 KiB");
        assert_eq!(lines[1], "Elapsed time  :     1.50 s  ");
        assert_eq!(lines[2], "Average speed :     1.00 MiB/s");
        assert_eq!(lines[3], "Current speed :     2.00 MiB/s");
        assert_eq!(lines[4], "Max speed     :     3.00 MiB/s");
    }

    #[test]
    fn test_first_report_does_not_move_cursor() {
        let mut reporter = ProgressReporter::new(Vec::new(), true);
        reporter.report(&snapshot(1024)).unwrap();

        let out = output(reporter);
        assert!(!out.contains('\x1b'));
        assert!(out.starts_with("Written size"));
    }

    #[test]
    fn test_second_report_moves_cursor_up() {
        let mut reporter = ProgressReporter::new(Vec::new(), true);
        reporter.report(&snapshot(1024)).unwrap();
        reporter.report(&snapshot(2048)).unwrap();

        let out = output(reporter);
        assert_eq!(out.matches("\x1b[5A").count(), 1);
        let second = out.split("\x1b[5A").nth(1).unwrap();
        assert!(second.starts_with("Written size  :     2.00 KiB"));
    }

    #[test]
    fn test_append_mode_never_moves_cursor() {
        let mut reporter = ProgressReporter::new(Vec::new(), false);
        reporter.report(&snapshot(1024)).unwrap();
        reporter.report(&snapshot(2048)).unwrap();

        let out = output(reporter);
        assert!(!out.contains('\x1b'));
        assert_eq!(out.matches("Written size").count(), 2);
    }

    #[test]
    fn test_cleanup_messages() {
        let mut reporter = ProgressReporter::new(Vec::new(), true);
        let path = Path::new("/tmp/ssd-test-0011223344556677.tmp");
        reporter.cleanup_started();
        reporter.cleanup_finished(path, None);

        let out = output(reporter);
        assert_eq!(
            out,
            "\nCleaning up...\nRemoved file ssd-test-0011223344556677.tmp\n"
        );
    }

    #[test]
    fn test_cleanup_failure_message() {
        let mut reporter = ProgressReporter::new(Vec::new(), true);
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        reporter.cleanup_finished(Path::new("ssd-test-aa.tmp"), Some(&err));

        let out = output(reporter);
        assert!(out.starts_with("Failed to remove file ssd-test-aa.tmp"));
        assert!(out.contains("denied"));
    }

    #[test]
    fn test_started_and_failed_messages() {
        let mut reporter = ProgressReporter::new(Vec::new(), true);
        reporter.started(Path::new("ssd-test-ff.tmp"), 2 * 1024 * 1024 * 1024);
        reporter.failed(&Error::Write(io::Error::other("media error")));

        let out = output(reporter);
        assert!(out.starts_with("Writing 2.00 GiB to ssd-test-ff.tmp\n"));
        assert!(out.contains("\nError writing to file: media error\n"));
    }

    #[test]
    fn test_setup_failure_has_no_blank_line() {
        let mut reporter = ProgressReporter::new(Vec::new(), true);
        let path = Path::new("ssd-test-ff.tmp");
        reporter.started(path, 4096);
        reporter.failed(&Error::Allocate {
            path: path.to_path_buf(),
            size: 4096,
            source: io::Error::other("file too large"),
        });

        let out = output(reporter);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Writing 4.00 KiB to ssd-test-ff.tmp");
        assert!(!lines[1].is_empty());
        assert!(lines[1].contains("file too large"));
    }

    #[test]
    fn test_create_failure_is_first_line() {
        let mut reporter = ProgressReporter::new(Vec::new(), true);
        reporter.failed(&Error::CreateFile {
            path: "ssd-test-ff.tmp".into(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        });

        let out = output(reporter);
        assert!(!out.starts_with('\n'));
        assert_eq!(out.lines().count(), 1);
    }
}
