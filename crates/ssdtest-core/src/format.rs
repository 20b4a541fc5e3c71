//! Human-readable formatting of byte counts, speeds and durations
//!
//! Units keep a fixed width so values line up when right-aligned in the
//! progress block: `"  B"` pads to the width of `"KiB"`, and duration units
//! carry trailing spaces for the same reason.

use std::time::Duration;

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;
const TIB: u64 = GIB * 1024;

/// Format a byte count with binary prefixes (B, KiB, MiB, GiB, TiB)
pub fn format_bytes(bytes: u64) -> String {
    if bytes < KIB {
        format!("{}  B", bytes)
    } else if bytes < MIB {
        format!("{:.2} KiB", bytes as f64 / KIB as f64)
    } else if bytes < GIB {
        format!("{:.2} MiB", bytes as f64 / MIB as f64)
    } else if bytes < TIB {
        format!("{:.2} GiB", bytes as f64 / GIB as f64)
    } else {
        format!("{:.2} TiB", bytes as f64 / TIB as f64)
    }
}

/// Format a throughput in bytes per second
pub fn format_speed(bytes_per_sec: u64) -> String {
    format!("{}/s", format_bytes(bytes_per_sec))
}

/// Format a duration as milliseconds, seconds or minutes
pub fn format_duration(duration: Duration) -> String {
    if duration < Duration::from_secs(1) {
        format!("{} ms ", duration.as_millis())
    } else if duration < Duration::from_secs(60) {
        format!("{:.2} s  ", duration.as_secs_f64())
    } else {
        format!("{:.2} m  ", duration.as_secs_f64() / 60.0)
    }
}

/// Right-align a formatted value in the progress block's value column
pub fn pad_value(s: &str) -> String {
    format!("{:>12}", s)
}
