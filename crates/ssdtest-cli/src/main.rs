//! ssd-test - Measure sustained sequential write throughput
//!
//! # Usage
//!
//! ```bash
//! # Fill the current directory's volume and report write speed
//! cd /mnt/ssd && ssd-test
//!
//! # Same, with diagnostic logging on stderr
//! ssd-test --verbose
//! ```
//!
//! Press Ctrl+C to stop early; the temporary file is always removed.

use anyhow::Result;
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

/// ssd-test - Measure sustained sequential write throughput by filling the
/// current directory's volume with a temporary file
#[derive(Parser)]
#[command(name = "ssd-test")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose diagnostic logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    // Set up panic handler for nicer error messages
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("{} {}", style("Error:").red().bold(), panic_info);
    }));

    if let Err(e) = run() {
        eprintln!("{} {}", style("Error:").red().bold(), e);

        // Show cause chain when backtraces are requested
        if std::env::var("RUST_BACKTRACE").is_ok() {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  {} {}", style("Caused by:").yellow(), cause);
                source = cause.source();
            }
        }

        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    // Logs go to stderr so they never tear the progress block on stdout
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    commands::write_test::execute()
}
