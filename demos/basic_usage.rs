//! Basic logger usage example
//!
//! Demonstrates the console preset, the three severities and the
//! formatting macros.
//!
//! Run with: cargo run --example basic_usage

use alog::prelude::*;
use alog::{error, info, warning};
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== alog - Basic Usage Example ===\n");

    // Info and Warning go to stdout, Error to stderr
    let log = Log::console(DEFAULT_CAPACITY)?;

    println!("1. Logging at every severity:");
    log.info("This is an info message")
        .warning("This is a warning message")
        .error(Some("This is an error message"));

    println!("\n2. Formatted messages:");
    info!(log, "Processing {} items", 100);
    warning!(log, "Retry attempt {} of {}", 2, 5);
    error!(log, "Request failed with status {}", 503);

    println!("\n3. Errors:");
    let missing = std::fs::read_to_string("/definitely/not/here");
    log.error(missing.as_ref().err());
    log.error(None::<&std::io::Error>);
    log.error_debug(Some("unexpected state, trace follows"));

    println!("\n4. Caller information:");
    let traced = Log::builder()
        .include_caller(true)
        .time_format(TimestampFormat::Iso8601Millis)
        .severity(
            Severity::Info,
            SeverityConfig::new(10).strategy(ConsoleStrategy::stdout()),
        )
        .build()?;
    traced.info("Records carry file and line");
    traced.warning("Warning is not configured here, see stderr");

    // Wait for the workers before the process exits
    traced.shutdown(Duration::from_secs(1));
    log.shutdown(Duration::from_secs(1));

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
