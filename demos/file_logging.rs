//! File logging example
//!
//! Demonstrates one file per severity, an extra console strategy for errors
//! and the JSON settings format.
//!
//! Run with: cargo run --example file_logging

use alog::prelude::*;
use alog::OsFs;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== alog - File Logging Example ===\n");

    // Same shape as the environment preset, with explicit paths
    let env = EnvConfig::new("logs/info.log", "logs/warning.log", "logs/error.log");
    let log = Log::from_env(&env, &OsFs)?;

    println!("1. Logging to one file per severity:");
    log.info("Application started");
    log.info("Configuration loaded successfully");
    log.warning("Using default settings for some options");
    log.error(Some("Failed to load optional plugin"));

    for i in 1..=5 {
        log.infof(format_args!("Processing item {}/5", i));
        if i == 3 {
            log.warning("Item 3 took longer than expected");
        }
    }
    log.shutdown(Duration::from_secs(5));

    println!("\n2. Configuring from JSON:");
    let settings = LogSettings::from_json(
        r#"{
            "time_format": "rfc3339",
            "severities": {
                "info": { "files": ["logs/app.log"] },
                "error": { "capacity": 10, "console": "stderr", "files": ["logs/app.log", "logs/errors-only.log"] }
            }
        }"#,
    )?;
    let log = settings.build(&OsFs)?;
    log.info("Written to logs/app.log");
    log.error(Some("Written to stderr, logs/app.log and logs/errors-only.log"));
    log.shutdown(Duration::from_secs(5));

    println!("\n=== Example completed successfully! ===");
    println!("Check the 'logs' directory for the log output");

    Ok(())
}
