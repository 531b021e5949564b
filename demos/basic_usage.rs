//! Basic logger usage example
//!
//! Demonstrates leveled JSON logging to standard output, call-site context,
//! custom keys and lazily computed fields.
//!
//! Run with: cargo run --example basic_usage

use rust_json_logger::prelude::*;
use rust_json_logger::{error, info};
use std::time::Instant;

fn main() -> Result<()> {
    eprintln!("=== rust_json_logger - Basic Usage Example ===\n");

    // Defaults: INFO threshold, standard output
    let logger = Logger::new(context! { "app" => "basic_usage" });

    eprintln!("1. Logging at different levels (debug is filtered out):");
    logger.debug("This is a debug message", &[]);
    logger.info("This is an info message", &[]);
    logger.error("This is an error message", &[]);

    eprintln!("\n2. Call-site context:");
    logger.info(
        "request handled",
        &[context! { "method" => "GET", "status" => 200, "cached" => false }],
    );

    eprintln!("\n3. Custom keys and a debug threshold:");
    let custom = Logger::builder()
        .level(Level::DEBUG)
        .time_key("@timestamp")
        .level_key("severity")
        .message_key("msg")
        .caller_format(CallerFormat::Function)
        .build()?;
    custom.debug("now visible", &[]);

    eprintln!("\n4. Lazy fields are computed when the record is written:");
    let started = Instant::now();
    let timed = logger.with_context(&context! {
        "elapsed_us" => Lazy::new(move || started.elapsed().as_micros() as u64),
    });
    timed.info("first", &[]);
    timed.info("second", &[]);

    eprintln!("\n5. Macros with format arguments:");
    let port = 8080;
    info!(logger, [context! { "port" => port }], "listening on port {}", port);
    error!(logger, "failed to bind {}", "0.0.0.0:80");

    eprintln!("\n6. Level names:");
    let parsed: Level = "err".parse()?;
    eprintln!("   'err' parses to {}", parsed);

    eprintln!("\n=== Example completed successfully! ===");
    Ok(())
}
