//! Child logger example
//!
//! Demonstrates deriving loggers per request and per worker, each carrying
//! its own context, while all of them share one sink.
//!
//! Run with: cargo run --example child_loggers

use rust_json_logger::prelude::*;
use std::thread;

fn handle_request(logger: &Logger, id: u32) {
    let request = logger.with_context(&context! { "request_id" => format!("req-{}", id) });
    request.info("request started", &[]);

    if id % 3 == 0 {
        request.error("upstream timeout", &[context! { "upstream" => "inventory", "attempt" => 2 }]);
    }

    request.info("request finished", &[context! { "status" => if id % 3 == 0 { 504 } else { 200 } }]);
}

fn main() -> Result<()> {
    let root = Logger::builder()
        .context(context! { "service" => "checkout", "version" => env!("CARGO_PKG_VERSION") })
        .build()?;

    root.info("service starting", &[]);

    // Children can also change options, here the message key and threshold
    let audit = root
        .child(&context! { "channel" => "audit" })
        .message_key("event")
        .level(Level::DEBUG)
        .build()?;
    audit.debug("configuration loaded", &[context! { "workers" => 3 }]);

    let handles: Vec<_> = (0..3)
        .map(|worker| {
            let logger = root.with_context(&context! { "worker" => worker });
            thread::spawn(move || {
                for id in (worker * 10)..(worker * 10 + 3) {
                    handle_request(&logger, id);
                }
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            root.error("worker panicked", &[]);
        }
    }

    // The parent never picked up any child's fields
    root.info("service stopping", &[]);
    Ok(())
}
