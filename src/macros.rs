//! Logging macros for ergonomic record construction.
//!
//! `context!` builds a [`Context`](crate::Context) from `key => value`
//! pairs. The leveled macros format the message like `format!` and accept
//! an optional leading list of contexts in brackets.
//!
//! # Examples
//!
//! ```
//! use rust_json_logger::prelude::*;
//! use rust_json_logger::{context, info};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder().sink(sink.clone()).build().unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments and call-site context
//! let port = 8080;
//! info!(logger, [context! { "port" => port }], "Server listening on port {}", port);
//!
//! assert_eq!(sink.records()[1]["port"], 8080);
//! ```

/// Build a [`Context`](crate::Context) from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use rust_json_logger::context;
///
/// let ctx = context! { "user_id" => 42, "active" => true };
/// assert_eq!(ctx.len(), 2);
/// assert!(context! {}.is_empty());
/// ```
#[macro_export]
macro_rules! context {
    () => {
        $crate::Context::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut ctx = $crate::Context::new();
        $( ctx.add_field($key, $value); )+
        ctx
    }};
}

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_json_logger::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
/// use rust_json_logger::{context, log};
/// log!(logger, Level::INFO, "Simple message");
/// log!(logger, Level::ERROR, [context! { "code" => 500 }], "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, [$($ctx:expr),* $(,)?], $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), &[$($ctx),*])
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), &[])
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_json_logger::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
/// use rust_json_logger::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::DEBUG, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_json_logger::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
/// use rust_json_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::INFO, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_json_logger::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
/// use rust_json_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::ERROR, $($arg)+)
    };
}

/// Log a fatal-level message and exit the process.
///
/// # Examples
///
/// ```no_run
/// # use rust_json_logger::prelude::*;
/// # let logger = Logger::new(Context::new());
/// use rust_json_logger::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, [$($ctx:expr),* $(,)?], $($arg:tt)+) => {
        $logger.fatal(format!($($arg)+), &[$($ctx),*])
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(format!($($arg)+), &[])
    };
}
