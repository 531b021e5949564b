//! # Rust JSON Logger
//!
//! A structured logger that writes each event as one JSON object per line
//! to a single sink.
//!
//! ## Features
//!
//! - **Leveled**: `fatal`, `error`, `info` and `debug`, filtered by a threshold
//! - **Contextual**: logger-wide fields, per-call fields and child loggers
//! - **Lazy fields**: values computed only for records that are emitted
//! - **Call sites**: file, line and function of the logging call
//!
//! ## Concurrency
//!
//! The logger does no locking, buffering or background work. Every call
//! writes synchronously on the calling thread, and concurrent records are
//! kept apart only by the sink. See [`core::logger`] for details.
//!
//! ```
//! use rust_json_logger::prelude::*;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder()
//!     .context(context! { "service" => "api" })
//!     .sink(sink.clone())
//!     .build()?;
//!
//! logger.info("listening", &[context! { "port" => 8080 }]);
//!
//! let record = &sink.records()[0];
//! assert_eq!(record["service"], "api");
//! assert_eq!(record["port"], 8080);
//! assert_eq!(record["lvl"], "info");
//! # Ok::<(), LoggerError>(())
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::context;
    pub use crate::core::{
        default_logger, set_default_logger, CallerFormat, Context, FieldValue, Lazy, Level,
        Logger, LoggerBuilder, LoggerError, Result, Sink, TimestampFormat,
    };
    pub use crate::sinks::{FileSink, MemorySink};
}

pub use crate::core::global::{debug, error, fatal, info};
pub use crate::core::{
    default_logger, set_default_logger, BacktraceWalker, Call, CallerFormat, Context,
    ErrorHandler, FieldValue, Frame, Lazy, LazyError, Level, Logger, LoggerBuilder, LoggerError,
    PathStyle, Result, Sink, StackWalker, TimestampFormat, ValueProvider, DEFAULT_CALLER_KEY,
    DEFAULT_CALLER_SKIP, DEFAULT_LEVEL_KEY, DEFAULT_MESSAGE_KEY, DEFAULT_TIME_KEY,
    FATAL_EXIT_CODE, MIN_CALLER_SKIP,
};
pub use sinks::{FileSink, MemorySink};
