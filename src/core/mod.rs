//! Core logger types and traits

pub mod caller;
pub mod error;
pub mod global;
pub mod lazy;
pub mod log_context;
pub mod log_level;
pub mod logger;
pub mod record;
pub mod sink;
pub mod timestamp;

pub use caller::{BacktraceWalker, Call, CallerFormat, Frame, PathStyle, StackWalker};
pub use error::{LazyError, LoggerError, Result};
pub use global::{default_logger, set_default_logger};
pub use lazy::{Lazy, ValueProvider};
pub use log_context::{Context, FieldValue};
pub use log_level::Level;
pub use logger::{
    ErrorHandler, Logger, LoggerBuilder, DEFAULT_CALLER_KEY, DEFAULT_CALLER_SKIP,
    DEFAULT_LEVEL_KEY, DEFAULT_MESSAGE_KEY, DEFAULT_TIME_KEY, FATAL_EXIT_CODE, MIN_CALLER_SKIP,
};
pub use sink::Sink;
pub use timestamp::TimestampFormat;
