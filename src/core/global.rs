//! Process-wide default logger
//!
//! The default logger is built on first use with all defaults, unless a
//! logger was installed with [`set_default_logger`] before that. Once set it
//! never changes; reconfiguring means building a new `Logger` and using it
//! directly.

use super::logger::call_site;
use super::{log_context::Context, log_level::Level, logger::Logger};
use once_cell::sync::OnceCell;

static DEFAULT_LOGGER: OnceCell<Logger> = OnceCell::new();

/// Get the default logger, building it on first call
pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(Logger::default)
}

/// Install `logger` as the default. Fails, handing the logger back, if the
/// default was already set or already used.
///
/// # Example
///
/// ```
/// use rust_json_logger::prelude::*;
///
/// let logger = Logger::builder().level(Level::DEBUG).build().unwrap();
/// if set_default_logger(logger).is_err() {
///     eprintln!("default logger was already initialized");
/// }
/// ```
pub fn set_default_logger(logger: Logger) -> std::result::Result<(), Logger> {
    DEFAULT_LOGGER.set(logger)
}

/// Log at the debug level through the default logger
#[inline(never)]
pub fn debug(message: impl AsRef<str>, contexts: &[Context]) {
    let logger = default_logger();
    if logger.enabled(Level::DEBUG) {
        let call = call_site!(logger);
        logger.write(Level::DEBUG, message.as_ref(), contexts, call);
    }
}

/// Log at the info level through the default logger
#[inline(never)]
pub fn info(message: impl AsRef<str>, contexts: &[Context]) {
    let logger = default_logger();
    if logger.enabled(Level::INFO) {
        let call = call_site!(logger);
        logger.write(Level::INFO, message.as_ref(), contexts, call);
    }
}

/// Log at the error level through the default logger
#[inline(never)]
pub fn error(message: impl AsRef<str>, contexts: &[Context]) {
    let logger = default_logger();
    if logger.enabled(Level::ERROR) {
        let call = call_site!(logger);
        logger.write(Level::ERROR, message.as_ref(), contexts, call);
    }
}

/// Log at the fatal level through the default logger, then exit the process
#[inline(never)]
pub fn fatal(message: impl AsRef<str>, contexts: &[Context]) -> ! {
    let logger = default_logger();
    let call = call_site!(logger);
    logger.write(Level::FATAL, message.as_ref(), contexts, call);
    logger.exit_fatal()
}
