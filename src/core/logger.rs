//! Main logger implementation
//!
//! # Concurrency
//!
//! A `Logger` takes no locks and keeps no queue. Each leveled call runs the
//! whole pipeline on the calling thread (level check, merge, metadata,
//! encode, one write to the sink) and returns once the sink's write returns.
//! Records from concurrent callers are only as atomic as the sink makes
//! them: use a sink that is safe for concurrent writes, or give the logger a
//! [`Mutex`]-wrapped writer through [`LoggerBuilder::writer`].
//!
//! A logger's configuration never changes after `build`. Deriving a child
//! copies it, so parent and child evolve independently.

use super::{
    caller::{BacktraceWalker, Call, CallerFormat, StackWalker},
    error::{LoggerError, Result},
    log_context::Context,
    log_level::Level,
    record::Record,
    sink::Sink,
    timestamp::TimestampFormat,
};
use chrono::Utc;
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

pub const DEFAULT_TIME_KEY: &str = "ts";
pub const DEFAULT_LEVEL_KEY: &str = "lvl";
pub const DEFAULT_MESSAGE_KEY: &str = "message";
pub const DEFAULT_CALLER_KEY: &str = "caller";

/// Frames between the caller and the resolver: the leveled entry point.
pub const MIN_CALLER_SKIP: usize = 1;
pub const DEFAULT_CALLER_SKIP: usize = MIN_CALLER_SKIP;

/// Exit status used after a fatal record
pub const FATAL_EXIT_CODE: i32 = 1;

/// Receives errors for records that could not be encoded or written
pub type ErrorHandler = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// Resolve the call site of a logging call, or `None` when the caller key is
/// disabled.
///
/// Expanded in the body of every public entry point, so the entry point is
/// the frame that calls the resolver and is still on the stack when it
/// runs. The entry point's final call into `write` may compile to a jump
/// that removes its frame, so resolving from `write` is not reliable.
macro_rules! call_site {
    ($logger:expr) => {
        match $logger.caller_source() {
            Some((walker, skip)) => Some($crate::core::caller::resolve(walker, skip)),
            None => None,
        }
    };
}

pub(crate) use call_site;

#[derive(Clone)]
pub struct Logger {
    level: Level,
    context: Context,
    sink: Arc<dyn Sink>,
    time_key: String,
    level_key: String,
    message_key: String,
    caller_key: Option<String>,
    caller_skip: usize,
    caller_format: CallerFormat,
    time_format: TimestampFormat,
    walker: Arc<dyn StackWalker>,
    on_error: Option<ErrorHandler>,
}

impl Logger {
    /// Create a logger with default settings and the given base context.
    ///
    /// Defaults: level `INFO`, standard output, keys `ts`/`lvl`/`message`/`caller`.
    #[must_use]
    pub fn new(context: Context) -> Self {
        let mut logger = LoggerBuilder::new().into_logger();
        logger.context = context;
        logger
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_json_logger::prelude::*;
    ///
    /// let sink = MemorySink::new();
    /// let logger = Logger::builder()
    ///     .level(Level::DEBUG)
    ///     .context(context! { "service" => "billing" })
    ///     .sink(sink.clone())
    ///     .message_key("msg")
    ///     .build()
    ///     .unwrap();
    ///
    /// logger.debug("ready", &[]);
    /// assert_eq!(sink.records()[0]["msg"], "ready");
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Start a child logger: this logger's settings, with `extra` merged
    /// over its context. Further options may be applied before `build`.
    #[must_use]
    pub fn child(&self, extra: &Context) -> LoggerBuilder {
        LoggerBuilder::from_parent(self, self.context.merged(extra))
    }

    /// Derive a child logger with `extra` merged over this logger's context
    ///
    /// # Example
    /// ```
    /// use rust_json_logger::prelude::*;
    ///
    /// let sink = MemorySink::new();
    /// let service = Logger::builder().sink(sink.clone()).build().unwrap();
    /// let request = service.with_context(&context! { "request_id" => "r-17" });
    ///
    /// request.info("handled", &[]);
    /// service.info("idle", &[]);
    ///
    /// let records = sink.records();
    /// assert_eq!(records[0]["request_id"], "r-17");
    /// assert!(records[1].get("request_id").is_none());
    /// ```
    #[must_use]
    pub fn with_context(&self, extra: &Context) -> Logger {
        let mut child = self.clone();
        child.context = self.context.merged(extra);
        child
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn caller_skip(&self) -> usize {
        self.caller_skip
    }

    pub fn time_key(&self) -> &str {
        &self.time_key
    }

    pub fn level_key(&self) -> &str {
        &self.level_key
    }

    pub fn message_key(&self) -> &str {
        &self.message_key
    }

    pub fn caller_key(&self) -> Option<&str> {
        self.caller_key.as_deref()
    }

    /// Whether a record at `level` would be emitted
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level.enabled_at(self.level)
    }

    #[inline(never)]
    pub fn log(&self, level: Level, message: impl AsRef<str>, contexts: &[Context]) {
        if self.enabled(level) {
            let call = call_site!(self);
            self.write(level, message.as_ref(), contexts, call);
        }
    }

    #[inline(never)]
    pub fn debug(&self, message: impl AsRef<str>, contexts: &[Context]) {
        if self.enabled(Level::DEBUG) {
            let call = call_site!(self);
            self.write(Level::DEBUG, message.as_ref(), contexts, call);
        }
    }

    #[inline(never)]
    pub fn info(&self, message: impl AsRef<str>, contexts: &[Context]) {
        if self.enabled(Level::INFO) {
            let call = call_site!(self);
            self.write(Level::INFO, message.as_ref(), contexts, call);
        }
    }

    #[inline(never)]
    pub fn error(&self, message: impl AsRef<str>, contexts: &[Context]) {
        if self.enabled(Level::ERROR) {
            let call = call_site!(self);
            self.write(Level::ERROR, message.as_ref(), contexts, call);
        }
    }

    /// Log at the fatal level, then exit the process with
    /// [`FATAL_EXIT_CODE`]. The exit happens even if the record could not
    /// be written.
    #[inline(never)]
    pub fn fatal(&self, message: impl AsRef<str>, contexts: &[Context]) -> ! {
        let call = call_site!(self);
        self.write(Level::FATAL, message.as_ref(), contexts, call);
        self.exit_fatal()
    }

    /// Walker and skip used by `call_site!`, if call sites are recorded
    pub(crate) fn caller_source(&self) -> Option<(&dyn StackWalker, usize)> {
        match self.caller_key {
            Some(_) => Some((self.walker.as_ref(), self.caller_skip)),
            None => None,
        }
    }

    /// Build, encode and write one record. The caller has already checked
    /// the threshold and resolved `call`.
    pub(crate) fn write(&self, level: Level, message: &str, contexts: &[Context], call: Option<Call>) {
        let mut record = Record::merged(&self.context, contexts);
        record.set_value(&self.time_key, self.time_format.to_value(&Utc::now()));
        record.set_text(&self.message_key, message);
        record.set_text(&self.level_key, level.to_str());
        if let (Some(key), Some(call)) = (&self.caller_key, call) {
            record.set_value(key, call.to_value(self.caller_format));
        }

        let bytes = match record.encode() {
            Ok(bytes) => bytes,
            Err(e) => {
                self.report(&e);
                return;
            }
        };

        if let Err(e) = self.sink.write_record(&bytes) {
            self.report(&LoggerError::io_operation(
                "writing record",
                format!("sink '{}' rejected the {} record", self.sink.name(), level),
                e,
            ));
        }
    }

    pub(crate) fn exit_fatal(&self) -> ! {
        // Exiting skips destructors, so buffered sinks must be drained here.
        if let Err(e) = self.sink.flush() {
            self.report(&LoggerError::io_operation(
                "flushing sink before exit",
                format!("sink '{}' failed to flush", self.sink.name()),
                e,
            ));
        }
        std::process::exit(FATAL_EXIT_CODE)
    }

    fn report(&self, err: &LoggerError) {
        match &self.on_error {
            Some(handler) => handler(err),
            None => eprintln!("[LOGGER ERROR] Dropped log record: {}", err),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Context::new())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("context", &self.context)
            .field("sink", &self.sink.name())
            .field("time_key", &self.time_key)
            .field("level_key", &self.level_key)
            .field("message_key", &self.message_key)
            .field("caller_key", &self.caller_key)
            .field("caller_skip", &self.caller_skip)
            .field("caller_format", &self.caller_format)
            .field("time_format", &self.time_format)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Setters may be called in any order and any number of times; the last
/// call wins. Nothing is checked until [`build`](Self::build), which either
/// returns a complete logger or an error, never a partial one.
///
/// # Example
/// ```
/// use rust_json_logger::prelude::*;
///
/// let err = Logger::builder().caller_skip(0).build().unwrap_err();
/// assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
/// ```
pub struct LoggerBuilder {
    level: Level,
    context: Context,
    sink: Arc<dyn Sink>,
    time_key: String,
    level_key: String,
    message_key: String,
    caller_key: Option<String>,
    caller_skip: usize,
    caller_format: CallerFormat,
    time_format: TimestampFormat,
    walker: Arc<dyn StackWalker>,
    on_error: Option<ErrorHandler>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            level: Level::default(),
            context: Context::new(),
            sink: Arc::new(io::stdout()),
            time_key: DEFAULT_TIME_KEY.to_string(),
            level_key: DEFAULT_LEVEL_KEY.to_string(),
            message_key: DEFAULT_MESSAGE_KEY.to_string(),
            caller_key: Some(DEFAULT_CALLER_KEY.to_string()),
            caller_skip: DEFAULT_CALLER_SKIP,
            caller_format: CallerFormat::default(),
            time_format: TimestampFormat::default(),
            walker: Arc::new(BacktraceWalker),
            on_error: None,
        }
    }

    fn from_parent(parent: &Logger, context: Context) -> Self {
        Self {
            level: parent.level,
            context,
            sink: Arc::clone(&parent.sink),
            time_key: parent.time_key.clone(),
            level_key: parent.level_key.clone(),
            message_key: parent.message_key.clone(),
            caller_key: parent.caller_key.clone(),
            caller_skip: parent.caller_skip,
            caller_format: parent.caller_format,
            time_format: parent.time_format.clone(),
            walker: Arc::clone(&parent.walker),
            on_error: parent.on_error.clone(),
        }
    }

    /// Set the level threshold; records less severe than it are skipped
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Replace the base context. For a child builder this discards the
    /// inherited fields too.
    #[must_use = "builder methods return a new value"]
    pub fn context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    /// Write records to `sink`
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Write records to a sink that is also held elsewhere
    #[must_use = "builder methods return a new value"]
    pub fn shared_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = sink;
        self
    }

    /// Write records to any `io::Write`, serialized through a mutex
    #[must_use = "builder methods return a new value"]
    pub fn writer<W: Write + Send + 'static>(self, writer: W) -> Self {
        self.sink(Mutex::new(writer))
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_key(mut self, key: impl Into<String>) -> Self {
        self.time_key = key.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level_key(mut self, key: impl Into<String>) -> Self {
        self.level_key = key.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn message_key(mut self, key: impl Into<String>) -> Self {
        self.message_key = key.into();
        self
    }

    /// Record the call site under `key`
    #[must_use = "builder methods return a new value"]
    pub fn caller_key(mut self, key: impl Into<String>) -> Self {
        self.caller_key = Some(key.into());
        self
    }

    /// Leave the call site out of records and skip stack walking entirely
    #[must_use = "builder methods return a new value"]
    pub fn disable_caller(mut self) -> Self {
        self.caller_key = None;
        self
    }

    /// Frames to skip when resolving the call site. Raise it above
    /// [`MIN_CALLER_SKIP`] when logging through your own helper functions,
    /// one per helper, to report the helper's caller instead.
    #[must_use = "builder methods return a new value"]
    pub fn caller_skip(mut self, skip: usize) -> Self {
        self.caller_skip = skip;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn caller_format(mut self, format: CallerFormat) -> Self {
        self.caller_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_format(mut self, format: TimestampFormat) -> Self {
        self.time_format = format;
        self
    }

    /// Replace the frame source used for call-site resolution
    #[must_use = "builder methods return a new value"]
    pub fn stack_walker<W: StackWalker + 'static>(mut self, walker: W) -> Self {
        self.walker = Arc::new(walker);
        self
    }

    /// Route errors for dropped records to `handler` instead of stderr
    ///
    /// # Example
    ///
    /// ```
    /// use rust_json_logger::prelude::*;
    /// use std::sync::Arc;
    ///
    /// let logger = Logger::builder()
    ///     .on_error(Arc::new(|err: &LoggerError| eprintln!("log write failed: {}", err)))
    ///     .build()
    ///     .unwrap();
    /// ```
    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, handler: ErrorHandler) -> Self {
        self.on_error = Some(handler);
        self
    }

    /// Validate the settings and build the Logger
    pub fn build(self) -> Result<Logger> {
        if self.caller_skip < MIN_CALLER_SKIP {
            return Err(LoggerError::config(
                "caller_skip",
                format!("must be >= {}, got {}", MIN_CALLER_SKIP, self.caller_skip),
            ));
        }

        if !self.time_format.is_valid() {
            return Err(LoggerError::config(
                "time_format",
                format!("invalid strftime pattern in {:?}", self.time_format),
            ));
        }

        let mut keys = vec![
            ("time_key", self.time_key.as_str()),
            ("level_key", self.level_key.as_str()),
            ("message_key", self.message_key.as_str()),
        ];
        if let Some(key) = &self.caller_key {
            keys.push(("caller_key", key.as_str()));
        }
        for (i, (name, key)) in keys.iter().enumerate() {
            if key.is_empty() {
                return Err(LoggerError::config(*name, "must not be empty"));
            }
            if let Some((other, _)) = keys[..i].iter().find(|(_, k)| k == key) {
                return Err(LoggerError::config(
                    *name,
                    format!("'{}' is already used by {}", key, other),
                ));
            }
        }

        Ok(self.into_logger())
    }

    fn into_logger(self) -> Logger {
        Logger {
            level: self.level,
            context: self.context,
            sink: self.sink,
            time_key: self.time_key,
            level_key: self.level_key,
            message_key: self.message_key,
            caller_key: self.caller_key,
            caller_skip: self.caller_skip,
            caller_format: self.caller_format,
            time_format: self.time_format,
            walker: self.walker,
            on_error: self.on_error,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
