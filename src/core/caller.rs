//! Call-site resolution
//!
//! The logger reports where a record came from by walking the stack of the
//! logging thread. Stack access sits behind [`StackWalker`] so the skip
//! arithmetic and the rendering rules below can run against any frame
//! source; [`BacktraceWalker`] is the one used in production.
//!
//! Resolution needs symbol and line information. Binaries stripped of debug
//! info produce unresolved calls, which render as `"unresolvable"` rather
//! than a guessed location.

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Marker substring used to find the walker's own frame by symbol name
const WALKER_ANCHOR: &str = "BacktraceWalker";

/// Rendered in place of a location that could not be resolved
pub const UNRESOLVABLE: &str = "unresolvable";

/// Function-name prefixes of the panic runtime. A record logged from a panic
/// hook sees these between the hook and the frame that panicked.
const PANIC_RUNTIME: &[&str] = &[
    "std::panicking::",
    "core::panicking::",
    "std::panic::",
    "core::panic::",
    "std::sys::backtrace::__rust_end_short_backtrace",
    "std::sys_common::backtrace::__rust_end_short_backtrace",
    "rust_begin_unwind",
    "__rust_start_panic",
    "rust_panic",
];

/// Directory names that mark the root of a crate's sources
const SOURCE_ROOTS: &[&str] = &["src", "tests", "benches", "examples"];

/// One resolved (or partially resolved) stack frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub function: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl Frame {
    pub fn new(function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            function: Some(function.into()),
            file: Some(file.into()),
            line: Some(line),
        }
    }

    /// A frame known only by its symbol name, as in binaries without line tables
    pub fn named(function: impl Into<String>) -> Self {
        Self {
            function: Some(function.into()),
            ..Self::default()
        }
    }

    fn is_panic_runtime(&self) -> bool {
        self.function
            .as_deref()
            .is_some_and(|name| PANIC_RUNTIME.iter().any(|prefix| name.starts_with(prefix)))
    }
}

/// Source of stack frames for caller resolution.
///
/// `frames()[0]` must be the frame that invoked `frames`, followed by its
/// callers outward.
pub trait StackWalker: Send + Sync {
    fn frames(&self) -> Vec<Frame>;
}

/// Walks the live stack of the current thread with the `backtrace` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceWalker;

impl BacktraceWalker {
    /// Start address of `frames`, compared with the enclosing function of
    /// each raw frame
    fn own_address() -> usize {
        <Self as StackWalker>::frames as fn(&Self) -> Vec<Frame> as usize
    }
}

impl StackWalker for BacktraceWalker {
    #[inline(never)]
    fn frames(&self) -> Vec<Frame> {
        let mut raw = Vec::new();
        backtrace::trace(|frame| {
            raw.push(frame.clone());
            true
        });

        let addresses: Vec<usize> = raw.iter().map(|f| f.symbol_address() as usize).collect();
        let anchor = anchor_by_address(&addresses, Self::own_address()).or_else(|| {
            let symbols: Vec<Vec<Frame>> = raw.iter().map(symbolize).collect();
            anchor_by_name(&symbols)
        });

        match anchor {
            Some(index) => raw[index + 1..].iter().flat_map(symbolize).collect(),
            None => Vec::new(),
        }
    }
}

/// Symbols of one raw frame, innermost first. Inlined calls resolve to
/// several symbols for one frame.
fn symbolize(frame: &backtrace::Frame) -> Vec<Frame> {
    let mut symbols = Vec::new();
    backtrace::resolve_frame(frame, |symbol| {
        symbols.push(Frame {
            function: symbol.name().map(|name| format!("{:#}", name)),
            file: symbol.filename().map(|path| path.display().to_string()),
            line: symbol.lineno(),
        });
    });
    if symbols.is_empty() {
        symbols.push(Frame::default());
    }
    symbols
}

/// Index of the raw frame whose enclosing function starts at `own`
fn anchor_by_address(addresses: &[usize], own: usize) -> Option<usize> {
    addresses
        .iter()
        .rposition(|&address| address != 0 && address == own)
}

/// Fallback for unwinders that cannot report where a frame's function
/// starts. Only works with qualified symbol names.
fn anchor_by_name(symbols: &[Vec<Frame>]) -> Option<usize> {
    symbols.iter().rposition(|raw| {
        raw.iter().any(|symbol| {
            symbol
                .function
                .as_deref()
                .is_some_and(|name| name.contains(WALKER_ANCHOR))
        })
    })
}

/// Resolve the frame `skip` levels above the caller of `resolve`.
///
/// With `skip == 0` the result is the function that called `resolve`. If
/// the selected frame is inside the panic runtime, resolution moves outward
/// to the first frame that is not, which is the frame that panicked.
#[inline(never)]
pub fn resolve(walker: &dyn StackWalker, skip: usize) -> Call {
    let frames = walker.frames();

    // frames[0] is this function
    let mut index = skip + 1;
    while frames.get(index).is_some_and(Frame::is_panic_runtime) {
        index += 1;
    }

    Call {
        frame: frames.get(index).cloned().unwrap_or_default(),
    }
}

/// How much of a source path to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathStyle {
    /// Last path segment: `logger.rs`
    Short,
    /// From the crate directory: `my_crate/src/logger.rs`
    Relative,
    /// Path as recorded in debug info
    Full,
}

/// Rendering of the caller field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallerFormat {
    ShortFile,
    RelativeFile,
    FullFile,
    /// Line number alone, emitted as a JSON number
    Line,
    /// Function name without its module path: `Server::run`
    Function,
    /// Fully qualified function name: `my_crate::net::Server::run`
    QualifiedFunction,
    /// `logger.rs:42`
    #[default]
    Short,
    /// `my_crate/src/logger.rs:42`
    Relative,
    /// `/home/me/my_crate/src/logger.rs:42`
    Full,
    /// `{"file": "my_crate/src/logger.rs", "line": 42, "function": "my_crate::f"}`
    Structured,
}

/// The location a record was logged from.
///
/// Any part may be missing. A format renders when the parts it shows are
/// known, so a frame with a symbol name but no line table still renders
/// `Function` and `QualifiedFunction`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Call {
    frame: Frame,
}

impl Call {
    pub fn new(frame: Frame) -> Self {
        Self { frame }
    }

    pub fn unresolved() -> Self {
        Self::default()
    }

    /// Whether any part of the location is known
    pub fn is_resolved(&self) -> bool {
        self.frame.function.is_some() || self.frame.file.is_some()
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn file(&self, style: PathStyle) -> Option<&str> {
        let file = self.frame.file.as_deref()?;
        Some(match style {
            PathStyle::Full => file,
            PathStyle::Short => short_path(file),
            PathStyle::Relative => relative_path(file),
        })
    }

    pub fn line(&self) -> Option<u32> {
        self.frame.line
    }

    pub fn function(&self, qualified: bool) -> Option<&str> {
        let name = self.frame.function.as_deref()?;
        Some(if qualified { name } else { short_function(name) })
    }

    /// Render in the requested format, failing if a part it needs is unknown
    pub fn render(&self, format: CallerFormat) -> Result<Value> {
        let text = |part: Option<&str>| {
            part.map(|s| Value::String(s.to_string()))
                .ok_or(LoggerError::NoCallInfo)
        };
        let located = |style| match (self.file(style), self.line()) {
            (Some(file), Some(line)) => Ok(Value::String(format!("{}:{}", file, line))),
            _ => Err(LoggerError::NoCallInfo),
        };

        match format {
            CallerFormat::ShortFile => text(self.file(PathStyle::Short)),
            CallerFormat::RelativeFile => text(self.file(PathStyle::Relative)),
            CallerFormat::FullFile => text(self.file(PathStyle::Full)),
            CallerFormat::Line => self.line().map(Value::from).ok_or(LoggerError::NoCallInfo),
            CallerFormat::Function => text(self.function(false)),
            CallerFormat::QualifiedFunction => text(self.function(true)),
            CallerFormat::Short => located(PathStyle::Short),
            CallerFormat::Relative => located(PathStyle::Relative),
            CallerFormat::Full => located(PathStyle::Full),
            CallerFormat::Structured => {
                if !self.is_resolved() {
                    return Err(LoggerError::NoCallInfo);
                }
                let mut fields = Map::new();
                if let Some(file) = self.file(PathStyle::Relative) {
                    fields.insert("file".to_string(), Value::from(file));
                }
                if let Some(line) = self.line() {
                    fields.insert("line".to_string(), Value::from(line));
                }
                if let Some(function) = self.function(true) {
                    fields.insert("function".to_string(), Value::from(function));
                }
                Ok(Value::Object(fields))
            }
        }
    }

    /// The record value for this call; a format that cannot be rendered
    /// becomes [`UNRESOLVABLE`]
    pub fn to_value(&self, format: CallerFormat) -> Value {
        self.render(format)
            .unwrap_or_else(|_| Value::String(UNRESOLVABLE.to_string()))
    }

    /// `file:line` text, failing with [`LoggerError::NoCallInfo`] unless both are known
    pub fn to_text(&self) -> Result<String> {
        match (self.file(PathStyle::Short), self.line()) {
            (Some(file), Some(line)) => Ok(format!("{}:{}", file, line)),
            _ => Err(LoggerError::NoCallInfo),
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str(UNRESOLVABLE),
        }
    }
}

fn short_path(file: &str) -> &str {
    file.rsplit(['/', '\\']).next().unwrap_or(file)
}

/// Trim `file` so it starts at the directory holding the last source root
/// (`src`, `tests`, ...). Paths without one are returned whole.
fn relative_path(file: &str) -> &str {
    let separators: Vec<usize> = file
        .char_indices()
        .filter(|(_, c)| *c == '/' || *c == '\\')
        .map(|(i, _)| i)
        .collect();

    // Segment k spans (separators[k-1] + 1)..separators[k]
    let segment_start = |k: usize| if k == 0 { 0 } else { separators[k - 1] + 1 };
    for k in (0..separators.len()).rev() {
        let segment = &file[segment_start(k)..separators[k]];
        if SOURCE_ROOTS.contains(&segment) {
            let start = if k == 0 { 0 } else { segment_start(k - 1) };
            return &file[start..];
        }
    }
    file
}

/// Drop the module path from a qualified name, keeping a type name and any
/// trailing closure markers: `app::net::Server::run::{{closure}}` becomes
/// `Server::run::{{closure}}`.
fn short_function(name: &str) -> &str {
    let segments: Vec<&str> = name.split("::").collect();
    let mut keep = segments
        .iter()
        .rev()
        .take_while(|s| s.starts_with("{{"))
        .count();
    if keep < segments.len() {
        keep += 1;
    }
    if keep < segments.len() {
        let owner = segments[segments.len() - keep - 1];
        if owner.chars().next().is_some_and(char::is_uppercase) {
            keep += 1;
        }
    }

    let dropped = segments.len() - keep;
    let offset: usize = segments[..dropped].iter().map(|s| s.len() + 2).sum();
    &name[offset..]
}
