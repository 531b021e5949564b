//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Level text that matches none of the known names
    #[error("Unknown level: {input}")]
    UnknownLevel { input: String },

    /// A lazy value failed its contract at evaluation time
    #[error(transparent)]
    Lazy(#[from] LazyError),

    /// Call site could not be resolved from the stack
    #[error("no call stack information")]
    NoCallInfo,
}

/// Failures raised while evaluating a [`Lazy`](super::Lazy) value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LazyError {
    #[error("invalid value generator: wrong arity (takes {arity} arguments, expected 0)")]
    WrongArity { arity: usize },

    #[error("invalid value generator: no return value")]
    NoReturnValue,

    #[error("invalid value generator: {0}")]
    Serialize(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn unknown_level(input: impl Into<String>) -> Self {
        LoggerError::UnknownLevel {
            input: input.into(),
        }
    }
}
