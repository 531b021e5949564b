//! Timestamp formatting utilities
//!
//! Provides the encodings available for the time field of a record.
//! Text formats are emitted as JSON strings, Unix formats as JSON numbers.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write;

/// Timestamp encodings for the time field
///
/// # Examples
///
/// ```
/// use rust_json_logger::TimestampFormat;
/// use chrono::Utc;
///
/// let value = TimestampFormat::Rfc3339Nanos.to_value(&Utc::now());
/// assert!(value.as_str().unwrap().ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// RFC 3339 with nanoseconds: `2025-01-08T10:30:45.123456789Z`
    #[default]
    Rfc3339Nanos,

    /// RFC 3339 with microseconds: `2025-01-08T10:30:45.123456Z`
    Rfc3339Micros,

    /// RFC 3339 with milliseconds: `2025-01-08T10:30:45.123Z`
    Rfc3339Millis,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Unix timestamp in nanoseconds: `1736332245123456789`
    UnixNanos,

    /// Custom strftime format, emitted as a string
    ///
    /// ```
    /// use rust_json_logger::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// assert!(!format.is_numeric());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a `DateTime<Utc>` as text according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Rfc3339Nanos => datetime.to_rfc3339_opts(SecondsFormat::Nanos, true),
            TimestampFormat::Rfc3339Micros => {
                datetime.to_rfc3339_opts(SecondsFormat::Micros, true)
            }
            TimestampFormat::Rfc3339Millis => {
                datetime.to_rfc3339_opts(SecondsFormat::Millis, true)
            }
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::UnixNanos => Self::unix_nanos(datetime).to_string(),
            TimestampFormat::Custom(format_str) => {
                let mut text = String::new();
                if write!(text, "{}", datetime.format(format_str)).is_err() {
                    return datetime.to_rfc3339_opts(SecondsFormat::Nanos, true);
                }
                text
            }
        }
    }

    /// Whether a custom pattern is valid strftime. Built-in formats always are.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            TimestampFormat::Custom(format_str) => {
                !StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error))
            }
            _ => true,
        }
    }

    /// Encode a timestamp as the JSON value placed in the record
    #[must_use]
    pub fn to_value(&self, datetime: &DateTime<Utc>) -> Value {
        match self {
            TimestampFormat::Unix => Value::from(datetime.timestamp()),
            TimestampFormat::UnixMillis => Value::from(datetime.timestamp_millis()),
            TimestampFormat::UnixNanos => Value::from(Self::unix_nanos(datetime)),
            _ => Value::String(self.format(datetime)),
        }
    }

    /// Check if this is a Unix-based numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TimestampFormat::Unix | TimestampFormat::UnixMillis | TimestampFormat::UnixNanos
        )
    }

    // Out of i64 range after 2262; saturate rather than fail.
    fn unix_nanos(datetime: &DateTime<Utc>) -> i64 {
        datetime.timestamp_nanos_opt().unwrap_or(i64::MAX)
    }
}
