//! Log level definitions
//!
//! Levels are integer backed and ordered by severity, most severe first:
//! `FATAL < ERROR < INFO < DEBUG`. A logger's threshold is the most verbose
//! level it emits, so an event passes when `event <= threshold`.

use super::error::LoggerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u8);

impl Level {
    pub const FATAL: Level = Level(0);
    pub const ERROR: Level = Level(1);
    pub const INFO: Level = Level(2);
    pub const DEBUG: Level = Level(3);

    /// Every defined level, most severe first
    pub const ALL: [Level; 4] = [Level::FATAL, Level::ERROR, Level::INFO, Level::DEBUG];

    /// Build a level from its raw ordinal. Ordinals outside the defined set
    /// are kept as-is and render as `"unknown"`.
    #[must_use]
    pub const fn from_ordinal(ordinal: u8) -> Self {
        Level(ordinal)
    }

    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self.0
    }

    pub fn to_str(&self) -> &'static str {
        match self.0 {
            0 => "fatal",
            1 => "error",
            2 => "info",
            3 => "debug",
            _ => "unknown",
        }
    }

    /// Whether an event at this level passes a logger whose threshold is `threshold`
    #[inline]
    #[must_use]
    pub fn enabled_at(self, threshold: Level) -> bool {
        self <= threshold
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::INFO
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "error" | "eror" | "err" => Ok(Level::ERROR),
            "fatal" => Ok(Level::FATAL),
            _ => Err(LoggerError::unknown_level(s)),
        }
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_str())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
