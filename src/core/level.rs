//! Severity level model.
//!
//! Levels follow the RFC 5424 numbering: lower numeric value means higher
//! severity, from panic (0) up to trace (8). The value 255 is the `notset`
//! sentinel meaning "not filtered / minimum threshold".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{LogError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Level {
    /// System is unusable.
    Panic = 0,
    /// Action must be taken immediately.
    Alert = 1,
    /// Critical conditions, e.g. failure in a secondary system.
    Critical = 2,
    /// Error conditions, non-urgent failures.
    Error = 3,
    /// Warning conditions, an indication that an error will occur if no
    /// action is taken.
    Warning = 4,
    /// Normal but significant condition.
    Notice = 5,
    /// Informational messages, normal operational chatter.
    Info = 6,
    /// Debug-level messages, useful to developers only.
    Debug = 7,
    /// Finest-grained tracing.
    Trace = 8,
    /// Sentinel: no filtering.
    NotSet = 255,
}

impl Level {
    /// Numeric rank of this level.
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Canonical lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Level::Panic => "panic",
            Level::Alert => "alert",
            Level::Critical => "critical",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Notice => "notice",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
            Level::NotSet => "notset",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        match lookup_level_number(s) {
            Some(0) => Ok(Level::Panic),
            Some(1) => Ok(Level::Alert),
            Some(2) => Ok(Level::Critical),
            Some(3) => Ok(Level::Error),
            Some(4) => Ok(Level::Warning),
            Some(5) => Ok(Level::Notice),
            Some(6) => Ok(Level::Info),
            Some(7) => Ok(Level::Debug),
            Some(8) => Ok(Level::Trace),
            Some(_) => Ok(Level::NotSet),
            None => Err(LogError::invalid_level(s)),
        }
    }
}

fn lookup_level_number(name: &str) -> Option<u8> {
    let number = match name {
        "notset" => Level::NotSet,
        "trace" => Level::Trace,
        "debug" => Level::Debug,
        "informational" | "info" => Level::Info,
        "notice" => Level::Notice,
        "warning" | "warn" => Level::Warning,
        "error" | "err" => Level::Error,
        "critical" | "crit" | "fatal" => Level::Critical,
        "alert" => Level::Alert,
        "panic" | "emergency" | "emerg" => Level::Panic,
        _ => return None,
    };
    Some(number.value())
}

/// Look up the canonical name for a numeric level.
///
/// An undefined number resolves to the empty string; this is a documented
/// soft failure, never an error.
pub fn level_name(level: u8) -> &'static str {
    match level {
        0 => "panic",
        1 => "alert",
        2 => "critical",
        3 => "error",
        4 => "warning",
        5 => "notice",
        6 => "info",
        7 => "debug",
        8 => "trace",
        255 => "notset",
        _ => "",
    }
}

/// Look up the numeric rank for a level name (aliases included).
///
/// An undefined name resolves to 0; callers must treat that as "unknown"
/// themselves. This is a documented soft failure, never an error.
pub fn level_number(name: &str) -> u8 {
    lookup_level_number(name).unwrap_or(0)
}

/// A level given either numerically or by name, resolved once at the
/// boundary into a canonical numeric rank.
///
/// In the JSON configuration path serde rejects any other value kind; an
/// unrecognized *name* is the hard validation error surfaced by
/// [`LevelSpec::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelSpec {
    Number(u8),
    Name(String),
}

impl LevelSpec {
    pub fn resolve(&self) -> Result<u8> {
        match self {
            LevelSpec::Number(n) => Ok(*n),
            LevelSpec::Name(name) => {
                lookup_level_number(name).ok_or_else(|| LogError::invalid_level(name))
            }
        }
    }
}

impl From<u8> for LevelSpec {
    fn from(n: u8) -> Self {
        LevelSpec::Number(n)
    }
}

impl From<Level> for LevelSpec {
    fn from(level: Level) -> Self {
        LevelSpec::Number(level.value())
    }
}

impl From<&str> for LevelSpec {
    fn from(name: &str) -> Self {
        LevelSpec::Name(name.to_string())
    }
}

impl From<String> for LevelSpec {
    fn from(name: String) -> Self {
        LevelSpec::Name(name)
    }
}

/// Inclusive numeric window of levels a handler accepts.
///
/// Bounds may be given in either order; the constructor normalizes them so
/// that `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRange {
    pub min: u8,
    pub max: u8,
}

impl LevelRange {
    pub fn new(a: u8, b: u8) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// The window accepting every level, `notset` included.
    pub fn all() -> Self {
        Self { min: 0, max: 255 }
    }

    pub fn contains(&self, level: u8) -> bool {
        self.min <= level && level <= self.max
    }
}

impl Default for LevelRange {
    fn default() -> Self {
        Self::all()
    }
}
