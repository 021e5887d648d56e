//! # logfan
//!
//! A leveled logging library built around three named registries: loggers,
//! handlers, and formatters. A logger gates calls on its severity threshold,
//! builds an immutable record with call-site metadata, and fans it out to an
//! ordered list of handlers; each handler filters on its own inclusive level
//! window and renders the record through a shared template formatter before
//! writing to its sink.
//!
//! ## Features
//!
//! - **Named registries**: get-or-create lookup for loggers, handlers, and
//!   formatters, isolated per [`Registry`] or via the process-wide default
//! - **Level windows**: each handler accepts an inclusive `[min, max]`
//!   severity range, independent of the logger threshold
//! - **Template formatters**: `{date}`, `{levelName}`, `{message}`, and
//!   friends, substituted in a single pass
//! - **Thread safe**: every logger, handler, and formatter guards its own
//!   state; parallel callers never interleave one record mid-write
//!
//! ## Quick start
//!
//! ```
//! use logfan::{info, Registry};
//!
//! let registry = Registry::new();
//! let logger = registry.logger("svc");
//! logger.set_level("debug").unwrap();
//! info!(logger, "listening on {}", "0.0.0.0:8080");
//! ```

pub mod config;
pub mod core;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::config::{apply_config, load_config, load_json_config, Config};
    pub use crate::core::{
        level_name, level_number, CallSite, DefaultTermination, Formatter, Handler, HandlerCore,
        Level, LevelRange, LevelSpec, LogError, Logger, NoTermination, Record, Registry, Result,
        TerminalAction, TerminationPolicy,
    };
    pub use crate::handlers::{FileHandler, NullHandler, StreamHandler};
}

pub use crate::config::{apply_config, load_config, load_json_config, Config};
pub use crate::core::{
    level_name, level_number, set_handler_level, CallSite, DefaultTermination, Formatter, Handler,
    HandlerCore, Level, LevelRange, LevelSpec, LogError, Logger, NoTermination, Record, Registry,
    Result, TerminalAction, TerminationPolicy, DEFAULT_DATE_FORMAT, DEFAULT_FORMAT,
    DEFAULT_FORMATTER,
};
pub use crate::handlers::{FileHandler, NullHandler, StreamHandler};

use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::Arc;

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// The process-wide default registry backing the package-level API.
pub fn global() -> &'static Registry {
    &GLOBAL
}

/// The root logger of the default registry.
pub fn root() -> Arc<Logger> {
    GLOBAL.logger("root")
}

/// The default formatter of the default registry, shared by every handler
/// that was not configured with an explicit one.
pub fn default_formatter() -> Arc<Formatter> {
    GLOBAL.formatter(DEFAULT_FORMATTER)
}

/// Set the default formatter's template.
pub fn set_format(format: impl Into<String>) {
    default_formatter().set_format(format);
}

/// Set the default formatter's date format.
pub fn set_date_format(date_format: impl Into<String>) {
    default_formatter().set_date_format(date_format);
}

/// Set the root logger's threshold, numerically or by name.
pub fn set_level(level: impl Into<LevelSpec>) -> Result<()> {
    root().set_level(level)
}

/// Attach a file handler over the default formatter to the root logger,
/// admitting every level. The handler is registered under the path itself.
pub fn add_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let handler = GLOBAL.file_handler(&path.display().to_string(), path, 0o755, 0o644)?;
    root().add_handlers([handler]);
    Ok(())
}

/// Log at the `notset` sentinel severity on the root logger.
#[track_caller]
pub fn print(message: impl Into<String>) {
    root().print(message);
}

#[track_caller]
pub fn trace(message: impl Into<String>) {
    root().trace(message);
}

#[track_caller]
pub fn debug(message: impl Into<String>) {
    root().debug(message);
}

#[track_caller]
pub fn info(message: impl Into<String>) {
    root().info(message);
}

#[track_caller]
pub fn notice(message: impl Into<String>) {
    root().notice(message);
}

#[track_caller]
pub fn warning(message: impl Into<String>) {
    root().warning(message);
}

#[track_caller]
pub fn error(message: impl Into<String>) {
    root().error(message);
}

/// Terminal under the default policy: exits the process after fan-out.
#[track_caller]
pub fn critical(message: impl Into<String>) {
    root().critical(message);
}

/// Terminal under the default policy: exits the process after fan-out.
#[track_caller]
pub fn alert(message: impl Into<String>) {
    root().alert(message);
}

/// Terminal under the default policy: panics with the message after fan-out.
#[track_caller]
pub fn panic(message: impl Into<String>) {
    root().panic(message);
}
