//! Core logging types and traits

pub mod error;
pub mod formatter;
pub mod handler;
pub mod level;
pub mod logger;
pub mod record;
pub mod registry;

pub use error::{LogError, Result};
pub use formatter::{Formatter, DEFAULT_DATE_FORMAT, DEFAULT_FORMAT};
pub use handler::{set_handler_level, Handler, HandlerCore};
pub use level::{level_name, level_number, Level, LevelRange, LevelSpec};
pub use logger::{
    DefaultTermination, Logger, NoTermination, TerminalAction, TerminationPolicy,
};
pub use record::{CallSite, Record};
pub use registry::{Registry, DEFAULT_FORMATTER};
