//! Process-scoped registries for loggers, handlers, and formatters.
//!
//! Every map is populated lazily: get-or-create is the only construction
//! path, a miss always creates a default entity, and concurrent first
//! lookups cannot race to create two entities (check-then-create happens
//! under the map's own lock).
//!
//! Lock order, where multiple maps are touched: loggers, then handlers,
//! then formatters.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use super::error::Result;
use super::formatter::Formatter;
use super::handler::Handler;
use super::level::{Level, LevelRange};
use super::logger::Logger;
use crate::handlers::{FileHandler, NullHandler, StreamHandler};

/// Name of the formatter new handlers are configured with.
pub const DEFAULT_FORMATTER: &str = "default";

pub(crate) struct RegistryShared {
    pub(crate) loggers: Mutex<HashMap<String, Arc<Logger>>>,
    pub(crate) handlers: Mutex<HashMap<String, Arc<dyn Handler>>>,
    pub(crate) formatters: Mutex<HashMap<String, Arc<Formatter>>>,
}

/// A context-scoped set of named registries.
///
/// Cloning yields another handle to the same registries. Tests instantiate
/// isolated registries; [`crate::global()`] holds the process-wide one.
#[derive(Clone)]
pub struct Registry {
    shared: Arc<RegistryShared>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(RegistryShared {
                loggers: Mutex::new(HashMap::new()),
                handlers: Mutex::new(HashMap::new()),
                formatters: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Get or create the logger registered under `name`.
    ///
    /// A fresh logger has threshold `notset` and the two default handlers
    /// attached: "stdout" admitting warning and everything less severe,
    /// "stderr" admitting error and everything more severe. It is usable
    /// without any further setup.
    pub fn logger(&self, name: &str) -> Arc<Logger> {
        let mut loggers = self.shared.loggers.lock();
        if let Some(logger) = loggers.get(name) {
            return Arc::clone(logger);
        }

        let stdout = self.get_or_insert_handler("stdout", || {
            let handler: Arc<dyn Handler> = StreamHandler::with_stream(
                "stdout",
                Box::new(std::io::stdout()),
                LevelRange::new(Level::Warning.value(), Level::NotSet.value()),
                self.formatter(DEFAULT_FORMATTER),
            );
            handler
        });
        let stderr = self.get_or_insert_handler("stderr", || {
            let handler: Arc<dyn Handler> = StreamHandler::with_stream(
                "stderr",
                Box::new(std::io::stderr()),
                LevelRange::new(Level::Panic.value(), Level::Error.value()),
                self.formatter(DEFAULT_FORMATTER),
            );
            handler
        });

        let logger = Logger::new(
            name,
            Level::NotSet.value(),
            vec![stdout, stderr],
            Arc::downgrade(&self.shared),
        );
        loggers.insert(name.to_string(), Arc::clone(&logger));
        logger
    }

    /// Get or create the formatter registered under `name`, with the default
    /// template and date format on first use.
    pub fn formatter(&self, name: &str) -> Arc<Formatter> {
        let mut formatters = self.shared.formatters.lock();
        if let Some(formatter) = formatters.get(name) {
            return Arc::clone(formatter);
        }
        let formatter = Formatter::with_defaults(name);
        formatters.insert(name.to_string(), Arc::clone(&formatter));
        formatter
    }

    /// Get or create a stream handler writing to `stream`, admitting every
    /// level. For an already-registered name the existing handler is
    /// returned unchanged and the arguments are ignored.
    pub fn stream_handler(
        &self,
        name: &str,
        stream: Box<dyn Write + Send>,
    ) -> Arc<dyn Handler> {
        self.get_or_insert_handler(name, || {
            let handler: Arc<dyn Handler> = StreamHandler::with_stream(
                name,
                stream,
                LevelRange::all(),
                self.formatter(DEFAULT_FORMATTER),
            );
            handler
        })
    }

    /// Get or create a handler that discards every record.
    pub fn null_handler(&self, name: &str) -> Arc<dyn Handler> {
        self.get_or_insert_handler(name, || {
            let handler: Arc<dyn Handler> =
                NullHandler::new(name, self.formatter(DEFAULT_FORMATTER));
            handler
        })
    }

    /// Get or create a file handler appending to `path`.
    ///
    /// Construction creates the parent directory with `dir_mode` and opens
    /// the file in append mode with `file_mode`; either failure aborts with
    /// a descriptive error and registers nothing. For an already-registered
    /// name the existing handler is returned unchanged, its original target
    /// included.
    pub fn file_handler(
        &self,
        name: &str,
        path: impl AsRef<Path>,
        dir_mode: u32,
        file_mode: u32,
    ) -> Result<Arc<dyn Handler>> {
        let mut handlers = self.shared.handlers.lock();
        if let Some(handler) = handlers.get(name) {
            return Ok(Arc::clone(handler));
        }
        let handler: Arc<dyn Handler> = FileHandler::with_formatter(
            name,
            path,
            dir_mode,
            file_mode,
            LevelRange::all(),
            self.formatter(DEFAULT_FORMATTER),
        )?;
        handler.core().attach(&self.shared, Arc::downgrade(&handler));
        handlers.insert(name.to_string(), Arc::clone(&handler));
        Ok(handler)
    }

    /// Look up a handler without creating one.
    pub fn get_handler(&self, name: &str) -> Option<Arc<dyn Handler>> {
        self.shared.handlers.lock().get(name).map(Arc::clone)
    }

    /// Look up a logger without creating one.
    pub fn get_logger(&self, name: &str) -> Option<Arc<Logger>> {
        self.shared.loggers.lock().get(name).map(Arc::clone)
    }

    /// Look up a formatter without creating one.
    pub fn get_formatter(&self, name: &str) -> Option<Arc<Formatter>> {
        self.shared.formatters.lock().get(name).map(Arc::clone)
    }

    fn get_or_insert_handler(
        &self,
        name: &str,
        build: impl FnOnce() -> Arc<dyn Handler>,
    ) -> Arc<dyn Handler> {
        let mut handlers = self.shared.handlers.lock();
        if let Some(handler) = handlers.get(name) {
            return Arc::clone(handler);
        }
        let handler = build();
        handler.core().attach(&self.shared, Arc::downgrade(&handler));
        handlers.insert(name.to_string(), Arc::clone(&handler));
        handler
    }

    /// Register an externally built handler, replacing any same-named entry.
    /// Used by the configuration loader's commit phase.
    pub(crate) fn insert_handler(&self, name: &str, handler: Arc<dyn Handler>) {
        let mut handlers = self.shared.handlers.lock();
        handler.core().attach(&self.shared, Arc::downgrade(&handler));
        handlers.insert(name.to_string(), handler);
    }

    /// Register an externally built formatter, replacing any same-named
    /// entry. Used by the configuration loader's commit phase.
    pub(crate) fn insert_formatter(&self, name: &str, formatter: Arc<Formatter>) {
        self.shared.formatters.lock().insert(name.to_string(), formatter);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
