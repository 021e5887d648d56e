//! Named logger: admission gate, record construction, handler fan-out.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use super::error::Result;
use super::handler::Handler;
use super::level::{Level, LevelSpec};
use super::record::{CallSite, Record};
use super::registry::RegistryShared;

/// What a terminal severity does to the process after fan-out completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalAction {
    Continue,
    Exit(i32),
    Panic,
}

/// Per-severity process-termination decision, consulted only after the
/// record has been dispatched to every handler.
pub trait TerminationPolicy: Send + Sync {
    fn action(&self, level_no: u8) -> TerminalAction;
}

/// Default behavior: critical and alert exit the process, panic panics with
/// the rendered message, everything else continues.
pub struct DefaultTermination;

impl TerminationPolicy for DefaultTermination {
    fn action(&self, level_no: u8) -> TerminalAction {
        match level_no {
            n if n == Level::Panic.value() => TerminalAction::Panic,
            n if n == Level::Alert.value() => TerminalAction::Exit(1),
            n if n == Level::Critical.value() => TerminalAction::Exit(1),
            _ => TerminalAction::Continue,
        }
    }
}

/// Policy that never terminates; keeps dispatch testable.
pub struct NoTermination;

impl TerminationPolicy for NoTermination {
    fn action(&self, _level_no: u8) -> TerminalAction {
        TerminalAction::Continue
    }
}

/// A named logger.
///
/// Owns a severity threshold and an ordered list of shared handlers
/// (insertion order preserved, duplicates allowed, lifetimes not owned).
/// Loggers are created through a [`Registry`](super::registry::Registry) and
/// shared as `Arc<Logger>`.
pub struct Logger {
    name: Mutex<String>,
    level: Mutex<u8>,
    handlers: Mutex<Vec<Arc<dyn Handler>>>,
    termination: Mutex<Arc<dyn TerminationPolicy>>,
    registry: Weak<RegistryShared>,
    this: Weak<Logger>,
}

impl Logger {
    pub(crate) fn new(
        name: impl Into<String>,
        level: u8,
        handlers: Vec<Arc<dyn Handler>>,
        registry: Weak<RegistryShared>,
    ) -> Arc<Self> {
        let name = name.into();
        Arc::new_cyclic(|this| Self {
            name: Mutex::new(name),
            level: Mutex::new(level),
            handlers: Mutex::new(handlers),
            termination: Mutex::new(Arc::new(DefaultTermination)),
            registry,
            this: this.clone(),
        })
    }

    pub fn name(&self) -> String {
        self.name.lock().clone()
    }

    /// Rename this logger, atomically relocating its registry slot. A later
    /// lookup by the old name creates a fresh default logger.
    pub fn set_name(&self, name: &str) {
        let mut current = self.name.lock();
        if let (Some(registry), Some(this)) = (self.registry.upgrade(), self.this.upgrade()) {
            let mut loggers = registry.loggers.lock();
            // Only relocate a slot this logger still occupies; a displaced
            // logger renames locally without touching its usurper's entry.
            let occupies_slot = loggers
                .get(current.as_str())
                .map_or(false, |registered| Arc::ptr_eq(registered, &this));
            if occupies_slot {
                loggers.remove(current.as_str());
                loggers.insert(name.to_string(), this);
            }
        }
        *current = name.to_string();
    }

    pub fn level(&self) -> u8 {
        *self.level.lock()
    }

    /// Set the admission threshold, numerically or by name. An unrecognized
    /// name is the hard validation error.
    pub fn set_level(&self, level: impl Into<LevelSpec>) -> Result<()> {
        let level = level.into().resolve()?;
        *self.level.lock() = level;
        Ok(())
    }

    /// Replace the whole handler list atomically.
    pub fn set_handlers(&self, handlers: Vec<Arc<dyn Handler>>) {
        *self.handlers.lock() = handlers;
    }

    /// Append handlers, preserving insertion order.
    pub fn add_handlers(&self, handlers: impl IntoIterator<Item = Arc<dyn Handler>>) {
        self.handlers.lock().extend(handlers);
    }

    /// The current handler list. The entries are the live shared handlers,
    /// not copies of their state.
    pub fn handlers(&self) -> Vec<Arc<dyn Handler>> {
        self.handlers.lock().clone()
    }

    pub fn set_termination_policy(&self, policy: Arc<dyn TerminationPolicy>) {
        *self.termination.lock() = policy;
    }

    /// Whether a call at `level_no` passes this logger's threshold.
    /// Lower number means more severe; `notset` (255) admits everything.
    pub fn enabled(&self, level_no: u8) -> bool {
        level_no <= *self.level.lock()
    }

    /// Log at an arbitrary numeric level, resolving the call site through
    /// `#[track_caller]`.
    #[track_caller]
    pub fn log(&self, level_no: u8, message: impl Into<String>) {
        self.log_at(level_no, CallSite::caller(), message);
    }

    /// Log with an explicitly captured call site (the macro entry point).
    ///
    /// The single admission gate for the whole call: on a threshold miss no
    /// record is built and no handler is touched. On a pass, one record is
    /// built and fanned out to the handlers in insertion order; each handler
    /// re-checks its own level window, and handler errors are discarded so a
    /// faulty sink never starves the others. Any terminal action runs only
    /// after the full fan-out.
    pub fn log_at(&self, level_no: u8, site: CallSite, message: impl Into<String>) {
        if !self.enabled(level_no) {
            return;
        }

        let record = Record::new(level_no, self.name(), message, site);
        self.dispatch(&record);
        self.terminate(level_no, &record.message);
    }

    fn dispatch(&self, record: &Record) {
        // Snapshot so a handler that logs (or mutates the list) cannot
        // deadlock against the handler-list lock.
        let handlers = self.handlers.lock().clone();
        for handler in handlers {
            if handler.level().contains(record.level_no) {
                let _ = handler.handle(record);
            }
        }
    }

    fn terminate(&self, level_no: u8, message: &str) {
        let policy = Arc::clone(&self.termination.lock());
        match policy.action(level_no) {
            TerminalAction::Continue => {}
            TerminalAction::Exit(code) => std::process::exit(code),
            TerminalAction::Panic => panic!("{}", message),
        }
    }

    /// Log at the `notset` sentinel severity; admitted only by an unfiltered
    /// logger.
    #[track_caller]
    pub fn print(&self, message: impl Into<String>) {
        self.log(Level::NotSet.value(), message);
    }

    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(Level::Trace.value(), message);
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug.value(), message);
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info.value(), message);
    }

    #[track_caller]
    pub fn notice(&self, message: impl Into<String>) {
        self.log(Level::Notice.value(), message);
    }

    #[track_caller]
    pub fn warning(&self, message: impl Into<String>) {
        self.log(Level::Warning.value(), message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error.value(), message);
    }

    /// Terminal under the default policy: exits the process after fan-out.
    #[track_caller]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(Level::Critical.value(), message);
    }

    /// Terminal under the default policy: exits the process after fan-out.
    #[track_caller]
    pub fn alert(&self, message: impl Into<String>) {
        self.log(Level::Alert.value(), message);
    }

    /// Terminal under the default policy: panics with the message after
    /// fan-out.
    #[track_caller]
    pub fn panic(&self, message: impl Into<String>) {
        self.log(Level::Panic.value(), message);
    }
}
