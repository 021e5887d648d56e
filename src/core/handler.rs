//! Handler trait and shared handler state.
//!
//! A handler is a level-windowed sink for records. Concrete variants embed
//! [`HandlerCore`] for the capability set every handler shares (name, level
//! window, formatter) and implement only [`Handler::handle`] themselves.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use super::error::Result;
use super::formatter::Formatter;
use super::level::{LevelRange, LevelSpec};
use super::record::Record;
use super::registry::RegistryShared;

pub trait Handler: Send + Sync {
    /// Shared base state; concrete handlers return their embedded core.
    fn core(&self) -> &HandlerCore;

    /// Emit one record to this handler's sink.
    ///
    /// The whole format-then-write sequence is atomic with respect to other
    /// concurrent `handle` calls on the same handler. A write failure is
    /// returned to the direct caller; the logger fan-out discards it.
    fn handle(&self, record: &Record) -> Result<()>;

    fn name(&self) -> String {
        self.core().name()
    }

    /// Rename this handler, atomically relocating its registry slot.
    fn set_name(&self, name: &str) {
        self.core().rename(name);
    }

    /// Set the inclusive level window, each bound given numerically or by
    /// name. An unrecognized name is the hard validation error.
    fn set_level(&self, min: LevelSpec, max: LevelSpec) -> Result<()> {
        self.core().set_level(min, max)
    }

    fn level(&self) -> LevelRange {
        self.core().level()
    }

    fn set_formatter(&self, formatter: Arc<Formatter>) {
        self.core().set_formatter(formatter);
    }

    fn formatter(&self) -> Arc<Formatter> {
        self.core().formatter()
    }

    /// Render a record with the configured formatter.
    fn format(&self, record: &Record) -> Vec<u8> {
        self.core().formatter().format(record)
    }
}

/// Level-setter convenience over anything convertible to a [`LevelSpec`].
pub fn set_handler_level(
    handler: &dyn Handler,
    min: impl Into<LevelSpec>,
    max: impl Into<LevelSpec>,
) -> Result<()> {
    handler.core().set_level(min.into(), max.into())
}

/// State shared by every handler variant.
pub struct HandlerCore {
    name: Mutex<String>,
    level: Mutex<LevelRange>,
    formatter: Mutex<Arc<Formatter>>,
    /// Back-links installed when the handler is registered; a detached
    /// handler renames locally only.
    registration: Mutex<Option<Registration>>,
}

struct Registration {
    registry: Weak<RegistryShared>,
    this: Weak<dyn Handler>,
}

impl HandlerCore {
    pub fn new(name: impl Into<String>, level: LevelRange, formatter: Arc<Formatter>) -> Self {
        Self {
            name: Mutex::new(name.into()),
            level: Mutex::new(level),
            formatter: Mutex::new(formatter),
            registration: Mutex::new(None),
        }
    }

    pub fn name(&self) -> String {
        self.name.lock().clone()
    }

    pub fn level(&self) -> LevelRange {
        *self.level.lock()
    }

    pub fn set_level(&self, min: LevelSpec, max: LevelSpec) -> Result<()> {
        let range = LevelRange::new(min.resolve()?, max.resolve()?);
        *self.level.lock() = range;
        Ok(())
    }

    pub fn set_formatter(&self, formatter: Arc<Formatter>) {
        *self.formatter.lock() = formatter;
    }

    pub fn formatter(&self) -> Arc<Formatter> {
        Arc::clone(&self.formatter.lock())
    }

    /// Rename, moving the registry slot under the registry lock: the old key
    /// is removed and the new key inserted in one critical section, so no
    /// lookup ever sees two keys for one handler or a dangling key.
    pub fn rename(&self, name: &str) {
        let mut current = self.name.lock();
        // Copy the back-links out so the registration lock is released
        // before the registry map lock is taken (attach runs under the map
        // lock and takes the registration lock).
        let links = {
            let registration = self.registration.lock();
            registration
                .as_ref()
                .and_then(|reg| Some((reg.registry.upgrade()?, reg.this.upgrade()?)))
        };
        if let Some((registry, this)) = links {
            let mut handlers = registry.handlers.lock();
            // Only relocate a slot this handler still occupies: a same-named
            // handler registered later (the config commit path) must keep its
            // entry when the displaced one renames.
            let occupies_slot = handlers
                .get(current.as_str())
                .map_or(false, |registered| Arc::ptr_eq(registered, &this));
            if occupies_slot {
                handlers.remove(current.as_str());
                handlers.insert(name.to_string(), this);
            }
        }
        *current = name.to_string();
    }

    pub(crate) fn attach(&self, registry: &Arc<RegistryShared>, this: Weak<dyn Handler>) {
        *self.registration.lock() = Some(Registration {
            registry: Arc::downgrade(registry),
            this,
        });
    }
}
