//! Null handler: accepts and discards every record.

use std::sync::Arc;

use crate::core::error::Result;
use crate::core::formatter::Formatter;
use crate::core::handler::{Handler, HandlerCore};
use crate::core::level::LevelRange;
use crate::core::record::Record;

pub struct NullHandler {
    core: HandlerCore,
}

impl NullHandler {
    pub fn new(name: impl Into<String>, formatter: Arc<Formatter>) -> Arc<Self> {
        Arc::new(Self {
            core: HandlerCore::new(name, LevelRange::all(), formatter),
        })
    }
}

impl Handler for NullHandler {
    fn core(&self) -> &HandlerCore {
        &self.core
    }

    fn handle(&self, _record: &Record) -> Result<()> {
        Ok(())
    }
}
