//! Stream handler: writes formatted records to any byte sink.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

use crate::core::error::{LogError, Result};
use crate::core::formatter::Formatter;
use crate::core::handler::{Handler, HandlerCore};
use crate::core::level::LevelRange;
use crate::core::record::Record;

pub struct StreamHandler {
    core: HandlerCore,
    stream: Mutex<Box<dyn Write + Send>>,
}

impl StreamHandler {
    /// Build a detached stream handler admitting every level. Registration
    /// happens through [`Registry::stream_handler`](crate::Registry::stream_handler)
    /// or the configuration loader.
    pub fn new(
        name: impl Into<String>,
        stream: Box<dyn Write + Send>,
        formatter: Arc<Formatter>,
    ) -> Arc<Self> {
        Self::with_stream(name, stream, LevelRange::all(), formatter)
    }

    pub(crate) fn with_stream(
        name: impl Into<String>,
        stream: Box<dyn Write + Send>,
        level: LevelRange,
        formatter: Arc<Formatter>,
    ) -> Arc<Self> {
        Arc::new(Self {
            core: HandlerCore::new(name, level, formatter),
            stream: Mutex::new(stream),
        })
    }

    pub fn stdout(name: impl Into<String>, formatter: Arc<Formatter>) -> Arc<Self> {
        Self::new(name, Box::new(std::io::stdout()), formatter)
    }

    pub fn stderr(name: impl Into<String>, formatter: Arc<Formatter>) -> Arc<Self> {
        Self::new(name, Box::new(std::io::stderr()), formatter)
    }
}

impl Handler for StreamHandler {
    fn core(&self) -> &HandlerCore {
        &self.core
    }

    fn handle(&self, record: &Record) -> Result<()> {
        // Sink lock held across format and write: one record is never
        // interleaved with another on the same handler.
        let mut stream = self.stream.lock();
        let buf = self.format(record);
        stream
            .write_all(&buf)
            .and_then(|()| stream.flush())
            .map_err(|source| LogError::write(self.core.name(), source))
    }
}
