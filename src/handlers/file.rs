//! File handler: appends formatted records to a file opened at construction.

use parking_lot::Mutex;
use std::fs::{DirBuilder, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::core::error::{LogError, Result};
use crate::core::formatter::Formatter;
use crate::core::handler::{Handler, HandlerCore};
use crate::core::level::LevelRange;
use crate::core::record::Record;

pub struct FileHandler {
    core: HandlerCore,
    file: Mutex<File>,
}

impl FileHandler {
    /// Build a detached file handler admitting every level.
    ///
    /// Creates the parent directory (recursively, with `dir_mode`) and opens
    /// the target in append mode (creating it with `file_mode`). Either step
    /// failing aborts construction; no partially constructed handler exists
    /// afterwards. The modes are unix permission bits and are ignored on
    /// other platforms.
    pub fn new(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        dir_mode: u32,
        file_mode: u32,
        formatter: Arc<Formatter>,
    ) -> Result<Arc<Self>> {
        Self::with_formatter(name, path, dir_mode, file_mode, LevelRange::all(), formatter)
    }

    pub(crate) fn with_formatter(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        dir_mode: u32,
        file_mode: u32,
        level: LevelRange,
        formatter: Arc<Formatter>,
    ) -> Result<Arc<Self>> {
        let path = path.as_ref();
        let file = open_append(path, dir_mode, file_mode)?;
        Ok(Arc::new(Self {
            core: HandlerCore::new(name, level, formatter),
            file: Mutex::new(file),
        }))
    }
}

fn open_append(path: &Path, dir_mode: u32, file_mode: u32) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let mut builder = DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::DirBuilderExt;
                builder.mode(dir_mode);
            }
            builder
                .create(parent)
                .map_err(|source| LogError::create_directory(path.display().to_string(), source))?;
        }
    }

    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(file_mode);
    }
    #[cfg(not(unix))]
    let _ = (dir_mode, file_mode);

    options
        .open(path)
        .map_err(|source| LogError::open_file(path.display().to_string(), source))
}

impl Handler for FileHandler {
    fn core(&self) -> &HandlerCore {
        &self.core
    }

    fn handle(&self, record: &Record) -> Result<()> {
        let mut file = self.file.lock();
        let buf = self.format(record);
        file.write_all(&buf)
            .and_then(|()| file.flush())
            .map_err(|source| LogError::write(self.core.name(), source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use crate::core::record::CallSite;
    use tempfile::TempDir;

    fn bare_formatter() -> Arc<Formatter> {
        Formatter::new("bare", "{message}", "%Y")
    }

    #[test]
    fn test_creates_parent_directory_and_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deep/app.log");
        let handler =
            FileHandler::new("disk", &path, 0o755, 0o644, bare_formatter()).unwrap();

        let record = Record::new(Level::Info.value(), "svc", "first", CallSite::UNKNOWN);
        handler.handle(&record).unwrap();
        let record = Record::new(Level::Info.value(), "svc", "second", CallSite::UNKNOWN);
        handler.handle(&record).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_open_failure_aborts_construction() {
        let dir = TempDir::new().unwrap();
        // The target path's parent is a file, so directory creation fails.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let path = blocker.join("app.log");

        let err = FileHandler::new("disk", &path, 0o755, 0o644, bare_formatter())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            LogError::CreateDirectory { .. } | LogError::OpenFile { .. }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_mode_applied() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("modes.log");
        let _handler =
            FileHandler::new("disk", &path, 0o755, 0o600, bare_formatter()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
