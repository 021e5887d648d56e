//! Log record structure and call-site capture

use std::panic::Location;
use std::path::Path;

use super::level::level_name;

/// Call-site metadata for one logging call.
///
/// `caller()` resolves the immediate caller through any chain of
/// `#[track_caller]` wrappers, so there is no fragile frame-offset to keep in
/// sync with wrapper depth. The enclosing function name is not reachable that
/// way and degrades to `"???"`; the logging macros capture it via
/// [`callsite!`](crate::callsite).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub path: &'static str,
    pub line: u32,
    pub function: &'static str,
}

impl CallSite {
    /// Placeholder used when the call site cannot be resolved. A silent
    /// degradation, never a propagated failure.
    pub const UNKNOWN: CallSite = CallSite {
        path: "???",
        line: 0,
        function: "???",
    };

    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self {
            path: location.file(),
            line: location.line(),
            function: "???",
        }
    }
}

/// An immutable snapshot of one admitted log event.
///
/// Constructed by the logger at emission time, consumed synchronously by
/// every handler in the fan-out, and discarded after the call returns.
#[derive(Debug, Clone)]
pub struct Record {
    pub logger_name: String,
    pub level_name: &'static str,
    pub level_no: u8,
    pub line_no: u32,
    pub file_name: String,
    pub path_name: String,
    pub func_name: String,
    pub message: String,
}

impl Record {
    pub fn new(
        level_no: u8,
        logger_name: impl Into<String>,
        message: impl Into<String>,
        site: CallSite,
    ) -> Self {
        Self {
            logger_name: logger_name.into(),
            level_name: level_name(level_no),
            level_no,
            line_no: site.line,
            file_name: basename(site.path),
            path_name: site.path.to_string(),
            func_name: site.function.to_string(),
            message: message.into(),
        }
    }
}

fn basename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
