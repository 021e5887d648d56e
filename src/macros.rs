//! Logging macros with call-site capture.
//!
//! The macros format the message printf-style (before any placeholder
//! substitution) and capture the call site, enclosing function included,
//! which plain method calls cannot resolve.
//!
//! # Examples
//!
//! ```
//! use logfan::{info, warning, Registry};
//!
//! let registry = Registry::new();
//! let logger = registry.logger("svc");
//!
//! info!(logger, "server listening on port {}", 8080);
//! warning!(logger, "disk {}% full", 85);
//! ```

/// Capture the current call site: file, line, and enclosing function path.
#[macro_export]
macro_rules! callsite {
    () => {{
        fn __here() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(__here);
        $crate::CallSite {
            path: ::std::file!(),
            line: ::std::line!(),
            function: name.strip_suffix("::__here").unwrap_or(name),
        }
    }};
}

/// Log a message at an explicit level with automatic formatting.
///
/// # Examples
///
/// ```
/// # use logfan::Registry;
/// use logfan::{log, Level};
/// # let registry = Registry::new();
/// # let logger = registry.logger("svc");
/// log!(logger, Level::Notice, "cache warmed in {}ms", 12);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_at(
            $crate::Level::value($level),
            $crate::callsite!(),
            ::std::format!($($arg)+),
        )
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a notice-level message.
#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Notice, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a critical-level message. Terminal under the default policy: the
/// process exits after the record reaches every handler.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Critical, $($arg)+)
    };
}

/// Log an alert-level message. Terminal under the default policy.
#[macro_export]
macro_rules! alert {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Alert, $($arg)+)
    };
}
