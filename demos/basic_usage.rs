//! Basic usage: named loggers, level windows, and template formatters.
//!
//! Run with: cargo run --example basic_usage

use logfan::{info, notice, warning, Registry};

fn main() -> logfan::Result<()> {
    let registry = Registry::new();

    // A fresh logger is immediately usable: warnings and below go to
    // stdout, errors and above to stderr.
    let logger = registry.logger("demo");
    info!(logger, "service starting on port {}", 8080);
    warning!(logger, "disk {}% full", 85);

    // Tighten the threshold: info is now suppressed.
    logger.set_level("notice")?;
    info!(logger, "this line is gated out");
    notice!(logger, "this one still appears");

    // Reconfigure the shared default formatter.
    registry
        .formatter("default")
        .set_format("{date} {loggerName}[{levelNo}] {message}");
    warning!(logger, "same record, new shape");

    Ok(())
}
