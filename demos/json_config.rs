//! Configure a registry from a JSON document.
//!
//! Run with: cargo run --example json_config

use logfan::{apply_config, error, info, Registry};

const CONFIG: &str = r#"{
    "formatters": {
        "plain": { "format": "{levelName} {message}", "dateFormat": "%H:%M:%S" },
        "detailed": {
            "format": "[{date}][{levelName}][{fileName}:{lineNo}] {message}",
            "dateFormat": "%Y-%m-%d %H:%M:%S"
        }
    },
    "handlers": {
        "console": {
            "type": "StdoutHandler",
            "level": { "min": "notset", "max": "warning" },
            "formatter": "plain"
        },
        "alarms": {
            "type": "StderrHandler",
            "level": { "min": "error", "max": "panic" },
            "formatter": "detailed"
        }
    },
    "loggers": {
        "app": { "level": "debug", "handlers": ["console", "alarms"] }
    }
}"#;

fn main() -> logfan::Result<()> {
    let registry = Registry::new();
    let config = serde_json::from_str(CONFIG).expect("embedded config parses");
    apply_config(&registry, config)?;

    let logger = registry.logger("app");
    info!(logger, "plainly formatted, on stdout");
    error!(logger, "verbosely formatted, on stderr");

    Ok(())
}
