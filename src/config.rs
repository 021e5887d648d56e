//! JSON configuration loader.
//!
//! A configuration document declares formatters, handlers, and loggers by
//! name and wires them together. Loading is all-or-nothing: every
//! cross-reference is validated and every entity constructed detached before
//! anything is committed to the registry, so a failing document leaves no
//! partial registration behind.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::core::error::{LogError, Result};
use crate::core::formatter::Formatter;
use crate::core::handler::Handler;
use crate::core::level::LevelSpec;
use crate::core::registry::{Registry, DEFAULT_FORMATTER};
use crate::handlers::{FileHandler, NullHandler, StreamHandler};

const DEFAULT_DIR_MODE: u32 = 0o755;
const DEFAULT_FILE_MODE: u32 = 0o644;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub formatters: HashMap<String, FormatterConfig>,
    #[serde(default)]
    pub handlers: HashMap<String, HandlerConfig>,
    #[serde(default)]
    pub loggers: HashMap<String, LoggerConfig>,
}

#[derive(Debug, Deserialize)]
pub struct FormatterConfig {
    pub format: String,
    #[serde(rename = "dateFormat")]
    pub date_format: String,
}

#[derive(Debug, Deserialize)]
pub struct HandlerConfig {
    #[serde(rename = "type")]
    pub kind: HandlerKind,
    pub level: LevelWindow,
    pub formatter: Option<String>,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub enum HandlerKind {
    StreamHandler,
    FileHandler,
    NullHandler,
    StdoutHandler,
    StderrHandler,
}

#[derive(Debug, Deserialize)]
pub struct LevelWindow {
    pub min: LevelSpec,
    pub max: LevelSpec,
}

#[derive(Debug, Deserialize)]
pub struct LoggerConfig {
    pub level: LevelSpec,
    #[serde(default)]
    pub handlers: Vec<String>,
}

/// Load a configuration file, dispatching on its extension. Only `json` is
/// supported.
pub fn load_config(registry: &Registry, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => load_json_config(registry, path),
        other => Err(LogError::UnsupportedConfigType {
            extension: other.unwrap_or("").to_string(),
        }),
    }
}

/// Load and apply a JSON configuration document.
pub fn load_json_config(registry: &Registry, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let config: Config =
        serde_json::from_str(&content).map_err(|source| LogError::ConfigParse {
            path: path.display().to_string(),
            source,
        })?;
    apply_config(registry, config)
}

/// Apply an already-parsed configuration document atomically.
pub fn apply_config(registry: &Registry, config: Config) -> Result<()> {
    // Validate every cross-reference up front so no side effect (file
    // creation included) happens for a document that cannot fully load.
    let mut windows: HashMap<&str, (u8, u8)> = HashMap::new();
    for (name, handler) in &config.handlers {
        if let Some(formatter) = &handler.formatter {
            if !config.formatters.contains_key(formatter) {
                return Err(LogError::unknown_formatter(formatter, name));
            }
        }
        windows.insert(
            name,
            (handler.level.min.resolve()?, handler.level.max.resolve()?),
        );
    }
    let mut logger_levels: HashMap<&str, u8> = HashMap::new();
    for (name, logger) in &config.loggers {
        for handler in &logger.handlers {
            if !config.handlers.contains_key(handler) {
                return Err(LogError::unknown_handler(handler, name));
            }
        }
        logger_levels.insert(name, logger.level.resolve()?);
    }

    // Stage formatters.
    let mut formatters: HashMap<String, Arc<Formatter>> = HashMap::new();
    for (name, fc) in &config.formatters {
        formatters.insert(
            name.clone(),
            Formatter::new(name, &fc.format, &fc.date_format),
        );
    }

    let formatter_for = |spec: &Option<String>| -> Arc<Formatter> {
        match spec {
            // Presence was validated above.
            Some(named) => Arc::clone(&formatters[named]),
            None => registry.formatter(DEFAULT_FORMATTER),
        }
    };

    // Stage handlers, detached from the registry.
    let mut handlers: HashMap<String, Arc<dyn Handler>> = HashMap::new();
    for (name, hc) in &config.handlers {
        let formatter = formatter_for(&hc.formatter);
        let handler: Arc<dyn Handler> = match hc.kind {
            HandlerKind::StreamHandler => {
                let stream = hc
                    .properties
                    .get("stream")
                    .ok_or_else(|| LogError::missing_property(name, "stream"))?;
                match stream.as_str() {
                    "stdout" => StreamHandler::stdout(name, formatter),
                    "stderr" => StreamHandler::stderr(name, formatter),
                    other => return Err(LogError::unknown_stream(other, name)),
                }
            }
            HandlerKind::FileHandler => {
                let filename = hc
                    .properties
                    .get("filename")
                    .ok_or_else(|| LogError::missing_property(name, "filename"))?;
                FileHandler::new(name, filename, DEFAULT_DIR_MODE, DEFAULT_FILE_MODE, formatter)?
            }
            HandlerKind::NullHandler => NullHandler::new(name, formatter),
            HandlerKind::StdoutHandler => StreamHandler::stdout(name, formatter),
            HandlerKind::StderrHandler => StreamHandler::stderr(name, formatter),
        };
        let (min, max) = windows[name.as_str()];
        // Resolved during validation; cannot fail.
        let _ = handler.set_level(LevelSpec::Number(min), LevelSpec::Number(max));
        handlers.insert(name.clone(), handler);
    }

    // Stage logger wiring.
    let mut loggers: Vec<(&String, u8, Vec<Arc<dyn Handler>>)> = Vec::new();
    for (name, lc) in &config.loggers {
        let attached = lc
            .handlers
            .iter()
            .map(|h| Arc::clone(&handlers[h]))
            .collect();
        loggers.push((name, logger_levels[name.as_str()], attached));
    }

    // Commit phase: nothing below can fail.
    for (name, formatter) in formatters {
        registry.insert_formatter(&name, formatter);
    }
    for (name, handler) in handlers {
        registry.insert_handler(&name, handler);
    }
    for (name, level, attached) in loggers {
        let logger = registry.logger(name);
        // Already resolved; cannot fail.
        let _ = logger.set_level(level);
        logger.set_handlers(attached);
    }

    Ok(())
}
