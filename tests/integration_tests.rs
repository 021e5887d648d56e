//! Integration tests for the logging core
//!
//! These tests verify:
//! - Threshold gating and handler level windows
//! - Fan-out ordering and error isolation
//! - Registry get-or-create, rename, and idempotent construction
//! - File handler construction semantics
//! - JSON configuration loading, success and all-or-nothing failure

use logfan::core::handler::set_handler_level;
use logfan::core::{
    CallSite, Formatter, Handler, HandlerCore, Level, LevelRange, NoTermination, Record, Registry,
    Result, TerminalAction, TerminationPolicy,
};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;
use tempfile::TempDir;

/// In-memory sink shared between the test and a stream handler.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().clone()).expect("utf8 log output")
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Handler that records every record it is asked to handle.
struct CollectingHandler {
    core: HandlerCore,
    seen: Mutex<Vec<Record>>,
}

impl CollectingHandler {
    fn new(name: &str, min: Level, max: Level) -> Arc<Self> {
        Arc::new(Self {
            core: HandlerCore::new(
                name,
                LevelRange::new(min.value(), max.value()),
                Formatter::with_defaults("default"),
            ),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn messages(&self) -> Vec<String> {
        self.seen.lock().iter().map(|r| r.message.clone()).collect()
    }
}

impl Handler for CollectingHandler {
    fn core(&self) -> &HandlerCore {
        &self.core
    }

    fn handle(&self, record: &Record) -> Result<()> {
        self.seen.lock().push(record.clone());
        Ok(())
    }
}

/// Handler whose sink always fails.
struct BrokenHandler {
    core: HandlerCore,
}

impl BrokenHandler {
    fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            core: HandlerCore::new(name, LevelRange::all(), Formatter::with_defaults("default")),
        })
    }
}

impl Handler for BrokenHandler {
    fn core(&self) -> &HandlerCore {
        &self.core
    }

    fn handle(&self, _record: &Record) -> Result<()> {
        Err(logfan::LogError::write(
            self.core.name(),
            io::Error::new(io::ErrorKind::BrokenPipe, "sink gone"),
        ))
    }
}

/// Termination policy that records the consulted levels instead of acting.
struct RecordingTermination {
    consulted: Mutex<Vec<u8>>,
}

impl RecordingTermination {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            consulted: Mutex::new(Vec::new()),
        })
    }
}

impl TerminationPolicy for RecordingTermination {
    fn action(&self, level_no: u8) -> TerminalAction {
        self.consulted.lock().push(level_no);
        TerminalAction::Continue
    }
}

#[test]
fn test_threshold_gates_less_severe_calls() {
    let registry = Registry::new();
    let logger = registry.logger("svc");
    let sink = CollectingHandler::new("sink", Level::Panic, Level::NotSet);
    logger.set_handlers(vec![sink.clone()]);
    logger.set_level("warning").unwrap();

    logger.warning("admitted");
    logger.error("admitted too");
    logger.info("suppressed");
    logger.debug("suppressed");

    assert_eq!(sink.messages(), vec!["admitted", "admitted too"]);
}

#[test]
fn test_notset_threshold_admits_everything() {
    let registry = Registry::new();
    let logger = registry.logger("svc");
    logger.set_termination_policy(Arc::new(NoTermination));
    let sink = CollectingHandler::new("sink", Level::Panic, Level::NotSet);
    logger.set_handlers(vec![sink.clone()]);

    logger.print("sentinel");
    logger.trace("trace");
    logger.panic("panic");

    assert_eq!(sink.messages(), vec!["sentinel", "trace", "panic"]);
}

#[test]
fn test_handler_window_is_boundary_inclusive() {
    let registry = Registry::new();
    let logger = registry.logger("svc");
    let sink = CollectingHandler::new("sink", Level::Error, Level::Warning);
    logger.set_handlers(vec![sink.clone()]);

    logger.notice("below");
    logger.warning("on max bound");
    logger.error("on min bound");
    logger.set_termination_policy(Arc::new(NoTermination));
    logger.critical("above");

    assert_eq!(sink.messages(), vec!["on max bound", "on min bound"]);
}

#[test]
fn test_fan_out_preserves_insertion_order_and_duplicates() {
    let registry = Registry::new();
    let logger = registry.logger("svc");
    let first = CollectingHandler::new("first", Level::Panic, Level::NotSet);
    let second = CollectingHandler::new("second", Level::Panic, Level::NotSet);
    logger.set_handlers(vec![first.clone(), second.clone(), first.clone()]);

    logger.info("once");

    assert_eq!(first.messages(), vec!["once", "once"], "duplicate entry handled twice");
    assert_eq!(second.messages(), vec!["once"]);
}

#[test]
fn test_broken_sink_does_not_starve_other_handlers() {
    let registry = Registry::new();
    let logger = registry.logger("svc");
    let broken = BrokenHandler::new("broken");
    let sink = CollectingHandler::new("sink", Level::Panic, Level::NotSet);
    logger.set_handlers(vec![broken, sink.clone()]);

    logger.error("still delivered");

    assert_eq!(sink.messages(), vec!["still delivered"]);
}

#[test]
fn test_handlers_shared_across_loggers() {
    let registry = Registry::new();
    let sink = CollectingHandler::new("sink", Level::Panic, Level::NotSet);
    let a = registry.logger("a");
    let b = registry.logger("b");
    a.set_handlers(vec![sink.clone()]);
    b.set_handlers(vec![sink.clone()]);

    a.info("from a");
    b.info("from b");

    assert_eq!(sink.messages(), vec!["from a", "from b"]);
}

#[test]
fn test_record_carries_call_site_and_logger_name() {
    let registry = Registry::new();
    let logger = registry.logger("svc");
    let sink = CollectingHandler::new("sink", Level::Panic, Level::NotSet);
    logger.set_handlers(vec![sink.clone()]);

    logfan::error!(logger, "failed after {} retries", 3);

    let seen = sink.seen.lock();
    let record = &seen[0];
    assert_eq!(record.logger_name, "svc");
    assert_eq!(record.level_name, "error");
    assert_eq!(record.level_no, 3);
    assert_eq!(record.message, "failed after 3 retries");
    assert_eq!(record.file_name, "integration_tests.rs");
    assert!(record.path_name.ends_with("integration_tests.rs"));
    assert!(record.line_no > 0);
    assert!(record.func_name.contains("test_record_carries_call_site_and_logger_name"));
}

#[test]
fn test_log_macro_ignores_local_format_shadowing() {
    // A caller-local format! must not leak into the macro expansion.
    #[allow(unused_macros)]
    macro_rules! format {
        ($($arg:tt)*) => {
            String::from("shadowed")
        };
    }

    let registry = Registry::new();
    let logger = registry.logger("svc");
    let sink = CollectingHandler::new("sink", Level::Panic, Level::NotSet);
    logger.set_handlers(vec![sink.clone()]);

    logfan::info!(logger, "count {}", 2);

    assert_eq!(sink.messages(), vec!["count 2"]);
}

#[test]
fn test_method_call_site_resolves_file_and_line() {
    let registry = Registry::new();
    let logger = registry.logger("svc");
    let sink = CollectingHandler::new("sink", Level::Panic, Level::NotSet);
    logger.set_handlers(vec![sink.clone()]);

    logger.info("via method");

    let seen = sink.seen.lock();
    assert_eq!(seen[0].file_name, "integration_tests.rs");
    // Function names are only reachable through the macros.
    assert_eq!(seen[0].func_name, "???");
}

#[test]
fn test_termination_policy_consulted_after_fan_out() {
    let registry = Registry::new();
    let logger = registry.logger("svc");
    let sink = CollectingHandler::new("sink", Level::Panic, Level::NotSet);
    let policy = RecordingTermination::new();
    logger.set_handlers(vec![sink.clone()]);
    logger.set_termination_policy(policy.clone());

    logger.critical("dispatched before termination");
    logger.alert("again");
    logger.panic("and again");

    // Every record reached the sink before the policy was consulted.
    assert_eq!(
        sink.messages(),
        vec!["dispatched before termination", "again", "and again"]
    );
    assert_eq!(
        *policy.consulted.lock(),
        vec![
            Level::Critical.value(),
            Level::Alert.value(),
            Level::Panic.value()
        ]
    );
}

#[test]
fn test_default_termination_mapping() {
    use logfan::DefaultTermination;
    let policy = DefaultTermination;
    assert_eq!(policy.action(Level::Panic.value()), TerminalAction::Panic);
    assert_eq!(policy.action(Level::Alert.value()), TerminalAction::Exit(1));
    assert_eq!(policy.action(Level::Critical.value()), TerminalAction::Exit(1));
    assert_eq!(policy.action(Level::Error.value()), TerminalAction::Continue);
    assert_eq!(policy.action(Level::Trace.value()), TerminalAction::Continue);
}

#[test]
fn test_windowed_fan_out_scenario() {
    // One logger, two handlers with disjoint windows: severe records land in
    // the first, verbose records in the second.
    let registry = Registry::new();
    let logger = registry.logger("svc");
    logger.set_termination_policy(Arc::new(NoTermination));
    logger.set_level("info").unwrap();

    let severe = CollectingHandler::new("severe", Level::Error, Level::Panic);
    let verbose = CollectingHandler::new("verbose", Level::NotSet, Level::Warning);
    logger.set_handlers(vec![severe.clone(), verbose.clone()]);

    logger.info("routine");
    logger.critical("meltdown");

    assert_eq!(verbose.messages(), vec!["routine"]);
    assert_eq!(severe.messages(), vec!["meltdown"]);
}

#[test]
fn test_stream_handler_writes_through_registry() {
    let registry = Registry::new();
    let buf = SharedBuf::default();
    let handler = registry.stream_handler("mem", Box::new(buf.clone()));
    handler.formatter().set_format("{loggerName} {levelName} {message}");

    let logger = registry.logger("svc");
    logger.set_handlers(vec![handler]);
    logger.warning("low disk");

    assert_eq!(buf.contents(), "svc warning low disk\n");
}

#[test]
fn test_file_handler_second_construction_ignored() {
    let dir = TempDir::new().unwrap();
    let first_path = dir.path().join("first.log");
    let second_path = dir.path().join("second.log");

    let registry = Registry::new();
    registry.formatter("default").set_format("{message}");

    let first = registry
        .file_handler("disk", &first_path, 0o755, 0o644)
        .unwrap();
    let second = registry
        .file_handler("disk", &second_path, 0o755, 0o644)
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let record = Record::new(Level::Info.value(), "svc", "to first", CallSite::UNKNOWN);
    second.handle(&record).unwrap();

    let content = std::fs::read_to_string(&first_path).unwrap();
    assert_eq!(content, "to first\n");
    assert!(!second_path.exists(), "second target never created");
}

#[test]
fn test_failed_file_handler_is_not_registered() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"x").unwrap();

    let registry = Registry::new();
    let result = registry.file_handler("disk", blocker.join("app.log"), 0o755, 0o644);
    assert!(result.is_err());
    assert!(registry.get_handler("disk").is_none());

    // The name stays free for a working construction.
    let good = registry.file_handler("disk", dir.path().join("good.log"), 0o755, 0o644);
    assert!(good.is_ok());
}

#[test]
fn test_level_setters_accept_int_and_name_and_reject_unknown() {
    let registry = Registry::new();
    let logger = registry.logger("svc");

    logger.set_level(Level::Debug).unwrap();
    assert_eq!(logger.level(), 7);
    logger.set_level("crit").unwrap();
    assert_eq!(logger.level(), 2);
    logger.set_level(255u8).unwrap();
    assert_eq!(logger.level(), 255);

    assert!(logger.set_level("verbose").is_err());
    assert_eq!(logger.level(), 255, "rejected update leaves threshold intact");

    let handler = registry.null_handler("void");
    set_handler_level(handler.as_ref(), "warn", 255u8).unwrap();
    assert_eq!(handler.level(), LevelRange::new(4, 255));
    assert!(set_handler_level(handler.as_ref(), "verbose", 0u8).is_err());
}

mod config {
    use super::*;
    use logfan::load_json_config;

    fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("logging.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_wires_levels_windows_and_formatters() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("out/app.log");
        let body = format!(
            r#"{{
                "formatters": {{
                    "plain": {{ "format": "{{levelName}} {{message}}", "dateFormat": "%H:%M" }}
                }},
                "handlers": {{
                    "disk": {{
                        "type": "FileHandler",
                        "level": {{ "min": "error", "max": "panic" }},
                        "formatter": "plain",
                        "properties": {{ "filename": "{}" }}
                    }},
                    "void": {{
                        "type": "NullHandler",
                        "level": {{ "min": 0, "max": 255 }}
                    }}
                }},
                "loggers": {{
                    "svc": {{ "level": "debug", "handlers": ["disk", "void"] }}
                }}
            }}"#,
            log_path.display()
        );
        let registry = Registry::new();
        let path = write_config(&dir, &body);
        load_json_config(&registry, &path).unwrap();

        let logger = registry.get_logger("svc").expect("logger registered");
        assert_eq!(logger.level(), Level::Debug.value());
        let handlers = logger.handlers();
        assert_eq!(handlers.len(), 2);
        assert_eq!(handlers[0].name(), "disk");
        assert_eq!(handlers[0].level(), LevelRange::new(0, 3));
        assert_eq!(
            handlers[0].formatter().format_template(),
            "{levelName} {message}"
        );

        logger.error("persisted");
        logger.info("windowed out");
        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(content, "error persisted\n");
    }

    #[test]
    fn test_unknown_handler_reference_aborts_whole_load() {
        let dir = TempDir::new().unwrap();
        let body = r#"{
            "formatters": {
                "plain": { "format": "{message}", "dateFormat": "%H:%M" }
            },
            "handlers": {
                "console": {
                    "type": "StdoutHandler",
                    "level": { "min": 0, "max": 255 },
                    "formatter": "plain"
                }
            },
            "loggers": {
                "svc": { "level": "info", "handlers": ["console", "ghost"] }
            }
        }"#;
        let registry = Registry::new();
        let path = write_config(&dir, body);
        let err = load_json_config(&registry, &path).unwrap_err();
        assert!(err.to_string().contains("ghost"));

        // Nothing was partially registered.
        assert!(registry.get_logger("svc").is_none());
        assert!(registry.get_handler("console").is_none());
        assert!(registry.get_formatter("plain").is_none());
    }

    #[test]
    fn test_unknown_formatter_reference_aborts_whole_load() {
        let dir = TempDir::new().unwrap();
        let body = r#"{
            "handlers": {
                "console": {
                    "type": "StreamHandler",
                    "level": { "min": 0, "max": 255 },
                    "formatter": "missing",
                    "properties": { "stream": "stdout" }
                }
            }
        }"#;
        let registry = Registry::new();
        let path = write_config(&dir, body);
        let err = load_json_config(&registry, &path).unwrap_err();
        assert!(err.to_string().contains("missing"));
        assert!(registry.get_handler("console").is_none());
    }

    #[test]
    fn test_missing_required_property_aborts() {
        let dir = TempDir::new().unwrap();
        let body = r#"{
            "handlers": {
                "console": {
                    "type": "StreamHandler",
                    "level": { "min": 0, "max": 255 }
                }
            }
        }"#;
        let registry = Registry::new();
        let path = write_config(&dir, body);
        let err = load_json_config(&registry, &path).unwrap_err();
        assert!(err.to_string().contains("stream"));
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logging.yaml");
        std::fs::write(&path, "loggers: {}").unwrap();
        let registry = Registry::new();
        let err = logfan::load_config(&registry, &path).unwrap_err();
        assert!(err.to_string().contains("yaml"));
    }
}
