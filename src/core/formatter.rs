//! Template-based record formatter.
//!
//! A formatter owns a template string and a strftime date format. Rendering
//! is a single linear pass over the template: each recognized `{token}` is
//! substituted exactly once and substituted values are never re-scanned, so
//! a `{date}` inside a message body stays literal.
//!
//! Recognized tokens: `{loggerName}`, `{levelName}`, `{levelNo}`, `{lineNo}`,
//! `{date}`, `{fileName}`, `{pathName}`, `{funcName}`, `{message}`.

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::sync::Arc;

use super::record::Record;

pub const DEFAULT_FORMAT: &str = "[{date}][{levelName}][{fileName}:{lineNo}] {message}";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

struct TemplateState {
    format: String,
    date_format: String,
}

/// A named, shared formatter.
///
/// Shared by reference (`Arc`) between its creator and every handler
/// configured with it; the template state is guarded by the formatter's own
/// lock so a reconfiguration racing a render is safe. Two near-simultaneous
/// renders around a reconfiguration may observe different templates; that is
/// accepted behavior.
pub struct Formatter {
    name: String,
    state: Mutex<TemplateState>,
}

impl Formatter {
    pub fn new(
        name: impl Into<String>,
        format: impl Into<String>,
        date_format: impl Into<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            state: Mutex::new(TemplateState {
                format: format.into(),
                date_format: date_format.into(),
            }),
        })
    }

    /// A formatter with the default template and date format.
    pub fn with_defaults(name: impl Into<String>) -> Arc<Self> {
        Self::new(name, DEFAULT_FORMAT, DEFAULT_DATE_FORMAT)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_format(&self, format: impl Into<String>) {
        self.state.lock().format = format.into();
    }

    pub fn format_template(&self) -> String {
        self.state.lock().format.clone()
    }

    pub fn set_date_format(&self, date_format: impl Into<String>) {
        self.state.lock().date_format = date_format.into();
    }

    pub fn date_format(&self) -> String {
        self.state.lock().date_format.clone()
    }

    /// Render a record. `{date}` is evaluated against the wall clock at
    /// format time, not at record-creation time.
    pub fn format(&self, record: &Record) -> Vec<u8> {
        self.format_at(record, Local::now())
    }

    /// Render a record against an explicit clock instant.
    pub fn format_at(&self, record: &Record, now: DateTime<Local>) -> Vec<u8> {
        let (template, date_format) = {
            let state = self.state.lock();
            (state.format.clone(), state.date_format.clone())
        };
        let date = now.format(&date_format).to_string();
        render(&template, record, &date).into_bytes()
    }
}

fn render(template: &str, record: &Record, date: &str) -> String {
    let mut out = String::with_capacity(template.len() + record.message.len() + 16);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let token_end = match tail.find('}') {
            Some(end) => end,
            None => {
                out.push_str(tail);
                rest = "";
                break;
            }
        };
        match &tail[..=token_end] {
            "{loggerName}" => out.push_str(&record.logger_name),
            "{levelName}" => out.push_str(record.level_name),
            "{levelNo}" => out.push_str(&record.level_no.to_string()),
            "{lineNo}" => out.push_str(&record.line_no.to_string()),
            "{date}" => out.push_str(date),
            "{fileName}" => out.push_str(&record.file_name),
            "{pathName}" => out.push_str(&record.path_name),
            "{funcName}" => out.push_str(&record.func_name),
            "{message}" => out.push_str(&record.message),
            _ => {
                // Not a recognized token; emit the brace and keep scanning
                // from the next character so nested tokens still resolve.
                out.push('{');
                rest = &tail[1..];
                continue;
            }
        }
        rest = &tail[token_end + 1..];
    }
    out.push_str(rest);

    // Exactly one trailing newline, no matter how the template ends.
    while out.ends_with('\n') {
        out.pop();
    }
    out.push('\n');
    out
}
