//! Structured JSON logger for catalogdb
//!
//! Each event is written as one JSON object per line: `event` and
//! `severity` first, then the caller's fields sorted by key. Writes are
//! synchronous. ERROR lines go to stderr, the rest to stdout.

use std::io::{self, Write};

use serde_json::Value;

use super::events::Event;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Normal operations
    Info,
    /// Refused requests and no-op mutations
    Warn,
    /// Storage failures
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

/// A structured logger that outputs JSON lines
pub struct Logger;

impl Logger {
    /// Log a typed event at its own severity
    pub fn event(event: Event, fields: &[(&str, &str)]) {
        let line = render(event, fields);

        // One write per line so concurrent handlers do not interleave
        let _ = match event.severity() {
            Severity::Error => io::stderr().lock().write_all(line.as_bytes()),
            Severity::Info | Severity::Warn => io::stdout().lock().write_all(line.as_bytes()),
        };
    }
}

fn render(event: Event, fields: &[(&str, &str)]) -> String {
    let mut sorted: Vec<_> = fields.to_vec();
    sorted.sort_by_key(|(key, _)| *key);

    let mut line = format!(
        "{{\"event\":{},\"severity\":{}",
        quoted(event.as_str()),
        quoted(event.severity().as_str())
    );
    for (key, value) in sorted {
        line.push(',');
        line.push_str(&quoted(key));
        line.push(':');
        line.push_str(&quoted(value));
    }
    line.push_str("}\n");
    line
}

fn quoted(s: &str) -> String {
    Value::from(s).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_json_format() {
        let line = render(Event::ProductCreated, &[("id", "1")]);

        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "PRODUCT_CREATED");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["id"], "1");
    }

    #[test]
    fn test_fields_sorted_by_key() {
        let a = render(Event::RequestRejected, &[("route", "x"), ("id", "1")]);
        let b = render(Event::RequestRejected, &[("id", "1"), ("route", "x")]);

        assert_eq!(a, b);
        assert!(a.starts_with("{\"event\":\"REQUEST_REJECTED\",\"severity\":\"WARN\",\"id\""));
    }

    #[test]
    fn test_reason_with_quotes_and_newline() {
        let line = render(Event::StoreFailure, &[("reason", "bad \"row\"\nline 2")]);

        assert_eq!(line.matches('\n').count(), 1);
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["reason"], "bad \"row\"\nline 2");
        assert_eq!(parsed["severity"], "ERROR");
    }
}
