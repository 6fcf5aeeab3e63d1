//! Structured JSON logger.
//!
//! - One log line = one event, valid JSON
//! - Deterministic key ordering (event, severity, then fields alphabetically)
//! - Synchronous, no buffering
//! - Failures and corruption route to stderr, the rest to stdout
//! - Write failures are ignored: logging never affects execution

use std::fmt;
use std::io::{self, Write};

use super::events::Event;

/// Log severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured logger over typed [`Event`]s.
///
/// The event supplies its own severity, so a failure cannot be logged as
/// routine output by a careless call site.
pub struct Logger;

impl Logger {
    /// Logs an event with structured fields.
    ///
    /// Routed by the event's severity: `Error` goes to stderr, everything
    /// else to stdout. Fields are output in deterministic (alphabetical)
    /// order.
    pub fn log(event: Event, fields: &[(&str, &str)]) {
        let severity = event.severity();
        if severity >= Severity::Error {
            Self::log_to_writer(severity, event, fields, &mut io::stderr());
        } else {
            Self::log_to_writer(severity, event, fields, &mut io::stdout());
        }
    }

    fn log_to_writer<W: Write>(
        severity: Severity,
        event: Event,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        // Build the line manually so key order stays deterministic
        let mut output = String::with_capacity(256);

        output.push_str("{\"event\":\"");
        output.push_str(event.as_str());
        output.push('"');

        output.push_str(",\"severity\":\"");
        output.push_str(severity.as_str());
        output.push('"');

        let mut sorted_fields: Vec<_> = fields.iter().collect();
        sorted_fields.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted_fields {
            output.push_str(",\"");
            Self::escape_json_string(&mut output, key);
            output.push_str("\":\"");
            Self::escape_json_string(&mut output, value);
            output.push('"');
        }

        output.push('}');
        output.push('\n');

        // one write_all call so concurrent lines do not interleave
        let _ = writer.write_all(output.as_bytes());
        let _ = writer.flush();
    }

    fn escape_json_string(output: &mut String, s: &str) {
        for c in s.chars() {
            match c {
                '"' => output.push_str("\\\""),
                '\\' => output.push_str("\\\\"),
                '\n' => output.push_str("\\n"),
                '\r' => output.push_str("\\r"),
                '\t' => output.push_str("\\t"),
                c if c.is_control() => {
                    output.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => output.push(c),
            }
        }
    }
}

/// Capture a log line to a string for testing
#[cfg(test)]
pub fn capture_log(event: Event, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::log_to_writer(event.severity(), event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}
