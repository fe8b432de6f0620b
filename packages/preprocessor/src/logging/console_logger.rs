// Console Logger
//
// Diagnostics go to stderr so they never mix with preprocessed output a host
// writes to stdout.

use super::logger::{LogLevel, Logger};

/// Writes `[LEVEL] message` lines to stderr.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleLogger {
    level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        ConsoleLogger::new(LogLevel::Info)
    }
}

/// The line written for one message.
pub(crate) fn format_line(level: LogLevel, msg: &str) -> String {
    format!("[{}] {}", level.as_str().to_ascii_uppercase(), msg)
}

impl Logger for ConsoleLogger {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn write(&self, level: LogLevel, msg: &str) {
        eprintln!("{}", format_line(level, msg));
    }
}
