//! In-memory logger that keeps every entry

use parking_lot::Mutex;

use super::traits::{LogLevel, Logger};

/// A single recorded log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

/// Logger that records entries instead of printing them
///
/// Handy in tests that need to check a warning was emitted, and for hosts
/// that want to surface a node's log next to its output.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Messages logged at exactly `level`
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }

    /// Warnings logged so far
    pub fn warnings(&self) -> Vec<String> {
        self.messages_at(LogLevel::Warn)
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn push(&self, level: LogLevel, message: &str) {
        self.entries.lock().push(LogEntry {
            level,
            message: message.to_string(),
        });
    }
}

impl Logger for MemoryLogger {
    fn debug(&self, message: &str) {
        self.push(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(LogLevel::Error, message);
    }
}
