//! Console logger implementation

use super::traits::{LogLevel, Logger};

/// A logger that writes to the console
///
/// Info goes to stdout, everything else to stderr. Entries below
/// `min_level` are dropped.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
    min_level: LogLevel,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    /// Create a new console logger with the `[flowcall]` prefix
    pub fn new() -> Self {
        Self {
            prefix: "[flowcall]".to_string(),
            min_level: LogLevel::Debug,
        }
    }

    /// Create a console logger with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::new()
        }
    }

    /// Drop entries below `level`
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    fn emit(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }
        match level {
            LogLevel::Info => println!("{} {}: {}", self.prefix, level, message),
            _ => eprintln!("{} {}: {}", self.prefix, level, message),
        }
    }
}

impl Logger for ConsoleLogger {
    fn debug(&self, message: &str) {
        self.emit(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.emit(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.emit(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.emit(LogLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_logger_creation() {
        let logger = ConsoleLogger::new();
        assert_eq!(logger.prefix, "[flowcall]");
        assert_eq!(logger.min_level, LogLevel::Debug);

        let custom = ConsoleLogger::with_prefix("[node-7]").with_min_level(LogLevel::Warn);
        assert_eq!(custom.prefix, "[node-7]");
        assert_eq!(custom.min_level, LogLevel::Warn);
    }

    #[test]
    fn test_console_logger_logs() {
        let logger = ConsoleLogger::new().with_min_level(LogLevel::Error);
        logger.debug("dropped");
        logger.info("dropped");
        logger.warn("dropped");
        logger.error("kept");
    }
}
