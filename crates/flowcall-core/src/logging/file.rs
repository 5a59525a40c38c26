//! File-backed logger
//!
//! Useful when a host (an editor backend, a desktop shell) hides stdout and
//! stderr. The minimum level comes from configuration rather than from
//! process-wide state, so two pipelines can log to different files at
//! different levels.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::traits::{LogLevel, Logger};

/// Logger that appends `[time] [LEVEL] message` lines to a file
pub struct FileLogger {
    path: PathBuf,
    min_level: LogLevel,
    file: Mutex<File>,
}

impl FileLogger {
    /// Open (or create) `path` for appending
    pub fn open(path: impl Into<PathBuf>, min_level: LogLevel) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            min_level,
            file: Mutex::new(file),
        })
    }

    /// Default log location in the system temp directory
    pub fn default_path() -> PathBuf {
        std::env::temp_dir().join("flowcall.log")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Truncate the log file
    pub fn clear(&self) -> io::Result<()> {
        let mut file = self.file.lock();
        *file = File::create(&self.path)?;
        Ok(())
    }

    fn write(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }
        let timestamp = chrono::Utc::now().format("%H:%M:%S%.3f");
        let mut file = self.file.lock();
        // Write failures are ignored.
        let _ = writeln!(file, "[{}] [{}] {}", timestamp, level, message);
        let _ = file.flush();
    }
}

impl Logger for FileLogger {
    fn debug(&self, message: &str) {
        self.write(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.write(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.write(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.write(LogLevel::Error, message);
    }
}
