//! Injected logging
//!
//! Every component receives an `Arc<dyn Logger>`; nothing here touches
//! global state.

mod traits;
mod noop;
mod console;
mod file;
mod memory;

pub use traits::{Logger, LogLevel, SharedLogger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use file::FileLogger;
pub use memory::{MemoryLogger, LogEntry};
