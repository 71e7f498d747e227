//! Line-oriented log sink passed explicitly into every pipeline component.
//!
//! Components never print. They push `LogLine`s into a sink the caller owns;
//! the helpers on `LogSink` also forward each line to `tracing`, so the file
//! log set up by `logging::init_logging` sees everything the user sees.

use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// One tagged message emitted by a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: LogLevel,
    pub message: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            LogLevel::Info => write!(f, "{}", self.message),
            level => write!(f, "[{}] {}", level, self.message),
        }
    }
}

pub trait LogSink: Send + Sync {
    /// Deliver a line to the subscriber. Must not block for long.
    fn push(&self, line: LogLine);

    fn info(&self, message: &str) {
        tracing::info!("{}", message);
        self.push(LogLine {
            level: LogLevel::Info,
            message: message.to_string(),
        });
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
        self.push(LogLine {
            level: LogLevel::Warn,
            message: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
        self.push(LogLine {
            level: LogLevel::Error,
            message: message.to_string(),
        });
    }
}

/// Sink that only forwards to `tracing` (the helpers already do that).
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn push(&self, _line: LogLine) {}
}

/// Collects lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<LogLine>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.lock().unwrap().clone()
    }

    /// True if any collected line at `level` contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .any(|l| l.level == level && l.message.contains(needle))
    }
}

impl LogSink for MemorySink {
    fn push(&self, line: LogLine) {
        self.lines.lock().unwrap().push(line);
    }
}
