//! Engine log records and the host log hook
//!
//! Every line the engine logs goes to the `log` facade and, when installed,
//! to the [`LogHook`]. Embedders use the hook to forward engine output to
//! their own diagnostics.

use log::Level;

/// One engine log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    level: Level,
    message: String,
}

impl LogRecord {
    /// Create a record
    #[must_use]
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Severity of the line
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Text of the line
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Callback receiving every engine log line
pub type LogHook = Box<dyn FnMut(&LogRecord)>;
