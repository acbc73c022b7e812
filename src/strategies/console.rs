//! Console strategy implementation

use crate::core::{Result, Strategy};
use colored::{Color, Colorize};
use std::io::Write;

/// Standard stream a [`ConsoleStrategy`] writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

/// Prints records on stdout or stderr. Never fails.
#[derive(Debug, Clone, Default)]
pub struct ConsoleStrategy {
    target: ConsoleTarget,
    color: Option<Color>,
}

impl ConsoleStrategy {
    pub fn new(target: ConsoleTarget) -> Self {
        Self {
            target,
            color: None,
        }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleTarget::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleTarget::Stderr)
    }

    /// Colorize printed records
    ///
    /// # Example
    ///
    /// ```
    /// use alog::strategies::ConsoleStrategy;
    /// use alog::Severity;
    ///
    /// let strategy = ConsoleStrategy::stderr().with_color(Severity::Error.color_code());
    /// ```
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }

    fn print(&self, message: &str) {
        let output = match self.color {
            Some(color) => message.trim_end_matches('\n').color(color).to_string() + "\n",
            None => message.to_string(),
        };
        // Console output is best effort: a closed stream is not an error
        let _ = match self.target {
            ConsoleTarget::Stdout => std::io::stdout().lock().write_all(output.as_bytes()),
            ConsoleTarget::Stderr => std::io::stderr().lock().write_all(output.as_bytes()),
        };
    }
}

impl Strategy for ConsoleStrategy {
    fn write(&mut self, message: &str) -> Result<usize> {
        self.print(message);
        Ok(message.len())
    }

    fn name(&self) -> &str {
        "console"
    }
}
