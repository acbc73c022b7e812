//! Fallback reporting for problems inside the logging pipeline
//!
//! Nothing in this crate raises into the code that emits a record. Missing
//! configuration, failed strategy writes and closed queues are turned into
//! [`Diagnostic`] events and handed to a [`DiagnosticSink`]. The default
//! sink prints them on stderr.

use super::severity::Severity;
use colored::{Color, Colorize};
use parking_lot::Mutex;
use std::fmt;
use std::io::Write;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::Arc;

/// An internal problem of the logging pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A record or writer was requested for a severity without a queue
    NotConfigured {
        severity: Severity,
        caller: Option<String>,
    },
    /// A strategy returned an error
    WriteFailed {
        severity: Severity,
        strategy: String,
        error: String,
    },
    /// A strategy panicked while writing; the worker keeps going
    StrategyPanicked {
        severity: Severity,
        strategy: String,
        message: String,
    },
    /// A record was emitted after the severity's queue was closed
    QueueClosed { severity: Severity },
    /// A file strategy could not open its backing file
    FileUnavailable { path: PathBuf, error: String },
    /// The process-wide instance could not be initialized
    InitFailed { error: String },
    /// A mail payload could not be delivered
    MailFailed { error: String },
}

impl Diagnostic {
    pub fn not_configured(severity: Severity, caller: &Location<'_>) -> Self {
        Diagnostic::NotConfigured {
            severity,
            caller: Some(format!("{}:{}", caller.file(), caller.line())),
        }
    }

    /// Bracketed tag written in front of the console line
    pub fn tag(&self) -> &'static str {
        match self {
            Diagnostic::NotConfigured { .. } | Diagnostic::QueueClosed { .. } => "[ALOG WARNING]",
            Diagnostic::StrategyPanicked { .. } | Diagnostic::InitFailed { .. } => {
                "[ALOG CRITICAL]"
            }
            _ => "[ALOG ERROR]",
        }
    }

    fn color(&self) -> Color {
        match self.tag() {
            "[ALOG WARNING]" => Color::Yellow,
            "[ALOG CRITICAL]" => Color::BrightRed,
            _ => Color::Red,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NotConfigured {
                severity,
                caller: Some(caller),
            } => write!(f, "{} Logger {} not configured", caller, severity),
            Diagnostic::NotConfigured {
                severity,
                caller: None,
            } => write!(f, "Logger {} not configured", severity),
            Diagnostic::WriteFailed {
                severity,
                strategy,
                error,
            } => write!(f, "{} ({} logger, {} strategy)", error, severity, strategy),
            Diagnostic::StrategyPanicked {
                severity,
                strategy,
                message,
            } => write!(
                f,
                "{} strategy panicked: {}. {} logger continues with its other strategies",
                strategy, message, severity
            ),
            Diagnostic::QueueClosed { severity } => {
                write!(f, "Logger {} is closed, record discarded", severity)
            }
            Diagnostic::FileUnavailable { path, error } => {
                write!(f, "log file '{}' unavailable: {}", path.display(), error)
            }
            Diagnostic::InitFailed { error } => write!(f, "logger initialization failed: {}", error),
            Diagnostic::MailFailed { error } => write!(f, "{}", error),
        }
    }
}

/// Receiver of pipeline diagnostics.
///
/// Any `Fn(&Diagnostic) + Send + Sync` closure is a sink.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn report(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

pub type SharedDiagnostics = Arc<dyn DiagnosticSink>;

/// Prints diagnostics on stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleDiagnostics;

impl DiagnosticSink for ConsoleDiagnostics {
    fn report(&self, diagnostic: &Diagnostic) {
        let line = format!("{} {}", diagnostic.tag().color(diagnostic.color()), diagnostic);
        // stderr is the last resort; nothing to do if it fails too
        let _ = writeln!(std::io::stderr().lock(), "{}", line);
    }
}

/// Keeps rendered diagnostics in memory
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    lines: Mutex<Vec<String>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl DiagnosticSink for CollectingDiagnostics {
    fn report(&self, diagnostic: &Diagnostic) {
        self.lines.lock().push(diagnostic.to_string());
    }
}

pub(crate) fn default_sink() -> SharedDiagnostics {
    Arc::new(ConsoleDiagnostics)
}
