//! # alog
//!
//! Asynchronous multi-sink logging. Every severity (info, warning, error)
//! has its own bounded queue and its own background worker that writes each
//! record to the severity's strategies: console, file or email.
//!
//! ## Features
//!
//! - **Isolated severities**: a slow error sink never delays info records
//! - **Backpressure**: a full queue blocks the producer instead of dropping
//! - **Best effort**: sink failures go to a diagnostics sink, never to the caller
//! - **Explicit or global**: build a [`Log`] and pass it around, or use [`global()`]

pub mod core;
pub mod mail;
pub mod macros;
pub mod strategies;

pub mod prelude {
    pub use crate::core::{
        CollectingDiagnostics, Diagnostic, DiagnosticSink, EnvConfig, LazyLog, Log, LogBuilder,
        LogSettings, LoggerError, QueueMetrics, Result, Severity, SeverityConfig, Strategy,
        TimestampFormat, DEFAULT_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::strategies::{ConsoleStrategy, EmailStrategy, FileStrategy};
}

pub use crate::core::{
    global, CollectingDiagnostics, ConsoleDiagnostics, Diagnostic, DiagnosticSink, EnvConfig,
    Filesystem, LazyLog, Log, LogBuilder, LogConfig, LogSettings, LoggerError, MemoryFs, OsFs,
    QueueMetrics, Result, Severity, SeverityConfig, SeverityWriter, Strategy, TimestampFormat,
    DEFAULT_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use strategies::{ConsoleStrategy, EmailStrategy, FileStrategy};
