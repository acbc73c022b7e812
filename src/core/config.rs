//! Logger configuration and builder

use super::{
    diagnostics::{default_sink, DiagnosticSink, SharedDiagnostics},
    error::Result,
    log::Log,
    severity::Severity,
    strategy::Strategy,
    timestamp::TimestampFormat,
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Default number of records a severity queue buffers before producers block
pub const DEFAULT_CAPACITY: usize = 100;

/// Queue capacity and ordered strategies of one severity
pub struct SeverityConfig {
    pub(crate) capacity: usize,
    pub(crate) strategies: Vec<Box<dyn Strategy>>,
}

impl SeverityConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            strategies: Vec::new(),
        }
    }

    /// Add a strategy; records reach strategies in the order they were added
    #[must_use = "builder methods return a new value"]
    pub fn strategy<S: Strategy + 'static>(mut self, strategy: S) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn add_strategy(&mut self, strategy: Box<dyn Strategy>) {
        self.strategies.push(strategy);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

impl Default for SeverityConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl fmt::Debug for SeverityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeverityConfig")
            .field("capacity", &self.capacity)
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

/// Full configuration of a [`Log`]
pub struct LogConfig {
    pub severities: BTreeMap<Severity, SeverityConfig>,
    pub time_format: TimestampFormat,
    pub include_caller: bool,
    pub diagnostics: SharedDiagnostics,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            severities: BTreeMap::new(),
            time_format: TimestampFormat::default(),
            include_caller: false,
            diagnostics: default_sink(),
        }
    }
}

/// Builder for constructing a [`Log`] with a fluent API
///
/// # Example
/// ```
/// use alog::prelude::*;
///
/// let log = Log::builder()
///     .include_caller(true)
///     .severity(Severity::Info, SeverityConfig::new(100).strategy(ConsoleStrategy::stdout()))
///     .severity(Severity::Error, SeverityConfig::new(100).strategy(ConsoleStrategy::stderr()))
///     .build()
///     .unwrap();
///
/// log.info("service started");
/// ```
#[derive(Default)]
pub struct LogBuilder {
    config: LogConfig,
}

impl LogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a severity to a queue and its strategies, replacing any earlier binding
    #[must_use = "builder methods return a new value"]
    pub fn severity(mut self, severity: Severity, config: SeverityConfig) -> Self {
        self.config.severities.insert(severity, config);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_format(mut self, format: TimestampFormat) -> Self {
        self.config.time_format = format;
        self
    }

    /// Write the caller's `file:line` into every record
    #[must_use = "builder methods return a new value"]
    pub fn include_caller(mut self, include: bool) -> Self {
        self.config.include_caller = include;
        self
    }

    /// Where pipeline problems are reported; stderr by default
    #[must_use = "builder methods return a new value"]
    pub fn diagnostics<D: DiagnosticSink + 'static>(mut self, sink: D) -> Self {
        self.config.diagnostics = Arc::new(sink);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn shared_diagnostics(mut self, sink: SharedDiagnostics) -> Self {
        self.config.diagnostics = sink;
        self
    }

    pub fn config(self) -> LogConfig {
        self.config
    }

    /// Start one worker per configured severity
    pub fn build(self) -> Result<Log> {
        Log::create(self.config)
    }
}
