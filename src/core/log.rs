//! Logging facade
//!
//! [`Log`] formats records and enqueues them on the matching severity queue.
//! It never fails the caller: an unconfigured severity or a closed queue is
//! reported to the diagnostics sink instead.

use super::{
    config::{LogBuilder, LogConfig, SeverityConfig, DEFAULT_CAPACITY},
    diagnostics::Diagnostic,
    error::{LoggerError, Result},
    fs::Filesystem,
    message::MessageFormatter,
    metrics::QueueMetrics,
    queue::SeverityQueue,
    registry::Registry,
    settings::EnvConfig,
    severity::Severity,
    strategy::Strategy,
};
use crate::strategies::{ConsoleStrategy, FileStrategy};
use chrono::Local;
use std::backtrace::Backtrace;
use std::fmt;
use std::io;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

/// Handle to a running set of severity workers.
///
/// Cloning is cheap and every clone feeds the same queues. The workers are
/// shut down when the last clone is dropped.
///
/// # Example
///
/// ```
/// use alog::Log;
///
/// let log = Log::console(100).unwrap();
/// log.info("starting").infof(format_args!("{} workers", 3));
/// log.error(Some(&std::io::Error::other("disk full")));
/// ```
#[derive(Clone)]
pub struct Log {
    registry: Arc<Registry>,
}

impl Log {
    /// Create a builder for Log
    #[must_use]
    pub fn builder() -> LogBuilder {
        LogBuilder::new()
    }

    /// Start the workers described by `config`
    pub fn create(config: LogConfig) -> Result<Self> {
        Ok(Self {
            registry: Arc::new(Registry::start(config)?),
        })
    }

    /// Console preset: Info and Warning go to stdout, Error to stderr
    pub fn console(capacity: usize) -> Result<Self> {
        Self::builder()
            .severity(
                Severity::Info,
                SeverityConfig::new(capacity).strategy(ConsoleStrategy::stdout()),
            )
            .severity(
                Severity::Warning,
                SeverityConfig::new(capacity).strategy(ConsoleStrategy::stdout()),
            )
            .severity(
                Severity::Error,
                SeverityConfig::new(capacity).strategy(ConsoleStrategy::stderr()),
            )
            .build()
    }

    /// Environment preset: one file per severity, paths from [`EnvConfig`].
    ///
    /// Unlike [`FileStrategy::open`], a directory or file that cannot be
    /// prepared is returned as an error.
    pub fn from_env(env: &EnvConfig, fs: &dyn Filesystem) -> Result<Self> {
        let mut builder = Self::builder().include_caller(true);
        for severity in Severity::ALL {
            let path = env.path(severity)?;
            let strategy = FileStrategy::try_open(fs, path)?;
            builder = builder.severity(
                severity,
                SeverityConfig::new(DEFAULT_CAPACITY).strategy(strategy),
            );
        }
        builder.build()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn is_configured(&self, severity: Severity) -> bool {
        self.registry.queue(severity).is_some()
    }

    pub fn metrics(&self, severity: Severity) -> Option<&QueueMetrics> {
        self.registry.queue(severity).map(|queue| queue.metrics())
    }

    /// Record an informational message
    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) -> &Self {
        self.emit(Severity::Info, Location::caller(), |formatter, caller| {
            formatter.format(&Local::now(), message.as_ref(), caller)
        })
    }

    /// Record a formatted informational message
    ///
    /// ```
    /// # let log = alog::Log::console(10).unwrap();
    /// log.infof(format_args!("listening on port {}", 8080));
    /// ```
    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) -> &Self {
        self.emit(Severity::Info, Location::caller(), |formatter, caller| {
            formatter.format(&Local::now(), &args.to_string(), caller)
        })
    }

    #[track_caller]
    pub fn warning(&self, message: impl AsRef<str>) -> &Self {
        self.emit(Severity::Warning, Location::caller(), |formatter, caller| {
            formatter.format(&Local::now(), message.as_ref(), caller)
        })
    }

    /// Record an error. `None` records nothing.
    #[track_caller]
    pub fn error<E: fmt::Display + ?Sized>(&self, err: Option<&E>) -> &Self {
        let caller = Location::caller();
        let Some(queue) = self.queue_or_report(Severity::Error, caller) else {
            return self;
        };
        if let Some(err) = err {
            let record = self
                .registry
                .formatter()
                .format(&Local::now(), &err.to_string(), caller);
            self.push(queue, record);
        }
        self
    }

    /// Record an error followed by the current stack trace. `None` records nothing.
    #[track_caller]
    pub fn error_debug<E: fmt::Display + ?Sized>(&self, err: Option<&E>) -> &Self {
        let caller = Location::caller();
        let Some(queue) = self.queue_or_report(Severity::Error, caller) else {
            return self;
        };
        if let Some(err) = err {
            let record = self
                .registry
                .formatter()
                .format(&Local::now(), &err.to_string(), caller);
            let trace = Backtrace::force_capture();
            self.push(queue, MessageFormatter::with_trace(record, &trace));
        }
        self
    }

    /// Format and enqueue a message, returning closed-queue and
    /// not-configured conditions instead of reporting them
    #[track_caller]
    pub fn try_log(&self, severity: Severity, message: impl AsRef<str>) -> Result<()> {
        let queue = self.registry.queue(severity).ok_or_else(|| {
            LoggerError::config(format!("{} logger", severity), "not configured")
        })?;
        let record = self
            .registry
            .formatter()
            .format(&Local::now(), message.as_ref(), Location::caller());
        queue.push(record)
    }

    /// [`io::Write`] handle for libraries that want a plain writer.
    ///
    /// Bytes are enqueued verbatim, without timestamp. An unconfigured
    /// severity yields a console writer after reporting the problem.
    #[track_caller]
    pub fn writer(&self, severity: Severity) -> SeverityWriter {
        match self.queue_or_report(severity, Location::caller()) {
            Some(queue) => SeverityWriter::Queue(Arc::clone(queue)),
            None => SeverityWriter::Console(ConsoleStrategy::stderr()),
        }
    }

    /// Close one severity's queue; later records for it are discarded
    pub fn close(&self, severity: Severity) {
        self.registry.close(severity);
    }

    /// Close all queues and wait up to `timeout` for the workers to drain them
    pub fn shutdown(&self, timeout: Duration) -> bool {
        self.registry.shutdown(timeout)
    }

    fn emit<F>(&self, severity: Severity, caller: &Location<'_>, record: F) -> &Self
    where
        F: FnOnce(&MessageFormatter, &Location<'_>) -> String,
    {
        if let Some(queue) = self.queue_or_report(severity, caller) {
            self.push(queue, record(self.registry.formatter(), caller));
        }
        self
    }

    fn queue_or_report(
        &self,
        severity: Severity,
        caller: &Location<'_>,
    ) -> Option<&Arc<SeverityQueue>> {
        let queue = self.registry.queue(severity);
        if queue.is_none() {
            self.registry
                .diagnostics()
                .report(&Diagnostic::not_configured(severity, caller));
        }
        queue
    }

    fn push(&self, queue: &SeverityQueue, record: String) {
        if queue.push(record).is_err() {
            self.registry.diagnostics().report(&Diagnostic::QueueClosed {
                severity: queue.severity(),
            });
        }
    }
}

impl fmt::Debug for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Log")
            .field("severities", &self.registry.severities().collect::<Vec<_>>())
            .field("formatter", self.registry.formatter())
            .finish()
    }
}

/// Writer capability for one severity, see [`Log::writer`]
pub enum SeverityWriter {
    Queue(Arc<SeverityQueue>),
    Console(ConsoleStrategy),
}

impl SeverityWriter {
    pub fn is_console(&self) -> bool {
        matches!(self, SeverityWriter::Console(_))
    }
}

impl io::Write for SeverityWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf).into_owned();
        match self {
            SeverityWriter::Queue(queue) => queue
                .push(text)
                .map_err(|e| io::Error::new(io::ErrorKind::BrokenPipe, e))?,
            SeverityWriter::Console(console) => {
                console
                    .write(&text)
                    .map_err(io::Error::other)?;
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::CollectingDiagnostics;
    use crate::core::fs::MemoryFs;
    use crate::core::timestamp::TimestampFormat;
    use io::Write;
    use parking_lot::Mutex;

    #[derive(Clone, Default)]
    struct Capture {
        records: Arc<Mutex<Vec<String>>>,
    }

    impl Strategy for Capture {
        fn write(&mut self, message: &str) -> Result<usize> {
            self.records.lock().push(message.to_string());
            Ok(message.len())
        }

        fn name(&self) -> &str {
            "capture"
        }
    }

    fn capture_log(include_caller: bool) -> (Log, Capture, Arc<CollectingDiagnostics>) {
        let capture = Capture::default();
        let diagnostics = CollectingDiagnostics::shared();
        let log = Log::builder()
            .time_format(TimestampFormat::Custom("TS".to_string()))
            .include_caller(include_caller)
            .shared_diagnostics(diagnostics.clone())
            .severity(Severity::Info, SeverityConfig::new(16).strategy(capture.clone()))
            .severity(Severity::Error, SeverityConfig::new(16).strategy(capture.clone()))
            .build()
            .unwrap();
        (log, capture, diagnostics)
    }

    fn drained(log: &Log, capture: &Capture) -> Vec<String> {
        assert!(log.shutdown(Duration::from_secs(5)));
        capture.records.lock().clone()
    }

    #[test]
    fn test_info_layout() {
        let (log, capture, _) = capture_log(false);
        log.info("hello").infof(format_args!("{}-{}", 1, 2));
        assert_eq!(drained(&log, &capture), vec!["TS;hello\n", "TS;1-2\n"]);
    }

    #[test]
    fn test_caller_is_the_call_site() {
        let (log, capture, _) = capture_log(true);
        let line = line!() + 1;
        log.info("here");
        assert_eq!(
            drained(&log, &capture),
            vec![format!("TS;{}:{};here\n", file!(), line)]
        );
    }

    #[test]
    fn test_error_none_records_nothing() {
        let (log, capture, diagnostics) = capture_log(false);
        log.error(None::<&io::Error>);
        log.error(Some(&io::Error::other("disk full")));
        assert_eq!(drained(&log, &capture), vec!["TS;disk full\n"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_error_debug_appends_trace() {
        let (log, capture, _) = capture_log(false);
        log.error_debug(Some("broken pipe"));
        let records = drained(&log, &capture);

        assert_eq!(records.len(), 1);
        assert!(records[0].starts_with("TS;broken pipe\n\n"));
        assert!(records[0].ends_with("\n---\n\n"));
        assert!(records[0].len() > "TS;broken pipe\n\n\n---\n\n".len());
    }

    #[test]
    fn test_unconfigured_severity_reports() {
        let (log, capture, diagnostics) = capture_log(false);
        log.warning("nobody listens");

        let lines = diagnostics.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Logger Warning not configured"));
        assert!(lines[0].contains(file!()));
        assert!(drained(&log, &capture).is_empty());
    }

    #[test]
    fn test_writer_for_unconfigured_severity_is_console() {
        let (log, _, diagnostics) = capture_log(false);
        let mut writer = log.writer(Severity::Warning);
        assert!(writer.is_console());
        assert_eq!(writer.write(b"fallback\n").unwrap(), 9);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_writer_enqueues_raw_bytes() {
        let (log, capture, _) = capture_log(false);
        let mut writer = log.writer(Severity::Info);
        writer.write_all(b"raw line\n").unwrap();
        assert_eq!(drained(&log, &capture), vec!["raw line\n"]);
    }

    #[test]
    fn test_closed_queue() {
        let (log, _, diagnostics) = capture_log(false);
        log.close(Severity::Info);

        let err = log.try_log(Severity::Info, "late").unwrap_err();
        assert!(matches!(err, LoggerError::ChannelClosed { .. }));

        let mut writer = log.writer(Severity::Info);
        let err = writer.write(b"late").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        log.info("late");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.lines()[0].contains("Logger Info is closed"));
    }

    #[test]
    fn test_from_env_writes_files() {
        let fs = MemoryFs::shared();
        let env = EnvConfig::new("/logs/info.log", "/logs/warning.log", "/logs/err/error.log");
        let log = Log::from_env(&env, &*fs).unwrap();
        log.warning("careful");
        assert!(log.shutdown(Duration::from_secs(5)));

        let contents = fs.contents("/logs/warning.log").unwrap();
        assert!(contents.ends_with(";careful\n"));
        assert!(contents.contains(file!()));
        assert_eq!(fs.contents("/logs/info.log").unwrap(), "");
        assert!(fs.contents("/logs/err/error.log").is_some());
    }

    #[test]
    fn test_from_env_fails_hard_on_directory_error() {
        let fs = MemoryFs::new();
        fs.fail_mkdir(true);
        let env = EnvConfig::new("/a/info.log", "/a/warning.log", "/a/error.log");
        let err = Log::from_env(&env, &fs).err().unwrap();
        assert!(matches!(err, LoggerError::DirectoryCreation { .. }));
    }
}
