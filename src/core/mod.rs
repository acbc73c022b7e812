//! Core logger types and traits

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fs;
pub mod global;
pub mod log;
pub mod message;
pub mod metrics;
pub mod queue;
pub mod registry;
pub mod settings;
pub mod severity;
pub mod strategy;
pub mod timestamp;

pub use config::{LogBuilder, LogConfig, SeverityConfig, DEFAULT_CAPACITY};
pub use diagnostics::{
    CollectingDiagnostics, ConsoleDiagnostics, Diagnostic, DiagnosticSink, SharedDiagnostics,
};
pub use error::{LoggerError, Result};
pub use fs::{Filesystem, MemoryFs, OsFs};
pub use global::{global, LazyLog};
pub use log::{Log, SeverityWriter};
pub use message::MessageFormatter;
pub use metrics::QueueMetrics;
pub use queue::{SeverityQueue, Worker};
pub use registry::{Registry, DEFAULT_SHUTDOWN_TIMEOUT};
pub use settings::{load_dotenv, EnvConfig, LogSettings, SeveritySettings};
pub use severity::Severity;
pub use strategy::Strategy;
pub use timestamp::TimestampFormat;
