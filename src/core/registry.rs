//! Severity registry
//!
//! Binds every configured severity to its queue and owns the workers that
//! drain them. Built once from a [`LogConfig`]; strategies are fixed from
//! then on.

use super::{
    config::LogConfig,
    diagnostics::SharedDiagnostics,
    error::{LoggerError, Result},
    message::MessageFormatter,
    queue::{SeverityQueue, Worker},
    severity::Severity,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default shutdown timeout used when the registry is dropped (5 seconds)
///
/// For custom timeout control, use [`Registry::shutdown`] instead.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Registry {
    queues: BTreeMap<Severity, Arc<SeverityQueue>>,
    workers: Vec<Worker>,
    formatter: MessageFormatter,
    diagnostics: SharedDiagnostics,
}

impl Registry {
    /// Start exactly one worker per configured severity
    pub fn start(config: LogConfig) -> Result<Self> {
        let LogConfig {
            severities,
            time_format,
            include_caller,
            diagnostics,
        } = config;
        time_format.validate()?;

        let mut queues = BTreeMap::new();
        let mut workers = Vec::with_capacity(severities.len());
        for (severity, severity_config) in severities {
            if severity_config.capacity == 0 {
                return Err(LoggerError::config(
                    format!("{} logger", severity),
                    "queue capacity must be at least 1",
                ));
            }
            let (queue, worker) = Worker::spawn(
                severity,
                severity_config.capacity,
                severity_config.strategies,
                Arc::clone(&diagnostics),
            )?;
            queues.insert(severity, queue);
            workers.push(worker);
        }

        Ok(Self {
            queues,
            workers,
            formatter: MessageFormatter::new(time_format, include_caller),
            diagnostics,
        })
    }

    pub fn queue(&self, severity: Severity) -> Option<&Arc<SeverityQueue>> {
        self.queues.get(&severity)
    }

    pub fn severities(&self) -> impl Iterator<Item = Severity> + '_ {
        self.queues.keys().copied()
    }

    pub fn formatter(&self) -> &MessageFormatter {
        &self.formatter
    }

    pub fn diagnostics(&self) -> &SharedDiagnostics {
        &self.diagnostics
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Close one severity's queue; its worker exits once the buffer is drained
    pub fn close(&self, severity: Severity) {
        if let Some(queue) = self.queues.get(&severity) {
            queue.close();
        }
    }

    /// Close every queue and wait for the workers to drain them
    ///
    /// Returns `true` if all workers finished within `timeout`.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        for queue in self.queues.values() {
            queue.close();
        }

        let deadline = Instant::now() + timeout;
        let mut finished = true;
        for worker in &self.workers {
            if !worker.join_until(deadline) {
                eprintln!(
                    "[ALOG WARNING] {} worker did not finish within {:?}. Some records may be lost.",
                    worker.severity(),
                    timeout
                );
                finished = false;
            }
        }
        finished
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}
