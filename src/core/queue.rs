//! Severity queues and their workers
//!
//! Each severity owns one bounded FIFO queue of formatted records and one
//! worker thread that drains it. The worker fans every record out to the
//! severity's strategies in registration order. A full queue blocks the
//! producer until the worker frees a slot.

use super::{
    diagnostics::{Diagnostic, DiagnosticSink, SharedDiagnostics},
    error::{LoggerError, Result},
    metrics::QueueMetrics,
    severity::Severity,
    strategy::Strategy,
};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Producer side of a severity queue
///
/// Closing is one-way. Records already buffered when the queue closes are
/// still drained by the worker; later pushes fail with
/// [`LoggerError::ChannelClosed`].
pub struct SeverityQueue {
    severity: Severity,
    capacity: usize,
    sender: RwLock<Option<Sender<String>>>,
    metrics: Arc<QueueMetrics>,
}

impl SeverityQueue {
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn metrics(&self) -> &QueueMetrics {
        &self.metrics
    }

    pub fn is_closed(&self) -> bool {
        self.sender.read().is_none()
    }

    /// Enqueue one formatted record, waiting for a free slot if the queue is full
    ///
    /// The sender is cloned out of the lock before waiting, so a blocked
    /// producer never holds up [`close`](Self::close).
    pub fn push(&self, record: String) -> Result<()> {
        let sender = self
            .sender
            .read()
            .clone()
            .ok_or_else(|| LoggerError::channel_closed(self.severity))?;

        // Count before sending so `delivered` never overtakes `enqueued`
        self.metrics.record_enqueued();
        let sent = match sender.try_send(record) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(record)) => {
                self.metrics.record_blocked();
                sender.send(record).map_err(|_| ())
            }
            Err(TrySendError::Disconnected(_)) => Err(()),
        };
        sent.map_err(|()| {
            self.metrics.rollback_enqueued();
            LoggerError::channel_closed(self.severity)
        })
    }

    /// Close the queue for recording
    pub fn close(&self) {
        drop(self.sender.write().take());
    }
}

/// Background worker draining one severity queue
pub struct Worker {
    severity: Severity,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Worker {
    /// Create a queue and start the worker that drains it
    pub fn spawn(
        severity: Severity,
        capacity: usize,
        strategies: Vec<Box<dyn Strategy>>,
        diagnostics: SharedDiagnostics,
    ) -> Result<(Arc<SeverityQueue>, Worker)> {
        let (sender, receiver) = bounded(capacity);
        let metrics = Arc::new(QueueMetrics::new());
        let worker_metrics = Arc::clone(&metrics);

        let handle = thread::Builder::new()
            .name(severity.worker_name())
            .spawn(move || {
                drain(severity, receiver, strategies, &worker_metrics, &*diagnostics)
            })
            .map_err(|source| LoggerError::WorkerSpawn { severity, source })?;

        let queue = Arc::new(SeverityQueue {
            severity,
            capacity,
            sender: RwLock::new(Some(sender)),
            metrics,
        });
        let worker = Worker {
            severity,
            handle: Mutex::new(Some(handle)),
        };
        Ok((queue, worker))
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn is_finished(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .map_or(true, |handle| handle.is_finished())
    }

    /// Wait until the worker exits or `deadline` passes.
    ///
    /// The queue must be closed first, otherwise the worker never exits.
    pub fn join_until(&self, deadline: Instant) -> bool {
        let mut slot = self.handle.lock();
        let Some(handle) = slot.take() else {
            return true;
        };

        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!(
                        "[ALOG ERROR] {} worker panicked during shutdown: {:?}",
                        self.severity, e
                    );
                    return false;
                }
                return true;
            }

            if Instant::now() >= deadline {
                *slot = Some(handle);
                return false;
            }

            // Small sleep to avoid busy-waiting
            thread::sleep(Duration::from_millis(5));
        }
    }
}

/// Worker loop: runs until the queue is closed and empty
fn drain(
    severity: Severity,
    receiver: Receiver<String>,
    mut strategies: Vec<Box<dyn Strategy>>,
    metrics: &QueueMetrics,
    diagnostics: &dyn DiagnosticSink,
) {
    // recv keeps yielding buffered records after every sender is gone
    for record in receiver.iter() {
        write_all(severity, &record, &mut strategies, metrics, diagnostics);
        metrics.record_delivered();
    }
}

/// Hand one record to every strategy in order.
///
/// A failing or panicking strategy is reported and skipped; the remaining
/// strategies still receive the record.
fn write_all(
    severity: Severity,
    record: &str,
    strategies: &mut [Box<dyn Strategy>],
    metrics: &QueueMetrics,
    diagnostics: &dyn DiagnosticSink,
) {
    for strategy in strategies.iter_mut() {
        let result =
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| strategy.write(record)));

        match result {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                metrics.record_write_failure();
                diagnostics.report(&Diagnostic::WriteFailed {
                    severity,
                    strategy: strategy.name().to_string(),
                    error: e.to_string(),
                });
            }
            Err(panic_info) => {
                metrics.record_write_failure();
                let message = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                diagnostics.report(&Diagnostic::StrategyPanicked {
                    severity,
                    strategy: strategy.name().to_string(),
                    message,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::CollectingDiagnostics;

    struct Recorder {
        name: &'static str,
        records: Arc<Mutex<Vec<String>>>,
    }

    impl Strategy for Recorder {
        fn write(&mut self, message: &str) -> Result<usize> {
            self.records.lock().push(format!("{}:{}", self.name, message));
            Ok(message.len())
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    struct Failing;

    impl Strategy for Failing {
        fn write(&mut self, _message: &str) -> Result<usize> {
            Err(LoggerError::file_not_defined())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct Panicking;

    impl Strategy for Panicking {
        fn write(&mut self, _message: &str) -> Result<usize> {
            panic!("sink exploded")
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn deadline() -> Instant {
        Instant::now() + Duration::from_secs(5)
    }

    #[test]
    fn test_fan_out_in_registration_order() {
        let records = Arc::new(Mutex::new(Vec::new()));
        let strategies: Vec<Box<dyn Strategy>> = vec![
            Box::new(Recorder {
                name: "first",
                records: Arc::clone(&records),
            }),
            Box::new(Recorder {
                name: "second",
                records: Arc::clone(&records),
            }),
        ];
        let diagnostics = CollectingDiagnostics::shared();
        let (queue, worker) =
            Worker::spawn(Severity::Info, 10, strategies, diagnostics.clone()).unwrap();

        queue.push("a".to_string()).unwrap();
        queue.push("b".to_string()).unwrap();
        queue.close();
        assert!(worker.join_until(deadline()));

        assert_eq!(
            *records.lock(),
            vec!["first:a", "second:a", "first:b", "second:b"]
        );
        assert_eq!(queue.metrics().delivered(), 2);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_failing_strategy_does_not_starve_others() {
        let records = Arc::new(Mutex::new(Vec::new()));
        let strategies: Vec<Box<dyn Strategy>> = vec![
            Box::new(Failing),
            Box::new(Panicking),
            Box::new(Recorder {
                name: "ok",
                records: Arc::clone(&records),
            }),
        ];
        let diagnostics = CollectingDiagnostics::shared();
        let (queue, worker) =
            Worker::spawn(Severity::Error, 4, strategies, diagnostics.clone()).unwrap();

        queue.push("x".to_string()).unwrap();
        queue.push("y".to_string()).unwrap();
        queue.close();
        assert!(worker.join_until(deadline()));

        assert_eq!(*records.lock(), vec!["ok:x", "ok:y"]);
        assert_eq!(queue.metrics().write_failures(), 4);
        let lines = diagnostics.lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("file not defined"));
        assert!(lines[1].contains("sink exploded"));
    }

    #[test]
    fn test_push_after_close_fails() {
        let (queue, worker) =
            Worker::spawn(Severity::Warning, 1, Vec::new(), CollectingDiagnostics::shared())
                .unwrap();
        queue.close();

        let err = queue.push("late".to_string()).unwrap_err();
        assert!(matches!(
            err,
            LoggerError::ChannelClosed {
                severity: Severity::Warning
            }
        ));
        assert!(queue.is_closed());
        assert!(worker.join_until(deadline()));
        assert!(worker.is_finished());
    }

    #[test]
    fn test_close_drains_buffered_records() {
        let records = Arc::new(Mutex::new(Vec::new()));
        let strategies: Vec<Box<dyn Strategy>> = vec![Box::new(Recorder {
            name: "r",
            records: Arc::clone(&records),
        })];
        let (queue, worker) =
            Worker::spawn(Severity::Info, 100, strategies, CollectingDiagnostics::shared())
                .unwrap();

        for i in 0..50 {
            queue.push(i.to_string()).unwrap();
        }
        queue.close();
        assert!(worker.join_until(deadline()));
        assert_eq!(records.lock().len(), 50);
    }

    /// Blocks every write until the gate sender is dropped
    struct Stalled(Receiver<()>);

    impl Strategy for Stalled {
        fn write(&mut self, message: &str) -> Result<usize> {
            let _ = self.0.recv();
            Ok(message.len())
        }

        fn name(&self) -> &str {
            "stalled"
        }
    }

    #[test]
    fn test_close_does_not_wait_for_blocked_producer() {
        let (gate, stalled) = bounded::<()>(0);
        let (queue, worker) = Worker::spawn(
            Severity::Info,
            1,
            vec![Box::new(Stalled(stalled))],
            CollectingDiagnostics::shared(),
        )
        .unwrap();

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..3 {
                    let _ = queue.push(i.to_string());
                }
            })
        };
        // Worker holds one record, the queue one more, the producer waits
        thread::sleep(Duration::from_millis(100));
        assert!(!producer.is_finished());

        let started = Instant::now();
        queue.close();
        assert!(queue.is_closed());
        assert!(!worker.join_until(Instant::now() + Duration::from_millis(100)));
        assert!(started.elapsed() < Duration::from_secs(2));

        drop(gate);
        producer.join().unwrap();
        assert!(worker.join_until(deadline()));
        assert_eq!(queue.metrics().delivered(), 3);
    }

    #[test]
    fn test_failed_send_is_not_counted() {
        let (sender, receiver) = bounded(1);
        drop(receiver);
        let queue = SeverityQueue {
            severity: Severity::Error,
            capacity: 1,
            sender: RwLock::new(Some(sender)),
            metrics: Arc::new(QueueMetrics::new()),
        };

        let err = queue.push("lost".to_string()).unwrap_err();
        assert!(matches!(err, LoggerError::ChannelClosed { .. }));
        assert_eq!(queue.metrics().enqueued(), 0);
        assert_eq!(queue.metrics().pending(), 0);
    }
}
