//! Per-severity queue metrics
//!
//! Counters describing how one severity's queue and worker behave: how much
//! was enqueued, how much the worker finished fanning out, how many strategy
//! writes failed, and how often producers had to wait for capacity.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for one severity queue
///
/// # Example
///
/// ```
/// use alog::QueueMetrics;
///
/// let metrics = QueueMetrics::new();
/// metrics.record_enqueued();
/// metrics.record_delivered();
///
/// assert_eq!(metrics.enqueued(), 1);
/// assert_eq!(metrics.pending(), 0);
/// ```
#[derive(Debug)]
pub struct QueueMetrics {
    /// Records accepted by the queue
    enqueued: AtomicU64,

    /// Records the worker has handed to every strategy
    delivered: AtomicU64,

    /// Individual strategy writes that failed or panicked
    write_failures: AtomicU64,

    /// Enqueues that found the queue full and waited for a slot
    blocked_sends: AtomicU64,
}

impl QueueMetrics {
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            blocked_sends: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Acquire)
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Acquire)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn blocked_sends(&self) -> u64 {
        self.blocked_sends.load(Ordering::Relaxed)
    }

    /// Records accepted but not yet fanned out
    pub fn pending(&self) -> u64 {
        self.enqueued().saturating_sub(self.delivered())
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::AcqRel)
    }

    /// Undo a `record_enqueued` whose record never reached the queue
    #[inline]
    pub(crate) fn rollback_enqueued(&self) -> u64 {
        self.enqueued.fetch_sub(1, Ordering::AcqRel)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::AcqRel)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_blocked(&self) -> u64 {
        self.blocked_sends.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for QueueMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for QueueMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued()),
            delivered: AtomicU64::new(self.delivered()),
            write_failures: AtomicU64::new(self.write_failures()),
            blocked_sends: AtomicU64::new(self.blocked_sends()),
        }
    }
}
