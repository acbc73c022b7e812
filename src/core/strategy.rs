//! Strategy trait for log output destinations

use super::error::Result;

/// A sink that persists or delivers formatted records.
///
/// Strategies are owned by exactly one severity worker and receive the
/// fully formatted record, trailing newline included. A failed write is
/// reported to the diagnostics sink by the worker; it never reaches the
/// code that emitted the record.
pub trait Strategy: Send {
    /// Write one record, returning the number of bytes handed to the sink
    fn write(&mut self, message: &str) -> Result<usize>;

    fn name(&self) -> &str;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn write(&mut self, message: &str) -> Result<usize> {
        (**self).write(message)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
