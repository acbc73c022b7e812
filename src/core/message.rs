//! Record formatting
//!
//! Every record is a single `timestamp;message` line, or
//! `timestamp;file:line;message` when caller capture is enabled. Error
//! records with a stack trace carry the trace after the line, terminated by
//! a `---` delimiter.

use super::timestamp::TimestampFormat;
use chrono::{DateTime, TimeZone};
use std::backtrace::Backtrace;
use std::fmt::Display;
use std::panic::Location;

/// Delimiter line closing a stack trace block
pub const TRACE_DELIMITER: &str = "---";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFormatter {
    pub timestamp_format: TimestampFormat,
    pub include_caller: bool,
}

impl MessageFormatter {
    pub fn new(timestamp_format: TimestampFormat, include_caller: bool) -> Self {
        Self {
            timestamp_format,
            include_caller,
        }
    }

    /// Format one record.
    ///
    /// `caller` is the call site of the public facade method; it is only
    /// written when caller capture is enabled.
    pub fn format<Tz>(&self, time: &DateTime<Tz>, message: &str, caller: &Location<'_>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let timestamp = self.timestamp_format.format(time);
        if self.include_caller {
            format!(
                "{};{}:{};{}\n",
                timestamp,
                caller.file(),
                caller.line(),
                message
            )
        } else {
            format!("{};{}\n", timestamp, message)
        }
    }

    /// Append a stack trace block to an already formatted record
    pub fn with_trace(record: String, trace: &Backtrace) -> String {
        format!("{}\n{}\n{}\n\n", record, trace, TRACE_DELIMITER)
    }
}
