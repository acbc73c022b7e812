//! First field of every record
//!
//! Records are stamped in local time when they are formatted, before they
//! enter the queue. [`TimestampFormat`] decides how that instant is printed.

use crate::core::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Write};

/// How the record timestamp is rendered
///
/// ```
/// use alog::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::Rfc3339.format(&at), "2025-01-08T10:30:45Z");
/// assert_eq!(TimestampFormat::Unix.format(&at), "1736332245");
/// ```
///
/// In JSON settings the variants are written in snake case
/// (`"rfc3339_nano"`, `"unix_millis"`, `{"custom": "%H:%M:%S"}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// RFC 3339 keeping every significant sub-second digit
    #[default]
    Rfc3339Nano,
    /// RFC 3339 truncated to whole seconds
    Rfc3339,
    /// RFC 3339 with exactly three sub-second digits
    Iso8601Millis,
    /// Seconds since the epoch
    Unix,
    /// Milliseconds since the epoch
    UnixMillis,
    /// chrono strftime pattern
    Custom(String),
}

impl TimestampFormat {
    /// Reject custom patterns chrono cannot parse
    ///
    /// ```
    /// use alog::TimestampFormat;
    ///
    /// assert!(TimestampFormat::Custom("%H:%M:%S".to_string()).validate().is_ok());
    /// assert!(TimestampFormat::Custom("%Q".to_string()).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        let Self::Custom(pattern) = self else {
            return Ok(());
        };
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(LoggerError::config(
                "time format",
                format!("invalid strftime pattern {:?}", pattern),
            ));
        }
        Ok(())
    }

    /// Render `at`; an unusable custom pattern falls back to RFC 3339
    #[must_use]
    pub fn format<Tz>(&self, at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let rfc3339 = |precision| at.to_rfc3339_opts(precision, true);
        match self {
            Self::Rfc3339Nano => rfc3339(SecondsFormat::AutoSi),
            Self::Rfc3339 => rfc3339(SecondsFormat::Secs),
            Self::Iso8601Millis => rfc3339(SecondsFormat::Millis),
            Self::Unix => at.timestamp().to_string(),
            Self::UnixMillis => at.timestamp_millis().to_string(),
            Self::Custom(pattern) => {
                let mut out = String::new();
                if write!(out, "{}", at.format(pattern)).is_err() {
                    return rfc3339(SecondsFormat::AutoSi);
                }
                out
            }
        }
    }
}
