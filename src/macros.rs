//! Logging macros for ergonomic message formatting.
//!
//! These macros format their arguments like `format!` and record the result
//! through a [`Log`](crate::Log). The caller location written into records is
//! the macro call site.
//!
//! # Examples
//!
//! ```
//! use alog::prelude::*;
//! use alog::{info, warning};
//!
//! let log = Log::console(100).unwrap();
//!
//! info!(log, "Server started");
//!
//! let port = 8080;
//! info!(log, "Server listening on port {}", port);
//! warning!(log, "{} connections pending", 12);
//! ```

/// Record a formatted informational message.
///
/// # Examples
///
/// ```
/// # use alog::prelude::*;
/// # let log = Log::console(10).unwrap();
/// use alog::info;
/// info!(log, "Application started");
/// info!(log, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($log:expr, $($arg:tt)+) => {
        $log.infof(format_args!($($arg)+))
    };
}

/// Record a formatted warning.
///
/// # Examples
///
/// ```
/// # use alog::prelude::*;
/// # let log = Log::console(10).unwrap();
/// use alog::warning;
/// warning!(log, "Low disk space");
/// warning!(log, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($log:expr, $($arg:tt)+) => {
        $log.warning(format!($($arg)+))
    };
}

/// Record a formatted error message.
///
/// # Examples
///
/// ```
/// # use alog::prelude::*;
/// # let log = Log::console(10).unwrap();
/// use alog::error;
/// error!(log, "Failed to connect to database");
/// error!(log, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($log:expr, $($arg:tt)+) => {
        $log.error(Some(format!($($arg)+).as_str()))
    };
}
