//! Process-wide logger
//!
//! [`LazyLog`] holds a [`Log`] that is built on first access and shared
//! afterwards. Concurrent first accesses run the initializer exactly once;
//! the others wait and observe the same instance. Prefer passing a [`Log`]
//! explicitly; this exists for code that needs a global.

use super::{
    diagnostics::{ConsoleDiagnostics, Diagnostic, DiagnosticSink},
    error::Result,
    fs::OsFs,
    log::Log,
    settings::EnvConfig,
};
use parking_lot::Mutex;
use std::sync::OnceLock;

pub struct LazyLog {
    cell: OnceLock<Log>,
    init_lock: Mutex<()>,
}

impl LazyLog {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            init_lock: parking_lot::const_mutex(()),
        }
    }

    pub fn get(&self) -> Option<&Log> {
        self.cell.get()
    }

    /// Return the instance, building it with `init` if this is the first
    /// successful access. A failed `init` leaves the cell empty.
    pub fn try_get_or_init<F>(&self, init: F) -> Result<&Log>
    where
        F: FnOnce() -> Result<Log>,
    {
        if let Some(log) = self.cell.get() {
            return Ok(log);
        }

        let _guard = self.init_lock.lock();
        if let Some(log) = self.cell.get() {
            return Ok(log);
        }
        let log = init()?;
        Ok(self.cell.get_or_init(|| log))
    }

    /// Like [`try_get_or_init`](Self::try_get_or_init), but a failed
    /// initialization terminates the process: log storage that cannot be
    /// prepared at startup is unrecoverable.
    pub fn get_or_init<F>(&self, init: F) -> &Log
    where
        F: FnOnce() -> Result<Log>,
    {
        match self.try_get_or_init(init) {
            Ok(log) => log,
            Err(e) => {
                ConsoleDiagnostics.report(&Diagnostic::InitFailed {
                    error: e.to_string(),
                });
                std::process::exit(1);
            }
        }
    }
}

impl Default for LazyLog {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: LazyLog = LazyLog::new();

/// The environment-driven process logger.
///
/// On first call loads `.env`, reads `ALOG_LOGGER_INFO`,
/// `ALOG_LOGGER_WARNING` and `ALOG_LOGGER_ERROR` and opens one file per
/// severity, creating directories as needed. Any failure there terminates
/// the process.
pub fn global() -> &'static Log {
    GLOBAL.get_or_init(|| {
        let env = EnvConfig::load()?;
        Log::from_env(&env, &OsFs)
    })
}
