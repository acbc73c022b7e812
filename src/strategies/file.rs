//! File strategy implementation

use crate::core::diagnostics::{ConsoleDiagnostics, Diagnostic, DiagnosticSink};
use crate::core::fs::{prepare_directory, Filesystem, LogFile, OsFs};
use crate::core::{LoggerError, Result, Strategy};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends records to a file opened create-or-append.
///
/// The containing directory is created when missing. A strategy whose file
/// could not be opened stays usable but fails every write with
/// [`LoggerError::FileNotDefined`] without touching the filesystem.
pub struct FileStrategy {
    path: PathBuf,
    file: Option<LogFile>,
}

impl FileStrategy {
    /// Open `path` on the real filesystem, degrading on failure
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::open_with(&OsFs, path)
    }

    /// Open `path` on `fs`, degrading on failure.
    ///
    /// The failure is printed on stderr once; afterwards every write
    /// reports "file not defined".
    pub fn open_with(fs: &dyn Filesystem, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::try_open(fs, &path) {
            Ok(strategy) => strategy,
            Err(e) => {
                ConsoleDiagnostics.report(&Diagnostic::FileUnavailable {
                    path: path.clone(),
                    error: e.to_string(),
                });
                Self::unavailable(path)
            }
        }
    }

    /// Prepare the directory and open `path`, returning the failure
    pub fn try_open(fs: &dyn Filesystem, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        prepare_directory(fs, path)
            .map_err(|e| LoggerError::directory(path, e.to_string()))?;
        let file = fs
            .open_append(path)
            .map_err(|e| LoggerError::file_io("opening", path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
        })
    }

    /// A strategy without a backing file
    pub fn unavailable(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_available(&self) -> bool {
        self.file.is_some()
    }
}

impl Strategy for FileStrategy {
    fn write(&mut self, message: &str) -> Result<usize> {
        let file = self.file.as_mut().ok_or_else(LoggerError::file_not_defined)?;

        file.write_all(message.as_bytes())
            .map_err(|e| LoggerError::file_io("writing", &self.path, e))?;
        Ok(message.len())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileStrategy {
    fn drop(&mut self) {
        if let Some(ref mut file) = self.file {
            let _ = file.flush();
        }
    }
}
