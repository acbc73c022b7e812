//! Filesystem access used to prepare and open log files
//!
//! [`OsFs`] talks to the real filesystem. [`MemoryFs`] keeps everything in
//! memory so directory preparation and file output can be observed in tests.

use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Permission bits for created directories and log files
pub const FILE_PERMISSION: u32 = 0o755;

/// Handle to a log file opened for appending
pub type LogFile = Box<dyn Write + Send>;

pub trait Filesystem: Send + Sync {
    /// Whether `path` exists; `Err` for anything other than "not found"
    fn stat(&self, path: &Path) -> io::Result<bool>;

    /// Create `path` together with all missing parents
    fn mkdir_all(&self, path: &Path) -> io::Result<()>;

    /// Open `path` create-or-append, write-only, never truncating
    fn open_append(&self, path: &Path) -> io::Result<LogFile>;
}

impl<F: Filesystem + ?Sized> Filesystem for Arc<F> {
    fn stat(&self, path: &Path) -> io::Result<bool> {
        (**self).stat(path)
    }

    fn mkdir_all(&self, path: &Path) -> io::Result<()> {
        (**self).mkdir_all(path)
    }

    fn open_append(&self, path: &Path) -> io::Result<LogFile> {
        (**self).open_append(path)
    }
}

/// Make sure the directory containing `file_path` exists.
pub fn prepare_directory(fs: &dyn Filesystem, file_path: &Path) -> io::Result<()> {
    if file_path.as_os_str().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "can't create directory",
        ));
    }
    let dir = match file_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        // Bare file name, lives in the working directory
        _ => return Ok(()),
    };
    if fs.stat(dir)? {
        return Ok(());
    }
    fs.mkdir_all(dir)
}

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl Filesystem for OsFs {
    fn stat(&self, path: &Path) -> io::Result<bool> {
        match std::fs::metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn mkdir_all(&self, path: &Path) -> io::Result<()> {
        let mut builder = std::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(FILE_PERMISSION);
        }
        builder.create(path)
    }

    fn open_append(&self, path: &Path) -> io::Result<LogFile> {
        let mut options = std::fs::OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(FILE_PERMISSION);
        }
        Ok(Box::new(options.open(path)?))
    }
}

/// In-memory filesystem
///
/// ```
/// use alog::core::fs::{Filesystem, MemoryFs};
/// use std::path::Path;
///
/// let fs = MemoryFs::new();
/// fs.mkdir_all(Path::new("/logs")).unwrap();
/// assert!(fs.stat(Path::new("/logs")).unwrap());
/// ```
#[derive(Debug, Default)]
pub struct MemoryFs {
    dirs: Mutex<BTreeSet<PathBuf>>,
    files: Mutex<BTreeMap<PathBuf, Arc<Mutex<Vec<u8>>>>>,
    mkdir_calls: AtomicUsize,
    fail_mkdir: AtomicBool,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Make every following `mkdir_all` fail with permission denied
    pub fn fail_mkdir(&self, fail: bool) {
        self.fail_mkdir.store(fail, Ordering::SeqCst);
    }

    /// Number of `mkdir_all` calls so far, failed ones included
    pub fn mkdir_calls(&self) -> usize {
        self.mkdir_calls.load(Ordering::SeqCst)
    }

    /// Current contents of a file, if it was ever opened
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        let files = self.files.lock();
        let data = files.get(&normalize(path.as_ref()))?;
        let text = String::from_utf8_lossy(&data.lock()).into_owned();
        Some(text)
    }

    fn has_dir(&self, path: &Path) -> bool {
        path.parent().is_none() || self.dirs.lock().contains(path)
    }
}

impl Filesystem for MemoryFs {
    fn stat(&self, path: &Path) -> io::Result<bool> {
        let path = normalize(path);
        Ok(self.has_dir(&path) || self.files.lock().contains_key(&path))
    }

    fn mkdir_all(&self, path: &Path) -> io::Result<()> {
        self.mkdir_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mkdir.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }
        let mut dirs = self.dirs.lock();
        for ancestor in normalize(path).ancestors() {
            if ancestor.parent().is_some() {
                dirs.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }

    fn open_append(&self, path: &Path) -> io::Result<LogFile> {
        let path = normalize(path);
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !self.has_dir(dir) {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{}: no such directory", dir.display()),
                ));
            }
        }
        let data = Arc::clone(self.files.lock().entry(path).or_default());
        Ok(Box::new(MemoryFile { data }))
    }
}

struct MemoryFile {
    data: Arc<Mutex<Vec<u8>>>,
}

impl Write for MemoryFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
