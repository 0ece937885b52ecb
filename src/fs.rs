//! File System Module
//!
//! The raw read/write primitives the store persists through.
//!
//! ## Responsibilities
//! - Report whether a backing file exists
//! - Read a whole file into memory
//! - Replace a whole file with new contents
//!
//! `LocalFs` talks to the real disk. `MemoryFs` keeps files in a shared map
//! and can be told to fail writes, which is how persistence failures are
//! exercised without touching permissions on a real directory.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::config::{Config, WriteStrategy};

/// Whole-file storage used by a connection
pub trait FileSystem: Send + Sync {
    /// True if a file is present and accessible at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Read the entire file
    fn read_all(&self, path: &Path) -> io::Result<Bytes>;

    /// Replace the entire file with `contents`
    fn write_all(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

// =============================================================================
// Local disk
// =============================================================================

/// File system backed by `std::fs`
#[derive(Debug, Clone)]
pub struct LocalFs {
    write_strategy: WriteStrategy,
    sync_on_write: bool,
}

impl LocalFs {
    /// Create with an explicit strategy
    pub fn new(write_strategy: WriteStrategy, sync_on_write: bool) -> Self {
        Self {
            write_strategy,
            sync_on_write,
        }
    }

    /// Take the write settings from a connection config
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.write_strategy, config.sync_on_write)
    }

    /// Sibling path used by `WriteStrategy::AtomicRename`: `<path>.tmp`
    pub fn temp_path(path: &Path) -> PathBuf {
        let mut name = OsString::from(path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        file.write_all(contents)?;
        file.flush()?;

        if self.sync_on_write {
            file.sync_all()?;
        }

        Ok(())
    }
}

impl Default for LocalFs {
    fn default() -> Self {
        Self::new(WriteStrategy::Overwrite, false)
    }
}

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_all(&self, path: &Path) -> io::Result<Bytes> {
        fs::read(path).map(Bytes::from)
    }

    fn write_all(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        match self.write_strategy {
            WriteStrategy::Overwrite => self.write_file(path, contents),
            WriteStrategy::AtomicRename => {
                // Rename is atomic on POSIX; on a crash the old file stays intact
                let tmp_path = Self::temp_path(path);
                if let Err(e) = self.write_file(&tmp_path, contents) {
                    let _ = fs::remove_file(&tmp_path);
                    return Err(e);
                }
                fs::rename(&tmp_path, path)
            }
        }
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// In-memory file system
///
/// Cloning shares the underlying files, so a test can keep a handle while a
/// connection owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    inner: Arc<MemoryFsInner>,
}

#[derive(Debug, Default)]
struct MemoryFsInner {
    files: RwLock<HashMap<PathBuf, Bytes>>,
    fail_writes: AtomicBool,
    write_count: AtomicU64,
}

impl MemoryFs {
    /// Create an empty file system
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: seed a file
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<Bytes>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Create or replace a file without counting it as a write
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<Bytes>) {
        self.inner.files.write().insert(path.into(), contents.into());
    }

    /// Current contents of a file
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Bytes> {
        self.inner.files.read().get(path.as_ref()).cloned()
    }

    /// Make every subsequent `write_all` fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `write_all` calls
    pub fn write_count(&self) -> u64 {
        self.inner.write_count.load(Ordering::SeqCst)
    }
}

impl FileSystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.inner.files.read().contains_key(path)
    }

    fn read_all(&self, path: &Path) -> io::Result<Bytes> {
        self.contents(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )
        })
    }

    fn write_all(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("write to {} refused", path.display()),
            ));
        }

        self.insert(path, Bytes::copy_from_slice(contents));
        self.inner.write_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
