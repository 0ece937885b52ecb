//! Connection
//!
//! Owns the in-memory row set for one backing file and runs every mutation
//! as a read-modify-persist cycle.

use std::path::Path;

use parking_lot::Mutex;

use crate::codec::{decode_rows, encode_rows};
use crate::config::Config;
use crate::error::{CsvDbError, Result};
use crate::fs::{FileSystem, LocalFs};
use crate::row::Row;

/// A connection to a CSV file
///
/// ## Concurrency Model
///
/// - The row set sits behind a single `Mutex`
/// - Mutations hold it across the whole cycle: inspect → modify → encode →
///   write. Two mutations never interleave, so no update is lost even when
///   the connection is shared between threads (`Arc<Connection>`)
/// - Reads take the lock briefly and hand back owned snapshots
/// - Nothing coordinates with other connections or processes on the same
///   file; keep one connection per path
///
/// Predicates passed to `find` and `create_or_update` run with the lock held
/// and must not call back into the same connection.
///
/// ## Cost
///
/// Every mutation re-encodes and rewrites the entire file, O(total rows).
/// This is the main scalability limit: the store suits small files only.
pub struct Connection<F: FileSystem = LocalFs> {
    /// Connection configuration (path, delimiter, write settings)
    config: Config,

    /// Where the file lives
    fs: F,

    /// The row set, in insertion order
    rows: Mutex<Vec<Row>>,
}

impl Connection<LocalFs> {
    /// Open a connection on the local disk
    ///
    /// A missing, unreadable or malformed file yields an empty row set; the
    /// file is (re)written by the first mutation.
    pub fn open(config: Config) -> Result<Self> {
        let fs = LocalFs::from_config(&config);
        Self::open_with(config, fs)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified file path
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Config::default();
        config.path = path.as_ref().to_path_buf();
        Self::open(config)
    }
}

impl<F: FileSystem> Connection<F> {
    /// Open a connection on any file system
    ///
    /// Only an invalid config is reported; load failures are logged and
    /// treated as "no data yet".
    pub fn open_with(config: Config, fs: F) -> Result<Self> {
        config.validate()?;

        let rows = Self::load(&config, &fs);
        tracing::debug!(
            "Opened {} with {} rows",
            config.path.display(),
            rows.len()
        );

        Ok(Self {
            config,
            fs,
            rows: Mutex::new(rows),
        })
    }

    /// Read and decode the backing file, falling back to an empty row set
    fn load(config: &Config, fs: &F) -> Vec<Row> {
        if !fs.exists(&config.path) {
            tracing::debug!("{} does not exist yet", config.path.display());
            return Vec::new();
        }

        let loaded = fs
            .read_all(&config.path)
            .map_err(CsvDbError::from)
            .and_then(|bytes| decode_rows(&bytes, config.delimiter));

        match loaded {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(
                    "Could not load {}, starting empty: {}",
                    config.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Copy of all rows, in order
    pub fn rows(&self) -> Vec<Row> {
        self.rows.lock().clone()
    }

    /// Copy of every row matching `predicate`, in order
    pub fn find<P>(&self, mut predicate: P) -> Vec<Row>
    where
        P: FnMut(&Row) -> bool,
    {
        self.rows
            .lock()
            .iter()
            .filter(|row| predicate(*row))
            .cloned()
            .collect()
    }

    /// True if a structurally equal row is present
    pub fn exists(&self, row: &Row) -> bool {
        self.rows.lock().contains(row)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append a row and persist
    ///
    /// Fails with `EmptyRow` for a row without fields and `DuplicateRow` if
    /// an equal row already exists. On a write failure the row is not kept.
    pub fn create(&self, row: Row) -> Result<()> {
        let mut rows = self.rows.lock();
        self.create_locked(&mut rows, row)
    }

    /// Replace the first row equal to `row` with `new_row` and persist
    ///
    /// The replacement keeps the original position. Fails with `RowNotFound`
    /// if no equal row exists and `EmptyRow` if `new_row` has no fields.
    pub fn update(&self, row: &Row, new_row: Row) -> Result<()> {
        let mut rows = self.rows.lock();
        let index = rows
            .iter()
            .position(|r| r == row)
            .ok_or(CsvDbError::RowNotFound)?;
        self.replace_locked(&mut rows, index, new_row)
    }

    /// Update the first row matching `predicate`, or create `new_row`
    ///
    /// Only the "nothing matched" case turns into a create. Write failures,
    /// and `DuplicateRow` from the create branch, are returned as-is.
    pub fn create_or_update<P>(&self, mut predicate: P, new_row: Row) -> Result<()>
    where
        P: FnMut(&Row) -> bool,
    {
        let mut rows = self.rows.lock();
        match rows.iter().position(|row| predicate(row)) {
            Some(index) => self.replace_locked(&mut rows, index, new_row),
            None => {
                tracing::debug!("No row matched, creating {}", new_row);
                self.create_locked(&mut rows, new_row)
            }
        }
    }

    /// Rewrite the backing file from the current row set
    ///
    /// Mutations already do this; call it to materialize the file explicitly.
    pub fn save(&self) -> Result<()> {
        let rows = self.rows.lock();
        self.persist(&rows)
    }

    // =========================================================================
    // Internal (called with the row lock held)
    //
    // The change is applied in place, then undone if the write fails.
    // =========================================================================

    fn create_locked(&self, rows: &mut Vec<Row>, row: Row) -> Result<()> {
        if row.is_empty() {
            return Err(CsvDbError::EmptyRow);
        }
        if rows.contains(&row) {
            return Err(CsvDbError::DuplicateRow);
        }

        rows.push(row);
        if let Err(e) = self.persist(rows) {
            rows.pop();
            return Err(e);
        }

        Ok(())
    }

    fn replace_locked(&self, rows: &mut [Row], index: usize, new_row: Row) -> Result<()> {
        if new_row.is_empty() {
            return Err(CsvDbError::EmptyRow);
        }

        let old_row = std::mem::replace(&mut rows[index], new_row);
        if let Err(e) = self.persist(rows) {
            rows[index] = old_row;
            return Err(e);
        }

        Ok(())
    }

    /// Encode all rows and replace the file
    fn persist(&self, rows: &[Row]) -> Result<()> {
        let contents = encode_rows(rows, self.config.delimiter)?;
        self.fs.write_all(&self.config.path, &contents)?;

        tracing::trace!(
            "Wrote {} rows ({} bytes) to {}",
            rows.len(),
            contents.len(),
            self.config.path.display()
        );
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    /// True if there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The file system this connection writes through
    pub fn file_system(&self) -> &F {
        &self.fs
    }
}
