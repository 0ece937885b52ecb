//! # csvdb
//!
//! A tiny row store backed by a single CSV file:
//! - Rows are ordered string maps compared by value, not position
//! - Queries are linear scans over an in-memory row set
//! - Every mutation rewrites the whole file, so memory and disk always agree
//! - A failed write leaves the in-memory rows untouched
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Connection                            │
//! │     rows / find / exists / create / update / upsert          │
//! │                  (Mutex<Vec<Row>>)                           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ open: decode      mutate: encode
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Codec    │          │ FileSystem  │
//!   │ (CSV text)  │          │ (whole file)│
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use csvdb::{Connection, Row};
//!
//! # fn main() -> csvdb::Result<()> {
//! let db = Connection::open_path("./db.csv")?;
//! db.create(Row::from([("id", "1"), ("foo", "bar")]))?;
//! db.create_or_update(|r| r.get("id") == Some("2"), Row::from([("id", "2"), ("foo", "baz")]))?;
//! assert_eq!(db.find(|r| r.get("foo") == Some("bar")).len(), 1);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod row;
pub mod codec;
pub mod fs;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CsvDbError, Result};
pub use config::{Config, WriteStrategy};
pub use row::Row;
pub use fs::{FileSystem, LocalFs, MemoryFs};
pub use store::Connection;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of csvdb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
