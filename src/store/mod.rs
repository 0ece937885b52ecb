//! Store Module
//!
//! The row store: an in-memory row set bound to one CSV file.
//!
//! ## Responsibilities
//! - Load the file on open (missing or broken file → empty set)
//! - Equality-based lookup and predicate queries by linear scan
//! - Create / update / upsert, each followed by a full-file rewrite
//! - Roll the in-memory set back when the rewrite fails
//!
//! ## Mutation Cycle
//! ```text
//!   lock rows ──► check (duplicate / not found) ──► modify in place
//!                                                        │
//!        unlock ◄── keep change ◄── ok ── encode + write ┤
//!                                                        │
//!        unlock ◄── undo change ◄── err ─────────────────┘
//! ```

mod connection;

pub use connection::Connection;
