//! Configuration for csvdb
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{CsvDbError, Result};

/// Configuration for a single connection
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // File Configuration
    // -------------------------------------------------------------------------
    /// Path of the backing CSV file. The file does not need to exist; it is
    /// created by the first mutation.
    pub path: PathBuf,

    /// Field delimiter byte (comma by default)
    pub delimiter: u8,

    // -------------------------------------------------------------------------
    // Write Configuration
    // -------------------------------------------------------------------------
    /// How the full-file rewrite reaches the disk
    pub write_strategy: WriteStrategy,

    /// fsync the file after every persisted write
    pub sync_on_write: bool,
}

/// Write strategy for the full-file rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStrategy {
    /// Truncate the file and write the new contents in place
    Overwrite,

    /// Write `<path>.tmp` next to the file, then rename it over the target
    AtomicRename,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./db.csv"),
            delimiter: b',',
            write_strategy: WriteStrategy::Overwrite,
            sync_on_write: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the config describes a usable file format
    pub fn validate(&self) -> Result<()> {
        match self.delimiter {
            b'"' | b'\n' | b'\r' => Err(CsvDbError::Config(format!(
                "delimiter {:?} is reserved",
                self.delimiter as char
            ))),
            d if !d.is_ascii() => Err(CsvDbError::Config(format!(
                "delimiter must be a single ASCII byte, got 0x{:02x}",
                d
            ))),
            _ => Ok(()),
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set the field delimiter
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// Set the write strategy
    pub fn write_strategy(mut self, strategy: WriteStrategy) -> Self {
        self.config.write_strategy = strategy;
        self
    }

    /// fsync after each write
    pub fn sync_on_write(mut self, sync: bool) -> Self {
        self.config.sync_on_write = sync;
        self
    }

    /// Validate and return the config
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
