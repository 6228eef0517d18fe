use clap::ValueEnum;
use rusqlite::OpenFlags;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::RowMapError;

/// How the database file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpenMode {
    /// Open an existing database without write access
    ReadOnly,
    /// Open an existing database for reading and writing
    ReadWrite,
    /// Open for reading and writing, creating the file when missing
    #[default]
    ReadWriteCreate,
    /// Private in-memory database; the path only names it
    Memory,
}

impl OpenMode {
    /// Engine open flags for this mode.
    #[must_use]
    pub fn flags(self) -> OpenFlags {
        let base = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        match self {
            OpenMode::ReadOnly => base | OpenFlags::SQLITE_OPEN_READ_ONLY,
            OpenMode::ReadWrite => base | OpenFlags::SQLITE_OPEN_READ_WRITE,
            OpenMode::ReadWriteCreate => {
                base | OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
            }
            OpenMode::Memory => {
                base | OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_MEMORY
            }
        }
    }
}

/// Options for opening a [`Database`](crate::Database).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectOptions {
    pub path: String,
    #[serde(default)]
    pub mode: OpenMode,
    #[serde(default)]
    pub busy_timeout_ms: Option<u64>,
}

impl ConnectOptions {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: OpenMode::default(),
            busy_timeout_ms: None,
        }
    }

    /// Parse options from a JSON document such as
    /// `{"path": "app.db", "mode": "read-only", "busy_timeout_ms": 500}`.
    ///
    /// # Errors
    /// Returns `RowMapError::ConfigError` if the document is malformed or the path is empty.
    pub fn from_json(text: &str) -> Result<Self, RowMapError> {
        let opts: ConnectOptions = serde_json::from_str(text)
            .map_err(|e| RowMapError::ConfigError(format!("invalid connect options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Reject options that can never open.
    ///
    /// # Errors
    /// Returns `RowMapError::ConfigError` if the path is empty.
    pub fn validate(&self) -> Result<(), RowMapError> {
        if self.path.is_empty() && self.mode != OpenMode::Memory {
            return Err(RowMapError::ConfigError(
                "database path must not be empty".into(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn busy_timeout(&self) -> Option<Duration> {
        self.busy_timeout_ms.map(Duration::from_millis)
    }
}

/// Fluent builder for [`ConnectOptions`].
#[derive(Debug, Clone)]
pub struct ConnectOptionsBuilder {
    opts: ConnectOptions,
}

impl ConnectOptionsBuilder {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            opts: ConnectOptions::new(path),
        }
    }

    #[must_use]
    pub fn mode(mut self, mode: OpenMode) -> Self {
        self.opts.mode = mode;
        self
    }

    #[must_use]
    pub fn read_only(self) -> Self {
        self.mode(OpenMode::ReadOnly)
    }

    #[must_use]
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.opts.busy_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    #[must_use]
    pub fn finish(self) -> ConnectOptions {
        self.opts
    }

    /// Open a [`Database`](crate::Database) with the collected options.
    ///
    /// # Errors
    /// Returns `RowMapError` if the options are invalid or the open call fails.
    pub fn build(self) -> Result<crate::Database, RowMapError> {
        crate::Database::with_options(&self.finish())
    }
}
