use std::fmt;
use std::path::Path;
use std::rc::Rc;

use rusqlite::{Connection, OpenFlags};

use crate::config::{ConnectOptions, ConnectOptionsBuilder, OpenMode};
use crate::error::RowMapError;
use crate::params::BindParams;
use crate::statement::Statement;

/// Handle owning one SQLite connection.
///
/// Clones share the connection; it closes when the last clone drops. The
/// handle is single-threaded: it is neither `Send` nor `Sync`.
#[derive(Clone, Default)]
pub struct Database {
    conn: Option<Rc<Connection>>,
    path: Option<String>,
}

impl Database {
    /// An unconnected handle; call [`connect`](Self::connect) before preparing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder(path: impl Into<String>) -> ConnectOptionsBuilder {
        ConnectOptionsBuilder::new(path)
    }

    /// Open `path` for reading and writing, creating it when missing.
    ///
    /// # Errors
    /// Returns `RowMapError::ConnectionError` if the engine cannot open the file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RowMapError> {
        let mut db = Self::new();
        db.connect(path, OpenMode::ReadWriteCreate.flags())?;
        Ok(db)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns `RowMapError::ConnectionError` if the engine cannot open it.
    pub fn open_in_memory() -> Result<Self, RowMapError> {
        let mut db = Self::new();
        db.connect(":memory:", OpenMode::Memory.flags())?;
        Ok(db)
    }

    /// Open a database described by `opts`.
    ///
    /// # Errors
    /// Returns `RowMapError::ConfigError` for invalid options, or
    /// `RowMapError::ConnectionError` if the open call fails.
    pub fn with_options(opts: &ConnectOptions) -> Result<Self, RowMapError> {
        opts.validate()?;
        let mut db = Self::new();
        db.connect(&opts.path, opts.mode.flags())?;
        if let Some(timeout) = opts.busy_timeout() {
            db.connection()?
                .busy_timeout(timeout)
                .map_err(|e| RowMapError::ConfigError(format!("cannot set busy timeout: {e}")))?;
        }
        Ok(db)
    }

    /// Open `path` with `flags`, replacing any connection this handle held.
    ///
    /// Other clones keep the previous connection alive until they drop.
    ///
    /// # Errors
    /// Returns `RowMapError::ConnectionError` carrying the engine diagnostic.
    pub fn connect(&mut self, path: impl AsRef<Path>, flags: OpenFlags) -> Result<(), RowMapError> {
        let path = path.as_ref();
        let shown = path.to_string_lossy().into_owned();
        let conn = Connection::open_with_flags(path, flags).map_err(|e| {
            RowMapError::ConnectionError {
                path: shown.clone(),
                message: e.to_string(),
            }
        })?;
        tracing::debug!(path = %shown, ?flags, "opened sqlite connection");
        self.conn = Some(Rc::new(conn));
        self.path = Some(shown);
        Ok(())
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Path this handle was connected with.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Number of live handles sharing this connection (0 when unconnected).
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.conn.as_ref().map_or(0, Rc::strong_count)
    }

    fn connection(&self) -> Result<&Connection, RowMapError> {
        self.conn.as_deref().ok_or(RowMapError::NotConnected)
    }

    /// Compile `sql` and bind `params` to positions 1..=N in order.
    ///
    /// Nothing is executed until the returned statement is stepped.
    ///
    /// ```rust
    /// use sqlite_rowmap::Database;
    ///
    /// # fn main() -> Result<(), sqlite_rowmap::RowMapError> {
    /// let db = Database::open_in_memory()?;
    /// let stmt = db.prepare("SELECT ?1 + ?2 AS total, ?3 AS label", (40, 2, "answer"))?;
    /// assert_eq!(stmt.column_names(), ["total", "label"]);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Returns `RowMapError::PrepareError` if compilation fails, or
    /// `RowMapError::BindError` naming the first rejected position.
    pub fn prepare<P: BindParams>(&self, sql: &str, params: P) -> Result<Statement<'_>, RowMapError> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| RowMapError::PrepareError(e.to_string()))?;
        params.bind_all(&mut stmt)?;
        tracing::debug!(sql, params = params.len(), "prepared statement");
        Ok(Statement::new(conn, stmt))
    }

    /// Run one statement that returns no rows and report the changed row count.
    ///
    /// # Errors
    /// Returns the prepare/bind error, or `RowMapError::ExecutionError` if the
    /// statement fails or yields rows.
    pub fn execute<P: BindParams>(&self, sql: &str, params: P) -> Result<usize, RowMapError> {
        let conn = self.connection()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| RowMapError::PrepareError(e.to_string()))?;
        params.bind_all(&mut stmt)?;
        let changed = stmt
            .raw_execute()
            .map_err(|e| RowMapError::ExecutionError(e.to_string()))?;
        tracing::debug!(sql, changed, "executed statement");
        Ok(changed)
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path)
            .field("handles", &self.handle_count())
            .finish()
    }
}
