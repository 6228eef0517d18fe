// Statement module - a prepared, bound query and everything that consumes it
//
// - decoder: column-to-field resolution for a single row
// - cursor: the row view handed to decoders and the lazy iterators

mod cursor;
mod decoder;

pub use cursor::{Container, CurrentRow, Records, TypedRows};

use std::cell::{Cell, RefCell};
use std::fmt;
use std::mem::ManuallyDrop;
use std::rc::Rc;

use rusqlite::Connection;

use crate::error::RowMapError;
use crate::record::{DynRecord, FieldSpec, Record};

/// Where a statement is in its single traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementState {
    /// Compiled and bound; no row fetched yet
    Bound,
    /// Positioned on a row
    RowReady,
    /// Traversal finished; prepare again for a fresh one
    Exhausted,
}

struct Shared<'db> {
    conn: &'db Connection,
    columns: Vec<String>,
    parameter_count: usize,
    stmt: RefCell<rusqlite::Statement<'db>>,
    state: Cell<StatementState>,
    rows_seen: Cell<usize>,
}

/// A compiled query with every parameter already bound.
///
/// Clones are handles onto the same statement and share its one cursor: a row
/// stepped through any clone is consumed for all of them. Every consumer
/// continues from the current position, so a `pull` followed by `for_each`
/// visits the rows the pull left behind. The statement is finalized when the
/// last clone drops.
#[derive(Clone)]
pub struct Statement<'db> {
    shared: Rc<Shared<'db>>,
}

impl<'db> Statement<'db> {
    pub(crate) fn new(conn: &'db Connection, stmt: rusqlite::Statement<'db>) -> Self {
        let columns = stmt
            .column_names()
            .into_iter()
            .map(str::to_owned)
            .collect();
        let parameter_count = stmt.parameter_count();
        Self {
            shared: Rc::new(Shared {
                conn,
                columns,
                parameter_count,
                stmt: RefCell::new(stmt),
                state: Cell::new(StatementState::Bound),
                rows_seen: Cell::new(0),
            }),
        }
    }

    #[must_use]
    pub fn state(&self) -> StatementState {
        self.shared.state.get()
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.shared.columns
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.shared.columns.len()
    }

    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.shared.parameter_count
    }

    /// Rows stepped so far, across every clone.
    #[must_use]
    pub fn rows_seen(&self) -> usize {
        self.shared.rows_seen.get()
    }

    /// Number of live handles onto this statement.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.shared)
    }

    /// Step to the next row and hand it to `visit`; `None` once the result set
    /// is exhausted.
    ///
    /// The statement is busy while `visit` runs: stepping it again from inside
    /// the callback fails with `RowMapError::RuntimeError`.
    ///
    /// # Errors
    /// Returns `RowMapError::StepError` if the engine fails while stepping, or
    /// whatever `visit` returns.
    pub fn next_row<T, F>(&self, visit: F) -> Result<Option<T>, RowMapError>
    where
        F: FnOnce(CurrentRow<'_>) -> Result<T, RowMapError>,
    {
        let shared = &*self.shared;
        if shared.state.get() == StatementState::Exhausted {
            return Ok(None);
        }
        let mut stmt = shared.stmt.try_borrow_mut().map_err(|_| {
            RowMapError::RuntimeError("statement is already being stepped".into())
        })?;
        // Rows resets the statement when dropped; keep the engine positioned between steps
        let mut rows = ManuallyDrop::new(stmt.raw_query());
        match rows.next() {
            Ok(Some(row)) => {
                shared.state.set(StatementState::RowReady);
                shared.rows_seen.set(shared.rows_seen.get() + 1);
                visit(CurrentRow::new(row, &shared.columns, shared.conn)).map(Some)
            }
            Ok(None) => {
                shared.state.set(StatementState::Exhausted);
                tracing::debug!(rows = shared.rows_seen.get(), "result set exhausted");
                Ok(None)
            }
            Err(e) => {
                shared.state.set(StatementState::Exhausted);
                Err(RowMapError::StepError(e.to_string()))
            }
        }
    }

    /// Fetch the next row into `record`.
    ///
    /// Successive pulls advance through the result set.
    ///
    /// # Errors
    /// Returns `RowMapError::RuntimeError` if no row is left, or the
    /// step/decode error.
    pub fn pull<R: Record + ?Sized>(&self, record: &mut R) -> Result<(), RowMapError> {
        match self.next_row(|row| row.decode(record))? {
            Some(_) => Ok(()),
            None => Err(RowMapError::RuntimeError(
                "sqlite step did not return a row".into(),
            )),
        }
    }

    /// Fetch the next row projected onto `specs`.
    ///
    /// # Errors
    /// Returns `RowMapError::RuntimeError` if no row is left.
    pub fn pull_typed(&self, specs: &[FieldSpec]) -> Result<DynRecord, RowMapError> {
        let mut record = DynRecord::from_specs(specs);
        self.pull(&mut record)?;
        Ok(record)
    }

    /// Step once and decode into a fresh record built by `fresh`.
    ///
    /// # Errors
    /// Returns `RowMapError` if stepping or decoding fails.
    pub fn next_with<R, F>(&self, fresh: F) -> Result<Option<R>, RowMapError>
    where
        R: Record,
        F: FnOnce() -> R,
    {
        self.next_row(|row| {
            let mut record = fresh();
            row.decode(&mut record)?;
            Ok(record)
        })
    }

    /// Step once and decode into a default-constructed `R`.
    ///
    /// # Errors
    /// Returns `RowMapError` if stepping or decoding fails.
    pub fn next_record<R: Record + Default>(&self) -> Result<Option<R>, RowMapError> {
        self.next_with(R::default)
    }

    /// Decode every remaining row into a fresh `R` and hand it to `consumer`.
    ///
    /// ```rust
    /// use sqlite_rowmap::{Database, record};
    ///
    /// record! {
    ///     #[derive(Debug, Default)]
    ///     struct Pair { a: i32, b: String }
    /// }
    ///
    /// # fn main() -> Result<(), sqlite_rowmap::RowMapError> {
    /// let db = Database::open_in_memory()?;
    /// let stmt = db.prepare("SELECT 1 AS a, 'x' AS b UNION ALL SELECT 2, 'y'", ())?;
    /// let mut seen = Vec::new();
    /// stmt.for_each(|p: Pair| seen.push((p.a, p.b)))?;
    /// assert_eq!(seen, vec![(1, "x".to_string()), (2, "y".to_string())]);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Returns `RowMapError` if stepping or decoding fails; rows before the
    /// failure have already been consumed.
    pub fn for_each<R, F>(&self, mut consumer: F) -> Result<(), RowMapError>
    where
        R: Record + Default,
        F: FnMut(R),
    {
        while let Some(record) = self.next_record::<R>()? {
            consumer(record);
        }
        Ok(())
    }

    /// Like [`for_each`](Self::for_each) but stops at the first consumer error.
    ///
    /// # Errors
    /// Returns the consumer's error, or a step/decode error converted into `E`.
    pub fn try_for_each<R, E, F>(&self, mut consumer: F) -> Result<(), E>
    where
        R: Record + Default,
        E: From<RowMapError>,
        F: FnMut(R) -> Result<(), E>,
    {
        while let Some(record) = self.next_record::<R>()? {
            consumer(record)?;
        }
        Ok(())
    }

    /// Append every remaining row to `container` in engine order.
    ///
    /// # Errors
    /// Returns `RowMapError` if stepping or decoding fails.
    pub fn collect_into<C>(&self, container: &mut C) -> Result<(), RowMapError>
    where
        C: Container + ?Sized,
        C::Item: Record + Default,
    {
        self.for_each(|record: C::Item| container.append(record))
    }

    /// Collect every remaining row into a `Vec<R>`.
    ///
    /// # Errors
    /// Returns `RowMapError` if stepping or decoding fails.
    pub fn collect<R: Record + Default>(&self) -> Result<Vec<R>, RowMapError> {
        let mut out = Vec::new();
        self.collect_into(&mut out)?;
        Ok(out)
    }

    /// Lazy iterator over the remaining rows as `R` values.
    #[must_use]
    pub fn records<R: Record + Default>(&self) -> Records<'db, R> {
        Records::new(self.clone())
    }

    /// Lazy iterator over the remaining rows projected onto the anonymous
    /// shape `specs`.
    ///
    /// Columns not named in `specs` are ignored.
    #[must_use]
    pub fn typed_sequence(&self, specs: &[FieldSpec]) -> TypedRows<'db> {
        TypedRows::new(self.clone(), DynRecord::from_specs(specs))
    }
}

impl fmt::Debug for Statement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sql = self
            .shared
            .stmt
            .try_borrow()
            .ok()
            .and_then(|stmt| stmt.expanded_sql());
        f.debug_struct("Statement")
            .field("sql", &sql)
            .field("state", &self.state())
            .field("rows_seen", &self.rows_seen())
            .field("handles", &self.handle_count())
            .finish()
    }
}
