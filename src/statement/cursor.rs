use std::collections::VecDeque;
use std::marker::PhantomData;

use rusqlite::Connection;

use crate::error::RowMapError;
use crate::record::{DynRecord, Record};

use super::Statement;
use super::decoder::decode_row;

/// A growable destination for decoded records.
pub trait Container {
    type Item;

    fn append(&mut self, item: Self::Item);
}

impl<T> Container for Vec<T> {
    type Item = T;

    fn append(&mut self, item: T) {
        self.push(item);
    }
}

impl<T> Container for VecDeque<T> {
    type Item = T;

    fn append(&mut self, item: T) {
        self.push_back(item);
    }
}

/// The row the statement is positioned on.
pub struct CurrentRow<'r> {
    row: &'r rusqlite::Row<'r>,
    columns: &'r [String],
    conn: &'r Connection,
}

impl<'r> CurrentRow<'r> {
    pub(crate) fn new(row: &'r rusqlite::Row<'r>, columns: &'r [String], conn: &'r Connection) -> Self {
        Self { row, columns, conn }
    }

    /// Decode this row into `record`; returns the number of fields written.
    ///
    /// May be called more than once on the same row.
    ///
    /// # Errors
    /// Returns `RowMapError` if a column cannot be read into its field.
    pub fn decode<R: Record + ?Sized>(&self, record: &mut R) -> Result<usize, RowMapError> {
        decode_row(self.conn, self.row, self.columns, record)
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        self.columns
    }
}

/// Iterator returned by [`Statement::records`].
///
/// Holds a handle onto the statement, so it advances the same cursor as every
/// other clone. Fused after the first error.
pub struct Records<'db, R> {
    stmt: Statement<'db>,
    failed: bool,
    _record: PhantomData<fn() -> R>,
}

impl<'db, R> Records<'db, R> {
    pub(crate) fn new(stmt: Statement<'db>) -> Self {
        Self {
            stmt,
            failed: false,
            _record: PhantomData,
        }
    }
}

impl<R: Record + Default> Iterator for Records<'_, R> {
    type Item = Result<R, RowMapError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let next = self.stmt.next_record::<R>();
        self.failed = next.is_err();
        next.transpose()
    }
}

/// Iterator returned by [`Statement::typed_sequence`].
///
/// Each row starts from a copy of the shape's zero values.
pub struct TypedRows<'db> {
    stmt: Statement<'db>,
    template: DynRecord,
    failed: bool,
}

impl<'db> TypedRows<'db> {
    pub(crate) fn new(stmt: Statement<'db>, template: DynRecord) -> Self {
        Self {
            stmt,
            template,
            failed: false,
        }
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        self.stmt.column_names()
    }

    /// Run `consumer` on every projected row.
    ///
    /// # Errors
    /// Returns `RowMapError` if stepping or decoding fails.
    pub fn for_each_row<F: FnMut(DynRecord)>(mut self, mut consumer: F) -> Result<(), RowMapError> {
        for record in &mut self {
            consumer(record?);
        }
        Ok(())
    }
}

impl Iterator for TypedRows<'_> {
    type Item = Result<DynRecord, RowMapError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let template = &self.template;
        let next = self.stmt.next_with(|| template.clone());
        self.failed = next.is_err();
        next.transpose()
    }
}
