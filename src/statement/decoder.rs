use rusqlite::Connection;
use rusqlite::types::ValueRef;

use crate::error::RowMapError;
use crate::record::{Record, ScalarKind, SlotError};

const REAL_AS_TEXT_SQL: &str = "SELECT CAST(?1 AS TEXT)";

/// Text of a REAL value exactly as the engine's text accessor renders it.
fn engine_text(conn: &Connection, value: f64) -> rusqlite::Result<String> {
    conn.prepare_cached(REAL_AS_TEXT_SQL)?
        .query_row([value], |row| row.get(0))
}

/// Decode one engine row into `record` by matching column names to field names.
///
/// Columns are visited in engine order. Each column fills the first field, in
/// declared order, whose name equals the column name and that no earlier
/// column of this row has filled. Columns without such a field are skipped;
/// fields without a column keep their value.
///
/// Returns the number of fields written.
///
/// # Errors
/// Returns `RowMapError::DecodeError` if the engine refuses a column read, or
/// `RowMapError::UnexpectedNull` if a NULL lands in a non-optional field.
pub(crate) fn decode_row<R: Record + ?Sized>(
    conn: &Connection,
    row: &rusqlite::Row<'_>,
    columns: &[String],
    record: &mut R,
) -> Result<usize, RowMapError> {
    let mut fields = record.fields();
    let mut filled = vec![false; fields.len()];
    let mut written = 0;

    for (idx, column) in columns.iter().enumerate() {
        let target =
            (0..fields.len()).find(|&pos| !filled[pos] && fields[pos].name() == column.as_str());
        let Some(pos) = target else {
            tracing::trace!(column = column.as_str(), "no field for column");
            continue;
        };

        let decode_error = |message: String| RowMapError::DecodeError {
            column: column.clone(),
            message,
        };
        let field = &mut fields[pos];
        let kind = field.kind();
        let value = row.get_ref(idx).map_err(|e| decode_error(e.to_string()))?;
        let rendered;
        let value = match value {
            ValueRef::Real(r) if kind == ScalarKind::Text => {
                rendered = engine_text(conn, r).map_err(|e| decode_error(e.to_string()))?;
                ValueRef::Text(rendered.as_bytes())
            }
            other => other,
        };
        field.slot_mut().read(value).map_err(|err| match err {
            SlotError::UnexpectedNull => RowMapError::UnexpectedNull {
                column: column.clone(),
                kind,
            },
        })?;
        filled[pos] = true;
        written += 1;
    }

    Ok(written)
}
