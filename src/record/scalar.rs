use std::fmt;
use std::str::FromStr;

use rusqlite::types::ValueRef;

use crate::error::RowMapError;

/// The fixed set of scalar kinds a record field may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// 32-bit integer
    Int,
    /// 64-bit integer
    Int64,
    /// Single-precision float
    Float,
    /// Double-precision float
    Double,
    /// Owned text
    Text,
}

impl ScalarKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::Int => "int",
            ScalarKind::Int64 => "int64",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::Text => "text",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalarKind {
    type Err = RowMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "i32" | "integer" => Ok(ScalarKind::Int),
            "int64" | "i64" | "bigint" => Ok(ScalarKind::Int64),
            "float" | "f32" => Ok(ScalarKind::Float),
            "double" | "f64" | "real" => Ok(ScalarKind::Double),
            "text" | "string" => Ok(ScalarKind::Text),
            other => Err(RowMapError::ConfigError(format!(
                "unknown scalar kind `{other}`"
            ))),
        }
    }
}

/// Why a slot refused a column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotError {
    /// SQL NULL read into a non-optional slot
    UnexpectedNull,
}

/// A writable scalar destination inside a record.
///
/// The slot's own kind picks the engine accessor; the column's storage class
/// never does.
pub trait Slot {
    fn kind(&self) -> ScalarKind;

    /// Overwrite the slot from one engine value.
    ///
    /// # Errors
    /// Returns `SlotError::UnexpectedNull` when the value is NULL and the slot cannot hold it.
    fn read(&mut self, value: ValueRef<'_>) -> Result<(), SlotError>;
}

/// Scalar types a field may be declared with.
pub trait Scalar: Sized + Default {
    const KIND: ScalarKind;

    /// Read a non-NULL engine value; `None` for NULL.
    fn from_value(value: ValueRef<'_>) -> Option<Self>;
}

impl Scalar for i32 {
    const KIND: ScalarKind = ScalarKind::Int;

    // the int accessor keeps the low 32 bits of the 64-bit value
    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: ValueRef<'_>) -> Option<Self> {
        i64::from_value(value).map(|v| v as i32)
    }
}

impl Scalar for i64 {
    const KIND: ScalarKind = ScalarKind::Int64;

    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: ValueRef<'_>) -> Option<Self> {
        match value {
            ValueRef::Null => None,
            ValueRef::Integer(i) => Some(i),
            ValueRef::Real(f) => Some(f as i64),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                Some(leading_i64(&String::from_utf8_lossy(bytes)))
            }
        }
    }
}

impl Scalar for f64 {
    const KIND: ScalarKind = ScalarKind::Double;

    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: ValueRef<'_>) -> Option<Self> {
        match value {
            ValueRef::Null => None,
            ValueRef::Integer(i) => Some(i as f64),
            ValueRef::Real(f) => Some(f),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                Some(leading_f64(&String::from_utf8_lossy(bytes)))
            }
        }
    }
}

impl Scalar for f32 {
    const KIND: ScalarKind = ScalarKind::Float;

    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: ValueRef<'_>) -> Option<Self> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::Text;

    fn from_value(value: ValueRef<'_>) -> Option<Self> {
        match value {
            ValueRef::Null => None,
            ValueRef::Integer(i) => Some(i.to_string()),
            // rows from a statement reach text slots with REAL already
            // rendered by the engine; this covers values read without one
            ValueRef::Real(f) => Some(format!("{f:?}")),
            // length-based copy: embedded NUL bytes survive
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                Some(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

macro_rules! impl_slot {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Slot for $ty {
                fn kind(&self) -> ScalarKind {
                    <$ty as Scalar>::KIND
                }

                fn read(&mut self, value: ValueRef<'_>) -> Result<(), SlotError> {
                    *self = <$ty as Scalar>::from_value(value).ok_or(SlotError::UnexpectedNull)?;
                    Ok(())
                }
            }

            impl Slot for Option<$ty> {
                fn kind(&self) -> ScalarKind {
                    <$ty as Scalar>::KIND
                }

                fn read(&mut self, value: ValueRef<'_>) -> Result<(), SlotError> {
                    *self = <$ty as Scalar>::from_value(value);
                    Ok(())
                }
            }
        )*
    };
}

impl_slot!(i32, i64, f32, f64, String);

/// Integer prefix of `text` the way the engine's int accessor reads it:
/// leading whitespace, optional sign, digits; anything else stops the scan.
pub(crate) fn leading_i64(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let mut acc: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let d = i64::from(b - b'0');
        acc = if negative {
            acc.saturating_mul(10).saturating_sub(d)
        } else {
            acc.saturating_mul(10).saturating_add(d)
        };
    }
    acc
}

/// Longest numeric prefix of `text` as a double, 0.0 when there is none.
pub(crate) fn leading_f64(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return 0.0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-' | b'+')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }
    trimmed[..end].parse().unwrap_or(0.0)
}
