use std::fmt;
use std::str::FromStr;

use crate::error::RowMapError;
use crate::record::ScalarKind;

/// A single query argument.
///
/// Each implementation issues exactly one engine bind call: integers bind as
/// integers, both float widths as doubles, text with its byte length. There
/// is no impl for `Option` or byte blobs, so NULL and blob arguments do not
/// compile.
pub trait BindParam {
    fn kind(&self) -> ScalarKind;

    /// Bind `self` at the 1-based `position`.
    ///
    /// # Errors
    /// Returns the engine error when the bind call fails.
    fn bind_at(&self, stmt: &mut rusqlite::Statement<'_>, position: usize) -> rusqlite::Result<()>;
}

impl BindParam for i32 {
    fn kind(&self) -> ScalarKind {
        ScalarKind::Int
    }

    fn bind_at(&self, stmt: &mut rusqlite::Statement<'_>, position: usize) -> rusqlite::Result<()> {
        stmt.raw_bind_parameter(position, *self)
    }
}

impl BindParam for i64 {
    fn kind(&self) -> ScalarKind {
        ScalarKind::Int64
    }

    fn bind_at(&self, stmt: &mut rusqlite::Statement<'_>, position: usize) -> rusqlite::Result<()> {
        stmt.raw_bind_parameter(position, *self)
    }
}

impl BindParam for f64 {
    fn kind(&self) -> ScalarKind {
        ScalarKind::Double
    }

    fn bind_at(&self, stmt: &mut rusqlite::Statement<'_>, position: usize) -> rusqlite::Result<()> {
        stmt.raw_bind_parameter(position, *self)
    }
}

impl BindParam for f32 {
    fn kind(&self) -> ScalarKind {
        ScalarKind::Float
    }

    fn bind_at(&self, stmt: &mut rusqlite::Statement<'_>, position: usize) -> rusqlite::Result<()> {
        stmt.raw_bind_parameter(position, f64::from(*self))
    }
}

impl BindParam for str {
    fn kind(&self) -> ScalarKind {
        ScalarKind::Text
    }

    fn bind_at(&self, stmt: &mut rusqlite::Statement<'_>, position: usize) -> rusqlite::Result<()> {
        stmt.raw_bind_parameter(position, self)
    }
}

impl BindParam for String {
    fn kind(&self) -> ScalarKind {
        ScalarKind::Text
    }

    fn bind_at(&self, stmt: &mut rusqlite::Statement<'_>, position: usize) -> rusqlite::Result<()> {
        self.as_str().bind_at(stmt, position)
    }
}

impl<T: BindParam + ?Sized> BindParam for &T {
    fn kind(&self) -> ScalarKind {
        (**self).kind()
    }

    fn bind_at(&self, stmt: &mut rusqlite::Statement<'_>, position: usize) -> rusqlite::Result<()> {
        (**self).bind_at(stmt, position)
    }
}

impl<T: BindParam + ?Sized> BindParam for Box<T> {
    fn kind(&self) -> ScalarKind {
        (**self).kind()
    }

    fn bind_at(&self, stmt: &mut rusqlite::Statement<'_>, position: usize) -> rusqlite::Result<()> {
        (**self).bind_at(stmt, position)
    }
}

/// Bind one argument and tag any failure with its position.
pub(crate) fn bind_one<P: BindParam + ?Sized>(
    stmt: &mut rusqlite::Statement<'_>,
    position: usize,
    param: &P,
) -> Result<(), RowMapError> {
    tracing::trace!(position, kind = %param.kind(), "binding parameter");
    param
        .bind_at(stmt, position)
        .map_err(|e| RowMapError::BindError {
            position,
            message: e.to_string(),
        })
}

/// An ordered argument list, bound to positions 1..=N in order.
pub trait BindParams {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bind every argument in declaration order.
    ///
    /// # Errors
    /// Returns `RowMapError::BindError` for the first position the engine rejects.
    fn bind_all(&self, stmt: &mut rusqlite::Statement<'_>) -> Result<(), RowMapError>;
}

impl BindParams for () {
    fn len(&self) -> usize {
        0
    }

    fn bind_all(&self, _stmt: &mut rusqlite::Statement<'_>) -> Result<(), RowMapError> {
        Ok(())
    }
}

impl<T: BindParam> BindParams for [T] {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn bind_all(&self, stmt: &mut rusqlite::Statement<'_>) -> Result<(), RowMapError> {
        for (idx, param) in self.iter().enumerate() {
            bind_one(stmt, idx + 1, param)?;
        }
        Ok(())
    }
}

impl<T: BindParam, const N: usize> BindParams for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn bind_all(&self, stmt: &mut rusqlite::Statement<'_>) -> Result<(), RowMapError> {
        self.as_slice().bind_all(stmt)
    }
}

impl<T: BindParam> BindParams for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn bind_all(&self, stmt: &mut rusqlite::Statement<'_>) -> Result<(), RowMapError> {
        self.as_slice().bind_all(stmt)
    }
}

impl<P: BindParams + ?Sized> BindParams for &P {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn bind_all(&self, stmt: &mut rusqlite::Statement<'_>) -> Result<(), RowMapError> {
        (**self).bind_all(stmt)
    }
}

macro_rules! impl_bind_params_tuple {
    ($count:expr; $($idx:tt $name:ident),+) => {
        impl<$($name: BindParam),+> BindParams for ($($name,)+) {
            fn len(&self) -> usize {
                $count
            }

            fn bind_all(&self, stmt: &mut rusqlite::Statement<'_>) -> Result<(), RowMapError> {
                $(bind_one(stmt, $idx + 1, &self.$idx)?;)+
                Ok(())
            }
        }
    };
}

impl_bind_params_tuple!(1; 0 A);
impl_bind_params_tuple!(2; 0 A, 1 B);
impl_bind_params_tuple!(3; 0 A, 1 B, 2 C);
impl_bind_params_tuple!(4; 0 A, 1 B, 2 C, 3 D);
impl_bind_params_tuple!(5; 0 A, 1 B, 2 C, 3 D, 4 E);
impl_bind_params_tuple!(6; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
impl_bind_params_tuple!(7; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G);
impl_bind_params_tuple!(8; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H);
impl_bind_params_tuple!(9; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I);
impl_bind_params_tuple!(10; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J);
impl_bind_params_tuple!(11; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J, 10 K);
impl_bind_params_tuple!(12; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H, 8 I, 9 J, 10 K, 11 L);

/// A query argument chosen at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Double(f64),
    /// Text/string value
    Text(String),
}

impl BindParam for ParamValue {
    fn kind(&self) -> ScalarKind {
        match self {
            ParamValue::Int(_) => ScalarKind::Int64,
            ParamValue::Double(_) => ScalarKind::Double,
            ParamValue::Text(_) => ScalarKind::Text,
        }
    }

    fn bind_at(&self, stmt: &mut rusqlite::Statement<'_>, position: usize) -> rusqlite::Result<()> {
        match self {
            ParamValue::Int(i) => i.bind_at(stmt, position),
            ParamValue::Double(f) => f.bind_at(stmt, position),
            ParamValue::Text(s) => s.bind_at(stmt, position),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(i) => write!(f, "int:{i}"),
            ParamValue::Double(d) => write!(f, "double:{d}"),
            ParamValue::Text(s) => write!(f, "text:{s}"),
        }
    }
}

impl FromStr for ParamValue {
    type Err = RowMapError;

    /// Parses `int:5`, `double:1.5` or `text:abc`. Without a recognised
    /// prefix the literal is tried as an integer, then a double, then text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((kind, raw)) = s.split_once(':') {
            let parsed = match kind.parse::<ScalarKind>() {
                Ok(ScalarKind::Int | ScalarKind::Int64) => raw
                    .trim()
                    .parse()
                    .map(ParamValue::Int)
                    .map_err(|e| RowMapError::ConfigError(format!("bad int parameter `{raw}`: {e}"))),
                Ok(ScalarKind::Float | ScalarKind::Double) => raw
                    .trim()
                    .parse()
                    .map(ParamValue::Double)
                    .map_err(|e| {
                        RowMapError::ConfigError(format!("bad double parameter `{raw}`: {e}"))
                    }),
                Ok(ScalarKind::Text) => Ok(ParamValue::Text(raw.to_string())),
                Err(_) => Ok(infer_param(s)),
            };
            return parsed;
        }
        Ok(infer_param(s))
    }
}

fn infer_param(s: &str) -> ParamValue {
    if let Ok(i) = s.parse::<i64>() {
        ParamValue::Int(i)
    } else if let Ok(f) = s.parse::<f64>() {
        ParamValue::Double(f)
    } else {
        ParamValue::Text(s.to_string())
    }
}
