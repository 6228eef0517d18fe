use std::str::FromStr;

use rusqlite::types::ValueRef;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::scalar::{Scalar, ScalarKind, Slot, SlotError};
use super::{Field, Record};
use crate::error::RowMapError;

/// A `(name, kind)` witness describing one field of an anonymous row shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    pub name: String,
    pub kind: ScalarKind,
}

impl FieldSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Witness for a field declared with the Rust type `T`.
    #[must_use]
    pub fn of<T: Scalar>(name: impl Into<String>) -> Self {
        Self::new(name, T::KIND)
    }
}

impl FromStr for FieldSpec {
    type Err = RowMapError;

    /// Parses `name:kind`; a bare `name` is a text field.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, kind) = match s.split_once(':') {
            Some((name, kind)) => (name.trim(), kind.parse()?),
            None => (s.trim(), ScalarKind::Text),
        };
        if name.is_empty() {
            return Err(RowMapError::ConfigError(format!(
                "field spec `{s}` has an empty name"
            )));
        }
        Ok(Self::new(name, kind))
    }
}

/// Value held by one field of a [`DynRecord`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Int(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    Text(String),
}

impl ScalarValue {
    /// Zero value of `kind`.
    #[must_use]
    pub fn zero(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Int => ScalarValue::Int(0),
            ScalarKind::Int64 => ScalarValue::Int64(0),
            ScalarKind::Float => ScalarValue::Float(0.0),
            ScalarKind::Double => ScalarValue::Double(0.0),
            ScalarKind::Text => ScalarValue::Text(String::new()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ScalarKind {
        match self {
            ScalarValue::Int(_) => ScalarKind::Int,
            ScalarValue::Int64(_) => ScalarKind::Int64,
            ScalarValue::Float(_) => ScalarKind::Float,
            ScalarValue::Double(_) => ScalarKind::Double,
            ScalarValue::Text(_) => ScalarKind::Text,
        }
    }

    fn decode(kind: ScalarKind, value: ValueRef<'_>) -> Option<Self> {
        match kind {
            ScalarKind::Int => i32::from_value(value).map(ScalarValue::Int),
            ScalarKind::Int64 => i64::from_value(value).map(ScalarValue::Int64),
            ScalarKind::Float => f32::from_value(value).map(ScalarValue::Float),
            ScalarKind::Double => f64::from_value(value).map(ScalarValue::Double),
            ScalarKind::Text => String::from_value(value).map(ScalarValue::Text),
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScalarValue::Int(v) => Some(i64::from(*v)),
            ScalarValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Float(v) => Some(f64::from(*v)),
            ScalarValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let ScalarValue::Text(s) = self {
            Some(s)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct DynSlot {
    kind: ScalarKind,
    value: Option<ScalarValue>,
}

impl Slot for DynSlot {
    fn kind(&self) -> ScalarKind {
        self.kind
    }

    fn read(&mut self, value: ValueRef<'_>) -> Result<(), SlotError> {
        self.value = ScalarValue::decode(self.kind, value);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct DynField {
    name: String,
    slot: DynSlot,
}

/// A record whose shape is chosen at runtime from [`FieldSpec`] witnesses.
///
/// Fields start at the zero value of their kind and become `None` when a
/// NULL column is read into them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DynRecord {
    fields: Vec<DynField>,
}

impl DynRecord {
    #[must_use]
    pub fn from_specs(specs: &[FieldSpec]) -> Self {
        let fields = specs
            .iter()
            .map(|spec| DynField {
                name: spec.name.clone(),
                slot: DynSlot {
                    kind: spec.kind,
                    value: Some(ScalarValue::zero(spec.kind)),
                },
            })
            .collect();
        Self { fields }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value of the first field called `name`; `None` if absent or NULL.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ScalarValue> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.slot.value.as_ref())
    }

    #[must_use]
    pub fn is_null(&self, name: &str) -> bool {
        self.fields
            .iter()
            .any(|f| f.name == name && f.slot.value.is_none())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Field names paired with their current values, in declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ScalarValue>)> {
        self.fields
            .iter()
            .map(|f| (f.name.as_str(), f.slot.value.as_ref()))
    }
}

impl Record for DynRecord {
    fn fields(&mut self) -> Vec<Field<'_>> {
        self.fields
            .iter_mut()
            .map(|DynField { name, slot }| Field::new(name.as_str(), slot))
            .collect()
    }
}

impl Serialize for DynRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Build a `Vec<FieldSpec>` from `name: type` pairs.
///
/// ```rust
/// use sqlite_rowmap::{shape, FieldSpec, ScalarKind};
///
/// let specs = shape![id: i64, name: String];
/// assert_eq!(specs[0], FieldSpec::new("id", ScalarKind::Int64));
/// ```
#[macro_export]
macro_rules! shape {
    ($($name:ident : $ty:ty),* $(,)?) => {
        ::std::vec![$($crate::FieldSpec::of::<$ty>(stringify!($name))),*]
    };
}
