//! Convenient imports for common functionality.
//!
//! This module re-exports the types and macros most callers need to prepare
//! queries and decode rows.

pub use crate::config::{ConnectOptions, OpenMode};
pub use crate::database::Database;
pub use crate::error::RowMapError;
pub use crate::params::{BindParam, ParamValue};
pub use crate::record::{DynRecord, FieldSpec, Record, ScalarKind, ScalarValue};
pub use crate::statement::{Container, Statement, StatementState};

pub use crate::{impl_record, record, shape};
