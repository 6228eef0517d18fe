//! Map SQLite query rows onto typed records by column name.
//!
//! A [`Database`] prepares a query and binds its parameters positionally; the
//! resulting [`Statement`] steps the engine and decodes each row into a
//! [`Record`] by matching column names to field names.
//!
//! ```rust
//! use sqlite_rowmap::prelude::*;
//!
//! record! {
//!     #[derive(Debug, Default, PartialEq)]
//!     pub struct User {
//!         pub id: i64,
//!         pub name: String,
//!     }
//! }
//!
//! # fn main() -> Result<(), RowMapError> {
//! let db = Database::open_in_memory()?;
//! db.execute("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)", ())?;
//! db.execute("INSERT INTO users (id, name) VALUES (?1, ?2)", (1_i64, "alice"))?;
//!
//! let mut user = User::default();
//! db.prepare("SELECT id, name FROM users WHERE id = ?1", (1_i64,))?
//!     .pull(&mut user)?;
//! assert_eq!(user, User { id: 1, name: "alice".into() });
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod params;
pub mod prelude;
pub mod record;
pub mod statement;

pub use config::{ConnectOptions, ConnectOptionsBuilder, OpenMode};
pub use database::Database;
pub use error::RowMapError;
pub use params::{BindParam, BindParams, ParamValue};
pub use record::{DynRecord, Field, FieldSpec, Record, Scalar, ScalarKind, ScalarValue, Slot};
pub use statement::{Container, CurrentRow, Records, Statement, StatementState, TypedRows};

pub use rusqlite::OpenFlags;
