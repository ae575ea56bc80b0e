//! A thin managed layer over the SQLite C library.
//!
//! [`Connection`] owns a native database handle and [`Statement`] owns a
//! compiled query. Statements keep their connection alive, native result
//! codes are translated into [`Error`], and column values are read with
//! type checking and optional coercion.
//!
//! ```no_run
//! use ensync_core::Logger;
//! use ensync_sqlite::{Connection, StepOutcome};
//!
//! # fn main() -> Result<(), ensync_sqlite::Error> {
//! let db = Connection::create("people.db", Logger::new())?;
//! let mut stmt = db.prepare("SELECT Name FROM People ORDER BY Id")?;
//! while stmt.step()? == StepOutcome::Row {
//!     let name: String = stmt.value(0)?;
//!     println!("{name}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Parameter binding, transactions and retry on [`StepOutcome::Busy`] are
//! left to callers.

pub mod connection;
pub mod engine;
pub mod error;
pub mod result_code;
pub mod statement;
pub mod value;

pub use connection::Connection;
pub use engine::{DbHandle, Engine, SqliteEngine, StmtHandle};
pub use error::{Error, ErrorContext, NativeFailure, WrapperErrorKind, WrapperFailure};
pub use result_code::{ResultCause, translate};
pub use statement::{Statement, StatementState, StepOutcome};
pub use value::{CoercionMode, ColumnType, FromColumn, Value, coerce};
