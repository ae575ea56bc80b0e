//! Errors raised by the SQLite layer.
//!
//! There are two families: [`NativeFailure`] when the SQLite library returns
//! a failing result code, and [`WrapperFailure`] when one of this layer's own
//! contracts is broken (no row to read, bad column index, and so on). Both
//! carry an [`ErrorContext`] naming the database file and SQL involved.
//!
//! Errors are plain values: `Clone`, comparable, and `Send + Sync`, so a
//! caught error can be duplicated and handed to another thread unchanged.

use std::fmt;
use std::os::raw::c_int;

use ensync_core::{Logger, MessageCode, message};
use thiserror::Error;

use crate::result_code::ResultCause;

/// Database file and SQL text attached to an error. Either may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    pub file_name: String,
    pub sql: String,
}

impl ErrorContext {
    pub fn new(file_name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            sql: sql.into(),
        }
    }

    /// Context naming only a file.
    pub fn file(file_name: impl Into<String>) -> Self {
        Self::new(file_name, "")
    }

    /// A log line: the text for `code` followed by this context.
    pub(crate) fn describe(&self, code: MessageCode) -> String {
        format!("{}{}", message(code), self)
    }
}

/// Renders ` - file name: "…"` and ` - SQL: "…"`, leaving out empty parts.
impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.file_name.is_empty() {
            write!(
                f,
                " - {}: \"{}\"",
                message(MessageCode::FragmentFileName),
                self.file_name
            )?;
        }
        // "SQL" reads the same in every language, so it is not in the table.
        if !self.sql.is_empty() {
            write!(f, " - SQL: \"{}\"", self.sql)?;
        }
        Ok(())
    }
}

/// The SQLite library returned a failing result code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{}", .cause.message(), .context)]
pub struct NativeFailure {
    result: c_int,
    cause: ResultCause,
    context: ErrorContext,
}

impl NativeFailure {
    pub fn new(result: c_int, context: ErrorContext) -> Self {
        Self {
            result,
            cause: ResultCause::from_code(result),
            context,
        }
    }

    /// The raw SQLite result code.
    pub fn result(&self) -> c_int {
        self.result
    }

    pub fn cause(&self) -> ResultCause {
        self.cause
    }

    pub fn context(&self) -> &ErrorContext {
        &self.context
    }
}

/// Ways this layer's own contracts can be violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperErrorKind {
    /// A native call reported success but returned no object.
    NullObject,
    /// Column index outside `0..column_count`.
    ColumnRange,
    /// Column data requested while the statement has no current row.
    NoRow,
    /// The column holds a different type and no conversion was allowed or
    /// possible.
    TypeConversion,
    FinalizeFailed,
    CloseFailed,
    /// The statement already finished (done or failed) and cannot be stepped.
    Finished,
}

impl WrapperErrorKind {
    pub fn message_code(&self) -> MessageCode {
        match self {
            Self::NullObject => MessageCode::WrapperNullObject,
            Self::ColumnRange => MessageCode::WrapperColumnRange,
            Self::NoRow => MessageCode::WrapperNoRow,
            Self::TypeConversion => MessageCode::WrapperTypeConversion,
            Self::FinalizeFailed => MessageCode::WrapperFinalizeError,
            Self::CloseFailed => MessageCode::WrapperCloseError,
            Self::Finished => MessageCode::WrapperStepFinished,
        }
    }
}

/// A contract of the wrapper itself was violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{}", message(.kind.message_code()), .context)]
pub struct WrapperFailure {
    kind: WrapperErrorKind,
    context: ErrorContext,
}

impl WrapperFailure {
    pub fn new(kind: WrapperErrorKind, context: ErrorContext) -> Self {
        Self { kind, context }
    }

    pub fn kind(&self) -> WrapperErrorKind {
        self.kind
    }

    pub fn context(&self) -> &ErrorContext {
        &self.context
    }
}

/// Any error raised by the SQLite layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Native(#[from] NativeFailure),
    #[error(transparent)]
    Wrapper(#[from] WrapperFailure),
}

impl Error {
    pub fn native(result: c_int, context: ErrorContext) -> Self {
        Self::Native(NativeFailure::new(result, context))
    }

    pub fn wrapper(kind: WrapperErrorKind, context: ErrorContext) -> Self {
        Self::Wrapper(WrapperFailure::new(kind, context))
    }

    /// The message table entry this error renders from.
    pub fn message_code(&self) -> MessageCode {
        match self {
            Self::Native(e) => e.cause.message_code(),
            Self::Wrapper(e) => e.kind.message_code(),
        }
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Native(e) => &e.context,
            Self::Wrapper(e) => &e.context,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.context().file_name
    }

    pub fn sql(&self) -> &str {
        &self.context().sql
    }

    /// The translated cause, for native failures.
    pub fn cause(&self) -> Option<ResultCause> {
        match self {
            Self::Native(e) => Some(e.cause),
            Self::Wrapper(_) => None,
        }
    }

    /// The wrapper contract that failed, for wrapper failures.
    pub fn wrapper_kind(&self) -> Option<WrapperErrorKind> {
        match self {
            Self::Native(_) => None,
            Self::Wrapper(e) => Some(e.kind),
        }
    }

    /// Record this error on the error channel and hand it back, ready to be
    /// returned.
    pub(crate) fn logged(self, logger: &Logger) -> Self {
        logger.error(&self.to_string());
        self
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
