//! Prepared statements and their execution state machine.

use std::fmt;
use std::rc::Rc;

use ensync_core::{Logger, MessageCode, message};
use rusqlite::ffi;

use crate::connection::Connection;
use crate::engine::StmtHandle;
use crate::error::{Error, ErrorContext, WrapperErrorKind};
use crate::result_code::ResultCause;
use crate::value::{CoercionMode, ColumnType, FromColumn, coerce};

/// Where a statement is in its execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementState {
    /// Compiled, not yet stepped (or only ever busy).
    Prepared,
    /// The last step produced a row; column data can be read.
    RowAvailable,
    /// Execution ran to completion.
    Done,
    /// The last step failed.
    Error,
}

/// Non-error result of [`Statement::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// The database could not proceed (usually another writer holds the
    /// lock). Nothing was executed; the caller decides whether to retry.
    Busy,
    /// A row is available.
    Row,
    /// No more rows.
    Done,
}

/// A compiled SQL statement bound to the [`Connection`] that prepared it.
///
/// The statement holds a strong reference to its connection, so the database
/// stays open for as long as the statement exists. The native statement is
/// finalized exactly once: by [`Statement::finalize`] or on drop.
///
/// Like [`Connection`], a statement is `!Send` and must not be shared
/// between threads.
pub struct Statement {
    handle: Option<StmtHandle>,
    connection: Rc<Connection>,
    sql: String,
    state: StatementState,
    last_step_result: Option<StepOutcome>,
}

impl Statement {
    pub(crate) fn new(handle: StmtHandle, connection: Rc<Connection>, sql: String) -> Self {
        Self {
            handle: Some(handle),
            connection,
            sql,
            state: StatementState::Prepared,
            last_step_result: None,
        }
    }

    /// Execute the next step.
    ///
    /// `Busy` is returned, not raised: the statement did not advance and may
    /// be stepped again. Each call logs one debug-channel message with the
    /// native result; failures are also logged on the error channel.
    ///
    /// A statement that is already `Done` or in `Error` is not run again
    /// (SQLite would silently restart it); that is reported as
    /// [`WrapperErrorKind::Finished`].
    pub fn step(&mut self) -> Result<StepOutcome, Error> {
        let context = self.context();
        let logger = self.connection.logger();

        if matches!(self.state, StatementState::Done | StatementState::Error) {
            logger.debug(&format!(
                "{} - {}{}",
                message(MessageCode::WrapperStep),
                message(MessageCode::WrapperStepFinished),
                context
            ));
            return Err(Error::wrapper(WrapperErrorKind::Finished, context).logged(logger));
        }

        let Some(stmt) = self.handle.as_ref() else {
            return Err(Error::wrapper(WrapperErrorKind::NullObject, context).logged(logger));
        };

        let result = self.connection.engine().step(stmt);
        let cause = ResultCause::from_code(result);
        logger.debug(&format!(
            "{} - {}: {} - {}{}",
            message(MessageCode::WrapperStep),
            message(MessageCode::FragmentResult),
            result,
            cause.message(),
            context
        ));

        let outcome = match cause {
            ResultCause::Busy => StepOutcome::Busy,
            ResultCause::Row => {
                self.state = StatementState::RowAvailable;
                StepOutcome::Row
            }
            ResultCause::Done => {
                self.state = StatementState::Done;
                StepOutcome::Done
            }
            _ => {
                self.state = StatementState::Error;
                return Err(Error::native(result, context).logged(logger));
            }
        };

        self.last_step_result = Some(outcome);
        Ok(outcome)
    }

    /// Storage class of every column in the current row, in column order.
    pub fn row_column_types(&self) -> Result<Vec<ColumnType>, Error> {
        let stmt = self.row_handle()?;
        let engine = self.connection.engine();
        Ok((0..engine.column_count(stmt))
            .map(|index| engine.column_type(stmt, index))
            .collect())
    }

    /// Read column `index` of the current row as `T`.
    ///
    /// When the stored type is not `T`'s, [`CoercionMode::Strict`] fails with
    /// [`WrapperErrorKind::TypeConversion`] and [`CoercionMode::Coerce`]
    /// converts through [`coerce`], failing the same way if there is no rule.
    /// A successful coercion is logged on the warning channel.
    pub fn value_as<T: FromColumn>(&self, index: usize, mode: CoercionMode) -> Result<T, Error> {
        let stmt = self.row_handle()?;
        let engine = self.connection.engine();
        let logger = self.connection.logger();

        if index >= engine.column_count(stmt) {
            return Err(self.fail(WrapperErrorKind::ColumnRange));
        }

        let column_type = engine.column_type(stmt, index);
        let value = engine.column_value(stmt, index, column_type);
        let mismatch = column_type != T::COLUMN_TYPE;

        let value = match (mismatch, mode) {
            (false, _) => Some(value),
            (true, CoercionMode::Strict) => None,
            (true, CoercionMode::Coerce) => coerce(value, T::COLUMN_TYPE),
        };

        match value.and_then(T::from_value) {
            Some(v) => {
                if mismatch {
                    logger.warning(&self.context().describe(MessageCode::WrapperTypeCoercion));
                }
                Ok(v)
            }
            None => Err(self.fail(WrapperErrorKind::TypeConversion)),
        }
    }

    /// [`Statement::value_as`] with [`CoercionMode::Strict`].
    pub fn value<T: FromColumn>(&self, index: usize) -> Result<T, Error> {
        self.value_as(index, CoercionMode::Strict)
    }

    /// Number of columns the statement returns (zero for statements that
    /// return no data).
    pub fn column_count(&self) -> usize {
        self.handle
            .as_ref()
            .map_or(0, |stmt| self.connection.engine().column_count(stmt))
    }

    pub fn current_state(&self) -> StatementState {
        self.state
    }

    /// The most recent non-error step result, `None` before the first step.
    pub fn last_step_result(&self) -> Option<StepOutcome> {
        self.last_step_result
    }

    /// The SQL text this statement was prepared from.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn connection(&self) -> &Rc<Connection> {
        &self.connection
    }

    /// Finalize now rather than on drop.
    ///
    /// The finalization is logged exactly as on drop; a failure is also
    /// returned as [`WrapperErrorKind::FinalizeFailed`]. Note that SQLite
    /// reports the error of a failed step again when finalizing.
    pub fn finalize(mut self) -> Result<(), Error> {
        self.teardown()
    }

    fn context(&self) -> ErrorContext {
        ErrorContext::new(self.connection.file_name(), &self.sql)
    }

    fn logger(&self) -> &Logger {
        self.connection.logger()
    }

    fn fail(&self, kind: WrapperErrorKind) -> Error {
        Error::wrapper(kind, self.context()).logged(self.logger())
    }

    // The native handle, only while a row is available.
    fn row_handle(&self) -> Result<&StmtHandle, Error> {
        if self.state != StatementState::RowAvailable {
            return Err(self.fail(WrapperErrorKind::NoRow));
        }
        self.handle
            .as_ref()
            .ok_or_else(|| self.fail(WrapperErrorKind::NullObject))
    }

    // Finalizes at most once, whatever the state. Always logs on the debug
    // channel; a native failure is logged and returned, never panics.
    fn teardown(&mut self) -> Result<(), Error> {
        let Some(stmt) = self.handle.take() else {
            return Ok(());
        };

        let result = self.connection.engine().finalize(stmt);
        let context = self.context();
        let logger = self.connection.logger();

        logger.debug(&context.describe(MessageCode::WrapperStmtFinalized));

        if result != ffi::SQLITE_OK {
            logger.error(&format!(
                "{} - {}{}",
                message(MessageCode::WrapperFinalizeError),
                ResultCause::from_code(result).message(),
                context
            ));
            return Err(Error::wrapper(WrapperErrorKind::FinalizeFailed, context));
        }
        Ok(())
    }
}

impl Drop for Statement {
    fn drop(&mut self) {
        // Already logged; there is nobody to report to.
        let _ = self.teardown();
    }
}

impl fmt::Debug for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("file_name", &self.connection.file_name())
            .field("sql", &self.sql)
            .field("state", &self.state)
            .field("last_step_result", &self.last_step_result)
            .finish()
    }
}
