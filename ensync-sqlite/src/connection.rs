//! Managed SQLite database connections.

use std::fmt;
use std::rc::Rc;

use ensync_core::{Logger, MessageCode, Settings, message};
use rusqlite::ffi;

use crate::engine::{DbHandle, Engine, SqliteEngine};
use crate::error::{Error, ErrorContext, WrapperErrorKind};
use crate::result_code::ResultCause;
use crate::statement::Statement;

/// An open SQLite database.
///
/// Connections are created with [`Connection::create`] and always live
/// behind an `Rc`: every [`Statement`] keeps a strong reference to the
/// connection that compiled it, so the database is closed only when the last
/// of them is dropped.
///
/// A connection and its statements are not thread-safe and are `!Send`.
/// Callers that need to reach the database from several threads must
/// serialize access themselves.
pub struct Connection {
    engine: Box<dyn Engine>,
    handle: Option<DbHandle>,
    file_name: String,
    logger: Logger,
}

impl Connection {
    /// Open (creating if needed) the database file at `file_name`.
    ///
    /// Logs the opening on the information channel.
    pub fn create(file_name: impl Into<String>, logger: Logger) -> Result<Rc<Self>, Error> {
        Self::create_with_engine(Box::new(SqliteEngine), file_name, logger)
    }

    /// Open the database named in `[database] path`, logging through a
    /// facade for the channels in `[log] channels`.
    pub fn from_settings(settings: &Settings) -> Result<Rc<Self>, Error> {
        let file_name = settings.database.path.to_string_lossy().into_owned();
        Self::create(file_name, Logger::from_settings(&settings.log))
    }

    /// As [`Connection::create`], with an explicit native engine.
    pub fn create_with_engine(
        engine: Box<dyn Engine>,
        file_name: impl Into<String>,
        logger: Logger,
    ) -> Result<Rc<Self>, Error> {
        let file_name = file_name.into();
        let context = ErrorContext::file(&file_name);

        let (handle, result) = engine.open(&file_name);
        if result != ffi::SQLITE_OK {
            return Err(Error::native(result, context).logged(&logger));
        }
        let Some(handle) = handle else {
            return Err(Error::wrapper(WrapperErrorKind::NullObject, context).logged(&logger));
        };

        logger.information(&context.describe(MessageCode::WrapperDbOpened));

        Ok(Rc::new(Self {
            engine,
            handle: Some(handle),
            file_name,
            logger,
        }))
    }

    /// Compile `sql` into a statement ready to be stepped.
    ///
    /// Nothing is executed until [`Statement::step`] is called. Logs the
    /// preparation on the debug channel.
    pub fn prepare(self: &Rc<Self>, sql: impl Into<String>) -> Result<Statement, Error> {
        let sql = sql.into();
        let context = ErrorContext::new(&self.file_name, &sql);

        let Some(db) = self.handle.as_ref() else {
            return Err(Error::wrapper(WrapperErrorKind::NullObject, context).logged(&self.logger));
        };

        let (stmt, result) = self.engine.prepare(db, &sql);
        if result != ffi::SQLITE_OK {
            return Err(Error::native(result, context).logged(&self.logger));
        }
        let Some(stmt) = stmt else {
            return Err(Error::wrapper(WrapperErrorKind::NullObject, context).logged(&self.logger));
        };

        self.logger
            .debug(&context.describe(MessageCode::WrapperStmtPrepared));

        Ok(Statement::new(stmt, Rc::clone(self), sql))
    }

    /// Release this reference and close the database if it was the last one.
    ///
    /// If statements still hold the connection, closing is deferred until the
    /// last of them is dropped and this returns `Ok`. A failing close is
    /// logged and returned as [`WrapperErrorKind::CloseFailed`].
    pub fn close(self: Rc<Self>) -> Result<(), Error> {
        match Rc::try_unwrap(self) {
            Ok(mut connection) => connection.teardown(),
            Err(_still_shared) => Ok(()),
        }
    }

    /// Path of the database file, as given to [`Connection::create`].
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub(crate) fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    // Closes the handle at most once. Always logs the closure; a native
    // failure is logged and returned, never panics.
    fn teardown(&mut self) -> Result<(), Error> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        let result = self.engine.close(handle);
        let context = ErrorContext::file(&self.file_name);

        self.logger
            .information(&context.describe(MessageCode::WrapperDbClosed));

        if result != ffi::SQLITE_OK {
            self.logger.error(&format!(
                "{} - {}{}",
                message(MessageCode::WrapperCloseError),
                ResultCause::from_code(result).message(),
                context
            ));
            return Err(Error::wrapper(WrapperErrorKind::CloseFailed, context));
        }
        Ok(())
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        // Already logged; there is nobody to report to.
        let _ = self.teardown();
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("file_name", &self.file_name)
            .field("open", &self.handle.is_some())
            .finish()
    }
}
