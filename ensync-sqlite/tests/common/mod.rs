#![allow(dead_code)]

use std::cell::Cell;
use std::os::raw::c_int;
use std::rc::Rc;

use ensync_core::{LogRecorder, Logger};
use ensync_sqlite::{
    ColumnType, Connection, DbHandle, Engine, SqliteEngine, StepOutcome, StmtHandle, Value,
};
use rusqlite::ffi;
use tempfile::TempDir;

/// Path for a fresh database file inside `dir`.
pub fn db_path(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_str().unwrap().to_string()
}

/// A new database in a temp dir, with a recorder on every channel.
pub fn open(dir: &TempDir) -> (Rc<Connection>, LogRecorder) {
    let (logger, recorder) = LogRecorder::logger();
    let db = Connection::create(db_path(dir, "test.db"), logger).unwrap();
    (db, recorder)
}

/// Run a statement that returns no rows to completion.
pub fn exec(db: &Rc<Connection>, sql: &str) {
    let mut stmt = db.prepare(sql).unwrap();
    assert_eq!(stmt.step().unwrap(), StepOutcome::Done, "{}", sql);
}

/// Native call counters, shared between a test and its engine.
#[derive(Debug, Default)]
pub struct Calls {
    pub steps: Cell<usize>,
    pub finalizes: Cell<usize>,
    pub closes: Cell<usize>,
}

/// Result codes to inject.
#[derive(Debug, Default)]
pub struct Faults {
    /// Report a successful open with no handle.
    pub null_open: bool,
    /// Report a successful prepare with no statement.
    pub null_prepare: bool,
    /// Return BUSY from this many steps before reaching the engine.
    pub busy_steps: Cell<usize>,
    /// Replace the result of every finalize.
    pub finalize_result: Option<c_int>,
    /// Replace the result of every close.
    pub close_result: Option<c_int>,
}

/// Wraps the real engine, counting calls and injecting faults.
pub struct FaultyEngine {
    inner: SqliteEngine,
    faults: Faults,
    calls: Rc<Calls>,
}

impl FaultyEngine {
    pub fn new(faults: Faults) -> (Box<Self>, Rc<Calls>) {
        let calls = Rc::new(Calls::default());
        let engine = Box::new(Self {
            inner: SqliteEngine,
            faults,
            calls: Rc::clone(&calls),
        });
        (engine, calls)
    }
}

impl Engine for FaultyEngine {
    fn open(&self, path: &str) -> (Option<DbHandle>, c_int) {
        let (handle, result) = self.inner.open(path);
        if self.faults.null_open {
            if let Some(handle) = handle {
                self.inner.close(handle);
            }
            return (None, ffi::SQLITE_OK);
        }
        (handle, result)
    }

    fn prepare(&self, db: &DbHandle, sql: &str) -> (Option<StmtHandle>, c_int) {
        let (stmt, result) = self.inner.prepare(db, sql);
        if self.faults.null_prepare {
            if let Some(stmt) = stmt {
                self.inner.finalize(stmt);
            }
            return (None, ffi::SQLITE_OK);
        }
        (stmt, result)
    }

    fn step(&self, stmt: &StmtHandle) -> c_int {
        self.calls.steps.set(self.calls.steps.get() + 1);
        let busy = self.faults.busy_steps.get();
        if busy > 0 {
            self.faults.busy_steps.set(busy - 1);
            return ffi::SQLITE_BUSY;
        }
        self.inner.step(stmt)
    }

    fn finalize(&self, stmt: StmtHandle) -> c_int {
        self.calls.finalizes.set(self.calls.finalizes.get() + 1);
        let result = self.inner.finalize(stmt);
        self.faults.finalize_result.unwrap_or(result)
    }

    fn close(&self, db: DbHandle) -> c_int {
        self.calls.closes.set(self.calls.closes.get() + 1);
        let result = self.inner.close(db);
        self.faults.close_result.unwrap_or(result)
    }

    fn column_count(&self, stmt: &StmtHandle) -> usize {
        self.inner.column_count(stmt)
    }

    fn column_type(&self, stmt: &StmtHandle, index: usize) -> ColumnType {
        self.inner.column_type(stmt, index)
    }

    fn column_value(&self, stmt: &StmtHandle, index: usize, as_type: ColumnType) -> Value {
        self.inner.column_value(stmt, index, as_type)
    }
}

/// A database opened through a [`FaultyEngine`].
pub fn open_faulty(dir: &TempDir, faults: Faults) -> (Rc<Connection>, LogRecorder, Rc<Calls>) {
    let (engine, calls) = FaultyEngine::new(faults);
    let logger = Logger::new();
    let recorder = LogRecorder::new();
    recorder.attach(&logger);
    let db = Connection::create_with_engine(engine, db_path(dir, "faulty.db"), logger).unwrap();
    (db, recorder, calls)
}
