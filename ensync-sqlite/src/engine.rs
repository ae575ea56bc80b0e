//! The boundary with the native SQLite library.
//!
//! [`Engine`] lists every native call the wrapper makes. [`SqliteEngine`] is
//! the real implementation over the bundled C library; other implementations
//! exist to decorate it (for example, to inject result codes in tests).
//!
//! Handles are opaque and move-only. Only [`SqliteEngine`] can create them,
//! and [`Engine::close`] / [`Engine::finalize`] consume them, so a handle
//! cannot be released twice or used after release.

use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::ptr::{self, NonNull};

use rusqlite::ffi;

use crate::value::{ColumnType, Value};

/// An open database connection.
#[derive(Debug)]
pub struct DbHandle(NonNull<ffi::sqlite3>);

/// A compiled statement.
#[derive(Debug)]
pub struct StmtHandle(NonNull<ffi::sqlite3_stmt>);

/// The native calls the wrapper is built on.
///
/// Every call that can fail returns a raw SQLite result code, interpreted
/// only through [`ResultCause`](crate::ResultCause).
pub trait Engine {
    /// Open (creating if needed) the database at `path`.
    fn open(&self, path: &str) -> (Option<DbHandle>, c_int);

    /// Compile `sql`. A successful call may still yield no statement, e.g.
    /// when `sql` holds only whitespace or comments.
    fn prepare(&self, db: &DbHandle, sql: &str) -> (Option<StmtHandle>, c_int);

    fn step(&self, stmt: &StmtHandle) -> c_int;

    fn finalize(&self, stmt: StmtHandle) -> c_int;

    fn close(&self, db: DbHandle) -> c_int;

    fn column_count(&self, stmt: &StmtHandle) -> usize;

    /// Storage class of `index` in the current row.
    fn column_type(&self, stmt: &StmtHandle, index: usize) -> ColumnType;

    /// Read `index` from the current row as `as_type`.
    ///
    /// Text that is not valid UTF-8 comes back as [`Value::Blob`] holding the
    /// raw bytes, so it never reads as a `String`.
    fn column_value(&self, stmt: &StmtHandle, index: usize, as_type: ColumnType) -> Value;
}

/// [`Engine`] over the SQLite library linked into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteEngine;

impl Engine for SqliteEngine {
    fn open(&self, path: &str) -> (Option<DbHandle>, c_int) {
        let Ok(c_path) = CString::new(path) else {
            return (None, ffi::SQLITE_CANTOPEN);
        };

        let mut db: *mut ffi::sqlite3 = ptr::null_mut();
        // SAFETY: c_path is NUL-terminated and outlives the call; db is a
        // valid out-pointer.
        let result = unsafe { ffi::sqlite3_open(c_path.as_ptr(), &mut db) };

        if result != ffi::SQLITE_OK {
            // A failed open can still allocate a connection, which must be
            // closed to be released.
            if !db.is_null() {
                // SAFETY: db came from sqlite3_open and is released once.
                unsafe { ffi::sqlite3_close(db) };
            }
            return (None, result);
        }
        (NonNull::new(db).map(DbHandle), result)
    }

    fn prepare(&self, db: &DbHandle, sql: &str) -> (Option<StmtHandle>, c_int) {
        let Ok(len) = c_int::try_from(sql.len()) else {
            return (None, ffi::SQLITE_TOOBIG);
        };

        let mut stmt: *mut ffi::sqlite3_stmt = ptr::null_mut();
        // SAFETY: db is open (handles are consumed on close); sql points to
        // len readable bytes; stmt is a valid out-pointer.
        let result = unsafe {
            ffi::sqlite3_prepare_v2(
                db.0.as_ptr(),
                sql.as_ptr() as *const c_char,
                len,
                &mut stmt,
                ptr::null_mut(),
            )
        };

        if result != ffi::SQLITE_OK {
            return (None, result);
        }
        (NonNull::new(stmt).map(StmtHandle), result)
    }

    fn step(&self, stmt: &StmtHandle) -> c_int {
        // SAFETY: stmt has not been finalized (handles are consumed on
        // finalize).
        unsafe { ffi::sqlite3_step(stmt.0.as_ptr()) }
    }

    fn finalize(&self, stmt: StmtHandle) -> c_int {
        // SAFETY: stmt is owned and consumed here, so this is its only
        // finalize.
        unsafe { ffi::sqlite3_finalize(stmt.0.as_ptr()) }
    }

    fn close(&self, db: DbHandle) -> c_int {
        // SAFETY: db is owned and consumed here, so this is its only close.
        unsafe { ffi::sqlite3_close(db.0.as_ptr()) }
    }

    fn column_count(&self, stmt: &StmtHandle) -> usize {
        // SAFETY: stmt is live.
        let count = unsafe { ffi::sqlite3_column_count(stmt.0.as_ptr()) };
        usize::try_from(count).unwrap_or(0)
    }

    fn column_type(&self, stmt: &StmtHandle, index: usize) -> ColumnType {
        let Ok(i) = c_int::try_from(index) else {
            return ColumnType::Null;
        };
        // SAFETY: stmt is live; out-of-range indexes return SQLITE_NULL.
        match unsafe { ffi::sqlite3_column_type(stmt.0.as_ptr(), i) } {
            ffi::SQLITE_INTEGER => ColumnType::Integer,
            ffi::SQLITE_FLOAT => ColumnType::Float,
            ffi::SQLITE_TEXT => ColumnType::Text,
            ffi::SQLITE_BLOB => ColumnType::Blob,
            _ => ColumnType::Null,
        }
    }

    fn column_value(&self, stmt: &StmtHandle, index: usize, as_type: ColumnType) -> Value {
        let Ok(i) = c_int::try_from(index) else {
            return Value::Null;
        };
        let raw = stmt.0.as_ptr();

        // SAFETY: raw is live. Text and blob pointers are read together with
        // their byte count, as the SQLite docs require (pointer first), and
        // copied out before any other call on the statement.
        unsafe {
            match as_type {
                ColumnType::Integer => Value::Integer(ffi::sqlite3_column_int64(raw, i)),
                ColumnType::Float => Value::Float(ffi::sqlite3_column_double(raw, i)),
                ColumnType::Text => {
                    let text = ffi::sqlite3_column_text(raw, i);
                    let len = ffi::sqlite3_column_bytes(raw, i);
                    match String::from_utf8(copy_bytes(text, len)) {
                        Ok(text) => Value::Text(text),
                        Err(e) => Value::Blob(e.into_bytes()),
                    }
                }
                ColumnType::Blob => {
                    let blob = ffi::sqlite3_column_blob(raw, i) as *const u8;
                    let len = ffi::sqlite3_column_bytes(raw, i);
                    Value::Blob(copy_bytes(blob, len))
                }
                ColumnType::Null => Value::Null,
            }
        }
    }
}

/// Copy `len` bytes out of SQLite-owned memory. Null or empty gives an empty
/// vector.
///
/// # Safety
///
/// `data` must be null or point to at least `len` readable bytes.
unsafe fn copy_bytes(data: *const u8, len: c_int) -> Vec<u8> {
    let len = usize::try_from(len).unwrap_or(0);
    if data.is_null() || len == 0 {
        return Vec::new();
    }
    // SAFETY: guaranteed by the caller.
    unsafe { std::slice::from_raw_parts(data, len).to_vec() }
}
