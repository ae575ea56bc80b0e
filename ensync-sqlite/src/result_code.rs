//! Translation of SQLite result codes.

use std::os::raw::c_int;

use ensync_core::MessageCode;
use rusqlite::ffi;

/// Canonical cause behind a SQLite primary result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCause {
    Ok,
    Error,
    Internal,
    Perm,
    Abort,
    Busy,
    Locked,
    NoMem,
    ReadOnly,
    Interrupt,
    IoErr,
    Corrupt,
    NotFound,
    Full,
    CantOpen,
    Protocol,
    Empty,
    Schema,
    TooBig,
    Constraint,
    Mismatch,
    Misuse,
    NoLfs,
    Auth,
    Format,
    Range,
    NotADb,
    Notice,
    Warning,
    Row,
    Done,
    /// Not a result code this layer knows about.
    Unrecognised,
}

impl ResultCause {
    /// Translate a raw result code. Never fails: unknown codes become
    /// [`ResultCause::Unrecognised`], so this is safe to call while
    /// building an error.
    pub fn from_code(code: c_int) -> Self {
        match code {
            ffi::SQLITE_OK => Self::Ok,
            ffi::SQLITE_ERROR => Self::Error,
            ffi::SQLITE_INTERNAL => Self::Internal,
            ffi::SQLITE_PERM => Self::Perm,
            ffi::SQLITE_ABORT => Self::Abort,
            ffi::SQLITE_BUSY => Self::Busy,
            ffi::SQLITE_LOCKED => Self::Locked,
            ffi::SQLITE_NOMEM => Self::NoMem,
            ffi::SQLITE_READONLY => Self::ReadOnly,
            ffi::SQLITE_INTERRUPT => Self::Interrupt,
            ffi::SQLITE_IOERR => Self::IoErr,
            ffi::SQLITE_CORRUPT => Self::Corrupt,
            ffi::SQLITE_NOTFOUND => Self::NotFound,
            ffi::SQLITE_FULL => Self::Full,
            ffi::SQLITE_CANTOPEN => Self::CantOpen,
            ffi::SQLITE_PROTOCOL => Self::Protocol,
            ffi::SQLITE_EMPTY => Self::Empty,
            ffi::SQLITE_SCHEMA => Self::Schema,
            ffi::SQLITE_TOOBIG => Self::TooBig,
            ffi::SQLITE_CONSTRAINT => Self::Constraint,
            ffi::SQLITE_MISMATCH => Self::Mismatch,
            ffi::SQLITE_MISUSE => Self::Misuse,
            ffi::SQLITE_NOLFS => Self::NoLfs,
            ffi::SQLITE_AUTH => Self::Auth,
            ffi::SQLITE_FORMAT => Self::Format,
            ffi::SQLITE_RANGE => Self::Range,
            ffi::SQLITE_NOTADB => Self::NotADb,
            ffi::SQLITE_NOTICE => Self::Notice,
            ffi::SQLITE_WARNING => Self::Warning,
            ffi::SQLITE_ROW => Self::Row,
            ffi::SQLITE_DONE => Self::Done,
            _ => Self::Unrecognised,
        }
    }

    /// The message table entry describing this cause.
    pub fn message_code(&self) -> MessageCode {
        match self {
            Self::Ok => MessageCode::SqliteOk,
            Self::Error => MessageCode::SqliteError,
            Self::Internal => MessageCode::SqliteInternal,
            Self::Perm => MessageCode::SqlitePerm,
            Self::Abort => MessageCode::SqliteAbort,
            Self::Busy => MessageCode::SqliteBusy,
            Self::Locked => MessageCode::SqliteLocked,
            Self::NoMem => MessageCode::SqliteNoMem,
            Self::ReadOnly => MessageCode::SqliteReadOnly,
            Self::Interrupt => MessageCode::SqliteInterrupt,
            Self::IoErr => MessageCode::SqliteIoErr,
            Self::Corrupt => MessageCode::SqliteCorrupt,
            Self::NotFound => MessageCode::SqliteNotFound,
            Self::Full => MessageCode::SqliteFull,
            Self::CantOpen => MessageCode::SqliteCantOpen,
            Self::Protocol => MessageCode::SqliteProtocol,
            Self::Empty => MessageCode::SqliteEmpty,
            Self::Schema => MessageCode::SqliteSchema,
            Self::TooBig => MessageCode::SqliteTooBig,
            Self::Constraint => MessageCode::SqliteConstraint,
            Self::Mismatch => MessageCode::SqliteMismatch,
            Self::Misuse => MessageCode::SqliteMisuse,
            Self::NoLfs => MessageCode::SqliteNoLfs,
            Self::Auth => MessageCode::SqliteAuth,
            Self::Format => MessageCode::SqliteFormat,
            Self::Range => MessageCode::SqliteRange,
            Self::NotADb => MessageCode::SqliteNotADb,
            Self::Notice => MessageCode::SqliteNotice,
            Self::Warning => MessageCode::SqliteWarning,
            Self::Row => MessageCode::SqliteRow,
            Self::Done => MessageCode::SqliteDone,
            Self::Unrecognised => MessageCode::UnrecognisedSqliteResult,
        }
    }

    pub fn message(&self) -> &'static str {
        self.message_code().text()
    }
}

/// Shorthand for [`ResultCause::from_code`].
pub fn translate(code: c_int) -> ResultCause {
    ResultCause::from_code(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_codes_translate() {
        let cases = [
            (ffi::SQLITE_OK, ResultCause::Ok),
            (ffi::SQLITE_BUSY, ResultCause::Busy),
            (ffi::SQLITE_LOCKED, ResultCause::Locked),
            (ffi::SQLITE_CORRUPT, ResultCause::Corrupt),
            (ffi::SQLITE_IOERR, ResultCause::IoErr),
            (ffi::SQLITE_CONSTRAINT, ResultCause::Constraint),
            (ffi::SQLITE_NOTADB, ResultCause::NotADb),
            (ffi::SQLITE_ROW, ResultCause::Row),
            (ffi::SQLITE_DONE, ResultCause::Done),
        ];
        for (code, cause) in cases {
            assert_eq!(translate(code), cause, "code {}", code);
        }
    }

    #[test]
    fn unknown_codes_fall_back() {
        for code in [-1, 42, 99, 1000, c_int::MAX, c_int::MIN] {
            assert_eq!(translate(code), ResultCause::Unrecognised, "code {}", code);
        }
        assert_eq!(
            ResultCause::Unrecognised.message_code(),
            MessageCode::UnrecognisedSqliteResult
        );
    }

    #[test]
    fn every_primary_code_has_its_own_message() {
        let mut seen = std::collections::HashSet::new();
        for code in (0..=28).chain([100, 101]) {
            let cause = translate(code);
            assert_ne!(cause, ResultCause::Unrecognised, "code {}", code);
            assert!(seen.insert(cause.message_code()), "duplicate for {}", code);
        }
        assert_eq!(seen.len(), 31);
    }
}
