//! The numbered message table.
//!
//! Every piece of user-facing text produced by enSync comes from this table.
//! Codes are stable: new entries are appended, existing numbers never move.

/// Identifies one entry in the message table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MessageCode {
    /// Empty message
    NoMessage = 0,
    /// Generic, unspecified error
    UnspecError = 1,

    // -- SQLite library results --
    // One entry per SQLite primary result code. The numbers are NOT the
    // SQLite numbers; the SQLite layer translates between the two.
    UnrecognisedSqliteResult = 2,
    SqliteOk = 3,
    SqliteError = 4,
    SqliteInternal = 5,
    SqlitePerm = 6,
    SqliteAbort = 7,
    SqliteBusy = 8,
    SqliteLocked = 9,
    SqliteNoMem = 10,
    SqliteReadOnly = 11,
    SqliteInterrupt = 12,
    SqliteIoErr = 13,
    SqliteCorrupt = 14,
    SqliteNotFound = 15,
    SqliteFull = 16,
    SqliteCantOpen = 17,
    SqliteProtocol = 18,
    SqliteEmpty = 19,
    SqliteSchema = 20,
    SqliteTooBig = 21,
    SqliteConstraint = 22,
    SqliteMismatch = 23,
    SqliteMisuse = 24,
    SqliteNoLfs = 25,
    SqliteAuth = 26,
    SqliteFormat = 27,
    SqliteRange = 28,
    SqliteNotADb = 29,
    SqliteNotice = 30,
    SqliteWarning = 31,
    SqliteRow = 32,
    SqliteDone = 33,

    // -- SQLite wrapper errors --
    /// A native call succeeded but produced no object
    WrapperNullObject = 34,
    WrapperCloseError = 35,
    WrapperFinalizeError = 36,
    /// Column value has a different type and coercion was not allowed
    WrapperTypeConversion = 37,
    WrapperColumnRange = 38,
    /// Column data requested while no row is available
    WrapperNoRow = 39,

    // -- SQLite wrapper status --
    WrapperDbOpened = 40,
    WrapperDbClosed = 41,
    WrapperStmtPrepared = 42,
    WrapperStep = 43,
    WrapperStmtFinalized = 44,

    // -- Fragments --
    FragmentError = 45,
    FragmentFileName = 46,
    FragmentResult = 47,

    /// Warning: a column value was coerced to the requested type
    WrapperTypeCoercion = 48,
    /// A statement that already finished was stepped again
    WrapperStepFinished = 49,
}

impl MessageCode {
    /// Every code, in numeric order.
    pub const ALL: [MessageCode; 50] = [
        Self::NoMessage,
        Self::UnspecError,
        Self::UnrecognisedSqliteResult,
        Self::SqliteOk,
        Self::SqliteError,
        Self::SqliteInternal,
        Self::SqlitePerm,
        Self::SqliteAbort,
        Self::SqliteBusy,
        Self::SqliteLocked,
        Self::SqliteNoMem,
        Self::SqliteReadOnly,
        Self::SqliteInterrupt,
        Self::SqliteIoErr,
        Self::SqliteCorrupt,
        Self::SqliteNotFound,
        Self::SqliteFull,
        Self::SqliteCantOpen,
        Self::SqliteProtocol,
        Self::SqliteEmpty,
        Self::SqliteSchema,
        Self::SqliteTooBig,
        Self::SqliteConstraint,
        Self::SqliteMismatch,
        Self::SqliteMisuse,
        Self::SqliteNoLfs,
        Self::SqliteAuth,
        Self::SqliteFormat,
        Self::SqliteRange,
        Self::SqliteNotADb,
        Self::SqliteNotice,
        Self::SqliteWarning,
        Self::SqliteRow,
        Self::SqliteDone,
        Self::WrapperNullObject,
        Self::WrapperCloseError,
        Self::WrapperFinalizeError,
        Self::WrapperTypeConversion,
        Self::WrapperColumnRange,
        Self::WrapperNoRow,
        Self::WrapperDbOpened,
        Self::WrapperDbClosed,
        Self::WrapperStmtPrepared,
        Self::WrapperStep,
        Self::WrapperStmtFinalized,
        Self::FragmentError,
        Self::FragmentFileName,
        Self::FragmentResult,
        Self::WrapperTypeCoercion,
        Self::WrapperStepFinished,
    ];

    /// The stable number of this code.
    pub fn to_int(self) -> u16 {
        self as u16
    }

    /// Look a code up by number.
    pub fn from_int(n: u16) -> Option<Self> {
        Self::ALL.get(usize::from(n)).copied()
    }

    /// The text for this code. Shorthand for [`message`].
    pub fn text(self) -> &'static str {
        message(self)
    }
}

/// Retrieve the human-readable text for a message code.
pub fn message(code: MessageCode) -> &'static str {
    use MessageCode::*;
    match code {
        NoMessage => "",
        UnspecError => "unspecified error",
        UnrecognisedSqliteResult => "SQLite database library returned unrecognised result code",
        SqliteOk => "SQLite database library operation completed successfully",
        SqliteError => "unspecified SQLite database error",
        SqliteInternal => "internal error in SQLite database library",
        SqlitePerm => "requested access mode for new SQLite database could not be provided",
        SqliteAbort => "SQLite database operation was aborted prior to completion",
        SqliteBusy => "SQLite database is busy (file could not be written)",
        SqliteLocked => "SQLite database is locked",
        SqliteNoMem => "SQLite memory allocation failure",
        SqliteReadOnly => "SQLite database is read-only",
        SqliteInterrupt => "SQLite database operation was interrupted",
        SqliteIoErr => "IO error during SQLite database operation",
        SqliteCorrupt => "SQLite database file is corrupted",
        SqliteNotFound => "SQLite file control opcode or VFS system call method not found",
        SqliteFull => "disk full during SQLite database operation",
        SqliteCantOpen => "SQLite file could not be opened",
        SqliteProtocol => "problem with SQLite file locking protocol",
        SqliteEmpty => "unused SQLite error code",
        SqliteSchema => "SQLite database schema has changed",
        SqliteTooBig => "SQLite string, statement, or BLOB too big",
        SqliteConstraint => "SQLite database constraint violation",
        SqliteMismatch => "SQLite data type mismatch",
        SqliteMisuse => "application is misusing SQLite library",
        SqliteNoLfs => "no large file system support for SQLite",
        SqliteAuth => "SQLite authorisation failure",
        SqliteFormat => "SQLite format error (unused)",
        SqliteRange => "SQLite parameter is out of range",
        SqliteNotADb => "file is not a SQLite database",
        SqliteNotice => "unusual SQLite operation",
        SqliteWarning => "unspecified SQLite warning",
        SqliteRow => "a SQLite row has been returned",
        SqliteDone => "SQLite operation complete",
        WrapperNullObject => "SQLite null object",
        WrapperCloseError => "error closing SQLite database",
        WrapperFinalizeError => {
            "error finalising SQLite statement (a message related to this error may have already been logged)"
        }
        WrapperTypeConversion => "SQLite data type conversion error",
        WrapperColumnRange => "SQLite column index out of range",
        WrapperNoRow => "attempt to retrieve SQLite data from a statement that has no current row",
        WrapperDbOpened => "SQLite database opened",
        WrapperDbClosed => "SQLite database closed",
        WrapperStmtPrepared => "SQLite statement prepared",
        WrapperStep => "SQLite statement step execution",
        WrapperStmtFinalized => "SQLite statement finalised",
        FragmentError => "error",
        FragmentFileName => "file name",
        FragmentResult => "result",
        WrapperTypeCoercion => "SQLite column value coerced to a different type",
        WrapperStepFinished => "SQLite statement has already finished executing",
    }
}

#[cfg(test)]
#[path = "tests/messages_tests.rs"]
mod tests;
