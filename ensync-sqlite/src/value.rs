//! Column values, their types, and the coercion table.
//!
//! SQLite is dynamically typed: a column's type is only known once a row has
//! been produced. [`Statement::value_as`](crate::Statement::value_as) reads a
//! column as a requested Rust type. When the stored type differs, the
//! [`CoercionMode`] decides whether that is an error or whether [`coerce`] is
//! consulted.

use std::fmt;

/// Storage class of a column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    Blob,
    Null,
}

impl ColumnType {
    pub const ALL: [ColumnType; 5] = [
        ColumnType::Integer,
        ColumnType::Float,
        ColumnType::Text,
        ColumnType::Blob,
        ColumnType::Null,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Blob => "blob",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A column value as read from the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
    Null,
}

impl Value {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Integer(_) => ColumnType::Integer,
            Self::Float(_) => ColumnType::Float,
            Self::Text(_) => ColumnType::Text,
            Self::Blob(_) => ColumnType::Blob,
            Self::Null => ColumnType::Null,
        }
    }
}

/// What to do when a column's type differs from the requested type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoercionMode {
    /// A type mismatch is an error.
    #[default]
    Strict,
    /// A type mismatch is resolved through [`coerce`].
    Coerce,
}

/// Convert a value to another storage class.
///
/// Returns `None` when there is no rule for the pair, or the rule does not
/// apply to this particular value. Converting a value to its own type returns
/// it unchanged. The rules:
///
/// | from \ to | integer                  | float           | text            | blob        |
/// |-----------|--------------------------|-----------------|-----------------|-------------|
/// | integer   |                          | if exact        | decimal         | -           |
/// | float     | if integral and in range |                 | shortest form   | -           |
/// | text      | parsed (trimmed)         | parsed (trimmed)|                 | UTF-8 bytes |
/// | blob      | -                        | -               | if valid UTF-8  |             |
/// | null      | -                        | -               | -               | -           |
pub fn coerce(value: Value, target: ColumnType) -> Option<Value> {
    use ColumnType as T;

    if value.column_type() == target {
        return Some(value);
    }

    match (value, target) {
        (Value::Integer(i), T::Float) => integer_to_float(i).map(Value::Float),
        (Value::Integer(i), T::Text) => Some(Value::Text(i.to_string())),

        (Value::Float(f), T::Integer) => float_to_integer(f).map(Value::Integer),
        (Value::Float(f), T::Text) => Some(Value::Text(f.to_string())),

        (Value::Text(s), T::Integer) => s.trim().parse().ok().map(Value::Integer),
        (Value::Text(s), T::Float) => s.trim().parse().ok().map(Value::Float),
        (Value::Text(s), T::Blob) => Some(Value::Blob(s.into_bytes())),

        (Value::Blob(b), T::Text) => String::from_utf8(b).ok().map(Value::Text),

        _ => None,
    }
}

// i64::MAX is not representable as f64; 2^63 rounds up past it.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

// Beyond 2^53 most integers round; the cast back saturates at 2^63.
fn integer_to_float(i: i64) -> Option<f64> {
    let f = i as f64;
    if f < I64_LIMIT && f as i64 == i {
        Some(f)
    } else {
        None
    }
}

fn float_to_integer(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && (-I64_LIMIT..I64_LIMIT).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

/// A Rust type that can be read from a column.
pub trait FromColumn: Sized {
    /// The storage class that maps to this type without conversion.
    const COLUMN_TYPE: ColumnType;

    /// Extract from a value of storage class [`Self::COLUMN_TYPE`].
    /// Returns `None` if the value does not fit.
    fn from_value(value: Value) -> Option<Self>;
}

impl FromColumn for i64 {
    const COLUMN_TYPE: ColumnType = ColumnType::Integer;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }
}

impl FromColumn for i32 {
    const COLUMN_TYPE: ColumnType = ColumnType::Integer;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Integer(i) => i32::try_from(i).ok(),
            _ => None,
        }
    }
}

impl FromColumn for f64 {
    const COLUMN_TYPE: ColumnType = ColumnType::Float;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(f),
            _ => None,
        }
    }
}

impl FromColumn for String {
    const COLUMN_TYPE: ColumnType = ColumnType::Text;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl FromColumn for Vec<u8> {
    const COLUMN_TYPE: ColumnType = ColumnType::Blob;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Blob(b) => Some(b),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/value_tests.rs"]
mod tests;
