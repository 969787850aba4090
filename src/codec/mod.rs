// Copyright (c) 2026 Snowflake REST Driver Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Scalar codec between the wire format and typed values.
//!
//! The SQL REST API delivers every scalar as an untyped JSON string; the
//! declared column type decides how it is interpreted. [`decode`] maps a
//! raw value plus its [`ColumnMeta`] to a [`Value`]; [`encode_literal`]
//! renders a [`Value`] back into injection-safe SQL text, which is the only
//! parameter-binding mechanism the API offers.
//!
//! Dispatch is a type-name → type-family table ([`TypeFamily::of`]);
//! supporting a new column type means adding a table row, not a new branch
//! at a call site. Malformed hex and invalid JSON degrade to the raw
//! string rather than failing the read.

mod literal;

pub use literal::{encode_literal, interpolate};

use crate::types::ColumnMeta;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::fmt;

/// A decoded column value, or a bind value supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Calendar date at UTC midnight.
    Date(NaiveDate),
    /// Time of day with nanosecond precision.
    Time(NaiveTime),
    /// Wall-clock timestamp without a zone, interpreted as a UTC instant.
    TimestampNtz(NaiveDateTime),
    /// Instant rendered in the session's local zone.
    TimestampLtz(DateTime<Local>),
    /// Instant carrying its own explicit offset.
    TimestampTz(DateTime<FixedOffset>),
    Bytes(Vec<u8>),
    /// Parsed semi-structured value (VARIANT/OBJECT/ARRAY, valid GeoJSON).
    Json(serde_json::Value),
}

impl Value {
    /// Whether this value is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.9f")),
            Value::TimestampNtz(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.6f")),
            Value::TimestampLtz(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.6f %:z")),
            Value::TimestampTz(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.6f %:z")),
            Value::Bytes(b) => f.write_str(&hex::encode(b)),
            Value::Json(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Families of column types that share one decoding rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    Integer,
    FixedPoint,
    Float,
    Boolean,
    Text,
    Date,
    Time,
    TimestampNtz,
    TimestampLtz,
    TimestampTz,
    Binary,
    Semistructured,
    Geospatial,
    /// Unrecognized declared type; values pass through unchanged.
    Unknown,
}

/// Upper-cased declared type name → decode family.
///
/// New Snowflake types are supported by adding rows here.
const TYPE_FAMILIES: &[(&str, TypeFamily)] = &[
    ("INT", TypeFamily::Integer),
    ("INTEGER", TypeFamily::Integer),
    ("BIGINT", TypeFamily::Integer),
    ("SMALLINT", TypeFamily::Integer),
    ("TINYINT", TypeFamily::Integer),
    ("BYTEINT", TypeFamily::Integer),
    ("NUMBER", TypeFamily::FixedPoint),
    ("DECIMAL", TypeFamily::FixedPoint),
    ("NUMERIC", TypeFamily::FixedPoint),
    ("FIXED", TypeFamily::FixedPoint),
    ("FLOAT", TypeFamily::Float),
    ("FLOAT4", TypeFamily::Float),
    ("FLOAT8", TypeFamily::Float),
    ("DOUBLE", TypeFamily::Float),
    ("REAL", TypeFamily::Float),
    ("BOOLEAN", TypeFamily::Boolean),
    ("CHAR", TypeFamily::Text),
    ("CHARACTER", TypeFamily::Text),
    ("VARCHAR", TypeFamily::Text),
    ("TEXT", TypeFamily::Text),
    ("STRING", TypeFamily::Text),
    ("DATE", TypeFamily::Date),
    ("TIME", TypeFamily::Time),
    ("DATETIME", TypeFamily::TimestampNtz),
    ("TIMESTAMP", TypeFamily::TimestampNtz),
    ("TIMESTAMP_NTZ", TypeFamily::TimestampNtz),
    ("TIMESTAMP_LTZ", TypeFamily::TimestampLtz),
    ("TIMESTAMP_TZ", TypeFamily::TimestampTz),
    ("BINARY", TypeFamily::Binary),
    ("VARBINARY", TypeFamily::Binary),
    ("VARIANT", TypeFamily::Semistructured),
    ("OBJECT", TypeFamily::Semistructured),
    ("ARRAY", TypeFamily::Semistructured),
    ("GEOGRAPHY", TypeFamily::Geospatial),
    ("GEOMETRY", TypeFamily::Geospatial),
];

impl TypeFamily {
    /// Look up the family for a declared type name (case-insensitive).
    pub fn of(type_name: &str) -> Self {
        let upper = type_name.to_ascii_uppercase();
        TYPE_FAMILIES
            .iter()
            .find(|(name, _)| *name == upper)
            .map(|(_, family)| *family)
            .unwrap_or(TypeFamily::Unknown)
    }
}

/// Decode one wire scalar against its declared column metadata.
///
/// `None` (SQL NULL) short-circuits before type dispatch.
pub fn decode(raw: Option<&str>, column: &ColumnMeta) -> Value {
    let Some(raw) = raw else {
        return Value::Null;
    };

    match TypeFamily::of(&column.type_name) {
        TypeFamily::Integer => decode_integer(raw),
        TypeFamily::FixedPoint => {
            if column.scale.unwrap_or(0) == 0 {
                decode_integer(raw)
            } else {
                decode_float(raw)
            }
        }
        TypeFamily::Float => decode_float(raw),
        TypeFamily::Boolean => Value::Bool(raw == "true" || raw == "1"),
        TypeFamily::Text => Value::Str(raw.to_string()),
        TypeFamily::Date => decode_date(raw),
        TypeFamily::Time => decode_time(raw),
        TypeFamily::TimestampNtz => match decode_epoch(raw) {
            Some(instant) => Value::TimestampNtz(instant.naive_utc()),
            None => Value::Str(raw.to_string()),
        },
        TypeFamily::TimestampLtz => match decode_epoch(raw) {
            Some(instant) => Value::TimestampLtz(instant.with_timezone(&Local)),
            None => Value::Str(raw.to_string()),
        },
        TypeFamily::TimestampTz => decode_timestamp_tz(raw),
        TypeFamily::Binary => match hex::decode(raw) {
            Ok(bytes) => Value::Bytes(bytes),
            Err(_) => Value::Str(raw.to_string()),
        },
        TypeFamily::Semistructured | TypeFamily::Geospatial => {
            match serde_json::from_str(raw) {
                Ok(parsed) => Value::Json(parsed),
                // WKT geometries and malformed documents pass through raw.
                Err(_) => Value::Str(raw.to_string()),
            }
        }
        TypeFamily::Unknown => Value::Str(raw.to_string()),
    }
}

/// Integers that fit `i64` decode natively; anything larger keeps its
/// decimal text so no digits are ever silently truncated.
fn decode_integer(raw: &str) -> Value {
    match raw.parse::<i64>() {
        Ok(n) => Value::Int(n),
        Err(_) => Value::Str(raw.to_string()),
    }
}

fn decode_float(raw: &str) -> Value {
    match raw.parse::<f64>() {
        Ok(x) => Value::Float(x),
        Err(_) => Value::Str(raw.to_string()),
    }
}

/// Dates arrive as days since the Unix epoch.
fn decode_date(raw: &str) -> Value {
    raw.parse::<i64>()
        .ok()
        .and_then(|days| days.checked_mul(86_400))
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| Value::Date(dt.date_naive()))
        .unwrap_or_else(|| Value::Str(raw.to_string()))
}

/// Times arrive as fractional seconds since midnight.
fn decode_time(raw: &str) -> Value {
    let mut parts = raw.splitn(2, '.');
    let secs = parts.next().and_then(|s| s.parse::<u32>().ok());
    let nanos = parts.next().map(normalize_nanos).unwrap_or(0);
    secs.and_then(|s| NaiveTime::from_num_seconds_from_midnight_opt(s, nanos))
        .map(Value::Time)
        .unwrap_or_else(|| Value::Str(raw.to_string()))
}

/// Parse `"seconds[.fraction]"` into a UTC instant.
///
/// The fraction is right-padded/truncated to 9 digits, and only the
/// leading 6 are kept: sub-microsecond precision is discarded by
/// truncation, never rounded.
fn decode_epoch(raw: &str) -> Option<DateTime<Utc>> {
    let mut parts = raw.splitn(2, '.');
    let secs = parts.next()?.parse::<i64>().ok()?;
    let nanos = parts.next().map(normalize_nanos).unwrap_or(0);
    let micros = nanos / 1_000;
    DateTime::from_timestamp(secs, micros * 1_000)
}

/// `"seconds[.fraction] offsetMinutes"` → instant with its explicit zone.
fn decode_timestamp_tz(raw: &str) -> Value {
    let mut parts = raw.split_whitespace();
    let epoch = parts.next();
    let offset_minutes = parts.next().and_then(|s| s.parse::<i32>().ok());

    match (epoch.and_then(decode_epoch), offset_minutes) {
        (Some(instant), Some(minutes)) => match FixedOffset::east_opt(minutes * 60) {
            Some(offset) => Value::TimestampTz(instant.with_timezone(&offset)),
            None => Value::Str(raw.to_string()),
        },
        _ => Value::Str(raw.to_string()),
    }
}

/// Normalize a fraction to exactly 9 digits (right-pad or truncate).
fn normalize_nanos(fraction: &str) -> u32 {
    let mut digits: String = fraction.chars().take(9).collect();
    while digits.len() < 9 {
        digits.push('0');
    }
    digits.parse().unwrap_or(0)
}
