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

//! SQL literal encoding and positional placeholder substitution.
//!
//! The statements API has no native parameter binding, so bind values are
//! rendered inline. Every branch must be injection-safe: single quotes are
//! doubled, structured values are wrapped in a `PARSE_JSON` literal, and
//! temporals are formatted to microsecond precision.

use crate::codec::Value;
use crate::error::{Error, Result};

/// Render a [`Value`] as inline SQL text.
pub fn encode_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(x) => x.to_string(),
        Value::Date(d) => format!("'{} 00:00:00.000000'", d.format("%Y-%m-%d")),
        Value::Time(t) => format!("'{}'", t.format("%H:%M:%S%.6f")),
        Value::TimestampNtz(ts) => format!("'{}'", ts.format("%Y-%m-%d %H:%M:%S%.6f")),
        Value::TimestampLtz(ts) => format!("'{}'", ts.format("%Y-%m-%d %H:%M:%S%.6f")),
        Value::TimestampTz(ts) => format!("'{}'", ts.format("%Y-%m-%d %H:%M:%S%.6f")),
        Value::Json(v) => format!("PARSE_JSON('{}')", quote_inner(&v.to_string())),
        Value::Str(s) => format!("'{}'", quote_inner(s)),
        Value::Bytes(b) => format!("'{}'", hex::encode(b)),
    }
}

fn quote_inner(s: &str) -> String {
    s.replace('\'', "''")
}

/// Substitute each `?` placeholder in `sql` with the positionally
/// corresponding bind value, encoded as a literal.
///
/// The scan is quote-aware: a `?` inside a single-quoted SQL string
/// (including `''` escapes) is data and is left untouched. A mismatch
/// between placeholder and binding counts fails before anything reaches
/// the server.
pub fn interpolate(sql: &str, bindings: &[Value]) -> Result<String> {
    let mut out = String::with_capacity(sql.len() + 16 * bindings.len());
    let mut next = 0usize;
    let mut chars = sql.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    // Escaped quote; still inside the literal.
                    out.push(chars.next().unwrap());
                } else {
                    in_string = false;
                }
            }
            continue;
        }

        match c {
            '\'' => {
                in_string = true;
                out.push(c);
            }
            '?' => {
                let value = bindings.get(next).ok_or_else(|| {
                    Error::statement(format!(
                        "statement has more placeholders than bind values ({} provided)",
                        bindings.len()
                    ))
                })?;
                out.push_str(&encode_literal(value));
                next += 1;
            }
            _ => out.push(c),
        }
    }

    if next < bindings.len() {
        return Err(Error::statement(format!(
            "{} bind values provided but statement has only {} placeholders",
            bindings.len(),
            next
        )));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_scalar_literals() {
        assert_eq!(encode_literal(&Value::Null), "NULL");
        assert_eq!(encode_literal(&Value::Bool(true)), "TRUE");
        assert_eq!(encode_literal(&Value::Bool(false)), "FALSE");
        assert_eq!(encode_literal(&Value::Int(-7)), "-7");
        assert_eq!(encode_literal(&Value::Float(2.5)), "2.5");
        assert_eq!(encode_literal(&Value::Str("plain".into())), "'plain'");
    }

    #[test]
    fn test_single_quotes_are_doubled() {
        assert_eq!(
            encode_literal(&Value::Str("O'Brien".into())),
            "'O''Brien'"
        );
        assert_eq!(encode_literal(&Value::Str("''".into())), "''''''");
    }

    #[test]
    fn test_temporal_literals() {
        let d = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        assert_eq!(encode_literal(&Value::Date(d)), "'2020-01-02 00:00:00.000000'");

        let t = NaiveTime::from_hms_micro_opt(12, 34, 56, 123456).unwrap();
        assert_eq!(encode_literal(&Value::Time(t)), "'12:34:56.123456'");

        let ts = d.and_time(t);
        assert_eq!(
            encode_literal(&Value::TimestampNtz(ts)),
            "'2020-01-02 12:34:56.123456'"
        );
    }

    #[test]
    fn test_structured_literal_uses_json_parse_wrapper() {
        let value = Value::Json(serde_json::json!({"name": "O'Brien", "n": 1}));
        let literal = encode_literal(&value);
        assert!(literal.starts_with("PARSE_JSON('"));
        assert!(literal.ends_with("')"));
        assert!(literal.contains("name"));
        assert!(literal.contains("O''Brien"));
    }

    #[test]
    fn test_bytes_encode_as_quoted_hex() {
        assert_eq!(
            encode_literal(&Value::Bytes(vec![0xde, 0xad])),
            "'dead'"
        );
    }

    #[test]
    fn test_interpolate_positional() {
        let sql = "SELECT * FROM t WHERE id = ? AND name = ?";
        let out = interpolate(sql, &[Value::Int(10), Value::Str("Henry".into())]).unwrap();
        assert_eq!(out, "SELECT * FROM t WHERE id = 10 AND name = 'Henry'");
    }

    #[test]
    fn test_interpolate_skips_placeholders_inside_strings() {
        let sql = "SELECT '?' AS q, 'it''s ?' AS esc, ? AS real";
        let out = interpolate(sql, &[Value::Int(1)]).unwrap();
        assert_eq!(out, "SELECT '?' AS q, 'it''s ?' AS esc, 1 AS real");
    }

    #[test]
    fn test_interpolate_injection_is_neutralized() {
        let out = interpolate(
            "SELECT ? AS v",
            &[Value::Str("'; DROP TABLE t; --".into())],
        )
        .unwrap();
        assert_eq!(out, "SELECT '''; DROP TABLE t; --' AS v");
    }

    #[test]
    fn test_interpolate_count_mismatch() {
        assert!(interpolate("SELECT ?, ?", &[Value::Int(1)]).is_err());
        assert!(interpolate("SELECT 1", &[Value::Int(1)]).is_err());
    }

    #[test]
    fn test_interpolate_without_bindings_is_identity() {
        let sql = "SELECT 'a?b' FROM t";
        assert_eq!(interpolate(sql, &[]).unwrap(), sql);
    }
}
