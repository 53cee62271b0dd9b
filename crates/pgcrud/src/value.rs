//! Column values and literal escaping.
//!
//! [`SqlValue`] is what a [`ColumnValues`](crate::ColumnValues) map carries. Values
//! are untrusted: builders never splice them into SQL text, they bind them as
//! `$n` parameters. [`escape_literal`] and [`SqlValue::to_literal`] exist for
//! diagnostics ([`Statement::to_inline_sql`](crate::Statement::to_inline_sql))
//! and for callers that need the driver-style `escape` operation.
//!
//! A [`SqlValue::Text`] bound to a typed parameter (integer, float, bool, uuid,
//! json, date, time, timestamp, numeric) is parsed into that type, so
//! string-valued maps work against typed columns. NUMERIC support comes from
//! the default `rust_decimal` feature.

use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

type BoxError = Box<dyn Error + Sync + Send>;

/// A single value in a column/value map.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Json(serde_json::Value),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Text form used for LIKE patterns. `None` for NULL.
    pub fn as_text(&self) -> Option<String> {
        match self {
            SqlValue::Null => None,
            SqlValue::Bool(b) => Some(b.to_string()),
            SqlValue::Int(i) => Some(i.to_string()),
            SqlValue::Float(f) => Some(f.to_string()),
            SqlValue::Text(s) => Some(s.clone()),
            SqlValue::Json(v) => Some(v.to_string()),
        }
    }

    /// Trim surrounding whitespace of text values; other variants are returned as-is.
    pub fn trimmed(&self) -> SqlValue {
        match self {
            SqlValue::Text(s) => SqlValue::Text(s.trim().to_string()),
            other => other.clone(),
        }
    }

    /// `%value%` pattern for substring matching.
    pub fn like_pattern(&self) -> SqlValue {
        match self.as_text() {
            Some(text) => SqlValue::Text(format!("%{text}%")),
            None => SqlValue::Null,
        }
    }

    /// Render as an escaped SQL literal.
    pub fn to_literal(&self) -> crate::CrudResult<String> {
        match self {
            SqlValue::Null => Ok("NULL".to_string()),
            SqlValue::Bool(true) => Ok("TRUE".to_string()),
            SqlValue::Bool(false) => Ok("FALSE".to_string()),
            SqlValue::Int(i) => Ok(i.to_string()),
            SqlValue::Float(f) if f.is_finite() => Ok(f.to_string()),
            SqlValue::Float(f) => escape_literal(&float_special(*f)),
            SqlValue::Text(s) => escape_literal(s),
            SqlValue::Json(v) => escape_literal(&v.to_string()),
        }
    }
}

/// Escape a string as a standard-conforming PostgreSQL literal, quotes included.
///
/// Embedded `'` is doubled. NUL cannot be stored in PostgreSQL text and is rejected.
pub fn escape_literal(value: &str) -> crate::CrudResult<String> {
    if value.contains('\0') {
        return Err(crate::CrudError::validation(
            "String literal cannot contain NUL character",
        ));
    }
    Ok(format!("'{}'", value.replace('\'', "''")))
}

pub(crate) fn float_special(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f > 0.0 {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}

fn parse_bool(s: &str) -> Result<bool, BoxError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "t" | "true" | "y" | "yes" | "on" | "1" => Ok(true),
        "f" | "false" | "n" | "no" | "off" | "0" => Ok(false),
        other => Err(format!("invalid boolean text: '{other}'").into()),
    }
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, BoxError> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN)))
        .map_err(|e| format!("invalid timestamp text '{s}': {e}").into())
}

fn parse_time(s: &str) -> Result<NaiveTime, BoxError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|e| format!("invalid time text '{s}': {e}").into())
}

fn parse_timestamptz(s: &str) -> Result<DateTime<Utc>, BoxError> {
    match DateTime::parse_from_rfc3339(s.trim()) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        // No offset given: read as UTC.
        Err(_) => Ok(parse_timestamp(s)?.and_utc()),
    }
}

fn text_to_sql(s: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => s.trim().parse::<i16>()?.to_sql(ty, out),
        Type::INT4 => s.trim().parse::<i32>()?.to_sql(ty, out),
        Type::INT8 => s.trim().parse::<i64>()?.to_sql(ty, out),
        Type::OID => s.trim().parse::<u32>()?.to_sql(ty, out),
        Type::FLOAT4 => s.trim().parse::<f32>()?.to_sql(ty, out),
        Type::FLOAT8 => s.trim().parse::<f64>()?.to_sql(ty, out),
        Type::BOOL => parse_bool(s)?.to_sql(ty, out),
        Type::UUID => uuid::Uuid::parse_str(s.trim())?.to_sql(ty, out),
        Type::JSON | Type::JSONB => serde_json::from_str::<serde_json::Value>(s)?.to_sql(ty, out),
        Type::DATE => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?.to_sql(ty, out),
        Type::TIME => parse_time(s)?.to_sql(ty, out),
        Type::TIMESTAMP => parse_timestamp(s)?.to_sql(ty, out),
        Type::TIMESTAMPTZ => parse_timestamptz(s)?.to_sql(ty, out),
        #[cfg(feature = "rust_decimal")]
        Type::NUMERIC => s
            .trim()
            .parse::<rust_decimal::Decimal>()?
            .to_sql(ty, out),
        _ => s.to_sql_checked(ty, out),
    }
}

fn int_to_sql(i: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::INT2 => i16::try_from(i)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(i)?.to_sql(ty, out),
        Type::OID => u32::try_from(i)?.to_sql(ty, out),
        Type::FLOAT4 => (i as f32).to_sql(ty, out),
        Type::FLOAT8 => (i as f64).to_sql(ty, out),
        #[cfg(feature = "rust_decimal")]
        Type::NUMERIC => rust_decimal::Decimal::from(i).to_sql(ty, out),
        _ if <String as ToSql>::accepts(ty) => i.to_string().to_sql(ty, out),
        _ => i.to_sql_checked(ty, out),
    }
}

fn float_to_sql(f: f64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    match *ty {
        Type::FLOAT4 => (f as f32).to_sql(ty, out),
        #[cfg(feature = "rust_decimal")]
        Type::NUMERIC => rust_decimal::Decimal::try_from(f)?.to_sql(ty, out),
        _ if <String as ToSql>::accepts(ty) => f.to_string().to_sql(ty, out),
        _ => f.to_sql_checked(ty, out),
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Bool(b) => b.to_sql_checked(ty, out),
            SqlValue::Int(i) => int_to_sql(*i, ty, out),
            SqlValue::Float(f) => float_to_sql(*f, ty, out),
            SqlValue::Text(s) => text_to_sql(s, ty, out),
            SqlValue::Json(v) => v.to_sql_checked(ty, out),
        }
    }

    // Each variant checks the concrete parameter type itself.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&String> for SqlValue {
    fn from(v: &String) -> Self {
        SqlValue::Text(v.clone())
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for SqlValue {
                fn from(v: $t) -> Self {
                    SqlValue::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        SqlValue::Float(f64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<serde_json::Value> for SqlValue {
    fn from(v: serde_json::Value) -> Self {
        SqlValue::Json(v)
    }
}

impl From<uuid::Uuid> for SqlValue {
    fn from(v: uuid::Uuid) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Text(v.format("%Y-%m-%d").to_string())
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::Text(v.format("%Y-%m-%d %H:%M:%S%.f").to_string())
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Text(v.to_rfc3339())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}
