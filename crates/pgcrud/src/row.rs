//! Cell decoding for `tokio_postgres` rows.

use crate::error::{CrudError, CrudResult};
use crate::normalize::RawRow;
use crate::value::float_special;
use serde_json::Value;
use std::error::Error;
use std::fmt::Write as _;
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, Kind, Type};

type BoxError = Box<dyn Error + Sync + Send>;

/// A cell of any supported type, decoded from the binary wire format.
struct Cell(Value);

impl<'a> FromSql<'a> for Cell {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        decode_raw(ty, raw).map(Cell)
    }

    fn from_sql_null(_: &Type) -> Result<Self, BoxError> {
        Ok(Cell(Value::Null))
    }

    // Unsupported types are reported by `from_sql` with the type name.
    fn accepts(_: &Type) -> bool {
        true
    }
}

/// Render bytes the way PostgreSQL prints `bytea` in hex output mode.
pub(crate) fn bytea_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("\\x");
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Non-finite floats come back in PostgreSQL's text form (`NaN`, `Infinity`).
fn float_value(f: f64) -> Value {
    serde_json::Number::from_f64(f)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(float_special(f)))
}

/// Decode one non-NULL value of type `ty`.
///
/// Enums decode to their label, domains to their base type, and 1-D arrays of
/// any supported element type to JSON arrays.
fn decode_raw(ty: &Type, raw: &[u8]) -> Result<Value, BoxError> {
    let value = match *ty {
        Type::BOOL => Value::from(bool::from_sql(ty, raw)?),
        Type::INT2 => Value::from(i16::from_sql(ty, raw)?),
        Type::INT4 => Value::from(i32::from_sql(ty, raw)?),
        Type::INT8 => Value::from(i64::from_sql(ty, raw)?),
        Type::OID => Value::from(u32::from_sql(ty, raw)?),
        Type::FLOAT4 => float_value(f64::from(f32::from_sql(ty, raw)?)),
        Type::FLOAT8 => float_value(f64::from_sql(ty, raw)?),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
            Value::String(String::from_sql(ty, raw)?)
        }
        Type::JSON | Type::JSONB => Value::from_sql(ty, raw)?,
        Type::UUID => Value::String(uuid::Uuid::from_sql(ty, raw)?.to_string()),
        Type::DATE => Value::String(chrono::NaiveDate::from_sql(ty, raw)?.to_string()),
        Type::TIME => Value::String(chrono::NaiveTime::from_sql(ty, raw)?.to_string()),
        Type::TIMESTAMP => Value::String(
            chrono::NaiveDateTime::from_sql(ty, raw)?
                .format("%Y-%m-%d %H:%M:%S%.f")
                .to_string(),
        ),
        Type::TIMESTAMPTZ => Value::String(
            chrono::DateTime::<chrono::Utc>::from_sql(ty, raw)?.to_rfc3339(),
        ),
        Type::BYTEA => Value::String(bytea_hex(raw)),
        Type::INET => Value::String(std::net::IpAddr::from_sql(ty, raw)?.to_string()),
        #[cfg(feature = "rust_decimal")]
        Type::NUMERIC => Value::String(rust_decimal::Decimal::from_sql(ty, raw)?.to_string()),
        _ => match ty.kind() {
            Kind::Enum(_) => Value::String(std::str::from_utf8(raw)?.to_string()),
            Kind::Domain(base) => decode_raw(base, raw)?,
            Kind::Array(_) => Value::Array(
                Vec::<Cell>::from_sql(ty, raw)?
                    .into_iter()
                    .map(|cell| cell.0)
                    .collect(),
            ),
            _ => return Err(format!("unsupported column type '{}'", ty.name()).into()),
        },
    };
    Ok(value)
}

fn decode_cell(row: &Row, idx: usize) -> CrudResult<Value> {
    row.try_get::<_, Cell>(idx)
        .map(|cell| cell.0)
        .map_err(|e| {
            let message = match e.source() {
                Some(source) => source.to_string(),
                None => e.to_string(),
            };
            CrudError::decode(row.columns()[idx].name(), message)
        })
}

impl RawRow for Row {
    fn column_count(&self) -> usize {
        self.len()
    }

    fn column_name(&self, idx: usize) -> &str {
        self.columns()[idx].name()
    }

    fn cell(&self, idx: usize) -> CrudResult<Value> {
        decode_cell(self, idx)
    }
}
