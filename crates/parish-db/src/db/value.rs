//! Dynamically typed SQL values and their conversions.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use parish_core::types::{
    BackupStatus, BackupType, Gender, LogLevel, PrayerStatus, SettingType, Visibility,
};
use rust_decimal::Decimal;

use crate::error::{DbError, DbResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One SQLite storage-class value, as bound to a statement or read from a row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }

    /// Renders the value for a JSON record. Blobs become arrays of bytes.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Real(f) => serde_json::Value::from(*f),
            Self::Text(s) => serde_json::Value::from(s.as_str()),
            Self::Blob(b) => serde_json::Value::from(b.clone()),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value)
    }
}

impl From<Decimal> for SqlValue {
    fn from(value: Decimal) -> Self {
        // Text keeps the exact digits; the NUMERIC column affinity stores it as a number.
        Self::Text(value.to_string())
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        Self::Text(value.format(DATE_FORMAT).to_string())
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Text(value.format(DATETIME_FORMAT).to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Conversion from a column value into a Rust type.
pub trait FromSqlValue: Sized {
    /// ## Errors
    /// Returns `DbError::DecodeError` when the value cannot represent `Self`.
    fn from_sql(value: &SqlValue) -> DbResult<Self>;
}

fn mismatch<T>(expected: &str, value: &SqlValue) -> DbResult<T> {
    Err(DbError::DecodeError(format!(
        "expected {expected}, found {} value",
        value.type_name()
    )))
}

impl FromSqlValue for SqlValue {
    fn from_sql(value: &SqlValue) -> DbResult<Self> {
        Ok(value.clone())
    }
}

impl FromSqlValue for i64 {
    fn from_sql(value: &SqlValue) -> DbResult<Self> {
        match value {
            SqlValue::Integer(i) => Ok(*i),
            SqlValue::Text(s) => s
                .trim()
                .parse()
                .map_err(|e| DbError::DecodeError(format!("invalid integer '{s}': {e}"))),
            other => mismatch("integer", other),
        }
    }
}

impl FromSqlValue for i32 {
    fn from_sql(value: &SqlValue) -> DbResult<Self> {
        let wide = i64::from_sql(value)?;
        Self::try_from(wide)
            .map_err(|_err| DbError::DecodeError(format!("integer {wide} out of range")))
    }
}

impl FromSqlValue for f64 {
    fn from_sql(value: &SqlValue) -> DbResult<Self> {
        match value {
            SqlValue::Real(f) => Ok(*f),
            #[expect(
                clippy::cast_precision_loss,
                reason = "SQLite numeric values are compared as doubles anyway"
            )]
            SqlValue::Integer(i) => Ok(*i as f64),
            other => mismatch("real", other),
        }
    }
}

impl FromSqlValue for bool {
    fn from_sql(value: &SqlValue) -> DbResult<Self> {
        match value {
            SqlValue::Integer(i) => Ok(*i != 0),
            SqlValue::Text(s) => match s.as_str() {
                "1" | "true" | "TRUE" => Ok(true),
                "0" | "false" | "FALSE" => Ok(false),
                _ => mismatch("boolean", value),
            },
            other => mismatch("boolean", other),
        }
    }
}

impl FromSqlValue for String {
    fn from_sql(value: &SqlValue) -> DbResult<Self> {
        match value {
            SqlValue::Text(s) => Ok(s.clone()),
            SqlValue::Integer(i) => Ok(i.to_string()),
            SqlValue::Real(f) => Ok(f.to_string()),
            other => mismatch("text", other),
        }
    }
}

impl FromSqlValue for Vec<u8> {
    fn from_sql(value: &SqlValue) -> DbResult<Self> {
        match value {
            SqlValue::Blob(b) => Ok(b.clone()),
            SqlValue::Text(s) => Ok(s.as_bytes().to_vec()),
            other => mismatch("blob", other),
        }
    }
}

impl FromSqlValue for Decimal {
    fn from_sql(value: &SqlValue) -> DbResult<Self> {
        match value {
            SqlValue::Integer(i) => Ok(Self::from(*i)),
            // The shortest round-trip rendering avoids binary noise in the digits.
            SqlValue::Real(f) => Self::from_str(&f.to_string())
                .map_err(|e| DbError::DecodeError(format!("invalid decimal {f}: {e}"))),
            SqlValue::Text(s) => Self::from_str(s.trim())
                .map_err(|e| DbError::DecodeError(format!("invalid decimal '{s}': {e}"))),
            other => mismatch("decimal", other),
        }
    }
}

impl FromSqlValue for NaiveDate {
    fn from_sql(value: &SqlValue) -> DbResult<Self> {
        let SqlValue::Text(s) = value else {
            return mismatch("date text", value);
        };
        // Tolerate a datetime stored where a date was expected.
        let date_part = s.get(..10).unwrap_or(s);
        Self::parse_from_str(date_part, DATE_FORMAT)
            .map_err(|e| DbError::DecodeError(format!("invalid date '{s}': {e}")))
    }
}

impl FromSqlValue for NaiveDateTime {
    fn from_sql(value: &SqlValue) -> DbResult<Self> {
        let SqlValue::Text(s) = value else {
            return mismatch("datetime text", value);
        };
        Self::parse_from_str(s, DATETIME_FORMAT)
            .or_else(|_err| Self::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
            .or_else(|_err| Self::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
            .or_else(|_err| {
                NaiveDate::parse_from_str(s, DATE_FORMAT)
                    .map(|d| d.and_time(chrono::NaiveTime::MIN))
            })
            .map_err(|e| DbError::DecodeError(format!("invalid datetime '{s}': {e}")))
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_sql(value: &SqlValue) -> DbResult<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_sql(value).map(Some)
        }
    }
}

macro_rules! text_enum_sql {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for SqlValue {
                fn from(value: $ty) -> Self {
                    Self::Text(value.as_str().to_string())
                }
            }

            impl FromSqlValue for $ty {
                fn from_sql(value: &SqlValue) -> DbResult<Self> {
                    let SqlValue::Text(s) = value else {
                        return mismatch(stringify!($ty), value);
                    };
                    Ok(s.parse::<$ty>()?)
                }
            }
        )+
    };
}

text_enum_sql!(
    Gender,
    Visibility,
    PrayerStatus,
    LogLevel,
    BackupType,
    BackupStatus,
    SettingType,
);
