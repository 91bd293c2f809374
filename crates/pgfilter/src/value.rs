//! Values bound to `$n` placeholders.

use bytes::BytesMut;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// A bound value, kept in the native type of the matcher that produced it.
///
/// The builder never quotes or stringifies values; they are handed to the
/// driver as-is. `Value` implements [`ToSql`] so a compiled parameter list can be
/// passed straight to `tokio-postgres`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Text(String),
    /// An instant whose textual form is RFC 3339 / ISO-8601.
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Render the value as a SQL literal, for log lines only.
    ///
    /// Text is single-quoted with embedded quotes doubled. Never execute the
    /// result; bind the value instead.
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Value::Timestamp(ts) => format!("'{}'", iso8601(ts)),
        }
    }
}

pub(crate) fn iso8601(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
            Value::Timestamp(ts) => f.write_str(&iso8601(ts)),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

fn mismatch(value: &Value, ty: &Type) -> Box<dyn Error + Sync + Send> {
    format!("cannot bind {value:?} to a parameter of type {ty}").into()
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Int(v) => {
                if *ty == Type::INT2 {
                    i16::try_from(*v)?.to_sql(ty, out)
                } else if *ty == Type::INT4 {
                    i32::try_from(*v)?.to_sql(ty, out)
                } else if *ty == Type::INT8 {
                    v.to_sql(ty, out)
                } else if <String as ToSql>::accepts(ty) {
                    v.to_string().to_sql(ty, out)
                } else {
                    Err(mismatch(self, ty))
                }
            }
            Value::Text(s) => {
                if <String as ToSql>::accepts(ty) {
                    s.to_sql(ty, out)
                } else {
                    Err(mismatch(self, ty))
                }
            }
            Value::Timestamp(ts) => {
                if *ty == Type::TIMESTAMPTZ {
                    ts.to_sql(ty, out)
                } else if *ty == Type::TIMESTAMP {
                    ts.naive_utc().to_sql(ty, out)
                } else if *ty == Type::DATE {
                    ts.date_naive().to_sql(ty, out)
                } else if <String as ToSql>::accepts(ty) {
                    iso8601(ts).to_sql(ty, out)
                } else {
                    Err(mismatch(self, ty))
                }
            }
        }
    }

    fn accepts(ty: &Type) -> bool {
        <i64 as ToSql>::accepts(ty)
            || <i32 as ToSql>::accepts(ty)
            || <i16 as ToSql>::accepts(ty)
            || <String as ToSql>::accepts(ty)
            || <DateTime<Utc> as ToSql>::accepts(ty)
            || <NaiveDateTime as ToSql>::accepts(ty)
            || <chrono::NaiveDate as ToSql>::accepts(ty)
    }

    to_sql_checked!();
}
