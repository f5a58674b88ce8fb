//! Two-way schema between stored records and remote rows.
//!
//! Every persisted collection declares its table, cache key and topic here,
//! and maps itself to and from a [`Row`] explicitly. Format drift shows up
//! as a [`SchemaError`] at this boundary instead of deep inside a store.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::SchemaError;
use crate::events::Topic;
use crate::remote::Row;

pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Remote table name.
    const TABLE: &'static str;
    /// Local cache key holding the full snapshot.
    const CACHE_KEY: &'static str;
    /// Topic published after every write.
    const TOPIC: Topic;

    fn id(&self) -> &str;

    /// Snapshots are kept in ascending order of this key.
    fn sort_key(&self) -> DateTime<Utc>;

    fn to_row(&self, user_id: &str) -> Row;

    fn from_row(row: &Row) -> Result<Self, SchemaError>;
}

pub(crate) fn str_field(
    row: &Row,
    table: &'static str,
    field: &'static str,
) -> Result<String, SchemaError> {
    match row.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        None | Some(Value::Null) => Err(SchemaError::MissingField { table, field }),
        Some(other) => Err(SchemaError::InvalidField {
            table,
            field,
            message: format!("expected string, got {other}"),
        }),
    }
}

pub(crate) fn opt_str_field(
    row: &Row,
    table: &'static str,
    field: &'static str,
) -> Result<Option<String>, SchemaError> {
    match row.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => str_field(row, table, field).map(Some),
    }
}

pub(crate) fn time_field(
    row: &Row,
    table: &'static str,
    field: &'static str,
) -> Result<DateTime<Utc>, SchemaError> {
    let raw = str_field(row, table, field)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SchemaError::InvalidField {
            table,
            field,
            message: e.to_string(),
        })
}

pub(crate) fn enum_field<E>(
    row: &Row,
    table: &'static str,
    field: &'static str,
) -> Result<E, SchemaError>
where
    E: FromStr<Err = String>,
{
    str_field(row, table, field)?
        .parse()
        .map_err(|message| SchemaError::InvalidField {
            table,
            field,
            message,
        })
}

pub(crate) fn opt_value(value: &Option<String>) -> Value {
    value.clone().map_or(Value::Null, Value::String)
}
