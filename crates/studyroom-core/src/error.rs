//! Core error types for studyroom-core.
//!
//! This module defines the error hierarchy using thiserror. Only
//! [`ParseError`] is ever surfaced from a user-initiated action; remote
//! failures are absorbed by the stores and local-cache corruption degrades
//! to "no data".

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studyroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Local database errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Calendar import could not be parsed
    #[error("Import error: {0}")]
    Parse(#[from] ParseError),

    /// Remote tier failure
    #[error("Remote store error: {0}")]
    Remote(#[from] RemoteError),

    /// Row did not match the expected schema
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A local cache entry could not be decoded
    #[error("Corrupt cache entry '{key}': {source}")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// The connection mutex was poisoned by a panicking writer
    #[error("Database connection poisoned")]
    Poisoned,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Calendar import errors. Fatal to the import that raised them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input has no VCALENDAR block at all
    #[error("input is not an iCalendar file")]
    NotACalendar,

    /// The iCalendar grammar rejected the input
    #[error("malformed iCalendar data: {0}")]
    Malformed(String),

    /// A VEVENT lacks a required property
    #[error("event #{index} is missing {property}")]
    MissingProperty { index: usize, property: &'static str },

    /// DTSTART could not be read as a date or date-time
    #[error("event #{index} has an unreadable start '{value}'")]
    InvalidStart { index: usize, value: String },
}

/// Remote tier errors. Logged and absorbed by the stores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Network failure or backend down
    #[error("remote unavailable: {0}")]
    Unavailable(String),

    /// Session rejected by the backend
    #[error("not authorized")]
    Unauthorized,

    /// Row with the same key already exists
    #[error("conflict: {0}")]
    Conflict(String),

    /// Request refused for any other reason
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Row <-> record mapping errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("{table}: missing field '{field}'")]
    MissingField { table: &'static str, field: &'static str },

    #[error("{table}: invalid field '{field}': {message}")]
    InvalidField {
        table: &'static str,
        field: &'static str,
        message: String,
    },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Terms of a region overlap or are out of order
    #[error("{region}: term '{later}' does not start after '{earlier}' ends")]
    OverlappingTerms {
        region: String,
        earlier: String,
        later: String,
    },

    /// A term ends before it starts
    #[error("{region}: term '{label}' ends before it starts")]
    InvertedTerm { region: String, label: String },

    /// Region code not present in the term calendar
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) if e.code == rusqlite::ErrorCode::DatabaseLocked => {
                DatabaseError::Locked
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
