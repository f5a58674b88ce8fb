//! Remote tier interface.
//!
//! The hosted database is consumed as a per-user, row-oriented store that
//! may fail at any call. Transport and authentication live behind the
//! trait; the stores only see rows and [`RemoteError`]s.

pub mod memory;

pub use memory::MemoryRemote;

use serde_json::Value;

use crate::error::RemoteError;

/// One table row: column name -> JSON value.
pub type Row = serde_json::Map<String, Value>;

/// Conjunction of column equality tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// Matches every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and_eq(column, value)
    }

    pub fn and_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    pub fn matches(&self, row: &Row) -> bool {
        self.conditions
            .iter()
            .all(|(column, value)| row.get(column) == Some(value))
    }
}

/// Abstract remote store. Every call may fail.
pub trait RemoteStore: Send + Sync {
    fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>, RemoteError>;

    fn insert(&self, table: &str, rows: Vec<Row>) -> Result<(), RemoteError>;

    /// Merge `patch` into every matching row. Returns the number updated.
    fn update(&self, table: &str, filter: &Filter, patch: Row) -> Result<usize, RemoteError>;

    /// Returns the number of rows deleted.
    fn delete(&self, table: &str, filter: &Filter) -> Result<usize, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_matches_all_conditions() {
        let row: Row = serde_json::from_value(json!({"id": "a", "user_id": "u1"})).unwrap();
        assert!(Filter::all().matches(&row));
        assert!(Filter::eq("user_id", "u1").matches(&row));
        assert!(Filter::eq("user_id", "u1").and_eq("id", "a").matches(&row));
        assert!(!Filter::eq("user_id", "u1").and_eq("id", "b").matches(&row));
        assert!(!Filter::eq("missing", "x").matches(&row));
    }
}
