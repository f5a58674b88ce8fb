//! In-process remote store.
//!
//! Behaves like a small row database with a primary key column `id`. It can
//! be switched offline, or told to fail specific operations, to exercise
//! the fallback paths of the stores.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use super::{Filter, RemoteStore, Row};
use crate::error::RemoteError;

/// Operation kinds that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    Select,
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Default)]
struct State {
    tables: HashMap<String, Vec<Row>>,
    offline: bool,
    failing: HashSet<RemoteOp>,
    calls: Vec<(RemoteOp, String)>,
}

#[derive(Debug, Default)]
pub struct MemoryRemote {
    state: Mutex<State>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with `Unavailable` while offline.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Make one kind of operation fail (or succeed again).
    pub fn set_failing(&self, op: RemoteOp, failing: bool) {
        let mut state = self.lock();
        if failing {
            state.failing.insert(op);
        } else {
            state.failing.remove(&op);
        }
    }

    /// Rows currently stored in `table`, bypassing failure injection.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.lock().tables.get(table).cloned().unwrap_or_default()
    }

    /// Operations attempted so far, in order.
    pub fn calls(&self) -> Vec<(RemoteOp, String)> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn begin(&self, op: RemoteOp, table: &str) -> Result<MutexGuard<'_, State>, RemoteError> {
        let mut state = self.lock();
        state.calls.push((op, table.to_string()));
        if state.offline {
            return Err(RemoteError::Unavailable("offline".into()));
        }
        if state.failing.contains(&op) {
            return Err(RemoteError::Unavailable(format!("{op:?} failed")));
        }
        Ok(state)
    }
}

impl RemoteStore for MemoryRemote {
    fn select(&self, table: &str, filter: &Filter) -> Result<Vec<Row>, RemoteError> {
        let state = self.begin(RemoteOp::Select, table)?;
        Ok(state
            .tables
            .get(table)
            .map(|rows| rows.iter().filter(|r| filter.matches(r)).cloned().collect())
            .unwrap_or_default())
    }

    fn insert(&self, table: &str, rows: Vec<Row>) -> Result<(), RemoteError> {
        let mut state = self.begin(RemoteOp::Insert, table)?;
        let existing = state.tables.entry(table.to_string()).or_default();

        let mut seen: HashSet<&serde_json::Value> = existing.iter().filter_map(|r| r.get("id")).collect();
        for row in &rows {
            if let Some(id) = row.get("id") {
                if !seen.insert(id) {
                    return Err(RemoteError::Conflict(format!("duplicate id {id}")));
                }
            }
        }
        existing.extend(rows);
        Ok(())
    }

    fn update(&self, table: &str, filter: &Filter, patch: Row) -> Result<usize, RemoteError> {
        let mut state = self.begin(RemoteOp::Update, table)?;
        let mut updated = 0;
        if let Some(rows) = state.tables.get_mut(table) {
            for row in rows.iter_mut().filter(|r| filter.matches(r)) {
                for (k, v) in &patch {
                    row.insert(k.clone(), v.clone());
                }
                updated += 1;
            }
        }
        Ok(updated)
    }

    fn delete(&self, table: &str, filter: &Filter) -> Result<usize, RemoteError> {
        let mut state = self.begin(RemoteOp::Delete, table)?;
        let Some(rows) = state.tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|r| !filter.matches(r));
        Ok(before - rows.len())
    }
}
