//! Persisted record of remote writes that did not land.
//!
//! Entries are keyed by record id; a newer operation on the same id
//! replaces the older one. The outbox lives in the local cache next to the
//! collection snapshot it belongs to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::remote::Row;
use crate::storage::LocalCache;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingOp {
    Upsert { row: Row },
    Remove,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingWrite {
    pub id: String,
    /// Account the write was made under; replayed only for that account.
    pub user_id: String,
    pub op: PendingOp,
    pub queued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outbox {
    key: String,
    entries: Vec<PendingWrite>,
}

impl Outbox {
    /// Load the outbox for a collection. A corrupt entry reads as empty.
    pub fn load(cache: &dyn LocalCache, collection_key: &str) -> Self {
        let key = format!("{collection_key}.outbox");
        let entries = match cache.get(&key) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(key = %key, error = %e, "discarding corrupt outbox");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "outbox unreadable");
                Vec::new()
            }
        };
        Self { key, entries }
    }

    pub fn save(&self, cache: &dyn LocalCache) -> Result<()> {
        if self.entries.is_empty() {
            return cache.remove(&self.key);
        }
        cache.set(&self.key, &serde_json::to_string(&self.entries)?)
    }

    pub fn push(&mut self, write: PendingWrite) {
        self.entries.retain(|w| w.id != write.id);
        self.entries.push(write);
    }

    /// Forget any pending write for `id`. Returns whether one existed.
    pub fn discard(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|w| w.id != id);
        before != self.entries.len()
    }

    pub fn clear_user(&mut self, user_id: &str) {
        self.entries.retain(|w| w.user_id != user_id);
    }

    pub fn for_user<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a PendingWrite> + 'a {
        self.entries.iter().filter(move |w| w.user_id == user_id)
    }

    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&PendingWrite) -> bool,
    {
        self.entries.retain(f);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
