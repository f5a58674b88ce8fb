//! Dual-tier collection: remote authoritative when it answers, local cache
//! always.
//!
//! ## Read path
//!
//! ```text
//! signed in + remote configured ── select ──> Ok(non-empty) ──> remote rows (+ outbox overlay)
//!                                  │
//!                                  └──> Err / empty ──────────> local snapshot
//! anonymous / no remote ─────────────────────────────────────> local snapshot
//! ```
//!
//! ## Write path
//!
//! 1. [`TieredCollection::write_remote_best_effort`]: failures are logged and
//!    parked in the outbox, never returned.
//! 2. Re-read the full list, apply the change, then
//!    [`TieredCollection::write_local_authoritative`] overwrites the whole
//!    snapshot and publishes the collection's topic.
//!
//! There is no locking around the read-modify-write; all writers share one
//! logical thread.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::outbox::{Outbox, PendingOp, PendingWrite};
use super::record::Record;
use super::Tiers;
use crate::error::{CoreError, RemoteError, Result};
use crate::remote::{Filter, RemoteStore, Row};

/// One change to apply to a collection.
#[derive(Debug, Clone)]
pub enum Change<T> {
    Upsert(T),
    Remove(String),
}

impl<T: Record> Change<T> {
    fn id(&self) -> &str {
        match self {
            Change::Upsert(item) => item.id(),
            Change::Remove(id) => id,
        }
    }
}

/// What happened on the remote leg of a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteWrite {
    /// No user signed in, or no remote configured.
    Skipped,
    Applied,
    /// At least one change failed and was parked in the outbox.
    Queued,
}

pub struct TieredCollection<T> {
    tiers: Tiers,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> TieredCollection<T> {
    pub fn new(tiers: Tiers) -> Self {
        Self {
            tiers,
            _record: PhantomData,
        }
    }

    fn remote_session(&self) -> Option<(Arc<dyn RemoteStore>, String)> {
        let user = self.tiers.session.user_id()?;
        match &self.tiers.remote {
            Some(remote) => Some((Arc::clone(remote), user)),
            None => {
                debug!(table = T::TABLE, "signed in but no remote configured");
                None
            }
        }
    }

    // ── Read ─────────────────────────────────────────────────────────

    /// Every record, ascending by sort key.
    pub fn get_all(&self) -> Vec<T> {
        if let Some((remote, user)) = self.remote_session() {
            match self.read_remote(remote.as_ref(), &user) {
                Ok(Some(items)) => return items,
                Ok(None) => {
                    debug!(table = T::TABLE, "remote returned no rows; using local cache")
                }
                Err(e) => warn!(table = T::TABLE, error = %e, "remote read failed; using local cache"),
            }
        }
        self.read_local()
    }

    /// `Ok(None)` when the remote answered with zero rows.
    fn read_remote(&self, remote: &dyn RemoteStore, user: &str) -> Result<Option<Vec<T>>> {
        let rows = remote.select(T::TABLE, &Filter::eq("user_id", user))?;
        let mut items = rows
            .iter()
            .map(T::from_row)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // The remote answered, so this is a reconnect point for parked writes.
        let pending = self.replay_outbox(remote, user);

        if rows.is_empty() {
            return Ok(None);
        }

        for write in &pending {
            items.retain(|item| item.id() != write.id);
            if let PendingOp::Upsert { row } = &write.op {
                items.push(T::from_row(row)?);
            }
        }
        items.sort_by_key(T::sort_key);
        Ok(Some(items))
    }

    /// Local snapshot. Corrupt or unreadable cache entries read as empty.
    pub fn read_local(&self) -> Vec<T> {
        let json = match self.tiers.cache.get(T::CACHE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = T::CACHE_KEY, error = %e, "local cache unreadable");
                return Vec::new();
            }
        };
        match serde_json::from_str(&json) {
            Ok(items) => items,
            Err(source) => {
                let err = CoreError::Deserialization {
                    key: T::CACHE_KEY.to_string(),
                    source,
                };
                warn!(error = %err, "treating corrupt cache entry as empty");
                Vec::new()
            }
        }
    }

    /// Replay this user's parked writes. Returns the writes that were
    /// pending before the replay, so callers can overlay them on rows
    /// fetched earlier.
    fn replay_outbox(&self, remote: &dyn RemoteStore, user: &str) -> Vec<PendingWrite> {
        let cache = self.tiers.cache.as_ref();
        let mut outbox = Outbox::load(cache, T::CACHE_KEY);
        let pending: Vec<PendingWrite> = outbox.for_user(user).cloned().collect();
        if pending.is_empty() {
            return pending;
        }

        let before = outbox.len();
        outbox.retain(|write| {
            if write.user_id != user {
                return true;
            }
            let result = match &write.op {
                PendingOp::Upsert { row } => upsert_row::<T>(remote, &write.id, user, row.clone()),
                PendingOp::Remove => remote.delete(T::TABLE, &id_filter(&write.id, user)).map(drop),
            };
            match result {
                Ok(()) => false,
                Err(e) => {
                    debug!(table = T::TABLE, id = %write.id, error = %e, "replay deferred");
                    true
                }
            }
        });

        if outbox.len() != before {
            debug!(table = T::TABLE, replayed = before - outbox.len(), "outbox replayed");
            if let Err(e) = outbox.save(cache) {
                warn!(table = T::TABLE, error = %e, "failed to persist outbox");
            }
        }
        pending
    }

    // ── Write ────────────────────────────────────────────────────────

    pub fn add(&self, item: T) -> Result<()> {
        self.apply(vec![Change::Upsert(item)])
    }

    pub fn add_multiple(&self, items: Vec<T>) -> Result<()> {
        self.apply(items.into_iter().map(Change::Upsert).collect())
    }

    pub fn remove(&self, id: &str) -> Result<()> {
        self.apply(vec![Change::Remove(id.to_string())])
    }

    /// Apply changes to both tiers and notify observers.
    pub fn apply(&self, changes: Vec<Change<T>>) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }
        if self.write_remote_best_effort(&changes) == RemoteWrite::Queued {
            debug!(table = T::TABLE, "remote leg parked; local write proceeds");
        }

        let mut snapshot = self.get_all();
        for change in changes {
            snapshot.retain(|item| item.id() != change.id());
            if let Change::Upsert(item) = change {
                snapshot.push(item);
            }
        }
        self.write_local_authoritative(snapshot)
    }

    /// Drop every record for the signed-in account and the local snapshot.
    pub fn clear(&self) -> Result<()> {
        if let Some((remote, user)) = self.remote_session() {
            let cache = self.tiers.cache.as_ref();
            let mut outbox = Outbox::load(cache, T::CACHE_KEY);
            outbox.clear_user(&user);
            if let Err(e) = remote.delete(T::TABLE, &Filter::eq("user_id", user.as_str())) {
                warn!(table = T::TABLE, error = %e, "remote clear failed; queued removals");
                for item in self.read_local() {
                    outbox.push(pending(item.id(), &user, PendingOp::Remove));
                }
            }
            outbox.save(cache)?;
        }
        self.write_local_authoritative(Vec::new())
    }

    /// Remote leg of a write. Never fails: errors are logged and parked.
    pub fn write_remote_best_effort(&self, changes: &[Change<T>]) -> RemoteWrite {
        let Some((remote, user)) = self.remote_session() else {
            return RemoteWrite::Skipped;
        };
        let cache = self.tiers.cache.as_ref();
        let mut outbox = Outbox::load(cache, T::CACHE_KEY);
        let mut queued = false;

        let upserts: Vec<(&str, Row)> = changes
            .iter()
            .filter_map(|c| match c {
                Change::Upsert(item) => Some((item.id(), item.to_row(&user))),
                Change::Remove(_) => None,
            })
            .collect();
        if !upserts.is_empty() {
            let rows = upserts.iter().map(|(_, row)| row.clone()).collect();
            match remote.insert(T::TABLE, rows) {
                Ok(()) => {
                    for (id, _) in &upserts {
                        outbox.discard(id);
                    }
                }
                // Some ids already exist remotely: fall back to one upsert per row.
                Err(RemoteError::Conflict(_)) => {
                    for (id, row) in upserts {
                        match upsert_row::<T>(remote.as_ref(), id, &user, row.clone()) {
                            Ok(()) => {
                                outbox.discard(id);
                            }
                            Err(e) => {
                                warn!(table = T::TABLE, id = %id, error = %e, "remote upsert failed");
                                queued = true;
                                outbox.push(pending(id, &user, PendingOp::Upsert { row }));
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(table = T::TABLE, count = upserts.len(), error = %e, "remote insert failed");
                    queued = true;
                    for (id, row) in upserts {
                        outbox.push(pending(id, &user, PendingOp::Upsert { row }));
                    }
                }
            }
        }

        for change in changes {
            let Change::Remove(id) = change else { continue };
            match remote.delete(T::TABLE, &id_filter(id, &user)) {
                Ok(_) => {
                    outbox.discard(id);
                }
                Err(e) => {
                    warn!(table = T::TABLE, id = %id, error = %e, "remote delete failed");
                    queued = true;
                    outbox.push(pending(id, &user, PendingOp::Remove));
                }
            }
        }

        if let Err(e) = outbox.save(cache) {
            warn!(table = T::TABLE, error = %e, "failed to persist outbox");
        }
        if queued {
            RemoteWrite::Queued
        } else {
            RemoteWrite::Applied
        }
    }

    /// Local leg of a write: overwrite the full snapshot, then publish.
    pub fn write_local_authoritative(&self, mut items: Vec<T>) -> Result<()> {
        items.sort_by_key(T::sort_key);
        let json = serde_json::to_string(&items)?;
        self.tiers.cache.set(T::CACHE_KEY, &json)?;
        self.tiers.bus.publish(T::TOPIC);
        Ok(())
    }
}

/// Insert `row`, or overwrite the existing row with the same id.
fn upsert_row<T: Record>(
    remote: &dyn RemoteStore,
    id: &str,
    user: &str,
    row: Row,
) -> std::result::Result<(), RemoteError> {
    match remote.insert(T::TABLE, vec![row.clone()]) {
        Err(RemoteError::Conflict(_)) => remote.update(T::TABLE, &id_filter(id, user), row).map(drop),
        other => other,
    }
}

fn id_filter(id: &str, user: &str) -> Filter {
    Filter::eq("id", id).and_eq("user_id", user)
}

fn pending(id: &str, user: &str, op: PendingOp) -> PendingWrite {
    PendingWrite {
        id: id.to_string(),
        user_id: user.to_string(),
        op,
        queued_at: Utc::now(),
    }
}
