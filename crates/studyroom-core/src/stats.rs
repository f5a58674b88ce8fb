//! Aggregate study statistics, kept in the local cache only.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::events::{NotificationBus, Topic};
use crate::storage::{keys, LocalCache};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStats {
    pub sessions_completed: u32,
    /// Total study time in seconds.
    pub study_seconds: u64,
    #[serde(default)]
    pub last_session_at: Option<DateTime<Utc>>,
}

impl StudyStats {
    pub fn study_minutes(&self) -> u64 {
        self.study_seconds / 60
    }

    /// Mean session length in seconds, if any session was recorded.
    pub fn average_session_secs(&self) -> Option<u64> {
        (self.sessions_completed > 0).then(|| self.study_seconds / u64::from(self.sessions_completed))
    }
}

pub struct StatsStore {
    cache: Arc<dyn LocalCache>,
    bus: NotificationBus,
}

impl StatsStore {
    pub fn new(cache: Arc<dyn LocalCache>, bus: NotificationBus) -> Self {
        Self { cache, bus }
    }

    /// Current totals. Missing or corrupt data reads as zero.
    pub fn load(&self) -> StudyStats {
        match self.cache.get(keys::STATS) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!(error = %e, "corrupt stats entry; starting from zero");
                StudyStats::default()
            }),
            Ok(None) => StudyStats::default(),
            Err(e) => {
                warn!(error = %e, "stats unreadable");
                StudyStats::default()
            }
        }
    }

    /// Add one completed study session of `seconds`.
    pub fn record_study_session(&self, seconds: u64, at: DateTime<Utc>) -> Result<StudyStats> {
        let mut stats = self.load();
        stats.sessions_completed += 1;
        stats.study_seconds += seconds;
        stats.last_session_at = Some(at);
        self.write(&stats)?;
        Ok(stats)
    }

    pub fn reset(&self) -> Result<()> {
        self.cache.remove(keys::STATS)?;
        self.bus.publish(Topic::StatsUpdated);
        Ok(())
    }

    fn write(&self, stats: &StudyStats) -> Result<()> {
        self.cache.set(keys::STATS, &serde_json::to_string(stats)?)?;
        self.bus.publish(Topic::StatsUpdated);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryCache;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn records_accumulate() {
        let store = StatsStore::new(Arc::new(MemoryCache::new()), NotificationBus::new());
        assert_eq!(store.load(), StudyStats::default());
        assert_eq!(store.load().average_session_secs(), None);

        let at = Utc::now();
        store.record_study_session(1500, at).unwrap();
        let stats = store.record_study_session(900, at).unwrap();
        assert_eq!(stats.sessions_completed, 2);
        assert_eq!(stats.study_seconds, 2400);
        assert_eq!(stats.study_minutes(), 40);
        assert_eq!(stats.average_session_secs(), Some(1200));
        assert_eq!(stats.last_session_at, Some(at));
        assert_eq!(store.load(), stats);
    }

    #[test]
    fn writes_notify_and_reset_clears() {
        let bus = NotificationBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        bus.subscribe(Topic::StatsUpdated, move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        let store = StatsStore::new(Arc::new(MemoryCache::new()), bus);

        store.record_study_session(60, Utc::now()).unwrap();
        store.reset().unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(store.load(), StudyStats::default());
    }

    #[test]
    fn corrupt_entry_reads_as_zero() {
        let cache = Arc::new(MemoryCache::new());
        cache.set(keys::STATS, "nope").unwrap();
        let store = StatsStore::new(cache, NotificationBus::new());
        assert_eq!(store.load(), StudyStats::default());
    }
}
