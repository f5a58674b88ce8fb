use chrono::{DateTime, Duration, Utc};

use super::deadline::Deadline;
use super::tiered::TieredCollection;
use super::Tiers;
use crate::error::Result;

/// The user's deadlines, persisted apart from events.
pub struct DeadlineStore {
    deadlines: TieredCollection<Deadline>,
}

impl DeadlineStore {
    pub fn new(tiers: Tiers) -> Self {
        Self {
            deadlines: TieredCollection::new(tiers),
        }
    }

    /// All deadlines, ascending by due date.
    pub fn get_all(&self) -> Vec<Deadline> {
        self.deadlines.get_all()
    }

    pub fn add(&self, deadline: Deadline) -> Result<()> {
        self.deadlines.add(deadline)
    }

    pub fn add_multiple(&self, deadlines: Vec<Deadline>) -> Result<()> {
        self.deadlines.add_multiple(deadlines)
    }

    pub fn remove(&self, id: &str) -> Result<()> {
        self.deadlines.remove(id)
    }

    pub fn clear(&self) -> Result<()> {
        self.deadlines.clear()
    }

    /// Deadlines not yet past and due within `days` of `now`.
    pub fn due_within(&self, now: DateTime<Utc>, days: i64) -> Vec<Deadline> {
        let horizon = now + Duration::days(days);
        self.get_all()
            .into_iter()
            .filter(|d| d.due_date >= now && d.due_date <= horizon)
            .collect()
    }

    pub fn overdue(&self, now: DateTime<Utc>) -> Vec<Deadline> {
        self.get_all()
            .into_iter()
            .filter(|d| d.is_overdue(now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{NotificationBus, Topic};
    use crate::planner::Priority;
    use crate::storage::MemoryCache;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn windows_and_overdue() {
        let bus = NotificationBus::new();
        let store = DeadlineStore::new(Tiers::local_only(Arc::new(MemoryCache::new()), bus));
        let now = Utc::now();
        let past = Deadline::new("past", now - Duration::days(1), Priority::Low);
        let soon = Deadline::new("soon", now + Duration::days(2), Priority::High);
        let far = Deadline::new("far", now + Duration::days(30), Priority::Medium);
        for d in [far.clone(), past.clone(), soon.clone()] {
            store.add(d).unwrap();
        }

        assert_eq!(store.get_all(), vec![past.clone(), soon.clone(), far]);
        assert_eq!(store.due_within(now, 7), vec![soon]);
        assert_eq!(store.overdue(now), vec![past]);
    }

    #[test]
    fn publishes_on_its_own_topic() {
        let bus = NotificationBus::new();
        let deadline_hits = Arc::new(AtomicUsize::new(0));
        let event_hits = Arc::new(AtomicUsize::new(0));
        let d = Arc::clone(&deadline_hits);
        bus.subscribe(Topic::DeadlinesUpdated, move |_| {
            d.fetch_add(1, Ordering::SeqCst);
        });
        let e = Arc::clone(&event_hits);
        bus.subscribe(Topic::EventsUpdated, move |_| {
            e.fetch_add(1, Ordering::SeqCst);
        });

        let store = DeadlineStore::new(Tiers::local_only(Arc::new(MemoryCache::new()), bus));
        store
            .add(Deadline::new("x", Utc::now(), Priority::Medium))
            .unwrap();
        assert_eq!(deadline_hits.load(Ordering::SeqCst), 1);
        assert_eq!(event_hits.load(Ordering::SeqCst), 0);
    }
}
