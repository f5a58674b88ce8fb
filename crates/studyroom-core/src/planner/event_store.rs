use chrono::{DateTime, NaiveDate, Utc};

use super::event::Event;
use super::tiered::TieredCollection;
use super::Tiers;
use crate::error::Result;
use crate::import::normalize_import;

/// The user's calendar events.
pub struct EventStore {
    events: TieredCollection<Event>,
}

impl EventStore {
    pub fn new(tiers: Tiers) -> Self {
        Self {
            events: TieredCollection::new(tiers),
        }
    }

    /// All events, ascending by date. Remote when it answers with rows,
    /// local cache otherwise.
    pub fn get_all(&self) -> Vec<Event> {
        self.events.get_all()
    }

    pub fn add(&self, event: Event) -> Result<()> {
        self.events.add(event)
    }

    pub fn add_multiple(&self, events: Vec<Event>) -> Result<()> {
        self.events.add_multiple(events)
    }

    pub fn remove(&self, id: &str) -> Result<()> {
        self.events.remove(id)
    }

    /// Account-level reset.
    pub fn clear(&self) -> Result<()> {
        self.events.clear()
    }

    /// Normalize an ICS file and store every event in it.
    ///
    /// A parse failure leaves the store untouched.
    pub fn import_ics(&self, contents: &str) -> Result<Vec<Event>> {
        let events = normalize_import(contents)?;
        self.events.add_multiple(events.clone())?;
        Ok(events)
    }

    /// Next `limit` events at or after `now`.
    pub fn upcoming(&self, now: DateTime<Utc>, limit: usize) -> Vec<Event> {
        self.get_all()
            .into_iter()
            .filter(|e| e.date >= now)
            .take(limit)
            .collect()
    }

    /// Events falling on a local calendar date.
    pub fn on_date(&self, date: NaiveDate) -> Vec<Event> {
        self.get_all()
            .into_iter()
            .filter(|e| e.local_date() == date)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{NotificationBus, Topic};
    use crate::planner::EventKind;
    use crate::storage::{keys, LocalCache, MemoryCache};
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn local_store() -> (EventStore, Arc<MemoryCache>, NotificationBus) {
        let cache = Arc::new(MemoryCache::new());
        let bus = NotificationBus::new();
        let store = EventStore::new(Tiers::local_only(cache.clone(), bus.clone()));
        (store, cache, bus)
    }

    #[test]
    fn add_and_remove_locally() {
        let (store, _, _) = local_store();
        let now = Utc::now();
        let later = Event::new("Later", now + Duration::days(2), EventKind::Event);
        let sooner = Event::new("Sooner", now + Duration::days(1), EventKind::Exam);
        store.add(later.clone()).unwrap();
        store.add(sooner.clone()).unwrap();

        let all = store.get_all();
        assert_eq!(all, vec![sooner.clone(), later.clone()]);

        store.remove(&sooner.id).unwrap();
        assert_eq!(store.get_all(), vec![later]);
    }

    #[test]
    fn re_adding_an_id_replaces_it() {
        let (store, _, _) = local_store();
        let mut event = Event::new("Draft", Utc::now(), EventKind::Assignment);
        store.add(event.clone()).unwrap();
        event.title = "Final".into();
        store.add(event.clone()).unwrap();
        assert_eq!(store.get_all(), vec![event]);
    }

    #[test]
    fn every_write_publishes() {
        let (store, _, bus) = local_store();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        bus.subscribe(Topic::EventsUpdated, move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });

        let event = Event::new("A", Utc::now(), EventKind::Event);
        store.add(event.clone()).unwrap();
        store.remove(&event.id).unwrap();
        store.clear().unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn corrupt_cache_reads_empty_and_is_reset_on_write() {
        let (store, cache, _) = local_store();
        cache.set(keys::EVENTS, "[{\"broken\":").unwrap();
        assert!(store.get_all().is_empty());

        store
            .add(Event::new("Fresh", Utc::now(), EventKind::Event))
            .unwrap();
        assert_eq!(store.get_all().len(), 1);
    }

    #[test]
    fn malformed_import_leaves_store_untouched() {
        let (store, cache, _) = local_store();
        store
            .add(Event::new("Existing", Utc::now(), EventKind::Event))
            .unwrap();
        let before = cache.get(keys::EVENTS).unwrap();

        assert!(store.import_ics("definitely not ics").is_err());
        assert_eq!(cache.get(keys::EVENTS).unwrap(), before);
        assert_eq!(store.get_all().len(), 1);
    }

    #[test]
    fn upcoming_skips_past_and_limits() {
        let (store, _, _) = local_store();
        let now = Utc::now();
        for offset in [-2, 1, 2, 3] {
            store
                .add(Event::new(
                    format!("d{offset}"),
                    now + Duration::days(offset),
                    EventKind::Event,
                ))
                .unwrap();
        }
        let titles: Vec<String> = store.upcoming(now, 2).into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["d1", "d2"]);
    }

    #[test]
    fn on_date_matches_local_calendar_day() {
        let (store, _, _) = local_store();
        let event = Event::new("Today", Utc::now(), EventKind::Event);
        let date = event.local_date();
        store.add(event).unwrap();
        assert_eq!(store.on_date(date).len(), 1);
        assert!(store.on_date(date + Duration::days(1)).is_empty());
    }
}
