//! Process-wide change notification.
//!
//! Every write-side store operation publishes on a named topic once
//! persistence has completed. Observers (calendar widgets, deadline lists,
//! the CLI) subscribe for their own lifetime and release the subscription
//! explicitly on teardown.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named notification topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Topic {
    EventsUpdated,
    DeadlinesUpdated,
    StatsUpdated,
}

impl Topic {
    /// Wire name of the topic.
    pub fn name(&self) -> &'static str {
        match self {
            Topic::EventsUpdated => "eventsUpdated",
            Topic::DeadlinesUpdated => "deadlinesUpdated",
            Topic::StatsUpdated => "statsUpdated",
        }
    }
}

/// Payload delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub topic: Topic,
    pub at: DateTime<Utc>,
}

type Callback = Arc<dyn Fn(&Notification) + Send + Sync>;

/// Handle returned by [`NotificationBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: u64,
    topic: Topic,
}

impl Subscription {
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    subscribers: HashMap<Topic, Vec<(u64, Callback)>>,
}

/// Publish/subscribe service with named topics.
///
/// Clones share the same subscriber table, so one bus created at startup
/// can be handed to every store.
#[derive(Clone, Default)]
pub struct NotificationBus {
    inner: Arc<Mutex<BusInner>>,
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, topic: Topic, callback: F) -> Subscription
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner
            .subscribers
            .entry(topic)
            .or_default()
            .push((id, Arc::new(callback)));
        Subscription { id, topic }
    }

    /// Release a subscription. Returns `false` if it was already released.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut inner = self.lock();
        let Some(list) = inner.subscribers.get_mut(&subscription.topic) else {
            return false;
        };
        let before = list.len();
        list.retain(|(id, _)| *id != subscription.id);
        before != list.len()
    }

    /// Deliver a notification to every current subscriber of `topic`.
    ///
    /// Callbacks run after the subscriber table is unlocked, so a callback
    /// may subscribe, unsubscribe or publish. Returns the number of
    /// callbacks invoked.
    pub fn publish(&self, topic: Topic) -> usize {
        let callbacks: Vec<Callback> = {
            let inner = self.lock();
            inner
                .subscribers
                .get(&topic)
                .map(|list| list.iter().map(|(_, cb)| Arc::clone(cb)).collect())
                .unwrap_or_default()
        };

        let notification = Notification {
            topic,
            at: Utc::now(),
        };
        tracing::debug!(topic = topic.name(), subscribers = callbacks.len(), "publish");
        for cb in &callbacks {
            cb(&notification);
        }
        callbacks.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.values().map(Vec::len).sum()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BusInner> {
        // Callbacks never run under this lock; a poisoned table is still consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
