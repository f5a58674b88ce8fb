//! Events and deadlines with dual-tier persistence.
//!
//! Both collections share one read/write protocol ([`TieredCollection`]);
//! [`EventStore`] and [`DeadlineStore`] are typed façades over it with
//! their own tables, cache keys and notification topics.

mod deadline;
mod deadline_store;
mod event;
mod event_store;
pub mod outbox;
pub mod record;
pub mod tiered;

pub use deadline::{Deadline, Priority};
pub use deadline_store::DeadlineStore;
pub use event::{Event, EventKind, EventSource};
pub use event_store::EventStore;
pub use record::Record;
pub use tiered::{Change, RemoteWrite, TieredCollection};

use std::sync::Arc;

use crate::events::NotificationBus;
use crate::remote::RemoteStore;
use crate::session::{Session, SessionProvider};
use crate::storage::LocalCache;

/// Shared handles every store needs: both persistence tiers, the session,
/// and the notification bus.
#[derive(Clone)]
pub struct Tiers {
    pub cache: Arc<dyn LocalCache>,
    pub remote: Option<Arc<dyn RemoteStore>>,
    pub session: Arc<dyn SessionProvider>,
    pub bus: NotificationBus,
}

impl Tiers {
    /// Local cache only, nobody signed in.
    pub fn local_only(cache: Arc<dyn LocalCache>, bus: NotificationBus) -> Self {
        Self {
            cache,
            remote: None,
            session: Arc::new(Session::anonymous()),
            bus,
        }
    }

    pub fn with_remote(mut self, remote: Arc<dyn RemoteStore>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_session(mut self, session: Arc<dyn SessionProvider>) -> Self {
        self.session = session;
        self
    }
}
