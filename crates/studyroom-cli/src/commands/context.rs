use std::sync::Arc;

use studyroom_core::{
    Config, Database, DeadlineStore, EventStore, NotificationBus, Region, Session, StatsStore,
    Tiers, TimerStore,
};

/// Everything a command needs to reach the stores.
///
/// The CLI has no remote transport; a configured `account.user_id` only
/// marks the session as signed in.
pub struct Context {
    pub config: Config,
    db: Arc<Database>,
    session: Arc<Session>,
    bus: NotificationBus,
}

impl Context {
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let db = Arc::new(Database::open()?);
        let session = Arc::new(match &config.account.user_id {
            Some(id) => Session::signed_in(id.clone()),
            None => Session::anonymous(),
        });
        tracing::debug!(signed_in = config.account.user_id.is_some(), "context opened");
        Ok(Self {
            config,
            db,
            session,
            bus: NotificationBus::new(),
        })
    }

    fn tiers(&self) -> Tiers {
        Tiers::local_only(self.db.clone(), self.bus.clone()).with_session(self.session.clone())
    }

    pub fn events(&self) -> EventStore {
        EventStore::new(self.tiers())
    }

    pub fn deadlines(&self) -> DeadlineStore {
        DeadlineStore::new(self.tiers())
    }

    pub fn timer(&self) -> TimerStore {
        TimerStore::new(self.db.clone(), self.config.timer_settings())
    }

    pub fn stats(&self) -> StatsStore {
        StatsStore::new(self.db.clone(), self.bus.clone())
    }
}

/// Region from `--region`, falling back to the configured one.
pub fn region_or_configured(region: Option<Region>) -> Result<Region, Box<dyn std::error::Error>> {
    match region {
        Some(region) => Ok(region),
        None => Ok(Config::load()?.region.parse()?),
    }
}
