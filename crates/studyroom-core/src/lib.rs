//! # Studyroom Core Library
//!
//! Core logic for the Studyroom student planner. Everything the CLI can do
//! goes through this crate; the binary only parses arguments and prints.
//!
//! ## Architecture
//!
//! - **Term calendar**: built-in school term tables per region and a
//!   resolver from any calendar date to "Term N, Week W"
//! - **Planner**: events and deadlines persisted across two tiers, an
//!   optional authoritative remote store and an always-present local cache
//! - **Import**: iCalendar files normalized into planner events
//! - **Timer**: a resumable study/break countdown that reconciles elapsed
//!   wall-clock time on every read
//! - **Storage**: SQLite-backed local cache and TOML configuration
//!
//! ## Key Components
//!
//! - [`TermCalendar`] / [`resolve_term`]: term and week lookup
//! - [`EventStore`] / [`DeadlineStore`]: dual-tier collections
//! - [`TimerStore`]: timer persistence with drift correction
//! - [`NotificationBus`]: change notification fan-out
//! - [`Database`]: local cache persistence

pub mod error;
pub mod events;
pub mod import;
pub mod planner;
pub mod remote;
pub mod session;
pub mod stats;
pub mod storage;
pub mod term;
pub mod timer;

pub use error::{
    ConfigError, CoreError, DatabaseError, ParseError, RemoteError, SchemaError, ValidationError,
};
pub use events::{Notification, NotificationBus, Subscription, Topic};
pub use import::normalize_import;
pub use planner::{Deadline, DeadlineStore, Event, EventKind, EventSource, EventStore, Priority, Tiers};
pub use remote::{Filter, MemoryRemote, RemoteStore, Row};
pub use session::{Session, SessionProvider};
pub use stats::{StatsStore, StudyStats};
pub use storage::{Config, Database, LocalCache, MemoryCache};
pub use term::{next_term, resolve_term, Region, Term, TermCalendar, TermInfo};
pub use timer::{Phase, TickOutcome, TimerSettings, TimerState, TimerStore};
