//! Local persistence tier.
//!
//! The local cache is a plain key-value string store. Each logical
//! collection lives under one fixed key as a JSON document, so every write
//! replaces the whole snapshot.

mod config;
pub mod database;
pub mod memory;

pub use config::{AccountConfig, Config, TimerConfig};
pub use database::Database;
pub use memory::MemoryCache;

use std::path::PathBuf;

use crate::error::Result;

/// Fixed cache keys, one per logical collection.
pub mod keys {
    pub const EVENTS: &str = "events";
    pub const DEADLINES: &str = "deadlines";
    pub const TIMER_STATE: &str = "timer_state";
    pub const STATS: &str = "stats";
}

/// Key-value string store backing the local tier.
///
/// Implementations must be usable offline and never depend on the remote
/// tier being reachable.
pub trait LocalCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// Returns `~/.config/studyroom[-dev]/` based on STUDYROOM_ENV.
///
/// Set STUDYROOM_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STUDYROOM_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("studyroom-dev")
    } else {
        base_dir.join("studyroom")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
