//! Resumable study/break countdown.
//!
//! [`TimerState`] is a plain value with pure transitions; [`TimerStore`]
//! persists it in the local cache and reconciles wall-clock drift on every
//! read, so a countdown survives the process exiting mid-phase.

mod state;
mod store;

pub use state::{Phase, TimerSettings, TimerState};
pub use store::{TickOutcome, TimerStore};
