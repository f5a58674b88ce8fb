use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use super::state::{Phase, TimerSettings, TimerState};
use crate::error::Result;
use crate::storage::{keys, LocalCache};

/// Result of one [`TimerStore::tick_at`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting down.
    Running(TimerState),
    /// Not running; nothing changed.
    Idle(TimerState),
    /// The countdown reached zero and the timer moved to the next phase.
    PhaseCompleted { finished: Phase, state: TimerState },
}

impl TickOutcome {
    pub fn state(&self) -> &TimerState {
        match self {
            TickOutcome::Running(state)
            | TickOutcome::Idle(state)
            | TickOutcome::PhaseCompleted { state, .. } => state,
        }
    }
}

/// Timer persistence under the `timer_state` cache key.
///
/// Saving never publishes a notification: observers in the same process
/// would reload and save again in a loop.
pub struct TimerStore {
    cache: Arc<dyn LocalCache>,
    defaults: TimerSettings,
}

impl TimerStore {
    /// `defaults` seed the state when nothing has been persisted yet.
    pub fn new(cache: Arc<dyn LocalCache>, defaults: TimerSettings) -> Self {
        Self { cache, defaults }
    }

    pub fn load(&self) -> TimerState {
        self.load_at(Utc::now())
    }

    /// Persisted state with elapsed wall-clock time applied.
    ///
    /// Absent or unreadable state yields an idle study phase.
    pub fn load_at(&self, now: DateTime<Utc>) -> TimerState {
        let mut state = self.read_raw(now);
        reconcile(&mut state, now);
        state
    }

    pub fn save(&self, state: &TimerState) -> Result<()> {
        self.save_at(state, Utc::now())
    }

    /// Persist `state` with `last_tick` stamped to `now`.
    pub fn save_at(&self, state: &TimerState, now: DateTime<Utc>) -> Result<()> {
        let mut stamped = state.clone();
        stamped.last_tick = now;
        self.write(&stamped)
    }

    pub fn tick(&self) -> Result<TickOutcome> {
        self.tick_at(Utc::now())
    }

    /// Advance the countdown to `now`.
    ///
    /// Skipped ticks are harmless: remaining time comes from the wall clock,
    /// not from the number of ticks.
    pub fn tick_at(&self, now: DateTime<Utc>) -> Result<TickOutcome> {
        let mut state = self.read_raw(now);
        if !state.is_active {
            return Ok(TickOutcome::Idle(state));
        }

        if reconcile(&mut state, now) {
            let finished = state.complete_phase();
            state.last_tick = now;
            self.write(&state)?;
            debug!(phase = %finished, sessions = state.sessions_completed, "phase completed");
            return Ok(TickOutcome::PhaseCompleted { finished, state });
        }

        // Keep the fractional second that `reconcile` left on `last_tick`.
        self.write(&state)?;
        Ok(TickOutcome::Running(state))
    }

    fn read_raw(&self, now: DateTime<Utc>) -> TimerState {
        let json = match self.cache.get(keys::TIMER_STATE) {
            Ok(Some(json)) => json,
            Ok(None) => return TimerState::new(self.defaults, now),
            Err(e) => {
                warn!(error = %e, "timer state unreadable; using defaults");
                return TimerState::new(self.defaults, now);
            }
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            warn!(error = %e, "corrupt timer state; using defaults");
            TimerState::new(self.defaults, now)
        })
    }

    fn write(&self, state: &TimerState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.cache.set(keys::TIMER_STATE, &json)
    }
}

/// Subtract whole seconds elapsed since `last_tick` from an active
/// countdown. Returns `true` if this drove it to zero, in which case the
/// timer is stopped.
fn reconcile(state: &mut TimerState, now: DateTime<Utc>) -> bool {
    if !state.is_active {
        return false;
    }
    let elapsed = (now - state.last_tick).num_seconds().max(0);
    state.last_tick += Duration::seconds(elapsed);
    state.time_left = state.time_left.saturating_sub(elapsed as u64);
    if state.time_left == 0 {
        state.is_active = false;
        return true;
    }
    false
}
