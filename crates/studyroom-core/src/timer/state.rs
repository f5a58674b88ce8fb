use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Study,
    Break,
}

impl Phase {
    pub fn other(self) -> Phase {
        match self {
            Phase::Study => Phase::Break,
            Phase::Break => Phase::Study,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Study => "study",
            Phase::Break => "break",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase durations in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(rename = "study")]
    pub study_secs: u64,
    #[serde(rename = "break")]
    pub break_secs: u64,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            study_secs: 25 * 60,
            break_secs: 5 * 60,
        }
    }
}

impl TimerSettings {
    pub fn duration_of(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Study => self.study_secs,
            Phase::Break => self.break_secs,
        }
    }
}

/// Persisted countdown.
///
/// While `is_active`, `time_left` is only valid as of `last_tick`; the
/// store subtracts the wall-clock time elapsed since then before handing
/// the state out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub phase: Phase,
    /// Seconds remaining in the current phase.
    pub time_left: u64,
    pub is_active: bool,
    pub sessions_completed: u32,
    pub settings: TimerSettings,
    pub last_tick: DateTime<Utc>,
}

impl TimerState {
    /// Idle at the start of a study phase.
    pub fn new(settings: TimerSettings, now: DateTime<Utc>) -> Self {
        Self {
            phase: Phase::Study,
            time_left: settings.study_secs,
            is_active: false,
            sessions_completed: 0,
            settings,
            last_tick: now,
        }
    }

    /// Full length of the current phase.
    pub fn phase_duration(&self) -> u64 {
        self.settings.duration_of(self.phase)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.phase_duration();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.time_left.min(total) as f64 / total as f64)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start counting down. An exhausted phase restarts at full length.
    pub fn start(&mut self) {
        if self.time_left == 0 {
            self.time_left = self.phase_duration();
        }
        self.is_active = true;
    }

    pub fn pause(&mut self) {
        self.is_active = false;
    }

    pub fn toggle(&mut self) {
        if self.is_active {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Stop and rewind the current phase.
    pub fn reset(&mut self) {
        self.is_active = false;
        self.time_left = self.phase_duration();
    }

    /// Move to the other phase without counting a session.
    pub fn switch_phase(&mut self) {
        self.phase = self.phase.other();
        self.reset();
    }

    /// Finish the current phase. Completing a study phase counts a session.
    /// Returns the phase that finished.
    pub fn complete_phase(&mut self) -> Phase {
        let finished = self.phase;
        if finished == Phase::Study {
            self.sessions_completed += 1;
        }
        self.switch_phase();
        finished
    }

    /// Replace the phase durations. An idle timer picks up the new length;
    /// a running one keeps its remaining time, capped at the new length.
    pub fn apply_settings(&mut self, settings: TimerSettings) {
        self.settings = settings;
        if self.is_active {
            self.time_left = self.time_left.min(self.phase_duration());
        } else {
            self.time_left = self.phase_duration();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> TimerState {
        TimerState::new(
            TimerSettings {
                study_secs: 1500,
                break_secs: 300,
            },
            Utc::now(),
        )
    }

    #[test]
    fn defaults_to_idle_study() {
        let state = fresh();
        assert_eq!(state.phase, Phase::Study);
        assert_eq!(state.time_left, 1500);
        assert!(!state.is_active);
        assert_eq!(state.sessions_completed, 0);
    }

    #[test]
    fn start_pause_toggle() {
        let mut state = fresh();
        state.start();
        assert!(state.is_active);
        state.pause();
        assert!(!state.is_active);
        state.toggle();
        assert!(state.is_active);
        state.toggle();
        assert!(!state.is_active);
    }

    #[test]
    fn start_after_exhaustion_reloads_phase() {
        let mut state = fresh();
        state.time_left = 0;
        state.start();
        assert_eq!(state.time_left, 1500);
    }

    #[test]
    fn complete_study_counts_session() {
        let mut state = fresh();
        state.start();
        assert_eq!(state.complete_phase(), Phase::Study);
        assert_eq!(state.phase, Phase::Break);
        assert_eq!(state.time_left, 300);
        assert!(!state.is_active);
        assert_eq!(state.sessions_completed, 1);

        assert_eq!(state.complete_phase(), Phase::Break);
        assert_eq!(state.phase, Phase::Study);
        assert_eq!(state.sessions_completed, 1);
    }

    #[test]
    fn switch_phase_does_not_count() {
        let mut state = fresh();
        state.switch_phase();
        assert_eq!(state.phase, Phase::Break);
        assert_eq!(state.sessions_completed, 0);
    }

    #[test]
    fn settings_apply_to_idle_and_cap_running() {
        let mut state = fresh();
        state.apply_settings(TimerSettings {
            study_secs: 3000,
            break_secs: 600,
        });
        assert_eq!(state.time_left, 3000);

        state.start();
        state.time_left = 2000;
        state.apply_settings(TimerSettings {
            study_secs: 900,
            break_secs: 600,
        });
        assert_eq!(state.time_left, 900);
        assert!(state.is_active);
    }

    #[test]
    fn progress_tracks_time_left() {
        let mut state = fresh();
        assert_eq!(state.progress(), 0.0);
        state.time_left = 375;
        assert_eq!(state.progress(), 0.75);
        state.time_left = 0;
        assert_eq!(state.progress(), 1.0);

        state.settings.study_secs = 0;
        assert_eq!(state.progress(), 0.0);
    }

    #[test]
    fn serializes_with_wire_names() {
        let state = fresh();
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["phase"], "study");
        assert_eq!(value["timeLeft"], 1500);
        assert_eq!(value["isActive"], false);
        assert_eq!(value["settings"]["study"], 1500);
        assert_eq!(value["settings"]["break"], 300);
        assert!(value["lastTick"].is_string());
    }
}
