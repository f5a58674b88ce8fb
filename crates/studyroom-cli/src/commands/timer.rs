use std::io::Write;
use std::time::Duration;

use chrono::Utc;
use clap::Subcommand;
use studyroom_core::{Phase, StatsStore, TickOutcome, TimerState, TimerStore};

use super::{CliResult, Context};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state, with phase progress, as JSON
    Status,
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Rewind the current phase
    Reset,
    /// Jump to the other phase without counting a session
    Skip,
    /// Change phase durations (minutes) and persist them to config
    Settings {
        #[arg(long)]
        study: Option<u32>,
        #[arg(long = "break")]
        break_minutes: Option<u32>,
    },
    /// Run the countdown in the foreground until the phase ends
    Run,
}

fn print_state(state: &TimerState) -> CliResult {
    println!("{}", serde_json::to_string_pretty(state)?);
    Ok(())
}

pub fn run(action: TimerAction) -> CliResult {
    let mut ctx = Context::open()?;
    let store = ctx.timer();
    let stats = ctx.stats();

    // A phase that ran out while nobody was ticking still counts.
    if let TickOutcome::PhaseCompleted { finished, state } = store.tick()? {
        record_completion(&stats, finished, &state)?;
    }
    let mut state = store.load();

    match action {
        TimerAction::Status => {
            let mut value = serde_json::to_value(&state)?;
            value["progress"] = serde_json::json!(state.progress());
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }
        TimerAction::Start => state.start(),
        TimerAction::Pause => state.pause(),
        TimerAction::Reset => state.reset(),
        TimerAction::Skip => state.switch_phase(),
        TimerAction::Settings {
            study,
            break_minutes,
        } => {
            if let Some(minutes) = study {
                ctx.config.timer.study_minutes = minutes;
            }
            if let Some(minutes) = break_minutes {
                ctx.config.timer.break_minutes = minutes;
            }
            ctx.config.save()?;
            state.apply_settings(ctx.config.timer_settings());
        }
        TimerAction::Run => {
            if !state.is_active {
                state.start();
                store.save(&state)?;
            }
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            return runtime.block_on(run_foreground(&store, &stats));
        }
    }

    store.save(&state)?;
    print_state(&state)
}

fn record_completion(stats: &StatsStore, finished: Phase, state: &TimerState) -> CliResult {
    if finished == Phase::Study {
        stats.record_study_session(state.settings.study_secs, Utc::now())?;
    }
    Ok(())
}

/// Tick once a second until the current phase finishes.
async fn run_foreground(store: &TimerStore, stats: &StatsStore) -> CliResult {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    let mut stdout = std::io::stdout();

    loop {
        interval.tick().await;
        match store.tick()? {
            TickOutcome::Running(state) => {
                let (m, s) = (state.time_left / 60, state.time_left % 60);
                write!(stdout, "\r{:<5} {m:02}:{s:02}", state.phase.as_str())?;
                stdout.flush()?;
            }
            TickOutcome::PhaseCompleted { finished, state } => {
                writeln!(stdout)?;
                record_completion(stats, finished, &state)?;
                println!("{finished} phase complete; next: {}", state.phase);
                return Ok(());
            }
            TickOutcome::Idle(_) => {
                writeln!(stdout)?;
                println!("timer is paused");
                return Ok(());
            }
        }
    }
}
