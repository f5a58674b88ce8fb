use chrono::{Local, NaiveDate, NaiveTime, Utc};
use clap::Subcommand;
use studyroom_core::{Deadline, Priority};

use super::{local_instant, CliResult, Context};

#[derive(Subcommand)]
pub enum DeadlineAction {
    /// List deadlines
    List {
        /// Only deadlines due within this many days
        #[arg(long)]
        within: Option<i64>,
        #[arg(long)]
        json: bool,
    },
    /// Add a deadline
    Add {
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: NaiveDate,
        /// Local due time (HH:MM), default end of day
        #[arg(long)]
        time: Option<NaiveTime>,
        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: Priority,
        #[arg(long)]
        subject: Option<String>,
    },
    /// Remove a deadline by id
    Remove { id: String },
}

pub fn run(action: DeadlineAction) -> CliResult {
    let ctx = Context::open()?;
    let store = ctx.deadlines();
    let now = Utc::now();

    match action {
        DeadlineAction::List { within, json } => {
            let deadlines = match within {
                Some(days) => store.due_within(now, days),
                None => store.get_all(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&deadlines)?);
                return Ok(());
            }
            if deadlines.is_empty() {
                println!("no deadlines");
            }
            for d in &deadlines {
                let due = d.due_date.with_timezone(&Local).format("%Y-%m-%d %H:%M");
                let flag = if d.is_overdue(now) { " OVERDUE" } else { "" };
                let subject = d.subject.as_deref().map(|s| format!(" [{s}]")).unwrap_or_default();
                println!("{due}  {:<6} {}{subject}{flag}  ({})", d.priority, d.title, d.id);
            }
        }
        DeadlineAction::Add {
            title,
            due,
            time,
            priority,
            subject,
        } => {
            let end_of_day = NaiveTime::from_hms_opt(23, 59, 0);
            let mut deadline = Deadline::new(title, local_instant(due, time.or(end_of_day))?, priority);
            deadline.subject = subject;
            let id = deadline.id.clone();
            store.add(deadline)?;
            println!("Deadline added: {id}");
        }
        DeadlineAction::Remove { id } => {
            store.remove(&id)?;
            println!("Deadline removed: {id}");
        }
    }
    Ok(())
}
