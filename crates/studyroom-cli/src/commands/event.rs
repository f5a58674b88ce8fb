use std::path::PathBuf;

use chrono::{Local, NaiveDate, NaiveTime, Utc};
use clap::Subcommand;
use studyroom_core::{Event, EventKind};

use super::{local_instant, CliResult, Context};

#[derive(Subcommand)]
pub enum EventAction {
    /// List all events
    List {
        /// Only events on this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
    /// Add an event
    Add {
        title: String,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Local start time (HH:MM), default midnight
        #[arg(long)]
        time: Option<NaiveTime>,
        /// exam, assignment or event
        #[arg(long, default_value = "event")]
        kind: EventKind,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove an event by id
    Remove { id: String },
    /// Import events from an .ics file
    Import { path: PathBuf },
    /// Events from now on
    Upcoming {
        #[arg(long, default_value = "10")]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Remove every event
    Clear,
}

fn print_events(events: &[Event], json: bool) -> CliResult {
    if json {
        println!("{}", serde_json::to_string_pretty(events)?);
        return Ok(());
    }
    if events.is_empty() {
        println!("no events");
    }
    for event in events {
        let when = event.date.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        let subject = event.subject.as_deref().map(|s| format!(" [{s}]")).unwrap_or_default();
        println!("{when}  {:<10} {}{subject}  ({})", event.kind, event.title, event.id);
    }
    Ok(())
}

pub fn run(action: EventAction) -> CliResult {
    let ctx = Context::open()?;
    let store = ctx.events();

    match action {
        EventAction::List { date, json } => {
            let events = match date {
                Some(date) => store.on_date(date),
                None => store.get_all(),
            };
            print_events(&events, json)?;
        }
        EventAction::Add {
            title,
            date,
            time,
            kind,
            subject,
            description,
        } => {
            let mut event = Event::new(title, local_instant(date, time)?, kind);
            event.subject = subject;
            event.description = description;
            let id = event.id.clone();
            store.add(event)?;
            println!("Event added: {id}");
        }
        EventAction::Remove { id } => {
            store.remove(&id)?;
            println!("Event removed: {id}");
        }
        EventAction::Import { path } => {
            let contents = std::fs::read_to_string(&path)?;
            let imported = store.import_ics(&contents)?;
            println!("Imported {} event(s) from {}", imported.len(), path.display());
        }
        EventAction::Upcoming { limit, json } => {
            print_events(&store.upcoming(Utc::now(), limit), json)?;
        }
        EventAction::Clear => {
            store.clear()?;
            println!("all events removed");
        }
    }
    Ok(())
}
