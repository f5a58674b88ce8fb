use chrono::NaiveDate;
use clap::Subcommand;
use studyroom_core::{Region, TermCalendar};

use super::{region_or_configured, today, CliResult};

#[derive(Subcommand)]
pub enum TermAction {
    /// Term and week for a date (default today)
    Now {
        /// Date to resolve (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Region code: nsw, vic, qld, sa, wa
        #[arg(long)]
        region: Option<Region>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// The next term to start after a date
    Next {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        region: Option<Region>,
        #[arg(long)]
        json: bool,
    },
    /// All known terms for a region
    List {
        #[arg(long)]
        region: Option<Region>,
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: TermAction) -> CliResult {
    let calendar = TermCalendar::builtin();

    match action {
        TermAction::Now { date, region, json } => {
            let region = region_or_configured(region)?;
            let date = date.unwrap_or_else(today);
            let info = calendar.resolve(date, region);
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
                return Ok(());
            }
            match info {
                Some(info) => println!("{info}"),
                None => match calendar.next_term(date, region) {
                    Some(next) => println!("Holidays (next: {} {}, starts {})", next.label, next.year, next.start),
                    None => println!("Holidays"),
                },
            }
        }
        TermAction::Next { date, region, json } => {
            let region = region_or_configured(region)?;
            let date = date.unwrap_or_else(today);
            let next = calendar.next_term(date, region);
            if json {
                println!("{}", serde_json::to_string_pretty(&next)?);
                return Ok(());
            }
            match next {
                Some(term) => println!("{} {}: {} to {}", term.label, term.year, term.start, term.end),
                None => println!("no later term on record for {}", region.display_name()),
            }
        }
        TermAction::List { region, json } => {
            let region = region_or_configured(region)?;
            let terms = calendar.terms(region);
            if json {
                println!("{}", serde_json::to_string_pretty(terms)?);
                return Ok(());
            }
            println!("{}", region.display_name());
            for term in terms {
                println!("  {} {}  {} .. {}", term.year, term.label, term.start, term.end);
            }
        }
    }
    Ok(())
}
