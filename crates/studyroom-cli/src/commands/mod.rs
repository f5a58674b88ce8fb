pub mod completions;
pub mod config;
mod context;
pub mod deadline;
pub mod event;
pub mod stats;
pub mod term;
pub mod timer;

pub use context::{region_or_configured, Context};

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Local date (and optional time, default midnight) as a UTC instant.
pub fn local_instant(
    date: NaiveDate,
    time: Option<NaiveTime>,
) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    let naive = date.and_time(time.unwrap_or(NaiveTime::MIN));
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("{naive} does not exist in the local timezone").into())
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
